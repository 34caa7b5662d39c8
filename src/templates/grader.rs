//! Gradient mapping files
//!
//! `grader.hpp` packs every opcode's derivative expression into the
//! `_AGE_INTERNAL_GRADSWITCH` macro and declares (or, when templated,
//! defines) `chain_rule`; `grader.cpp` carries the non-templated
//! definition. The switch falls through to a fatal arm for unknown opcodes.

use super::{HEADER_EXT, SOURCE_EXT};
use crate::config::{required, GradSig, OpcodeSpec};
use crate::gen::{ordered, GenResult, Slot, Template, Vocab};
use serde_json::Value;

pub const FILENAME: &str = "grader";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_GRADER_HPP
#define _GENERATED_GRADER_HPP

namespace age
{

#define _AGE_INTERNAL_GRADSWITCH()\
@gradops@

@grad_decl@

}

#endif // _GENERATED_GRADER_HPP
"#;

const SOURCE_SKELETON: &str = r#"#ifdef _GENERATED_GRADER_HPP

namespace age
{

@grad_defn@

}

#endif
"#;

fn grad_switch(value: Option<&Value>) -> GenResult<String> {
    let opcodes: Vocab<OpcodeSpec> = required("opcodes", value)?;
    Ok(ordered(&opcodes)
        .map(|(code, spec)| format!("case {code}: return {};", spec.derivative))
        .collect::<Vec<_>>()
        .join("\\\n"))
}

fn declare(grad: &GradSig) -> String {
    format!(
        "{out} chain_rule (ade::iFunctor* fwd,\n    {input} bwd, ade::TensT args, size_t idx);",
        out = grad.out,
        input = grad.input
    )
}

fn define(grad: &GradSig) -> String {
    let template_prefix = if grad.template.is_empty() {
        String::new()
    } else {
        format!("template <{}>\n", grad.template)
    };
    let out = &grad.out;
    let input = &grad.input;
    format!(
        "{template_prefix}{out} chain_rule (ade::iFunctor* fwd,\n    {input} bwd, ade::TensT args, size_t idx)\n{{\n    switch (fwd->get_opcode().code_)\n    {{\n        _AGE_INTERNAL_GRADSWITCH()\n        default: logs::fatal(\"no gradient rule for unknown opcode\");\n    }}\n    {out} defval;\n    return defval;\n}}"
    )
}

fn grad_decl(value: Option<&Value>) -> GenResult<String> {
    let grad: GradSig = required("signatures.grad", value)?;
    if grad.template.is_empty() {
        Ok(declare(&grad))
    } else {
        Ok(define(&grad))
    }
}

fn grad_defn(value: Option<&Value>) -> GenResult<String> {
    let grad: GradSig = required("signatures.grad", value)?;
    if grad.template.is_empty() {
        Ok(define(&grad))
    } else {
        Ok(String::new())
    }
}

/// The `grader.hpp` template.
pub fn header() -> GenResult<Template> {
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![
            Slot::new("gradops", "opcodes", grad_switch),
            Slot::new("grad_decl", "signatures.grad", grad_decl),
        ],
    )
}

/// The `grader.cpp` template.
pub fn source() -> GenResult<Template> {
    Template::new(
        FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![Slot::new("grad_defn", "signatures.grad", grad_defn)],
    )
}

//! Operation mapping file
//!
//! `opmap.hpp` defines `typed_exec`, the dispatch-by-opcode switch splicing
//! each opcode's operation expression, and the `TYPE_LOOKUP` macro that
//! expands a caller-supplied macro once per registered dtype — the
//! compile-time hook for instantiating generic algorithms over every type.
//! The execution signature is driven by `signatures.data`: reference-style
//! output by default, return-style when `out.return` is set.

use super::HEADER_EXT;
use crate::config::{required, DataSig, OpcodeSpec};
use crate::gen::{ordered, GenResult, Slot, Template, Vocab};
use serde_json::Value;

pub const FILENAME: &str = "opmap";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_OPERA_HPP
#define _GENERATED_OPERA_HPP

namespace age
{

template <typename T>
@signature@
{
    switch (opcode)
    {
@ops@
        default: logs::fatal("unknown opcode");
    }@defreturn@
}

// GENERIC_MACRO must accept a real type as an argument.
// e.g.:
// #define GENERIC_MACRO(REAL_TYPE) run<REAL_TYPE>(args...);
// ...
// TYPE_LOOKUP(GENERIC_MACRO, type_code)
#define TYPE_LOOKUP(GENERIC_MACRO, DTYPE)\
switch (DTYPE) {\
@generic_macros@\
    default: logs::fatal("executing bad type");\
}

}

#endif // _GENERATED_OPERA_HPP
"#;

fn signature(value: Option<&Value>) -> GenResult<String> {
    let data: DataSig = required("signatures.data", value)?;
    let out = data.out.type_name();
    let input = &data.input;
    if data.out.returns() {
        Ok(format!(
            "{out} typed_exec (_GENERATED_OPCODE opcode, ade::Shape shape, {input} in)"
        ))
    } else {
        Ok(format!(
            "void typed_exec ({out} out, _GENERATED_OPCODE opcode, ade::Shape shape, {input} in)"
        ))
    }
}

fn op_cases(value: Option<&Value>) -> GenResult<String> {
    let opcodes: Vocab<OpcodeSpec> = required("opcodes", value)?;
    Ok(ordered(&opcodes)
        .map(|(code, spec)| {
            format!("        case {code}:\n            {}; break;", spec.operation)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn generic_macros(value: Option<&Value>) -> GenResult<String> {
    let dtypes: Vocab<String> = required("dtypes", value)?;
    Ok(ordered(&dtypes)
        .map(|(dtype, real_type)| {
            format!("    case age::{dtype}: GENERIC_MACRO({real_type}) break;")
        })
        .collect::<Vec<_>>()
        .join("\\\n"))
}

fn default_return(value: Option<&Value>) -> GenResult<String> {
    let data: DataSig = required("signatures.data", value)?;
    if data.out.returns() {
        Ok(format!(
            "\n    {} defval;\n    return defval;",
            data.out.type_name()
        ))
    } else {
        Ok(String::new())
    }
}

/// The `opmap.hpp` template.
pub fn header() -> GenResult<Template> {
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![
            Slot::new("signature", "signatures.data", signature),
            Slot::new("ops", "opcodes", op_cases),
            Slot::new("generic_macros", "dtypes", generic_macros),
            Slot::new("defreturn", "signatures.data", default_return),
        ],
    )
}

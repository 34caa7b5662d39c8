//! Rule-set grader format
//!
//! Re-emits the grader pair as an `iRuleSet` implementation, pulling the
//! scalar-constant constructor from `data.scalarize` and the aggregation
//! opcode from `data.sum`. Applied after [`InternalPlugin`]
//! (`--plugins internal,ruleset`), it replaces the default grader files —
//! the documented overwrite-on-collision behavior, not an accident.
//!
//! [`InternalPlugin`]: super::InternalPlugin

use super::insert_file;
use crate::config::{required, Config, OpcodeSpec};
use crate::gen::{ordered, FileMap, FileRep, GenResult, Plugin, Slot, Template, Vocab};
use crate::templates::{grader, HEADER_EXT, SOURCE_EXT};
use serde_json::Value;

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_GRADER_HPP
#define _GENERATED_GRADER_HPP

namespace age
{

template <typename T>
ade::LeafptrT data (T scalar, ade::Shape shape)
{
    return @scalarize@;
}

struct RuleSet final : public iRuleSet
{
    ade::LeafptrT data (double scalar, ade::Shape shape) override
    {
        return age::data(scalar, shape);
    }

    ade::Opcode sum_opcode (void) override
    {
        return ade::Opcode{"@sum@", @sum@};
    }

    ade::TensptrT chain_rule (ade::iFunctor* fwd,
        ade::MappedTensor bwd, ade::TensT args, size_t idx) override;
};

}

#endif // _GENERATED_GRADER_HPP
"#;

const SOURCE_SKELETON: &str = r#"#ifdef _GENERATED_GRADER_HPP

namespace age
{

ade::TensptrT RuleSet::chain_rule (ade::iFunctor* fwd,
    ade::MappedTensor bwd, ade::TensT args, size_t idx)
{
    switch (fwd->get_opcode().code_)
    {
@gradops@
        default: logs::fatal("no gradient rule for unknown opcode");
    }
}

}

#endif
"#;

fn verbatim(path: &'static str) -> impl Fn(Option<&Value>) -> GenResult<String> {
    move |value| required::<String>(path, value)
}

fn grad_cases(value: Option<&Value>) -> GenResult<String> {
    let opcodes: Vocab<OpcodeSpec> = required("opcodes", value)?;
    Ok(ordered(&opcodes)
        .map(|(code, spec)| format!("        case {code}: return {};", spec.derivative))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// The rule-set `grader.hpp` template.
pub fn header() -> GenResult<Template> {
    Template::new(
        grader::FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![
            Slot::new("scalarize", "data.scalarize", verbatim("data.scalarize")),
            Slot::new("sum", "data.sum", verbatim("data.sum")),
        ],
    )
}

/// The rule-set `grader.cpp` template.
pub fn source() -> GenResult<Template> {
    Template::new(
        grader::FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![Slot::new("gradops", "opcodes", grad_cases)],
    )
}

pub struct RulesetPlugin;

impl Plugin for RulesetPlugin {
    fn plugin_id(&self) -> &'static str {
        "RULESET"
    }

    fn process(&self, mut generated: FileMap, config: &Config) -> GenResult<FileMap> {
        let header = header()?;
        let source = source()?;
        let header_path = header.fpath();
        insert_file(
            &mut generated,
            config,
            header_path.clone(),
            FileRep::new(
                header.render(config.root())?,
                vec!["\"bwd/grader.hpp\"".to_string()],
                vec!["codes.hpp".to_string()],
            ),
        );
        insert_file(
            &mut generated,
            config,
            source.fpath(),
            FileRep::new(
                source.render(config.root())?,
                vec![],
                vec!["api.hpp".to_string(), header_path],
            ),
        );
        Ok(generated)
    }
}

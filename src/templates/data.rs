//! Typed data-conversion file
//!
//! `data.hpp` defines `type_convert`, a switch over the dtype vocabulary
//! that reinterprets a raw buffer as the matching native type. Unrecognized
//! enumerants hit a fatal default arm.

use super::HEADER_EXT;
use crate::config::required;
use crate::gen::{ordered, GenResult, Slot, Template, Vocab};
use serde_json::Value;

pub const FILENAME: &str = "data";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_DATA_HPP
#define _GENERATED_DATA_HPP

namespace age
{

// uses std containers for type conversion
template <typename OUTTYPE>
void type_convert (std::vector<OUTTYPE>& out, void* input,
    age::_GENERATED_DTYPE intype, size_t nelems)
{
    switch (intype)
    {
@typed_conversions@
        default:
            logs::fatalf("invalid input type %s",
                age::name_type(intype).c_str());
    }
}

}

#endif // _GENERATED_DATA_HPP
"#;

fn typed_conversions(value: Option<&Value>) -> GenResult<String> {
    let dtypes: Vocab<String> = required("dtypes", value)?;
    Ok(ordered(&dtypes)
        .map(|(dtype, real_type)| {
            format!(
                "        case {dtype}:\n            out = std::vector<OUTTYPE>(({real_type}*) input,\n                ({real_type}*) input + nelems); break;"
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

/// The `data.hpp` template.
pub fn header() -> GenResult<Template> {
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![Slot::new("typed_conversions", "dtypes", typed_conversions)],
    )
}

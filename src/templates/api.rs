//! Typed API files
//!
//! `api.hpp` carries a declaration per API spec — except templated specs,
//! which are defined inline — and `api.cpp` carries the matching
//! definitions. Every definition opens with a null guard over the
//! pointer-like arguments that fails loudly; a spec without pointer-like
//! arguments guards on the literal `false`. Defaults appear in declaration
//! position only.

use super::{HEADER_EXT, SOURCE_EXT};
use crate::config::{required, ApiSpec, ArgSpec, PointerTypes};
use crate::gen::{GenResult, Slot, Template};
use serde_json::Value;

pub const FILENAME: &str = "api";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_API_HPP
#define _GENERATED_API_HPP

namespace age
{

@api_decls@

}

#endif // _GENERATED_API_HPP
"#;

const SOURCE_SKELETON: &str = r#"#ifdef _GENERATED_API_HPP

namespace age
{

@apis@

}

#endif
"#;

fn format_arg(arg: &ArgSpec, accept_default: bool) -> String {
    match (&arg.default, accept_default) {
        (Some(default), true) => format!("{} {} = {}", arg.dtype, arg.name, default),
        _ => format!("{} {}", arg.dtype, arg.name),
    }
}

fn format_args(args: &[ArgSpec], accept_default: bool) -> String {
    args.iter()
        .map(|arg| format_arg(arg, accept_default))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Guard expression over the pointer-like arguments: `a == nullptr || ...`,
/// or the never-true literal when none exist.
pub fn null_check(args: &[ArgSpec], pointers: &PointerTypes) -> String {
    let guarded: Vec<&ArgSpec> = args.iter().filter(|arg| arg.dtype == pointers.unit).collect();
    if guarded.is_empty() {
        return "false".to_string();
    }
    guarded
        .iter()
        .map(|arg| format!("{} == nullptr", arg.name))
        .collect::<Vec<_>>()
        .join(" || ")
}

fn declare(api: &ApiSpec, pointers: &PointerTypes) -> String {
    let comment = match &api.description {
        Some(description) => format!("/**\n{description}\n**/\n"),
        None => String::new(),
    };
    format!(
        "{comment}{outtype} {name} ({args});",
        outtype = api.out.out_type(pointers),
        name = api.name,
        args = format_args(&api.args, true)
    )
}

fn define(api: &ApiSpec, pointers: &PointerTypes) -> String {
    // Templated definitions live in the header and keep their defaults.
    let (template_prefix, args) = if api.template.is_empty() {
        (String::new(), format_args(&api.args, false))
    } else {
        (
            format!("template <{}>\n", api.template),
            format_args(&api.args, true),
        )
    };
    let name = &api.name;
    let outtype = api.out.out_type(pointers);
    let guard = null_check(&api.args, pointers);
    let retval = api.out.out_val();
    format!(
        "{template_prefix}{outtype} {name} ({args})\n{{\n    if ({guard})\n    {{\n        logs::fatal(\"cannot {name} with a null argument\");\n    }}\n    return {retval};\n}}"
    )
}

/// The `api.hpp` template.
pub fn header(pointers: &PointerTypes) -> GenResult<Template> {
    let pointers = pointers.clone();
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![Slot::new("api_decls", "apis", move |value: Option<&Value>| {
            let apis: Vec<ApiSpec> = required("apis", value)?;
            Ok(apis
                .iter()
                .map(|api| {
                    if api.template.is_empty() {
                        declare(api, &pointers)
                    } else {
                        define(api, &pointers)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n\n"))
        })],
    )
}

/// The `api.cpp` template.
pub fn source(pointers: &PointerTypes) -> GenResult<Template> {
    let pointers = pointers.clone();
    Template::new(
        FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![Slot::new("apis", "apis", move |value: Option<&Value>| {
            let apis: Vec<ApiSpec> = required("apis", value)?;
            Ok(apis
                .iter()
                .filter(|api| api.template.is_empty())
                .map(|api| define(api, &pointers))
                .collect::<Vec<_>>()
                .join("\n\n"))
        })],
    )
}

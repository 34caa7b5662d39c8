//! Flat-handle C boundary shim
//!
//! Wraps the typed API behind plain C signatures: pointer-like arguments
//! flatten to `int64_t` handles resolved through a registry, pointer lists
//! flatten to a handle array plus a length, and arguments carrying a `c`
//! shim expand to their flattened parameter list with a conversion
//! expression at the call site. Repeated API names get numeric suffixes so
//! the emitted symbols stay unique without overload resolution.

use super::{insert_file, overload_affixes};
use crate::config::{ApiSpec, Config, PointerTypes};
use crate::gen::{FileMap, FileRep, GenResult, Plugin, Slot, Template};
use crate::templates::{HEADER_EXT, SOURCE_EXT};
use serde_json::Value;

pub const FILENAME: &str = "capi";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_CAPI_HPP
#define _GENERATED_CAPI_HPP

int64_t register_tens (ade::iTensor* ptr);

int64_t register_tens (ade::TensptrT& ptr);

ade::TensptrT get_tens (int64_t id);

extern void free_tens (int64_t id);

extern void get_shape (int outshape[8], int64_t tens);

@api_decls@

#endif // _GENERATED_CAPI_HPP
"#;

const SOURCE_SKELETON: &str = r#"#ifdef _GENERATED_CAPI_HPP

static std::unordered_map<int64_t,ade::TensptrT> tens;

int64_t register_tens (ade::iTensor* ptr)
{
    int64_t id = (int64_t) ptr;
    tens.emplace(id, ade::TensptrT(ptr));
    return id;
}

int64_t register_tens (ade::TensptrT& ptr)
{
    int64_t id = (int64_t) ptr.get();
    tens.emplace(id, ptr);
    return id;
}

ade::TensptrT get_tens (int64_t id)
{
    auto it = tens.find(id);
    if (tens.end() == it)
    {
        return ade::TensptrT(nullptr);
    }
    return it->second;
}

void free_tens (int64_t id)
{
    tens.erase(id);
}

void get_shape (int outshape[8], int64_t id)
{
    const ade::Shape& shape = get_tens(id)->shape();
    std::copy(shape.begin(), shape.end(), outshape);
}

@apis@

#endif
"#;

/// Flattened C signature: `int64_t age_<name><affix> (<params>)`.
fn declare(api: &ApiSpec, affix: &str, pointers: &PointerTypes) -> String {
    let mut params = Vec::new();
    for arg in &api.args {
        if let Some(shim) = &arg.c {
            for carg in &shim.args {
                params.push(format!("{} {}", carg.dtype, carg.name));
            }
        } else if arg.dtype == pointers.unit {
            params.push(format!("int64_t {}", arg.name));
        } else if arg.dtype == pointers.list {
            params.push(format!("int64_t* {}", arg.name));
            params.push(format!("uint64_t n_{}", arg.name));
        } else {
            params.push(format!("{} {}", arg.dtype, arg.name));
        }
    }
    format!(
        "int64_t age_{name}{affix} ({params})",
        name = api.name,
        params = params.join(", ")
    )
}

/// Shim body: rebuild the typed arguments from handles, call the typed API,
/// register the result, return its handle.
fn define(api: &ApiSpec, affix: &str, pointers: &PointerTypes) -> String {
    let mut decls = Vec::new();
    let mut params = Vec::new();
    for arg in &api.args {
        let name = &arg.name;
        if let Some(shim) = &arg.c {
            params.push(shim.convert.clone());
        } else if arg.dtype == pointers.unit {
            decls.push(format!(
                "{unit} {name}_ptr = get_tens({name});",
                unit = pointers.unit
            ));
            params.push(format!("{name}_ptr"));
        } else if arg.dtype == pointers.list {
            decls.push(format!("{list} {name}_tens(n_{name});", list = pointers.list));
            decls.push(format!(
                "std::transform({name}, {name} + n_{name}, {name}_tens.begin(),"
            ));
            decls.push("    [](int64_t id){ return get_tens(id); });".to_string());
            params.push(format!("{name}_tens"));
        } else {
            params.push(name.clone());
        }
    }
    let mut arg_decls = decls.join("\n    ");
    if !arg_decls.is_empty() {
        arg_decls = format!("\n    {arg_decls}");
    }
    format!(
        "{decl}\n{{{arg_decls}\n    auto ptr = age::{func}({params});\n    int64_t id = (int64_t) ptr.get();\n    tens.emplace(id, ptr);\n    return id;\n}}",
        decl = declare(api, affix, pointers),
        func = api.name,
        params = params.join(", ")
    )
}

/// The `capi.hpp` template.
pub fn header(pointers: &PointerTypes) -> GenResult<Template> {
    let pointers = pointers.clone();
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![Slot::new("api_decls", "apis", move |value: Option<&Value>| {
            let apis: Vec<ApiSpec> = crate::config::required("apis", value)?;
            let affixes = overload_affixes(&apis);
            Ok(apis
                .iter()
                .zip(&affixes)
                .map(|(api, affix)| format!("extern {};", declare(api, affix, &pointers)))
                .collect::<Vec<_>>()
                .join("\n\n"))
        })],
    )
}

/// The `capi.cpp` template.
pub fn source(pointers: &PointerTypes) -> GenResult<Template> {
    let pointers = pointers.clone();
    Template::new(
        FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![Slot::new("apis", "apis", move |value: Option<&Value>| {
            let apis: Vec<ApiSpec> = crate::config::required("apis", value)?;
            let affixes = overload_affixes(&apis);
            Ok(apis
                .iter()
                .zip(&affixes)
                .map(|(api, affix)| define(api, affix, &pointers))
                .collect::<Vec<_>>()
                .join("\n\n"))
        })],
    )
}

pub struct CapiPlugin;

impl Plugin for CapiPlugin {
    fn plugin_id(&self) -> &'static str {
        "CAPI"
    }

    fn process(&self, mut generated: FileMap, config: &Config) -> GenResult<FileMap> {
        let pointers = config.pointer_types();
        let header = header(&pointers)?;
        let source = source(&pointers)?;
        let header_path = header.fpath();
        insert_file(
            &mut generated,
            config,
            header_path.clone(),
            FileRep::new(header.render(config.root())?, vec![], vec![]),
        );
        insert_file(
            &mut generated,
            config,
            source.fpath(),
            FileRep::new(
                source.render(config.root())?,
                vec!["<algorithm>".to_string(), "<unordered_map>".to_string()],
                vec!["api.hpp".to_string(), header_path],
            ),
        );
        Ok(generated)
    }
}

//! pybind11 binding source
//!
//! Emits `pyapi.cpp`: the `Tensor` class registration binding the pointer
//! handle type, one wrapper function per API entry suffixed with its
//! sequence index so every wrapper symbol is unique, and one `m.def` line
//! per entry exposing it to python under its (suffix-disambiguated) name
//! with a signature docstring and `py::arg` defaults.

use super::{insert_file, overload_affixes};
use crate::config::{required, ApiSpec, ArgSpec, Config, PointerTypes};
use crate::gen::{FileMap, FileRep, GenResult, Plugin, Slot, Template};
use crate::templates::SOURCE_EXT;
use serde_json::Value;

pub const FILENAME: &str = "pyapi";

const SOURCE_SKELETON: &str = r#"namespace py = pybind11;

namespace pyage
{

@unique_wrap@

}

PYBIND11_MODULE(age, m)
{
    m.doc() = "pybind ade generator";

    py::class_<ade::iTensor,ade::TensptrT> tensor(m, "Tensor");

    @defs@
}
"#;

fn wrap_func(index: usize, api: &ApiSpec, pointers: &PointerTypes) -> String {
    let params = api
        .args
        .iter()
        .map(|arg| format!("{} {}", arg.dtype, arg.name))
        .collect::<Vec<_>>()
        .join(", ");
    let args = api
        .args
        .iter()
        .map(|arg| arg.name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{unit} {name}_{index} ({params})\n{{\n    return age::{name}({args});\n}}",
        unit = pointers.unit,
        name = api.name
    )
}

fn signature_doc(api: &ApiSpec, pointers: &PointerTypes) -> String {
    let args = api
        .args
        .iter()
        .map(|arg| match &arg.default {
            Some(default) => format!("{} {} = {}", arg.dtype, arg.name, default),
            None => format!("{} {}", arg.dtype, arg.name),
        })
        .collect::<Vec<_>>()
        .join(", ");
    let description = match &api.description {
        Some(text) => format!(": {text}"),
        None => String::new(),
    };
    format!(
        "\"{unit} {name} ({args}){description}\"",
        unit = pointers.unit,
        name = api.name
    )
}

fn py_arg(arg: &ArgSpec) -> String {
    match &arg.default {
        Some(default) => format!("py::arg(\"{}\") = {default}", arg.name),
        None => format!("py::arg(\"{}\")", arg.name),
    }
}

fn module_def(index: usize, api: &ApiSpec, affix: &str, pointers: &PointerTypes) -> String {
    let pyargs = api.args.iter().map(py_arg).collect::<Vec<_>>().join(", ");
    let doc = signature_doc(api, pointers);
    if pyargs.is_empty() {
        format!(
            "m.def(\"{py}{affix}\", &pyage::{name}_{index}, {doc});",
            py = api.name,
            name = api.name
        )
    } else {
        format!(
            "m.def(\"{py}{affix}\", &pyage::{name}_{index}, {doc}, {pyargs});",
            py = api.name,
            name = api.name
        )
    }
}

/// The `pyapi.cpp` template.
pub fn source(pointers: &PointerTypes) -> GenResult<Template> {
    let wrap_pointers = pointers.clone();
    let def_pointers = pointers.clone();
    Template::new(
        FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![
            Slot::new("unique_wrap", "apis", move |value: Option<&Value>| {
                let apis: Vec<ApiSpec> = required("apis", value)?;
                Ok(apis
                    .iter()
                    .enumerate()
                    .map(|(index, api)| wrap_func(index, api, &wrap_pointers))
                    .collect::<Vec<_>>()
                    .join("\n\n"))
            }),
            Slot::new("defs", "apis", move |value: Option<&Value>| {
                let apis: Vec<ApiSpec> = required("apis", value)?;
                let affixes = overload_affixes(&apis);
                Ok(apis
                    .iter()
                    .enumerate()
                    .map(|(index, api)| module_def(index, api, &affixes[index], &def_pointers))
                    .collect::<Vec<_>>()
                    .join("\n    "))
            }),
        ],
    )
}

pub struct PybindPlugin;

impl Plugin for PybindPlugin {
    fn plugin_id(&self) -> &'static str {
        "PYBIND"
    }

    fn process(&self, mut generated: FileMap, config: &Config) -> GenResult<FileMap> {
        let source = source(&config.pointer_types())?;
        insert_file(
            &mut generated,
            config,
            source.fpath(),
            FileRep::new(
                source.render(config.root())?,
                vec!["\"pybind11/pybind11.h\"".to_string(), "\"pybind11/stl.h\"".to_string()],
                vec!["api.hpp".to_string()],
            ),
        );
        Ok(generated)
    }
}

//! Opcode and dtype definition files
//!
//! `codes.hpp` declares the `_GENERATED_OPCODE` and `_GENERATED_DTYPE`
//! enumerations plus the name/size lookup API; `codes.cpp` defines the
//! lookup tables. Both sides enumerate the vocabularies in the same order,
//! which keeps the implicit enumerant values aligned with the tables.

use super::{HEADER_EXT, SOURCE_EXT};
use crate::config::{required, OpcodeSpec};
use crate::gen::{ordered, GenResult, Slot, Template, Vocab};
use serde_json::Value;

pub const FILENAME: &str = "codes";

const HEADER_SKELETON: &str = r#"#ifndef _GENERATED_CODES_HPP
#define _GENERATED_CODES_HPP

namespace age
{

enum _GENERATED_OPCODE
{
    BAD_OP = 0,
@opcodes@
    _N_GENERATED_OPCODES,
};

enum _GENERATED_DTYPE
{
    BAD_TYPE = 0,
@dtypes@
    _N_GENERATED_DTYPES,
};

std::string name_op (_GENERATED_OPCODE code);

_GENERATED_OPCODE get_op (std::string name);

std::string name_type (_GENERATED_DTYPE type);

uint8_t type_size (_GENERATED_DTYPE type);

_GENERATED_DTYPE get_type (std::string name);

template <typename T>
_GENERATED_DTYPE get_type (void)
{
    return BAD_TYPE;
}

@get_type_decls@

}

#endif // _GENERATED_CODES_HPP
"#;

const SOURCE_SKELETON: &str = r#"#ifdef _GENERATED_CODES_HPP

namespace age
{

struct EnumHash
{
    template <typename T>
    size_t operator() (T e) const
    {
        return static_cast<size_t>(e);
    }
};

static std::unordered_map<_GENERATED_OPCODE,std::string,EnumHash> code2name =
{
@code2names@
};

static std::unordered_map<std::string,_GENERATED_OPCODE> name2code =
{
@name2codes@
};

static std::unordered_map<_GENERATED_DTYPE,std::string,EnumHash> type2name =
{
@type2names@
};

static std::unordered_map<std::string,_GENERATED_DTYPE> name2type =
{
@name2types@
};

std::string name_op (_GENERATED_OPCODE code)
{
    auto it = code2name.find(code);
    if (code2name.end() == it)
    {
        return "BAD_OP";
    }
    return it->second;
}

_GENERATED_OPCODE get_op (std::string name)
{
    auto it = name2code.find(name);
    if (name2code.end() == it)
    {
        return BAD_OP;
    }
    return it->second;
}

std::string name_type (_GENERATED_DTYPE type)
{
    auto it = type2name.find(type);
    if (type2name.end() == it)
    {
        return "BAD_TYPE";
    }
    return it->second;
}

_GENERATED_DTYPE get_type (std::string name)
{
    auto it = name2type.find(name);
    if (name2type.end() == it)
    {
        return BAD_TYPE;
    }
    return it->second;
}

uint8_t type_size (_GENERATED_DTYPE type)
{
    switch (type)
    {
@type_sizes@
        default: logs::fatal("cannot get size of bad type");
    }
    return 0;
}

@get_types@

}

#endif
"#;

fn opcode_vocab(value: Option<&Value>) -> GenResult<Vocab<OpcodeSpec>> {
    required("opcodes", value)
}

fn dtype_vocab(value: Option<&Value>) -> GenResult<Vocab<String>> {
    required("dtypes", value)
}

fn join_keys(vocab: &Vocab<impl Sized>, fmt: impl Fn(&str) -> String, sep: &str) -> String {
    ordered(vocab)
        .map(|(key, _)| fmt(key))
        .collect::<Vec<_>>()
        .join(sep)
}

fn enum_opcodes(value: Option<&Value>) -> GenResult<String> {
    let opcodes = opcode_vocab(value)?;
    Ok(join_keys(&opcodes, |code| format!("    {code},"), "\n"))
}

fn enum_dtypes(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(join_keys(&dtypes, |dtype| format!("    {dtype},"), "\n"))
}

fn get_type_decls(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(ordered(&dtypes)
        .map(|(_, real_type)| {
            format!("template <>\n_GENERATED_DTYPE get_type<{real_type}> (void);")
        })
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn code2names(value: Option<&Value>) -> GenResult<String> {
    let opcodes = opcode_vocab(value)?;
    Ok(join_keys(
        &opcodes,
        |code| format!("    {{ {code}, \"{code}\" }},"),
        "\n",
    ))
}

fn name2codes(value: Option<&Value>) -> GenResult<String> {
    let opcodes = opcode_vocab(value)?;
    Ok(join_keys(
        &opcodes,
        |code| format!("    {{ \"{code}\", {code} }},"),
        "\n",
    ))
}

fn type2names(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(join_keys(
        &dtypes,
        |dtype| format!("    {{ {dtype}, \"{dtype}\" }},"),
        "\n",
    ))
}

fn name2types(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(join_keys(
        &dtypes,
        |dtype| format!("    {{ \"{dtype}\", {dtype} }},"),
        "\n",
    ))
}

fn type_sizes(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(ordered(&dtypes)
        .map(|(dtype, real_type)| format!("        case {dtype}: return sizeof({real_type});"))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn get_types(value: Option<&Value>) -> GenResult<String> {
    let dtypes = dtype_vocab(value)?;
    Ok(ordered(&dtypes)
        .map(|(dtype, real_type)| {
            format!(
                "template <>\n_GENERATED_DTYPE get_type<{real_type}> (void)\n{{\n    return {dtype};\n}}"
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// The `codes.hpp` template.
pub fn header() -> GenResult<Template> {
    Template::new(
        FILENAME,
        HEADER_EXT,
        HEADER_SKELETON,
        vec![
            Slot::new("opcodes", "opcodes", enum_opcodes),
            Slot::new("dtypes", "dtypes", enum_dtypes),
            Slot::new("get_type_decls", "dtypes", get_type_decls),
        ],
    )
}

/// The `codes.cpp` template.
pub fn source() -> GenResult<Template> {
    Template::new(
        FILENAME,
        SOURCE_EXT,
        SOURCE_SKELETON,
        vec![
            Slot::new("code2names", "opcodes", code2names),
            Slot::new("name2codes", "opcodes", name2codes),
            Slot::new("type2names", "dtypes", type2names),
            Slot::new("name2types", "dtypes", name2types),
            Slot::new("type_sizes", "dtypes", type_sizes),
            Slot::new("get_types", "dtypes", get_types),
        ],
    )
}

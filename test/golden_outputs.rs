//! End-to-end output checks: one configuration, byte-exact expected files
//! for every plugin family.

use gluegen::config::Config;
use gluegen::gen::{FileMap, Plugin};
use gluegen::plugins::{CapiPlugin, InternalPlugin, PybindPlugin};

const CONFIG: &str = r#"{
    "opcodes": {
        "OP": {"operation": "foo(out, shape, in)", "derivative": "dfoo(args, idx)"},
        "OP1": {"operation": "bar(out, in)", "derivative": "dbar(args, idx)"}
    },
    "dtypes": {
        "CAR": "char",
        "VROOM": "double"
    },
    "signatures": {
        "data": {"in": "In_Type", "out": "Out_Type"},
        "grad": {"out": "ade::TensptrT", "in": "ade::FuncArg"}
    },
    "apis": [
        {"name": "func1", "args": [], "out": "bar1()"},
        {
            "name": "func2",
            "args": [
                {"dtype": "ade::TensptrT", "name": "arg"},
                {
                    "dtype": "Arg",
                    "name": "arg1",
                    "c": {
                        "args": [
                            {"dtype": "int", "name": "n_arg1"},
                            {"dtype": "float", "name": "arg1_f"}
                        ],
                        "convert": "Arg(arg1_f, n_arg1)"
                    }
                }
            ],
            "out": "bar2(arg, arg1)"
        },
        {
            "name": "func1",
            "args": [{"dtype": "Arg", "name": "arg1", "default": "Arg(2.4, 20)"}],
            "out": "bar4(arg1)",
            "description": "more complicated func1"
        }
    ]
}"#;

fn config() -> Config {
    Config::parse_str(CONFIG).unwrap()
}

fn internal_files() -> FileMap {
    InternalPlugin.process(FileMap::new(), &config()).unwrap()
}

#[test]
fn test_codes_header() {
    let expected = r#"#ifndef _GENERATED_CODES_HPP
#define _GENERATED_CODES_HPP

namespace age
{

enum _GENERATED_OPCODE
{
    BAD_OP = 0,
    OP,
    OP1,
    _N_GENERATED_OPCODES,
};

enum _GENERATED_DTYPE
{
    BAD_TYPE = 0,
    CAR,
    VROOM,
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

template <>
_GENERATED_DTYPE get_type<char> (void);

template <>
_GENERATED_DTYPE get_type<double> (void);

}

#endif // _GENERATED_CODES_HPP
"#;
    assert_eq!(internal_files()["codes.hpp"].text(), expected);
}

#[test]
fn test_codes_source() {
    let expected = r#"#ifdef _GENERATED_CODES_HPP

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
    { OP, "OP" },
    { OP1, "OP1" },
};

static std::unordered_map<std::string,_GENERATED_OPCODE> name2code =
{
    { "OP", OP },
    { "OP1", OP1 },
};

static std::unordered_map<_GENERATED_DTYPE,std::string,EnumHash> type2name =
{
    { CAR, "CAR" },
    { VROOM, "VROOM" },
};

static std::unordered_map<std::string,_GENERATED_DTYPE> name2type =
{
    { "CAR", CAR },
    { "VROOM", VROOM },
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
        case CAR: return sizeof(char);
        case VROOM: return sizeof(double);
        default: logs::fatal("cannot get size of bad type");
    }
    return 0;
}

template <>
_GENERATED_DTYPE get_type<char> (void)
{
    return CAR;
}

template <>
_GENERATED_DTYPE get_type<double> (void)
{
    return VROOM;
}

}

#endif
"#;
    assert_eq!(internal_files()["codes.cpp"].text(), expected);
}

#[test]
fn test_api_header() {
    let expected = r#"#ifndef _GENERATED_API_HPP
#define _GENERATED_API_HPP

namespace age
{

ade::TensptrT func1 ();

ade::TensptrT func2 (ade::TensptrT arg, Arg arg1);

/**
more complicated func1
**/
ade::TensptrT func1 (Arg arg1 = Arg(2.4, 20));

}

#endif // _GENERATED_API_HPP
"#;
    assert_eq!(internal_files()["api.hpp"].text(), expected);
}

#[test]
fn test_api_source() {
    let expected = r#"#ifdef _GENERATED_API_HPP

namespace age
{

ade::TensptrT func1 ()
{
    if (false)
    {
        logs::fatal("cannot func1 with a null argument");
    }
    return bar1();
}

ade::TensptrT func2 (ade::TensptrT arg, Arg arg1)
{
    if (arg == nullptr)
    {
        logs::fatal("cannot func2 with a null argument");
    }
    return bar2(arg, arg1);
}

ade::TensptrT func1 (Arg arg1)
{
    if (false)
    {
        logs::fatal("cannot func1 with a null argument");
    }
    return bar4(arg1);
}

}

#endif
"#;
    assert_eq!(internal_files()["api.cpp"].text(), expected);
}

#[test]
fn test_data_header() {
    let expected = r#"#ifndef _GENERATED_DATA_HPP
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
        case CAR:
            out = std::vector<OUTTYPE>((char*) input,
                (char*) input + nelems); break;
        case VROOM:
            out = std::vector<OUTTYPE>((double*) input,
                (double*) input + nelems); break;
        default:
            logs::fatalf("invalid input type %s",
                age::name_type(intype).c_str());
    }
}

}

#endif // _GENERATED_DATA_HPP
"#;
    assert_eq!(internal_files()["data.hpp"].text(), expected);
}

#[test]
fn test_grader_header() {
    let expected = r#"#ifndef _GENERATED_GRADER_HPP
#define _GENERATED_GRADER_HPP

namespace age
{

#define _AGE_INTERNAL_GRADSWITCH()\
case OP: return dfoo(args, idx);\
case OP1: return dbar(args, idx);

ade::TensptrT chain_rule (ade::iFunctor* fwd,
    ade::FuncArg bwd, ade::TensT args, size_t idx);

}

#endif // _GENERATED_GRADER_HPP
"#;
    assert_eq!(internal_files()["grader.hpp"].text(), expected);
}

#[test]
fn test_grader_source() {
    let expected = r#"#ifdef _GENERATED_GRADER_HPP

namespace age
{

ade::TensptrT chain_rule (ade::iFunctor* fwd,
    ade::FuncArg bwd, ade::TensT args, size_t idx)
{
    switch (fwd->get_opcode().code_)
    {
        _AGE_INTERNAL_GRADSWITCH()
        default: logs::fatal("no gradient rule for unknown opcode");
    }
    ade::TensptrT defval;
    return defval;
}

}

#endif
"#;
    assert_eq!(internal_files()["grader.cpp"].text(), expected);
}

#[test]
fn test_opmap_header() {
    let expected = r#"#ifndef _GENERATED_OPERA_HPP
#define _GENERATED_OPERA_HPP

namespace age
{

template <typename T>
void typed_exec (Out_Type out, _GENERATED_OPCODE opcode, ade::Shape shape, In_Type in)
{
    switch (opcode)
    {
        case OP:
            foo(out, shape, in); break;
        case OP1:
            bar(out, in); break;
        default: logs::fatal("unknown opcode");
    }
}

// GENERIC_MACRO must accept a real type as an argument.
// e.g.:
// #define GENERIC_MACRO(REAL_TYPE) run<REAL_TYPE>(args...);
// ...
// TYPE_LOOKUP(GENERIC_MACRO, type_code)
#define TYPE_LOOKUP(GENERIC_MACRO, DTYPE)\
switch (DTYPE) {\
    case age::CAR: GENERIC_MACRO(char) break;\
    case age::VROOM: GENERIC_MACRO(double) break;\
    default: logs::fatal("executing bad type");\
}

}

#endif // _GENERATED_OPERA_HPP
"#;
    assert_eq!(internal_files()["opmap.hpp"].text(), expected);
}

#[test]
fn test_capi_header() {
    let files = CapiPlugin.process(FileMap::new(), &config()).unwrap();
    let expected = r#"#ifndef _GENERATED_CAPI_HPP
#define _GENERATED_CAPI_HPP

int64_t register_tens (ade::iTensor* ptr);

int64_t register_tens (ade::TensptrT& ptr);

ade::TensptrT get_tens (int64_t id);

extern void free_tens (int64_t id);

extern void get_shape (int outshape[8], int64_t tens);

extern int64_t age_func1 ();

extern int64_t age_func2 (int64_t arg, int n_arg1, float arg1_f);

extern int64_t age_func1_1 (Arg arg1);

#endif // _GENERATED_CAPI_HPP
"#;
    assert_eq!(files["capi.hpp"].text(), expected);
}

#[test]
fn test_capi_source() {
    let files = CapiPlugin.process(FileMap::new(), &config()).unwrap();
    let expected = r#"#ifdef _GENERATED_CAPI_HPP

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

int64_t age_func1 ()
{
    auto ptr = age::func1();
    int64_t id = (int64_t) ptr.get();
    tens.emplace(id, ptr);
    return id;
}

int64_t age_func2 (int64_t arg, int n_arg1, float arg1_f)
{
    ade::TensptrT arg_ptr = get_tens(arg);
    auto ptr = age::func2(arg_ptr, Arg(arg1_f, n_arg1));
    int64_t id = (int64_t) ptr.get();
    tens.emplace(id, ptr);
    return id;
}

int64_t age_func1_1 (Arg arg1)
{
    auto ptr = age::func1(arg1);
    int64_t id = (int64_t) ptr.get();
    tens.emplace(id, ptr);
    return id;
}

#endif
"#;
    assert_eq!(files["capi.cpp"].text(), expected);
}

#[test]
fn test_pybind_source() {
    let files = PybindPlugin.process(FileMap::new(), &config()).unwrap();
    let expected = r#"namespace py = pybind11;

namespace pyage
{

ade::TensptrT func1_0 ()
{
    return age::func1();
}

ade::TensptrT func2_1 (ade::TensptrT arg, Arg arg1)
{
    return age::func2(arg, arg1);
}

ade::TensptrT func1_2 (Arg arg1)
{
    return age::func1(arg1);
}

}

PYBIND11_MODULE(age, m)
{
    m.doc() = "pybind ade generator";

    py::class_<ade::iTensor,ade::TensptrT> tensor(m, "Tensor");

    m.def("func1", &pyage::func1_0, "ade::TensptrT func1 ()");
    m.def("func2", &pyage::func2_1, "ade::TensptrT func2 (ade::TensptrT arg, Arg arg1)", py::arg("arg"), py::arg("arg1"));
    m.def("func1_1", &pyage::func1_2, "ade::TensptrT func1 (Arg arg1 = Arg(2.4, 20)): more complicated func1", py::arg("arg1") = Arg(2.4, 20));
}
"#;
    assert_eq!(files["pyapi.cpp"].text(), expected);
}

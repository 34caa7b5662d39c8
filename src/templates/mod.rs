//! Generated-artifact templates
//!
//! One module per output artifact family, each exposing constructors for its
//! header/source [`Template`](crate::gen::Template) pair:
//!
//! - [`codes`]: opcode/dtype enumerations, name lookup tables, `type_size`
//! - [`api`]: typed API declarations and definitions with null guards
//! - [`data`]: typed data-conversion dispatch
//! - [`grader`]: gradient dispatch-by-opcode switch
//! - [`opera`]: generic execution dispatch and the `TYPE_LOOKUP` macro
//!
//! Skeleton constants end up in the generated files verbatim, so their
//! formatting is part of the output contract; every enumeration inside them
//! walks its vocabulary through [`ordered`](crate::gen::ordered).

pub mod api;
pub mod codes;
pub mod data;
pub mod grader;
pub mod opera;

/// File extension for generated declaration files.
pub const HEADER_EXT: &str = ".hpp";

/// File extension for generated definition files.
pub const SOURCE_EXT: &str = ".cpp";

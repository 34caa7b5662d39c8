//! gluegen - Declarative C++ glue-layer generator
//!
//! From one JSON configuration describing a closed vocabulary of operation
//! codes, data types, API signatures, and gradient rules, `gluegen` renders
//! a coherent set of paired declaration/definition files wired together by
//! explicit file-to-file dependency declarations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  JSON document  │  opcodes / dtypes / apis / signatures
//! └────────┬────────┘
//!          │ Config
//!          ▼
//! ┌─────────────────┐
//! │   Templates     │  skeletons + slot renderers, dotted-path lookups
//! └────────┬────────┘
//!          │ rendered text + include metadata
//!          ▼
//! ┌─────────────────┐
//! │    Plugins      │  internal / capi / pybind / ruleset
//! └────────┬────────┘
//!          │ merged file map (last plugin wins on collision)
//!          ▼
//! ┌─────────────────┐
//! │     Dump        │  stdout or output directory
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use gluegen::config::Config;
//! use gluegen::gen::{FileMap, Plugin};
//! use gluegen::plugins::InternalPlugin;
//!
//! let config = Config::parse_str(r#"{
//!     "opcodes": {"ADD": {"operation": "add(out, in)", "derivative": "one()"}},
//!     "dtypes": {"F32": "float"},
//!     "signatures": {
//!         "data": {"in": "In_Type", "out": "Out_Type"},
//!         "grad": {"out": "ade::TensptrT", "in": "ade::FuncArg"}
//!     },
//!     "apis": []
//! }"#).unwrap();
//!
//! let files = InternalPlugin.process(FileMap::new(), &config).unwrap();
//! assert!(files["codes.hpp"].text().contains("ADD,"));
//! ```

pub mod config;
pub mod gen;
pub mod plugins;
pub mod templates;

pub use config::Config;
pub use gen::{generate, Dump, FileDump, FileMap, FileRep, GenError, GenResult, Plugin, PrintDump};

//! Generation Engine
//!
//! The engine that turns one configuration document into a set of rendered
//! output files. It is built from four pieces:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                Config (JSON document)                  │
//! └───────────────────────┬───────────────────────────────┘
//!                         │ dotted-path lookups
//!                         ▼
//! ┌───────────────────────────────────────────────────────┐
//! │   Template (skeleton + slot renderers) → String        │
//! └───────────────────────┬───────────────────────────────┘
//!                         │ wrapped with include metadata
//!                         ▼
//! ┌───────────────────────────────────────────────────────┐
//! │   Plugin::process(FileMap, &Config) → FileMap          │
//! └───────────────────────┬───────────────────────────────┘
//!                         │ threaded through in caller order
//!                         ▼
//! ┌───────────────────────────────────────────────────────┐
//! │   generate() → Dump (stdout or output directory)       │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Generation is a single-pass, deterministic function of its input: the same
//! configuration always produces a byte-identical file map. Any error aborts
//! the whole run before the sink sees a single file.

pub mod dump;
pub mod file_rep;
pub mod template;

pub use dump::{Dump, FileDump, PrintDump};
pub use file_rep::{FileMap, FileRep};
pub use template::{ordered, resolve_path, RenderFn, Slot, Template, Vocab};

use crate::config::Config;
use thiserror::Error;

/// Errors that can occur while loading configuration or rendering output.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration root must be a JSON object")]
    BadRoot,

    #[error("duplicate {domain} key: {key}")]
    DuplicateKey { domain: &'static str, key: String },

    #[error("bad configuration shape at `{path}`: {source}")]
    BadShape {
        path: String,
        source: serde_json::Error,
    },

    #[error("missing required configuration entry `{0}`")]
    MissingDomain(String),

    #[error("template `{template}`: hole `{hole}` has no bound renderer")]
    UnboundHole { template: String, hole: String },

    #[error("template `{template}`: slot `{slot}` is never referenced by the skeleton")]
    UnusedSlot { template: String, slot: String },

    #[error("template `{template}`: unterminated hole marker")]
    UnterminatedHole { template: String },
}

/// Result type for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// A named unit that contributes one or more rendered files to the output set.
///
/// Plugins receive the file map accumulated so far and return it with their
/// own entries inserted. Inserting under a path that already exists
/// overwrites the earlier entry; this is intentional and some plugins (the
/// ruleset plugin) exist precisely to replace another plugin's output.
pub trait Plugin {
    /// Stable identifier for the plugin
    fn plugin_id(&self) -> &'static str;

    /// Render this plugin's files into the accumulated map
    fn process(&self, generated: FileMap, config: &Config) -> GenResult<FileMap>;
}

/// Run every plugin in order against one configuration and hand the merged
/// file map to the sink.
///
/// Plugin order matters: a later plugin inserting under an existing path
/// wins. The sink receives the map as a read-only snapshot after all plugins
/// have finished, so a failing plugin never produces partial output.
pub fn generate(config: &Config, plugins: &[&dyn Plugin], out: &mut dyn Dump) -> GenResult<()> {
    let mut files = FileMap::new();
    for plugin in plugins {
        files = plugin.process(files, config)?;
    }
    out.dump(&files)
}

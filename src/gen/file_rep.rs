//! File records
//!
//! A [`FileRep`] wraps one rendered artifact's text together with the
//! includes it needs: externally-owned headers (`includes`, already quoted
//! or angle-bracketed by the plugin that supplied them) and references to
//! other generated artifacts (`internal_refs`, bare output paths). Internal
//! refs are metadata for the sink and for any external consistency check;
//! nothing validates them at render time.

use std::collections::BTreeMap;

/// The merged output set: canonical output path to file record.
///
/// A `BTreeMap` so sinks walk the entries in a stable order.
pub type FileMap = BTreeMap<String, FileRep>;

/// Rendered text plus include/reference metadata for one output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRep {
    text: String,
    /// Externally-owned include directives, in emission order.
    pub includes: Vec<String>,
    /// Output paths of generated artifacts this one depends on.
    pub internal_refs: Vec<String>,
}

impl FileRep {
    pub fn new(text: String, includes: Vec<String>, internal_refs: Vec<String>) -> Self {
        Self {
            text,
            includes,
            internal_refs,
        }
    }

    /// The rendered body, without the include block.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Full file contents: user includes, then internal refs (quoted, with
    /// the sink's directory prefix), a separating blank line, then the body.
    pub fn assemble(&self, include_prefix: &str) -> String {
        let mut lines: Vec<String> = self
            .includes
            .iter()
            .map(|inc| format!("#include {inc}"))
            .collect();
        for fref in &self.internal_refs {
            if include_prefix.is_empty() {
                lines.push(format!("#include \"{fref}\""));
            } else {
                lines.push(format!("#include \"{include_prefix}/{fref}\""));
            }
        }
        if lines.is_empty() {
            self.text.clone()
        } else {
            format!("{}\n\n{}", lines.join("\n"), self.text)
        }
    }
}

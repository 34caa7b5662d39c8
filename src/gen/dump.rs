//! Output sinks
//!
//! The engine hands its finished file map to a [`Dump`]: either every entry
//! is printed to stdout behind a banner, or each file is written under an
//! output directory. The sink is the only component that performs I/O.

use super::file_rep::FileMap;
use super::GenResult;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Consumer of the final, read-only file map.
pub trait Dump {
    fn dump(&mut self, files: &FileMap) -> GenResult<()>;
}

/// Print every file to a writer (stdout by default) behind a path banner.
pub struct PrintDump<W: io::Write = io::Stdout> {
    out: W,
}

impl PrintDump {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for PrintDump {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: io::Write> PrintDump<W> {
    pub fn to_writer(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer, typically to inspect captured output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Dump for PrintDump<W> {
    fn dump(&mut self, files: &FileMap) -> GenResult<()> {
        for (fpath, rep) in files {
            writeln!(self.out, "==== {fpath} ====")?;
            self.out.write_all(rep.assemble("").as_bytes())?;
            writeln!(self.out)?;
        }
        Ok(())
    }
}

/// Write every file under an output directory.
///
/// Include directives for generated headers are emitted relative to the
/// output directory with `strip_prefix` removed from its front, so the
/// generated tree compiles from the project root rather than from the
/// output directory itself.
pub struct FileDump {
    outdir: PathBuf,
    include_prefix: String,
}

impl FileDump {
    pub fn new(outdir: impl Into<PathBuf>, strip_prefix: &str) -> Self {
        let outdir = outdir.into();
        let display = outdir.to_string_lossy();
        let include_prefix = display
            .strip_prefix(strip_prefix)
            .unwrap_or(&display)
            .trim_matches('/')
            .to_string();
        Self {
            outdir,
            include_prefix,
        }
    }

    /// The prefix prepended to internal-reference includes.
    pub fn include_prefix(&self) -> &str {
        &self.include_prefix
    }
}

impl Dump for FileDump {
    fn dump(&mut self, files: &FileMap) -> GenResult<()> {
        fs::create_dir_all(&self.outdir)?;
        for (fpath, rep) in files {
            fs::write(self.outdir.join(fpath), rep.assemble(&self.include_prefix))?;
        }
        Ok(())
    }
}

//! gluegen - Declarative C++ glue-layer generator
//!
//! CLI entry point: load a JSON configuration, run the selected plugins,
//! and dump the generated files to a directory or to stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gluegen::config::Config;
use gluegen::gen::{generate, Dump, FileDump, Plugin, PrintDump};
use gluegen::plugins::{CapiPlugin, InternalPlugin, PybindPlugin, RulesetPlugin};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gluegen")]
#[command(version)]
#[command(about = "Generate C++ glue layers from a JSON operator configuration", long_about = None)]
struct Cli {
    /// Configuration file (reads stdin when omitted)
    #[arg(long)]
    cfg: Option<PathBuf>,

    /// Output directory (prints to stdout when omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Prefix stripped from the output directory when forming generated
    /// include paths
    #[arg(long, default_value = "")]
    strip_prefix: String,

    /// Plugins to apply, in order; later plugins overwrite colliding paths
    #[arg(long, value_enum, value_delimiter = ',', default_value = "internal")]
    plugins: Vec<PluginKind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PluginKind {
    Internal,
    Capi,
    Pybind,
    Ruleset,
}

impl PluginKind {
    fn instance(self) -> &'static dyn Plugin {
        match self {
            PluginKind::Internal => &InternalPlugin,
            PluginKind::Capi => &CapiPlugin,
            PluginKind::Pybind => &PybindPlugin,
            PluginKind::Ruleset => &RulesetPlugin,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.cfg {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::from_reader(io::stdin())
            .context("failed to read configuration from stdin")?,
    };

    let plugins: Vec<&dyn Plugin> = cli.plugins.iter().map(|kind| kind.instance()).collect();

    let mut sink: Box<dyn Dump> = match &cli.out {
        Some(outdir) => Box::new(FileDump::new(outdir, &cli.strip_prefix)),
        None => Box::new(PrintDump::new()),
    };

    generate(&config, &plugins, sink.as_mut()).context("generation failed")?;
    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jt_runner::Framework;

#[derive(Debug, Parser)]
#[command(name = "jstest")]
#[command(about = "Runs browser-style JavaScript test suites headlessly")]
pub(crate) struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long = "log-level", global = true, default_value = "info")]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Run every discovered suite and write reports.
    Run(RunArgs),
    /// Print the suites a run would process.
    List(SelectionArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SelectionArgs {
    #[arg(long = "config")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long = "basedir")]
    pub(crate) basedir: Option<PathBuf>,
    #[arg(long = "include")]
    pub(crate) includes: Vec<String>,
    #[arg(long = "exclude")]
    pub(crate) excludes: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    #[arg(long = "framework", value_enum)]
    pub(crate) framework: Option<FrameworkArg>,
    #[arg(long = "reimport-scripts")]
    pub(crate) reimport_scripts: bool,
    #[arg(long = "resources-dir")]
    pub(crate) resource_dirs: Vec<PathBuf>,
    #[arg(long = "results-dir")]
    pub(crate) results_dir: Option<PathBuf>,
    #[arg(long = "dom-shim")]
    pub(crate) dom_shim: Option<String>,
    #[arg(long = "max-loader-rounds")]
    pub(crate) max_loader_rounds: Option<usize>,
    #[arg(long = "escape-xml")]
    pub(crate) escape_xml: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FrameworkArg {
    ScrewUnit,
    Qunit,
}

impl From<FrameworkArg> for Framework {
    fn from(value: FrameworkArg) -> Self {
        match value {
            FrameworkArg::ScrewUnit => Framework::ScrewUnit,
            FrameworkArg::Qunit => Framework::QUnit,
        }
    }
}

use std::ffi::OsString;

use clap::Parser;
use jt_core::JsTestError;
use jt_runner::{collect_suites, RunConfig, SuiteRunner};
use jt_runtime::BoaRuntimeFactory;

mod cli_args;
mod error_map;
mod logging;

#[cfg(test)]
pub(crate) use cli_args::FrameworkArg;
pub(crate) use cli_args::{Cli, Mode, RunArgs, SelectionArgs};
pub(crate) use error_map::{emit_error, emit_outcome, emit_run_error, emit_suite_list};
pub(crate) use logging::init_logging;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging(&cli.log_level);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(&error),
    }
}

fn run(cli: Cli) -> Result<i32, JsTestError> {
    match cli.command {
        Mode::Run(args) => run_suites(args),
        Mode::List(args) => list_suites(args),
    }
}

fn run_suites(args: RunArgs) -> Result<i32, JsTestError> {
    let config = build_run_config(&args)?;
    let factory = BoaRuntimeFactory::new(config.runtime_options());
    let runner = SuiteRunner::new(config, Box::new(factory))?;
    Ok(match runner.run_discovered() {
        Ok(outcome) => emit_outcome(&outcome),
        Err(error) => {
            tracing::error!("{}", error);
            emit_run_error(&error)
        }
    })
}

fn list_suites(args: SelectionArgs) -> Result<i32, JsTestError> {
    let config = apply_selection(&args)?;
    let suites = collect_suites(
        &config.basedir,
        &config.effective_includes(),
        &config.excludes,
    )?;
    Ok(emit_suite_list(&suites))
}

/// Config file first, then flags on top.
fn apply_selection(args: &SelectionArgs) -> Result<RunConfig, JsTestError> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(basedir) = &args.basedir {
        config.basedir = basedir.clone();
    }
    if !args.includes.is_empty() {
        config.includes = args.includes.clone();
    }
    config.excludes.extend(args.excludes.iter().cloned());
    Ok(config)
}

fn build_run_config(args: &RunArgs) -> Result<RunConfig, JsTestError> {
    let mut config = apply_selection(&args.selection)?;
    if let Some(framework) = args.framework {
        config.framework = framework.into();
    }
    if args.reimport_scripts {
        config.reimport_scripts = true;
    }
    if !args.resource_dirs.is_empty() {
        config.resource_dirs = args.resource_dirs.clone();
    }
    if let Some(results_dir) = &args.results_dir {
        config.results_dir = results_dir.clone();
    }
    if let Some(dom_shim) = &args.dom_shim {
        config.dom_shim = dom_shim.clone();
    }
    if let Some(rounds) = args.max_loader_rounds {
        config.max_loader_rounds = rounds;
    }
    if args.escape_xml {
        config.escape_xml = true;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests;

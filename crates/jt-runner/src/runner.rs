use std::path::PathBuf;
use std::time::{Duration, Instant};

use jt_core::{JsTestError, Suite, SuitePhase, SuiteReport};
use jt_report::{write_human_report, write_junit_report};
use jt_runtime::{Bootstrapper, ResourceBundle, RuntimeFactory};
use thiserror::Error;

use crate::adapter::{adapter_for, TestAdapter};
use crate::config::RunConfig;
use crate::discovery::collect_suites;

const FOCUS_FIXUP: &str = "jQuery('body > .describe > .describes > .describe').addClass('focused');";

/// Why a run stopped early.
#[derive(Debug, Error)]
pub enum RunError {
    /// A suite reported at least one failing test.
    #[error("Test error: {message}")]
    Failure { suite: String, message: String },
    #[error("This runner has experienced an unexpected error. Please take some time to report the problem: {0}")]
    Unexpected(#[from] JsTestError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteRun {
    pub suite: String,
    pub elapsed: Duration,
    pub report: SuiteReport,
    pub human_report: PathBuf,
    pub junit_report: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoTests,
    Passed(Vec<SuiteRun>),
}

impl RunOutcome {
    pub fn runs(&self) -> &[SuiteRun] {
        match self {
            Self::NoTests => &[],
            Self::Passed(runs) => runs,
        }
    }

    pub fn tests_run(&self) -> usize {
        self.runs().iter().map(|run| run.report.tests_run()).sum()
    }
}

/// Runs suites one at a time, each in a fresh sandbox, and stops at the
/// first suite with a failing test.
pub struct SuiteRunner {
    config: RunConfig,
    bootstrapper: Bootstrapper,
    adapter: Box<dyn TestAdapter>,
}

impl SuiteRunner {
    /// Builds the sandbox bootstrapper and framework adapter `config` asks for.
    pub fn new(config: RunConfig, factory: Box<dyn RuntimeFactory>) -> Result<Self, JsTestError> {
        config.validate()?;
        let resources = ResourceBundle::new(config.resource_dirs.clone());
        let bootstrapper = Bootstrapper::new(factory, resources, config.dom_shim.clone());
        let adapter = adapter_for(&config);
        Ok(Self::with_parts(config, bootstrapper, adapter))
    }

    pub fn with_parts(
        config: RunConfig,
        bootstrapper: Bootstrapper,
        adapter: Box<dyn TestAdapter>,
    ) -> Self {
        Self {
            config,
            bootstrapper,
            adapter,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn discover(&self) -> Result<Vec<String>, JsTestError> {
        tracing::info!("Basedir: {}", self.config.basedir.display());
        collect_suites(
            &self.config.basedir,
            &self.config.effective_includes(),
            &self.config.excludes,
        )
    }

    pub fn run_discovered(&self) -> Result<RunOutcome, RunError> {
        let suites = self.discover()?;
        self.run(&suites)
    }

    /// Runs `suites` in the given order.
    pub fn run(&self, suites: &[String]) -> Result<RunOutcome, RunError> {
        if suites.is_empty() {
            tracing::info!("No tests to run.");
            return Ok(RunOutcome::NoTests);
        }

        let mut runs = Vec::with_capacity(suites.len());
        for name in suites {
            let run = self.run_suite(name)?;
            tracing::info!(
                "{} test(s), {} failure(s)",
                run.report.tests_run(),
                run.report.error_count()
            );
            if let Some(message) = run.report.first_error() {
                return Err(RunError::Failure {
                    suite: name.clone(),
                    message: message.to_string(),
                });
            }
            runs.push(run);
        }
        Ok(RunOutcome::Passed(runs))
    }

    /// Processes one suite end to end and writes both reports. The sandbox
    /// is dropped before returning, whatever the outcome.
    pub fn run_suite(&self, name: &str) -> Result<SuiteRun, JsTestError> {
        let started = Instant::now();
        tracing::info!("Running {} suite: {}", self.adapter.framework(), name);
        let suite = Suite::new(&self.config.basedir, name);

        let mut context = self
            .bootstrapper
            .new_sandbox()
            .map_err(|error| error.in_suite(name, SuitePhase::Bootstrap))?;
        self.adapter
            .run_suite(&mut context, &suite)
            .map_err(|error| error.in_suite(name, SuitePhase::Run))?;
        let elapsed = started.elapsed();

        if let Err(error) = context.exec(FOCUS_FIXUP, "describe focus fix") {
            tracing::warn!(suite = name, error = %error, "cosmetic fixup failed");
        }

        let report = self
            .adapter
            .parse_report(&mut context)
            .map_err(|error| error.in_suite(name, SuitePhase::Parse))?;

        let results_dir = self.config.resolved_results_dir();
        let dotted = suite.dotted_name();
        let human_report = self
            .adapter
            .render_human_report(&mut context, &suite)
            .and_then(|html| write_human_report(&results_dir, &dotted, &html))
            .map_err(|error| error.in_suite(name, SuitePhase::HumanReport))?;
        let junit_report = write_junit_report(
            &results_dir,
            &dotted,
            elapsed,
            &report,
            self.config.escaping(),
        )
        .map_err(|error| error.in_suite(name, SuitePhase::JunitReport))?;
        drop(context);

        Ok(SuiteRun {
            suite: name.to_string(),
            elapsed,
            report,
            human_report,
            junit_report,
        })
    }
}

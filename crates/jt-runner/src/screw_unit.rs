use jt_core::{JsTestError, Suite, SuiteReport};
use jt_runtime::{DependencyLoader, ExecutionContext, LoaderLimits, PageScripts, HELPERS_SCRIPT};

use crate::adapter::{report_from_records, TestAdapter};
use crate::config::Framework;

pub const SCREW_UNIT_RUNNER: &str = "screwunit-runner.js";

const START_SCRIPT: &str = "jQuery(window).trigger('load');Envjs.wait();";

/// Screw.Unit suites pull their scripts in through the page, so the
/// dependency loader runs after navigation and before the load event.
#[derive(Debug, Clone, Copy)]
pub struct ScrewUnitAdapter {
    loader: DependencyLoader,
}

impl ScrewUnitAdapter {
    pub fn new(reimport: bool, limits: LoaderLimits) -> Self {
        Self {
            loader: DependencyLoader::new(reimport, limits),
        }
    }
}

impl TestAdapter for ScrewUnitAdapter {
    fn framework(&self) -> Framework {
        Framework::ScrewUnit
    }

    fn run_suite(&self, context: &mut ExecutionContext, suite: &Suite) -> Result<(), JsTestError> {
        context.exec_bundled(HELPERS_SCRIPT)?;
        context.exec_bundled(SCREW_UNIT_RUNNER)?;
        context.navigate(suite.path())?;

        let stats = self
            .loader
            .load_all(&mut PageScripts::new(context, suite.dir()))?;
        tracing::debug!(
            scripts = stats.executed.len(),
            discoveries = stats.discoveries,
            "loaded page scripts"
        );

        context.exec(START_SCRIPT, "start")
    }

    fn parse_report(&self, context: &mut ExecutionContext) -> Result<SuiteReport, JsTestError> {
        let records = context.call("jtmp_failure_messages", &[])?;
        report_from_records(records, "jtmp_failure_messages")
    }
}

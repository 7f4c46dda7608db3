use jt_core::{JsTestError, Suite, SuiteReport};
use jt_runtime::{ExecutionContext, HELPERS_SCRIPT};

use crate::adapter::{report_from_records, TestAdapter};
use crate::config::Framework;

pub const QUNIT_RUNNER: &str = "qunit-runner.js";

const FRAMEWORK_SCRIPTS: [&str; 2] = ["jquery.js", "qunit.js"];

/// QUnit pages load their own scripts, so no dependency loader is involved.
/// Results are captured through `QUnit.log`/`QUnit.testDone` hooks installed
/// before the runner starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct QUnitAdapter;

impl TestAdapter for QUnitAdapter {
    fn framework(&self) -> Framework {
        Framework::QUnit
    }

    fn run_suite(&self, context: &mut ExecutionContext, suite: &Suite) -> Result<(), JsTestError> {
        context.exec_bundled(HELPERS_SCRIPT)?;
        for script in FRAMEWORK_SCRIPTS {
            context.exec_bundled(script)?;
        }
        context.call("jtmp_qunit_install", &[])?;
        context.exec_bundled(QUNIT_RUNNER)?;
        context.navigate(suite.path())?;
        context.exec("Envjs.wait();", "start")
    }

    fn parse_report(&self, context: &mut ExecutionContext) -> Result<SuiteReport, JsTestError> {
        let records = context.call("jtmp_qunit_results", &[])?;
        report_from_records(records, "jtmp_qunit_results")
    }
}

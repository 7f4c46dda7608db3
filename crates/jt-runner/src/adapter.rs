use std::fs;

use jt_core::{JsTestError, ScriptValue, Suite, SuiteReport};
use jt_report::render_html_document;
use jt_runtime::ExecutionContext;

use crate::config::{Framework, RunConfig};
use crate::qunit::QUnitAdapter;
use crate::screw_unit::ScrewUnitAdapter;

const BODY_MARKUP: &str = "jQuery('body').html()";

/// Drives one test framework inside a prepared sandbox.
pub trait TestAdapter {
    fn framework(&self) -> Framework;

    /// Loads the framework, the suite page and its scripts, then runs the
    /// tests to completion.
    fn run_suite(&self, context: &mut ExecutionContext, suite: &Suite) -> Result<(), JsTestError>;

    fn parse_report(&self, context: &mut ExecutionContext) -> Result<SuiteReport, JsTestError>;

    /// Standalone HTML snapshot of the rendered page.
    fn render_human_report(
        &self,
        context: &mut ExecutionContext,
        suite: &Suite,
    ) -> Result<String, JsTestError> {
        render_page_snapshot(context, suite, self.framework())
    }
}

pub fn adapter_for(config: &RunConfig) -> Box<dyn TestAdapter> {
    match config.framework {
        Framework::ScrewUnit => Box::new(ScrewUnitAdapter::new(
            config.reimport_scripts,
            config.loader_limits(),
        )),
        Framework::QUnit => Box::new(QUnitAdapter),
    }
}

/// Turns `[{test, error}, ...]` records into a report. A `null` test name
/// reads as empty, a `null` error as a pass.
pub(crate) fn report_from_records(
    value: ScriptValue,
    origin: &str,
) -> Result<SuiteReport, JsTestError> {
    let records = match value {
        ScriptValue::Array(records) => records,
        other => {
            return Err(JsTestError::value_shape(
                origin,
                "array of test records",
                other.type_name(),
            ))
        }
    };

    let mut report = SuiteReport::new();
    for record in records {
        let Some(fields) = record.as_map() else {
            return Err(JsTestError::value_shape(
                origin,
                "test record",
                record.type_name(),
            ));
        };
        let name = fields
            .get("test")
            .and_then(ScriptValue::to_text)
            .unwrap_or_default();
        let error = fields.get("error").and_then(ScriptValue::to_text);
        report.add_outcome(name, error);
    }
    Ok(report)
}

fn inline_stylesheets(context: &mut ExecutionContext, suite: &Suite) -> Result<String, JsTestError> {
    let mut css = String::new();
    for href in context.call_string_list("jtmp_locate_css")? {
        let path = suite.dir().join(&href);
        let content = fs::read_to_string(&path)
            .map_err(|source| JsTestError::ReadFile { path, source })?;
        css.push_str(&content);
        css.push('\n');
    }
    Ok(css)
}

pub(crate) fn render_page_snapshot(
    context: &mut ExecutionContext,
    suite: &Suite,
    framework: Framework,
) -> Result<String, JsTestError> {
    let css = inline_stylesheets(context, suite)?;
    let body = context
        .evaluate(BODY_MARKUP, "report body")?
        .to_text()
        .unwrap_or_default();
    let title = format!("{} test report for {}", framework.report_label(), suite.name());
    Ok(render_html_document(&title, &css, &body))
}

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use jt_core::{JsTestError, SuiteReport};

use crate::{Escaping, XmlError, XmlRenderer};

pub const JUNIT_FAILURE_TYPE: &str = "jstest.TestFailure";

pub fn junit_report_path(results_dir: &Path, dotted_name: &str) -> PathBuf {
    results_dir.join(format!("TEST-{}.xml", dotted_name))
}

/// Renders a `<testsuite>` document. Elapsed time is split evenly across the
/// test cases.
pub fn render_junit_report<W: Write>(
    writer: W,
    dotted_name: &str,
    elapsed: Duration,
    report: &SuiteReport,
    escaping: Escaping,
) -> Result<W, XmlError> {
    let millis = elapsed.as_millis() as f64;
    let case_time = format!("{:.3}", millis / (report.tests_run() as f64 * 1000.0));

    let mut renderer = XmlRenderer::with_escaping(writer, escaping)?;
    renderer
        .start("testsuite")?
        .attr("failures", report.error_count())?
        .attr("time", format!("{:.3}", millis / 1000.0))?
        .attr("skipped", "0")?
        .attr("errors", 0)?
        .attr("tests", report.tests_run())?
        .attr("name", dotted_name)?
        .start("properties")?
        .end()?;

    for test in report.tests() {
        renderer
            .start("testcase")?
            .attr("time", &case_time)?
            .attr("name", &test.name)?
            .attr("classname", dotted_name)?;
        if let Some(error) = &test.error {
            renderer
                .start("failure")?
                .attr("message", error)?
                .attr("type", JUNIT_FAILURE_TYPE)?
                .text(&format!("{}: {}", test.name, error))?
                .end()?;
        }
        renderer.end()?;
    }
    renderer.end()?;
    renderer.finish()
}

pub fn write_junit_report(
    results_dir: &Path,
    dotted_name: &str,
    elapsed: Duration,
    report: &SuiteReport,
    escaping: Escaping,
) -> Result<PathBuf, JsTestError> {
    let path = junit_report_path(results_dir, dotted_name);
    let write_error = |message: String| JsTestError::ReportWrite {
        path: path.clone(),
        message,
    };

    fs::create_dir_all(results_dir).map_err(|error| write_error(error.to_string()))?;
    let file = File::create(&path).map_err(|error| write_error(error.to_string()))?;
    let mut writer = render_junit_report(
        BufWriter::new(file),
        dotted_name,
        elapsed,
        report,
        escaping,
    )
    .map_err(|error| write_error(error.to_string()))?;
    writer
        .flush()
        .map_err(|error| write_error(error.to_string()))?;

    tracing::debug!(path = %path.display(), "wrote junit report");
    Ok(path)
}

#[cfg(test)]
mod junit_tests {
    use super::*;

    fn report(entries: &[(&str, Option<&str>)]) -> SuiteReport {
        entries
            .iter()
            .map(|(name, error)| (*name, error.map(str::to_string)))
            .collect()
    }

    fn render(report: &SuiteReport, elapsed: Duration) -> String {
        let bytes = render_junit_report(
            Vec::new(),
            "src.test.suite.html",
            elapsed,
            report,
            Escaping::Verbatim,
        )
        .expect("render should pass");
        String::from_utf8(bytes).expect("utf8")
    }

    #[test]
    fn passing_suite_has_no_failure_elements() {
        let report = report(&[("t1", None), ("t2", None)]);
        let xml = render(&report, Duration::from_millis(1500));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<testsuite"));
        assert!(xml.contains(
            "<testsuite failures=\"0\" time=\"1.500\" skipped=\"0\" errors=\"0\" tests=\"2\" name=\"src.test.suite.html\">"
        ));
        assert!(xml.contains("\n\t<properties/>"));
        assert!(xml.contains(
            "\n\t<testcase time=\"0.750\" name=\"t1\" classname=\"src.test.suite.html\"/>"
        ));
        assert!(!xml.contains("<failure"));
        assert!(xml.ends_with("\n</testsuite>"));
    }

    #[test]
    fn failing_case_carries_message_and_body() {
        let report = report(&[("t1", None), ("t2", Some("expected 2 to equal 1"))]);
        let xml = render(&report, Duration::from_millis(10));

        assert!(xml.contains("failures=\"1\""));
        assert!(xml.contains(
            "\n\t\t<failure message=\"expected 2 to equal 1\" type=\"jstest.TestFailure\">\n\t\t\tt2: expected 2 to equal 1\n\t\t</failure>\n\t</testcase>"
        ));
        assert!(xml.contains("time=\"0.005\""));
    }

    #[test]
    fn empty_suite_renders_properties_only() {
        let xml = render(&SuiteReport::new(), Duration::from_millis(0));
        assert!(xml.contains("tests=\"0\""));
        assert!(!xml.contains("<testcase"));
    }
}

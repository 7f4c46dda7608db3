use std::fs;
use std::path::{Path, PathBuf};

use jt_core::JsTestError;

pub fn render_html_document(title: &str, css: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title><style type=\"text/css\">{}</style></head><body>{}</body></html>",
        title, css, body
    )
}

pub fn human_report_path(results_dir: &Path, dotted_name: &str) -> PathBuf {
    results_dir.join(dotted_name)
}

pub fn write_human_report(
    results_dir: &Path,
    dotted_name: &str,
    html: &str,
) -> Result<PathBuf, JsTestError> {
    let path = human_report_path(results_dir, dotted_name);
    let parent = path.parent().unwrap_or(results_dir);
    fs::create_dir_all(parent).map_err(|error| JsTestError::ReportWrite {
        path: path.clone(),
        message: error.to_string(),
    })?;
    fs::write(&path, html).map_err(|error| JsTestError::ReportWrite {
        path: path.clone(),
        message: error.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "wrote human report");
    Ok(path)
}

#[cfg(test)]
mod human_tests {
    use super::*;

    #[test]
    fn document_inlines_css_and_body() {
        let html = render_html_document("Report", "body { color: red; }\n", "<div>ok</div>");
        assert_eq!(
            html,
            "<html><head><title>Report</title><style type=\"text/css\">body { color: red; }\n</style></head><body><div>ok</div></body></html>"
        );
    }

    #[test]
    fn report_path_uses_dotted_name() {
        assert_eq!(
            human_report_path(Path::new("/out"), "src.test.suite.html"),
            PathBuf::from("/out/src.test.suite.html")
        );
    }
}

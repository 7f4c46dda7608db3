mod human;
mod junit;
mod xml;

pub use human::{human_report_path, render_html_document, write_human_report};
pub use junit::{
    junit_report_path, render_junit_report, write_junit_report, JUNIT_FAILURE_TYPE,
};
pub use xml::{Escaping, XmlRenderer, XML_DECLARATION};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Invalid XML writer state: {0}")]
    InvalidState(String),
    #[error("XML write failed: {0}")]
    Io(#[from] std::io::Error),
}

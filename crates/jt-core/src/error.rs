use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Step of suite processing an error surfaced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuitePhase {
    Bootstrap,
    Run,
    Parse,
    HumanReport,
    JunitReport,
}

impl SuitePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Run => "run",
            Self::Parse => "parse",
            Self::HumanReport => "human-report",
            Self::JunitReport => "junit-report",
        }
    }
}

impl fmt::Display for SuitePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum JsTestError {
    #[error("Failed to bootstrap sandbox with {resource}: {message}")]
    Bootstrap { resource: String, message: String },
    #[error("Bundled script \"{name}\" not found (searched: {searched}).")]
    ResourceMissing { name: String, searched: String },
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Script \"{script}\" failed: {message}")]
    Script { script: String, message: String },
    #[error("Failed to load script \"{script}\": {message}")]
    ScriptLoad { script: String, message: String },
    #[error("Dependency loader exceeded {limit} after executing {executed} script(s).")]
    LoaderTimeout { limit: String, executed: usize },
    #[error("Unexpected value from {origin}: expected {expected}, got {actual}.")]
    ValueShape {
        origin: String,
        expected: String,
        actual: String,
    },
    #[error("Suite {suite} failed during {phase}: {source}")]
    SuiteExecution {
        suite: String,
        phase: SuitePhase,
        source: Box<JsTestError>,
    },
    #[error("Failed to write report {path}: {message}")]
    ReportWrite { path: PathBuf, message: String },
    #[error("Failed to scan {path}: {message}")]
    Discovery { path: PathBuf, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl JsTestError {
    pub fn in_suite(self, suite: impl Into<String>, phase: SuitePhase) -> Self {
        Self::SuiteExecution {
            suite: suite.into(),
            phase,
            source: Box::new(self),
        }
    }

    pub fn value_shape(
        origin: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ValueShape {
            origin: origin.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Stable identifier reported by the CLI.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bootstrap { .. } => "BOOTSTRAP_FAILED",
            Self::ResourceMissing { .. } => "RESOURCE_MISSING",
            Self::ReadFile { .. } => "READ_FILE",
            Self::Script { .. } => "SCRIPT_FAILED",
            Self::ScriptLoad { .. } => "SCRIPT_LOAD_FAILED",
            Self::LoaderTimeout { .. } => "LOADER_TIMEOUT",
            Self::ValueShape { .. } => "VALUE_SHAPE",
            Self::SuiteExecution { source, .. } => source.code(),
            Self::ReportWrite { .. } => "REPORT_WRITE",
            Self::Discovery { .. } => "DISCOVERY_FAILED",
            Self::Config(_) => "CONFIG_INVALID",
        }
    }
}

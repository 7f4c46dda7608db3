use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jt_core::JsTestError;
use jt_report::Escaping;
use jt_runtime::{LoaderLimits, RuntimeOptions};
use serde::{Deserialize, Serialize};

use crate::discovery::DEFAULT_INCLUDE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Framework {
    #[default]
    #[serde(rename = "screw-unit")]
    ScrewUnit,
    #[serde(rename = "qunit")]
    QUnit,
}

impl Framework {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ScrewUnit => "Screw.Unit",
            Self::QUnit => "QUnit",
        }
    }

    /// Name used in human report titles.
    pub fn report_label(&self) -> &'static str {
        match self {
            Self::ScrewUnit => "Screw-Unit",
            Self::QUnit => "QUnit",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Everything a run needs, fixed before the first suite starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub basedir: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub framework: Framework,
    pub reimport_scripts: bool,
    /// Relative paths resolve against `basedir`.
    pub results_dir: PathBuf,
    pub resource_dirs: Vec<PathBuf>,
    pub dom_shim: String,
    pub max_loader_rounds: usize,
    pub max_loader_millis: Option<u64>,
    pub loop_iteration_limit: Option<u64>,
    pub escape_xml: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            basedir: PathBuf::from("."),
            includes: Vec::new(),
            excludes: Vec::new(),
            framework: Framework::default(),
            reimport_scripts: false,
            results_dir: PathBuf::from("target").join("jstest"),
            resource_dirs: Vec::new(),
            dom_shim: "env.js".to_string(),
            max_loader_rounds: LoaderLimits::default().max_rounds,
            max_loader_millis: None,
            loop_iteration_limit: None,
            escape_xml: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, JsTestError> {
        let raw = fs::read_to_string(path).map_err(|source| JsTestError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|error| JsTestError::Config(format!("{}: {}", path.display(), error)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), JsTestError> {
        if self.dom_shim.trim().is_empty() {
            return Err(JsTestError::Config("domShim must not be empty".to_string()));
        }
        if self.max_loader_rounds == 0 {
            return Err(JsTestError::Config(
                "maxLoaderRounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn effective_includes(&self) -> Vec<String> {
        if self.includes.is_empty() {
            vec![DEFAULT_INCLUDE.to_string()]
        } else {
            self.includes.clone()
        }
    }

    pub fn resolved_results_dir(&self) -> PathBuf {
        self.basedir.join(&self.results_dir)
    }

    pub fn loader_limits(&self) -> LoaderLimits {
        LoaderLimits {
            max_rounds: self.max_loader_rounds,
            max_elapsed: self.max_loader_millis.map(Duration::from_millis),
        }
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            loop_iteration_limit: self.loop_iteration_limit,
            recursion_limit: None,
        }
    }

    pub fn escaping(&self) -> Escaping {
        if self.escape_xml {
            Escaping::Xml
        } else {
            Escaping::Verbatim
        }
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use jt_core::JsTestError;

/// Helper functions every adapter relies on: script/stylesheet discovery and
/// result normalization.
pub const HELPERS_SCRIPT: &str = "jstest-helpers.js";
const HELPERS_SOURCE: &str = include_str!("../resources/jstest-helpers.js");

/// Runtime-bundled scripts, looked up by fixed name.
///
/// Embedded scripts win over files; resource directories are searched in
/// order.
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    embedded: BTreeMap<String, String>,
    roots: Vec<PathBuf>,
}

impl ResourceBundle {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        let mut bundle = Self {
            embedded: BTreeMap::new(),
            roots,
        };
        bundle.insert(HELPERS_SCRIPT, HELPERS_SOURCE);
        bundle
    }

    pub fn with_script(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.embedded.insert(name.into(), source.into());
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn contains(&self, name: &str) -> bool {
        self.embedded.contains_key(name) || self.roots.iter().any(|root| root.join(name).is_file())
    }

    pub fn load(&self, name: &str) -> Result<String, JsTestError> {
        if let Some(source) = self.embedded.get(name) {
            return Ok(source.clone());
        }

        for root in &self.roots {
            let candidate = root.join(name);
            if candidate.is_file() {
                return fs::read_to_string(&candidate).map_err(|source| JsTestError::ReadFile {
                    path: candidate,
                    source,
                });
            }
        }

        let mut searched = vec!["embedded".to_string()];
        searched.extend(self.roots.iter().map(|root| root.display().to_string()));
        Err(JsTestError::ResourceMissing {
            name: name.to_string(),
            searched: searched.join(", "),
        })
    }
}

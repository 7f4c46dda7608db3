use std::fmt;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "file:";

/// A discovered suite page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    name: String,
    path: PathBuf,
    dir: PathBuf,
}

impl Suite {
    /// `relative` is the suite path under `root`, with either separator.
    pub fn new(root: &Path, relative: &str) -> Self {
        let name = relative.replace('\\', "/");
        let path = root.join(&name);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        Self { name, path, dir }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `src/test/suite.html` -> `src.test.suite.html`
    pub fn dotted_name(&self) -> String {
        self.name.replace('/', ".")
    }
}

/// A script a suite depends on. Identity is the exact reference value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptReference {
    Bundled(String),
    File(String),
    Inline(String),
}

impl ScriptReference {
    /// Interprets a raw value reported by a suite page: `file:` prefixed
    /// values are suite-relative files, anything else is inline source.
    pub fn from_page(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.strip_prefix(FILE_PREFIX) {
            Some(path) => Self::File(path.to_string()),
            None => Self::Inline(raw),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Bundled(name) => format!("bundled:{}", name),
            Self::File(path) => format!("{}{}", FILE_PREFIX, path),
            Self::Inline(_) => "inline script".to_string(),
        }
    }
}

impl fmt::Display for ScriptReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod suite_tests {
    use super::*;

    #[test]
    fn suite_resolves_paths_and_dotted_name() {
        let suite = Suite::new(Path::new("/project"), "src/test/javascript/suite.html");
        assert_eq!(suite.name(), "src/test/javascript/suite.html");
        assert_eq!(
            suite.path(),
            Path::new("/project/src/test/javascript/suite.html")
        );
        assert_eq!(suite.dir(), Path::new("/project/src/test/javascript"));
        assert_eq!(suite.dotted_name(), "src.test.javascript.suite.html");
    }

    #[test]
    fn suite_normalizes_backslashes() {
        let suite = Suite::new(Path::new("/p"), "src\\test\\suite.html");
        assert_eq!(suite.dotted_name(), "src.test.suite.html");
    }

    #[test]
    fn from_page_splits_file_and_inline_references() {
        assert_eq!(
            ScriptReference::from_page("file:lib/a.js"),
            ScriptReference::File("lib/a.js".to_string())
        );
        assert_eq!(
            ScriptReference::from_page("var x = 1;"),
            ScriptReference::Inline("var x = 1;".to_string())
        );
        assert_eq!(
            ScriptReference::from_page("file:a.js").label(),
            "file:a.js"
        );
        assert_eq!(
            ScriptReference::Bundled("env.js".to_string()).to_string(),
            "bundled:env.js"
        );
    }
}

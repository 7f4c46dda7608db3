use std::path::Path;

use jt_core::JsTestError;
use regex::Regex;
use walkdir::WalkDir;

pub const DEFAULT_INCLUDE: &str = "src/test/**/suite.html";

const DEFAULT_EXCLUDES: [&str; 5] = [
    "**/.git/**",
    "**/.svn/**",
    "**/.hg/**",
    "**/CVS/**",
    "**/.DS_Store",
];

/// Ant-style path pattern: `**` spans directories, `*` and `?` stay inside
/// one segment, and a trailing `/` means everything below.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, JsTestError> {
        let normalized = pattern.trim().replace('\\', "/");
        let normalized = if normalized.ends_with('/') {
            format!("{}**", normalized)
        } else {
            normalized
        };

        let segments = normalized
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return Err(JsTestError::Config(format!(
                "empty suite pattern \"{}\"",
                pattern
            )));
        }

        let mut expression = String::from("^");
        for (index, segment) in segments.iter().enumerate() {
            let last = index + 1 == segments.len();
            if *segment == "**" {
                expression.push_str(if last { ".*" } else { "(?:[^/]*/)*" });
                continue;
            }
            for ch in segment.chars() {
                match ch {
                    '*' => expression.push_str("[^/]*"),
                    '?' => expression.push_str("[^/]"),
                    other => expression.push_str(&regex::escape(&other.to_string())),
                }
            }
            if !last {
                expression.push('/');
            }
        }
        expression.push('$');

        let regex = Regex::new(&expression)
            .map_err(|error| JsTestError::Config(format!("pattern \"{}\": {}", pattern, error)))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }
}

fn compile_all<'a>(
    patterns: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<PathPattern>, JsTestError> {
    patterns.into_iter().map(PathPattern::new).collect()
}

/// Lists suite pages under `basedir`, relative and `/`-separated, in
/// lexicographic order. A missing `basedir` yields no suites.
pub fn collect_suites(
    basedir: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<Vec<String>, JsTestError> {
    if !basedir.is_dir() {
        tracing::debug!(basedir = %basedir.display(), "basedir missing; nothing to scan");
        return Ok(Vec::new());
    }

    let includes = compile_all(includes.iter().map(String::as_str))?;
    let excludes = compile_all(
        DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(excludes.iter().map(String::as_str)),
    )?;

    let mut suites = Vec::new();
    for entry in WalkDir::new(basedir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(error = %error, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(basedir)
            .map_err(|error| JsTestError::Discovery {
                path: entry.path().to_path_buf(),
                message: error.to_string(),
            })?
            .to_string_lossy()
            .replace('\\', "/");

        if includes.iter().any(|pattern| pattern.matches(&relative))
            && !excludes.iter().any(|pattern| pattern.matches(&relative))
        {
            suites.push(relative);
        }
    }

    suites.sort();
    tracing::debug!(count = suites.len(), "discovered suites");
    Ok(suites)
}

#[cfg(test)]
mod discovery_tests {
    use super::*;
    use jt_test_support::temp_dir;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, "<html></html>").expect("write");
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn double_star_spans_zero_or_more_directories() {
        let pattern = PathPattern::new(DEFAULT_INCLUDE).expect("pattern");
        assert!(pattern.matches("src/test/suite.html"));
        assert!(pattern.matches("src/test/a/b/suite.html"));
        assert!(!pattern.matches("src/test/a/other.html"));
        assert!(!pattern.matches("lib/src/test/suite.html"));
    }

    #[test]
    fn single_star_and_question_mark_stay_in_segment() {
        let star = PathPattern::new("specs/*.html").expect("pattern");
        assert!(star.matches("specs/one.html"));
        assert!(!star.matches("specs/nested/one.html"));

        let question = PathPattern::new("s?.html").expect("pattern");
        assert!(question.matches("s1.html"));
        assert!(!question.matches("s12.html"));
        assert!(!question.matches("s/.html"));
    }

    #[test]
    fn trailing_slash_matches_everything_below() {
        let pattern = PathPattern::new("vendor/").expect("pattern");
        assert!(pattern.matches("vendor/a.html"));
        assert!(pattern.matches("vendor/x/y/z.html"));
        assert!(!pattern.matches("src/vendor.html"));
        assert_eq!(pattern.as_str(), "vendor/");
    }

    #[test]
    fn dots_are_literal() {
        let pattern = PathPattern::new("a.html").expect("pattern");
        assert!(!pattern.matches("aXhtml"));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(matches!(
            PathPattern::new("  "),
            Err(JsTestError::Config(_))
        ));
    }

    #[test]
    fn collect_suites_sorts_and_applies_excludes() {
        let root = temp_dir("discovery");
        touch(&root, "src/test/zeta/suite.html");
        touch(&root, "src/test/alpha/suite.html");
        touch(&root, "src/test/alpha/helper.js");
        touch(&root, "src/test/skip/suite.html");
        touch(&root, "src/test/.git/suite.html");

        let suites = collect_suites(
            &root,
            &strings(&[DEFAULT_INCLUDE]),
            &strings(&["**/skip/**"]),
        )
        .expect("scan should pass");

        assert_eq!(
            suites,
            strings(&["src/test/alpha/suite.html", "src/test/zeta/suite.html"])
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn collect_suites_unions_include_patterns() {
        let root = temp_dir("discovery-union");
        touch(&root, "a/suite.html");
        touch(&root, "b/other.html");
        touch(&root, "c/ignored.txt");

        let suites = collect_suites(&root, &strings(&["**/suite.html", "b/*.html"]), &[])
            .expect("scan should pass");
        assert_eq!(suites, strings(&["a/suite.html", "b/other.html"]));
        let _ = fs::remove_dir_all(root);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directories_are_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = temp_dir("discovery-unreadable");
        touch(&root, "open/suite.html");
        touch(&root, "locked/suite.html");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        let suites = collect_suites(&root, &strings(&["**/suite.html"]), &[]);
        let readable = fs::read_dir(&locked).is_ok();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");

        let suites = suites.expect("scan should pass");
        if readable {
            // Running with privileges that ignore permission bits.
            assert_eq!(suites.len(), 2);
        } else {
            assert_eq!(suites, strings(&["open/suite.html"]));
        }
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_basedir_yields_nothing() {
        let root = temp_dir("discovery-missing");
        let suites =
            collect_suites(&root, &strings(&[DEFAULT_INCLUDE]), &[]).expect("scan should pass");
        assert!(suites.is_empty());
    }
}

//! Scriptable stand-in for a real script engine.
//!
//! A [`FakeWorld`] describes what each suite page "contains"; every runtime
//! the factory creates answers helper-function calls from the page it was
//! last navigated to, and writes what it was asked to do into a shared
//! journal.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use jt_core::{JsTestError, ScriptValue};
use jt_runtime::{ResourceBundle, RuntimeFactory, ScriptRuntime};

pub const BUNDLED_SCRIPTS: [&str; 5] = [
    "env.js",
    "screwunit-runner.js",
    "jquery.js",
    "qunit.js",
    "qunit-runner.js",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakePage {
    pub outcomes: Vec<(String, Option<String>)>,
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
    pub body: String,
    /// Script names (as passed to `execute`) that throw.
    pub failing_scripts: Vec<String>,
}

impl FakePage {
    pub fn with_outcomes(outcomes: &[(&str, Option<&str>)]) -> Self {
        Self {
            outcomes: outcomes
                .iter()
                .map(|(name, error)| (name.to_string(), error.map(str::to_string)))
                .collect(),
            body: "<div class=\"describe\"></div>".to_string(),
            ..Self::default()
        }
    }

    pub fn passing(names: &[&str]) -> Self {
        Self::with_outcomes(&names.iter().map(|name| (*name, None)).collect::<Vec<_>>())
    }
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    pages: BTreeMap<String, FakePage>,
    fail_fixup: bool,
    journal: RefCell<Vec<String>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// `suffix` is matched against the end of the navigated path.
    pub fn with_page(mut self, suffix: &str, page: FakePage) -> Self {
        self.pages.insert(suffix.to_string(), page);
        self
    }

    pub fn failing_fixup(mut self) -> Self {
        self.fail_fixup = true;
        self
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }

    fn record(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }

    fn page_for(&self, location: Option<&str>) -> FakePage {
        let Some(location) = location else {
            return FakePage::default();
        };
        self.pages
            .iter()
            .find(|(suffix, _)| location.ends_with(suffix.as_str()))
            .map(|(_, page)| page.clone())
            .unwrap_or_default()
    }
}

pub struct FakeRuntime {
    world: Rc<FakeWorld>,
    location: Option<String>,
}

impl FakeRuntime {
    fn page(&self) -> FakePage {
        self.world.page_for(self.location.as_deref())
    }
}

fn script_error(script: &str, message: &str) -> JsTestError {
    JsTestError::Script {
        script: script.to_string(),
        message: message.to_string(),
    }
}

impl ScriptRuntime for FakeRuntime {
    fn execute(&mut self, source: &str, name: &str) -> Result<(), JsTestError> {
        self.world.record(format!("exec:{}", name));

        if let Some(raw) = source
            .strip_prefix("window.location = ")
            .and_then(|rest| rest.strip_suffix(';'))
        {
            let location: String = serde_json::from_str(raw)
                .map_err(|error| script_error(name, &error.to_string()))?;
            self.world.record(format!("navigate:{}", location));
            self.location = Some(location);
        }

        if source.contains("addClass('focused')") && self.world.fail_fixup {
            return Err(script_error(name, "jQuery is not defined"));
        }

        let page = self.page();
        let inline_name = source.to_string();
        if page
            .failing_scripts
            .iter()
            .any(|failing| failing == name || *failing == inline_name)
        {
            return Err(script_error(name, "ReferenceError: boom"));
        }
        Ok(())
    }

    fn evaluate(&mut self, expression: &str, name: &str) -> Result<ScriptValue, JsTestError> {
        self.world.record(format!("eval:{}", name));
        if expression.contains("jQuery('body').html()") {
            return Ok(ScriptValue::String(self.page().body));
        }
        Ok(ScriptValue::Null)
    }

    fn call_function(
        &mut self,
        function: &str,
        _args: &[ScriptValue],
    ) -> Result<ScriptValue, JsTestError> {
        self.world.record(format!("call:{}", function));
        let page = self.page();
        let strings = |items: Vec<String>| {
            ScriptValue::Array(items.into_iter().map(ScriptValue::String).collect())
        };
        match function {
            "jtmp_locate_scripts" => Ok(strings(page.scripts)),
            "jtmp_locate_css" => Ok(strings(page.stylesheets)),
            "jtmp_failure_messages" | "jtmp_qunit_results" => Ok(ScriptValue::Array(
                page.outcomes
                    .into_iter()
                    .map(|(test, error)| {
                        ScriptValue::Map(BTreeMap::from([
                            ("test".to_string(), ScriptValue::String(test)),
                            (
                                "error".to_string(),
                                error.map(ScriptValue::String).unwrap_or(ScriptValue::Null),
                            ),
                        ]))
                    })
                    .collect(),
            )),
            "jtmp_qunit_install" => Ok(ScriptValue::Null),
            other => Err(script_error(
                other,
                &format!("ReferenceError: {} is not defined", other),
            )),
        }
    }
}

pub struct FakeRuntimeFactory {
    world: Rc<FakeWorld>,
}

impl FakeRuntimeFactory {
    pub fn new(world: Rc<FakeWorld>) -> Self {
        Self { world }
    }
}

impl RuntimeFactory for FakeRuntimeFactory {
    fn create(&self) -> Result<Box<dyn ScriptRuntime>, JsTestError> {
        self.world.record("create".to_string());
        Ok(Box::new(FakeRuntime {
            world: Rc::clone(&self.world),
            location: None,
        }))
    }
}

/// Bundle holding placeholder sources for every framework script.
pub fn fake_resources() -> ResourceBundle {
    BUNDLED_SCRIPTS
        .iter()
        .fold(ResourceBundle::new(Vec::new()), |bundle, name| {
            bundle.with_script(*name, format!("// {}", name))
        })
}

pub fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should move forward")
        .as_nanos();
    std::env::temp_dir().join(format!("jstest-{}-{}", name, nanos))
}

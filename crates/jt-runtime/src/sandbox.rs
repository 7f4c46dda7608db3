use std::fs;
use std::path::Path;
use std::sync::Arc;

use jt_core::{JsTestError, ScriptReference, ScriptValue};

use crate::resources::ResourceBundle;
use crate::runtime::{RuntimeFactory, ScriptRuntime};

/// One suite's sandbox. Dropped as soon as the suite's reports are written.
pub struct ExecutionContext {
    runtime: Box<dyn ScriptRuntime>,
    resources: Arc<ResourceBundle>,
}

impl ExecutionContext {
    pub fn new(runtime: Box<dyn ScriptRuntime>, resources: Arc<ResourceBundle>) -> Self {
        Self { runtime, resources }
    }

    pub fn exec(&mut self, source: &str, name: &str) -> Result<(), JsTestError> {
        self.runtime.execute(source, name)
    }

    pub fn exec_bundled(&mut self, name: &str) -> Result<(), JsTestError> {
        self.execute_reference(Path::new(""), &ScriptReference::Bundled(name.to_string()))
    }

    /// Runs a dependency script. File references resolve against `base_dir`.
    pub fn execute_reference(
        &mut self,
        base_dir: &Path,
        reference: &ScriptReference,
    ) -> Result<(), JsTestError> {
        let load_error = |message: String| JsTestError::ScriptLoad {
            script: reference.label(),
            message,
        };

        let result = match reference {
            ScriptReference::Bundled(name) => {
                let source = self.resources.load(name)?;
                self.runtime.execute(&source, &format!("bundled:{}", name))
            }
            ScriptReference::File(relative) => {
                let path = base_dir.join(relative);
                let source = fs::read_to_string(&path)
                    .map_err(|error| load_error(format!("{}: {}", path.display(), error)))?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| relative.clone());
                self.runtime.execute(&source, &name)
            }
            ScriptReference::Inline(source) => self.runtime.execute(source, "inline script"),
        };

        result.map_err(|error| match error {
            JsTestError::Script { message, .. } => load_error(message),
            other => other,
        })
    }

    /// Points the emulated window at a suite page.
    pub fn navigate(&mut self, page: &Path) -> Result<(), JsTestError> {
        let location = serde_json::to_string(page.to_string_lossy().as_ref()).map_err(|error| {
            JsTestError::value_shape("navigate", "string location", error.to_string())
        })?;
        self.runtime
            .execute(&format!("window.location = {};", location), "navigate")
    }

    pub fn evaluate(&mut self, expression: &str, name: &str) -> Result<ScriptValue, JsTestError> {
        self.runtime.evaluate(expression, name)
    }

    pub fn call(
        &mut self,
        function: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, JsTestError> {
        self.runtime.call_function(function, args)
    }

    /// Calls a no-argument function returning a list of strings. `null`
    /// results and `null` entries read as empty.
    pub fn call_string_list(&mut self, function: &str) -> Result<Vec<String>, JsTestError> {
        match self.call(function, &[])? {
            ScriptValue::Null => Ok(Vec::new()),
            ScriptValue::Array(items) => Ok(items
                .iter()
                .map(|item| item.to_text().unwrap_or_default())
                .collect()),
            other => Err(JsTestError::value_shape(
                function,
                "array of strings",
                other.type_name(),
            )),
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        tracing::trace!("sandbox torn down");
    }
}

/// Creates one fresh sandbox per suite with the DOM shim already loaded.
pub struct Bootstrapper {
    factory: Box<dyn RuntimeFactory>,
    resources: Arc<ResourceBundle>,
    dom_shim: String,
}

impl Bootstrapper {
    pub fn new(
        factory: Box<dyn RuntimeFactory>,
        resources: ResourceBundle,
        dom_shim: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            resources: Arc::new(resources),
            dom_shim: dom_shim.into(),
        }
    }

    pub fn resources(&self) -> &ResourceBundle {
        &self.resources
    }

    pub fn dom_shim(&self) -> &str {
        &self.dom_shim
    }

    pub fn new_sandbox(&self) -> Result<ExecutionContext, JsTestError> {
        let runtime = self.factory.create().map_err(|error| match error {
            JsTestError::Bootstrap { .. } => error,
            other => JsTestError::Bootstrap {
                resource: "runtime".to_string(),
                message: other.to_string(),
            },
        })?;

        let mut context = ExecutionContext::new(runtime, Arc::clone(&self.resources));
        context
            .exec_bundled(&self.dom_shim)
            .map_err(|error| JsTestError::Bootstrap {
                resource: self.dom_shim.clone(),
                message: error.to_string(),
            })?;
        Ok(context)
    }
}

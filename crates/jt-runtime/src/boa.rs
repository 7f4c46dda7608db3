use std::fs;

use boa_engine::property::Attribute;
use boa_engine::{
    Context, JsError, JsNativeError, JsResult, JsString, JsValue, NativeFunction, Source,
};
use jt_core::{JsTestError, ScriptValue};

use crate::runtime::{is_function_path, RuntimeFactory, RuntimeOptions, ScriptRuntime};

const SANDBOX_TARGET: &str = "jstest::sandbox";
const READ_FILE_HOOK: &str = "__jstest_read_file";
const LOG_HOOK: &str = "__jstest_log";

/// Reporting object framework runner scripts talk to. Only `log` and
/// `testStart` produce output.
const REPORT_BRIDGE: &str = r#"
var $report = {
  log: function (result, message) { __jstest_log(result, message); },
  testStart: function (name) { print('testStart: ' + name); },
  testDone: function () {},
  moduleStart: function () {},
  moduleDone: function () {},
  begin: function () {},
  done: function () {}
};
"#;

/// ECMAScript sandbox backed by the Boa interpreter.
///
/// Values come back through `JSON.stringify`, so functions and `undefined`
/// read as `Null` on the host side.
pub struct BoaRuntime {
    context: Context,
}

impl BoaRuntime {
    pub fn new(options: RuntimeOptions) -> Result<Self, JsTestError> {
        let mut context = Context::default();
        if let Some(limit) = options.loop_iteration_limit {
            context
                .runtime_limits_mut()
                .set_loop_iteration_limit(limit);
        }
        if let Some(limit) = options.recursion_limit {
            context.runtime_limits_mut().set_recursion_limit(limit);
        }
        register_host_hooks(&mut context).map_err(|error| JsTestError::Bootstrap {
            resource: "host hooks".to_string(),
            message: error.to_string(),
        })?;
        let mut runtime = Self { context };
        runtime
            .eval(REPORT_BRIDGE, "report bridge")
            .map_err(|error| JsTestError::Bootstrap {
                resource: "$report".to_string(),
                message: error.to_string(),
            })?;
        Ok(runtime)
    }

    fn eval(&mut self, source: &str, name: &str) -> Result<JsValue, JsTestError> {
        let result = self
            .context
            .eval(Source::from_bytes(source.as_bytes()))
            .map_err(|error| JsTestError::Script {
                script: name.to_string(),
                message: error.to_string(),
            });
        self.context.run_jobs();
        result
    }

    fn eval_json(&mut self, expression: &str, name: &str) -> Result<ScriptValue, JsTestError> {
        let expression = expression.trim().trim_end_matches(';');
        let value = self.eval(&format!("JSON.stringify(({}))", expression), name)?;
        if value.is_undefined() {
            return Ok(ScriptValue::Null);
        }
        let Some(json) = value.as_string() else {
            return Err(JsTestError::value_shape(name, "JSON text", "non-string value"));
        };
        serde_json::from_str(&json.to_std_string_escaped()).map_err(|error| {
            JsTestError::value_shape(name, "JSON-compatible value", error.to_string())
        })
    }
}

impl ScriptRuntime for BoaRuntime {
    fn execute(&mut self, source: &str, name: &str) -> Result<(), JsTestError> {
        self.eval(source, name).map(|_| ())
    }

    fn evaluate(&mut self, expression: &str, name: &str) -> Result<ScriptValue, JsTestError> {
        self.eval_json(expression, name)
    }

    fn call_function(
        &mut self,
        function: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, JsTestError> {
        if !is_function_path(function) {
            return Err(JsTestError::Script {
                script: function.to_string(),
                message: "not a plain function name".to_string(),
            });
        }
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            let literal = serde_json::to_string(arg).map_err(|error| {
                JsTestError::value_shape(function, "serializable argument", error.to_string())
            })?;
            rendered.push(literal);
        }
        self.eval_json(&format!("{}({})", function, rendered.join(", ")), function)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoaRuntimeFactory {
    options: RuntimeOptions,
}

impl BoaRuntimeFactory {
    pub fn new(options: RuntimeOptions) -> Self {
        Self { options }
    }
}

impl RuntimeFactory for BoaRuntimeFactory {
    fn create(&self) -> Result<Box<dyn ScriptRuntime>, JsTestError> {
        Ok(Box::new(BoaRuntime::new(self.options)?))
    }
}

fn string_arg(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    Ok(args
        .get(index)
        .map(|value| value.to_string(context))
        .transpose()?
        .map(|text| text.to_std_string_escaped())
        .unwrap_or_default())
}

fn register_host_hooks(context: &mut Context) -> JsResult<()> {
    let print = NativeFunction::from_copy_closure(|_this, args, ctx| {
        let mut parts = Vec::with_capacity(args.len());
        for index in 0..args.len() {
            parts.push(string_arg(args, index, ctx)?);
        }
        tracing::info!(target: SANDBOX_TARGET, "{}", parts.join(" "));
        Ok(JsValue::undefined())
    });

    // Lets the DOM shim pull suite pages and scripts off disk.
    let read_file = NativeFunction::from_copy_closure(|_this, args, ctx| {
        let path = string_arg(args, 0, ctx)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(JsValue::from(JsString::from(content.as_str()))),
            Err(error) => {
                let message = format!("cannot read {}: {}", path, error);
                Err(JsError::from(
                    JsNativeError::error().with_message(message),
                ))
            }
        }
    });

    let log = NativeFunction::from_copy_closure(|_this, args, ctx| {
        let result = args.first().map(JsValue::to_boolean).unwrap_or(false);
        let message = string_arg(args, 1, ctx)?;
        tracing::info!(target: SANDBOX_TARGET, "TEST [{}]: {}", result, message);
        Ok(JsValue::undefined())
    });

    for (name, hook) in [("print", print), (READ_FILE_HOOK, read_file), (LOG_HOOK, log)] {
        let function = hook.to_js_function(context.realm());
        context.register_global_property(JsString::from(name), function, Attribute::all())?;
    }
    Ok(())
}

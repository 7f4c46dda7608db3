use jt_core::{JsTestError, ScriptValue};

/// An isolated scripting scope that can run source and hand values back to
/// the host.
///
/// Implementations report failures as [`JsTestError::Script`]; callers add
/// the context (which script, which suite).
pub trait ScriptRuntime {
    /// Compiles and runs `source`. `name` identifies it in diagnostics.
    fn execute(&mut self, source: &str, name: &str) -> Result<(), JsTestError>;

    /// Evaluates an expression and converts the result.
    fn evaluate(&mut self, expression: &str, name: &str) -> Result<ScriptValue, JsTestError>;

    /// Calls a global function by (optionally dotted) name.
    fn call_function(
        &mut self,
        function: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, JsTestError>;
}

/// Creates fresh runtimes, one per suite.
pub trait RuntimeFactory {
    fn create(&self) -> Result<Box<dyn ScriptRuntime>, JsTestError>;
}

/// Execution guards applied to each runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub loop_iteration_limit: Option<u64>,
    pub recursion_limit: Option<usize>,
}

pub(crate) fn is_function_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => chars
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'),
                _ => false,
            }
        })
}

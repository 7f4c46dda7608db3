use jt_core::JsTestError;
use jt_runner::{RunError, RunOutcome};

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

pub(crate) fn emit_error(error: &JsTestError) -> i32 {
    emit_error_parts(error.code(), &error.to_string())
}

fn emit_error_parts(code: &str, message: &str) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", code);
    println!("ERROR_MSG_JSON:{}", json_string(message));
    1
}

pub(crate) fn emit_run_error(error: &RunError) -> i32 {
    match error {
        RunError::Failure { suite, .. } => {
            println!("RESULT:FAILED");
            println!("SUITE:{}", suite);
            println!("ERROR_MSG_JSON:{}", json_string(&error.to_string()));
            1
        }
        RunError::Unexpected(inner) => emit_error_parts(inner.code(), &error.to_string()),
    }
}

pub(crate) fn emit_outcome(outcome: &RunOutcome) -> i32 {
    println!("RESULT:OK");
    println!("SUITES:{}", outcome.runs().len());
    println!("TESTS:{}", outcome.tests_run());
    0
}

pub(crate) fn emit_suite_list(suites: &[String]) -> i32 {
    println!("RESULT:OK");
    println!("SUITES:{}", suites.len());
    for suite in suites {
        println!("SUITE:{}", suite);
    }
    0
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn errors_return_non_zero_exit_code() {
        assert_eq!(emit_error(&JsTestError::Config("bad".to_string())), 1);
        assert_eq!(
            emit_run_error(&RunError::Failure {
                suite: "a/suite.html".to_string(),
                message: "expected 3".to_string(),
            }),
            1
        );
        assert_eq!(
            emit_run_error(&RunError::Unexpected(JsTestError::Config("bad".to_string()))),
            1
        );
    }

    #[test]
    fn successes_return_zero() {
        assert_eq!(emit_outcome(&RunOutcome::NoTests), 0);
        assert_eq!(emit_suite_list(&["a/suite.html".to_string()]), 0);
    }

    #[test]
    fn messages_are_json_encoded() {
        assert_eq!(json_string("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    }
}

pub mod error;
pub mod report;
pub mod suite;
pub mod value;

pub use error::{JsTestError, SuitePhase};
pub use report::{SuiteReport, TestOutcome};
pub use suite::{ScriptReference, Suite};
pub use value::ScriptValue;

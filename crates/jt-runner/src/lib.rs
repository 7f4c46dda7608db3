mod adapter;
mod config;
mod discovery;
mod qunit;
mod runner;
mod screw_unit;

pub use adapter::{adapter_for, TestAdapter};
pub use config::{Framework, RunConfig};
pub use discovery::{collect_suites, PathPattern, DEFAULT_INCLUDE};
pub use qunit::{QUnitAdapter, QUNIT_RUNNER};
pub use runner::{RunError, RunOutcome, SuiteRun, SuiteRunner};
pub use screw_unit::{ScrewUnitAdapter, SCREW_UNIT_RUNNER};

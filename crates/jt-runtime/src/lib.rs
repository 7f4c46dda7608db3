mod boa;
mod loader;
mod resources;
mod runtime;
mod sandbox;

pub use boa::{BoaRuntime, BoaRuntimeFactory};
pub use loader::{DependencyHost, DependencyLoader, LoadStats, LoaderLimits, PageScripts};
pub use resources::{ResourceBundle, HELPERS_SCRIPT};
pub use runtime::{RuntimeFactory, RuntimeOptions, ScriptRuntime};
pub use sandbox::{Bootstrapper, ExecutionContext};

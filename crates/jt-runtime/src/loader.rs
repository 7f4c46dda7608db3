use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

use jt_core::{JsTestError, ScriptReference};

use crate::sandbox::ExecutionContext;

const LOCATE_SCRIPTS_FUNCTION: &str = "jtmp_locate_scripts";

/// Source of a suite's dependency scripts.
pub trait DependencyHost {
    /// Current view of the scripts the page declares, in page order.
    fn discover(&mut self) -> Result<Vec<ScriptReference>, JsTestError>;

    fn execute(&mut self, script: &ScriptReference) -> Result<(), JsTestError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderLimits {
    pub max_rounds: usize,
    pub max_elapsed: Option<Duration>,
}

impl Default for LoaderLimits {
    fn default() -> Self {
        Self {
            max_rounds: 10_000,
            max_elapsed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub executed: Vec<ScriptReference>,
    pub discoveries: usize,
}

/// Executes every script a page declares, each at most once.
///
/// With `reimport` set, discovery runs again after every executed script and
/// the scan restarts from the top of the fresh list, so scripts that add
/// further `<script>` tags get those picked up too.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyLoader {
    reimport: bool,
    limits: LoaderLimits,
}

impl DependencyLoader {
    pub fn new(reimport: bool, limits: LoaderLimits) -> Self {
        Self { reimport, limits }
    }

    pub fn reimport(&self) -> bool {
        self.reimport
    }

    pub fn load_all(&self, host: &mut impl DependencyHost) -> Result<LoadStats, JsTestError> {
        let started = Instant::now();
        let mut stats = LoadStats::default();
        let mut done = HashSet::new();
        let mut pending = ordered_unique(host.discover()?);
        stats.discoveries += 1;
        let mut rounds = 0usize;

        // Pending entries are unique, so a longer pending list always holds
        // at least one script that has not run yet.
        while pending.len() > done.len() {
            rounds += 1;
            self.check_limits(rounds, started, stats.executed.len())?;

            let mut rediscovered = None;
            for script in &pending {
                if done.contains(script) {
                    continue;
                }
                tracing::debug!(script = %script, "executing dependency");
                host.execute(script)?;
                done.insert(script.clone());
                stats.executed.push(script.clone());

                if self.reimport {
                    rediscovered = Some(ordered_unique(host.discover()?));
                    stats.discoveries += 1;
                    break;
                }
            }
            if let Some(fresh) = rediscovered {
                pending = fresh;
            }
        }

        Ok(stats)
    }

    fn check_limits(
        &self,
        rounds: usize,
        started: Instant,
        executed: usize,
    ) -> Result<(), JsTestError> {
        if rounds > self.limits.max_rounds {
            return Err(JsTestError::LoaderTimeout {
                limit: format!("{} rounds", self.limits.max_rounds),
                executed,
            });
        }
        if let Some(budget) = self.limits.max_elapsed {
            if started.elapsed() > budget {
                return Err(JsTestError::LoaderTimeout {
                    limit: format!("{}ms", budget.as_millis()),
                    executed,
                });
            }
        }
        Ok(())
    }
}

fn ordered_unique(scripts: Vec<ScriptReference>) -> Vec<ScriptReference> {
    let mut seen = HashSet::new();
    scripts
        .into_iter()
        .filter(|script| seen.insert(script.clone()))
        .collect()
}

/// Scripts declared by the page loaded into a sandbox, found through the
/// helper script's `jtmp_locate_scripts()`.
pub struct PageScripts<'a> {
    context: &'a mut ExecutionContext,
    suite_dir: &'a Path,
}

impl<'a> PageScripts<'a> {
    pub fn new(context: &'a mut ExecutionContext, suite_dir: &'a Path) -> Self {
        Self { context, suite_dir }
    }
}

impl DependencyHost for PageScripts<'_> {
    fn discover(&mut self) -> Result<Vec<ScriptReference>, JsTestError> {
        Ok(self
            .context
            .call_string_list(LOCATE_SCRIPTS_FUNCTION)?
            .into_iter()
            .map(ScriptReference::from_page)
            .collect())
    }

    fn execute(&mut self, script: &ScriptReference) -> Result<(), JsTestError> {
        self.context.execute_reference(self.suite_dir, script)
    }
}

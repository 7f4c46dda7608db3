/// One executed test and, when it failed, its error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub error: Option<String>,
}

impl TestOutcome {
    /// Blank or whitespace-only error text counts as a pass.
    pub fn new(name: impl Into<String>, error: Option<String>) -> Self {
        let error = error.filter(|text| !text.trim().is_empty());
        Self {
            name: name.into(),
            error,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of one suite in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    tests: Vec<TestOutcome>,
    errors: usize,
    first_error: Option<String>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_outcome(&mut self, name: impl Into<String>, error: Option<String>) {
        let outcome = TestOutcome::new(name, error);
        if let Some(error) = &outcome.error {
            if self.first_error.is_none() {
                self.first_error = Some(error.clone());
            }
            self.errors += 1;
        }
        self.tests.push(outcome);
    }

    pub fn tests(&self) -> &[TestOutcome] {
        &self.tests
    }

    pub fn tests_run(&self) -> usize {
        self.tests.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn first_error(&self) -> Option<&str> {
        self.first_error.as_deref()
    }

    pub fn failed(&self) -> bool {
        self.errors > 0
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for SuiteReport {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut report = Self::new();
        for (name, error) in iter {
            report.add_outcome(name, error);
        }
        report
    }
}

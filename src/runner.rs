//! Sequential test registrar + runner.
//!
//! Cases are `(description, procedure)` pairs registered on a [`Suite`],
//! optionally grouped under `describe` headings. [`Suite::run`] executes them
//! in registration order, isolates failures (returned errors and panics) to
//! the case that raised them, and hands back a [`RunSummary`] whose exit code
//! is the only contract CI observes.

use serde::Serialize;
use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use crate::error::{log_assertion_error, AssertionError, ErrorCode};

const PASS_MARK: &str = "✓";
const FAIL_MARK: &str = "✗";

type Procedure = Box<dyn FnOnce() -> Result<(), AssertionError>>;

/// A named check awaiting execution.
pub struct TestCase {
    group: Option<String>,
    description: String,
    procedure: Procedure,
}

impl TestCase {
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Group-qualified name used in listings and failure reports.
    pub fn label(&self) -> String {
        match &self.group {
            Some(group) => format!("{group} > {}", self.description),
            None => self.description.clone(),
        }
    }

    fn execute(self) -> Result<(), String> {
        let label = self.label();
        match panic::catch_unwind(AssertUnwindSafe(self.procedure)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                log_assertion_error(&err, &label);
                Err(err.message())
            }
            Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Ordered collection of registered cases.
#[derive(Default)]
pub struct Suite {
    cases: Vec<TestCase>,
    current_group: Option<String>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every case added by `register` under the `group` heading.
    /// Nested groups are joined with `" > "`.
    pub fn describe(&mut self, group: impl Into<String>, register: impl FnOnce(&mut Self)) {
        let group = group.into();
        let nested = match &self.current_group {
            Some(parent) => format!("{parent} > {group}"),
            None => group,
        };
        let previous = self.current_group.replace(nested);
        register(self);
        self.current_group = previous;
    }

    /// Register a case.
    pub fn test<F>(&mut self, description: impl Into<String>, procedure: F)
    where
        F: FnOnce() -> Result<(), AssertionError> + 'static,
    {
        self.cases.push(TestCase {
            group: self.current_group.clone(),
            description: description.into(),
            procedure: Box::new(procedure),
        });
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Keep only cases whose label contains `filter` (case-insensitive).
    pub fn retain_matching(&mut self, filter: &str) {
        let needle = filter.to_lowercase();
        self.cases
            .retain(|case| case.label().to_lowercase().contains(&needle));
    }

    /// Run every case in order, writing one line per case to `out`.
    pub fn run<W: Write>(self, out: &mut W) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut heading: Option<String> = None;
        tracing::info!(cases = self.cases.len(), "running suite");

        for case in self.cases {
            if case.group != heading {
                if let Some(group) = &case.group {
                    writeln!(out, "\n{group}")?;
                }
                heading = case.group.clone();
            }
            let indent = if heading.is_some() { "  " } else { "" };
            let description = case.description.clone();
            let label = case.label();

            match case.execute() {
                Ok(()) => {
                    tracing::debug!(case = %label, "passed");
                    writeln!(out, "{indent}{PASS_MARK} {description}")?;
                    summary.passed += 1;
                }
                Err(message) => {
                    tracing::debug!(case = %label, %message, "failed");
                    writeln!(out, "{indent}{FAIL_MARK} {description}: {message}")?;
                    summary.failed += 1;
                    summary.failures.push(CaseFailure {
                        description: label,
                        message,
                    });
                }
            }
        }

        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            "suite finished"
        );
        Ok(summary)
    }

    /// Run without per-case output.
    pub fn run_quiet(self) -> RunSummary {
        // Writing to a sink cannot fail.
        self.run(&mut io::sink()).unwrap_or_default()
    }
}

/// A failed case with its error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFailure {
    pub description: String,
    pub message: String,
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<CaseFailure>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// 0 when every case passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Human-readable totals plus the failure list.
    pub fn print_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Passed: {}", self.passed)?;
        writeln!(out, "Failed: {} (total {})", self.failed, self.total())?;
        if !self.failures.is_empty() {
            writeln!(out, "\nFailures:")?;
            for (index, failure) in self.failures.iter().enumerate() {
                writeln!(out, "  {}. {}", index + 1, failure.description)?;
                writeln!(out, "     {}", failure.message)?;
            }
        }
        Ok(())
    }

    pub fn print_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let payload = serde_json::json!({
            "passed": self.passed,
            "failed": self.failed,
            "total": self.total(),
            "success": self.success(),
            "failures": self.failures,
        });
        let json = serde_json::to_string_pretty(&payload).map_err(io::Error::other)?;
        writeln!(out, "{json}")
    }
}

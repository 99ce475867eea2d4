//! Report formatting for check outcomes.
//!
//! The engine only produces values; this module turns them into the text a
//! test harness prints. A failure report always carries a `FAILED` marker,
//! the label, the minimal counterexample rendered with `Debug`, and the seed.

use std::fmt;
use std::time::Duration;

use crate::error::{CheckError, CheckResult, TestFailure, TestSuccess};

/// Formatting helpers for check results
///
/// Runs nothing itself: checks are run by [`crate::execution`], and this
/// type only renders their outcomes as text for a test harness.
pub struct TestRunner;

impl TestRunner {
    /// Format a check result for standard test output
    pub fn format_result<T>(result: &CheckResult<T>) -> String
    where
        T: fmt::Debug,
    {
        match result {
            CheckResult::Passed(success) => Self::format_success(success),
            CheckResult::Failed(failure) => Self::format_failure(failure),
        }
    }

    /// Format a successful check
    pub fn format_success(success: &TestSuccess) -> String {
        format!(
            "{} passed {} trials. (seed: {})",
            success.label, success.trials, success.seed
        )
    }

    /// Format a falsified property
    pub fn format_failure<T>(failure: &TestFailure<T>) -> String
    where
        T: fmt::Debug,
    {
        let mut output = String::new();

        output.push_str(&format!("FAILED: {}", failure.summary()));
        output.push_str(&format!(
            "\nSeed: {} (use this to reproduce the failure)",
            failure.seed
        ));
        output.push_str(&format!("\nTest duration: {:?}", failure.test_duration));

        if failure.shrink_duration > Duration::from_millis(0) {
            output.push_str(&format!(
                ", shrinking duration: {:?}",
                failure.shrink_duration
            ));
        }

        output
    }

    /// Format a run that could not produce a verdict
    pub fn format_error(error: &CheckError) -> String {
        match error {
            CheckError::Config(_) | CheckError::MissingBinding { .. } => {
                format!("CONFIGURATION ERROR: {}", error)
            }
            CheckError::PropertyPanicked { .. } => format!("PROPERTY DEFECT: {}", error),
            CheckError::GeneratorPanicked { .. } | CheckError::ShrinkDiverged { .. } => {
                format!("BINDING DEFECT: {}", error)
            }
        }
    }

    /// Format whatever a `check*` call returned
    pub fn format_outcome<T>(outcome: &Result<CheckResult<T>, CheckError>) -> String
    where
        T: fmt::Debug,
    {
        match outcome {
            Ok(result) => Self::format_result(result),
            Err(error) => Self::format_error(error),
        }
    }

    /// Create a panic message for a failed check
    pub fn create_panic_message<T>(outcome: &Result<CheckResult<T>, CheckError>) -> String
    where
        T: fmt::Debug,
    {
        format!("Property check failed: {}", Self::format_outcome(outcome))
    }
}

/// Panic with a formatted report unless the check passed.
///
/// Meant for use inside `#[test]` functions.
pub fn assert_passed<T>(outcome: Result<CheckResult<T>, CheckError>) -> TestSuccess
where
    T: fmt::Debug,
{
    match outcome {
        Ok(CheckResult::Passed(success)) => success,
        other => panic!("{}", TestRunner::create_panic_message(&other)),
    }
}

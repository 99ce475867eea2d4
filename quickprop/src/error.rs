//! Error types and result handling for property checks.
//!
//! A falsified property is not an error: it is the `Failed` arm of
//! [`CheckResult`]. [`CheckError`] is reserved for runs that could not
//! produce a trustworthy verdict at all.

use std::fmt;
use std::time::Duration;

use crate::config::ConfigError;

/// Reasons a check run could not complete
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The configuration was rejected before any trial ran
    Config(ConfigError),

    /// No binding is registered for the requested type
    MissingBinding { type_name: &'static str },

    /// The generator panicked while producing a trial value
    GeneratorPanicked { trial: usize, message: String },

    /// The property panicked instead of returning a verdict
    PropertyPanicked {
        trial: usize,
        input: String,
        message: String,
    },

    /// A shrinker kept proposing failing candidates past the iteration cap
    ShrinkDiverged {
        iterations: usize,
        last_candidate: String,
    },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Config(error) => write!(f, "Configuration error: {}", error),
            CheckError::MissingBinding { type_name } => {
                write!(f, "No binding registered for type {}", type_name)
            }
            CheckError::GeneratorPanicked { trial, message } => {
                write!(f, "Generator panicked on trial {}: {}", trial, message)
            }
            CheckError::PropertyPanicked {
                trial,
                input,
                message,
            } => {
                write!(
                    f,
                    "Property panicked on trial {} with input {}: {}",
                    trial, input, message
                )
            }
            CheckError::ShrinkDiverged {
                iterations,
                last_candidate,
            } => {
                write!(
                    f,
                    "Shrinking did not terminate after {} iterations (last candidate: {})",
                    iterations, last_candidate
                )
            }
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Config(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CheckError {
    fn from(error: ConfigError) -> Self {
        CheckError::Config(error)
    }
}

/// Information about a run in which every trial passed
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuccess {
    /// Label of the property
    pub label: String,
    /// Number of trials completed
    pub trials: usize,
    /// Seed that reproduces this run
    pub seed: u64,
}

/// Information about a falsified property
#[derive(Debug, Clone)]
pub struct TestFailure<T> {
    /// Label of the property
    pub label: String,
    /// Input that first falsified the property
    pub original_input: T,
    /// Last value of the shrink chain that still falsifies the property
    pub minimal_input: T,
    /// Number of accepted shrinking steps
    pub shrink_steps: usize,
    /// Trial (0-based) on which the falsification was found
    pub failed_trial: usize,
    /// Seed that reproduces this run
    pub seed: u64,
    /// Total time spent on the check
    pub test_duration: Duration,
    /// Time spent on shrinking
    pub shrink_duration: Duration,
}

impl<T> TestFailure<T> {
    /// Get a concise summary of the failure
    pub fn summary(&self) -> String
    where
        T: fmt::Debug,
    {
        if self.shrink_steps > 0 {
            format!(
                "{} failed on trial {}: minimal counterexample {:?} (shrunk from {:?} in {} steps)",
                self.label,
                self.failed_trial,
                self.minimal_input,
                self.original_input,
                self.shrink_steps
            )
        } else {
            format!(
                "{} failed on trial {}: minimal counterexample {:?}",
                self.label, self.failed_trial, self.minimal_input
            )
        }
    }

    /// Get a detailed multi-line report of the failure
    pub fn detailed_report(&self) -> String
    where
        T: fmt::Debug,
    {
        let mut report = String::new();

        report.push_str(&format!(
            "Property '{}' failed on trial {}\n",
            self.label, self.failed_trial
        ));
        report.push_str(&format!("Original input: {:?}\n", self.original_input));
        report.push_str(&format!("Minimal input: {:?}\n", self.minimal_input));
        report.push_str(&format!("Shrinking steps: {}\n", self.shrink_steps));
        report.push_str(&format!("Shrinking time: {:?}\n", self.shrink_duration));
        report.push_str(&format!("Total test time: {:?}\n", self.test_duration));
        report.push_str(&format!("Seed: {} (use this to reproduce)\n", self.seed));

        report
    }
}

impl<T: fmt::Debug> fmt::Display for TestFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Verdict of one check run
#[derive(Debug, Clone)]
pub enum CheckResult<T> {
    /// Every trial passed
    Passed(TestSuccess),
    /// The property was falsified; carries the minimal counterexample
    Failed(TestFailure<T>),
}

impl<T> CheckResult<T> {
    /// Whether every trial passed
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckResult::Passed(_))
    }

    /// Whether a counterexample was found
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckResult::Failed(_))
    }

    /// The minimal counterexample, if the property was falsified
    pub fn counterexample(&self) -> Option<&T> {
        match self {
            CheckResult::Passed(_) => None,
            CheckResult::Failed(failure) => Some(&failure.minimal_input),
        }
    }

    /// The label of the checked property
    pub fn label(&self) -> &str {
        match self {
            CheckResult::Passed(success) => &success.label,
            CheckResult::Failed(failure) => &failure.label,
        }
    }

    /// The seed that reproduces this run
    pub fn seed(&self) -> u64 {
        match self {
            CheckResult::Passed(success) => success.seed,
            CheckResult::Failed(failure) => failure.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(shrink_steps: usize) -> TestFailure<i32> {
        TestFailure {
            label: "below 100".to_string(),
            original_input: 8000,
            minimal_input: 125,
            shrink_steps,
            failed_trial: 3,
            seed: 42,
            test_duration: Duration::from_millis(2),
            shrink_duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_check_error_display() {
        let error = CheckError::MissingBinding {
            type_name: "alloc::string::String",
        };
        assert_eq!(
            error.to_string(),
            "No binding registered for type alloc::string::String"
        );

        let error = CheckError::PropertyPanicked {
            trial: 2,
            input: "[1, 2]".to_string(),
            message: "index out of bounds".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Property panicked on trial 2 with input [1, 2]: index out of bounds"
        );

        let error = CheckError::ShrinkDiverged {
            iterations: 500,
            last_candidate: "7".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Shrinking did not terminate after 500 iterations (last candidate: 7)"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CheckError = ConfigError::InvalidTrials(0).into();
        assert_eq!(error, CheckError::Config(ConfigError::InvalidTrials(0)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid trial count: 0 (must be > 0)"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_failure_summary() {
        assert_eq!(
            failure(6).summary(),
            "below 100 failed on trial 3: minimal counterexample 125 (shrunk from 8000 in 6 steps)"
        );
        assert_eq!(
            failure(0).to_string(),
            "below 100 failed on trial 3: minimal counterexample 125"
        );
    }

    #[test]
    fn test_failure_detailed_report() {
        let report = failure(6).detailed_report();
        assert!(report.contains("Property 'below 100' failed on trial 3"));
        assert!(report.contains("Original input: 8000"));
        assert!(report.contains("Minimal input: 125"));
        assert!(report.contains("Seed: 42"));
    }

    #[test]
    fn test_check_result_accessors() {
        let passed: CheckResult<i32> = CheckResult::Passed(TestSuccess {
            label: "identity".to_string(),
            trials: 10,
            seed: 7,
        });
        assert!(passed.is_passed());
        assert!(!passed.is_failed());
        assert_eq!(passed.counterexample(), None);
        assert_eq!(passed.label(), "identity");
        assert_eq!(passed.seed(), 7);

        let failed = CheckResult::Failed(failure(6));
        assert!(failed.is_failed());
        assert_eq!(failed.counterexample(), Some(&125));
        assert_eq!(failed.label(), "below 100");
        assert_eq!(failed.seed(), 42);
    }
}

//! Property check execution engine.
//!
//! A run validates its configuration, seeds a random source, and tries the
//! property on up to `trials` generated inputs. The first falsifying input is
//! handed to the shrink loop and the run ends with
//! [`CheckResult::Failed`]; if every trial passes the run ends with
//! [`CheckResult::Passed`]. Panics in the generator or the property abort the
//! run with a [`CheckError`] instead.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use crate::arbitrary::Arbitrary;
use crate::config::{CheckConfig, GeneratorConfig};
use crate::error::{CheckError, CheckResult, TestFailure, TestSuccess};
use crate::generator::{Generator, GeneratorRegistry, any};
use crate::property::Property;
use crate::rng::{create_seeded_rng, resolve_seed};
use crate::shrink::{ShrinkConfig, ShrinkEngine, Shrinkable};

/// Label used when a check is not given one
pub const DEFAULT_LABEL: &str = "property";

/// Core property check execution struct
pub struct PropertyTest<T, G, P> {
    label: String,
    generator: G,
    property: P,
    config: CheckConfig,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, G, P> PropertyTest<T, G, P>
where
    T: Clone + fmt::Debug,
    G: Generator<T>,
    P: Property<T>,
{
    /// Create a new property check with the given generator, property, and configuration
    pub fn new(generator: G, property: P, config: CheckConfig) -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            generator,
            property,
            config,
            _phantom: PhantomData,
        }
    }

    /// Set the label used in reports
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Execute the property check
    pub fn run(&self) -> Result<CheckResult<T>, CheckError> {
        self.config.validate()?;

        let test_start = Instant::now();
        let seed = resolve_seed(self.config.seed);
        let mut rng = create_seeded_rng(seed);

        if self.config.verbose {
            eprintln!(
                "Checking '{}' with {} trials (seed: {})",
                self.label, self.config.trials, seed
            );
        }

        for trial in 0..self.config.trials {
            let input = catch_unwind(AssertUnwindSafe(|| {
                self.generator
                    .generate(&mut rng, &self.config.generator_config)
            }))
            .map_err(|payload| CheckError::GeneratorPanicked {
                trial,
                message: panic_message(payload.as_ref()),
            })?;

            if self.evaluate(trial, &input)? {
                continue;
            }

            if self.config.verbose {
                eprintln!("Trial {} falsified '{}' with {:?}", trial, self.label, input);
            }

            return self.shrink_failure(trial, input, seed, test_start);
        }

        if self.config.verbose {
            eprintln!("'{}' passed {} trials", self.label, self.config.trials);
        }

        Ok(CheckResult::Passed(TestSuccess {
            label: self.label.clone(),
            trials: self.config.trials,
            seed,
        }))
    }

    /// Run the property once, turning a panic into a property defect
    fn evaluate(&self, trial: usize, input: &T) -> Result<bool, CheckError> {
        catch_unwind(AssertUnwindSafe(|| self.property.holds(input))).map_err(|payload| {
            CheckError::PropertyPanicked {
                trial,
                input: format!("{:?}", input),
                message: panic_message(payload.as_ref()),
            }
        })
    }

    fn shrink_failure(
        &self,
        trial: usize,
        input: T,
        seed: u64,
        test_start: Instant,
    ) -> Result<CheckResult<T>, CheckError> {
        let engine = ShrinkEngine::with_config(ShrinkConfig {
            max_iterations: self.config.max_shrink_iterations,
            verbose: self.config.verbose,
        });

        let shrink_result = catch_unwind(AssertUnwindSafe(|| {
            engine.shrink_with_strategy(
                input,
                |candidate| self.evaluate(trial, candidate).map(|holds| !holds),
                |value| self.generator.shrink(value),
            )
        }))
        .map_err(|payload| CheckError::GeneratorPanicked {
            trial,
            message: format!("shrinker panicked: {}", panic_message(payload.as_ref())),
        })??;

        Ok(CheckResult::Failed(TestFailure {
            label: self.label.clone(),
            original_input: shrink_result.original,
            minimal_input: shrink_result.minimal,
            shrink_steps: shrink_result.shrink_steps,
            failed_trial: trial,
            seed,
            test_duration: test_start.elapsed(),
            shrink_duration: shrink_result.shrink_duration,
        }))
    }
}

/// Render a panic payload the way the default hook does
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Execute a property check with the default configuration
pub fn check<T, G, P>(generator: G, property: P) -> Result<CheckResult<T>, CheckError>
where
    T: Clone + fmt::Debug,
    G: Generator<T>,
    P: Property<T>,
{
    check_with_config(generator, property, CheckConfig::default())
}

/// Execute a property check with a custom configuration
pub fn check_with_config<T, G, P>(
    generator: G,
    property: P,
    config: CheckConfig,
) -> Result<CheckResult<T>, CheckError>
where
    T: Clone + fmt::Debug,
    G: Generator<T>,
    P: Property<T>,
{
    PropertyTest::new(generator, property, config).run()
}

/// Execute a property check over the intrinsic binding of `T`
pub fn check_arbitrary<T, P>(property: P) -> Result<CheckResult<T>, CheckError>
where
    T: Arbitrary + Shrinkable + Clone + fmt::Debug,
    P: Property<T>,
{
    check(any::<T>(), property)
}

/// Execute a property check using the binding registered for `T`.
///
/// Fails with [`CheckError::MissingBinding`] before any trial when the
/// registry has no binding for `T`.
pub fn check_registered<T, P>(
    registry: &GeneratorRegistry,
    property: P,
    config: CheckConfig,
) -> Result<CheckResult<T>, CheckError>
where
    T: Clone + fmt::Debug + 'static,
    P: Property<T>,
{
    config.validate()?;
    let binding = registry.require::<T>()?;
    check_with_config(binding, property, config)
}

/// Builder pattern for configuring property checks
pub struct PropertyTestBuilder<T> {
    label: String,
    config: CheckConfig,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> PropertyTestBuilder<T> {
    /// Create a new property check builder with default configuration
    pub fn new() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            config: CheckConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Set the label used in reports
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Set the number of trials
    pub fn trials(mut self, trials: usize) -> Self {
        self.config.trials = trials;
        self
    }

    /// Set the random seed for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the cap on accepted shrink steps
    pub fn max_shrink_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_shrink_iterations = max_iterations;
        self
    }

    /// Print progress to stderr
    pub fn verbose(mut self) -> Self {
        self.config.verbose = true;
        self
    }

    /// Set the bounds used by the built-in generators
    pub fn generator_config(mut self, generator_config: GeneratorConfig) -> Self {
        self.config.generator_config = generator_config;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CheckConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the property check with the configured parameters
    pub fn run<G, P>(self, generator: G, property: P) -> Result<CheckResult<T>, CheckError>
    where
        T: Clone + fmt::Debug,
        G: Generator<T>,
        P: Property<T>,
    {
        PropertyTest::new(generator, property, self.config)
            .with_label(self.label)
            .run()
    }

    /// Run the property check over the intrinsic binding of `T`
    pub fn run_arbitrary<P>(self, property: P) -> Result<CheckResult<T>, CheckError>
    where
        T: Arbitrary + Shrinkable + Clone + fmt::Debug,
        P: Property<T>,
    {
        self.run(any::<T>(), property)
    }

    /// Run the property check with the binding registered for `T`
    pub fn run_registered<P>(
        self,
        registry: &GeneratorRegistry,
        property: P,
    ) -> Result<CheckResult<T>, CheckError>
    where
        T: Clone + fmt::Debug + 'static,
        P: Property<T>,
    {
        self.config.validate()?;
        let binding = registry.require::<T>()?;
        self.run(binding, property)
    }
}

impl<T> Default for PropertyTestBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::generator::{Binding, ConstantGenerator};

    #[test]
    fn test_passing_property() {
        let result = check(any::<i32>(), |x: &i32| x.wrapping_add(0) == *x).unwrap();
        match result {
            CheckResult::Passed(success) => {
                assert_eq!(success.trials, 10);
                assert_eq!(success.label, "property");
            }
            CheckResult::Failed(failure) => panic!("Unexpected failure: {}", failure),
        }
    }

    #[test]
    fn test_failure_is_shrunk_along_halving_chain() {
        let result = check(ConstantGenerator::new(8000), |x: &i32| *x < 100).unwrap();
        match result {
            CheckResult::Failed(failure) => {
                assert_eq!(failure.original_input, 8000);
                assert_eq!(failure.minimal_input, 8000);
                assert_eq!(failure.failed_trial, 0);
            }
            CheckResult::Passed(_) => panic!("Expected failure"),
        }

        let halving = Binding::new(
            |_rng: &mut dyn rand::RngCore, _config: &GeneratorConfig| 8000i32,
            |n: &i32| Shrinkable::shrink(n),
        );
        let result = check(halving, |x: &i32| *x < 100).unwrap();
        match result {
            CheckResult::Failed(failure) => {
                assert_eq!(failure.original_input, 8000);
                assert_eq!(failure.minimal_input, 125);
                assert_eq!(failure.shrink_steps, 6);
            }
            CheckResult::Passed(_) => panic!("Expected failure"),
        }
    }

    #[test]
    fn test_seed_is_recorded_and_reproducible() {
        let config = CheckConfig {
            seed: Some(1234),
            ..CheckConfig::default()
        };

        let first = check_with_config(any::<i32>(), |x: &i32| *x < 100, config.clone()).unwrap();
        let second = check_with_config(any::<i32>(), |x: &i32| *x < 100, config).unwrap();

        assert_eq!(first.seed(), 1234);
        assert_eq!(first.counterexample(), second.counterexample());
    }

    #[test]
    fn test_zero_trials_is_a_config_error() {
        let config = CheckConfig {
            trials: 0,
            ..CheckConfig::default()
        };
        let result = check_with_config(
            any::<i32>(),
            |_: &i32| -> bool { panic!("no trial may run") },
            config,
        );
        assert_eq!(
            result.unwrap_err(),
            CheckError::Config(ConfigError::InvalidTrials(0))
        );
    }

    #[test]
    fn test_property_panic_is_reported_distinctly() {
        let result = check(ConstantGenerator::new(vec![1, 2]), |v: &Vec<i32>| v[5] > 0);
        match result {
            Err(CheckError::PropertyPanicked {
                trial,
                input,
                message,
            }) => {
                assert_eq!(trial, 0);
                assert_eq!(input, "[1, 2]");
                assert!(message.contains("index out of bounds"));
            }
            other => panic!("Expected PropertyPanicked, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_generator_panic_is_reported() {
        let binding = Binding::new(
            |_rng: &mut dyn rand::RngCore, _config: &GeneratorConfig| -> i32 {
                panic!("generator exploded")
            },
            |_: &i32| None,
        );
        let result = check(binding, |_: &i32| true);
        assert_eq!(
            result.unwrap_err(),
            CheckError::GeneratorPanicked {
                trial: 0,
                message: "generator exploded".to_string()
            }
        );
    }

    #[test]
    fn test_divergent_shrinker_is_reported() {
        // Shrinks upward forever, and every candidate still fails
        let binding = Binding::new(
            |_rng: &mut dyn rand::RngCore, _config: &GeneratorConfig| 1u64,
            |n: &u64| Some(n + 1),
        );
        let result = PropertyTestBuilder::new()
            .max_shrink_iterations(25)
            .run(binding, |_: &u64| false);

        assert_eq!(
            result.unwrap_err(),
            CheckError::ShrinkDiverged {
                iterations: 25,
                last_candidate: "26".to_string()
            }
        );
    }

    #[test]
    fn test_builder_label_and_trials() {
        let result = PropertyTestBuilder::<u8>::new()
            .label("bytes are small")
            .trials(3)
            .seed(9)
            .run_arbitrary(|b: &u8| b.checked_add(0) == Some(*b))
            .unwrap();

        assert!(result.is_passed());
        assert_eq!(result.label(), "bytes are small");
        assert_eq!(result.seed(), 9);
    }

    #[test]
    fn test_check_registered() {
        let registry = GeneratorRegistry::with_defaults();
        let result =
            check_registered::<String, _>(&registry, |s: &String| s.len() < 40, CheckConfig::default());
        assert!(result.unwrap().is_passed());

        let result =
            check_registered::<(u8, u8), _>(&registry, |_: &(u8, u8)| true, CheckConfig::default());
        assert!(matches!(result, Err(CheckError::MissingBinding { .. })));
    }

    #[test]
    fn test_check_arbitrary() {
        let result = check_arbitrary::<Vec<i64>, _>(|v: &Vec<i64>| v.len() < 50).unwrap();
        assert!(result.is_passed());
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic payload");
    }
}

//! Configuration types for controlling check behavior and generation bounds.

use std::fmt;

/// Environment variable overriding the number of trials
pub const ENV_TRIALS: &str = "QUICKPROP_TRIALS";
/// Environment variable fixing the seed
pub const ENV_SEED: &str = "QUICKPROP_SEED";
/// Environment variable enabling verbose progress output
pub const ENV_VERBOSE: &str = "QUICKPROP_VERBOSE";

/// Largest accepted float bound; the width of `[-bound, bound]` must stay
/// finite with room to spare for uniform sampling
pub const MAX_FLOAT_BOUND: f64 = f64::MAX / 4.0;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of trials (must be > 0)
    InvalidTrials(usize),
    /// Invalid number of shrink iterations (must be > 0)
    InvalidShrinkIterations(usize),
    /// A collection length bound that leaves no valid length
    InvalidLengthBound { field: &'static str, value: usize },
    /// Negative integer bound
    InvalidIntBound(i64),
    /// Float bound that is negative, non-finite or above [`MAX_FLOAT_BOUND`]
    InvalidFloatBound(f64),
    /// Character range whose start lies after its end
    InvalidCharRange(char, char),
    /// An environment override that could not be parsed
    InvalidEnvValue { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTrials(n) => {
                write!(f, "Invalid trial count: {} (must be > 0)", n)
            }
            ConfigError::InvalidShrinkIterations(n) => {
                write!(f, "Invalid shrink iterations count: {} (must be > 0)", n)
            }
            ConfigError::InvalidLengthBound { field, value } => {
                write!(f, "Invalid {}: {} (must be > 0)", field, value)
            }
            ConfigError::InvalidIntBound(n) => {
                write!(f, "Invalid integer bound: {} (must be >= 0)", n)
            }
            ConfigError::InvalidFloatBound(x) => {
                write!(
                    f,
                    "Invalid float bound: {} (must be in 0..={:e})",
                    x, MAX_FLOAT_BOUND
                )
            }
            ConfigError::InvalidCharRange(start, end) => {
                write!(f, "Invalid character range: {:?}..={:?}", start, end)
            }
            ConfigError::InvalidEnvValue { var, value } => {
                write!(f, "Invalid value for {}: {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Bounds used by the built-in generators
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Integers are drawn from `[-int_bound, int_bound]`, clamped to the target type
    pub int_bound: i64,
    /// Floats are drawn from `[-float_bound, float_bound]`
    pub float_bound: f64,
    /// Inclusive range of generated characters
    pub char_range: (char, char),
    /// Strings have a length in `[0, max_string_len)`
    pub max_string_len: usize,
    /// Sequences have a length in `[0, max_vec_len)`
    pub max_vec_len: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            int_bound: 10_000,
            float_bound: 10_000.0,
            char_range: ('0', 'z'),
            max_string_len: 40,
            max_vec_len: 50,
        }
    }
}

impl GeneratorConfig {
    /// Validate the generator configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.int_bound < 0 {
            return Err(ConfigError::InvalidIntBound(self.int_bound));
        }
        if !(0.0..=MAX_FLOAT_BOUND).contains(&self.float_bound) {
            return Err(ConfigError::InvalidFloatBound(self.float_bound));
        }
        if self.char_range.0 > self.char_range.1 {
            return Err(ConfigError::InvalidCharRange(
                self.char_range.0,
                self.char_range.1,
            ));
        }
        if self.max_string_len == 0 {
            return Err(ConfigError::InvalidLengthBound {
                field: "max_string_len",
                value: self.max_string_len,
            });
        }
        if self.max_vec_len == 0 {
            return Err(ConfigError::InvalidLengthBound {
                field: "max_vec_len",
                value: self.max_vec_len,
            });
        }
        Ok(())
    }
}

/// Configuration for a single check run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Number of trials to run
    pub trials: usize,
    /// Cap on accepted shrink steps before the shrinker is declared divergent
    pub max_shrink_iterations: usize,
    /// Optional seed for reproducible runs
    pub seed: Option<u64>,
    /// Print progress to stderr
    pub verbose: bool,
    /// Bounds for the built-in generators
    pub generator_config: GeneratorConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            max_shrink_iterations: 10_000,
            seed: None,
            verbose: false,
            generator_config: GeneratorConfig::default(),
        }
    }
}

impl CheckConfig {
    /// Create a new check configuration with validation
    pub fn new(
        trials: usize,
        max_shrink_iterations: usize,
        seed: Option<u64>,
        generator_config: GeneratorConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            trials,
            max_shrink_iterations,
            seed,
            verbose: false,
            generator_config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the check configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::InvalidTrials(self.trials));
        }
        if self.max_shrink_iterations == 0 {
            return Err(ConfigError::InvalidShrinkIterations(
                self.max_shrink_iterations,
            ));
        }
        self.generator_config.validate()?;
        Ok(())
    }

    /// Default configuration with `QUICKPROP_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up by variable name, then validate
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TRIALS) {
            self.trials = parse_env(ENV_TRIALS, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed = Some(parse_env(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_VERBOSE) {
            self.verbose = match value.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnvValue {
                        var: ENV_VERBOSE,
                        value: value.clone(),
                    });
                }
            };
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            var,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.trials, 10);
        assert_eq!(config.max_shrink_iterations, 10_000);
        assert!(config.seed.is_none());
        assert!(!config.verbose);

        let generator_config = GeneratorConfig::default();
        assert_eq!(generator_config.int_bound, 10_000);
        assert_eq!(generator_config.char_range, ('0', 'z'));
        assert_eq!(generator_config.max_string_len, 40);
        assert_eq!(generator_config.max_vec_len, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_check_config_validation() {
        assert_eq!(
            CheckConfig::new(0, 100, None, GeneratorConfig::default()),
            Err(ConfigError::InvalidTrials(0))
        );
        assert_eq!(
            CheckConfig::new(10, 0, None, GeneratorConfig::default()),
            Err(ConfigError::InvalidShrinkIterations(0))
        );

        let config = CheckConfig::new(5, 50, Some(1), GeneratorConfig::default()).unwrap();
        assert_eq!(config.trials, 5);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_generator_config_validation() {
        let config = GeneratorConfig {
            max_vec_len: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLengthBound {
                field: "max_vec_len",
                ..
            })
        ));

        let config = GeneratorConfig {
            float_bound: f64::INFINITY,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFloatBound(_))
        ));

        let config = GeneratorConfig {
            float_bound: 1e308,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFloatBound(1e308)));

        let config = GeneratorConfig {
            float_bound: MAX_FLOAT_BOUND,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = GeneratorConfig {
            char_range: ('z', 'a'),
            ..GeneratorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidCharRange('z', 'a'))
        );

        let config = GeneratorConfig {
            int_bound: -1,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidIntBound(-1)));
    }

    #[test]
    fn test_nested_generator_config_is_validated() {
        let config = CheckConfig {
            generator_config: GeneratorConfig {
                max_string_len: 0,
                ..GeneratorConfig::default()
            },
            ..CheckConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = CheckConfig::default()
            .with_overrides(lookup_from(&[
                (ENV_TRIALS, "25"),
                (ENV_SEED, " 77 "),
                (ENV_VERBOSE, "true"),
            ]))
            .unwrap();

        assert_eq!(config.trials, 25);
        assert_eq!(config.seed, Some(77));
        assert!(config.verbose);
    }

    #[test]
    fn test_overrides_absent_keep_defaults() {
        let config = CheckConfig::default()
            .with_overrides(lookup_from(&[]))
            .unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_invalid_overrides() {
        let result = CheckConfig::default().with_overrides(lookup_from(&[(ENV_TRIALS, "ten")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidEnvValue {
                var: ENV_TRIALS,
                value: "ten".to_string()
            })
        );

        let result = CheckConfig::default().with_overrides(lookup_from(&[(ENV_TRIALS, "0")]));
        assert_eq!(result, Err(ConfigError::InvalidTrials(0)));

        let result = CheckConfig::default().with_overrides(lookup_from(&[(ENV_VERBOSE, "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvValue { .. })));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidTrials(0).to_string(),
            "Invalid trial count: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidLengthBound {
                field: "max_vec_len",
                value: 0
            }
            .to_string(),
            "Invalid max_vec_len: 0 (must be > 0)"
        );
    }
}

#![allow(clippy::result_large_err)]

//! # quickprop - QuickCheck-style property checking
//!
//! quickprop runs a predicate against randomly generated inputs. When an input
//! falsifies the predicate, it is shrunk greedily, one candidate at a time,
//! until no smaller candidate still fails. The result is either the number of
//! trials that passed or the minimal counterexample that was found.
//!
//! ## Quick Start
//!
//! ```rust
//! use quickprop::{CheckResult, any, check, check_with_config, CheckConfig};
//!
//! // Every trial passes
//! let result = check(any::<i32>(), |x: &i32| x.wrapping_add(0) == *x).unwrap();
//! assert!(result.is_passed());
//!
//! // A falsified property reports a shrunk counterexample
//! let config = CheckConfig {
//!     trials: 100,
//!     seed: Some(7),
//!     ..CheckConfig::default()
//! };
//! let result = check_with_config(any::<i32>(), |x: &i32| *x < 100, config).unwrap();
//! if let CheckResult::Failed(failure) = result {
//!     assert!(failure.minimal_input >= 100);
//!     assert!(failure.minimal_input / 2 < 100);
//! }
//! ```

// Public modules
pub mod arbitrary;
pub mod combinators;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
pub mod parallel;
pub mod primitives;
pub mod property;
pub mod report;
pub mod rng;
pub mod shrink;

// Re-export the main public API
pub use arbitrary::Arbitrary;
pub use combinators::{
    MapWith, NoShrink, OptionGenerator, VecGenerator, map_with, no_shrink, option_of, vec_of,
};
pub use config::{CheckConfig, ConfigError, GeneratorConfig};
pub use error::{CheckError, CheckResult, TestFailure, TestSuccess};
pub use execution::{
    PropertyTest, PropertyTestBuilder, check, check_arbitrary, check_registered,
    check_with_config,
};
pub use generator::{Binding, ConstantGenerator, Generator, GeneratorRegistry, Intrinsic, any};
pub use parallel::{CheckSummary, ParallelChecks, ParallelConfig, Verdict};
pub use primitives::{
    BoolGenerator, CharGenerator, FloatGenerator, IntGenerator, StringGenerator, range,
};
pub use property::{Property, args2, args3, negate};
pub use report::{TestRunner, assert_passed};
pub use rng::{RandomSource, create_seeded_rng, partition_seed};
pub use shrink::{ShrinkConfig, ShrinkEngine, ShrinkResult, Shrinkable, shrink_loop};

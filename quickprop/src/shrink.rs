//! Shrinking functionality for minimizing failing test cases.
//!
//! A shrinker proposes exactly one "smaller" candidate per value, or nothing
//! when the value is already minimal. The shrink loop follows that single path
//! greedily for as long as the property keeps failing.

use std::fmt;
use std::time::{Duration, Instant};

use num_traits::{Float, PrimInt};

use crate::error::CheckError;

/// Trait for types that can propose a smaller version of themselves
///
/// Implementations must be well-founded: calling `shrink` repeatedly on a
/// value and its descendants has to reach `None` after finitely many steps.
pub trait Shrinkable: Sized {
    /// Propose a strictly smaller candidate, or `None` if already minimal
    fn shrink(&self) -> Option<Self>;
}

/// Halve an integer, truncating toward zero; zero is minimal
pub fn halve_toward_zero<T: PrimInt>(value: T) -> Option<T> {
    if value == T::zero() {
        None
    } else {
        Some(value / (T::one() + T::one()))
    }
}

/// Halve a float; zero, NaN and the infinities are minimal
pub fn halve_float<T: Float>(value: T) -> Option<T> {
    if value == T::zero() || value.is_nan() || value.is_infinite() {
        None
    } else {
        Some(value / (T::one() + T::one()))
    }
}

macro_rules! impl_int_shrinkable {
    ($($t:ty),*) => {
        $(
            impl Shrinkable for $t {
                fn shrink(&self) -> Option<Self> {
                    halve_toward_zero(*self)
                }
            }
        )*
    };
}

impl_int_shrinkable!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Shrinkable for f32 {
    fn shrink(&self) -> Option<Self> {
        halve_float(*self)
    }
}

impl Shrinkable for f64 {
    fn shrink(&self) -> Option<Self> {
        halve_float(*self)
    }
}

impl Shrinkable for bool {
    fn shrink(&self) -> Option<Self> {
        if *self { Some(false) } else { None }
    }
}

impl Shrinkable for char {
    fn shrink(&self) -> Option<Self> {
        None
    }
}

impl Shrinkable for String {
    /// Drops the first character
    fn shrink(&self) -> Option<Self> {
        let mut chars = self.chars();
        chars.next()?;
        Some(chars.as_str().to_string())
    }
}

impl<T: Clone> Shrinkable for Vec<T> {
    /// Drops the last element
    fn shrink(&self) -> Option<Self> {
        let (_, rest) = self.split_last()?;
        Some(rest.to_vec())
    }
}

impl<T: Shrinkable> Shrinkable for Option<T> {
    /// `Some(v)` shrinks inside; `Some(minimal)` becomes `None`
    fn shrink(&self) -> Option<Self> {
        self.as_ref().map(Shrinkable::shrink)
    }
}

macro_rules! impl_tuple_shrinkable {
    ($(($($name:ident : $idx:tt),+)),*) => {
        $(
            impl<$($name: Shrinkable + Clone),+> Shrinkable for ($($name,)+) {
                /// Shrinks every component that can shrink and passes the
                /// others through; minimal once no component can shrink
                fn shrink(&self) -> Option<Self> {
                    let shrunk = ($(self.$idx.shrink(),)+);
                    if $(shrunk.$idx.is_none())&&+ {
                        return None;
                    }
                    Some(($(shrunk.$idx.unwrap_or_else(|| self.$idx.clone()),)+))
                }
            }
        )*
    };
}

impl_tuple_shrinkable!(
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3)
);

/// Result of a shrinking operation
#[derive(Debug, Clone)]
pub struct ShrinkResult<T> {
    /// Original value that failed
    pub original: T,
    /// Minimal value that still fails
    pub minimal: T,
    /// Number of accepted shrinking steps
    pub shrink_steps: usize,
    /// Time spent shrinking
    pub shrink_duration: Duration,
}

/// Configuration for shrinking behavior
#[derive(Debug, Clone)]
pub struct ShrinkConfig {
    /// Maximum number of accepted shrink steps
    pub max_iterations: usize,
    /// Whether to print each accepted step
    pub verbose: bool,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            verbose: false,
        }
    }
}

impl ShrinkConfig {
    /// Create a shrink configuration with custom max iterations
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// Shrinking engine that runs the greedy single-path descent
#[derive(Debug, Clone, Default)]
pub struct ShrinkEngine {
    config: ShrinkConfig,
}

impl ShrinkEngine {
    /// Create a new shrinking engine with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new shrinking engine with custom configuration
    pub fn with_config(config: ShrinkConfig) -> Self {
        Self { config }
    }

    /// Shrink a value using its intrinsic `Shrinkable` implementation
    pub fn shrink<T, F>(&self, value: T, still_fails: F) -> Result<ShrinkResult<T>, CheckError>
    where
        T: Shrinkable + Clone + fmt::Debug,
        F: FnMut(&T) -> Result<bool, CheckError>,
    {
        self.shrink_with_strategy(value, still_fails, T::shrink)
    }

    /// Shrink a value with an explicit shrink function.
    ///
    /// `initial` is expected to fail already. Each candidate proposed by
    /// `shrink` is re-checked with `still_fails`; the descent stops at the
    /// first candidate that passes or when no candidate is proposed.
    pub fn shrink_with_strategy<T, F, S>(
        &self,
        initial: T,
        mut still_fails: F,
        shrink: S,
    ) -> Result<ShrinkResult<T>, CheckError>
    where
        T: Clone + fmt::Debug,
        F: FnMut(&T) -> Result<bool, CheckError>,
        S: Fn(&T) -> Option<T>,
    {
        let start_time = Instant::now();
        let mut current = initial.clone();
        let mut shrink_steps = 0;

        while let Some(candidate) = shrink(&current) {
            if !still_fails(&candidate)? {
                break;
            }

            if shrink_steps >= self.config.max_iterations {
                if self.config.verbose {
                    eprintln!(
                        "Shrinking did not settle after {} steps, giving up",
                        shrink_steps
                    );
                }
                return Err(CheckError::ShrinkDiverged {
                    iterations: shrink_steps,
                    last_candidate: format!("{:?}", current),
                });
            }

            current = candidate;
            shrink_steps += 1;

            if self.config.verbose {
                eprintln!("Shrink step {}: still failing with {:?}", shrink_steps, current);
            }
        }

        if self.config.verbose {
            eprintln!("Shrinking completed after {} steps", shrink_steps);
        }

        Ok(ShrinkResult {
            original: initial,
            minimal: current,
            shrink_steps,
            shrink_duration: start_time.elapsed(),
        })
    }
}

/// Greedy shrink loop with the default iteration cap.
///
/// Returns the last candidate for which `still_fails` held. Only a shrink
/// function that never bottoms out produces an error.
pub fn shrink_loop<T, F, S>(initial: T, still_fails: F, shrink: S) -> Result<T, CheckError>
where
    T: Clone + fmt::Debug,
    F: Fn(&T) -> bool,
    S: Fn(&T) -> Option<T>,
{
    ShrinkEngine::new()
        .shrink_with_strategy(initial, |candidate| Ok(still_fails(candidate)), shrink)
        .map(|result| result.minimal)
}

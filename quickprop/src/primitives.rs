//! Bounded generators for primitive types.
//!
//! The intrinsic bindings from [`crate::generator::any`] draw from the global
//! [`GeneratorConfig`] bounds. These generators carry their own bounds and
//! keep every shrink candidate inside them.

use num_traits::PrimInt;
use rand::distributions::uniform::SampleUniform;

use crate::config::GeneratorConfig;
use crate::generator::Generator;
use crate::rng::RandomSource;
use crate::shrink::halve_float;

/// Generator for boolean values
#[derive(Debug, Clone)]
pub struct BoolGenerator;

impl Generator<bool> for BoolGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> bool {
        use rand::Rng;
        rng.r#gen()
    }

    fn shrink(&self, value: &bool) -> Option<bool> {
        // For booleans, shrink true to false
        if *value { Some(false) } else { None }
    }
}

/// Generator for integers in an inclusive range
#[derive(Debug, Clone)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: PrimInt,
{
    /// Create a new integer generator; the bounds are reordered if reversed
    pub fn new(min: T, max: T) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Create a generator for the full range of the type
    pub fn full_range() -> Self {
        Self::new(T::min_value(), T::max_value())
    }

    /// The value shrinking heads for: zero, or the bound closest to it
    fn target(&self) -> T {
        if self.min > T::zero() {
            self.min
        } else if self.max < T::zero() {
            self.max
        } else {
            T::zero()
        }
    }
}

impl<T> Generator<T> for IntGenerator<T>
where
    T: PrimInt + SampleUniform,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> T {
        rng.next_in_range(self.min, self.max)
    }

    fn shrink(&self, value: &T) -> Option<T> {
        let value = *value;
        let target = self.target();

        if value == target {
            return None;
        }
        if value < self.min || value > self.max {
            return Some(target);
        }

        let two = T::one() + T::one();
        if target == T::zero() {
            // Same chain as the intrinsic integers: n / 2 toward zero
            return Some(value / two);
        }

        // Range excludes zero: halve the distance to the nearest bound.
        // Value and target share a sign, so the difference cannot overflow.
        let step = (value - target) / two;
        if step == T::zero() {
            Some(target)
        } else {
            Some(value - step)
        }
    }
}

/// Integer generator over `min..=max`
pub fn range<T: PrimInt>(min: T, max: T) -> IntGenerator<T> {
    IntGenerator::new(min, max)
}

/// Generator for floating-point values in an inclusive range
#[derive(Debug, Clone)]
pub struct FloatGenerator<T> {
    min: T,
    max: T,
}

impl<T> FloatGenerator<T>
where
    T: Copy + PartialOrd,
{
    /// Create a new float generator with the specified range
    pub fn new(min: T, max: T) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

macro_rules! impl_float_generator {
    ($($t:ty),*) => {
        $(
            impl Generator<$t> for FloatGenerator<$t> {
                fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> $t {
                    rng.next_in_range(self.min, self.max)
                }

                fn shrink(&self, value: &$t) -> Option<$t> {
                    // Halving only moves toward zero, so stop at the range edge
                    halve_float(*value).filter(|candidate| (self.min..=self.max).contains(candidate))
                }
            }

            impl FloatGenerator<$t> {
                /// Create a generator for a reasonable range of values
                pub fn reasonable_range() -> Self {
                    Self::new(-1000.0, 1000.0)
                }
            }
        )*
    };
}

impl_float_generator!(f32, f64);

/// Generator for characters drawn from a set of inclusive ranges
#[derive(Debug, Clone)]
pub struct CharGenerator {
    ranges: Vec<(char, char)>,
}

impl CharGenerator {
    /// Generator for printable ASCII characters
    pub fn ascii_printable() -> Self {
        Self::with_ranges(vec![(' ', '~')])
    }

    /// Generator for ASCII letters and digits
    pub fn ascii_alphanumeric() -> Self {
        Self::with_ranges(vec![('0', '9'), ('A', 'Z'), ('a', 'z')])
    }

    /// Generator with custom character ranges; empty or reversed ranges are dropped
    pub fn with_ranges(ranges: Vec<(char, char)>) -> Self {
        let ranges = ranges
            .into_iter()
            .filter(|(start, end)| start <= end)
            .collect();
        Self { ranges }
    }

    /// The smallest character this generator can produce
    fn lowest(&self) -> Option<char> {
        self.ranges.iter().map(|(start, _)| *start).min()
    }
}

impl Generator<char> for CharGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> char {
        if self.ranges.is_empty() {
            let (start, end) = config.char_range;
            return rng.next_in_range(start, end);
        }

        let (start, end) = self.ranges[rng.next_below(self.ranges.len())];
        rng.next_in_range(start, end)
    }

    fn shrink(&self, value: &char) -> Option<char> {
        // One step straight to the lowest character
        self.lowest().filter(|lowest| lowest < value)
    }
}

/// Generator for strings with a custom alphabet and length range
#[derive(Debug, Clone)]
pub struct StringGenerator {
    char_generator: CharGenerator,
    min_length: usize,
    max_length: usize,
}

impl StringGenerator {
    /// Printable ASCII strings with a length in `min_length..=max_length`
    pub fn ascii_printable(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::ascii_printable(), min_length, max_length)
    }

    /// Alphanumeric strings with a length in `min_length..=max_length`
    pub fn ascii_alphanumeric(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::ascii_alphanumeric(), min_length, max_length)
    }

    /// Strings built from a custom character generator
    pub fn with_char_generator(
        char_generator: CharGenerator,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            char_generator,
            min_length: min_length.min(max_length),
            max_length: max_length.max(min_length),
        }
    }
}

impl Generator<String> for StringGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> String {
        let length = rng.next_in_range(self.min_length, self.max_length);
        (0..length)
            .map(|_| self.char_generator.generate(rng, config))
            .collect()
    }

    fn shrink(&self, value: &String) -> Option<String> {
        // Drop the first character while the minimum length allows it
        if value.chars().count() <= self.min_length {
            return None;
        }
        let mut chars = value.chars();
        chars.next();
        Some(chars.as_str().to_string())
    }
}

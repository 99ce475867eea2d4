//! Arbitrary trait and the built-in generation contracts.
//!
//! `Arbitrary` is the intrinsic half of a binding: a type that implements it
//! knows how to produce a random instance of itself within the bounds of a
//! [`GeneratorConfig`]. Shrinking is the separate [`Shrinkable`] capability;
//! [`crate::generator::any`] pairs the two.
//!
//! [`Shrinkable`]: crate::shrink::Shrinkable

use num_traits::{NumCast, PrimInt};
use rand::{Rng, RngCore};

use crate::config::GeneratorConfig;
use crate::rng::RandomSource;

/// Trait for types that can generate arbitrary instances of themselves
pub trait Arbitrary: Sized {
    /// Generate one random instance, consulting `rng` for randomness
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self;
}

/// The symmetric range `[-bound, bound]`, clamped to what `T` can represent
pub fn int_bounds<T: PrimInt>(bound: i64) -> (T, T) {
    let bound = bound.max(0);
    let low = <T as NumCast>::from(-bound).unwrap_or_else(T::min_value);
    let high = <T as NumCast>::from(bound).unwrap_or_else(T::max_value);
    (low, high)
}

macro_rules! impl_int_arbitrary {
    ($($t:ty),*) => {
        $(
            impl Arbitrary for $t {
                fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
                    let (low, high) = int_bounds::<$t>(config.int_bound);
                    rng.next_in_range(low, high)
                }
            }
        )*
    };
}

impl_int_arbitrary!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Arbitrary for f64 {
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        rng.next_in_range(-config.float_bound, config.float_bound)
    }
}

impl Arbitrary for f32 {
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        // Same headroom as `MAX_FLOAT_BOUND`, scaled to f32
        let bound = config.float_bound.min((f32::MAX / 4.0) as f64) as f32;
        rng.next_in_range(-bound, bound)
    }
}

impl Arbitrary for bool {
    fn arbitrary(rng: &mut dyn RngCore, _config: &GeneratorConfig) -> Self {
        rng.r#gen()
    }
}

impl Arbitrary for char {
    /// Drawn from `config.char_range`, a small printable subset by default
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        let (start, end) = config.char_range;
        rng.next_in_range(start, end)
    }
}

impl Arbitrary for String {
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        let length = rng.next_below(config.max_string_len);
        (0..length).map(|_| char::arbitrary(rng, config)).collect()
    }
}

impl<T: Arbitrary> Arbitrary for Vec<T> {
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        let length = rng.next_below(config.max_vec_len);
        (0..length).map(|_| T::arbitrary(rng, config)).collect()
    }
}

impl<T: Arbitrary> Arbitrary for Option<T> {
    /// `None` one time in four
    fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
        if rng.next_below(4) == 0 {
            None
        } else {
            Some(T::arbitrary(rng, config))
        }
    }
}

macro_rules! impl_tuple_arbitrary {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name: Arbitrary),+> Arbitrary for ($($name,)+) {
                fn arbitrary(rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self {
                    ($($name::arbitrary(rng, config),)+)
                }
            }
        )*
    };
}

impl_tuple_arbitrary!((A, B), (A, B, C), (A, B, C, D));

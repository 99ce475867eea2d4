//! Bindings built out of other bindings.
//!
//! Tuples of generators are generators of tuples. Their shrinker shrinks
//! every component that can still shrink and passes the others through
//! unchanged; a tuple is minimal only once all of its components are.

use std::marker::PhantomData;

use crate::config::GeneratorConfig;
use crate::generator::Generator;
use crate::rng::RandomSource;

macro_rules! impl_tuple_generator {
    ($(($($name:ident : $gen:ident : $idx:tt),+)),*) => {
        $(
            impl<$($name,)+ $($gen,)+> Generator<($($name,)+)> for ($($gen,)+)
            where
                $($gen: Generator<$name>, $name: Clone,)+
            {
                fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> ($($name,)+) {
                    ($(self.$idx.generate(rng, config),)+)
                }

                fn shrink(&self, value: &($($name,)+)) -> Option<($($name,)+)> {
                    let mut shrunk_any = false;
                    let candidate = ($(
                        match self.$idx.shrink(&value.$idx) {
                            Some(smaller) => {
                                shrunk_any = true;
                                smaller
                            }
                            None => value.$idx.clone(),
                        },
                    )+);
                    if shrunk_any { Some(candidate) } else { None }
                }
            }
        )*
    };
}

impl_tuple_generator!(
    (A: GA: 0, B: GB: 1),
    (A: GA: 0, B: GB: 1, C: GC: 2),
    (A: GA: 0, B: GB: 1, C: GC: 2, D: GD: 3)
);

/// Generator for `Vec<T>` built from an element generator
#[derive(Debug, Clone)]
pub struct VecGenerator<G> {
    element_generator: G,
    max_length: Option<usize>,
}

impl<G> VecGenerator<G> {
    /// Sequences with a length in `[0, config.max_vec_len)`
    pub fn new(element_generator: G) -> Self {
        Self {
            element_generator,
            max_length: None,
        }
    }

    /// Sequences with a length in `[0, max_length)`, ignoring the config bound
    pub fn with_max_length(element_generator: G, max_length: usize) -> Self {
        Self {
            element_generator,
            max_length: Some(max_length.max(1)),
        }
    }
}

impl<T, G> Generator<Vec<T>> for VecGenerator<G>
where
    G: Generator<T>,
    T: Clone,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> Vec<T> {
        let bound = self.max_length.unwrap_or(config.max_vec_len);
        let length = rng.next_below(bound);
        (0..length)
            .map(|_| self.element_generator.generate(rng, config))
            .collect()
    }

    fn shrink(&self, value: &Vec<T>) -> Option<Vec<T>> {
        // Drop the last element; elements themselves are not shrunk
        value.split_last().map(|(_, rest)| rest.to_vec())
    }
}

/// Sequences of values drawn from `element_generator`
pub fn vec_of<G>(element_generator: G) -> VecGenerator<G> {
    VecGenerator::new(element_generator)
}

/// Generator for `Option<T>` wrapping an inner generator
#[derive(Debug, Clone)]
pub struct OptionGenerator<G> {
    inner: G,
}

impl<T, G> Generator<Option<T>> for OptionGenerator<G>
where
    G: Generator<T>,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> Option<T> {
        if rng.next_below(4) == 0 {
            None
        } else {
            Some(self.inner.generate(rng, config))
        }
    }

    fn shrink(&self, value: &Option<T>) -> Option<Option<T>> {
        // Some(x) shrinks inside; once x is minimal the next step is None
        value.as_ref().map(|inner| self.inner.shrink(inner))
    }
}

/// Optional values: `None` one time in four, otherwise drawn from `inner`
pub fn option_of<G>(inner: G) -> OptionGenerator<G> {
    OptionGenerator { inner }
}

/// Binding transported through a bijection between `S` and `T`
pub struct MapWith<G, F, B, S> {
    inner: G,
    forward: F,
    backward: B,
    _phantom: PhantomData<fn(S) -> S>,
}

impl<G, F, B, S, T> Generator<T> for MapWith<G, F, B, S>
where
    G: Generator<S>,
    F: Fn(S) -> T,
    B: Fn(&T) -> S,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        (self.forward)(self.inner.generate(rng, config))
    }

    fn shrink(&self, value: &T) -> Option<T> {
        self.inner
            .shrink(&(self.backward)(value))
            .map(&self.forward)
    }
}

impl<G: std::fmt::Debug, F, B, S> std::fmt::Debug for MapWith<G, F, B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWith").field("inner", &self.inner).finish()
    }
}

/// Build a binding for `T` from a binding for `S` and a bijection.
///
/// `backward` must invert `forward`; shrinking maps a value back to `S`,
/// shrinks it there and maps the candidate forward again.
pub fn map_with<G, F, B, S, T>(inner: G, forward: F, backward: B) -> MapWith<G, F, B, S>
where
    G: Generator<S>,
    F: Fn(S) -> T,
    B: Fn(&T) -> S,
{
    MapWith {
        inner,
        forward,
        backward,
        _phantom: PhantomData,
    }
}

/// Binding that generates like its inner binding but never shrinks
#[derive(Debug, Clone)]
pub struct NoShrink<G> {
    inner: G,
}

impl<T, G: Generator<T>> Generator<T> for NoShrink<G> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        self.inner.generate(rng, config)
    }

    fn shrink(&self, _value: &T) -> Option<T> {
        None
    }
}

/// Disable shrinking for `inner`; failures report the original input
pub fn no_shrink<G>(inner: G) -> NoShrink<G> {
    NoShrink { inner }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{any, ConstantGenerator};
    use crate::primitives::range;
    use crate::rng::create_seeded_rng;

    #[test]
    fn test_tuple_generation() {
        let generator = (range(0, 9), any::<bool>());
        let mut rng = create_seeded_rng(1);
        let config = GeneratorConfig::default();

        for _ in 0..50 {
            let (n, _flag) = generator.generate(&mut rng, &config);
            assert!((0..=9).contains(&n));
        }
    }

    #[test]
    fn test_tuple_shrinks_every_component() {
        let generator = (any::<i32>(), any::<i32>());
        assert_eq!(generator.shrink(&(8, 3)), Some((4, 1)));
        assert_eq!(generator.shrink(&(0, 3)), Some((0, 1)));
        assert_eq!(generator.shrink(&(8, 0)), Some((4, 0)));
        assert_eq!(generator.shrink(&(0, 0)), None);
    }

    #[test]
    fn test_tuple_with_non_shrinking_component() {
        let generator = (ConstantGenerator::new('x'), any::<String>(), any::<bool>());
        assert_eq!(
            generator.shrink(&('x', "ab".to_string(), true)),
            Some(('x', "b".to_string(), false))
        );
        assert_eq!(generator.shrink(&('x', String::new(), false)), None);

        let generator = (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>());
        assert_eq!(generator.shrink(&(1, 0, 0, 2)), Some((0, 0, 0, 1)));
    }

    #[test]
    fn test_vec_of_lengths() {
        let generator = vec_of(range(1u8, 3));
        let mut rng = create_seeded_rng(2);
        let config = GeneratorConfig {
            max_vec_len: 5,
            ..GeneratorConfig::default()
        };

        let mut saw_empty = false;
        for _ in 0..200 {
            let v = generator.generate(&mut rng, &config);
            assert!(v.len() < 5);
            assert!(v.iter().all(|x| (1..=3).contains(x)));
            saw_empty |= v.is_empty();
        }
        assert!(saw_empty);
    }

    #[test]
    fn test_vec_with_max_length() {
        let generator = VecGenerator::with_max_length(any::<i32>(), 3);
        let mut rng = create_seeded_rng(3);
        let config = GeneratorConfig::default();

        for _ in 0..100 {
            assert!(generator.generate(&mut rng, &config).len() < 3);
        }
    }

    #[test]
    fn test_vec_shrinks_by_dropping_last() {
        let generator = vec_of(any::<i32>());
        assert_eq!(generator.shrink(&vec![5, 6, 7]), Some(vec![5, 6]));
        assert_eq!(generator.shrink(&vec![5]), Some(vec![]));
        assert_eq!(generator.shrink(&vec![]), None);
    }

    #[test]
    fn test_option_of() {
        let generator = option_of(any::<u32>());
        let mut rng = create_seeded_rng(4);
        let config = GeneratorConfig::default();

        let nones = (0..400)
            .filter(|_| generator.generate(&mut rng, &config).is_none())
            .count();
        assert!(nones > 50 && nones < 150);

        assert_eq!(generator.shrink(&Some(9)), Some(Some(4)));
        assert_eq!(generator.shrink(&Some(0)), Some(None));
        assert_eq!(generator.shrink(&None), None);
    }

    #[test]
    fn test_map_with_round_trips_through_source() {
        // Even numbers as the image of i32 under doubling
        let generator = map_with(range(0i32, 500), |n| n * 2, |even: &i32| even / 2);
        let mut rng = create_seeded_rng(5);
        let config = GeneratorConfig::default();

        for _ in 0..100 {
            let value = generator.generate(&mut rng, &config);
            assert_eq!(value % 2, 0);
            assert!((0..=1000).contains(&value));
        }

        assert_eq!(generator.shrink(&40), Some(20));
        assert_eq!(generator.shrink(&2), Some(0));
        assert_eq!(generator.shrink(&0), None);
    }

    #[test]
    fn test_map_with_changes_type() {
        let generator = map_with(
            any::<Vec<bool>>(),
            |bits: Vec<bool>| bits.iter().map(|b| if *b { '1' } else { '0' }).collect::<String>(),
            |s: &String| s.chars().map(|c| c == '1').collect::<Vec<bool>>(),
        );
        assert_eq!(generator.shrink(&"101".to_string()), Some("10".to_string()));
    }

    #[test]
    fn test_no_shrink() {
        let generator = no_shrink(any::<i32>());
        let mut rng = create_seeded_rng(6);
        let config = GeneratorConfig::default();

        let value = generator.generate(&mut rng, &config);
        assert!((-10_000..=10_000).contains(&value));
        assert_eq!(generator.shrink(&value), None);
        assert_eq!(generator.shrink(&8000), None);
    }
}

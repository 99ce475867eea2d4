//! Core binding infrastructure and registry system.
//!
//! A [`Generator<T>`] is the engine's view of an arbitrary binding: it can
//! produce a random `T` and propose one smaller candidate for a given `T`.
//! Bindings come from two places:
//!
//! - intrinsic: [`any::<T>()`](any) pairs a type's own [`Arbitrary`] and
//!   [`Shrinkable`] implementations;
//! - constructed: [`Binding::new`] bundles two closures, and the combinators in
//!   [`crate::combinators`] build bindings out of other bindings.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::arbitrary::Arbitrary;
use crate::config::GeneratorConfig;
use crate::error::CheckError;
use crate::shrink::Shrinkable;

/// Core generator trait for creating and shrinking random test data
pub trait Generator<T> {
    /// Generate a random value of type T using the provided RNG and configuration
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T;

    /// Propose one smaller candidate, or `None` if `value` is already minimal
    fn shrink(&self, value: &T) -> Option<T>;
}

impl<T, G: Generator<T> + ?Sized> Generator<T> for &G {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        (**self).generate(rng, config)
    }

    fn shrink(&self, value: &T) -> Option<T> {
        (**self).shrink(value)
    }
}

impl<T, G: Generator<T> + ?Sized> Generator<T> for Box<G> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        (**self).generate(rng, config)
    }

    fn shrink(&self, value: &T) -> Option<T> {
        (**self).shrink(value)
    }
}

/// Binding backed by a type's intrinsic `Arbitrary` and `Shrinkable` impls
pub struct Intrinsic<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Intrinsic<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Intrinsic<T> {}

impl<T> std::fmt::Debug for Intrinsic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Intrinsic<{}>", std::any::type_name::<T>())
    }
}

impl<T: Arbitrary + Shrinkable> Generator<T> for Intrinsic<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        T::arbitrary(rng, config)
    }

    fn shrink(&self, value: &T) -> Option<T> {
        Shrinkable::shrink(value)
    }
}

/// The intrinsic binding for `T`
pub fn any<T: Arbitrary + Shrinkable>() -> Intrinsic<T> {
    Intrinsic {
        _phantom: PhantomData,
    }
}

type GenerateFn<T> = dyn Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> T + Send + Sync;
type ShrinkFn<T> = dyn Fn(&T) -> Option<T> + Send + Sync;

/// A constructed binding: one generate function and one shrink function.
///
/// This is how types that cannot (or should not) implement the intrinsic
/// capabilities get into the engine, and also how any binding is stored
/// type-erased.
pub struct Binding<T> {
    generate: Box<GenerateFn<T>>,
    shrink: Box<ShrinkFn<T>>,
}

impl<T> Binding<T> {
    /// Build a binding from two closures
    pub fn new<G, S>(generate: G, shrink: S) -> Self
    where
        G: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> T + Send + Sync + 'static,
        S: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            generate: Box::new(generate),
            shrink: Box::new(shrink),
        }
    }

    /// Erase the concrete type of any generator
    pub fn from_generator<G>(generator: G) -> Self
    where
        G: Generator<T> + Send + Sync + 'static,
        T: 'static,
    {
        let generator = std::sync::Arc::new(generator);
        let shrinker = std::sync::Arc::clone(&generator);
        Self::new(
            move |rng, config| generator.generate(rng, config),
            move |value| shrinker.shrink(value),
        )
    }
}

impl<T> Generator<T> for Binding<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        (self.generate)(rng, config)
    }

    fn shrink(&self, value: &T) -> Option<T> {
        (self.shrink)(value)
    }
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Binding<{}>", std::any::type_name::<T>())
    }
}

/// A simple generator that always produces the same value
#[derive(Debug, Clone)]
pub struct ConstantGenerator<T> {
    value: T,
}

impl<T: Clone> ConstantGenerator<T> {
    /// Create a new constant generator
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Generator<T> for ConstantGenerator<T> {
    fn generate(&self, _rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> T {
        self.value.clone()
    }

    fn shrink(&self, _value: &T) -> Option<T> {
        // A constant value cannot be shrunk
        None
    }
}

/// Type-safe registry for storing and retrieving bindings
pub struct GeneratorRegistry {
    generators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl GeneratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in intrinsic bindings
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<i32, _>(any::<i32>());
        registry.register::<i64, _>(any::<i64>());
        registry.register::<u32, _>(any::<u32>());
        registry.register::<u64, _>(any::<u64>());
        registry.register::<usize, _>(any::<usize>());
        registry.register::<f64, _>(any::<f64>());
        registry.register::<bool, _>(any::<bool>());
        registry.register::<char, _>(any::<char>());
        registry.register::<String, _>(any::<String>());
        registry.register::<Vec<i32>, _>(any::<Vec<i32>>());
        registry.register::<Vec<i64>, _>(any::<Vec<i64>>());
        registry.register::<Vec<String>, _>(any::<Vec<String>>());
        registry
    }

    /// Register a binding for a specific type, replacing any previous one
    pub fn register<T: 'static, G: Generator<T> + Send + Sync + 'static>(&mut self, generator: G) {
        let type_id = TypeId::of::<T>();
        self.generators
            .insert(type_id, Box::new(Binding::from_generator(generator)));
    }

    /// Get the binding for a specific type
    pub fn get<T: 'static>(&self) -> Option<&Binding<T>> {
        let type_id = TypeId::of::<T>();
        self.generators
            .get(&type_id)
            .and_then(|boxed| boxed.downcast_ref::<Binding<T>>())
    }

    /// Get the binding for a specific type, or the configuration error for its absence
    pub fn require<T: 'static>(&self) -> Result<&Binding<T>, CheckError> {
        self.get::<T>().ok_or(CheckError::MissingBinding {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Check if a binding is registered for a specific type
    pub fn contains<T: 'static>(&self) -> bool {
        self.generators.contains_key(&TypeId::of::<T>())
    }

    /// Remove the binding for a specific type
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.generators.remove(&TypeId::of::<T>()).is_some()
    }

    /// Get the number of registered bindings
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

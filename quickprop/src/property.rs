//! Property definition trait and adapters for multi-argument predicates.

/// A predicate over generated inputs
///
/// Implemented for every `Fn(&T) -> bool`, so plain closures and functions
/// are properties. A property that panics is treated as a defect in the
/// property itself, not as a falsification.
pub trait Property<T> {
    /// Whether the property holds for `input`
    fn holds(&self, input: &T) -> bool;
}

impl<T, F> Property<T> for F
where
    F: Fn(&T) -> bool,
{
    fn holds(&self, input: &T) -> bool {
        self(input)
    }
}

/// Lift a two-argument predicate to a property over pairs
pub fn args2<A, B, F>(predicate: F) -> impl Fn(&(A, B)) -> bool
where
    F: Fn(&A, &B) -> bool,
{
    move |(a, b): &(A, B)| predicate(a, b)
}

/// Lift a three-argument predicate to a property over triples
pub fn args3<A, B, C, F>(predicate: F) -> impl Fn(&(A, B, C)) -> bool
where
    F: Fn(&A, &B, &C) -> bool,
{
    move |(a, b, c): &(A, B, C)| predicate(a, b, c)
}

/// Property that holds when `property` fails
pub fn negate<T, P: Property<T>>(property: P) -> impl Fn(&T) -> bool {
    move |input: &T| !property.holds(input)
}

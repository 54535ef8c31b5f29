//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Two inventory records with the same name and quantity
//! are indistinguishable, which is exactly why removal works by name.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// construct a new one. Constructors are the place to enforce validity, so a
/// value object that exists is always a valid one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Quantity(u32);
///
/// impl ValueObject for Quantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! Value object trait: equality by value, not identity.
//!
//! Every record on an invoice (parties, order and invoice details, line items)
//! is a value object. Nothing on an invoice has an identity of its own; the
//! position of a line item in its sequence is its serial number.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. The tax engine follows this rule: it never touches the
/// caller's line items and instead returns freshly built computed items.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Jurisdiction {
///     state: String,
///     city: String,
/// }
///
/// impl ValueObject for Jurisdiction {}
///
/// let a = Jurisdiction { state: "KARNATAKA".into(), city: "BENGALURU".into() };
/// let b = a.clone();
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

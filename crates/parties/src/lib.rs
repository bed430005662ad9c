//! Parties on an invoice: the seller and the billing/shipping addresses.
//!
//! Pure value types. The only rule here is how a jurisdiction is read from an
//! address; deciding the tax regime from two jurisdictions is the tax engine's job.

pub mod party;

pub use party::{AddressDetails, AddressKind, Jurisdiction, SellerDetails};

//! `gstinvoice-core`: foundation shared by every invoice crate.
//!
//! Error taxonomy, monetary helpers and the value-object marker. Pure code: no
//! IO lives here.

pub mod error;
pub mod money;
pub mod value_object;

pub use error::{InvoiceError, InvoiceResult};
pub use money::{format_money, parse_amount, parse_quantity, round_money};
pub use value_object::ValueObject;

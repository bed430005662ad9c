//! Invoicing domain: line items, GST computation, totals and amount in words.
//!
//! Deterministic domain logic only (no file or network IO). The renderer
//! consumes [`ComputedInvoice`]; nothing flows back from it.

pub mod document;
pub mod invoice;
pub mod line_item;
pub mod sample;
pub mod tax;
pub mod totals;
pub mod words;

pub use document::{AmountField, InvoiceDocument, LineItemRecord};
pub use invoice::{ComputedInvoice, Invoice, InvoiceDetails, OrderDetails, SignatureSource};
pub use line_item::{ComputedLineItem, LineItem, TaxType};
pub use tax::{SplitTotalPolicy, TaxEngine, TaxRates};
pub use totals::grand_total;
pub use words::{LocaleTag, group_digits, to_words};

//! JSON input form of an invoice.
//!
//! Amounts may be written as strings (`"538.10"`) or JSON numbers. Strings are
//! preferred: they reach the tax engine without passing through binary floating
//! point. Pincodes and state codes accept either form as well.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use gstinvoice_core::money::{parse_amount, parse_quantity};
use gstinvoice_core::{InvoiceError, InvoiceResult};
use gstinvoice_parties::{AddressDetails, SellerDetails};

use crate::invoice::{Invoice, InvoiceDetails, OrderDetails, SignatureSource};
use crate::line_item::LineItem;

/// Signature file used when the document does not name one.
pub const DEFAULT_SIGNATURE_PATH: &str = "signature.jpg";

/// A numeric input field as written by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Text(String),
    Number(serde_json::Number),
    /// Anything else (booleans, nulls, objects); always rejected.
    Other(serde_json::Value),
}

impl Default for AmountField {
    fn default() -> Self {
        AmountField::Text("0".to_string())
    }
}

impl AmountField {
    fn as_text(&self, field: &str) -> InvoiceResult<String> {
        match self {
            AmountField::Text(s) => Ok(s.clone()),
            AmountField::Number(n) => Ok(n.to_string()),
            AmountField::Other(v) => Err(InvoiceError::invalid_amount(format!(
                "{field}: {v} is not numeric"
            ))),
        }
    }
}

impl From<&str> for AmountField {
    fn from(value: &str) -> Self {
        AmountField::Text(value.to_string())
    }
}

/// Line item as it appears in the input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub description: String,
    pub unit_price: AmountField,
    pub quantity: AmountField,
    #[serde(default)]
    pub discount: AmountField,
}

impl LineItemRecord {
    /// Validate and convert; fails with `InvalidAmount` on bad numbers.
    pub fn to_line_item(&self) -> InvoiceResult<LineItem> {
        let unit_price = parse_amount("unit_price", &self.unit_price.as_text("unit_price")?)?;
        let quantity = parse_quantity(&self.quantity.as_text("quantity")?)?;
        let discount = parse_amount("discount", &self.discount.as_text("discount")?)?;
        LineItem::new(self.description.clone(), unit_price, quantity, discount)
    }
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            unit_price: AmountField::Text(item.unit_price.to_string()),
            quantity: AmountField::Number(item.quantity.into()),
            discount: AmountField::Text(item.discount.to_string()),
        }
    }
}

/// Complete invoice input, one JSON object per invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub seller: SellerDetails,
    pub billing: AddressDetails,
    pub shipping: AddressDetails,
    pub order: OrderDetails,
    pub invoice: InvoiceDetails,
    pub items: Vec<LineItemRecord>,
    pub reverse_charge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_path: Option<PathBuf>,
}

impl InvoiceDocument {
    pub fn from_json(text: &str) -> InvoiceResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| InvoiceError::validation(format!("invalid invoice document: {e}")))
    }

    pub fn to_json_pretty(&self) -> InvoiceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InvoiceError::validation(format!("cannot encode invoice document: {e}")))
    }

    /// Build the aggregate, validating every line item in order.
    pub fn into_invoice(self) -> InvoiceResult<Invoice> {
        let items = self
            .items
            .iter()
            .map(LineItemRecord::to_line_item)
            .collect::<InvoiceResult<Vec<_>>>()?;

        let signature = self
            .signature_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SIGNATURE_PATH));

        Ok(Invoice {
            seller: self.seller,
            billing: self.billing,
            shipping: self.shipping,
            order: self.order,
            invoice: self.invoice,
            items,
            reverse_charge: self.reverse_charge,
            signature: SignatureSource::Path(signature),
        })
    }

    /// Document form of an in-memory invoice. Inline signature bytes are not
    /// representable and are dropped.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let signature_path = match &invoice.signature {
            SignatureSource::Path(path) => Some(path.clone()),
            SignatureSource::Bytes(_) => None,
        };
        Self {
            seller: invoice.seller.clone(),
            billing: invoice.billing.clone(),
            shipping: invoice.shipping.clone(),
            order: invoice.order.clone(),
            invoice: invoice.invoice.clone(),
            items: invoice.items.iter().map(LineItemRecord::from).collect(),
            reverse_charge: invoice.reverse_charge.clone(),
            signature_path,
        }
    }
}

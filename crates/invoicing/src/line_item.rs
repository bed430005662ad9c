use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstinvoice_core::money::{ensure_non_negative, parse_amount, parse_quantity};
use gstinvoice_core::{InvoiceError, InvoiceResult, ValueObject};

/// Input line item: what the seller charges for, before tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub discount: Decimal,
}

impl ValueObject for LineItem {}

impl LineItem {
    /// Build a validated line item.
    pub fn new(
        description: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        discount: Decimal,
    ) -> InvoiceResult<Self> {
        let item = Self {
            description: description.into(),
            unit_price,
            quantity,
            discount,
        };
        item.validate()?;
        Ok(item)
    }

    /// Build a line item from textual amounts (e.g. `"538.10"`, `"1"`, `"0"`).
    pub fn parse(
        description: impl Into<String>,
        unit_price: &str,
        quantity: &str,
        discount: &str,
    ) -> InvoiceResult<Self> {
        Ok(Self {
            description: description.into(),
            unit_price: parse_amount("unit_price", unit_price)?,
            quantity: parse_quantity(quantity)?,
            discount: parse_amount("discount", discount)?,
        })
    }

    /// Reject negative unit price or discount.
    pub fn validate(&self) -> InvoiceResult<()> {
        ensure_non_negative("unit_price", self.unit_price)?;
        ensure_non_negative("discount", self.discount)?;
        Ok(())
    }

    /// `unit_price × quantity − discount`, exact.
    pub fn net_amount(&self) -> InvoiceResult<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .and_then(|gross| gross.checked_sub(self.discount))
            .ok_or_else(|| {
                InvoiceError::invalid_amount(format!(
                    "net amount overflow for {:?}",
                    self.description
                ))
            })
    }
}

/// Tax regime applied to a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    /// Intra-state: central + state components in equal halves.
    #[serde(rename = "CGST_SGST")]
    CgstSgst,
    /// Inter-state: one integrated tax.
    #[serde(rename = "IGST")]
    Igst,
}

impl TaxType {
    /// Label of the (first) component printed in the tax type column.
    pub fn label(self) -> &'static str {
        match self {
            TaxType::CgstSgst => "CGST",
            TaxType::Igst => "IGST",
        }
    }
}

impl core::fmt::Display for TaxType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TaxType::CgstSgst => f.write_str("CGST_SGST"),
            TaxType::Igst => f.write_str("IGST"),
        }
    }
}

/// Line item with every tax-derived amount filled in.
///
/// Only [`crate::TaxEngine`] builds these, so a half-computed item cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputedLineItem {
    pub(crate) item: LineItem,
    pub(crate) net_amount: Decimal,
    pub(crate) tax_type: TaxType,
    pub(crate) tax_rate: Decimal,
    pub(crate) tax_amount: Decimal,
    pub(crate) total_amount: Decimal,
    pub(crate) tax_amount_sgst: Decimal,
    pub(crate) total_amount_sgst: Decimal,
    pub(crate) sgst_in_total: bool,
}

impl ComputedLineItem {
    pub fn item(&self) -> &LineItem {
        &self.item
    }

    pub fn description(&self) -> &str {
        &self.item.description
    }

    pub fn unit_price(&self) -> Decimal {
        self.item.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.item.quantity
    }

    pub fn discount(&self) -> Decimal {
        self.item.discount
    }

    pub fn net_amount(&self) -> Decimal {
        self.net_amount
    }

    pub fn tax_type(&self) -> TaxType {
        self.tax_type
    }

    /// Rate of the first component (0.09 split, 0.18 integrated).
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// CGST amount for split items, IGST amount otherwise.
    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Mirrored SGST component; zero for IGST.
    pub fn tax_amount_sgst(&self) -> Decimal {
        self.tax_amount_sgst
    }

    /// `net + SGST`; zero for IGST.
    pub fn total_amount_sgst(&self) -> Decimal {
        self.total_amount_sgst
    }

    /// Whether `total_amount` charges the SGST half as well.
    pub fn sgst_in_total(&self) -> bool {
        self.sgst_in_total
    }
}

//! GST computation per line item.
//!
//! The regime is decided once per invoice from the billing and shipping
//! jurisdictions; every item is then computed independently, in input order.

use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gstinvoice_core::{InvoiceError, InvoiceResult};
use gstinvoice_parties::{AddressDetails, AddressKind, Jurisdiction};

use crate::line_item::{ComputedLineItem, LineItem, TaxType};

/// Statutory rates used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Rate of each half of the intra-state split (CGST and SGST).
    pub split_component: Decimal,
    /// Integrated rate for inter-state sales.
    pub integrated: Decimal,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            split_component: dec!(0.09),
            integrated: dec!(0.18),
        }
    }
}

/// How `total_amount` is formed for intra-state items.
///
/// `FirstComponentOnly` adds only the CGST half to the net amount; the SGST
/// half is still computed and reported in the mirrored fields. `BothComponents`
/// charges both halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitTotalPolicy {
    #[default]
    FirstComponentOnly,
    BothComponents,
}

impl FromStr for SplitTotalPolicy {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_component_only" => Ok(Self::FirstComponentOnly),
            "both" | "both_components" => Ok(Self::BothComponents),
            other => Err(InvoiceError::validation(format!(
                "unknown split total policy {other:?} (expected \"first\" or \"both\")"
            ))),
        }
    }
}

impl core::fmt::Display for SplitTotalPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SplitTotalPolicy::FirstComponentOnly => f.write_str("first"),
            SplitTotalPolicy::BothComponents => f.write_str("both"),
        }
    }
}

/// Pick the regime for a billing/shipping pair.
pub fn regime_for(billing: &Jurisdiction, shipping: &Jurisdiction) -> TaxType {
    if billing.is_intra_state(shipping) {
        TaxType::CgstSgst
    } else {
        TaxType::Igst
    }
}

/// Pure tax engine: input items in, computed items out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxEngine {
    rates: TaxRates,
    split_total: SplitTotalPolicy,
}

impl TaxEngine {
    pub fn new(rates: TaxRates, split_total: SplitTotalPolicy) -> Self {
        Self { rates, split_total }
    }

    pub fn with_split_total(mut self, split_total: SplitTotalPolicy) -> Self {
        self.split_total = split_total;
        self
    }

    pub fn rates(&self) -> TaxRates {
        self.rates
    }

    pub fn split_total(&self) -> SplitTotalPolicy {
        self.split_total
    }

    /// Compute every item, or fail without producing any.
    ///
    /// Jurisdictions are resolved before any amount is touched, so a missing
    /// state or city surfaces as `MissingJurisdiction` even when an item is
    /// also malformed.
    pub fn compute(
        &self,
        items: &[LineItem],
        billing: &AddressDetails,
        shipping: &AddressDetails,
    ) -> InvoiceResult<Vec<ComputedLineItem>> {
        let billing = billing.jurisdiction(AddressKind::Billing)?;
        let shipping = shipping.jurisdiction(AddressKind::Shipping)?;
        let regime = regime_for(&billing, &shipping);

        info!(
            billing = %billing,
            shipping = %shipping,
            regime = %regime,
            items = items.len(),
            "computing line item taxes"
        );

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let computed = self.compute_item(item, regime)?;
                debug!(
                    position = index + 1,
                    net = %computed.net_amount,
                    tax = %computed.tax_amount,
                    total = %computed.total_amount,
                    "line item computed"
                );
                Ok::<_, InvoiceError>(computed)
            })
            .collect()
    }

    /// Compute a single item under an already decided regime.
    ///
    /// Amounts too large for a `Decimal` are `InvalidAmount`.
    pub fn compute_item(&self, item: &LineItem, regime: TaxType) -> InvoiceResult<ComputedLineItem> {
        item.validate()?;
        let net_amount = item.net_amount()?;
        let checked = |value: Option<Decimal>| {
            value.ok_or_else(|| {
                InvoiceError::invalid_amount(format!("tax amount overflow for {:?}", item.description))
            })
        };

        let computed = match regime {
            TaxType::CgstSgst => {
                let rate = self.rates.split_component;
                let cgst = checked(net_amount.checked_mul(rate))?;
                let sgst = checked(net_amount.checked_mul(rate))?;
                let sgst_in_total = self.split_total == SplitTotalPolicy::BothComponents;
                let with_cgst = checked(net_amount.checked_add(cgst))?;
                let total_amount = if sgst_in_total {
                    checked(with_cgst.checked_add(sgst))?
                } else {
                    with_cgst
                };
                ComputedLineItem {
                    item: item.clone(),
                    net_amount,
                    tax_type: regime,
                    tax_rate: rate,
                    tax_amount: cgst,
                    total_amount,
                    tax_amount_sgst: sgst,
                    total_amount_sgst: checked(net_amount.checked_add(sgst))?,
                    sgst_in_total,
                }
            }
            TaxType::Igst => {
                let rate = self.rates.integrated;
                let igst = checked(net_amount.checked_mul(rate))?;
                ComputedLineItem {
                    item: item.clone(),
                    net_amount,
                    tax_type: regime,
                    tax_rate: rate,
                    tax_amount: igst,
                    total_amount: checked(net_amount.checked_add(igst))?,
                    tax_amount_sgst: Decimal::ZERO,
                    total_amount_sgst: Decimal::ZERO,
                    sgst_in_total: false,
                }
            }
        };

        Ok(computed)
    }
}

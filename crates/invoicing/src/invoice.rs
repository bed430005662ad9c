use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use gstinvoice_core::{InvoiceResult, ValueObject};
use gstinvoice_parties::{AddressDetails, SellerDetails};

use crate::line_item::{ComputedLineItem, LineItem};
use crate::tax::TaxEngine;
use crate::totals;
use crate::words::{self, LocaleTag};

/// Date format printed on the document (`28.10.2019`).
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Order placed by the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_no: String,
    pub order_date: NaiveDate,
}

impl ValueObject for OrderDetails {}

impl OrderDetails {
    pub fn order_date_display(&self) -> String {
        self.order_date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Invoice identifiers and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub invoice_no: String,
    /// Free-form details reference (e.g. `KA-310565025-1920`).
    pub invoice_details: String,
    pub invoice_date: NaiveDate,
}

impl ValueObject for InvoiceDetails {}

impl InvoiceDetails {
    pub fn invoice_date_display(&self) -> String {
        self.invoice_date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Where the signature image comes from.
///
/// The domain never reads the file; the renderer resolves the source and
/// embeds the bytes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Invoice aggregate before tax computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub seller: SellerDetails,
    pub billing: AddressDetails,
    pub shipping: AddressDetails,
    pub order: OrderDetails,
    pub invoice: InvoiceDetails,
    pub items: Vec<LineItem>,
    /// Verbatim reverse-charge classification (e.g. `"No"`).
    pub reverse_charge: String,
    pub signature: SignatureSource,
}

impl Invoice {
    /// Run the tax engine and fix the grand total.
    ///
    /// Consumes the invoice: it is computed exactly once. On error nothing is
    /// returned, so no partially computed invoice can reach the renderer.
    pub fn compute(self, engine: &TaxEngine, locale: LocaleTag) -> InvoiceResult<ComputedInvoice> {
        let items = engine.compute(&self.items, &self.billing, &self.shipping)?;
        let grand_total = totals::grand_total(&items)?;

        info!(
            invoice_no = %self.invoice.invoice_no,
            items = items.len(),
            grand_total = %grand_total,
            locale = %locale,
            "invoice computed"
        );

        Ok(ComputedInvoice {
            seller: self.seller,
            billing: self.billing,
            shipping: self.shipping,
            order: self.order,
            invoice: self.invoice,
            items,
            reverse_charge: self.reverse_charge,
            signature: self.signature,
            locale,
            grand_total,
        })
    }
}

/// Invoice with computed items, ready to render. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedInvoice {
    seller: SellerDetails,
    billing: AddressDetails,
    shipping: AddressDetails,
    order: OrderDetails,
    invoice: InvoiceDetails,
    items: Vec<ComputedLineItem>,
    reverse_charge: String,
    signature: SignatureSource,
    locale: LocaleTag,
    grand_total: Decimal,
}

impl ComputedInvoice {
    pub fn seller(&self) -> &SellerDetails {
        &self.seller
    }

    pub fn billing(&self) -> &AddressDetails {
        &self.billing
    }

    pub fn shipping(&self) -> &AddressDetails {
        &self.shipping
    }

    pub fn order(&self) -> &OrderDetails {
        &self.order
    }

    pub fn invoice(&self) -> &InvoiceDetails {
        &self.invoice
    }

    pub fn items(&self) -> &[ComputedLineItem] {
        &self.items
    }

    /// Items paired with their 1-based serial number, in input order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &ComputedLineItem)> + '_ {
        self.items.iter().enumerate().map(|(index, item)| (index + 1, item))
    }

    pub fn reverse_charge(&self) -> &str {
        &self.reverse_charge
    }

    pub fn signature(&self) -> &SignatureSource {
        &self.signature
    }

    pub fn locale(&self) -> LocaleTag {
        self.locale
    }

    /// Exact grand total, as summed once by [`totals::grand_total`].
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Grand total for the totals row (`1,240.55`).
    pub fn grand_total_display(&self) -> String {
        words::group_digits(self.grand_total, self.locale)
    }

    /// Grand total for the amount-in-words line.
    pub fn amount_in_words(&self) -> String {
        words::to_words(self.grand_total, self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::TaxType;
    use crate::tax::SplitTotalPolicy;
    use crate::sample::sample_invoice;
    use gstinvoice_core::InvoiceError;
    use gstinvoice_core::money::round_money;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_invoice_computes_split_regime_totals() {
        let computed = sample_invoice()
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap();

        assert_eq!(computed.items().len(), 4);
        assert!(computed
            .items()
            .iter()
            .all(|item| item.tax_type() == TaxType::CgstSgst));
        assert_eq!(computed.grand_total(), dec!(1240.5508));
        assert_eq!(computed.grand_total_display(), "1,240.55");
        assert_eq!(
            computed.amount_in_words(),
            "Rupees One Thousand Two Hundred Forty and Fifty Five Paise only"
        );
    }

    #[test]
    fn totals_row_and_words_agree_on_the_same_value() {
        let computed = sample_invoice()
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap();

        let total = totals::grand_total(computed.items()).unwrap();
        let shown = computed.grand_total_display().replace(',', "");
        assert_eq!(shown, round_money(total).to_string());
        assert_eq!(words::to_words(total, LocaleTag::EnIn), computed.amount_in_words());
    }

    #[test]
    fn overflowing_order_yields_no_computed_invoice() {
        let mut invoice = sample_invoice();
        let price = Decimal::from_i128_with_scale(40_000_000_000_000_000_000_000_000_000, 0);
        invoice.items = vec![
            LineItem::new("Warehouse lot A", price, 1, Decimal::ZERO).unwrap(),
            LineItem::new("Warehouse lot B", price, 1, Decimal::ZERO).unwrap(),
        ];
        let err = invoice
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidAmount(_)), "{err:?}");
    }

    #[test]
    fn rows_are_numbered_in_input_order() {
        let computed = sample_invoice()
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap();

        let rows: Vec<(usize, &str)> = computed
            .rows()
            .map(|(position, item)| (position, item.description()))
            .collect();
        assert_eq!(rows[0].0, 1);
        assert!(rows[0].1.contains("SH-05-42"));
        assert_eq!(rows[1], (2, "Shipping Charges"));
        assert!(rows[2].1.contains("SH-05-40"));
        assert_eq!(rows[3], (4, "Shipping Charges"));
    }

    #[test]
    fn inter_state_sample_uses_igst() {
        let mut invoice = sample_invoice();
        invoice.shipping.state = Some("MAHARASHTRA".to_string());
        let computed = invoice
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap();

        assert!(computed.items().iter().all(|item| item.tax_type() == TaxType::Igst));
        assert_eq!(computed.grand_total(), dec!(1342.9816));
    }

    #[test]
    fn missing_billing_state_yields_no_computed_invoice() {
        let mut invoice = sample_invoice();
        invoice.billing.state = None;
        let err = invoice
            .compute(&TaxEngine::default(), LocaleTag::EnIn)
            .unwrap_err();
        assert!(matches!(err, InvoiceError::MissingJurisdiction(_)));
    }

    #[test]
    fn dates_render_day_first() {
        let invoice = sample_invoice();
        assert_eq!(invoice.order.order_date_display(), "28.10.2019");
        assert_eq!(invoice.invoice.invoice_date_display(), "28.10.2019");
    }

    fn arb_order() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec((0i64..10_000_000i64, 0u32..20u32, 0i64..10_000i64), 0..24).prop_map(
            |amounts| {
                amounts
                    .into_iter()
                    .enumerate()
                    .map(|(index, (paise, quantity, discount))| LineItem {
                        description: format!("Saree lot {index}"),
                        unit_price: Decimal::new(paise, 2),
                        quantity,
                        discount: Decimal::new(discount.min(paise * i64::from(quantity)), 2),
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: the totals row and the words line are both derived from
        /// the one exact grand total, for any order and either regime.
        #[test]
        fn totals_row_and_words_agree_for_any_order(
            items in arb_order(),
            inter_state in any::<bool>(),
            both_components in any::<bool>(),
        ) {
            let mut invoice = sample_invoice();
            invoice.items = items.clone();
            if inter_state {
                invoice.shipping.state = Some("MAHARASHTRA".to_string());
            }
            let policy = if both_components {
                SplitTotalPolicy::BothComponents
            } else {
                SplitTotalPolicy::FirstComponentOnly
            };
            let engine = TaxEngine::default().with_split_total(policy);
            let computed = invoice.compute(&engine, LocaleTag::EnIn).unwrap();

            let total = totals::grand_total(computed.items()).unwrap();
            prop_assert_eq!(computed.grand_total(), total);
            prop_assert_eq!(
                computed.grand_total_display().replace(',', ""),
                gstinvoice_core::format_money(total)
            );
            prop_assert_eq!(computed.amount_in_words(), words::to_words(total, LocaleTag::EnIn));

            let rows: Vec<(usize, String)> = computed
                .rows()
                .map(|(position, item)| (position, item.description().to_string()))
                .collect();
            let expected: Vec<(usize, String)> = items
                .iter()
                .enumerate()
                .map(|(index, item)| (index + 1, item.description.clone()))
                .collect();
            prop_assert_eq!(rows, expected);
        }
    }
}

//! Grand total aggregation.
//!
//! The totals row and the amount-in-words line both go through
//! [`grand_total`]; nothing else sums line items.

use rust_decimal::Decimal;

use gstinvoice_core::{InvoiceError, InvoiceResult};

use crate::line_item::ComputedLineItem;

/// Exact sum of every item's post-tax `total_amount`.
pub fn grand_total(items: &[ComputedLineItem]) -> InvoiceResult<Decimal> {
    checked_sum(items, ComputedLineItem::total_amount, "grand total")
}

/// Exact sum of net amounts (before tax).
pub fn net_total(items: &[ComputedLineItem]) -> InvoiceResult<Decimal> {
    checked_sum(items, ComputedLineItem::net_amount, "net total")
}

/// Exact sum of the first tax component across items.
pub fn tax_total(items: &[ComputedLineItem]) -> InvoiceResult<Decimal> {
    checked_sum(items, ComputedLineItem::tax_amount, "tax total")
}

fn checked_sum(
    items: &[ComputedLineItem],
    amount: fn(&ComputedLineItem) -> Decimal,
    what: &str,
) -> InvoiceResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(amount(item))
            .ok_or_else(|| InvoiceError::invalid_amount(format!("{what} overflows")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItem;
    use crate::tax::{SplitTotalPolicy, TaxEngine};
    use gstinvoice_parties::AddressDetails;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn bengaluru() -> AddressDetails {
        AddressDetails {
            name: "Madhu B".to_string(),
            address: "AECS Layout".to_string(),
            city: Some("BENGALURU".to_string()),
            state: Some("KARNATAKA".to_string()),
            pincode: "560037".to_string(),
            state_ut_code: "29".to_string(),
        }
    }

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("Shirt 42", dec!(538.10), 1, Decimal::ZERO).unwrap(),
            LineItem::new("Shipping Charges", dec!(30.96), 1, Decimal::ZERO).unwrap(),
            LineItem::new("Shirt 40", dec!(538.10), 1, Decimal::ZERO).unwrap(),
            LineItem::new("Shipping Charges", dec!(30.96), 1, Decimal::ZERO).unwrap(),
        ]
    }

    #[test]
    fn grand_total_of_sample_order_is_exact() {
        let computed = TaxEngine::default()
            .compute(&sample_items(), &bengaluru(), &bengaluru())
            .unwrap();
        assert_eq!(grand_total(&computed).unwrap(), dec!(1240.5508));
        assert_eq!(net_total(&computed).unwrap(), dec!(1138.12));
        assert_eq!(tax_total(&computed).unwrap(), dec!(102.4308));
    }

    #[test]
    fn grand_total_with_both_components_adds_sgst() {
        let computed = TaxEngine::default()
            .with_split_total(SplitTotalPolicy::BothComponents)
            .compute(&sample_items(), &bengaluru(), &bengaluru())
            .unwrap();
        assert_eq!(grand_total(&computed).unwrap(), dec!(1342.9816));
    }

    #[test]
    fn grand_total_of_no_items_is_zero() {
        assert_eq!(grand_total(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn overflowing_grand_total_is_an_invalid_amount() {
        let price = Decimal::from_i128_with_scale(40_000_000_000_000_000_000_000_000_000, 0);
        let items = vec![
            LineItem::new("Warehouse lot A", price, 1, Decimal::ZERO).unwrap(),
            LineItem::new("Warehouse lot B", price, 1, Decimal::ZERO).unwrap(),
        ];
        let computed = TaxEngine::default()
            .compute(&items, &bengaluru(), &bengaluru())
            .unwrap();

        let err = grand_total(&computed).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidAmount(_)), "{err:?}");
        assert!(matches!(net_total(&computed), Err(InvoiceError::InvalidAmount(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: grand total equals the sum of item totals, in any order.
        #[test]
        fn grand_total_is_order_independent(
            prices in prop::collection::vec(0i64..5_000_000i64, 0..12)
        ) {
            let items: Vec<LineItem> = prices
                .iter()
                .map(|p| LineItem::new("item", Decimal::new(*p, 2), 1, Decimal::ZERO).unwrap())
                .collect();
            let engine = TaxEngine::default();
            let computed = engine.compute(&items, &bengaluru(), &bengaluru()).unwrap();

            let mut reversed = computed.clone();
            reversed.reverse();

            let expected: Decimal = prices
                .iter()
                .map(|p| Decimal::new(*p, 2) * dec!(1.09))
                .sum();
            prop_assert_eq!(grand_total(&computed).unwrap(), expected);
            prop_assert_eq!(grand_total(&reversed).unwrap(), expected);
        }
    }
}

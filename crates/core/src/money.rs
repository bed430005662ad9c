//! Monetary helpers shared by the tax engine, totals and renderer.
//!
//! Amounts are carried as exact [`Decimal`] values end to end. Rounding happens
//! only at display time, through [`round_money`], so that every place that shows
//! a figure shows the same figure.

use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{InvoiceError, InvoiceResult};

/// Number of fractional digits shown for currency (rupees and paise).
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to [`MONEY_SCALE`] digits with banker's rounding.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Render an amount with exactly two fractional digits and no grouping.
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// Parse a non-negative decimal amount from text.
///
/// `field` names the offending input in the error message.
pub fn parse_amount(field: &str, text: &str) -> InvoiceResult<Decimal> {
    let value = Decimal::from_str(text.trim())
        .map_err(|e| InvoiceError::invalid_amount(format!("{field}: {text:?} is not numeric ({e})")))?;
    ensure_non_negative(field, value)
}

/// Reject negative amounts.
pub fn ensure_non_negative(field: &str, value: Decimal) -> InvoiceResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InvoiceError::invalid_amount(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(value)
}

/// Parse a whole, non-negative quantity from text.
pub fn parse_quantity(text: &str) -> InvoiceResult<u32> {
    let value = parse_amount("quantity", text)?;
    quantity_from_decimal(value)
}

/// Convert a decimal to a quantity, rejecting fractions and overflow.
pub fn quantity_from_decimal(value: Decimal) -> InvoiceResult<u32> {
    let value = ensure_non_negative("quantity", value)?;
    if !value.fract().is_zero() {
        return Err(InvoiceError::invalid_amount(format!(
            "quantity must be a whole number (got {value})"
        )));
    }
    value
        .to_u32()
        .ok_or_else(|| InvoiceError::invalid_amount(format!("quantity {value} is out of range")))
}

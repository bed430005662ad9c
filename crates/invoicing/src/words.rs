//! Amount-in-words and digit grouping, per locale.
//!
//! The locale is always passed explicitly as a [`LocaleTag`]; there is no
//! process-wide locale setting.

use core::str::FromStr;

use rust_decimal::Decimal;

use gstinvoice_core::money::round_money;
use gstinvoice_core::{InvoiceError, InvoiceResult};

/// Fixed suffix appended to every spelled amount.
pub const WORDS_SUFFIX: &str = "only";

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

// Short-scale names for successive powers of one thousand.
const THOUSANDS: [&str; 13] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
    "Sextillion",
    "Septillion",
    "Octillion",
    "Nonillion",
    "Decillion",
    "Undecillion",
];

/// Locales with registered grouping and spelling rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocaleTag {
    /// Indian English: lakh/crore grouping, rupees and paise.
    #[default]
    EnIn,
    /// US English: thousand/million grouping, dollars and cents.
    EnUs,
}

impl LocaleTag {
    pub fn as_str(self) -> &'static str {
        match self {
            LocaleTag::EnIn => "en-IN",
            LocaleTag::EnUs => "en-US",
        }
    }
}

impl FromStr for LocaleTag {
    type Err = InvoiceError;

    /// Accepts `en-IN`, `en_IN` and POSIX forms such as `en_IN.UTF-8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s
            .trim()
            .split('.')
            .next()
            .unwrap_or_default()
            .replace('_', "-")
            .to_ascii_lowercase();
        match tag.as_str() {
            "en-in" => Ok(LocaleTag::EnIn),
            "en-us" => Ok(LocaleTag::EnUs),
            _ => Err(InvoiceError::unsupported_locale(format!(
                "no numeral grouping/spelling rules registered for {s:?}"
            ))),
        }
    }
}

impl core::fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spell a monetary amount, e.g.
/// `Rupees One Thousand Two Hundred Forty and Fifty Five Paise only`.
///
/// The amount is rounded to paise/cents with [`round_money`] first, the same
/// rule used for the numeric totals row.
pub fn to_words(amount: Decimal, locale: LocaleTag) -> String {
    let (negative, major, minor) = split_money(amount);
    let sign = if negative { "Minus " } else { "" };

    match locale {
        LocaleTag::EnIn => {
            let mut out = format!("{sign}Rupees {}", spell_indian(major));
            if minor > 0 {
                out.push_str(&format!(" and {} Paise", below_hundred(minor)));
            }
            format!("{out} {WORDS_SUFFIX}")
        }
        LocaleTag::EnUs => {
            let unit = if major == 1 { "Dollar" } else { "Dollars" };
            let mut out = format!("{sign}{} {unit}", spell_short_scale(major));
            if minor > 0 {
                let cents = if minor == 1 { "Cent" } else { "Cents" };
                out.push_str(&format!(" and {} {cents}", below_hundred(minor)));
            }
            format!("{out} {WORDS_SUFFIX}")
        }
    }
}

/// Format an amount with two decimals and locale digit grouping:
/// `12,34,567.89` for `en-IN`, `1,234,567.89` for `en-US`.
pub fn group_digits(amount: Decimal, locale: LocaleTag) -> String {
    let (negative, major, minor) = split_money(amount);
    let digits = major.to_string();
    let grouped = match locale {
        LocaleTag::EnIn => group_indian(&digits),
        LocaleTag::EnUs => group_by(&digits, 3),
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{minor:02}")
}

/// Resolve a locale string and spell the amount in one step.
pub fn to_words_for(amount: Decimal, locale: &str) -> InvoiceResult<String> {
    let locale = LocaleTag::from_str(locale)?;
    Ok(to_words(amount, locale))
}

/// Round to money scale and split into (is_negative, major units, minor units).
///
/// The parts are taken separately because an amount near `Decimal::MAX` has
/// no room for two more digits of scale.
fn split_money(amount: Decimal) -> (bool, u128, u128) {
    let rounded = round_money(amount).abs();
    let negative = amount.is_sign_negative() && !rounded.is_zero();
    let whole = rounded.trunc().normalize();
    let cents = ((rounded - whole) * Decimal::ONE_HUNDRED).trunc().normalize();
    (negative, whole.mantissa().unsigned_abs(), cents.mantissa().unsigned_abs())
}

fn below_hundred(n: u128) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

fn below_thousand(n: u128) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

/// Indian system: ..., crore (10^7), lakh (10^5), thousand, hundred.
/// Amounts of a hundred crore and above nest: "One Lakh Crore".
fn spell_indian(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts = Vec::new();
    let crore = n / 10_000_000;
    let rest = n % 10_000_000;
    if crore > 0 {
        parts.push(format!("{} Crore", spell_indian(crore)));
    }

    let lakh = rest / 100_000;
    let thousand = (rest / 1_000) % 100;
    let hundreds = rest % 1_000;
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_hundred(thousand)));
    }
    if hundreds > 0 {
        parts.push(below_thousand(hundreds));
    }
    parts.join(" ")
}

fn spell_short_scale(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1_000);
        rest /= 1_000;
    }

    groups
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, group)| **group > 0)
        .map(|(scale, group)| match THOUSANDS[scale] {
            "" => below_thousand(*group),
            name => format!("{} {name}", below_thousand(*group)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{},{tail}", group_by(head, 2))
}

fn group_by(digits: &str, size: usize) -> String {
    digits
        .as_bytes()
        .rchunks(size)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_grand_total_in_indian_words() {
        assert_eq!(
            to_words(dec!(1240.5508), LocaleTag::EnIn),
            "Rupees One Thousand Two Hundred Forty and Fifty Five Paise only"
        );
    }

    #[test]
    fn whole_rupees_have_no_paise_clause() {
        assert_eq!(to_words(dec!(500), LocaleTag::EnIn), "Rupees Five Hundred only");
        assert_eq!(to_words(Decimal::ZERO, LocaleTag::EnIn), "Rupees Zero only");
    }

    #[test]
    fn lakh_and_crore_grouping() {
        assert_eq!(spell_indian(100_000), "One Lakh");
        assert_eq!(spell_indian(10_000_000), "One Crore");
        assert_eq!(
            spell_indian(1_234_567),
            "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven"
        );
        assert_eq!(
            spell_indian(98_76_54_321),
            "Ninety Eight Crore Seventy Six Lakh Fifty Four Thousand Three Hundred Twenty One"
        );
        assert_eq!(spell_indian(1_00_000_00_00_000), "One Lakh Crore");
    }

    #[test]
    fn small_numbers() {
        assert_eq!(below_hundred(0), "Zero");
        assert_eq!(below_hundred(19), "Nineteen");
        assert_eq!(below_hundred(20), "Twenty");
        assert_eq!(below_hundred(45), "Forty Five");
        assert_eq!(below_thousand(100), "One Hundred");
        assert_eq!(below_thousand(101), "One Hundred One");
    }

    #[test]
    fn us_words_use_short_scale() {
        assert_eq!(
            to_words(dec!(1234567.01), LocaleTag::EnUs),
            "One Million Two Hundred Thirty Four Thousand Five Hundred Sixty Seven Dollars and One Cent only"
        );
        assert_eq!(to_words(dec!(1), LocaleTag::EnUs), "One Dollar only");
    }

    #[test]
    fn negative_amounts_are_prefixed() {
        assert_eq!(to_words(dec!(-5.50), LocaleTag::EnIn), "Minus Rupees Five and Fifty Paise only");
        assert_eq!(group_digits(dec!(-1234.5), LocaleTag::EnIn), "-1,234.50");
    }

    #[test]
    fn amount_rounding_to_zero_has_no_sign() {
        assert_eq!(to_words(dec!(-0.001), LocaleTag::EnIn), "Rupees Zero only");
        assert_eq!(group_digits(dec!(-0.001), LocaleTag::EnIn), "0.00");
    }

    #[test]
    fn digit_grouping_per_locale() {
        assert_eq!(group_digits(dec!(1234567.891), LocaleTag::EnIn), "12,34,567.89");
        assert_eq!(group_digits(dec!(1234567.891), LocaleTag::EnUs), "1,234,567.89");
        assert_eq!(group_digits(dec!(999), LocaleTag::EnIn), "999.00");
        assert_eq!(group_digits(dec!(1240.5508), LocaleTag::EnIn), "1,240.55");
    }

    #[test]
    fn amounts_without_spare_scale_keep_their_cents() {
        let amount = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_005, 1);
        assert_eq!(
            group_digits(amount, LocaleTag::EnUs),
            format!("5{}.50", ",000".repeat(9))
        );
        assert_eq!(
            to_words(amount, LocaleTag::EnUs),
            "Five Octillion Dollars and Fifty Cents only"
        );
        assert_eq!(
            group_digits(Decimal::MAX, LocaleTag::EnIn).replace(',', ""),
            "79228162514264337593543950335.00"
        );
    }

    #[test]
    fn locale_tags_parse_in_common_spellings() {
        assert_eq!("en-IN".parse::<LocaleTag>().unwrap(), LocaleTag::EnIn);
        assert_eq!("en_IN.UTF-8".parse::<LocaleTag>().unwrap(), LocaleTag::EnIn);
        assert_eq!("EN-us".parse::<LocaleTag>().unwrap(), LocaleTag::EnUs);
    }

    #[test]
    fn unknown_locale_is_unsupported() {
        let err = to_words_for(dec!(10), "hi-IN").unwrap_err();
        assert!(matches!(err, InvoiceError::UnsupportedLocale(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: stripping the separators from grouped digits gives the
        /// plain two-decimal rendering, in both locales.
        #[test]
        fn grouping_only_inserts_separators(cents in 0i64..1_000_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let plain = gstinvoice_core::format_money(amount);
            for locale in [LocaleTag::EnIn, LocaleTag::EnUs] {
                prop_assert_eq!(group_digits(amount, locale).replace(',', ""), plain.clone());
            }
        }

        /// Property: every spelled amount carries the fixed suffix and a
        /// paise clause exactly when the rounded amount has paise.
        #[test]
        fn words_have_suffix_and_paise_clause(cents in 0i64..10_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let words = to_words(amount, LocaleTag::EnIn);
            prop_assert!(words.ends_with(" only"));
            prop_assert_eq!(words.contains(" Paise"), cents % 100 != 0);
        }
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use gstinvoice_core::{InvoiceError, InvoiceResult, ValueObject};

/// Which of the buyer's addresses a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Billing,
    Shipping,
}

impl AddressKind {
    /// Heading printed above the address block.
    pub fn heading(self) -> &'static str {
        match self {
            AddressKind::Billing => "Billing Address:",
            AddressKind::Shipping => "Shipping Address:",
        }
    }
}

impl core::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AddressKind::Billing => f.write_str("billing"),
            AddressKind::Shipping => f.write_str("shipping"),
        }
    }
}

/// Registered seller ("Sold By").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerDetails {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(deserialize_with = "string_or_number")]
    pub pincode: String,
    pub pan_no: String,
    pub gst_registration_no: String,
}

impl ValueObject for SellerDetails {}

impl SellerDetails {
    /// "city, state, pincode" line as printed on the invoice.
    pub fn city_line(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.pincode)
    }
}

/// Buyer address (billing or shipping).
///
/// `state` and `city` are optional on the wire: an address without them is
/// still printable, but it cannot be used to pick a tax regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub pincode: String,
    /// Two-digit GST state/UT code (e.g. `29` for Karnataka).
    #[serde(deserialize_with = "string_or_number")]
    pub state_ut_code: String,
}

impl ValueObject for AddressDetails {}

impl AddressDetails {
    /// "city, state, pincode" line; absent parts print as empty.
    pub fn city_line(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city.as_deref().unwrap_or_default(),
            self.state.as_deref().unwrap_or_default(),
            self.pincode
        )
    }

    /// Read the jurisdiction used for tax-regime selection.
    ///
    /// Fails with `MissingJurisdiction` when state or city is absent or blank.
    pub fn jurisdiction(&self, kind: AddressKind) -> InvoiceResult<Jurisdiction> {
        let state = present(self.state.as_deref()).ok_or_else(|| {
            InvoiceError::missing_jurisdiction(format!("{kind} address has no state"))
        })?;
        let city = present(self.city.as_deref()).ok_or_else(|| {
            InvoiceError::missing_jurisdiction(format!("{kind} address has no city"))
        })?;
        Ok(Jurisdiction {
            state: state.to_string(),
            city: city.to_string(),
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// State and city of an address, compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub state: String,
    pub city: String,
}

impl ValueObject for Jurisdiction {}

impl Jurisdiction {
    /// Intra-state iff both state and city match exactly.
    pub fn is_intra_state(&self, other: &Jurisdiction) -> bool {
        self.state == other.state && self.city == other.city
    }
}

impl core::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.city, self.state)
    }
}

/// Pincodes and state codes arrive as numbers or strings; both are kept as text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    })
}

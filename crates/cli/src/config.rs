//! Generator settings: built-in defaults, then environment, then flags.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use gstinvoice_invoicing::{LocaleTag, SplitTotalPolicy};
use gstinvoice_render::RenderOptions;

pub const BRAND_ENV: &str = "GSTINVOICE_BRAND";
pub const LOCALE_ENV: &str = "GSTINVOICE_LOCALE";
pub const SPLIT_TOTAL_ENV: &str = "GSTINVOICE_SPLIT_TOTAL";
pub const OUTPUT_ENV: &str = "GSTINVOICE_OUTPUT";
pub const SIGNATURE_ENV: &str = "GSTINVOICE_SIGNATURE";

pub const DEFAULT_OUTPUT: &str = "invoice.pdf";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub brand: String,
    pub locale: LocaleTag,
    pub split_total: SplitTotalPolicy,
    pub output: PathBuf,
    /// Overrides the signature named by the input document.
    pub signature: Option<PathBuf>,
    pub input: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            brand: RenderOptions::default().brand,
            locale: LocaleTag::default(),
            split_total: SplitTotalPolicy::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            signature: None,
            input: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` provides. Values that do not
    /// parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(brand) = present(BRAND_ENV) {
            config.brand = brand;
        }
        if let Some(locale) = present(LOCALE_ENV).and_then(|v| parse_or_warn::<LocaleTag>(LOCALE_ENV, &v)) {
            config.locale = locale;
        }
        if let Some(policy) =
            present(SPLIT_TOTAL_ENV).and_then(|v| parse_or_warn::<SplitTotalPolicy>(SPLIT_TOTAL_ENV, &v))
        {
            config.split_total = policy;
        }
        if let Some(output) = present(OUTPUT_ENV) {
            config.output = PathBuf::from(output);
        }
        if let Some(signature) = present(SIGNATURE_ENV) {
            config.signature = Some(PathBuf::from(signature));
        }
        config
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default().with_brand(self.brand.clone())
    }
}

fn parse_or_warn<T>(key: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(%key, %value, error = %err, "ignoring invalid setting; using default");
            None
        }
    }
}

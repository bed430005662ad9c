//! Invoice error model.

use thiserror::Error;

/// Result type used across the invoice generator.
pub type InvoiceResult<T> = Result<T, InvoiceError>;

/// Error raised while computing or rendering an invoice.
///
/// Every variant is fatal to the invocation that produced it. Nothing is
/// retried, and no partial document is ever published.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvoiceError {
    /// A unit price, quantity or discount was negative or not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Billing or shipping state/city is absent, so the tax regime is unknown.
    #[error("missing jurisdiction: {0}")]
    MissingJurisdiction(String),

    /// No numeral grouping/spelling rules are registered for the locale.
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// An external resource (e.g. the signature image) does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The output document could not be produced or written.
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// Input record failed validation for a reason unrelated to amounts.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl InvoiceError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn missing_jurisdiction(msg: impl Into<String>) -> Self {
        Self::MissingJurisdiction(msg.into())
    }

    pub fn unsupported_locale(msg: impl Into<String>) -> Self {
        Self::UnsupportedLocale(msg.into())
    }

    pub fn resource_not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

//! Page geometry and presentation settings.

use core::str::FromStr;

use gstinvoice_core::{InvoiceError, InvoiceResult};

/// Points per inch (PDF user space unit).
pub const POINTS_PER_INCH: f32 = 72.0;

/// Fixed page sizes, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// (width, height) in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }

    pub fn width(self) -> f32 {
        self.dimensions().0
    }

    pub fn height(self) -> f32 {
        self.dimensions().1
    }
}

impl FromStr for PageSize {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(InvoiceError::validation(format!("unknown page size {other:?}"))),
        }
    }
}

/// Settings for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub page_size: PageSize,
    /// Margin on all four sides, in points.
    pub margin: f32,
    /// Title printed at the top of the first page.
    pub brand: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin: 0.5 * POINTS_PER_INCH,
            brand: "amazon.in".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_size.dimensions().0 - 2.0 * self.margin
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> InvoiceResult<()> {
        let (width, height) = self.page_size.dimensions();
        if self.margin < 0.0 || 2.0 * self.margin >= width.min(height) {
            return Err(InvoiceError::validation(format!(
                "margin {} does not fit a {width}x{height} page",
                self.margin
            )));
        }
        Ok(())
    }
}

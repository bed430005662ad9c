//! `gstinvoice-render`: turns a computed invoice into a PDF.
//!
//! [`layout`] decides what is printed and [`pdf`] places it on pages. The
//! finished bytes reach disk through [`publish`] in a single rename.

pub mod layout;
pub mod options;
pub mod pdf;
pub mod publish;
pub mod signature;

use std::path::{Path, PathBuf};

use tracing::info;

use gstinvoice_core::InvoiceResult;
use gstinvoice_invoicing::ComputedInvoice;

pub use layout::{Block, InvoiceLayout};
pub use options::{PageSize, RenderOptions};
pub use pdf::PdfWriter;
pub use signature::{SignatureEncoding, SignatureImage};

/// Render to an in-memory PDF.
pub fn render_to_bytes(
    invoice: &ComputedInvoice,
    signature: &SignatureImage,
    options: &RenderOptions,
) -> InvoiceResult<Vec<u8>> {
    options.validate()?;
    let layout = InvoiceLayout::build(invoice, options);
    PdfWriter::new(options).render(layout.blocks(), signature)
}

/// Render and publish to `path`. The destination is only created once the
/// whole document has been produced.
pub fn render_to_path(
    invoice: &ComputedInvoice,
    signature: &SignatureImage,
    options: &RenderOptions,
    path: &Path,
) -> InvoiceResult<PathBuf> {
    let bytes = render_to_bytes(invoice, signature, options)?;
    publish::write_atomic(path, &bytes)?;

    info!(
        path = %path.display(),
        invoice_no = %invoice.invoice().invoice_no,
        bytes = bytes.len(),
        "invoice published"
    );
    Ok(path.to_path_buf())
}

/// Resolve the invoice's own signature reference, then render to `path`.
pub fn generate(
    invoice: &ComputedInvoice,
    options: &RenderOptions,
    path: &Path,
) -> InvoiceResult<PathBuf> {
    let signature = SignatureImage::from_source(invoice.signature())?;
    render_to_path(invoice, &signature, options, path)
}

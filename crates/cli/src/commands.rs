use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use gstinvoice_invoicing::sample::sample_document;
use gstinvoice_invoicing::{InvoiceDocument, SignatureSource, TaxEngine};

use crate::config::GeneratorConfig;

/// Read the input document, compute taxes and publish the PDF.
pub fn generate(config: &GeneratorConfig) -> Result<PathBuf> {
    let input = config
        .input
        .as_deref()
        .context("no input document given (use --input)")?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading input document {}", input.display()))?;
    let mut invoice = InvoiceDocument::from_json(&text)
        .and_then(InvoiceDocument::into_invoice)
        .with_context(|| format!("loading invoice from {}", input.display()))?;

    if let Some(signature) = &config.signature {
        invoice.signature = SignatureSource::Path(signature.clone());
    }

    let engine = TaxEngine::default().with_split_total(config.split_total);
    let computed = invoice
        .compute(&engine, config.locale)
        .context("computing invoice taxes")?;

    let written = gstinvoice_render::generate(&computed, &config.render_options(), &config.output)
        .with_context(|| format!("rendering {}", config.output.display()))?;
    Ok(written)
}

/// Write the built-in sample as a JSON input document.
pub fn write_sample(path: &Path) -> Result<()> {
    let json = sample_document().to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "sample document written");
    Ok(())
}

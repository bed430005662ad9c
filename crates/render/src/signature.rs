//! Signature image loading.
//!
//! The image is held in memory and embedded straight from those bytes, so no
//! transient file is ever written. JPEG passes through as a DCTDecode XObject;
//! PNG is decoded to RGB samples plus an alpha plane for a soft mask.

use std::path::Path;

use image::ImageFormat;
use jpeg_decoder::{Decoder as JpegDecoder, PixelFormat};
use tracing::debug;

use gstinvoice_core::{InvoiceError, InvoiceResult};
use gstinvoice_invoicing::SignatureSource;

/// Largest signature accepted, in bytes.
pub const MAX_SIGNATURE_BYTES: usize = 10_000_000;

const JPEG_MAGIC: &[u8] = b"\xFF\xD8";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// PDF colour space of the decoded JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static [u8] {
        match self {
            ColorSpace::Gray => b"DeviceGray",
            ColorSpace::Rgb => b"DeviceRGB",
            ColorSpace::Cmyk => b"DeviceCMYK",
        }
    }
}

/// How the image samples reach the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureEncoding {
    /// Original JPEG bytes.
    Jpeg { data: Vec<u8>, color_space: ColorSpace },
    /// 8-bit RGB samples, row-major, with an optional matching alpha plane.
    Raster { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// Signature pixels plus the fields the PDF image dictionary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    width: u32,
    height: u32,
    encoding: SignatureEncoding,
}

impl SignatureImage {
    /// Inspect in-memory JPEG or PNG bytes.
    pub fn from_bytes(data: Vec<u8>) -> InvoiceResult<Self> {
        if data.len() > MAX_SIGNATURE_BYTES {
            return Err(InvoiceError::render(format!(
                "signature image too large ({} bytes)",
                data.len()
            )));
        }

        if data.starts_with(JPEG_MAGIC) {
            Self::from_jpeg(data)
        } else if data.starts_with(PNG_MAGIC) {
            Self::from_png(&data)
        } else {
            Err(InvoiceError::render("signature image is neither JPEG nor PNG"))
        }
    }

    fn from_jpeg(data: Vec<u8>) -> InvoiceResult<Self> {
        let mut decoder = JpegDecoder::new(&data[..]);
        decoder
            .read_info()
            .map_err(|e| InvoiceError::render(format!("cannot read signature JPEG header: {e}")))?;
        let info = decoder
            .info()
            .ok_or_else(|| InvoiceError::render("signature JPEG has no frame header"))?;

        let color_space = match info.pixel_format {
            PixelFormat::L8 => ColorSpace::Gray,
            PixelFormat::RGB24 => ColorSpace::Rgb,
            PixelFormat::CMYK32 => ColorSpace::Cmyk,
            other => {
                return Err(InvoiceError::render(format!(
                    "unsupported signature pixel format {other:?}"
                )));
            }
        };

        debug!(
            width = info.width,
            height = info.height,
            bytes = data.len(),
            "signature JPEG inspected"
        );

        Ok(Self {
            width: u32::from(info.width),
            height: u32::from(info.height),
            encoding: SignatureEncoding::Jpeg { data, color_space },
        })
    }

    fn from_png(data: &[u8]) -> InvoiceResult<Self> {
        let decoded = image::load_from_memory_with_format(data, ImageFormat::Png)
            .map_err(|e| InvoiceError::render(format!("cannot decode signature PNG: {e}")))?;
        let has_alpha = decoded.color().has_alpha();
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels = rgba.as_raw();
        let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(pixels.len() / 4);
        for pixel in pixels.chunks_exact(4) {
            rgb.extend_from_slice(&pixel[..3]);
            alpha.push(pixel[3]);
        }

        debug!(width, height, has_alpha, bytes = data.len(), "signature PNG decoded");

        Ok(Self {
            width,
            height,
            encoding: SignatureEncoding::Raster {
                rgb,
                alpha: has_alpha.then_some(alpha),
            },
        })
    }

    /// Read a JPEG or PNG from disk.
    ///
    /// A missing file is `ResourceNotFound`; an unreadable or undecodable one
    /// is `RenderFailure`.
    pub fn load(path: &Path) -> InvoiceResult<Self> {
        if !path.is_file() {
            return Err(InvoiceError::resource_not_found(format!(
                "signature image {}",
                path.display()
            )));
        }
        let data = std::fs::read(path).map_err(|e| {
            InvoiceError::render(format!("cannot read signature {}: {e}", path.display()))
        })?;
        Self::from_bytes(data)
    }

    /// Resolve the invoice's signature reference.
    pub fn from_source(source: &SignatureSource) -> InvoiceResult<Self> {
        match source {
            SignatureSource::Path(path) => Self::load(path),
            SignatureSource::Bytes(bytes) => Self::from_bytes(bytes.clone()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn encoding(&self) -> &SignatureEncoding {
        &self.encoding
    }
}

//! Engine seams: the black-box collaborators the pipeline orchestrates.
//!
//! The pipeline never parses PDFs, renders pixels, or recognises glyphs
//! itself — those are delegated to three engines behind traits:
//!
//! 1. [`TextLayerReader`] — read the embedded text layer from an in-memory
//!    PDF byte buffer (default: the `pdf-extract` crate)
//! 2. [`PageRasterizer`] — render the first page of an on-disk PDF to an
//!    image file (default: pdfium)
//! 3. [`OcrEngine`] — recognise text in an image file (default: tesseract,
//!    behind the `ocr` feature)
//!
//! Keeping the engines behind traits means production backends can be
//! swapped without touching fallback logic, and tests can inject
//! call-counting mocks through [`crate::config::ExtractionConfig`].
//!
//! All trait methods are blocking — the pipeline wraps each call in
//! `tokio::task::spawn_blocking`, so implementations are free to do
//! CPU-heavy or synchronous-I/O work directly.

use std::path::Path;
use thiserror::Error;

pub mod pdfextract;
pub mod pdfium;
#[cfg(feature = "ocr")]
pub mod tesseract;

/// Errors surfaced by engine implementations.
///
/// Engine errors never reach library callers directly: the pipeline wraps
/// them into [`crate::error::StageError`] so user-visible messages stay
/// coarse while the cause remains available to logs via the source chain.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The PDF could not be parsed (malformed, encrypted, unsupported).
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// A native engine library could not be loaded or initialised.
    #[error("failed to bind engine library: {0}")]
    Binding(String),

    /// Page rendering failed.
    #[error("rasterisation failed: {0}")]
    Rasterise(String),

    /// Character recognition failed.
    #[error("text recognition failed: {0}")]
    Recognise(String),

    /// Reading or writing an engine artifact failed.
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking engine task panicked or was cancelled.
    #[error("engine task failed: {0}")]
    Task(String),

    /// The requested backend is not compiled into this build.
    #[error("{0} support is not compiled into this build")]
    Unavailable(&'static str),
}

/// Parameters for rasterising a page.
///
/// Defaults correspond to an A4 page at 300 DPI (2480 × 3508 px), the
/// density at which OCR engines resolve ordinary body text reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSpec {
    /// Render density. Informational for pixel-exact backends such as
    /// pdfium, which size output from `width`/`height` directly.
    pub dpi: u32,
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Output image format. One consistent format per pipeline run.
    pub format: RasterFormat,
}

impl Default for RasterSpec {
    fn default() -> Self {
        Self {
            dpi: 300,
            width: 2480,
            height: 3508,
            format: RasterFormat::Png,
        }
    }
}

/// Raster output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum RasterFormat {
    /// Lossless; text crispness matters more than file size for OCR. (default)
    #[default]
    Png,
    /// Smaller files at the cost of compression artefacts around glyphs.
    Jpeg,
}

impl RasterFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    pub(crate) fn image_format(&self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Reads a PDF's embedded text layer from an in-memory byte buffer.
pub trait TextLayerReader: Send + Sync {
    /// Return all text-layer content, or fail on malformed/unsupported input.
    ///
    /// Failure here is always recoverable for the overall request — the
    /// pipeline treats it as an empty text layer and falls back to OCR.
    fn read_text(&self, bytes: &[u8]) -> Result<String, EngineError>;
}

/// Renders the first page of an on-disk PDF to an image file.
///
/// Only page 1 is ever rasterised. Multi-page documents are deliberately
/// not iterated; callers needing later pages must split the document first.
pub trait PageRasterizer: Send + Sync {
    /// Render page 1 of `pdf_path` into `image_path` per `spec`.
    ///
    /// The output file must exist at `image_path` on success; the
    /// implementation must not create any other files.
    fn rasterize_first_page(
        &self,
        pdf_path: &Path,
        image_path: &Path,
        spec: &RasterSpec,
    ) -> Result<(), EngineError>;
}

/// Recognises text in a rasterised page image.
pub trait OcrEngine: Send + Sync {
    /// Run recognition over `image_path` with the given language profile
    /// (ISO 639-2, e.g. `"eng"`).
    ///
    /// An `Ok` result may legitimately be empty — a blank or purely
    /// pictorial page contains nothing to recognise. Implementations must
    /// scope any native engine state to this single call so nothing leaks
    /// across requests.
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, EngineError>;
}

/// The default OCR backend, if one is compiled in.
#[cfg(feature = "ocr")]
pub(crate) fn default_ocr() -> Option<std::sync::Arc<dyn OcrEngine>> {
    Some(std::sync::Arc::new(tesseract::TesseractOcr::default()))
}

#[cfg(not(feature = "ocr"))]
pub(crate) fn default_ocr() -> Option<std::sync::Arc<dyn OcrEngine>> {
    None
}

//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share configs across concurrent requests and
//! to diff two runs to understand why their outcomes differ.
//!
//! The three `Option<Arc<dyn …>>` engine fields are the injection seam:
//! production callers leave them `None` and get the default backends
//! (pdf-extract, pdfium, tesseract); tests inject counting mocks to assert
//! the fallback policy (e.g. "OCR never invoked when the gate passes").

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engines::{OcrEngine, PageRasterizer, RasterFormat, RasterSpec, TextLayerReader};
use crate::error::ExtractError;
use crate::pipeline::gate::DEFAULT_MIN_TEXT_LEN;

/// Configuration for a single extraction pipeline.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfplain::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .min_text_len(80)
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Minimum trimmed character count for text-layer output to count as
    /// usable. Default: 50.
    ///
    /// Very short text typically means a scanned page whose text layer only
    /// carries artifacts (page numbers, watermarks) rather than content, so
    /// OCR is likely to recover more. Raising the threshold makes the
    /// pipeline fall back to OCR more eagerly; lowering it trusts sparse
    /// text layers more.
    pub min_text_len: usize,

    /// Rasterisation density for the OCR fallback. Range: 72–600.
    /// Default: 300 — the density at which OCR engines resolve ordinary
    /// body text reliably.
    pub dpi: u32,

    /// Rasterised page width in pixels. Default: 2480 (A4 at 300 DPI).
    pub raster_width: u32,

    /// Rasterised page height in pixels. Default: 3508 (A4 at 300 DPI).
    pub raster_height: u32,

    /// Raster output format. Default: PNG (lossless — compression artefacts
    /// around glyphs cost OCR accuracy).
    pub raster_format: RasterFormat,

    /// OCR language profile (ISO 639-2). Default: `"eng"`.
    ///
    /// One fixed profile per pipeline; language detection is out of scope.
    pub ocr_language: String,

    /// Directory for transient per-request artifacts (the written-out PDF
    /// copy and the rasterised image). Default: `$TMPDIR/pdfplain`.
    ///
    /// Must be initialised once before serving via
    /// [`crate::pipeline::scratch::init`]. The pipeline only ever creates
    /// uniquely named files here and removes them before returning.
    pub scratch_dir: PathBuf,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Text-layer reader override. `None` uses the pdf-extract backend.
    pub reader: Option<Arc<dyn TextLayerReader>>,

    /// Rasterizer override. `None` uses the pdfium backend.
    pub rasterizer: Option<Arc<dyn PageRasterizer>>,

    /// OCR engine override. `None` uses tesseract when the `ocr` feature is
    /// enabled; without it the fallback stage reports itself unavailable.
    pub ocr: Option<Arc<dyn OcrEngine>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            dpi: 300,
            raster_width: 2480,
            raster_height: 3508,
            raster_format: RasterFormat::Png,
            ocr_language: "eng".to_string(),
            scratch_dir: std::env::temp_dir().join("pdfplain"),
            download_timeout_secs: 120,
            reader: None,
            rasterizer: None,
            ocr: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("min_text_len", &self.min_text_len)
            .field("dpi", &self.dpi)
            .field("raster_width", &self.raster_width)
            .field("raster_height", &self.raster_height)
            .field("raster_format", &self.raster_format)
            .field("ocr_language", &self.ocr_language)
            .field("scratch_dir", &self.scratch_dir)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("reader", &self.reader.as_ref().map(|_| "<dyn TextLayerReader>"))
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn PageRasterizer>"))
            .field("ocr", &self.ocr.as_ref().map(|_| "<dyn OcrEngine>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The raster parameters handed to the [`PageRasterizer`].
    pub fn raster_spec(&self) -> RasterSpec {
        RasterSpec {
            dpi: self.dpi,
            width: self.raster_width,
            height: self.raster_height,
            format: self.raster_format,
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn min_text_len(mut self, n: usize) -> Self {
        self.config.min_text_len = n;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn raster_dimensions(mut self, width: u32, height: u32) -> Self {
        self.config.raster_width = width.max(1);
        self.config.raster_height = height.max(1);
        self
    }

    pub fn raster_format(mut self, format: RasterFormat) -> Self {
        self.config.raster_format = format;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn scratch_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.scratch_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn reader(mut self, reader: Arc<dyn TextLayerReader>) -> Self {
        self.config.reader = Some(reader);
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr = Some(engine);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.raster_width == 0 || c.raster_height == 0 {
            return Err(ExtractError::InvalidConfig(
                "Raster dimensions must be non-zero".into(),
            ));
        }
        if c.ocr_language.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a4_at_300_dpi() {
        let c = ExtractionConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.raster_width, 2480);
        assert_eq!(c.raster_height, 3508);
        assert_eq!(c.min_text_len, 50);
        assert_eq!(c.ocr_language, "eng");
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ExtractionConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(c.dpi, 600);
        let c = ExtractionConfig::builder().dpi(1).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn build_rejects_empty_language() {
        let result = ExtractionConfig::builder().ocr_language("").build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn raster_spec_mirrors_config() {
        let c = ExtractionConfig::builder()
            .dpi(150)
            .raster_dimensions(1240, 1754)
            .build()
            .unwrap();
        let spec = c.raster_spec();
        assert_eq!(spec.dpi, 150);
        assert_eq!(spec.width, 1240);
        assert_eq!(spec.height, 1754);
    }
}

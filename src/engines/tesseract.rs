//! Default [`OcrEngine`]: tesseract (requires the `ocr` feature).
//!
//! The native tesseract context is created fresh for every call and dropped
//! before returning, so no engine state survives a request. Language data
//! is resolved from the standard `TESSDATA_PREFIX` mechanism unless a
//! datapath is supplied.

use std::path::Path;

use tesseract::Tesseract;
use tracing::debug;

use super::{EngineError, OcrEngine};

/// OCR backend driving libtesseract through the `tesseract` crate.
#[derive(Debug, Default, Clone)]
pub struct TesseractOcr {
    /// Optional explicit tessdata directory. `None` uses the library's
    /// default lookup (`TESSDATA_PREFIX`, then compiled-in paths).
    pub datapath: Option<String>,
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, EngineError> {
        let image = image_path
            .to_str()
            .ok_or_else(|| EngineError::Recognise("non-UTF-8 image path".to_string()))?;

        let mut engine = Tesseract::new(self.datapath.as_deref(), Some(language))
            .map_err(|e| EngineError::Binding(e.to_string()))?
            .set_image(image)
            .map_err(|e| EngineError::Recognise(e.to_string()))?;

        let text = engine
            .get_text()
            .map_err(|e| EngineError::Recognise(e.to_string()))?;

        debug!(
            "tesseract recognised {} chars from {}",
            text.chars().count(),
            image_path.display()
        );

        Ok(text)
    }
}

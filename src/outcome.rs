//! Result types returned by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// The final product of one extraction request.
///
/// `text` is present whenever at least one stage produced non-failure
/// output — including legitimately empty OCR output for a blank page.
/// When both stages fail the pipeline returns
/// [`crate::error::ExtractError::NoTextExtracted`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// The extracted plain text, trimmed of surrounding whitespace.
    pub text: String,

    /// Which stage the text came from.
    pub source: TextSource,

    /// Timing and stage accounting for this request.
    pub stats: ExtractionStats,
}

/// Which pipeline stage produced the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// The structural text layer passed the quality gate.
    TextLayer,

    /// The text layer fell below the usability threshold and OCR was not
    /// able to improve on it; the sub-threshold structural text is returned
    /// rather than failing the request.
    TextLayerPartial,

    /// The OCR fallback ran and its output replaced the structural result.
    Ocr,
}

/// Per-request accounting, in the spirit of a conversion-stats block:
/// enough to answer "which stages ran, how long did they take, what did
/// they see" without storing any document content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Trimmed character count produced by the structural stage.
    pub text_layer_chars: usize,

    /// Whether the OCR fallback was invoked at all.
    pub ocr_invoked: bool,

    /// Wall-clock time spent in the structural stage.
    pub text_layer_duration_ms: u64,

    /// Wall-clock time spent in the OCR fallback (0 when not invoked).
    pub ocr_duration_ms: u64,

    /// Total request duration.
    pub total_duration_ms: u64,
}

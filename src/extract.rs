//! Extraction entry points and the stage orchestrator.
//!
//! ## Fallback policy
//!
//! The pipeline pays for OCR only when it has to. Structural text-layer
//! extraction runs first and is cheap; if its output passes the quality
//! gate the request is done and the OCR collaborators are never touched.
//! Only an unusable text layer triggers the expensive rasterise-and-
//! recognise fallback — and once OCR runs, its output wins outright, even
//! when shorter than the structural text, because a failing gate already
//! told us the text layer is not to be trusted.
//!
//! When OCR itself fails the pipeline still prefers partial text over a
//! hard error: sub-threshold structural text is returned with
//! [`TextSource::TextLayerPartial`] rather than discarded. Only the case
//! where *both* stages produced nothing surfaces as an error.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ExtractionConfig;
use crate::engines::{self, EngineError, OcrEngine, PageRasterizer, TextLayerReader};
use crate::engines::pdfextract::PdfExtractReader;
use crate::engines::pdfium::PdfiumRasterizer;
use crate::error::{ExtractError, StageError};
use crate::outcome::{Extraction, ExtractionStats, TextSource};
use crate::pipeline::{gate, input, ocr, structural};

/// Extract plain text from an in-memory PDF.
///
/// This is the primary entry point for the library: an upload handler that
/// already holds the document bytes calls this directly.
///
/// # Returns
/// `Ok(Extraction)` whenever any stage produced usable output — including
/// sub-threshold structural text after an OCR failure, and legitimately
/// empty OCR output for a blank page.
///
/// # Errors
/// - [`ExtractError::NoTextExtracted`] when the text layer was empty and
///   the OCR fallback also failed
/// - [`ExtractError::Internal`] for unexpected faults (a panicking engine
///   task never crashes the caller)
pub async fn extract_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    let total_start = Instant::now();
    let request_id = Uuid::new_v4().simple().to_string();
    info!(
        "Starting extraction of {} bytes [req {}]",
        bytes.len(),
        &request_id[..8]
    );

    // ── Stage 1: structural text layer ───────────────────────────────────
    let reader = resolve_reader(config);
    let structural_start = Instant::now();
    let best = structural::text_layer(&reader, bytes).await;
    let text_layer_duration_ms = structural_start.elapsed().as_millis() as u64;
    let text_layer_chars = best.chars().count();

    // ── Stage 2: quality gate ────────────────────────────────────────────
    if gate::is_usable(&best, config.min_text_len) {
        info!(
            "text layer usable ({} chars), OCR not needed [req {}]",
            text_layer_chars,
            &request_id[..8]
        );
        return Ok(Extraction {
            text: best,
            source: TextSource::TextLayer,
            stats: ExtractionStats {
                text_layer_chars,
                ocr_invoked: false,
                text_layer_duration_ms,
                ocr_duration_ms: 0,
                total_duration_ms: total_start.elapsed().as_millis() as u64,
            },
        });
    }

    // ── Stage 3: OCR fallback ────────────────────────────────────────────
    debug!(
        "text layer unusable ({} chars < {}), falling back to OCR [req {}]",
        text_layer_chars,
        config.min_text_len,
        &request_id[..8]
    );

    let ocr_start = Instant::now();
    let ocr_result = match resolve_ocr(config) {
        Some(engine) => {
            let rasterizer = resolve_rasterizer(config);
            ocr::recognize_first_page(&rasterizer, &engine, bytes, config, &request_id).await
        }
        None => Err(StageError::Ocr(EngineError::Unavailable("OCR"))),
    };
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    let stats = || ExtractionStats {
        text_layer_chars,
        ocr_invoked: true,
        text_layer_duration_ms,
        ocr_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    match ocr_result {
        // OCR output replaces the structural result unconditionally, even
        // when shorter — the gate already ruled the text layer untrustworthy.
        Ok(text) => {
            info!(
                "OCR produced {} chars in {}ms [req {}]",
                text.chars().count(),
                ocr_duration_ms,
                &request_id[..8]
            );
            Ok(Extraction {
                text,
                source: TextSource::Ocr,
                stats: stats(),
            })
        }
        Err(stage) => {
            warn!(
                error = %stage,
                cause = ?std::error::Error::source(&stage),
                "OCR fallback failed [req {}]",
                &request_id[..8]
            );
            if best.is_empty() {
                Err(ExtractError::NoTextExtracted)
            } else {
                // Partial, low-confidence text beats a hard error.
                info!(
                    "returning partial text layer ({} chars) after OCR failure [req {}]",
                    text_layer_chars,
                    &request_id[..8]
                );
                Ok(Extraction {
                    text: best,
                    source: TextSource::TextLayerPartial,
                    stats: stats(),
                })
            }
        }
    }
}

/// Extract plain text from a PDF file or URL.
///
/// Resolves the input (local path or HTTP/HTTPS URL) to bytes with the
/// boundary checks the CLI needs, then runs [`extract_bytes`].
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    let bytes = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    extract_bytes(&bytes, config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn resolve_reader(config: &ExtractionConfig) -> Arc<dyn TextLayerReader> {
    config
        .reader
        .clone()
        .unwrap_or_else(|| Arc::new(PdfExtractReader))
}

fn resolve_rasterizer(config: &ExtractionConfig) -> Arc<dyn PageRasterizer> {
    config
        .rasterizer
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumRasterizer))
}

fn resolve_ocr(config: &ExtractionConfig) -> Option<Arc<dyn OcrEngine>> {
    config.ocr.clone().or_else(engines::default_ocr)
}

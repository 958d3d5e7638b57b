//! Error types for the pdfplain library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: no text could be produced for the
//!   request at all (bad input, both stages failed, internal fault).
//!   Returned as `Err(ExtractError)` from the top-level `extract*`
//!   functions.
//!
//! * [`StageError`] — **Non-fatal**: a single pipeline stage failed but the
//!   request can still make forward progress (structural failure falls back
//!   to OCR; OCR failure falls back to partial structural text). Stage
//!   errors are absorbed by the orchestrator and never reach callers —
//!   only their coarse classification does.
//!
//! User-visible messages stay deliberately coarse: no stack traces, no
//! engine-library error text. The precise cause is attached as a
//! `#[source]` and logged where the failure happened.

use std::path::PathBuf;
use thiserror::Error;

use crate::engines::EngineError;

/// All fatal errors returned by the pdfplain library.
///
/// Stage-level failures use [`StageError`] and are handled inside the
/// orchestrator rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The document exceeds the supported size limit.
    #[error("PDF is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// Both the text layer and the OCR fallback produced nothing.
    ///
    /// The message text is load-bearing: downstream consumers match on it,
    /// so it must not change.
    #[error("Failed to extract text from PDF using both direct extraction and OCR")]
    NoTextExtracted,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (engine task panicked, runtime failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal, per-stage failure absorbed by the orchestrator.
///
/// Both variants keep a coarse Display on purpose: the pipeline does not
/// distinguish a scratch-write failure from a rasterisation failure from a
/// recognition failure to its caller. The underlying [`EngineError`] rides
/// along as the source for logging.
#[derive(Debug, Error)]
pub enum StageError {
    /// The structural text-layer read failed. Always recoverable: the
    /// pipeline treats the text layer as empty and falls back to OCR.
    #[error("text-layer extraction failed")]
    TextLayer(#[source] EngineError),

    /// Any step of the OCR fallback failed (scratch write, rasterisation,
    /// or recognition).
    #[error("OCR extraction failed")]
    Ocr(#[source] EngineError),
}

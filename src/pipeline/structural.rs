//! Structural extraction: read the PDF's embedded text layer.
//!
//! The reader is CPU-bound and synchronous, so it runs under
//! `spawn_blocking` to keep the Tokio worker threads free for other
//! concurrent requests.
//!
//! Failure here is never fatal: a malformed, encrypted, or unsupported PDF
//! simply has no usable text layer, and the OCR fallback may still succeed.
//! Every failure path — reader error, reader panic, even the blocking task
//! itself dying — degrades to the empty string with a `warn` log.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::engines::TextLayerReader;
use crate::error::StageError;

/// Extract the trimmed text layer from an in-memory PDF.
///
/// Returns the empty string when the reader fails; callers cannot
/// distinguish "no text layer" from "unreadable document" here, and do not
/// need to — the quality gate sends both down the OCR path.
pub async fn text_layer(reader: &Arc<dyn TextLayerReader>, bytes: &[u8]) -> String {
    let reader = Arc::clone(reader);
    let buf = bytes.to_vec();

    let joined = tokio::task::spawn_blocking(move || reader.read_text(&buf)).await;

    match joined {
        Ok(Ok(text)) => {
            let trimmed = text.trim().to_string();
            debug!("text layer produced {} chars", trimmed.chars().count());
            trimmed
        }
        Ok(Err(e)) => {
            let stage = StageError::TextLayer(e);
            warn!(error = %stage, cause = ?std::error::Error::source(&stage), "structural extraction failed; continuing with empty text layer");
            String::new()
        }
        Err(join_err) => {
            warn!("structural extraction task died: {join_err}; continuing with empty text layer");
            String::new()
        }
    }
}

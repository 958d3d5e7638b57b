//! Default [`TextLayerReader`]: the `pdf-extract` crate.
//!
//! `pdf-extract` works directly on an in-memory byte slice, so the
//! structural stage never touches the filesystem. The crate is also known
//! to panic on certain exotic font encodings rather than return an error;
//! since a structural failure must never take down the request, the call
//! runs under `catch_unwind` and a panic is reported as a parse failure.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::{EngineError, TextLayerReader};

/// Text-layer reader backed by `pdf_extract::extract_text_from_mem`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractReader;

impl TextLayerReader for PdfExtractReader {
    fn read_text(&self, bytes: &[u8]) -> Result<String, EngineError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(EngineError::Parse(e.to_string())),
            Err(panic) => Err(EngineError::Parse(panic_message(panic))),
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("parser panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("parser panicked: {s}")
    } else {
        "parser panicked".to_string()
    }
}

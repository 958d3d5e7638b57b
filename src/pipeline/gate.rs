//! Quality gate: is the text layer usable, or must the pipeline fall back
//! to OCR?
//!
//! Pure decision logic — no I/O, no failure mode. Kept separate so the
//! policy can be unit-tested exhaustively and tuned without touching either
//! extraction stage.

/// Minimum trimmed character count for text-layer output to be usable.
///
/// Below this, the text layer almost always holds artifacts of a scanned
/// page (page numbers, watermarks, header fragments) rather than content,
/// and OCR recovers more complete text.
pub const DEFAULT_MIN_TEXT_LEN: usize = 50;

/// Decide whether extracted text is usable as-is.
///
/// Usable iff the trimmed text is non-empty and holds at least `min_len`
/// characters. Counts Unicode scalar values, not bytes, so non-ASCII text
/// is not penalised.
pub fn is_usable(text: &str, min_len: usize) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min_len
}

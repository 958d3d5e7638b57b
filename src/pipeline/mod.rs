//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one step. Keeping stages separate
//! makes each independently testable and lets us swap implementations
//! (e.g. switch the OCR backend) without touching fallback logic.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ structural ──▶ gate ──▶ (usable: done)
//! (path/URL)  (text layer)  (≥50 chars?)
//!                               └──▶ ocr ──▶ final text
//!                                    (scratch file → rasterise → recognise)
//! ```
//!
//! 1. [`input`]      — canonicalise a user-supplied path or URL to a byte
//!    buffer (CLI edge; HTTP upload handlers arrive with bytes already)
//! 2. [`structural`] — read the embedded text layer; failures degrade to an
//!    empty result instead of aborting
//! 3. [`gate`]       — pure usability decision separating direct-extraction
//!    success from fallback necessity
//! 4. [`ocr`]        — materialise the PDF to scratch, rasterise page 1,
//!    recognise, and clean up every artifact on every exit path
//! 5. [`scratch`]    — one-time scratch-directory initialisation

pub mod gate;
pub mod input;
pub mod ocr;
pub mod scratch;
pub mod structural;

//! # pdfplain
//!
//! Extract plain text from PDF documents, with OCR fallback for scanned
//! pages.
//!
//! ## Why this crate?
//!
//! PDF text layers are unreliable. Digitally authored documents carry a
//! clean embedded text layer; scanned documents carry none at all, or only
//! artifacts (page numbers, watermarks) that make a pure text-layer parser
//! return near-empty output. This crate implements the orchestration
//! around that reality: try the fast structural read first, detect when
//! the result is unusable, and only then pay for rasterisation plus
//! optical character recognition — while guaranteeing that every scratch
//! file created along the way is gone before the call returns, even under
//! concurrent requests.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Structural  read the embedded text layer (pdf-extract, in memory)
//!  ├─ 2. Gate        usable? trimmed length ≥ 50 chars → done
//!  ├─ 3. OCR         write scratch copy → rasterise page 1 via pdfium
//!  │                 (A4 @ 300 DPI) → recognise via tesseract ("eng")
//!  └─ 4. Outcome     text + source + stats, or a single coarse error
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfplain::{extract_bytes, ExtractionConfig, pipeline::scratch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     // One-time setup before serving requests.
//!     scratch::init(&config.scratch_dir).await?;
//!
//!     let bytes = std::fs::read("document.pdf")?;
//!     let result = extract_bytes(&bytes, &config).await?;
//!     println!("{}", result.text);
//!     eprintln!("source: {:?}, ocr: {}", result.source, result.stats.ocr_invoked);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfplain` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `ocr`   | off     | Enables the tesseract OCR backend (needs the libtesseract system package) |
//!
//! Without `ocr`, the fallback stage reports itself unavailable: documents
//! with a usable text layer extract normally, documents with sub-threshold
//! text return it as a partial result, and image-only documents fail with
//! the combined-failure error. Callers can also inject any
//! [`engines::OcrEngine`] implementation through the config.
//!
//! ## Outcome Semantics
//!
//! | Text layer | OCR | Result |
//! |------------|-----|--------|
//! | ≥ 50 chars | not invoked | `Ok`, source `TextLayer` |
//! | unusable | succeeds | `Ok`, source `Ocr` (OCR text wins outright) |
//! | 1–49 chars | fails | `Ok`, source `TextLayerPartial` |
//! | empty | fails | `Err(NoTextExtracted)` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engines;
pub mod error;
pub mod extract;
pub mod outcome;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use engines::{EngineError, OcrEngine, PageRasterizer, RasterFormat, RasterSpec, TextLayerReader};
pub use error::{ExtractError, StageError};
pub use extract::{extract, extract_bytes, extract_sync};
pub use outcome::{Extraction, ExtractionStats, TextSource};
pub use pipeline::gate::DEFAULT_MIN_TEXT_LEN;

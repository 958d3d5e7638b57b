//! Integration tests for the extraction pipeline.
//!
//! The engine traits are the test seam: mock readers, rasterizers, and OCR
//! engines are injected through `ExtractionConfig`, so every fallback-policy
//! branch can be asserted — including call counts on the OCR collaborator
//! and the scratch-file cleanup invariant — without pdfium or tesseract
//! installed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pdfplain::pipeline::scratch;
use pdfplain::{
    extract_bytes, EngineError, ExtractError, ExtractionConfig, OcrEngine, PageRasterizer,
    RasterSpec, TextLayerReader, TextSource,
};

// ── Mock engines ─────────────────────────────────────────────────────────────

/// Text-layer reader that always returns the same string.
struct StaticReader(&'static str);

impl TextLayerReader for StaticReader {
    fn read_text(&self, _bytes: &[u8]) -> Result<String, EngineError> {
        Ok(self.0.to_string())
    }
}

/// Text-layer reader that always fails, like a parser on an encrypted PDF.
struct FailingReader;

impl TextLayerReader for FailingReader {
    fn read_text(&self, _bytes: &[u8]) -> Result<String, EngineError> {
        Err(EngineError::Parse("encrypted document".into()))
    }
}

/// Rasterizer that copies the PDF bytes into the image file and records
/// every path pair it was handed.
#[derive(Default)]
struct CopyRasterizer {
    seen: Mutex<Vec<(PathBuf, PathBuf)>>,
    specs: Mutex<Vec<RasterSpec>>,
}

impl PageRasterizer for CopyRasterizer {
    fn rasterize_first_page(
        &self,
        pdf_path: &Path,
        image_path: &Path,
        spec: &RasterSpec,
    ) -> Result<(), EngineError> {
        let bytes = std::fs::read(pdf_path)?;
        std::fs::write(image_path, &bytes)?;
        self.seen
            .lock()
            .unwrap()
            .push((pdf_path.to_path_buf(), image_path.to_path_buf()));
        self.specs.lock().unwrap().push(*spec);
        Ok(())
    }
}

/// Rasterizer that fails without creating anything.
struct FailingRasterizer;

impl PageRasterizer for FailingRasterizer {
    fn rasterize_first_page(
        &self,
        _pdf_path: &Path,
        _image_path: &Path,
        _spec: &RasterSpec,
    ) -> Result<(), EngineError> {
        Err(EngineError::Rasterise("render glitch".into()))
    }
}

/// OCR engine returning a fixed response (or failing) while counting calls.
struct CountingOcr {
    calls: AtomicUsize,
    response: Option<&'static str>,
}

impl CountingOcr {
    fn succeeding(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Some(text),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: None,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for CountingOcr {
    fn recognize(&self, _image_path: &Path, language: &str) -> Result<String, EngineError> {
        assert_eq!(language, "eng", "pipeline must pass the configured language");
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.response {
            Some(text) => Ok(text.to_string()),
            None => Err(EngineError::Recognise("no glyphs matched".into())),
        }
    }
}

/// OCR engine that echoes the image file's contents back as text, making
/// each concurrent outcome attributable to its own payload.
struct EchoOcr;

impl OcrEngine for EchoOcr {
    fn recognize(&self, image_path: &Path, _language: &str) -> Result<String, EngineError> {
        let bytes = std::fs::read(image_path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ── Test helpers ─────────────────────────────────────────────────────────────

const LONG_TEXT: &str =
    "Hello world, this is a long paragraph exceeding fifty characters easily.";

fn scratch_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

async fn test_config(scratch: &Path) -> ExtractionConfig {
    scratch::init(scratch).await.expect("scratch init");
    ExtractionConfig::builder()
        .scratch_dir(scratch)
        .build()
        .expect("valid config")
}

// ── Fallback policy ──────────────────────────────────────────────────────────

#[tokio::test]
async fn usable_text_layer_short_circuits_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let ocr = CountingOcr::succeeding("should never be seen");
    let config = ExtractionConfig::builder()
        .scratch_dir(dir.path())
        .reader(Arc::new(StaticReader(LONG_TEXT)))
        .rasterizer(Arc::new(CopyRasterizer::default()))
        .ocr(ocr.clone())
        .build()
        .unwrap();

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, LONG_TEXT);
    assert_eq!(result.source, TextSource::TextLayer);
    assert!(!result.stats.ocr_invoked);
    assert_eq!(ocr.call_count(), 0, "OCR must not run when the gate passes");
}

#[tokio::test]
async fn empty_text_layer_invokes_ocr_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let ocr = CountingOcr::succeeding("Scanned receipt text.");
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(ocr.clone());

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, "Scanned receipt text.");
    assert_eq!(result.source, TextSource::Ocr);
    assert!(result.stats.ocr_invoked);
    assert_eq!(ocr.call_count(), 1);
}

#[tokio::test]
async fn sub_threshold_text_layer_invokes_ocr_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let ocr = CountingOcr::succeeding("A full page of recognised scan content goes here.");
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("short")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(ocr.clone());

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.source, TextSource::Ocr);
    assert_eq!(ocr.call_count(), 1);
}

#[tokio::test]
async fn ocr_output_replaces_structural_even_when_shorter() {
    let dir = tempfile::tempdir().unwrap();
    // 30 chars of structural text: below the gate, but longer than the OCR result.
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("thirty characters of artifacts")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::succeeding("Receipt."));

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, "Receipt.");
    assert_eq!(result.source, TextSource::Ocr);
}

#[tokio::test]
async fn legitimately_empty_ocr_output_is_a_success() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::succeeding(""));

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, "");
    assert_eq!(result.source, TextSource::Ocr);
}

#[tokio::test]
async fn ocr_failure_returns_partial_structural_text() {
    let dir = tempfile::tempdir().unwrap();
    let ocr = CountingOcr::failing();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("short")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(ocr.clone());

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, "short");
    assert_eq!(result.source, TextSource::TextLayerPartial);
    assert_eq!(ocr.call_count(), 1);
}

#[tokio::test]
async fn both_stages_failing_yields_the_combined_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::failing());

    let err = extract_bytes(b"%PDF-fake", &config).await.unwrap_err();

    assert!(matches!(err, ExtractError::NoTextExtracted));
    assert_eq!(
        err.to_string(),
        "Failed to extract text from PDF using both direct extraction and OCR"
    );
}

#[tokio::test]
async fn failing_reader_degrades_to_ocr_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(FailingReader));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::succeeding("Recovered by OCR."));

    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(result.text, "Recovered by OCR.");
    assert_eq!(result.source, TextSource::Ocr);
    assert_eq!(result.stats.text_layer_chars, 0);
}

#[tokio::test]
async fn identical_bytes_classify_identically() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("short")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::failing());

    let first = extract_bytes(b"%PDF-fake", &config).await.unwrap();
    let second = extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert_eq!(first.source, second.source);
    assert_eq!(first.text, second.text);
}

// ── Scratch artifact lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn artifacts_are_named_per_request_inside_the_scratch_dir() {
    let dir = tempfile::tempdir().unwrap();
    let rasterizer = Arc::new(CopyRasterizer::default());
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(rasterizer.clone());
    config.ocr = Some(CountingOcr::succeeding("ok"));

    extract_bytes(b"%PDF-fake", &config).await.unwrap();

    let seen = rasterizer.seen.lock().unwrap();
    let (pdf_path, image_path) = &seen[0];
    assert_eq!(pdf_path.parent().unwrap(), dir.path());
    assert_eq!(image_path.parent().unwrap(), dir.path());
    assert_eq!(pdf_path.extension().unwrap(), "pdf");
    assert_eq!(image_path.extension().unwrap(), "png");

    let specs = rasterizer.specs.lock().unwrap();
    assert_eq!(specs[0].dpi, 300);
    assert_eq!(specs[0].width, 2480);
    assert_eq!(specs[0].height, 3508);
}

#[tokio::test]
async fn cleanup_after_successful_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::succeeding("ok"));

    extract_bytes(b"%PDF-fake", &config).await.unwrap();

    assert!(
        scratch_entries(dir.path()).is_empty(),
        "no artifact may outlive the request"
    );
}

#[tokio::test]
async fn cleanup_after_rasterizer_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(FailingRasterizer));
    config.ocr = Some(CountingOcr::succeeding("unreachable"));

    let err = extract_bytes(b"%PDF-fake", &config).await.unwrap_err();

    assert!(matches!(err, ExtractError::NoTextExtracted));
    assert!(scratch_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn cleanup_after_recognition_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(Arc::new(CopyRasterizer::default()));
    config.ocr = Some(CountingOcr::failing());

    let _ = extract_bytes(b"%PDF-fake", &config).await;

    assert!(scratch_entries(dir.path()).is_empty());
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_requests_get_distinct_artifacts_and_attributable_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let rasterizer = Arc::new(CopyRasterizer::default());
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    config.rasterizer = Some(rasterizer.clone());
    config.ocr = Some(Arc::new(EchoOcr));

    let payloads: Vec<String> = (0..8)
        .map(|i| format!("%PDF-payload-{i} unique document body"))
        .collect();

    let handles: Vec<_> = payloads
        .iter()
        .map(|payload| {
            let config = config.clone();
            let payload = payload.clone();
            tokio::spawn(async move { extract_bytes(payload.as_bytes(), &config).await })
        })
        .collect();

    for (payload, handle) in payloads.iter().zip(handles) {
        let result = handle.await.unwrap().unwrap();
        // EchoOcr returns the bytes the rasterizer copied from this
        // request's own scratch PDF, so any cross-request mixup shows up
        // as the wrong payload here.
        assert_eq!(&result.text, payload);
        assert_eq!(result.source, TextSource::Ocr);
    }

    let seen = rasterizer.seen.lock().unwrap();
    let mut pdf_paths: Vec<_> = seen.iter().map(|(p, _)| p.clone()).collect();
    let mut image_paths: Vec<_> = seen.iter().map(|(_, i)| i.clone()).collect();
    assert_eq!(pdf_paths.len(), 8);
    pdf_paths.sort();
    pdf_paths.dedup();
    image_paths.sort();
    image_paths.dedup();
    assert_eq!(pdf_paths.len(), 8, "scratch PDF paths must never collide");
    assert_eq!(image_paths.len(), 8, "image paths must never collide");

    drop(seen);
    assert!(scratch_entries(dir.path()).is_empty());
}

// ── Builds without an OCR backend ────────────────────────────────────────────

#[cfg(not(feature = "ocr"))]
#[tokio::test]
async fn missing_ocr_backend_still_honours_partial_result_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("short")));
    // No rasterizer or OCR injected, no `ocr` feature: the fallback stage
    // is unavailable, so the sub-threshold text layer is returned as-is.
    let result = extract_bytes(b"%PDF-fake", &config).await.unwrap();
    assert_eq!(result.text, "short");
    assert_eq!(result.source, TextSource::TextLayerPartial);

    let mut config = test_config(dir.path()).await;
    config.reader = Some(Arc::new(StaticReader("")));
    let err = extract_bytes(b"%PDF-fake", &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::NoTextExtracted));
}

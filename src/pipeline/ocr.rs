//! OCR fallback: materialise the PDF to scratch, rasterise page 1, and
//! recognise its text.
//!
//! ## Artifact lifecycle
//!
//! Two files are created per invocation — the written-out PDF copy and the
//! rasterised page image — and both must be gone before this function
//! returns, whatever happens in between. Each is held as a
//! [`tempfile::TempPath`]: deletion is tied to the value's scope, so early
//! returns, panics inside blocking tasks, and cancellation of the future
//! all still remove the files. On the ordinary exit path the paths are
//! closed explicitly so a failing unlink can be logged; a cleanup failure
//! never overrides the stage's primary result.
//!
//! File names combine the per-request id with `tempfile`'s own random
//! component, so concurrent requests sharing the scratch directory can
//! never collide — the filesystem namespace is the only synchronisation
//! primitive in play.
//!
//! ## Failure semantics
//!
//! Scratch write, rasterisation, and recognition failures all collapse
//! into a single [`StageError::Ocr`] — callers see "OCR extraction
//! failed", the precise cause goes to the log. Only page 1 is processed;
//! multi-page OCR aggregation is out of scope.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::engines::{EngineError, OcrEngine, PageRasterizer};
use crate::error::StageError;

/// Run the OCR fallback over an in-memory PDF.
///
/// Returns the recognised text (trimmed, possibly empty) or a coarse
/// [`StageError::Ocr`] covering every internal failure mode.
pub async fn recognize_first_page(
    rasterizer: &Arc<dyn PageRasterizer>,
    engine: &Arc<dyn OcrEngine>,
    bytes: &[u8],
    config: &ExtractionConfig,
    request_id: &str,
) -> Result<String, StageError> {
    let (pdf_temp, image_temp) = materialize(bytes, config, request_id)
        .await
        .map_err(StageError::Ocr)?;

    let pdf_path = pdf_temp.to_path_buf();
    let image_path = image_temp.to_path_buf();

    let result = rasterize_and_recognize(rasterizer, engine, pdf_path, image_path, config).await;

    // Explicit cleanup so a failing unlink is visible in logs. The TempPath
    // drop guard remains the backstop for every other exit path.
    release(pdf_temp, "PDF copy");
    release(image_temp, "page image");

    result.map_err(StageError::Ocr)
}

/// Write the PDF bytes to scratch and reserve a uniquely named image path.
async fn materialize(
    bytes: &[u8],
    config: &ExtractionConfig,
    request_id: &str,
) -> Result<(TempPath, TempPath), EngineError> {
    let scratch = config.scratch_dir.clone();
    let image_suffix = format!(".{}", config.raster_format.extension());
    let payload = bytes.to_vec();
    let rid = request_id.to_string();

    tokio::task::spawn_blocking(move || -> Result<(TempPath, TempPath), EngineError> {
        let mut pdf_file = tempfile::Builder::new()
            .prefix(&format!("{rid}-doc-"))
            .suffix(".pdf")
            .tempfile_in(&scratch)?;
        pdf_file.write_all(&payload)?;
        pdf_file.flush()?;

        let image_file = tempfile::Builder::new()
            .prefix(&format!("{rid}-page1-"))
            .suffix(&image_suffix)
            .tempfile_in(&scratch)?;

        Ok((pdf_file.into_temp_path(), image_file.into_temp_path()))
    })
    .await
    .map_err(|e| EngineError::Task(e.to_string()))?
}

/// Steps 2 and 3: render page 1, then run recognition over the image.
async fn rasterize_and_recognize(
    rasterizer: &Arc<dyn PageRasterizer>,
    engine: &Arc<dyn OcrEngine>,
    pdf_path: PathBuf,
    image_path: PathBuf,
    config: &ExtractionConfig,
) -> Result<String, EngineError> {
    let spec = config.raster_spec();
    let raster = Arc::clone(rasterizer);
    let raster_image_path = image_path.clone();
    tokio::task::spawn_blocking(move || {
        raster.rasterize_first_page(&pdf_path, &raster_image_path, &spec)
    })
    .await
    .map_err(|e| EngineError::Task(e.to_string()))??;

    debug!("rasterised first page to {}", image_path.display());

    let ocr = Arc::clone(engine);
    let language = config.ocr_language.clone();
    let text = tokio::task::spawn_blocking(move || ocr.recognize(&image_path, &language))
        .await
        .map_err(|e| EngineError::Task(e.to_string()))??;

    Ok(text.trim().to_string())
}

/// Remove a scratch artifact, logging (and swallowing) any failure.
fn release(path: TempPath, what: &str) {
    if let Err(e) = path.close() {
        warn!("failed to remove scratch {what}: {e}");
    }
}

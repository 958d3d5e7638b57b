//! Default [`PageRasterizer`]: pdfium.
//!
//! pdfium is a C++ library loaded at runtime. The binding chain tries, in
//! order: an explicit `PDFIUM_LIB_PATH` environment variable, a platform
//! library next to the executable's working directory, then the system
//! library path. Failure at every step is reported as a binding error —
//! callers see it as an OCR-stage failure, never a crash.

use std::env;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use tracing::debug;

use super::{EngineError, PageRasterizer, RasterSpec};

/// Rasterizer backed by the pdfium rendering engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize_first_page(
        &self,
        pdf_path: &Path,
        image_path: &Path,
        spec: &RasterSpec,
    ) -> Result<(), EngineError> {
        let pdfium = bind_pdfium()?;

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| EngineError::Parse(format!("{e:?}")))?;

        let pages = document.pages();
        let page = pages
            .get(0)
            .map_err(|e| EngineError::Rasterise(format!("no first page: {e:?}")))?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(spec.width as i32)
            .set_maximum_height(spec.height as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| EngineError::Rasterise(format!("{e:?}")))?;

        // OCR engines expect the exact page geometry the pipeline promised,
        // so the render is scaled to the spec dimensions rather than left at
        // whatever aspect-preserving size pdfium produced.
        let image = bitmap
            .as_image()
            .resize_exact(spec.width, spec.height, image::imageops::FilterType::Triangle);

        debug!(
            "rasterised page 1 of {} → {}x{} px",
            pdf_path.display(),
            image.width(),
            image.height()
        );

        image
            .save_with_format(image_path, spec.format.image_format())
            .map_err(|e| EngineError::Rasterise(format!("image write failed: {e}")))?;

        Ok(())
    }
}

/// Bind to a pdfium library, preferring an explicitly configured path.
fn bind_pdfium() -> Result<Pdfium, EngineError> {
    if let Some(path) = env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from) {
        let lib_path = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&path)
        } else {
            path
        };
        return Pdfium::bind_to_library(lib_path)
            .map(Pdfium::new)
            .map_err(|e| EngineError::Binding(format!("PDFIUM_LIB_PATH: {e:?}")));
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| EngineError::Binding(format!("{e:?}")))
}

//! CLI binary for pdfplain.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs one or more documents through the pipeline
//! concurrently, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use pdfplain::pipeline::scratch;
use pdfplain::{extract, ExtractError, Extraction, ExtractionConfig, RasterFormat, TextSource};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (stdout)
  pdfplain document.pdf

  # Several documents, four at a time, one .txt each
  pdfplain -o out/ invoices/*.pdf

  # Extract from a URL
  pdfplain https://example.com/report.pdf

  # Structured JSON with stage accounting
  pdfplain --json scan.pdf > scan.json

  # Scanned documents in German (needs the `ocr` build and deu tessdata)
  pdfplain --lang deu scan.pdf

  # More eager OCR fallback: distrust text layers under 200 chars
  pdfplain --min-chars 200 flyer.pdf

HOW IT WORKS:
  1. The embedded text layer is read directly from the PDF bytes (fast).
  2. If the trimmed result is at least --min-chars characters, that's the
     answer — OCR never runs.
  3. Otherwise the first page is rasterised (A4 geometry at --dpi) into a
     scratch file and OCR'd. OCR output replaces the text layer outright.
  4. If OCR fails but the text layer held *some* text, that partial text
     is returned rather than an error.

  Only the first page is OCR'd. Scratch files are uniquely named per
  request and always removed, even on failure.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (directory or file); otherwise
                          the working directory and system paths are tried
  TESSDATA_PREFIX         Tesseract language-data directory (ocr builds)

SETUP (OCR builds):
  Debian/Ubuntu:  apt install libtesseract-dev tesseract-ocr-eng
  macOS:          brew install tesseract
"#;

/// Extract plain text from PDF files and URLs, falling back to OCR for
/// scanned documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdfplain",
    version,
    about = "Extract plain text from PDF files and URLs, with OCR fallback for scanned pages",
    long_about = "Extract plain text from PDF documents (local files or URLs). Reads the \
embedded text layer first and falls back to rasterisation plus OCR when the text layer is \
missing or too sparse to be trusted — the common signature of a scanned document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write one <stem>.txt per input into this directory instead of stdout.
    #[arg(short, long, env = "PDFPLAIN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Minimum trimmed character count for the text layer to be trusted.
    #[arg(long, env = "PDFPLAIN_MIN_CHARS", default_value_t = 50)]
    min_chars: usize,

    /// Rasterisation DPI for the OCR fallback (72–600).
    #[arg(long, env = "PDFPLAIN_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// OCR language profile (ISO 639-2, e.g. eng, deu, fra).
    #[arg(long, env = "PDFPLAIN_LANG", default_value = "eng")]
    lang: String,

    /// Raster format for the OCR page image.
    #[arg(long, env = "PDFPLAIN_RASTER_FORMAT", value_enum, default_value = "png")]
    raster_format: RasterFormatArg,

    /// Scratch directory for transient artifacts.
    #[arg(long, env = "PDFPLAIN_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Number of documents processed concurrently.
    #[arg(short, long, env = "PDFPLAIN_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Output structured JSON (text, source, stats) instead of plain text.
    #[arg(long, env = "PDFPLAIN_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFPLAIN_NO_PROGRESS")]
    no_progress: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFPLAIN_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFPLAIN_VERBOSE")]
    verbose: bool,

    /// Suppress everything except extracted text and errors.
    #[arg(short, long, env = "PDFPLAIN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum RasterFormatArg {
    Png,
    Jpeg,
}

impl From<RasterFormatArg> for RasterFormat {
    fn from(v: RasterFormatArg) -> Self {
        match v {
            RasterFormatArg::Png => RasterFormat::Png,
            RasterFormatArg::Jpeg => RasterFormat::Jpeg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the per-document result lines provide the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ExtractionConfig::builder()
        .min_text_len(cli.min_chars)
        .dpi(cli.dpi)
        .ocr_language(cli.lang.clone())
        .raster_format(cli.raster_format.clone().into())
        .download_timeout_secs(cli.download_timeout);
    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    // One-time setup before any request runs.
    scratch::init(&config.scratch_dir)
        .await
        .context("Failed to initialise scratch directory")?;

    if let Some(ref dir) = cli.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    // ── Run extractions ──────────────────────────────────────────────────
    let bar = if show_progress {
        let b = ProgressBar::new(cli.inputs.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        b.set_prefix("Extracting");
        b.enable_steady_tick(Duration::from_millis(80));
        Some(b)
    } else {
        None
    };

    let total = cli.inputs.len();
    let mut results: Vec<(usize, String, Result<Extraction, ExtractError>)> =
        stream::iter(cli.inputs.iter().cloned().enumerate().map(|(idx, input)| {
            let config = config.clone();
            async move {
                let result = extract(&input, &config).await;
                (idx, input, result)
            }
        }))
        .buffer_unordered(cli.concurrency.max(1))
        .map(|(idx, input, result)| {
            if let Some(ref b) = bar {
                b.println(result_line(&input, &result));
                b.inc(1);
            }
            (idx, input, result)
        })
        .collect()
        .await;

    if let Some(b) = bar {
        b.finish_and_clear();
    }

    // Emit in the order the inputs were given, not completion order.
    results.sort_by_key(|(idx, _, _)| *idx);

    // ── Emit output ──────────────────────────────────────────────────────
    let mut failures = 0usize;
    for (_, input, result) in &results {
        match result {
            Ok(extraction) => {
                emit(&cli, input, extraction, total)
                    .await
                    .with_context(|| format!("Failed to write output for '{input}'"))?;
                if !cli.quiet && !show_progress && !cli.json {
                    eprintln!("{}", result_line(input, result));
                }
            }
            Err(e) => {
                failures += 1;
                if !show_progress {
                    eprintln!("{} {}  {}", red("✗"), bold(input), red(&e.to_string()));
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures}/{total} documents failed");
    }
    Ok(())
}

/// One coloured summary line per document.
fn result_line(input: &str, result: &Result<Extraction, ExtractError>) -> String {
    match result {
        Ok(extraction) => format!(
            "  {} {}  {}  {}",
            green("✓"),
            bold(input),
            dim(&format!("{:>6} chars", extraction.text.chars().count())),
            dim(&format!(
                "{} · {}ms",
                source_label(extraction.source),
                extraction.stats.total_duration_ms
            )),
        ),
        Err(e) => {
            let msg = e.to_string();
            let msg = msg.lines().next().unwrap_or("error");
            format!("  {} {}  {}", red("✗"), bold(input), red(msg))
        }
    }
}

fn source_label(source: TextSource) -> &'static str {
    match source {
        TextSource::TextLayer => "text layer",
        TextSource::TextLayerPartial => "partial text layer",
        TextSource::Ocr => "ocr",
    }
}

/// Write one document's result to stdout or the output directory.
async fn emit(cli: &Cli, input: &str, extraction: &Extraction, total: usize) -> Result<()> {
    if let Some(ref dir) = cli.output_dir {
        let path = dir.join(format!("{}.txt", output_stem(input)));
        write_atomic(&path, extraction.text.as_bytes()).await?;
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if cli.json {
        let line = serde_json::json!({
            "input": input,
            "text": extraction.text,
            "source": extraction.source,
            "stats": extraction.stats,
        });
        if total == 1 {
            writeln!(handle, "{}", serde_json::to_string_pretty(&line)?)?;
        } else {
            writeln!(handle, "{}", serde_json::to_string(&line)?)?;
        }
    } else {
        if total > 1 {
            writeln!(handle, "{}", cyan(&format!("==> {input} <==")))?;
        }
        handle.write_all(extraction.text.as_bytes())?;
        if !extraction.text.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Atomic write: temp file in the target directory, then rename.
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .with_context(|| format!("writing {:?}", tmp_path))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("renaming into {:?}", path))?;
    Ok(())
}

/// Derive an output file stem from a path or URL.
fn output_stem(input: &str) -> String {
    let last = input
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    let stem = last.strip_suffix(".pdf").or_else(|| last.strip_suffix(".PDF")).unwrap_or(last);
    if stem.is_empty() {
        "document".to_string()
    } else {
        stem.to_string()
    }
}

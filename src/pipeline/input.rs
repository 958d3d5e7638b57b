//! Input resolution: normalise a user-supplied path or URL to a byte buffer.
//!
//! The core pipeline works on in-memory bytes — an HTTP upload handler
//! hands them over directly, already size- and type-checked by its own
//! middleware. The CLI has no such middleware, so this module re-applies
//! the same boundary checks (`%PDF` magic bytes, 10 MiB ceiling) when
//! reading a local file or downloading a URL, so callers get a meaningful
//! error rather than a parser failure deep inside the pipeline.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::ExtractError;

/// Maximum accepted document size: 10 MiB, matching the upload boundary.
pub const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory PDF byte buffer.
///
/// If the input is a URL, download it. If it is a local file, read it.
/// Either way the result is validated before being returned.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Vec<u8>, ExtractError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, validating existence, size, and PDF magic bytes.
async fn read_local(path_str: &str) -> Result<Vec<u8>, ExtractError> {
    let path = PathBuf::from(path_str);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    };

    if metadata.len() > MAX_PDF_BYTES {
        return Err(ExtractError::TooLarge {
            size: metadata.len(),
            limit: MAX_PDF_BYTES,
        });
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    };

    validate_magic(&bytes, &path)?;
    debug!("resolved local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, ExtractError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() as u64 > MAX_PDF_BYTES {
        return Err(ExtractError::TooLarge {
            size: bytes.len() as u64,
            limit: MAX_PDF_BYTES,
        });
    }

    let bytes = bytes.to_vec();
    validate_magic(&bytes, &PathBuf::from(url))?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Verify the `%PDF` magic bytes.
fn validate_magic(bytes: &[u8], path: &std::path::Path) -> Result<(), ExtractError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let result = resolve_input("/definitely/not/a/real/file.pdf", 5).await;
        assert!(matches!(result, Err(ExtractError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn non_pdf_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, b"<html><body>nope</body></html>").unwrap();

        let result = resolve_input(path.to_str().unwrap(), 5).await;
        assert!(matches!(result, Err(ExtractError::NotAPdf { .. })));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        f.set_len(MAX_PDF_BYTES + 1).unwrap();

        let result = resolve_input(path.to_str().unwrap(), 5).await;
        assert!(matches!(result, Err(ExtractError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn valid_pdf_bytes_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4 minimal").unwrap();

        let bytes = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

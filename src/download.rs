//! Download the images listed in a spreadsheet column.
//!
//! Each URL is saved as `<row><ext>` where `row` is the spreadsheet row the URL came from, so the
//! files can be matched back to their rows by eye.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{YardError, YardResult};
use crate::sheet::SheetRow;

/// Extension used when the URL path carries none.
pub const DEFAULT_EXTENSION: &str = ".webp";

/// Column read when none is named.
pub const DEFAULT_COLUMN: &str = "generated_url";

/// Extension of the URL's path, with its leading dot; [`DEFAULT_EXTENSION`] when there is none.
pub fn file_extension_for(raw: &str) -> String {
    let path = match url::Url::parse(raw) {
        Ok(u) => u.path().to_owned(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned())
}

/// Something that turns a URL into response bytes.
pub trait Fetch {
    fn fetch(&self, url: &str) -> YardResult<Vec<u8>>;
}

impl Fetch for reqwest::blocking::Client {
    fn fetch(&self, url: &str) -> YardResult<Vec<u8>> {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| YardError::http(format!("request to {url} failed: {e}")))?;
        let resp = resp
            .error_for_status()
            .map_err(|e| YardError::http(format!("{url}: {e}")))?;
        let body = resp
            .bytes()
            .map_err(|e| YardError::http(format!("reading body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Blocking HTTP client with a per-request timeout.
pub fn http_client(timeout: Duration) -> YardResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("yardkit/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| YardError::http(format!("failed to build http client: {e}")))
}

/// Outcome of [`download_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    /// Spreadsheet row and reason for each failed URL.
    pub failed: Vec<(u32, String)>,
}

fn download_one(fetcher: &impl Fetch, row: &SheetRow, out_dir: &Path) -> YardResult<PathBuf> {
    let bytes = fetcher.fetch(&row.value)?;
    let dst = out_dir.join(format!("{}{}", row.row, file_extension_for(&row.value)));
    std::fs::write(&dst, bytes).with_context(|| format!("write '{}'", dst.display()))?;
    Ok(dst)
}

/// Fetch every URL in `rows` into `out_dir`. A failed URL is logged and counted; the rest
/// still run.
#[tracing::instrument(skip(rows, fetcher), fields(urls = rows.len()))]
pub fn download_all(
    rows: &[SheetRow],
    out_dir: &Path,
    fetcher: &impl Fetch,
) -> YardResult<DownloadReport> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory '{}'", out_dir.display()))?;

    let mut report = DownloadReport::default();
    for row in rows {
        match download_one(fetcher, row, out_dir) {
            Ok(path) => {
                tracing::info!(row = row.row, "saved {}", path.display());
                report.saved.push(path);
            }
            Err(e) => {
                tracing::warn!(row = row.row, "download failed: {e}");
                report.failed.push((row.row, e.to_string()));
            }
        }
    }
    Ok(report)
}

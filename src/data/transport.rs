//! Transports: where the raw CSV text comes from.
//!
//! A transport is awaited once per pipeline run and hands back the whole body
//! as text. Retries and connection management are left to the transport.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::TransportError;

pub const ENV_SHEET_ID: &str = "SHEET_ID";
pub const ENV_SHEET_NAME: &str = "SHEET_NAME";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self) -> Result<String, TransportError>;

    /// Human-readable source description for logs and reports.
    fn describe(&self) -> String;
}

/// HTTP GET of a CSV document.
pub struct HttpTransport {
    client: Client,
    url: String,
    query: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// CSV export of one sheet of a published Google spreadsheet.
    pub fn google_sheet(sheet_id: &str, sheet_name: &str) -> Self {
        Self {
            query: sheet_query(sheet_name),
            ..Self::new(sheet_base_url(sheet_id))
        }
    }

    /// Build from `SHEET_ID` / `SHEET_NAME` (a `.env` file is honored).
    pub fn from_env() -> Result<Self, TransportError> {
        let sheet_id = dotenvy::var(ENV_SHEET_ID)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                TransportError::MissingSource(format!(
                    "set {ENV_SHEET_ID} (environment or .env), or pass --sheet-id/--url/--file/--sample"
                ))
            })?;
        Ok(Self::google_sheet(sheet_id.trim(), &sheet_name_or_env(None)))
    }

    /// Full request URL, query string included.
    pub fn url(&self) -> String {
        with_query(&self.url, &self.query)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self) -> Result<String, TransportError> {
        let http_err = |source| TransportError::Http {
            url: self.url(),
            source,
        };

        let resp = self
            .client
            .get(&self.url)
            .query(&self.query)
            .send()
            .await
            .map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(TransportError::Status {
                url: self.url(),
                status: resp.status().as_u16(),
            });
        }
        resp.text().await.map_err(http_err)
    }

    fn describe(&self) -> String {
        self.url()
    }
}

/// A CSV file on disk.
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(&self) -> Result<String, TransportError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| TransportError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory text (generated samples, tests).
pub struct MemoryTransport {
    label: String,
    body: String,
}

impl MemoryTransport {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch(&self) -> Result<String, TransportError> {
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// The explicit sheet name, else `SHEET_NAME` (environment or `.env`), else `Sheet1`.
pub fn sheet_name_or_env(explicit: Option<String>) -> String {
    explicit
        .or_else(|| dotenvy::var(ENV_SHEET_NAME).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string())
}

/// Export URL for a sheet as CSV (Google visualization endpoint).
pub fn sheet_csv_url(sheet_id: &str, sheet_name: &str) -> String {
    with_query(&sheet_base_url(sheet_id), &sheet_query(sheet_name))
}

fn sheet_base_url(sheet_id: &str) -> String {
    format!("{SHEETS_BASE_URL}/{sheet_id}/gviz/tq")
}

fn sheet_query(sheet_name: &str) -> Vec<(String, String)> {
    vec![
        ("tqx".to_string(), "out:csv".to_string()),
        ("sheet".to_string(), sheet_name.to_string()),
    ]
}

/// Display form of `base` plus `query`, encoded the way the request will be.
fn with_query(base: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    match Url::parse_with_params(base, query) {
        Ok(url) => url.into(),
        // Unparseable base: the request itself reports the error.
        Err(_) => base.to_string(),
    }
}

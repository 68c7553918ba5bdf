//! Where the API description comes from, and how it is fetched

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::info;

use crate::catalog::Catalog;
use crate::constants::DEFAULT_SPEC_DOCUMENT;
use crate::discovery::openapi;
use crate::error::{ConfigError, LoadError};

/// Location of the OpenAPI description
#[derive(Clone, Debug, PartialEq)]
pub enum SpecSource {
    Url(Url),
    File(PathBuf),
}

impl SpecSource {
    pub fn parse_url(raw: &str) -> Result<SpecSource, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidSpecUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(SpecSource::Url(url)),
            other => Err(ConfigError::InvalidSpecUrl(format!(
                "unsupported scheme {}",
                other
            ))),
        }
    }

    /// URL of the document itself. A URL that does not name a `.json`,
    /// `.yaml` or `.yml` file is taken as the service root.
    pub fn document_url(&self) -> Option<Url> {
        let SpecSource::Url(url) = self else {
            return None;
        };
        let mut url = url.clone();
        url.set_fragment(None);
        let path = url.path().to_ascii_lowercase();
        if path.ends_with(".json") || path.ends_with(".yaml") || path.ends_with(".yml") {
            return Some(url);
        }
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), DEFAULT_SPEC_DOCUMENT);
        url.set_path(&joined);
        Some(url)
    }

    /// Directory of the document URL, used as the base URL when no explicit
    /// one is configured.
    pub fn derived_base_url(&self) -> Option<String> {
        let mut url = self.document_url()?;
        url.set_query(None);
        url.set_fragment(None);
        let dir = match url.path().rfind('/') {
            Some(idx) => url.path()[..idx].to_string(),
            None => String::new(),
        };
        url.set_path(&dir);
        Some(url.as_str().trim_end_matches('/').to_string())
    }

    pub fn describe(&self) -> String {
        match self {
            SpecSource::Url(_) => self
                .document_url()
                .map(|u| u.to_string())
                .unwrap_or_default(),
            SpecSource::File(path) => path.display().to_string(),
        }
    }
}

/// Fetches (or reads) and parses the description into a catalog.
pub async fn load(
    client: &reqwest::Client,
    source: &SpecSource,
    timeout: Duration,
) -> Result<Catalog, LoadError> {
    let content = match source {
        SpecSource::Url(_) => {
            let url = source
                .document_url()
                .ok_or_else(|| LoadError::Parse("invalid spec url".into()))?;
            fetch(client, url, timeout).await?
        }
        SpecSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::ReadFile {
                path: path.clone(),
                source,
            })?,
    };

    let catalog = openapi::parse_str(&content)?;
    info!(
        source = %source.describe(),
        endpoints = catalog.len(),
        schemes = catalog.schemes().len(),
        "loaded api description"
    );
    Ok(catalog)
}

async fn fetch(client: &reqwest::Client, url: Url, timeout: Duration) -> Result<String, LoadError> {
    let label = url.to_string();
    let to_load_error = |source: reqwest::Error| {
        if source.is_timeout() {
            LoadError::Timeout(timeout, label.clone())
        } else {
            LoadError::Fetch {
                url: label.clone(),
                source,
            }
        }
    };

    let resp = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(to_load_error)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: label,
            status: status.as_u16(),
        });
    }
    resp.text().await.map_err(to_load_error)
}

/// Explicit base URL, else the spec URL's directory, else the document's
/// first concrete server.
pub fn resolve_base_url(
    explicit: Option<&str>,
    source: &SpecSource,
    catalog: &Catalog,
) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| source.derived_base_url())
        .or_else(|| catalog.server_url.clone())
}

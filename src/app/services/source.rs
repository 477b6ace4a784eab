//! Candidates file sources
//!
//! The candidates file is a static UTF-8 resource, read either from the
//! local filesystem or over HTTP. Fetch failures surface as errors so the
//! caller can keep its previous state and offer a retry.

use crate::config::SourceConfig;
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};
use url::{Host, Url};

/// Location of a candidates file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Local file path
    File(PathBuf),

    /// Remote http(s) resource
    Url(Url),
}

impl FromStr for SourceLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let location = s.trim();
        if location.is_empty() {
            return Err(Error::invalid_source(s, "location is empty"));
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| Error::invalid_source(location, e.to_string()))?;
            return Ok(SourceLocation::Url(url));
        }

        if let Some((scheme, _)) = location.split_once("://") {
            return Err(Error::invalid_source(
                location,
                format!("unsupported scheme '{}'", scheme),
            ));
        }

        Ok(SourceLocation::File(PathBuf::from(location)))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fetch the full text of a candidates file
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub async fn fetch_text(location: &SourceLocation, config: &SourceConfig) -> Result<String> {
    let bytes = match location {
        SourceLocation::File(path) => {
            if !path.exists() {
                return Err(Error::source_not_found(path.display().to_string()));
            }
            debug!("Reading candidates file {}", path.display());
            tokio::fs::read(path).await.map_err(|e| {
                Error::io(format!("Failed to read {}", path.display()), e)
            })?
        }
        SourceLocation::Url(url) => fetch_url(url, config).await?,
    };

    Ok(decode_text(bytes, location))
}

async fn fetch_url(url: &Url, config: &SourceConfig) -> Result<Vec<u8>> {
    info!("Fetching candidates from {}", url);

    let mut builder = reqwest::Client::builder().timeout(config.timeout());
    if is_loopback(url) {
        builder = builder.no_proxy();
    }

    let client = builder
        .build()
        .map_err(|e| Error::fetch(url.as_str(), "failed to build HTTP client", Some(e)))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| Error::fetch(url.as_str(), "request failed", Some(e)))?;

    let status = response.status();
    if !status.is_success() {
        warn!("Fetching {} returned {}", url, status);
        return Err(Error::http_status(url.as_str(), status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::fetch(url.as_str(), "failed to read response body", Some(e)))?;

    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Local endpoints are never sent through a configured proxy
fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        Some(Host::Domain(domain)) => domain == "localhost",
        None => false,
    }
}

fn decode_text(bytes: Vec<u8>, location: &SourceLocation) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "{} is not valid UTF-8, replacing invalid sequences",
                location
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

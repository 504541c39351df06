use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use joblist_config::SourceConfig;
use joblist_http::{HttpClient, HttpError, RequestOpts};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can hand back the HTML of the listings page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<String, SourceError>;

    /// Short description used in logs.
    fn describe(&self) -> String;
}

/// Fetches the page over HTTP.
#[derive(Clone)]
pub struct HttpSource {
    http: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();
        joblist_http::parse_url(&url)?;
        Ok(Self { http, url })
    }

    /// Build the client from `source` settings: timeout, retries, user agent.
    pub fn from_config(cfg: &SourceConfig) -> Result<Self, HttpError> {
        let mut http = HttpClient::new()?.with_retries(cfg.retries);
        if let Some(secs) = cfg.timeout_secs {
            http = http.with_timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &cfg.user_agent {
            http = http.with_user_agent(agent)?;
        }
        Self::new(http, cfg.url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let body = self.http.get_text(&self.url, RequestOpts::default()).await?;
        tracing::info!(target: "web.source", url = %self.url, bytes = body.len(), "page.fetched");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a saved copy of the page from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PageSource for FileSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        tracing::info!(
            target: "web.source",
            path = %self.path.display(),
            bytes = bytes.len(),
            "page.read"
        );
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

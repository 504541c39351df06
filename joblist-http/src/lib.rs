//! Minimal HTTP client for fetching pages, with safe logging and optional retries.
//!
//! - Request options: headers, timeout, retries
//! - Defaults: no timeout, no retries, no extra headers
//! - When a retry budget is set, 429/5xx and network failures are retried with
//!   exponential backoff and `Retry-After` support
//! - Optional *raw* request/response logging via `JOBLIST_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), joblist_http::HttpError> {
//! let client = joblist_http::HttpClient::new()?;
//! let html = client
//!     .get_text("https://realpython.github.io/fake-jobs/", joblist_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body checksum, retries and final errors, plus raw lines
//! (target `http.raw`) when `JOBLIST_HTTP_RAW=1`. Authorization headers are
//! always redacted.

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "JOBLIST_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

/// Parse an absolute URL, mapping failures into [`HttpError::Url`].
///
/// ```
/// assert!(joblist_http::parse_url("https://example.org/jobs/").is_ok());
/// assert!(matches!(
///     joblist_http::parse_url("not a url"),
///     Err(joblist_http::HttpError::Url(_))
/// ));
/// ```
pub fn parse_url(raw: &str) -> Result<Url, HttpError> {
    Url::parse(raw.trim()).map_err(|e| HttpError::Url(format!("{raw}: {e}")))
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs; unset fields fall back to the client defaults.
///
/// ```
/// use joblist_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(1),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.headers.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: Option<HeaderValue>,
    pub default_timeout: Option<Duration>,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client with no timeout and no retries.
    ///
    /// ```no_run
    /// use joblist_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, None);
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            user_agent: None,
            default_timeout: None,
            max_retries: 0,
        })
    }

    /// Apply a whole-request timeout to every call.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    /// Override the default retry budget (zero).
    ///
    /// ```no_run
    /// use joblist_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new()?.with_retries(5);
    /// assert_eq!(client.max_retries, 5);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Send a `User-Agent` header on every request.
    pub fn with_user_agent(mut self, agent: &str) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(agent)
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        self.user_agent = Some(value);
        Ok(self)
    }

    /// GET `url` and return the body as text. Invalid UTF-8 is replaced, not rejected.
    pub async fn get_text(&self, url: &str, opts: RequestOpts) -> Result<String, HttpError> {
        let url = parse_url(url)?;
        let bytes = self.get_bytes(&url, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // FIXME(observability): emit a dedicated span with `http.*` fields so the
    // fetch and the extraction that follows share one trace.
    async fn get_bytes(&self, url: &Url, opts: RequestOpts) -> Result<Vec<u8>, HttpError> {
        let method = Method::GET;
        let mut attempt = 0usize;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.or(self.default_timeout);
        let timeout_ms = timeout.map(|t| t.as_millis() as u64);

        let mut headers = opts.headers.clone().unwrap_or_default();
        if let Some(agent) = &self.user_agent {
            headers.entry(USER_AGENT).or_insert_with(|| agent.clone());
        }

        loop {
            // ----- Build request -----
            let mut rb = self.inner.request(method.clone(), url.clone());
            if let Some(timeout) = timeout {
                rb = rb.timeout(timeout);
            }
            if !headers.is_empty() {
                rb = rb.headers(headers.clone());
            }

            let req_id = uuid::Uuid::new_v4().simple().to_string();
            let attempt0 = attempt + 1;

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt0,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=?timeout_ms,
                headers=?redact_headers(&headers),
                "http.request.start"
            );

            if raw_enabled() {
                let curl = make_curl(&method, url, &headers);
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            // ----- Send -----
            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.send"
                    );
                    return Err(HttpError::Network(message));
                }
            };
            let status = resp.status();
            let resp_headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.body"
                    );
                    return Err(HttpError::Network(message));
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            let x_request_id = resp_headers
                .get("x-request-id")
                .or_else(|| resp_headers.get("x-github-request-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let content_type = resp_headers
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");

            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=dur_ms,
                body_len=bytes.len(),
                content_type=%content_type,
                x_request_id=%x_request_id,
                "http.response.headers"
            );

            if raw_enabled() {
                let hdrs = redact_headers(&resp_headers);
                let truncated = bytes.len() > RAW_MAX_BODY;
                let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
                tracing::info!(
                    target:"http.raw",
                    %req_id,
                    status=%status,
                    duration_ms=dur_ms,
                    headers=?hdrs,
                    body=%text,
                    truncated
                );
            }

            // ----- Success path -----
            if status.is_success() {
                tracing::debug!(
                    req_id=%req_id,
                    checksum=%blake3::hash(&bytes).to_hex(),
                    "http.response.body"
                );
                return Ok(bytes.to_vec());
            }

            // ----- Non-success: maybe retry -----
            let message = snip_body(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            let is_5xx = status.is_server_error();

            if (is_429 || is_5xx) && attempt < max_retries {
                attempt += 1;
                let delay = if let Some(secs) = retry_after_delay_secs(&resp_headers) {
                    Duration::from_secs(secs)
                } else if is_429 {
                    // floor for 429 when no Retry-After is present
                    backoff(attempt).max(Duration::from_millis(1100))
                } else {
                    backoff(attempt)
                };
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    message=%message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                %status,
                message=%message,
                x_request_id=%x_request_id,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id: x_request_id,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(16) as u32;
    Duration::from_millis(200u64.saturating_mul(1 << shift))
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).trim().to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

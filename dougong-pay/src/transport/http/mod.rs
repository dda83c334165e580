//! HTTP transport implementation.
//!
//! Delivers envelopes with reqwest: POST endpoints receive the envelope as a JSON
//! body, GET endpoints as `sys_id`, `product_id`, `data` and `sign` query parameters.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{PayError, Result},
    transport::{HttpMethod, Transport, TransportRequest, TransportResponse},
};

/// Validates the URL scheme.
///
/// Requires HTTPS unless `allow_insecure` is set, which also permits plain HTTP.
fn validate_url(url: &Url, allow_insecure: bool) -> Result<()> {
    match url.scheme() {
        "https" => Ok(()),
        "http" if allow_insecure => Ok(()),
        "http" => Err(PayError::Transport("Only HTTPS URLs are allowed".to_owned())),
        scheme => Err(PayError::Transport(format!("unsupported URL scheme: {scheme}"))),
    }
}

/// Rejects paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(PayError::Transport(
            "Invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    Ok(path)
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains('\r') || name.contains('\n') || name.contains('\0') {
        return Err(PayError::Transport(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains('\r') || value.contains('\n') || value.contains('\0') {
        return Err(PayError::Transport(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling and keep-alive. The response body is
/// returned for every status; 4xx and 5xx answers from the gateway carry a JSON
/// body that the caller needs to see.
///
/// # Examples
///
/// ```
/// use dougong_pay::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig {
///     pool_max_idle_per_host: 20,
///     timeout_secs: 60,
///     connect_timeout_secs: 15,
///     http_version: HttpVersion::Http1,
///     allow_insecure: false,
/// };
///
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
    allow_insecure: bool,
}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 100
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: Auto
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Http`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Config`] if the configuration is out of range and
    /// [`PayError::Http`] if the HTTP client cannot be created.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(PayError::Http)?;

        Ok(Self { client, http_version: config.http_version, allow_insecure: config.allow_insecure })
    }

    #[instrument(
        skip(self, request),
        fields(method = request.method.as_str(), url = %request.url, status = tracing::field::Empty)
    )]
    async fn execute_request(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| PayError::Transport(format!("invalid url '{}': {e}", request.url)))?;

        validate_url(&url, self.allow_insecure)?;
        sanitize_path(url.path())?;

        for (key, value) in &request.headers {
            validate_header(key, value)?;
        }

        let envelope = &request.envelope;
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(url).json(envelope),
            HttpMethod::Get => {
                let data = serde_json::to_string(&envelope.data)
                    .map_err(|e| PayError::Transport(format!("failed to encode data: {e}")))?;
                self.client.get(url).query(&[
                    ("sys_id", envelope.sys_id.as_str()),
                    ("product_id", envelope.product_id.as_str()),
                    ("data", data.as_str()),
                    ("sign", envelope.sign.as_str()),
                ])
            }
        };

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "gateway responded");

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn send<'a>(&'a self, request: &'a TransportRequest) -> Result<TransportResponse> {
        self.execute_request(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

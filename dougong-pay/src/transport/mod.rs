//! Transport abstraction.
//!
//! The client hands a signed [`TransportRequest`] to a [`Transport`] and gets the raw
//! [`TransportResponse`] back. Transports deliver bytes only: they never inspect the
//! business payload and never turn an HTTP status into an error.
//!
//! [`HttpTransport`] is the production implementation. Tests and embedders can
//! supply their own by implementing the trait.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dougong_pay::{
//!     request::{Operation, RequestBuilder},
//!     transport::{HttpTransport, Transport, TransportRequest},
//! };
//! # use std::sync::Arc;
//! # use dougong_pay::config::Credentials;
//!
//! # async fn example(credentials: Arc<Credentials>) -> dougong_pay::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let builder = RequestBuilder::new(credentials);
//!
//! let input = serde_json::json!({
//!     "huifu_id": "6666000000000000",
//!     "org_req_seq_id": "ORDER_1",
//! });
//! let prepared = builder.prepare(Operation::Query, input.as_object().unwrap())?;
//!
//! let response = transport.send(&TransportRequest::from(prepared)).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    request::{PreparedRequest, SignedEnvelope},
};

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// HTTP method of a gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Envelope sent as query parameters.
    Get,
    /// Envelope sent as a JSON body.
    Post,
}

impl HttpMethod {
    /// Upper case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute endpoint URL.
    pub url: String,
    /// Signed envelope to deliver.
    pub envelope: SignedEnvelope,
    /// Extra HTTP headers.
    pub headers: Vec<(String, String)>,
}

impl From<PreparedRequest> for TransportRequest {
    fn from(prepared: PreparedRequest) -> Self {
        Self {
            method: prepared.method,
            url: prepared.url,
            envelope: prepared.envelope,
            headers: Vec::new(),
        }
    }
}

/// Raw response from a transport.
///
/// Contains the response body, HTTP status code, and response headers.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Delivers signed requests to the gateway.
///
/// Implementations must be shareable across tasks. A transport reports only delivery
/// failures; any response the server produced, whatever its status, is returned as a
/// [`TransportResponse`].
pub trait Transport: Send + Sync {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered or the response cannot be
    /// read.
    fn send<'a>(
        &'a self,
        request: &'a TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    ///
    /// Examples: "http/1.1", "http/2"
    fn protocol_name(&self) -> &'static str;
}

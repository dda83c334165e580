//! Gateway client.
//!
//! [`DougongClient`] ties the request builder to a transport. Each operation
//! validates the input, assembles and signs the payload, sends the envelope and
//! returns the decoded JSON response unchanged. Business result codes
//! (`resp_code`, `trans_stat`, ...) are left to the caller.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    config::{ClientConfig, Credentials},
    error::{PayError, Result},
    request::{Operation, PreparedRequest, RequestBuilder},
    signer::RsaSigner,
    transport::{HttpTransport, Transport, TransportRequest, TransportResponse},
    validator::Params,
};

/// Client for the Dougong aggregated payment gateway.
///
/// Holds no per-call state and can be shared across tasks behind an [`Arc`].
///
/// # Examples
///
/// ```rust,no_run
/// use dougong_pay::{Credentials, DougongClient};
/// use serde_json::json;
///
/// # async fn example() -> dougong_pay::Result<()> {
/// let credentials = Credentials::new(
///     "PAYUN",
///     "6666000100000000",
///     std::fs::read_to_string("merchant_private.pem").unwrap_or_default(),
///     std::fs::read_to_string("huifu_public.pem").unwrap_or_default(),
/// )?;
/// let client = DougongClient::new(credentials)?;
///
/// let input = json!({
///     "req_seq_id": "ORDER_20250101_0001",
///     "huifu_id": "6666000000000000",
///     "trade_type": "T_MINIAPP",
///     "goods_desc": "测试商品",
///     "trans_amt": "0.01",
/// });
/// let response = client.create_payment(input.as_object().unwrap()).await?;
/// println!("resp_code: {:?}", response.get("data").and_then(|d| d.get("resp_code")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DougongClient<T: Transport = HttpTransport> {
    builder: RequestBuilder,
    transport: T,
}

impl DougongClient<HttpTransport> {
    /// Creates a client with the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(credentials: impl Into<Arc<Credentials>>) -> Result<Self> {
        Ok(Self::with_transport(credentials, HttpTransport::new()?))
    }

    /// Creates a client from a parsed configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Config`] if credentials or transport settings are invalid.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.transport)?;
        let credentials = config.credentials.into_credentials()?;
        Ok(Self::with_transport(credentials, transport))
    }
}

impl<T: Transport> DougongClient<T> {
    /// Creates a client over a custom transport.
    #[must_use]
    pub fn with_transport(credentials: impl Into<Arc<Credentials>>, transport: T) -> Self {
        Self { builder: RequestBuilder::new(credentials.into()), transport }
    }

    /// Credentials in use.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        self.builder.credentials()
    }

    /// Signer for response and notification verification and for encrypting
    /// sensitive fields.
    #[must_use]
    pub const fn signer(&self) -> &RsaSigner {
        self.builder.signer()
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates an aggregated payment order (`/v3/trade/payment/jspay`).
    ///
    /// Required: `req_seq_id`, `huifu_id`, `trade_type`, `goods_desc`, `trans_amt`.
    /// `req_date` defaults to today in the gateway's time zone.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn create_payment(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::CreatePayment, input).await
    }

    /// Closes an unpaid order (`/v2/trade/payment/scanpay/close`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn close(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::Close, input).await
    }

    /// Queries the result of a close request (`/v2/trade/payment/scanpay/closequery`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn close_query(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::CloseQuery, input).await
    }

    /// Charges a payer-presented code (`/v3/trade/payment/micropay`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn micropay(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::Micropay, input).await
    }

    /// Queries a payment (`/v3/trade/payment/scanpay/query`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn query(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::Query, input).await
    }

    /// Refunds a payment (`/v3/trade/payment/scanpay/refund`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn refund(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::Refund, input).await
    }

    /// Queries a refund (`/v3/trade/payment/scanpay/refundquery`).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn refund_query(&self, input: &Params) -> Result<Params> {
        self.execute(Operation::RefundQuery, input).await
    }

    /// Validates and signs a request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Validation`] or [`PayError::Crypto`].
    pub fn prepare(&self, operation: Operation, input: &Params) -> Result<PreparedRequest> {
        self.builder.prepare(operation, input)
    }

    /// Runs any operation end to end.
    ///
    /// # Errors
    ///
    /// - [`PayError::Validation`]: input rejected; nothing was sent
    /// - [`PayError::Crypto`]: signing failed; nothing was sent
    /// - [`PayError::Transport`] / [`PayError::Http`]: delivery failed, or a non-2xx
    ///   response did not carry a JSON object
    /// - [`PayError::Protocol`]: a 2xx response did not carry a JSON object
    #[instrument(
        skip_all,
        fields(operation = %operation, protocol = self.transport.protocol_name())
    )]
    pub async fn execute(&self, operation: Operation, input: &Params) -> Result<Params> {
        let prepared = self.prepare(operation, input)?;
        self.send(prepared).await
    }

    /// Sends a prepared request and decodes the response.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn send(&self, prepared: PreparedRequest) -> Result<Params> {
        let operation = prepared.operation;
        let request = TransportRequest::from(prepared);

        let response = self.transport.send(&request).await?;
        if response.is_success() {
            info!(%operation, status = response.status, "gateway call completed");
        } else {
            warn!(%operation, status = response.status, "gateway returned error status");
        }

        decode_response(&response)
    }

    /// Verifies the signature of a synchronous response shaped `{data, sign}`.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Protocol`] if the response lacks `data` or `sign`, and
    /// [`PayError::Crypto`] if the public key cannot be parsed.
    pub fn verify_response(&self, response: &Params) -> Result<bool> {
        let (Some(Value::Object(data)), Some(Value::String(sign))) =
            (response.get("data"), response.get("sign"))
        else {
            return Err(PayError::Protocol("response has no data/sign pair".to_owned()));
        };

        Ok(self.signer().verify_sync_response(data, sign)?)
    }
}

/// Decodes a response body into a JSON object, whatever the status.
fn decode_response(response: &TransportResponse) -> Result<Params> {
    match serde_json::from_slice::<Params>(&response.body) {
        Ok(body) => Ok(body),
        Err(e) if response.is_success() => {
            Err(PayError::Protocol(format!("response body is not a JSON object: {e}")))
        }
        Err(e) => Err(PayError::Transport(format!(
            "gateway returned status {} with an unreadable body: {e}",
            response.status
        ))),
    }
}

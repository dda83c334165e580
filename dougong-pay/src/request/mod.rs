//! Request assembly for gateway operations.
//!
//! Every operation is described by a static [`RequestSpec`]: required fields with
//! their labels, conditional groups, an ordered allow-list of optional fields and the
//! format rules. A single generic pipeline turns caller input into a signed request:
//!
//! 1. [`validate`]: required fields, then conditional groups, then format rules
//!    (applied to present fields only). The first failure aborts.
//! 2. [`assemble`]: required fields in declared order, then present conditional
//!    fields in group order, then present optional fields in allow-list order.
//!    Anything else in the input is dropped.
//! 3. [`RequestBuilder::prepare`]: sign the payload and wrap it in a
//!    [`SignedEnvelope`] addressed to the operation's endpoint.
//!
//! # Examples
//!
//! ```
//! use dougong_pay::request::{Operation, assemble, validate};
//! use serde_json::json;
//!
//! let input = json!({
//!     "huifu_id": "6666000000000000",
//!     "org_req_seq_id": "ORDER_1",
//!     "unrelated": "dropped",
//! });
//! let input = input.as_object().unwrap();
//!
//! let spec = Operation::Query.spec();
//! validate(spec, input).unwrap();
//!
//! let payload = assemble(spec, input, "20250101");
//! assert_eq!(payload.keys().collect::<Vec<_>>(), ["huifu_id", "org_req_seq_id"]);
//! ```

mod catalog;

use std::{fmt, sync::Arc};

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

pub use catalog::TRADE_TYPES;

use crate::{
    config::Credentials,
    error::Result,
    signer::RsaSigner,
    transport::HttpMethod,
    validator::{
        self, Params, Pattern, ValidationResult, amount_format, match_pattern, max_length,
        one_of_enum, require_fields, require_one_of, text_value,
    },
};

/// Field carrying the request date.
const REQUEST_DATE_FIELD: &str = "req_date";

/// Offset of the gateway's local time from UTC.
const GATEWAY_UTC_OFFSET: TimeDelta = TimeDelta::hours(8);

/// Gateway operations supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Aggregated payment creation (positive scan / JS pay).
    CreatePayment,
    /// Close an unpaid order.
    Close,
    /// Query the result of a close request.
    CloseQuery,
    /// Micropay: the merchant scans the payer's code.
    Micropay,
    /// Payment status query.
    Query,
    /// Refund a payment.
    Refund,
    /// Refund status query.
    RefundQuery,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CreatePayment,
        Self::Close,
        Self::CloseQuery,
        Self::Micropay,
        Self::Query,
        Self::Refund,
        Self::RefundQuery,
    ];

    /// Snake case name, used in logs and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreatePayment => "create_payment",
            Self::Close => "close",
            Self::CloseQuery => "close_query",
            Self::Micropay => "micropay",
            Self::Query => "query",
            Self::Refund => "refund",
            Self::RefundQuery => "refund_query",
        }
    }

    /// Endpoint path relative to the base URI.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CreatePayment => "/v3/trade/payment/jspay",
            Self::Close => "/v2/trade/payment/scanpay/close",
            Self::CloseQuery => "/v2/trade/payment/scanpay/closequery",
            Self::Micropay => "/v3/trade/payment/micropay",
            Self::Query => "/v3/trade/payment/scanpay/query",
            Self::Refund => "/v3/trade/payment/scanpay/refund",
            Self::RefundQuery => "/v3/trade/payment/scanpay/refundquery",
        }
    }

    /// HTTP method used by the endpoint.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        HttpMethod::Post
    }

    /// Field table for the operation.
    #[must_use]
    pub fn spec(self) -> &'static RequestSpec {
        match self {
            Self::CreatePayment => &catalog::CREATE_PAYMENT,
            Self::Close => &catalog::CLOSE,
            Self::CloseQuery => &catalog::CLOSE_QUERY,
            Self::Micropay => &catalog::MICROPAY,
            Self::Query => &catalog::QUERY,
            Self::Refund => &catalog::REFUND,
            Self::RefundQuery => &catalog::REFUND_QUERY,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format check applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Fixed digit pattern.
    Pattern(Pattern),
    /// Maximum byte length.
    MaxLength(usize),
    /// Closed set of accepted values.
    OneOf(&'static [&'static str]),
    /// Decimal amount of at least 0.01.
    Amount,
}

/// Format rule: a check bound to a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Wire name of the field.
    pub field: &'static str,
    /// Check applied when the field is present.
    pub check: Check,
}

impl Rule {
    fn apply(&self, value: &str) -> ValidationResult {
        match self.check {
            Check::Pattern(pattern) => match_pattern(value, pattern, self.field),
            Check::MaxLength(limit) => max_length(value, limit, self.field),
            Check::OneOf(allowed) => one_of_enum(value, allowed, self.field),
            Check::Amount => amount_format(value, self.field),
        }
    }
}

/// Fields of which at least one must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalGroup {
    /// Alternatives, in payload order.
    pub fields: &'static [&'static str],
    /// Message reported when none is present.
    pub message: &'static str,
}

/// Declarative description of one operation's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    /// Required fields and their labels, in payload order.
    pub required: &'static [(&'static str, &'static str)],
    /// Conditional groups.
    pub conditional: &'static [ConditionalGroup],
    /// Optional fields accepted into the payload, in payload order.
    pub optional: &'static [&'static str],
    /// Format rules, applied in order to present fields.
    pub rules: &'static [Rule],
    /// Prepend `req_date`, defaulting to today's gateway date.
    pub default_request_date: bool,
}

/// Validates caller input against an operation's table.
///
/// # Errors
///
/// Returns the first [`ValidationError`](crate::error::ValidationError) found.
pub fn validate(spec: &RequestSpec, input: &Params) -> ValidationResult {
    require_fields(input, spec.required)?;

    for group in spec.conditional {
        require_one_of(input, group.fields, group.message)?;
    }

    for rule in spec.rules {
        if let Some(value) = text_value(input, rule.field) {
            rule.apply(&value)?;
        }
    }

    Ok(())
}

/// Builds the ordered payload from validated input.
///
/// `today` (`yyyyMMdd`) fills `req_date` for operations that default it.
#[must_use]
pub fn assemble(spec: &RequestSpec, input: &Params, today: &str) -> Params {
    let mut payload = Params::new();

    if spec.default_request_date {
        let date = input
            .get(REQUEST_DATE_FIELD)
            .filter(|_| validator::is_present(input, REQUEST_DATE_FIELD))
            .cloned()
            .unwrap_or_else(|| Value::String(today.to_owned()));
        payload.insert(REQUEST_DATE_FIELD.to_owned(), date);
    }

    for (field, _) in spec.required {
        copy_field(input, field, &mut payload);
    }

    for group in spec.conditional {
        for field in group.fields {
            copy_field(input, field, &mut payload);
        }
    }

    for field in spec.optional {
        copy_field(input, field, &mut payload);
    }

    payload
}

fn copy_field(input: &Params, field: &str, payload: &mut Params) {
    if validator::is_present(input, field)
        && let Some(value) = input.get(field)
    {
        payload.insert(field.to_owned(), value.clone());
    }
}

/// Today's date in the gateway's time zone (UTC+8), as `yyyyMMdd`.
#[must_use]
pub fn gateway_today() -> String {
    (Utc::now() + GATEWAY_UTC_OFFSET).format("%Y%m%d").to_string()
}

/// Wire envelope posted to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// System id from the credentials.
    pub sys_id: String,
    /// Product id from the credentials.
    pub product_id: String,
    /// Business payload.
    pub data: Params,
    /// Base64 RSA-SHA256 signature of the sorted payload.
    pub sign: String,
}

/// A fully validated and signed request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Operation this request performs.
    pub operation: Operation,
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute endpoint URL.
    pub url: String,
    /// Signed envelope.
    pub envelope: SignedEnvelope,
}

/// Validates, assembles and signs requests for any operation.
///
/// Holds no per-request state; one builder serves every call.
#[derive(Debug)]
pub struct RequestBuilder {
    credentials: Arc<Credentials>,
    signer: RsaSigner,
}

impl RequestBuilder {
    /// Creates a builder sharing the given credentials.
    #[must_use]
    pub fn new(credentials: Arc<Credentials>) -> Self {
        let signer = RsaSigner::new(Arc::clone(&credentials));
        Self { credentials, signer }
    }

    /// Credentials used for addressing and signing.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Signer bound to the credentials.
    #[must_use]
    pub const fn signer(&self) -> &RsaSigner {
        &self.signer
    }

    /// Validates and assembles the payload for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Validation`](crate::error::PayError::Validation) on the
    /// first failed check.
    pub fn build_payload(&self, operation: Operation, input: &Params) -> Result<Params> {
        let spec = operation.spec();
        validate(spec, input)?;
        Ok(assemble(spec, input, &gateway_today()))
    }

    /// Builds a signed request for `operation` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Validation`](crate::error::PayError::Validation) if the
    /// input is rejected and [`PayError::Crypto`](crate::error::PayError::Crypto) if
    /// signing fails.
    #[instrument(skip_all, fields(operation = %operation))]
    pub fn prepare(&self, operation: Operation, input: &Params) -> Result<PreparedRequest> {
        let data = self.build_payload(operation, input)?;
        self.seal(operation, data)
    }

    /// Signs an already assembled payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::Crypto`](crate::error::PayError::Crypto) if signing fails.
    pub fn seal(&self, operation: Operation, data: Params) -> Result<PreparedRequest> {
        let sign = self.signer.sign(&data)?;
        debug!(fields = data.len(), "payload signed");

        let envelope = SignedEnvelope {
            sys_id: self.credentials.sys_id().to_owned(),
            product_id: self.credentials.product_id().to_owned(),
            data,
            sign,
        };

        Ok(PreparedRequest {
            operation,
            method: operation.method(),
            url: self.credentials.endpoint(operation.path()),
            envelope,
        })
    }
}

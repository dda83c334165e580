//! Error types for the Dougong payment client.
//!
//! All fallible operations in this crate return [`Result`], whose error type
//! [`PayError`] groups failures by the stage that produced them.
//!
//! # Error Categories
//!
//! - **Configuration** ([`PayError::Config`]): missing or malformed credentials
//! - **Validation** ([`PayError::Validation`]): caller input rejected before any I/O
//! - **Cryptography** ([`PayError::Crypto`]): key parsing, signing, encryption failures
//! - **Transport** ([`PayError::Transport`], [`PayError::Http`]): network failures
//! - **Protocol** ([`PayError::Protocol`]): the gateway answered with something that is
//!   not a JSON object
//!
//! Business response codes (`resp_code`, `trans_stat`, ...) are never errors: they are
//! returned to the caller as part of the decoded response.
//!
//! # Examples
//!
//! ```
//! use dougong_pay::error::{PayError, ValidationError};
//!
//! let err = PayError::from(ValidationError::MissingField("商户号".to_owned()));
//! assert!(err.is_validation());
//! assert_eq!(err.to_string(), "validation failed: 商户号 参数必填");
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, PayError>;

/// Errors that can occur while preparing or executing a gateway request.
///
/// # Error Recovery
///
/// - **Validation errors**: correct the input and call again; never retried automatically
/// - **Configuration and cryptographic errors**: check credentials and key material;
///   retrying with the same keys will not help
/// - **Transport errors**: safe to retry at the caller's discretion with the same
///   `req_seq_id`
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PayError {
    /// Credentials are incomplete or malformed.
    ///
    /// Raised at construction time, before any request is built.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Caller input failed validation. No request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A cryptographic primitive failed.
    #[error("cryptographic operation failed: {0}")]
    Crypto(#[from] CryptoError),

    /// The transport could not deliver the request or read a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP client failure.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a successful status with a body that is not a JSON object.
    #[error("invalid gateway response: {0}")]
    Protocol(String),
}

impl PayError {
    /// Returns `true` if the error was raised by input validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if the error happened on the network path.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

/// Input validation failures.
///
/// Messages follow the gateway's own wording so they can be shown to operators
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent, `null` or empty. Carries the field label.
    #[error("{0} 参数必填")]
    MissingField(String),

    /// None of the alternatives of a conditional group was supplied.
    #[error("{0}")]
    MissingConditionalGroup(String),

    /// A field does not match its expected format.
    #[error("{field} 格式错误，应为{expected}")]
    FormatError {
        /// Wire name of the field.
        field: String,
        /// Human readable description of the expected format.
        expected: String,
    },

    /// A field exceeds its maximum byte length.
    #[error("{field} 最大长度为{limit}位")]
    LengthError {
        /// Wire name of the field.
        field: String,
        /// Maximum allowed length in bytes.
        limit: usize,
    },

    /// A field is not one of the allowed values.
    #[error("{field} 参数值无效，仅支持{}", .allowed.join("或"))]
    EnumError {
        /// Wire name of the field.
        field: String,
        /// Accepted values.
        allowed: Vec<String>,
    },

    /// An amount is not numeric or is below the minimum of 0.01.
    #[error("{0} 必须为数字且最低0.01元")]
    AmountError(String),
}

/// Cryptographic failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material could not be parsed.
    #[error("key error: {0}")]
    Key(String),

    /// The signing primitive failed.
    #[error("signing failed: {0}")]
    Sign(String),

    /// Encryption failed, including plaintext longer than the key allows.
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// Decryption failed: bad encoding, bad padding or non UTF-8 plaintext.
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let error = ValidationError::MissingField("请求流水号".to_owned());
        assert_eq!(error.to_string(), "请求流水号 参数必填");
    }

    #[test]
    fn test_enum_error_joins_allowed_values() {
        let error = ValidationError::EnumError {
            field: "delay_acct_flag".to_owned(),
            allowed: vec!["Y".to_owned(), "N".to_owned()],
        };
        assert_eq!(error.to_string(), "delay_acct_flag 参数值无效，仅支持Y或N");
    }

    #[test]
    fn test_length_error_display() {
        let error = ValidationError::LengthError { field: "auth_code".to_owned(), limit: 128 };
        assert_eq!(error.to_string(), "auth_code 最大长度为128位");
    }

    #[test]
    fn test_pay_error_wraps_validation() {
        let error: PayError = ValidationError::AmountError("trans_amt".to_owned()).into();
        assert!(error.is_validation());
        assert!(!error.is_transport());
        assert!(error.to_string().starts_with("validation failed"));
    }

    #[test]
    fn test_pay_error_wraps_crypto() {
        let error: PayError = CryptoError::Key("bad pem".to_owned()).into();
        assert!(matches!(error, PayError::Crypto(CryptoError::Key(_))));
        assert_eq!(error.to_string(), "cryptographic operation failed: key error: bad pem");
    }

    #[test]
    fn test_transport_error_classification() {
        let error = PayError::Transport("connection reset".to_owned());
        assert!(error.is_transport());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_config_error_display() {
        let error = PayError::Config("sys_id is required".to_owned());
        assert_eq!(error.to_string(), "invalid configuration: sys_id is required");
    }
}

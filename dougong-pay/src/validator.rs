//! Stateless input validation primitives.
//!
//! Every operation composes the same handful of checks in a different order, so they
//! live here once and produce identical error messages for every endpoint. Input is a
//! loosely typed JSON object ([`Params`]); a field counts as present when it is
//! neither `null` nor an empty string.

use std::{borrow::Cow, str::FromStr};

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Loosely typed caller input: field name to JSON value.
pub type Params = Map<String, Value>;

/// Result type for validation primitives.
pub type ValidationResult = std::result::Result<(), ValidationError>;

/// Smallest accepted amount, in yuan.
const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Fixed-shape value formats used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Merchant id: exactly 16 digits.
    MerchantId,
    /// Date: exactly 8 digits (`yyyyMMdd`).
    Date,
    /// Date and time: exactly 14 digits (`yyyyMMddHHmmss`).
    DateTime,
}

impl Pattern {
    /// Number of ASCII digits the value must consist of.
    #[must_use]
    pub const fn digits(self) -> usize {
        match self {
            Self::MerchantId => 16,
            Self::Date => 8,
            Self::DateTime => 14,
        }
    }

    /// Human readable description used in error messages.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MerchantId => "16位数字",
            Self::Date => "yyyyMMdd",
            Self::DateTime => "yyyyMMddHHmmss",
        }
    }

    /// Returns `true` if `value` matches this pattern.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        value.len() == self.digits() && value.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Returns the textual form of a present field, or `None` when it is absent,
/// `null` or an empty string.
///
/// Numbers and booleans are rendered as their JSON text; objects and arrays as
/// compact JSON.
#[must_use]
pub fn text_value<'a>(params: &'a Params, field: &str) -> Option<Cow<'a, str>> {
    match params.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Returns `true` if the field is present with a non-empty value.
#[must_use]
pub fn is_present(params: &Params, field: &str) -> bool {
    text_value(params, field).is_some()
}

/// Checks that every required field is present.
///
/// Fields are checked in declaration order and the first missing one is reported by
/// its label.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] carrying the label of the first missing
/// field.
///
/// # Examples
///
/// ```
/// use dougong_pay::validator::{Params, require_fields};
///
/// let params: Params = serde_json::from_str(r#"{"huifu_id": "6666000000000000"}"#).unwrap();
/// assert!(require_fields(&params, &[("huifu_id", "商户号")]).is_ok());
///
/// let err = require_fields(&params, &[("huifu_id", "商户号"), ("req_seq_id", "请求流水号")])
///     .unwrap_err();
/// assert_eq!(err.to_string(), "请求流水号 参数必填");
/// ```
pub fn require_fields(params: &Params, required: &[(&str, &str)]) -> ValidationResult {
    match required.iter().find(|(field, _)| !is_present(params, field)) {
        Some((_, label)) => Err(ValidationError::MissingField((*label).to_owned())),
        None => Ok(()),
    }
}

/// Checks that at least one field of a conditional group is present.
///
/// # Errors
///
/// Returns [`ValidationError::MissingConditionalGroup`] with `message` when none is.
pub fn require_one_of(params: &Params, fields: &[&str], message: &str) -> ValidationResult {
    if fields.iter().any(|field| is_present(params, field)) {
        Ok(())
    } else {
        Err(ValidationError::MissingConditionalGroup(message.to_owned()))
    }
}

/// Checks a value against a fixed [`Pattern`].
///
/// # Errors
///
/// Returns [`ValidationError::FormatError`] when the value does not match.
pub fn match_pattern(value: &str, pattern: Pattern, field: &str) -> ValidationResult {
    if pattern.matches(value) {
        Ok(())
    } else {
        Err(ValidationError::FormatError {
            field: field.to_owned(),
            expected: pattern.description().to_owned(),
        })
    }
}

/// Checks that a value's UTF-8 byte length does not exceed `limit`.
///
/// # Errors
///
/// Returns [`ValidationError::LengthError`] when it does.
pub fn max_length(value: &str, limit: usize, field: &str) -> ValidationResult {
    if value.len() > limit {
        Err(ValidationError::LengthError { field: field.to_owned(), limit })
    } else {
        Ok(())
    }
}

/// Checks that a value is one of `allowed`.
///
/// # Errors
///
/// Returns [`ValidationError::EnumError`] listing the accepted values.
pub fn one_of_enum(value: &str, allowed: &[&str], field: &str) -> ValidationResult {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::EnumError {
            field: field.to_owned(),
            allowed: allowed.iter().map(|v| (*v).to_owned()).collect(),
        })
    }
}

/// Checks that a value is a decimal amount of at least 0.01.
///
/// # Errors
///
/// Returns [`ValidationError::AmountError`] when the value is not numeric or is too
/// small. Values beyond 28 significant digits do not fit a [`Decimal`] and are
/// rejected as well.
///
/// # Examples
///
/// ```
/// use dougong_pay::validator::amount_format;
///
/// assert!(amount_format("0.01", "trans_amt").is_ok());
/// assert!(amount_format("0.009", "trans_amt").is_err());
/// assert!(amount_format("abc", "trans_amt").is_err());
/// ```
pub fn amount_format(value: &str, field: &str) -> ValidationResult {
    match Decimal::from_str(value.trim()) {
        Ok(amount) if amount >= MIN_AMOUNT => Ok(()),
        _ => Err(ValidationError::AmountError(field.to_owned())),
    }
}

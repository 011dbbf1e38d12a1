use crate::error::EmvError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Four-digit ISO 18245 merchant category code (e.g. `4829`), or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MerchantCategoryCode(String);

impl MerchantCategoryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, EmvError> {
        let value = value.into();
        if value.is_empty() || all_digits(&value, 4) {
            Ok(Self(value))
        } else {
            Err(EmvError::Validation(format!(
                "merchant category code must be 4 digits, got {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Three-digit ISO 4217 numeric currency code (e.g. `524` for NPR), or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(value: impl Into<String>) -> Result<Self, EmvError> {
        let value = value.into();
        if value.is_empty() || all_digits(&value, 3) {
            Ok(Self(value))
        } else {
            Err(EmvError::Validation(format!(
                "currency code must be a 3-digit ISO 4217 number, got {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ISO 3166-1 alpha-2 country code (e.g. `NP`), or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, EmvError> {
        let value = value.into();
        if value.is_empty() || (value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())) {
            Ok(Self(value))
        } else {
            Err(EmvError::Validation(format!(
                "country code must be 2 uppercase letters, got {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A flat, non-negative tip amount, or empty.
///
/// The text is kept exactly as supplied so that `"0"` encodes as `"0"`, not `"0.00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TipAmount(String);

impl TipAmount {
    pub fn new(value: impl Into<String>) -> Result<Self, EmvError> {
        let value = value.into();
        if value.is_empty() {
            return Ok(Self(value));
        }

        // Digits and a decimal point only: no sign, exponent or grouping.
        let well_formed = value.bytes().all(|b| b.is_ascii_digit() || b == b'.')
            && Decimal::from_str(&value).is_ok();
        if well_formed {
            Ok(Self(value))
        } else {
            Err(EmvError::Validation(format!(
                "tip amount must be a non-negative decimal, got {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_conversions {
    ($($ty:ty => |$v:ident| $inner:expr),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = EmvError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$ty> for String {
                fn from($v: $ty) -> Self {
                    $inner
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

string_newtype_conversions! {
    MerchantCategoryCode => |v| v.0,
    CurrencyCode => |v| v.0,
    CountryCode => |v| v.0,
    TipAmount => |v| v.0,
}

/// The merchant and transaction data encoded into one QR payload.
///
/// Any field may be empty; an empty value encodes as a zero-length field.
/// Non-empty coded fields are validated when the record is built or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantRecord {
    pub merchant_guid: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_category_code: MerchantCategoryCode,
    pub transaction_currency: CurrencyCode,
    pub country_code: CountryCode,
    pub tip_amount: TipAmount,
    #[serde(default)]
    pub bill_reference: String,
    #[serde(default)]
    pub terminal_id: String,
    #[serde(default)]
    pub additional_info: String,
}

impl MerchantRecord {
    /// File stem used when exporting this record's QR image.
    ///
    /// Whitespace runs become `-`; anything other than alphanumerics, `-`, `_`
    /// and `.` becomes `_`, so the stem never contains a path separator.
    pub fn export_stem(&self) -> String {
        let name: String = self
            .merchant_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("emv-qr-{name}")
    }
}

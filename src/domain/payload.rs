use super::crc::compute_checksum;
use super::merchant::MerchantRecord;
use super::tlv::{Tag, TlvField, decode_fields, encode_composite, encode_field};
use crate::error::{EmvError, Result};
use serde::Serialize;

pub const PAYLOAD_FORMAT_INDICATOR: Tag = Tag::from_static(0);
pub const POINT_OF_INITIATION: Tag = Tag::from_static(1);
pub const MERCHANT_ACCOUNT_INFO: Tag = Tag::from_static(29);
pub const MERCHANT_CATEGORY_CODE: Tag = Tag::from_static(52);
pub const TRANSACTION_CURRENCY: Tag = Tag::from_static(53);
pub const TIP_FIXED: Tag = Tag::from_static(54);
pub const COUNTRY_CODE: Tag = Tag::from_static(58);
pub const MERCHANT_NAME: Tag = Tag::from_static(59);
pub const MERCHANT_CITY: Tag = Tag::from_static(60);
pub const ADDITIONAL_DATA: Tag = Tag::from_static(62);
pub const CRC: Tag = Tag::from_static(63);

/// Nested tag of the merchant identifier inside [`MERCHANT_ACCOUNT_INFO`].
pub const MERCHANT_GUID: Tag = Tag::from_static(0);
/// Additional data template subtags.
pub const BILL_NUMBER: Tag = Tag::from_static(1);
pub const TERMINAL_LABEL: Tag = Tag::from_static(7);
pub const PURPOSE_OF_TRANSACTION: Tag = Tag::from_static(8);

const PAYLOAD_FORMAT_VERSION: &str = "01";
const STATIC_INITIATION: &str = "11";
const CRC_HEADER: &str = "6304";

/// How the additional data container (tag `62`) is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdditionalData {
    /// Subtags `01`..`09`, each holding its own two-digit number.
    #[default]
    Placeholder,
    /// Bill reference, terminal id and note mapped to subtags `01`, `07` and `08`.
    /// Empty values are left out, and so is tag `62` when nothing remains.
    FromRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblerOptions {
    pub additional_data: AdditionalData,
}

/// Builds the unchecksummed payload for `record` in scheme order.
pub fn assemble_payload(record: &MerchantRecord, options: &AssemblerOptions) -> Result<String> {
    let merchant_account = encode_composite(
        MERCHANT_ACCOUNT_INFO,
        &[encode_field(MERCHANT_GUID, &record.merchant_guid)?],
    )?;

    let fields = [
        encode_field(PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_VERSION)?,
        encode_field(POINT_OF_INITIATION, STATIC_INITIATION)?,
        merchant_account,
        encode_field(MERCHANT_CATEGORY_CODE, record.merchant_category_code.as_str())?,
        encode_field(TRANSACTION_CURRENCY, record.transaction_currency.as_str())?,
        encode_field(TIP_FIXED, record.tip_amount.as_str())?,
        encode_field(COUNTRY_CODE, record.country_code.as_str())?,
        encode_field(MERCHANT_NAME, &record.merchant_name)?,
        encode_field(MERCHANT_CITY, &record.merchant_city)?,
        additional_data(record, options.additional_data)?,
    ];

    Ok(fields.concat())
}

fn additional_data(record: &MerchantRecord, mode: AdditionalData) -> Result<String> {
    match mode {
        AdditionalData::Placeholder => {
            let subfields = (1..=9)
                .map(|id| {
                    let tag = Tag::new(id)?;
                    encode_field(tag, &tag.to_string())
                })
                .collect::<Result<Vec<_>>>()?;
            encode_composite(ADDITIONAL_DATA, &subfields)
        }
        AdditionalData::FromRecord => {
            let subfields = [
                (BILL_NUMBER, &record.bill_reference),
                (TERMINAL_LABEL, &record.terminal_id),
                (PURPOSE_OF_TRANSACTION, &record.additional_info),
            ]
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(tag, value)| encode_field(tag, value))
            .collect::<Result<Vec<_>>>()?;

            if subfields.is_empty() {
                Ok(String::new())
            } else {
                encode_composite(ADDITIONAL_DATA, &subfields)
            }
        }
    }
}

/// Appends the `6304` checksum field computed over `payload + "6304"`.
pub fn finalize(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len() + 8);
    out.push_str(payload);
    out.push_str(CRC_HEADER);
    out.push_str(&compute_checksum(&out));
    out
}

/// Assembles and checksums `record` in one step.
pub fn encode_payload(record: &MerchantRecord, options: &AssemblerOptions) -> Result<String> {
    let payload = assemble_payload(record, options)?;
    Ok(finalize(&payload))
}

/// A payload whose checksum has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPayload {
    pub fields: Vec<DecodedField>,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub tag: String,
    pub value: String,
}

impl From<TlvField> for DecodedField {
    fn from(field: TlvField) -> Self {
        Self {
            tag: field.tag.to_string(),
            value: field.value,
        }
    }
}

impl DecodedPayload {
    /// Value of the first top-level field with `tag`.
    pub fn field(&self, tag: Tag) -> Option<&str> {
        let tag = tag.to_string();
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }

    /// Merchant identifier nested under tag `29`.
    pub fn merchant_guid(&self) -> Result<Option<String>> {
        let Some(account) = self.field(MERCHANT_ACCOUNT_INFO) else {
            return Ok(None);
        };
        Ok(decode_fields(account)?
            .into_iter()
            .find(|f| f.tag == MERCHANT_GUID)
            .map(|f| f.value))
    }
}

/// Verifies the trailing checksum of `payload` and splits it into top-level fields.
pub fn decode_payload(payload: &str) -> Result<DecodedPayload> {
    let mut fields = decode_fields(payload)?;

    let crc = match fields.pop() {
        Some(field) if field.tag == CRC && field.value.len() == 4 => field.value,
        _ => {
            return Err(EmvError::Malformed(
                "payload must end with a 4-character checksum field (tag 63)".to_string(),
            ));
        }
    };

    // The checksum value is a suffix of the input, so this slice is on a char boundary.
    let covered = &payload[..payload.len() - crc.len()];
    let expected = compute_checksum(covered);
    if !expected.eq_ignore_ascii_case(&crc) {
        return Err(EmvError::ChecksumMismatch {
            expected,
            found: crc,
        });
    }

    Ok(DecodedPayload {
        fields: fields.into_iter().map(DecodedField::from).collect(),
        checksum: crc,
    })
}

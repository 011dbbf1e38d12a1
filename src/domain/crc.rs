//! CRC-16/CCITT-FALSE as used by EMV merchant-presented QR codes.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Runs CRC-16/CCITT-FALSE (no reflection, no final XOR) over `bytes`.
pub fn crc16_ccitt_false<I>(bytes: I) -> u16
where
    I: IntoIterator<Item = u8>,
{
    bytes.into_iter().fold(INITIAL, |mut crc, byte| {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Returns the checksum of `data` as four uppercase hex digits.
///
/// Each UTF-16 code unit contributes its low byte; payloads are expected to be ASCII.
pub fn compute_checksum(data: &str) -> String {
    let crc = crc16_ccitt_false(data.encode_utf16().map(|unit| unit as u8));
    format!("{crc:04X}")
}

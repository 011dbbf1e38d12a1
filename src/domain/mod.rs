//! Domain layer: the TLV codec, the checksum, the merchant record and the
//! renderer port. Everything here except the port is pure and synchronous.

pub mod crc;
pub mod merchant;
pub mod payload;
pub mod ports;
pub mod tlv;

//! Encodes merchant payment data into EMV merchant-presented QR payloads
//! and renders them as QR images.
//!
//! The payload pipeline lives in [`domain`] and is pure: record → TLV fields
//! → CRC-16/CCITT-FALSE → payload string. Rendering sits behind the
//! [`domain::ports::QrRenderer`] port, implemented in [`infrastructure`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

//! QR renderers backed by `qrcodegen`.

pub mod svg;
mod symbol;
pub mod terminal;

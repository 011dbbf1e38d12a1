use crate::error::RenderError;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// QR symbol error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

/// An opaque `#RRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(0xFF, 0xFF, 0xFF);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Rendering parameters handed to a [`QrRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Requested image width in pixels.
    pub target_width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin_modules: u32,
    pub foreground: Rgb,
    pub background: Rgb,
    pub ec_level: EcLevel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_width: 400,
            margin_modules: 2,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            ec_level: EcLevel::M,
        }
    }
}

/// Output of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// MIME type of `data`, e.g. `image/svg+xml`.
    pub media_type: &'static str,
    pub data: String,
}

/// Turns an arbitrary string into a QR image.
#[async_trait]
pub trait QrRenderer: Send + Sync {
    async fn render(&self, text: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError>;
}

pub type QrRendererBox = Box<dyn QrRenderer>;

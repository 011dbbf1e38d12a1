use super::symbol::{encode_symbol, render_blocking};
use crate::domain::ports::{QrRenderer, RenderOptions, RenderedImage};
use crate::error::RenderError;
use async_trait::async_trait;
use std::fmt::Write;

/// Renders payloads as standalone SVG documents.
///
/// The view box is measured in modules and the document is sized to
/// `target_width`, so the image scales without resampling.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_sync(text: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let qr = encode_symbol(text, options.ec_level)?;
        let margin = i32::try_from(options.margin_modules)
            .map_err(|_| RenderError::Backend("margin too large".to_string()))?;
        let dimension = qr.size() + margin * 2;

        let mut path = String::new();
        for y in 0..qr.size() {
            for x in 0..qr.size() {
                if qr.get_module(x, y) {
                    let _ = write!(path, "M{},{}h1v1h-1z", x + margin, y + margin);
                }
            }
        }

        let mut svg = String::new();
        let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{w}" viewBox="0 0 {dimension} {dimension}" shape-rendering="crispEdges">"#,
            w = options.target_width,
        );
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            options.background
        );
        let _ = writeln!(svg, r#"<path d="{path}" fill="{}"/>"#, options.foreground);
        svg.push_str("</svg>\n");

        Ok(RenderedImage {
            media_type: "image/svg+xml",
            data: svg,
        })
    }
}

#[async_trait]
impl QrRenderer for SvgRenderer {
    async fn render(&self, text: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let text = text.to_string();
        let options = options.clone();
        render_blocking(move || Self::render_sync(&text, &options)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Rgb;

    #[tokio::test]
    async fn test_svg_uses_requested_geometry_and_colors() {
        let options = RenderOptions {
            target_width: 256,
            margin_modules: 4,
            foreground: Rgb(0x11, 0x22, 0x33),
            background: Rgb::WHITE,
            ..Default::default()
        };
        let image = SvgRenderer::new().render("000201", &options).await.unwrap();

        assert_eq!(image.media_type, "image/svg+xml");
        // Version 1 symbol: 21 modules plus 4 on each side.
        assert!(image.data.contains(r#"viewBox="0 0 29 29""#));
        assert!(image.data.contains(r#"width="256" height="256""#));
        assert!(image.data.contains(r##"fill="#112233""##));
        assert!(image.data.contains(r##"fill="#FFFFFF""##));
        // Top-left finder pattern starts at the margin.
        assert!(image.data.contains("M4,4h1v1h-1z"));
    }

    #[tokio::test]
    async fn test_svg_render_failure_is_a_render_error() {
        let text = "A".repeat(8000);
        let result = SvgRenderer::new().render(&text, &RenderOptions::default()).await;
        assert_eq!(result.unwrap_err(), RenderError::DataTooLong);
    }
}

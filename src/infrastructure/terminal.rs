use super::symbol::{encode_symbol, render_blocking};
use crate::domain::ports::{QrRenderer, RenderOptions, RenderedImage};
use crate::error::RenderError;
use async_trait::async_trait;

/// Renders payloads as Unicode half-block text, two module rows per line.
///
/// Pixel width and colors do not apply to text output and are ignored.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    /// Draw light modules instead of dark ones, for dark terminal backgrounds.
    pub inverted: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self { inverted: true }
    }
}

impl TerminalRenderer {
    pub fn new(inverted: bool) -> Self {
        Self { inverted }
    }

    fn render_sync(&self, text: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let qr = encode_symbol(text, options.ec_level)?;
        let margin = i32::try_from(options.margin_modules)
            .map_err(|_| RenderError::Backend("margin too large".to_string()))?;
        let lo = -margin;
        let hi = qr.size() + margin;

        // get_module is false outside the symbol, which paints the quiet zone light.
        let ink = |x: i32, y: i32| y < hi && qr.get_module(x, y) != self.inverted;

        let mut out = String::new();
        for y in (lo..hi).step_by(2) {
            for x in lo..hi {
                out.push(match (ink(x, y), ink(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }

        Ok(RenderedImage {
            media_type: "text/plain; charset=utf-8",
            data: out,
        })
    }
}

#[async_trait]
impl QrRenderer for TerminalRenderer {
    async fn render(&self, text: &str, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
        let renderer = *self;
        let text = text.to_string();
        let options = options.clone();
        render_blocking(move || renderer.render_sync(&text, &options)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_terminal_dimensions() {
        let options = RenderOptions {
            margin_modules: 1,
            ..Default::default()
        };
        let image = TerminalRenderer::new(false)
            .render("000201", &options)
            .await
            .unwrap();

        // 21 modules + 2 margin = 23 columns, 12 lines of two rows each.
        let lines: Vec<&str> = image.data.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|l| l.chars().count() == 23));
        // Quiet zone row above the finder pattern, then the finder's top edge.
        assert!(lines[0].starts_with(" ▄▄▄▄▄▄▄"));
    }

    #[tokio::test]
    async fn test_inverted_swaps_ink() {
        let options = RenderOptions {
            margin_modules: 0,
            ..Default::default()
        };
        let plain = TerminalRenderer::new(false).render("000201", &options).await.unwrap();
        let inverted = TerminalRenderer::new(true).render("000201", &options).await.unwrap();

        assert!(plain.data.starts_with('█'));
        assert!(inverted.data.starts_with(' '));
    }
}

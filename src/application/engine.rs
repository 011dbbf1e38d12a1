use crate::domain::merchant::MerchantRecord;
use crate::domain::payload::{AssemblerOptions, encode_payload};
use crate::domain::ports::{QrRendererBox, RenderOptions, RenderedImage};
use crate::error::{RenderError, Result};
use tracing::{debug, warn};

/// Result of running one record through the pipeline.
///
/// The payload is always valid here; the image may still have failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub payload: String,
    pub image: std::result::Result<RenderedImage, RenderError>,
}

/// Encodes merchant records and renders the resulting payloads.
pub struct QrEngine {
    renderer: QrRendererBox,
    assembler: AssemblerOptions,
    render: RenderOptions,
}

impl QrEngine {
    /// Creates a new `QrEngine`.
    ///
    /// # Arguments
    ///
    /// * `renderer` - The QR symbol renderer.
    /// * `assembler` - Payload layout options.
    /// * `render` - Image options passed to the renderer on every call.
    pub fn new(renderer: QrRendererBox, assembler: AssemblerOptions, render: RenderOptions) -> Self {
        Self {
            renderer,
            assembler,
            render,
        }
    }

    /// Encodes `record` into a checksummed payload. No rendering happens.
    pub fn encode(&self, record: &MerchantRecord) -> Result<String> {
        let payload = encode_payload(record, &self.assembler)?;
        debug!(merchant = %record.merchant_name, %payload, "payload encoded");
        Ok(payload)
    }

    /// Renders an already encoded payload.
    pub async fn render(&self, payload: &str) -> std::result::Result<RenderedImage, RenderError> {
        let image = self.renderer.render(payload, &self.render).await;
        if let Err(e) = &image {
            warn!(error = %e, "QR rendering failed");
        }
        image
    }

    /// Encodes and renders `record`.
    ///
    /// Encoding errors abort before the renderer is called. Rendering errors
    /// are returned inside [`Generated`] alongside the valid payload.
    pub async fn generate(&self, record: &MerchantRecord) -> Result<Generated> {
        let payload = self.encode(record)?;
        let image = self.render(&payload).await;
        Ok(Generated { payload, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merchant::{CountryCode, CurrencyCode, MerchantCategoryCode, TipAmount};
    use crate::domain::ports::QrRenderer;
    use crate::error::EmvError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl QrRenderer for CountingRenderer {
        async fn render(
            &self,
            text: &str,
            options: &RenderOptions,
        ) -> std::result::Result<RenderedImage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(options.ec_level, crate::domain::ports::EcLevel::M);
            if self.fail {
                return Err(RenderError::Backend("offline".to_string()));
            }
            Ok(RenderedImage {
                media_type: "text/plain",
                data: text.to_string(),
            })
        }
    }

    fn record(name: &str) -> MerchantRecord {
        MerchantRecord {
            merchant_guid: "GUID-1".to_string(),
            merchant_name: name.to_string(),
            merchant_city: "KATHMANDU".to_string(),
            merchant_category_code: MerchantCategoryCode::new("4829").unwrap(),
            transaction_currency: CurrencyCode::new("524").unwrap(),
            country_code: CountryCode::new("NP").unwrap(),
            tip_amount: TipAmount::new("0").unwrap(),
            bill_reference: String::new(),
            terminal_id: String::new(),
            additional_info: String::new(),
        }
    }

    fn engine(fail: bool) -> (QrEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let renderer = Box::new(CountingRenderer {
            calls: calls.clone(),
            fail,
        });
        let engine = QrEngine::new(renderer, AssemblerOptions::default(), RenderOptions::default());
        (engine, calls)
    }

    #[tokio::test]
    async fn test_generate_renders_payload() {
        let (engine, calls) = engine(false);
        let generated = engine.generate(&record("Shop")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(generated.image.unwrap().data, generated.payload);
    }

    #[tokio::test]
    async fn test_encoding_error_skips_renderer() {
        let (engine, calls) = engine(false);
        let result = engine.generate(&record(&"x".repeat(100))).await;

        assert!(matches!(result, Err(EmvError::ValueTooLong { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_error_keeps_payload() {
        let (engine, _) = engine(true);
        let generated = engine.generate(&record("Shop")).await.unwrap();

        assert!(generated.payload.starts_with("000201"));
        assert_eq!(
            generated.image,
            Err(RenderError::Backend("offline".to_string()))
        );
    }
}

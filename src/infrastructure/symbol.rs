use crate::domain::ports::EcLevel;
use crate::error::RenderError;
use qrcodegen::{QrCode, QrCodeEcc, QrSegment, Version};

impl From<EcLevel> for QrCodeEcc {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => QrCodeEcc::Low,
            EcLevel::M => QrCodeEcc::Medium,
            EcLevel::Q => QrCodeEcc::Quartile,
            EcLevel::H => QrCodeEcc::High,
        }
    }
}

/// Encodes `text` at exactly `level`, without boosting to a higher level.
pub(crate) fn encode_symbol(text: &str, level: EcLevel) -> Result<QrCode, RenderError> {
    let segments = QrSegment::make_segments(text);
    QrCode::encode_segments_advanced(
        &segments,
        level.into(),
        Version::MIN,
        Version::MAX,
        None,
        false,
    )
    .map_err(|_| RenderError::DataTooLong)
}

/// Runs a CPU-bound render on the blocking pool.
pub(crate) async fn render_blocking<F, T>(job: F) -> Result<T, RenderError>
where
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| RenderError::Backend(format!("render task failed: {e}")))?
}

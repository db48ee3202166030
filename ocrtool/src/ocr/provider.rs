use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{OcrToolError, Result};
use crate::models::OcrResult;
use crate::resolver::LocalImage;

use super::language::tesseract_languages;
use super::preprocessing::{decode_image, prepare_image};
use super::tsv::lines_from_tsv;

/// Image-to-text engine with per-line bounding boxes.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(
        &self,
        image: &LocalImage,
        languages: &[String],
        enhanced: bool,
    ) -> Result<OcrResult>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Loaded engine and the language string it was initialised with.
struct LoadedEngine {
    languages: String,
    tesseract: LepTess,
}

enum OcrBackend {
    Local {
        engine: Arc<Mutex<Option<LoadedEngine>>>,
    },
    Unavailable {
        reason: String,
    },
}

/// Tesseract-backed recognizer.
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(data_path: Option<&str>, languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(data_path, languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    /// Probe Tesseract with the default languages. A failed probe leaves the
    /// provider unavailable rather than failing startup.
    pub fn new(config: &OcrConfig) -> Self {
        let languages = tesseract_languages(&config.default_languages);

        let backend = match create_tesseract(config.tessdata_dir.as_deref(), &languages) {
            Ok(tesseract) => {
                info!(languages = %languages, "Tesseract OCR initialized");
                OcrBackend::Local {
                    engine: Arc::new(Mutex::new(Some(LoadedEngine {
                        languages,
                        tesseract,
                    }))),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    async fn recognize_internal(
        &self,
        image: &LocalImage,
        languages: &[String],
        enhanced: bool,
    ) -> Result<OcrResult> {
        let engine = match &self.backend {
            OcrBackend::Local { engine } => Arc::clone(engine),
            OcrBackend::Unavailable { reason } => {
                return Err(OcrToolError::OcrUnavailable(reason.clone()))
            }
        };

        let bytes = tokio::fs::read(image.path()).await?;
        let config = self.config.clone();
        let languages = tesseract_languages(languages);

        // Waiting for the engine happens here, under the caller's timeout. A
        // blocking call abandoned by an earlier timeout still owns the guard
        // until Tesseract returns, and nothing queues up behind it.
        let mut guard = engine.lock_owned().await;

        let lines = tokio::task::spawn_blocking(move || {
            let decoded = decode_image(&bytes)?;
            let prepared = prepare_image(decoded, &config, enhanced)?;

            let reload = guard
                .as_ref()
                .map_or(true, |loaded| loaded.languages != languages);
            if reload {
                debug!(languages = %languages, "Loading Tesseract languages");
                *guard = None;
                let tesseract = create_tesseract(config.tessdata_dir.as_deref(), &languages)
                    .map_err(|e| OcrToolError::Ocr(format!("Failed to load '{languages}': {e}")))?;
                *guard = Some(LoadedEngine {
                    languages: languages.clone(),
                    tesseract,
                });
            }

            let loaded = guard
                .as_mut()
                .ok_or_else(|| OcrToolError::Ocr("Tesseract engine not loaded".to_string()))?;
            loaded
                .tesseract
                .set_image_from_mem(&prepared.png)
                .map_err(|e| OcrToolError::Ocr(format!("Failed to set image: {e}")))?;
            let tsv = loaded
                .tesseract
                .get_tsv_text(0)
                .map_err(|e| OcrToolError::Ocr(format!("Failed to extract text: {e}")))?;

            Ok::<_, OcrToolError>(lines_from_tsv(&tsv, prepared.scale))
        })
        .await
        .map_err(|e| OcrToolError::Ocr(format!("OCR task panicked: {e}")))??;

        Ok(OcrResult::new(lines))
    }
}

#[async_trait]
impl Recognizer for OcrProvider {
    async fn recognize(
        &self,
        image: &LocalImage,
        languages: &[String],
        enhanced: bool,
    ) -> Result<OcrResult> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(
            timeout_duration,
            self.recognize_internal(image, languages, enhanced),
        )
        .await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => {
                warn!(
                    timeout_secs = self.config.timeout_secs,
                    "OCR timed out; the engine stays busy until the running Tesseract call returns"
                );
                Err(OcrToolError::Ocr(format!(
                    "OCR operation timed out after {} seconds",
                    self.config.timeout_secs
                )))
            }
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSource;
    use crate::resolver::ImageResolver;

    fn unavailable_provider() -> OcrProvider {
        OcrProvider {
            backend: OcrBackend::Unavailable {
                reason: "Test unavailable".to_string(),
            },
            config: OcrConfig::default(),
        }
    }

    async fn temp_image() -> LocalImage {
        let payload = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"x");
        ImageResolver::new(&Default::default())
            .unwrap()
            .resolve(&ImageSource::Base64(payload))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_busy_engine_times_out_without_queueing() {
        let engine = Arc::new(Mutex::new(None));
        let provider = OcrProvider {
            backend: OcrBackend::Local {
                engine: Arc::clone(&engine),
            },
            config: OcrConfig {
                timeout_secs: 1,
                ..OcrConfig::default()
            },
        };

        let held = engine.lock().await;
        let image = temp_image().await;
        let err = provider
            .recognize(&image, &["en".to_string()], true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        drop(held);

        assert!(engine.try_lock().is_ok(), "no abandoned call should hold the engine");
    }

    #[test]
    fn test_ocr_provider_graceful_degradation() {
        let config = OcrConfig {
            tessdata_dir: Some("/nonexistent/tessdata".to_string()),
            ..OcrConfig::default()
        };
        let provider = OcrProvider::new(&config);
        assert!(!provider.is_available());
    }

    #[tokio::test]
    async fn test_ocr_unavailable_returns_error() {
        let image = temp_image().await;

        let result = unavailable_provider()
            .recognize(&image, &["en".to_string()], true)
            .await;
        assert!(matches!(result, Err(OcrToolError::OcrUnavailable(_))));
    }
}

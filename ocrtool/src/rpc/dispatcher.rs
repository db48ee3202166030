use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::formatter::{render, Rendered};
use crate::models::{OcrRequest, OcrResult};
use crate::ocr::Recognizer;
use crate::resolver::ImageResolver;

use super::envelope::{error_response, success_response, DynamicValue, RequestEnvelope, RpcError};
use super::schema::{initialize_result, methods_list_result, OCR_TEXT_METHOD};

/// What the server writes for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Compact single-line JSON.
    Reply(Value),
    /// Pretty-printed JSON (the `full` OCR envelope).
    Pretty(Value),
    /// Informal text output (text, table, auto, comment mode).
    Text(String),
    /// Write the reply, then stop serving.
    Shutdown(Value),
}

pub struct Dispatcher {
    config: Config,
    resolver: ImageResolver,
    recognizer: Arc<dyn Recognizer>,
}

impl Dispatcher {
    pub fn new(config: Config, resolver: ImageResolver, recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            config,
            resolver,
            recognizer,
        }
    }

    /// Handle one raw input line. Lines that do not start with `{` produce
    /// no output at all.
    pub async fn dispatch_line(&self, line: &str) -> Option<Outcome> {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            if !trimmed.is_empty() {
                debug!(line = %trimmed, "Skipping non-JSON input line");
            }
            return None;
        }

        match serde_json::from_str::<RequestEnvelope>(trimmed) {
            Ok(envelope) => Some(self.dispatch(envelope).await),
            Err(e) => {
                warn!(error = %e, "Failed to decode request");
                let error = RpcError::invalid_request(e.to_string());
                Some(Outcome::Reply(error_response(&DynamicValue::Null, &error)))
            }
        }
    }

    pub async fn dispatch(&self, envelope: RequestEnvelope) -> Outcome {
        let id = &envelope.id;
        debug!(method = %envelope.method, id = %id, "Dispatching request");

        match envelope.method.as_str() {
            "initialize" => {
                Outcome::Reply(success_response(id, initialize_result(&self.config.server)))
            }
            "methods/list" => Outcome::Reply(success_response(id, methods_list_result())),
            OCR_TEXT_METHOD => self.ocr_text(id, &envelope.params).await,
            "shutdown" => {
                info!("Shutdown requested");
                Outcome::Shutdown(success_response(id, Value::Null))
            }
            other => {
                warn!(method = %other, "Method not found");
                Outcome::Reply(error_response(id, &RpcError::method_not_found(other)))
            }
        }
    }

    async fn ocr_text(
        &self,
        id: &DynamicValue,
        params: &std::collections::BTreeMap<String, DynamicValue>,
    ) -> Outcome {
        let request = match OcrRequest::from_params(params, &self.config.ocr.default_languages) {
            Ok(request) => request,
            Err(error) => {
                warn!(id = %id, error = %error, "Rejected ocr_text params");
                return Outcome::Reply(error_response(id, &error));
            }
        };

        let result = self.run_pipeline(&request).await;

        match render(
            &result,
            request.effective_format(),
            request.comment_language.as_deref(),
        ) {
            Rendered::Text(text) => Outcome::Text(text),
            Rendered::Structured => {
                let response = success_response(id, json!({ "lines": result.lines }));
                if self.config.server.pretty_json {
                    Outcome::Pretty(response)
                } else {
                    Outcome::Reply(response)
                }
            }
        }
    }

    /// Resolve then recognize. Every failure along the way is logged and
    /// yields an empty result.
    pub async fn run_pipeline(&self, request: &OcrRequest) -> OcrResult {
        let source = request.source.kind();

        let image = match self.resolver.resolve(&request.source).await {
            Ok(image) => image,
            Err(e) => {
                warn!(source, error = %e, "Could not resolve image");
                return OcrResult::empty();
            }
        };

        match self
            .recognizer
            .recognize(&image, &request.language_hints, request.enhanced)
            .await
        {
            Ok(result) => {
                info!(
                    path = %image.path().display(),
                    lines = result.len(),
                    "Recognition finished"
                );
                result
            }
            Err(e) => {
                warn!(path = %image.path().display(), error = %e, "Recognition failed");
                OcrResult::empty()
            }
        }
    }
}

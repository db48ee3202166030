use std::collections::BTreeMap;

use crate::config::split_language_tags;
use crate::models::{ImageSource, OcrRequest, OutputFormat, OUTPUT_FORMAT_NAMES};

use super::envelope::{DynamicValue, RpcError};

pub const DEFAULT_COMMENT_LANGUAGE: &str = "python";

type Params = BTreeMap<String, DynamicValue>;

fn non_empty_str<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(DynamicValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Look up `output.<key>` as a nested object member, falling back to a
/// literal dotted key.
fn output_field<'a>(params: &'a Params, key: &str) -> Option<&'a DynamicValue> {
    params
        .get("output")
        .and_then(|output| output.get(key))
        .or_else(|| params.get(&format!("output.{key}")))
}

fn image_source(params: &Params) -> Option<ImageSource> {
    if let Some(url) = non_empty_str(params, "url") {
        return Some(ImageSource::Url(url.to_string()));
    }
    if let Some(payload) = non_empty_str(params, "base64") {
        return Some(ImageSource::Base64(payload.to_string()));
    }
    non_empty_str(params, "image")
        .or_else(|| non_empty_str(params, "image_path"))
        .map(|path| ImageSource::Path(path.to_string()))
}

fn output_format(params: &Params) -> Result<Option<OutputFormat>, RpcError> {
    let Some(value) = params.get("format").filter(|value| !value.is_null()) else {
        return Ok(None);
    };

    value
        .as_str()
        .and_then(|name| name.parse().ok())
        .map(Some)
        .ok_or_else(|| {
            RpcError::invalid_params("Invalid format")
                .with_hint(format!("Allowed values: {}", OUTPUT_FORMAT_NAMES.join(", ")))
                .with_details(format!("Received format '{value}'"))
        })
}

impl OcrRequest {
    /// Validate raw `ocr_text` params. Unknown keys are ignored.
    pub fn from_params(params: &Params, default_languages: &[String]) -> Result<Self, RpcError> {
        let source = image_source(params).ok_or_else(|| {
            RpcError::invalid_params("Missing image source").with_hint(
                "Provide 'image' (or its alias 'image_path') with a file path, \
                 'url' with a remote image, or 'base64' with inline image data",
            )
        })?;

        let output_format = output_format(params)?;

        let language_hints = params
            .get("lang")
            .and_then(DynamicValue::as_str)
            .map(split_language_tags)
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| default_languages.to_vec());

        let enhanced = params
            .get("enhanced")
            .and_then(DynamicValue::as_bool)
            .unwrap_or(true);

        let comment_mode = output_field(params, "insertAsComment")
            .and_then(DynamicValue::as_bool)
            .unwrap_or(false);
        let comment_language = comment_mode.then(|| {
            output_field(params, "language")
                .and_then(DynamicValue::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_COMMENT_LANGUAGE)
                .to_string()
        });

        Ok(Self {
            source,
            language_hints,
            enhanced,
            output_format,
            comment_language,
        })
    }
}

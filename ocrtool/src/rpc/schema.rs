use serde_json::{json, Value};

use crate::config::ServerConfig;

pub const OCR_TEXT_METHOD: &str = "ocr_text";

/// `(name, type, description)` for every `ocr_text` parameter. None are
/// required individually; a request needs at least one image source.
const OCR_TEXT_PARAMS: &[(&str, &str, &str)] = &[
    ("image", "string", "Path to a local image file. '~' and relative paths are resolved."),
    ("image_path", "string", "Alias for 'image'."),
    ("url", "string", "HTTP(S) URL of an image to download. Takes priority over other sources."),
    ("base64", "string", "Inline base64 image data, optionally as a data: URL."),
    ("lang", "string", "Language hints joined with '+', e.g. 'zh-Hans+en-US'."),
    ("enhanced", "boolean", "Preprocess the image before recognition. Defaults to true."),
    (
        "format",
        "string",
        "Output format: text, simple, table, markdown, auto, full or structured. Defaults to full.",
    ),
    (
        "output.insertAsComment",
        "boolean",
        "Render recognized lines as source code comments. Overrides 'format'.",
    ),
    (
        "output.language",
        "string",
        "Programming language whose comment syntax is used. Defaults to python.",
    ),
];

pub fn ocr_text_descriptor() -> Value {
    let params: Vec<Value> = OCR_TEXT_PARAMS
        .iter()
        .map(|(name, kind, description)| {
            json!({
                "name": name,
                "type": kind,
                "description": description,
                "required": false,
            })
        })
        .collect();

    json!({
        "name": OCR_TEXT_METHOD,
        "description": "Recognize text in an image and return each line with its bounding box.",
        "params": params,
    })
}

pub fn initialize_result(server: &ServerConfig) -> Value {
    json!({
        "protocolVersion": server.protocol_version,
        "serverInfo": {
            "name": server.name,
            "version": server.version,
        },
        "capabilities": {
            "methods": [ocr_text_descriptor()],
        },
    })
}

pub fn methods_list_result() -> Value {
    json!({ "methods": [ocr_text_descriptor()] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_lists_every_param_as_optional() {
        let descriptor = ocr_text_descriptor();
        let params = descriptor["params"].as_array().unwrap();
        assert_eq!(params.len(), OCR_TEXT_PARAMS.len());
        assert!(params.iter().all(|p| p["required"] == false));

        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        for expected in ["image", "image_path", "url", "base64", "format", "output.language"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_initialize_and_list_share_schema() {
        let init = initialize_result(&ServerConfig::default());
        assert_eq!(init["capabilities"]["methods"], methods_list_result()["methods"]);
        assert_eq!(init["serverInfo"]["name"], "ocrtool");
        assert_eq!(init["protocolVersion"], "2024-11-05");
    }
}

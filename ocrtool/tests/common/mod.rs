#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ocrtool::config::{Config, OcrConfig, ResolverConfig, ServerConfig};
use ocrtool::error::{OcrToolError, Result};
use ocrtool::models::{BoundingBox, OcrResult, RecognizedLine};
use ocrtool::ocr::Recognizer;
use ocrtool::resolver::{ImageResolver, LocalImage};
use ocrtool::rpc::Dispatcher;
use tempfile::NamedTempFile;

/// One observed `recognize` call.
#[derive(Debug, Clone)]
pub struct RecognizeCall {
    pub path: PathBuf,
    pub existed: bool,
    pub bytes: Vec<u8>,
    pub languages: Vec<String>,
    pub enhanced: bool,
}

/// Recognizer returning canned lines and recording every call.
pub struct StubRecognizer {
    lines: Vec<RecognizedLine>,
    fail: bool,
    calls: Mutex<Vec<RecognizeCall>>,
}

impl StubRecognizer {
    pub fn returning(lines: Vec<RecognizedLine>) -> Arc<Self> {
        Arc::new(Self {
            lines,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            lines: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecognizeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recognizer for StubRecognizer {
    async fn recognize(
        &self,
        image: &LocalImage,
        languages: &[String],
        enhanced: bool,
    ) -> Result<OcrResult> {
        let path = image.path().to_path_buf();
        self.calls.lock().unwrap().push(RecognizeCall {
            existed: path.exists(),
            bytes: std::fs::read(&path).unwrap_or_default(),
            path,
            languages: languages.to_vec(),
            enhanced,
        });

        if self.fail {
            return Err(OcrToolError::Ocr("stub failure".to_string()));
        }
        Ok(OcrResult::new(self.lines.clone()))
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            pretty_json: true,
            ..ServerConfig::default()
        },
        ocr: OcrConfig {
            default_languages: vec!["zh-Hans".to_string(), "en-US".to_string()],
            ..OcrConfig::default()
        },
        resolver: ResolverConfig {
            fetch_timeout_secs: 5,
            ..ResolverConfig::default()
        },
    }
}

pub fn dispatcher_with(recognizer: Arc<StubRecognizer>) -> Dispatcher {
    let config = test_config();
    let resolver = ImageResolver::new(&config.resolver).expect("resolver");
    Dispatcher::new(config, resolver, recognizer)
}

pub fn line(text: &str, x: f64, y: f64, width: f64, height: f64) -> RecognizedLine {
    RecognizedLine::new(text, BoundingBox::new(x, y, width, height))
}

/// Write bytes to a temporary file that lives as long as the returned handle.
pub fn image_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image");
    file.write_all(bytes).expect("Failed to write temp image");
    file
}

pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Split a `+`-joined language string into ordered, non-empty tags.
pub fn split_language_tags(value: &str) -> Vec<String> {
    value
        .split('+')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub const DEFAULT_LANGUAGES: &str = "zh-Hans+en-US";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    /// Pretty-print the `full` format envelope.
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Ordered language hints used when a request carries no `lang`.
    pub default_languages: Vec<String>,
    pub tessdata_dir: Option<String>,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    pub fetch_timeout_secs: u64,
    pub max_download_bytes: u64,
    pub user_agent: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            default_languages: split_language_tags(DEFAULT_LANGUAGES),
            tessdata_dir: None,
            timeout_secs: 60,
            max_image_dimension: 4096,
            min_image_dimension: 8,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            max_download_bytes: 52_428_800,
            user_agent: format!("ocrtool/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "ocrtool".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            pretty_json: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();
        let resolver_defaults = ResolverConfig::default();
        let server_defaults = ServerConfig::default();

        let default_languages = env::var("OCR_DEFAULT_LANGUAGES")
            .map(|val| split_language_tags(&val))
            .ok()
            .filter(|tags| !tags.is_empty())
            .unwrap_or(ocr_defaults.default_languages);

        Self {
            server: ServerConfig {
                pretty_json: parse_env_or("OCR_PRETTY_JSON", server_defaults.pretty_json),
                ..server_defaults
            },
            ocr: OcrConfig {
                default_languages,
                tessdata_dir: env::var("OCR_TESSDATA_DIR").ok().filter(|s| !s.is_empty()),
                timeout_secs: parse_env_or("OCR_TIMEOUT_SECS", ocr_defaults.timeout_secs),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
                min_image_dimension: parse_env_or(
                    "OCR_MIN_DIMENSION",
                    ocr_defaults.min_image_dimension,
                ),
            },
            resolver: ResolverConfig {
                fetch_timeout_secs: parse_env_or(
                    "OCR_FETCH_TIMEOUT_SECS",
                    resolver_defaults.fetch_timeout_secs,
                ),
                max_download_bytes: parse_env_or(
                    "OCR_MAX_DOWNLOAD_BYTES",
                    resolver_defaults.max_download_bytes,
                ),
                user_agent: env::var("OCR_USER_AGENT").unwrap_or(resolver_defaults.user_agent),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

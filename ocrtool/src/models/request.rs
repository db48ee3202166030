/// Accepted spellings for the `format` parameter.
pub const OUTPUT_FORMAT_NAMES: &[&str] = &[
    "text",
    "simple",
    "table",
    "markdown",
    "auto",
    "full",
    "structured",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Newline-joined text (`text`, `simple`).
    Text,
    /// Markdown table (`table`, `markdown`).
    Table,
    /// `Text` for a single line, `Table` otherwise.
    Auto,
    /// Full JSON-RPC envelope (`full`, `structured`).
    #[default]
    Full,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "simple" => Ok(Self::Text),
            "table" | "markdown" => Ok(Self::Table),
            "auto" => Ok(Self::Auto),
            "full" | "structured" => Ok(Self::Full),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Where the image bytes come from. Exactly one source is effective per
/// request, chosen with priority URL, then base64, then local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Base64(String),
    Path(String),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Base64(_) => "base64",
            Self::Path(_) => "path",
        }
    }
}

/// Validated `ocr_text` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrRequest {
    pub source: ImageSource,
    pub language_hints: Vec<String>,
    pub enhanced: bool,
    pub output_format: Option<OutputFormat>,
    /// Target language for comment mode; `None` when comment mode is off.
    pub comment_language: Option<String>,
}

impl OcrRequest {
    pub fn effective_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }
}

//! Result rendering.
//!
//! Every function here is a pure function of an [`OcrResult`]. Line order is
//! never changed: rows and comment lines appear exactly in engine order.

use crate::models::{OcrResult, OutputFormat};

pub const NO_TEXT_FOUND: &str = "No text found.";

const TABLE_HEADER: &str = "| Text | X | Y | Width | Height |";
const TABLE_SEPARATOR: &str = "|------|---|---|--------|--------|";

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The caller should emit the full JSON-RPC envelope.
    Structured,
    /// Informal text written to stdout as-is.
    Text(String),
}

/// Render `result` for the requested format. Comment mode wins over `format`.
pub fn render(result: &OcrResult, format: OutputFormat, comment_language: Option<&str>) -> Rendered {
    if let Some(language) = comment_language {
        return Rendered::Text(comment_block(result, language));
    }

    match format {
        OutputFormat::Text => Rendered::Text(plain_text(result)),
        OutputFormat::Table => Rendered::Text(markdown_table(result)),
        OutputFormat::Auto => Rendered::Text(auto(result)),
        OutputFormat::Full => Rendered::Structured,
    }
}

pub fn plain_text(result: &OcrResult) -> String {
    result
        .lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn markdown_table(result: &OcrResult) -> String {
    if result.is_empty() {
        return NO_TEXT_FOUND.to_string();
    }

    let mut rows = Vec::with_capacity(result.len() + 2);
    rows.push(TABLE_HEADER.to_string());
    rows.push(TABLE_SEPARATOR.to_string());

    for line in &result.lines {
        rows.push(format!(
            "| {} | {} | {} | {} | {} |",
            escape_cell(&line.text),
            line.bbox.x.trunc() as i64,
            line.bbox.y.trunc() as i64,
            line.bbox.width.trunc() as i64,
            line.bbox.height.trunc() as i64,
        ));
    }

    rows.join("\n")
}

pub fn auto(result: &OcrResult) -> String {
    if result.len() == 1 {
        plain_text(result)
    } else {
        markdown_table(result)
    }
}

fn escape_cell(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace('|', "\\|")
}

/// Comment syntax family for a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Hash,
    DoubleSlash,
    Markup,
}

impl CommentStyle {
    /// Unrecognized languages use `//`.
    pub fn for_language(language: &str) -> Self {
        match language.trim().to_lowercase().as_str() {
            "python" | "py" | "ruby" | "rb" | "shell" | "sh" | "bash" | "zsh" | "perl"
            | "pl" | "r" | "yaml" | "yml" | "toml" | "powershell" | "ps1" | "dockerfile"
            | "makefile" | "make" => Self::Hash,
            "html" | "htm" | "xml" | "markdown" | "md" | "svg" | "vue" => Self::Markup,
            _ => Self::DoubleSlash,
        }
    }
}

pub fn comment_block(result: &OcrResult, language: &str) -> String {
    if result.is_empty() {
        return String::new();
    }

    match CommentStyle::for_language(language) {
        CommentStyle::Hash => prefix_lines(result, "# "),
        CommentStyle::DoubleSlash => prefix_lines(result, "// "),
        CommentStyle::Markup => {
            format!("<!--\n{}\n-->", plain_text(result).replace("-->", "--&gt;"))
        }
    }
}

/// Every physical line gets the prefix, including lines inside a
/// multi-line recognized text.
fn prefix_lines(result: &OcrResult, prefix: &str) -> String {
    result
        .lines
        .iter()
        .flat_map(|line| line.text.lines())
        .map(|text| format!("{prefix}{text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

//! OCR (Optical Character Recognition) Module
//!
//! Recognition sits behind the [`Recognizer`] trait so the dispatcher does not
//! depend on a concrete engine:
//! - `OcrProvider` implements it with Tesseract via leptess
//! - tests substitute a stub that returns canned lines
//!
//! The Tesseract path decodes the file with `image`, optionally enhances it
//! (see `preprocessing`), asks Tesseract for TSV output and groups words into
//! lines (see `tsv`). Language hints such as `zh-Hans` or `en-US` are mapped to
//! traineddata codes in `language`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let result = ocr.recognize(&image, &["en-US".into()], true).await?;
//! ```

mod language;
mod preprocessing;
mod provider;
mod tsv;

pub use language::{tesseract_code, tesseract_languages};
pub use preprocessing::{decode_image, prepare_image, PreparedImage};
pub use provider::{OcrProvider, Recognizer};
pub use tsv::lines_from_tsv;

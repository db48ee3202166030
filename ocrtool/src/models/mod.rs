mod ocr;
mod request;

pub use ocr::*;
pub use request::*;

use serde::{Deserialize, Serialize};

/// Axis-aligned box in source image pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        BoundingBox::new(left, top, right - left, bottom - top)
    }

    pub fn scaled(&self, factor: f64) -> BoundingBox {
        BoundingBox::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecognizedLine {
    pub text: String,
    pub bbox: BoundingBox,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Lines in engine order. An empty result means nothing was recognized or
/// the image could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OcrResult {
    pub lines: Vec<RecognizedLine>,
}

impl OcrResult {
    pub fn new(lines: Vec<RecognizedLine>) -> Self {
        Self { lines }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

use crate::detection::domain::detection::DetectionResultSet;
use crate::shared::geometry::{BoundingBox, Dimensions};

/// A box to draw over the displayed image, in display coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayBox {
    pub bbox: BoundingBox,
    /// Detection score, two decimals.
    pub label: String,
}

/// Drawing for the transparent surface laid over the displayed image.
///
/// `size` always equals the displayed image size, so box coordinates can be
/// used as-is by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub size: Dimensions,
    pub boxes: Vec<OverlayBox>,
}

impl Overlay {
    pub fn cleared(size: Dimensions) -> Self {
        Self {
            size,
            boxes: Vec::new(),
        }
    }

    /// Rescale `results` to `display` and turn every detection into a box.
    pub fn from_results(results: &DetectionResultSet, display: Dimensions) -> Self {
        let boxes = results
            .resize_to(display)
            .detections()
            .iter()
            .map(|d| OverlayBox {
                bbox: d.bbox.clamp_to(display),
                label: format!("{:.2}", d.score),
            })
            .collect();
        Self {
            size: display,
            boxes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

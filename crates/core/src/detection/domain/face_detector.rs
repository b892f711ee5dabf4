use crate::detection::domain::detection::{Detection, DetectionOptions};
use crate::shared::frame::Frame;

/// Domain interface for single-image face detection.
///
/// Inference sessions need exclusive access while running, hence `&mut self`.
/// Returned detections are in `frame` pixel coordinates.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectionOptions,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}

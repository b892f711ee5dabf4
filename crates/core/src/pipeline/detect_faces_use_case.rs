use std::sync::{Arc, PoisonError};
use std::time::Instant;

use crate::detection::domain::detection::{DetectionOptions, DetectionResultSet};
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::infrastructure::model_handle::ModelHandle;
use crate::intake::image_reference::RequestToken;
use crate::shared::frame::Frame;

/// One detection to run: the pixels of the image accepted under `token`.
#[derive(Clone, Debug)]
pub struct DetectionRequest {
    pub token: RequestToken,
    pub frame: Arc<Frame>,
}

/// Runs face detection for a single still image.
///
/// Waits for the shared model to finish loading, then detects over the whole
/// frame. Nothing is cached: the same image is re-detected on every call.
#[derive(Clone, Debug)]
pub struct DetectFacesUseCase {
    model: ModelHandle,
    options: DetectionOptions,
}

impl DetectFacesUseCase {
    pub fn new(model: ModelHandle, options: DetectionOptions) -> Self {
        Self { model, options }
    }

    pub fn execute(&self, request: &DetectionRequest) -> Result<DetectionResultSet, DetectionError> {
        let detector = self.model.wait()?;
        let start = Instant::now();

        let detections = {
            let mut detector = detector.lock().unwrap_or_else(PoisonError::into_inner);
            detector
                .detect(&request.frame, &self.options)
                .map_err(|e| DetectionError::Inference(e.to_string()))?
        };

        let results = DetectionResultSet::new(detections, request.frame.dimensions());
        log::info!(
            "Detected {} face(s) in image {} ({:.1} ms)",
            results.len(),
            request.token,
            start.elapsed().as_secs_f64() * 1000.0
        );
        log::debug!("Detections: {:?}", results.detections());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::detection::domain::detection::Detection;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::shared::geometry::BoundingBox;

    /// Returns fixed boxes, dropping those under the requested threshold.
    struct FixedDetector {
        detections: Vec<Detection>,
        calls: Arc<AtomicUsize>,
    }

    impl FaceDetector for FixedDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
            options: &DetectionOptions,
        ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .detections
                .iter()
                .filter(|d| d.score >= options.min_confidence())
                .copied()
                .collect())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
            _options: &DetectionOptions,
        ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Err("tensor shape mismatch".into())
        }
    }

    fn request() -> DetectionRequest {
        DetectionRequest {
            token: RequestToken::new(1),
            frame: Arc::new(Frame::filled(640, 480, [90, 90, 90])),
        }
    }

    fn face(x: f32, score: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(x, 100.0, 80.0, 80.0),
            score,
        }
    }

    fn fixed(detections: Vec<Detection>) -> (ModelHandle, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = ModelHandle::ready(Box::new(FixedDetector {
            detections,
            calls: calls.clone(),
        }));
        (handle, calls)
    }

    #[test]
    fn test_two_faces_above_threshold() {
        let (model, _) = fixed(vec![face(50.0, 0.93), face(300.0, 0.81), face(500.0, 0.2)]);
        let use_case = DetectFacesUseCase::new(model, DetectionOptions::default());

        let results = use_case.execute(&request()).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.detections().iter().all(|d| d.score >= 0.5));
        assert_eq!(results.source(), request().frame.dimensions());
    }

    #[test]
    fn test_no_faces_yields_empty_set() {
        let (model, _) = fixed(vec![]);
        let use_case = DetectFacesUseCase::new(model, DetectionOptions::default());
        assert!(use_case.execute(&request()).unwrap().is_empty());
    }

    #[test]
    fn test_every_call_redetects() {
        let (model, calls) = fixed(vec![face(10.0, 0.9)]);
        let use_case = DetectFacesUseCase::new(model, DetectionOptions::default());
        let req = request();

        use_case.execute(&req).unwrap();
        use_case.execute(&req).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_model_is_reported() {
        let model = ModelHandle::pending();
        model.complete(Err("weights not found".into()));
        let use_case = DetectFacesUseCase::new(model, DetectionOptions::default());

        assert_eq!(
            use_case.execute(&request()).unwrap_err(),
            DetectionError::ModelUnavailable("weights not found".into())
        );
    }

    #[test]
    fn test_detector_error_is_inference_error() {
        let model = ModelHandle::ready(Box::new(BrokenDetector));
        let use_case = DetectFacesUseCase::new(model, DetectionOptions::default());

        assert!(matches!(
            use_case.execute(&request()),
            Err(DetectionError::Inference(m)) if m.contains("tensor shape")
        ));
    }
}

use facespot_core::detection::domain::face_detector::FaceDetector;
use facespot_core::detection::infrastructure::model_handle::ModelHandle;
use facespot_core::detection::infrastructure::model_resolver::{self, ModelLocation};
use facespot_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use facespot_core::shared::constants::MODEL_NAME;

/// Start loading the face detection model in the background.
///
/// Fire-and-forget: the returned handle is usable immediately and detections
/// wait on it. A failed load is logged and every later detection reports it.
pub fn start(location: ModelLocation) -> ModelHandle {
    log::info!("Loading face detection model from {location}");
    ModelHandle::load_in_background(move || {
        let path = model_resolver::resolve(&location, MODEL_NAME)?;
        let detector = OnnxBlazefaceDetector::new(&path)?;
        log::debug!("Model session ready for {}", path.display());
        Ok(Box::new(detector) as Box<dyn FaceDetector>)
    })
}

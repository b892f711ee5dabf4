use facespot_core::detection::domain::detection::DetectionResultSet;
use facespot_core::pipeline::detect_faces_use_case::{DetectFacesUseCase, DetectionRequest};

/// Run one detection off the UI thread. Errors come back as display strings.
pub async fn detect(
    use_case: DetectFacesUseCase,
    request: DetectionRequest,
) -> Result<DetectionResultSet, String> {
    super::off_ui_thread("face-detection", move || {
        use_case.execute(&request).map_err(|e| e.to_string())
    })
    .await
}

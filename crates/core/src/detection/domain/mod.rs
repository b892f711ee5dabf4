pub mod detection;
pub mod detection_error;
pub mod face_detector;

/// BlazeFace short-range model, looked up under the configured model location.
pub const MODEL_NAME: &str = "blazeface_short_range.onnx";

/// Default model location: a `models/` directory relative to the working directory.
pub const DEFAULT_MODEL_LOCATION: &str = "models";

/// Detections scoring below this are dropped.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

/// Logical size of the preview region the image is fitted into.
pub const PREVIEW_WIDTH: u32 = 400;
pub const PREVIEW_HEIGHT: u32 = 300;

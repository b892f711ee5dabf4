use std::path::PathBuf;
use std::sync::Arc;

use iced::widget::image;

use facespot_core::intake::image_loader;
use facespot_core::shared::frame::Frame;

/// A decoded file plus the texture handle the preview draws from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub frame: Arc<Frame>,
    pub handle: image::Handle,
}

/// Decode `path` off the UI thread.
pub async fn decode(path: PathBuf) -> Result<DecodedImage, String> {
    super::off_ui_thread("image-decode", move || {
        let frame = image_loader::decode(&path).map_err(|e| e.to_string())?;
        let handle = image::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba());
        Ok(DecodedImage {
            frame: Arc::new(frame),
            handle,
        })
    })
    .await
}

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decode an image file into an RGB [`Frame`].
///
/// The format is sniffed from the file contents, not the extension; the file
/// picker's extension filter is the only up-front check.
pub fn decode(path: &Path) -> Result<Frame, ImageLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let img = image::load_from_memory(&bytes).map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let frame = Frame::from_rgb_image(img.into_rgb8());
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        frame.width(),
        frame.height()
    );
    Ok(frame)
}

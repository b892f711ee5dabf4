use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::shared::frame::Frame;
use crate::shared::geometry::Dimensions;

/// Identifies one accepted image. Tokens only ever increase within a panel,
/// so a detection finishing for an older token is known to be stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The image currently shown in the panel.
///
/// Owns the decoded pixels. At most one reference is live per panel; the
/// pixels are freed when it is released, unless a detection still running
/// against them holds a clone of the frame.
pub struct ImageReference {
    token: RequestToken,
    path: PathBuf,
    frame: Arc<Frame>,
    display: Dimensions,
}

impl ImageReference {
    /// `region` is the area the image is shown in; the image is scaled down
    /// to fit it, never up.
    pub fn new(token: RequestToken, path: PathBuf, frame: Arc<Frame>, region: Dimensions) -> Self {
        let display = frame.dimensions().fit_within(region);
        Self {
            token,
            path,
            frame,
            display,
        }
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }

    /// Size the image is drawn at; the overlay uses the same size.
    pub fn display(&self) -> Dimensions {
        self.display
    }

    pub fn release(self) {
        log::debug!("Released image {} ({})", self.token, self.path.display());
    }
}

impl fmt::Debug for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageReference")
            .field("token", &self.token)
            .field("path", &self.path)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

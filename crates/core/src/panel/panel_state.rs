//! State of the detector panel as an explicit tagged state machine.
//!
//! ```text
//! Empty --image decoded--> ImageDisplayed --image ready--> Detecting
//! Detecting --results--> ResultsShown | --error--> Failed
//! any --new image--> ImageDisplayed      any --reset--> Empty
//! ```
//!
//! Every accepted file gets a fresh [`RequestToken`]. Decodes and detections
//! report back with the token they started under, and anything reporting for
//! a token that is no longer current is dropped.
use std::mem;
use std::path::PathBuf;
use std::sync::Arc;

use crate::detection::domain::detection::DetectionResultSet;
use crate::intake::image_reference::{ImageReference, RequestToken};
use crate::pipeline::detect_faces_use_case::DetectionRequest;
use crate::shared::frame::Frame;
use crate::shared::geometry::Dimensions;

use super::overlay::Overlay;

/// What the controls show, derived from the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Empty,
    Loading,
    ShowingResults,
}

#[derive(Debug)]
pub enum Phase {
    Empty,
    ImageDisplayed {
        image: ImageReference,
    },
    Detecting {
        image: ImageReference,
    },
    ResultsShown {
        image: ImageReference,
        results: DetectionResultSet,
    },
    /// Decoding (no image) or detection (image kept) failed.
    Failed {
        image: Option<ImageReference>,
        message: String,
    },
}

/// Whether a reported outcome was applied to the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct PanelState {
    phase: Phase,
    region: Dimensions,
    last_token: RequestToken,
    pending_intake: Option<RequestToken>,
}

impl PanelState {
    /// `region` is the preview area images are fitted into.
    pub fn new(region: Dimensions) -> Self {
        Self {
            phase: Phase::Empty,
            region,
            last_token: RequestToken::new(0),
            pending_intake: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn ui_mode(&self) -> UiMode {
        match &self.phase {
            Phase::Empty | Phase::Failed { image: None, .. } => UiMode::Empty,
            Phase::Detecting { .. } => UiMode::Loading,
            Phase::ImageDisplayed { .. }
            | Phase::ResultsShown { .. }
            | Phase::Failed { image: Some(_), .. } => UiMode::ShowingResults,
        }
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self.phase, Phase::Detecting { .. })
    }

    pub fn image(&self) -> Option<&ImageReference> {
        match &self.phase {
            Phase::Empty | Phase::Failed { image: None, .. } => None,
            Phase::ImageDisplayed { image }
            | Phase::Detecting { image }
            | Phase::ResultsShown { image, .. }
            | Phase::Failed {
                image: Some(image), ..
            } => Some(image),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Drawing for the surface over the image; `None` while no image is shown.
    ///
    /// Stays cleared while a newly picked file is decoding.
    pub fn overlay(&self) -> Option<Overlay> {
        let image = self.image()?;
        Some(match &self.phase {
            Phase::ResultsShown { results, .. } if self.pending_intake.is_none() => {
                Overlay::from_results(results, image.display())
            }
            _ => Overlay::cleared(image.display()),
        })
    }

    /// A file was picked; its pixels are being decoded under the returned token.
    ///
    /// Results for the image still on screen are dropped and the overlay is
    /// cleared right away. Picking again before the decode finishes
    /// supersedes the earlier pick.
    pub fn accept_file(&mut self) -> RequestToken {
        self.phase = match mem::replace(&mut self.phase, Phase::Empty) {
            Phase::ResultsShown { image, .. } => Phase::ImageDisplayed { image },
            other => other,
        };
        self.last_token = self.last_token.next();
        self.pending_intake = Some(self.last_token);
        self.last_token
    }

    /// Decoding finished for the file accepted under `token`.
    ///
    /// The previous image is released before the new one is installed, and
    /// the overlay starts out cleared.
    pub fn image_decoded(
        &mut self,
        token: RequestToken,
        path: PathBuf,
        frame: Result<Arc<Frame>, String>,
    ) -> Completion {
        if self.pending_intake != Some(token) {
            log::debug!("Dropping decode of {} for superseded image {token}", path.display());
            return Completion::Stale;
        }
        self.pending_intake = None;
        self.release_current();

        self.phase = match frame {
            Ok(frame) => {
                let image = ImageReference::new(token, path, frame, self.region);
                log::info!(
                    "Showing {} as image {token} at {}x{}",
                    image.path().display(),
                    image.display().width,
                    image.display().height
                );
                Phase::ImageDisplayed { image }
            }
            Err(message) => {
                log::warn!("Could not open {}: {message}", path.display());
                Phase::Failed {
                    image: None,
                    message,
                }
            }
        };
        Completion::Applied
    }

    /// The image shown under `token` is ready for pixel access: start detecting.
    ///
    /// Also re-runs detection on an image that already has results.
    pub fn image_ready(&mut self, token: RequestToken) -> Option<DetectionRequest> {
        if self.is_detecting() || self.image().map(ImageReference::token) != Some(token) {
            return None;
        }
        let image = match mem::replace(&mut self.phase, Phase::Empty) {
            Phase::ImageDisplayed { image }
            | Phase::ResultsShown { image, .. }
            | Phase::Failed {
                image: Some(image), ..
            } => image,
            other => {
                self.phase = other;
                return None;
            }
        };
        let request = DetectionRequest {
            token,
            frame: image.frame().clone(),
        };
        self.phase = Phase::Detecting { image };
        Some(request)
    }

    /// A detection started under `token` finished.
    ///
    /// Applied only while that image is still shown and waiting on it;
    /// either outcome leaves the detecting phase.
    pub fn detection_finished(
        &mut self,
        token: RequestToken,
        outcome: Result<DetectionResultSet, String>,
    ) -> Completion {
        let current = match &self.phase {
            Phase::Detecting { image } => image.token() == token,
            _ => false,
        };
        if !current {
            log::debug!("Discarding detection results for stale image {token}");
            return Completion::Stale;
        }

        let image = match mem::replace(&mut self.phase, Phase::Empty) {
            Phase::Detecting { image } => image,
            other => {
                self.phase = other;
                return Completion::Stale;
            }
        };
        self.phase = match outcome {
            Ok(results) => Phase::ResultsShown { image, results },
            Err(message) => {
                log::error!("Face detection failed for image {token}: {message}");
                Phase::Failed {
                    image: Some(image),
                    message,
                }
            }
        };
        Completion::Applied
    }

    /// Back to the empty panel. Safe to call in any phase.
    pub fn reset(&mut self) {
        self.pending_intake = None;
        self.release_current();
    }

    fn release_current(&mut self) {
        match mem::replace(&mut self.phase, Phase::Empty) {
            Phase::ImageDisplayed { image }
            | Phase::Detecting { image }
            | Phase::ResultsShown { image, .. }
            | Phase::Failed {
                image: Some(image), ..
            } => image.release(),
            Phase::Empty | Phase::Failed { image: None, .. } => {}
        }
    }
}

use std::path::PathBuf;

use iced::widget::image;
use iced::{Element, Task, Theme};

use facespot_core::detection::domain::detection::DetectionResultSet;
use facespot_core::detection::infrastructure::model_handle::ModelHandle;
use facespot_core::intake::image_reference::RequestToken;
use facespot_core::panel::panel_state::{Completion, PanelState};
use facespot_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use facespot_core::shared::constants::{IMAGE_EXTENSIONS, PREVIEW_HEIGHT, PREVIEW_WIDTH};
use facespot_core::shared::geometry::Dimensions;

use crate::detector_panel::{self, Hover};
use crate::settings::Settings;
use crate::shell;
use crate::theme;
use crate::workers::intake_worker::{self, DecodedImage};
use crate::workers::{detection_worker, model_loader};

#[derive(Debug, Clone)]
pub enum Message {
    SelectImage,
    ImageSelected(Option<PathBuf>),
    ImageDecoded(RequestToken, PathBuf, Result<DecodedImage, String>),
    ImageReady(RequestToken),
    DetectionFinished(RequestToken, Result<DetectionResultSet, String>),
    Reset,
    UploadHover(bool),
    ResetHover(bool),
}

pub struct App {
    panel: PanelState,
    detect_faces: DetectFacesUseCase,
    /// Texture for the image the panel currently holds, keyed by its token.
    preview: Option<(RequestToken, image::Handle)>,
    hover: Hover,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let model = model_loader::start(settings.model_location());
        (Self::with_model(model, &settings), Task::none())
    }

    fn with_model(model: ModelHandle, settings: &Settings) -> Self {
        Self {
            panel: PanelState::new(Dimensions::new(PREVIEW_WIDTH, PREVIEW_HEIGHT)),
            detect_faces: DetectFacesUseCase::new(model, settings.detection_options()),
            preview: None,
            hover: Hover::default(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectImage => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select an image")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::ImageSelected,
                );
            }
            Message::ImageSelected(Some(path)) => {
                let token = self.panel.accept_file();
                log::debug!("Accepted {} as image {token}", path.display());
                let decode_path = path.clone();
                return Task::perform(intake_worker::decode(decode_path), move |decoded| {
                    Message::ImageDecoded(token, path.clone(), decoded)
                });
            }
            Message::ImageSelected(None) => {}
            Message::ImageDecoded(token, path, decoded) => {
                let (frame, handle) = match decoded {
                    Ok(DecodedImage { frame, handle }) => (Ok(frame), Some(handle)),
                    Err(e) => (Err(e), None),
                };
                if self.panel.image_decoded(token, path, frame) == Completion::Applied {
                    self.preview = handle.map(|h| (token, h));
                    self.hover = Hover::default();
                    if self.preview.is_some() {
                        // Pixels are in memory as soon as decoding finishes.
                        return Task::done(Message::ImageReady(token));
                    }
                }
            }
            Message::ImageReady(token) => {
                if let Some(request) = self.panel.image_ready(token) {
                    return Task::perform(
                        detection_worker::detect(self.detect_faces.clone(), request),
                        move |outcome| Message::DetectionFinished(token, outcome),
                    );
                }
            }
            Message::DetectionFinished(token, outcome) => {
                self.panel.detection_finished(token, outcome);
            }
            Message::Reset => {
                self.panel.reset();
                self.preview = None;
                self.hover = Hover::default();
            }
            Message::UploadHover(hovered) => self.hover.upload = hovered,
            Message::ResetHover(hovered) => self.hover.reset = hovered,
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let current = self.panel.image().map(|image| image.token());
        let preview = self
            .preview
            .as_ref()
            .filter(|(token, _)| Some(*token) == current)
            .map(|(_, handle)| handle);

        shell::view(detector_panel::view(&self.panel, preview, self.hover))
    }

    pub fn theme(&self) -> Theme {
        theme::theme()
    }
}

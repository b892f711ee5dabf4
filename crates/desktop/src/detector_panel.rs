use iced::widget::{column, image, row, stack, text, Space};
use iced::{Color, ContentFit, Element, Size};

use facespot_core::panel::panel_state::{PanelState, UiMode};
use facespot_core::shared::constants::{PREVIEW_HEIGHT, PREVIEW_WIDTH};

use crate::app::Message;
use crate::theme::muted_color;
use crate::widgets::overlay_canvas::overlay_canvas;
use crate::widgets::panel_button::{panel_button, Variant};
use crate::widgets::preview_frame::preview_frame;

const PROMPT: &str = "Upload an image to detect face(s)";

#[derive(Debug, Default, Clone, Copy)]
pub struct Hover {
    pub upload: bool,
    pub reset: bool,
}

/// Preview frame above the controls for the current mode.
///
/// `preview` is the texture for the image currently held by `panel`.
pub fn view<'a>(
    panel: &'a PanelState,
    preview: Option<&'a image::Handle>,
    hover: Hover,
) -> Element<'a, Message> {
    let mut content = column![preview_area(panel, preview)].spacing(16);
    if let Some(error) = panel.error() {
        content = content.push(
            text(error.to_owned())
                .size(13)
                .color(Color::from_rgb(1.0, 0.45, 0.4)),
        );
    }
    content.push(controls(panel.ui_mode(), hover)).into()
}

fn preview_area<'a>(
    panel: &'a PanelState,
    preview: Option<&'a image::Handle>,
) -> Element<'a, Message> {
    let region = Size::new(PREVIEW_WIDTH as f32, PREVIEW_HEIGHT as f32);

    match (panel.image(), panel.overlay(), preview) {
        (Some(shown), Some(overlay), Some(handle)) => {
            let size = shown.display();
            let picture = image(handle.clone())
                .width(size.width as f32)
                .height(size.height as f32)
                .content_fit(ContentFit::Fill);
            preview_frame(region, stack![picture, overlay_canvas(overlay)])
                .top_left()
                .into()
        }
        _ => preview_frame(region, text(PROMPT).color(muted_color())).into(),
    }
}

fn controls<'a>(mode: UiMode, hover: Hover) -> Element<'a, Message> {
    match mode {
        UiMode::Empty => upload(PROMPT, hover.upload),
        UiMode::Loading => panel_button(
            Variant::Filled,
            "Detecting\u{2026} please wait!",
            None,
            false,
            Message::UploadHover,
        ),
        UiMode::ShowingResults => row![
            upload("Upload another image", hover.upload),
            Space::new().width(8),
            panel_button(
                Variant::Outlined,
                "Reset",
                Some(Message::Reset),
                hover.reset,
                Message::ResetHover,
            ),
        ]
        .into(),
    }
}

fn upload<'a>(caption: &'static str, hovered: bool) -> Element<'a, Message> {
    panel_button(
        Variant::Filled,
        caption,
        Some(Message::SelectImage),
        hovered,
        Message::UploadHover,
    )
}

use iced::border::Border;
use iced::widget::container;
use iced::{Element, Length, Theme};

use facespot_core::shared::constants::PREVIEW_WIDTH;

use crate::theme::surface_color;

pub const PANEL_PADDING: f32 = 24.0;
const PANEL_RADIUS: f32 = 12.0;

/// Fixed-width panel centered in the window. Purely presentational.
pub fn view<'a, Message: 'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    let panel = container(content)
        .width(panel_width())
        .padding(PANEL_PADDING)
        .style(|_theme: &Theme| container::Style {
            background: Some(surface_color().into()),
            border: Border {
                radius: PANEL_RADIUS.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    container(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Preview width plus the dashed frame's border and the panel padding.
pub fn panel_width() -> f32 {
    PREVIEW_WIDTH as f32 + 2.0 * crate::widgets::preview_frame::BORDER + 2.0 * PANEL_PADDING
}

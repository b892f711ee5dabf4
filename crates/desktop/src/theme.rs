use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

pub fn theme() -> Theme {
    Theme::custom(
        "Facespot",
        Palette {
            background: background_color(),
            text: Color::WHITE,
            primary: button_color(),
            success: color!(0x30, 0xd1, 0x58),
            warning: color!(0xff, 0xcc, 0x00),
            danger: color!(0xff, 0x45, 0x3a),
        },
    )
}

/// Window background behind the panel.
pub fn background_color() -> Color {
    color!(0x1e, 0x1e, 0x1e)
}

/// The centered panel.
pub fn surface_color() -> Color {
    color!(0x2a, 0x2a, 0x2a)
}

/// Inside of the preview frame.
pub fn preview_color() -> Color {
    color!(0x1a, 0x1a, 0x1a)
}

pub fn button_color() -> Color {
    color!(0x3a, 0x3a, 0x3a)
}

pub fn border_color() -> Color {
    color!(0x55, 0x55, 0x55)
}

pub fn border_hover_color() -> Color {
    color!(0x88, 0x88, 0x88)
}

pub fn muted_color() -> Color {
    color!(0x88, 0x88, 0x88)
}

/// Detection boxes and their label backgrounds.
pub fn detection_color() -> Color {
    color!(0x00, 0x00, 0xff)
}

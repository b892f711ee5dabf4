use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area, text};
use iced::{Color, Element, Length, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{border_color, border_hover_color};

const PADDING: [u16; 2] = [10, 16];
const RADIUS: f32 = 6.0;
const LIFT: f32 = 1.0;
const DISABLED_ALPHA: f32 = 0.45;
const HOVER_FADE: Duration = Duration::from_millis(200);

/// How a panel button is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Solid primary fill that lifts slightly under the pointer.
    Filled,
    /// Transparent with a grey outline that brightens under the pointer.
    Outlined,
}

/// Full-width button with a centered caption.
///
/// `on_press: None` draws the button disabled and stops tracking hover.
pub fn panel_button<'a, Message: Clone + 'a>(
    variant: Variant,
    caption: &'static str,
    on_press: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    let Some(message) = on_press else {
        return render(variant, caption, None, 0.0);
    };

    let target = if hovered { 1.0_f32 } else { 0.0 };
    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        render(variant, caption, Some(message.clone()), t.clamp(0.0, 1.0))
    })
    .animates_layout(variant == Variant::Filled)
    .animation(Easing::EASE_OUT.with_duration(HOVER_FADE))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn render<'a, Message: Clone + 'a>(
    variant: Variant,
    caption: &'static str,
    on_press: Option<Message>,
    hover: f32,
) -> Element<'a, Message> {
    let label = container(text(caption).size(14)).center_x(Length::Fill);
    let widget = button(label)
        .on_press_maybe(on_press)
        .padding(PADDING)
        .width(Length::Fill)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = match status {
                button::Status::Pressed => 1.0,
                _ => hover,
            };
            match (variant, status) {
                (_, button::Status::Disabled) => disabled(theme),
                (Variant::Filled, _) => filled(theme, amount),
                (Variant::Outlined, _) => outlined(theme, amount),
            }
        });

    match variant {
        // Top padding shrinks as the bottom grows so the row height stays put.
        Variant::Filled => container(widget)
            .padding(Padding {
                top: LIFT * (1.0 - hover),
                bottom: LIFT * hover,
                ..Padding::ZERO
            })
            .into(),
        Variant::Outlined => container(widget).padding([LIFT, 0.0]).into(),
    }
}

fn filled(theme: &Theme, hover: f32) -> button::Style {
    button::Style {
        background: Some(mix(theme.palette().primary, Color::WHITE, 0.06 * hover).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.35),
            offset: Vector::new(0.0, 2.0),
            blur_radius: 4.0 + 4.0 * hover,
        },
        ..button::Style::default()
    }
}

fn outlined(theme: &Theme, hover: f32) -> button::Style {
    button::Style {
        background: None,
        text_color: theme.palette().text,
        border: Border {
            color: mix(border_color(), border_hover_color(), hover),
            width: 1.0,
            radius: RADIUS.into(),
        },
        ..button::Style::default()
    }
}

fn disabled(theme: &Theme) -> button::Style {
    let base = theme.palette().primary;
    button::Style {
        background: Some(Color { a: DISABLED_ALPHA, ..base }.into()),
        text_color: Color { a: DISABLED_ALPHA, ..Color::WHITE },
        border: Border {
            radius: RADIUS.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}

fn mix(from: Color, to: Color, t: f32) -> Color {
    Color {
        r: from.r + (to.r - from.r) * t,
        g: from.g + (to.g - from.g) * t,
        b: from.b + (to.b - from.b) * t,
        a: from.a + (to.a - from.a) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        let from = Color::from_rgb(0.25, 0.25, 0.25);
        let to = Color::from_rgb(0.75, 0.5, 0.25);
        assert_eq!(mix(from, to, 0.0), from);
        assert_eq!(mix(from, to, 1.0), to);
    }

    #[test]
    fn test_outlined_border_brightens_on_hover() {
        let theme = crate::theme::theme();
        let idle = outlined(&theme, 0.0).border.color;
        let hot = outlined(&theme, 1.0).border.color;
        assert_eq!(idle, border_color());
        assert!(hot.r > idle.r);
        assert!((hot.r - border_hover_color().r).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_is_translucent() {
        let style = disabled(&crate::theme::theme());
        assert_eq!(style.text_color.a, DISABLED_ALPHA);
    }
}

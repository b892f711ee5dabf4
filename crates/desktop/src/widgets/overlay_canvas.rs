use iced::widget::canvas::{self, Canvas, Frame, Path, Stroke};
use iced::{mouse, Color, Element, Pixels, Point, Rectangle, Renderer, Size, Theme};

use facespot_core::panel::overlay::Overlay;
use facespot_core::shared::geometry::BoundingBox;

use crate::theme::detection_color;

const BOX_LINE_WIDTH: f32 = 2.0;
const LABEL_TEXT_SIZE: f32 = 12.0;
const LABEL_PADDING: f32 = 2.0;
/// Rough advance per glyph for the default font at `LABEL_TEXT_SIZE`.
const LABEL_CHAR_WIDTH: f32 = 7.0;

/// Transparent drawing surface sized to the displayed image.
pub fn overlay_canvas<'a, Message: 'a>(overlay: Overlay) -> Element<'a, Message> {
    let (width, height) = (overlay.size.width as f32, overlay.size.height as f32);
    Canvas::new(OverlayProgram { overlay })
        .width(width)
        .height(height)
        .into()
}

struct OverlayProgram {
    overlay: Overlay,
}

impl<Message> canvas::Program<Message> for OverlayProgram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let color = detection_color();

        for b in &self.overlay.boxes {
            let outline = Path::rectangle(
                Point::new(b.bbox.x, b.bbox.y),
                Size::new(b.bbox.width, b.bbox.height),
            );
            frame.stroke(
                &outline,
                Stroke::default()
                    .with_color(color)
                    .with_width(BOX_LINE_WIDTH),
            );

            let label = label_rect(&b.bbox, &b.label, bounds.size());
            frame.fill_rectangle(label.position(), label.size(), color);
            frame.fill_text(canvas::Text {
                content: b.label.clone(),
                position: Point::new(label.x + LABEL_PADDING, label.y + LABEL_PADDING),
                color: Color::WHITE,
                size: Pixels(LABEL_TEXT_SIZE),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

/// Score tag position: just above the box, or inside its top edge when the
/// box touches the top of the surface. Never leaves the surface horizontally.
fn label_rect(bbox: &BoundingBox, label: &str, surface: Size) -> Rectangle {
    let width = label.chars().count() as f32 * LABEL_CHAR_WIDTH + 2.0 * LABEL_PADDING;
    let height = LABEL_TEXT_SIZE + 2.0 * LABEL_PADDING;
    let y = if bbox.y >= height { bbox.y - height } else { bbox.y };
    let x = bbox.x.min((surface.width - width).max(0.0));
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_sits_above_box() {
        let r = label_rect(&BoundingBox::new(40.0, 60.0, 80.0, 80.0), "0.97", Size::new(400.0, 300.0));
        assert_eq!(r.y + r.height, 60.0);
        assert_eq!(r.x, 40.0);
    }

    #[test]
    fn test_label_moves_inside_at_top_edge() {
        let r = label_rect(&BoundingBox::new(40.0, 3.0, 80.0, 80.0), "0.97", Size::new(400.0, 300.0));
        assert_eq!(r.y, 3.0);
    }

    #[test]
    fn test_label_stays_on_surface_at_right_edge() {
        let r = label_rect(&BoundingBox::new(395.0, 60.0, 5.0, 5.0), "0.97", Size::new(400.0, 300.0));
        assert!(r.x + r.width <= 400.0);
    }
}

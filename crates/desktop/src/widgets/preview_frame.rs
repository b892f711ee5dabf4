use iced::advanced::graphics::geometry;
use iced::advanced::widget::{tree, Tree, Widget};
use iced::advanced::{layout, renderer, Clipboard, Layout, Renderer as _, Shell};
use iced::border::Border;
use iced::mouse::{Cursor, Interaction};
use iced::widget::canvas::{self, Path, Stroke};
use iced::{
    alignment, Color, Element, Event, Length, Padding, Point, Rectangle, Renderer, Size, Theme,
    Vector,
};

use crate::theme::{border_color, preview_color};

/// Width of the dashed outline; content is inset by this much on every side.
pub const BORDER: f32 = 2.0;
const DASH: [f32; 2] = [6.0, 4.0];
const RADIUS: f32 = 8.0;

/// Fixed-size drop area for the preview: a dark fill, a dashed rounded
/// outline and a child clipped to the inside of that outline.
pub struct PreviewFrame<'a, Message> {
    content: Element<'a, Message>,
    inner: Size,
    anchor: Anchor,
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Center,
    TopLeft,
}

impl<'a, Message> PreviewFrame<'a, Message> {
    /// Frame whose inside measures exactly `inner`, content centered.
    pub fn new(inner: Size, content: impl Into<Element<'a, Message>>) -> Self {
        Self {
            content: content.into(),
            inner,
            anchor: Anchor::Center,
        }
    }

    /// Pin the content to the top-left corner, where the overlay expects it.
    pub fn top_left(mut self) -> Self {
        self.anchor = Anchor::TopLeft;
        self
    }

    fn outer(&self) -> Size {
        Size::new(self.inner.width + 2.0 * BORDER, self.inner.height + 2.0 * BORDER)
    }
}

impl<Message> Widget<Message, Theme, Renderer> for PreviewFrame<'_, Message> {
    fn children(&self) -> Vec<Tree> {
        vec![Tree::new(&self.content)]
    }

    fn diff(&self, tree: &mut Tree) {
        tree.diff_children(std::slice::from_ref(&self.content));
    }

    fn state(&self) -> tree::State {
        tree::State::None
    }

    fn size(&self) -> Size<Length> {
        let outer = self.outer();
        Size::new(Length::Fixed(outer.width), Length::Fixed(outer.height))
    }

    fn layout(
        &mut self,
        tree: &mut Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let outer = self.outer();
        let anchor = self.anchor;
        layout::positioned(
            limits,
            Length::Fixed(outer.width),
            Length::Fixed(outer.height),
            Padding::new(BORDER),
            |inside| {
                self.content
                    .as_widget_mut()
                    .layout(&mut tree.children[0], renderer, &inside.loose())
            },
            move |child, space| match anchor {
                Anchor::Center => child.align(
                    alignment::Alignment::Center,
                    alignment::Alignment::Center,
                    space,
                ),
                Anchor::TopLeft => child,
            },
        )
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) {
        let Some(child) = layout.children().next() else {
            return;
        };
        self.content.as_widget_mut().update(
            &mut tree.children[0],
            event,
            child,
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        );
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> Interaction {
        match layout.children().next() {
            Some(child) => self.content.as_widget().mouse_interaction(
                &tree.children[0],
                child,
                cursor,
                viewport,
                renderer,
            ),
            None => Interaction::Idle,
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: Cursor,
        viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let Some(visible) = bounds.intersection(viewport) else {
            return;
        };

        renderer.fill_quad(
            renderer::Quad {
                bounds,
                border: Border {
                    radius: RADIUS.into(),
                    ..Border::default()
                },
                ..renderer::Quad::default()
            },
            preview_color(),
        );

        let clip = bounds.shrink(BORDER).intersection(&visible);
        if let (Some(child), Some(clip)) = (layout.children().next(), clip) {
            renderer.with_layer(clip, |renderer| {
                self.content.as_widget().draw(
                    &tree.children[0],
                    renderer,
                    theme,
                    style,
                    child,
                    cursor,
                    &clip,
                );
            });
        }

        let outline = dashed_outline(renderer, bounds.size(), border_color());
        renderer.with_translation(Vector::new(bounds.x, bounds.y), |renderer| {
            geometry::Renderer::draw_geometry(renderer, outline);
        });
    }
}

/// Dashed rounded rectangle whose stroke sits just inside `size`.
fn dashed_outline(renderer: &Renderer, size: Size, color: Color) -> canvas::Geometry {
    let mut frame = canvas::Frame::new(renderer, size);
    let half = BORDER / 2.0;
    let path = Path::rounded_rectangle(
        Point::new(half, half),
        Size::new(size.width - BORDER, size.height - BORDER),
        RADIUS.into(),
    );
    frame.stroke(
        &path,
        Stroke {
            style: canvas::Style::Solid(color),
            width: BORDER,
            line_cap: canvas::LineCap::Butt,
            line_dash: canvas::LineDash {
                segments: &DASH,
                offset: 0,
            },
            ..Stroke::default()
        },
    );
    frame.into_geometry()
}

impl<'a, Message: 'a> From<PreviewFrame<'a, Message>> for Element<'a, Message> {
    fn from(frame: PreviewFrame<'a, Message>) -> Self {
        Element::new(frame)
    }
}

pub fn preview_frame<'a, Message: 'a>(
    inner: Size,
    content: impl Into<Element<'a, Message>>,
) -> PreviewFrame<'a, Message> {
    PreviewFrame::new(inner, content)
}

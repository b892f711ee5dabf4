pub mod overlay_canvas;
pub mod panel_button;
pub mod preview_frame;

pub mod overlay;
pub mod panel_state;

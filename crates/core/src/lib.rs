//! Still-image face detection: a shared model handle, an ONNX BlazeFace
//! detector, image intake and the detector panel's state machine.
//!
//! Nothing in this crate depends on a UI toolkit; the desktop crate drives
//! [`panel::panel_state::PanelState`] from iced messages.

pub mod detection;
pub mod intake;
pub mod panel;
pub mod pipeline;
pub mod shared;

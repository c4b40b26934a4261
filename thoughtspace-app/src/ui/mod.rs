//! UI panels for the app

mod control_panel;
mod insights_window;
mod label_modal;
mod stats_overlay;

pub use control_panel::{render_control_panel, ControlAction, ControlPanelState};
pub use insights_window::render_insights_window;
pub use label_modal::{render_label_modal, LabelChoice, LabelModalState};
pub use stats_overlay::render_stats_overlay;

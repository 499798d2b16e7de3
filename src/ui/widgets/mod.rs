// src/ui/widgets/mod.rs

// One module per screen region.
pub mod footer;
pub mod input;
pub mod log_view;
pub mod popup;
pub mod recent;
pub mod results;
pub mod status_view;

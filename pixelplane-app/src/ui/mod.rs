//! Overlays drawn on top of the plot.

mod debug_panel;
mod grid;
mod help;

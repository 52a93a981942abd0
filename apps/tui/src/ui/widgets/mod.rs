pub mod detail;
pub mod map_canvas;
pub mod popup;
pub mod tables;

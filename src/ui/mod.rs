pub mod controls;
pub mod heatmap;
pub mod horizon;
pub mod matrix;
pub mod parallel;
pub mod ranking;
pub mod scatter;
pub mod stream;
pub mod table_view;
pub mod tooltip;

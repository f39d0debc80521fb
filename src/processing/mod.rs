pub mod aggregate;
pub mod brush;
pub mod histogram;
pub mod kd_tree;
pub mod lookup;
pub mod stack;
pub mod statistics;

pub mod datasets;
pub mod dates;
pub mod loader;
pub mod table;

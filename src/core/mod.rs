pub mod actions;
pub mod colour_maps;
pub mod data;
pub mod fractals;
pub mod util;

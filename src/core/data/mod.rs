pub mod chunk_plan;
pub mod colour;
pub mod complex_plane_window;
pub mod image_geometry;
pub mod pixel_buffer;
pub mod point;
pub mod render_config;
pub mod render_job;

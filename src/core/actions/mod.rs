pub mod cancellation;
pub mod render_chunk;
pub mod render_image;

use std::ops::Range;

use crate::core::actions::render_chunk::render_chunk::RenderChunkError;

/// Fills the pixel band for a range of image rows.
///
/// `pixels` holds exactly the bytes of `rows`, row-major, three bytes per pixel.
pub trait ChunkRenderer: Sync {
    fn render_rows(&self, rows: Range<u32>, pixels: &mut [u8]) -> Result<(), RenderChunkError>;
}

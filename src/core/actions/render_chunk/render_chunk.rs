use std::ops::Range;

use thiserror::Error;

use crate::core::actions::render_chunk::ports::colour_map::ColourMap;
use crate::core::actions::render_chunk::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::actions::render_image::ports::chunk_renderer::ChunkRenderer;
use crate::core::colour_maps::hsb_palette::HsbPalette;
use crate::core::data::complex_plane_window::ComplexPlaneWindow;
use crate::core::data::image_geometry::ImageGeometry;
use crate::core::data::pixel_buffer::BYTES_PER_PIXEL;
use crate::core::data::point::Point;
use crate::core::data::render_job::RenderJob;
use crate::core::fractals::cosine::algorithm::CosineAlgorithm;
use crate::core::util::pixel_to_complex_coords::{
    PixelToComplexCoordsError, pixel_to_complex_coords,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderChunkError {
    #[error("band for rows {start}..{end} holds {actual} bytes, expected {expected}")]
    BandSizeMismatch {
        start: u32,
        end: u32,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Coords(#[from] PixelToComplexCoordsError),
}

/// Renders rows by evaluating the escape time of every pixel and colouring
/// it through a colour map.
#[derive(Debug)]
pub struct EscapeTimeChunkRenderer<'a, Alg, CMap> {
    geometry: ImageGeometry,
    window: ComplexPlaneWindow,
    algorithm: &'a Alg,
    colour_map: &'a CMap,
}

impl<'a, Alg, CMap> EscapeTimeChunkRenderer<'a, Alg, CMap>
where
    Alg: FractalAlgorithm,
    CMap: ColourMap,
{
    /// Creates a renderer for an image of `geometry` sampling `window`.
    ///
    /// Rows passed to [`ChunkRenderer::render_rows`] are image rows, so the
    /// same renderer can fill any band of the image.
    #[must_use]
    pub fn new(
        geometry: ImageGeometry,
        window: ComplexPlaneWindow,
        algorithm: &'a Alg,
        colour_map: &'a CMap,
    ) -> Self {
        Self {
            geometry,
            window,
            algorithm,
            colour_map,
        }
    }
}

impl<'a> EscapeTimeChunkRenderer<'a, CosineAlgorithm, HsbPalette> {
    /// Renderer for the cosine algorithm and palette held by `job`.
    #[must_use]
    pub fn for_job(job: &'a RenderJob) -> Self {
        Self::new(job.geometry(), job.window(), job.algorithm(), job.palette())
    }
}

impl<Alg, CMap> ChunkRenderer for EscapeTimeChunkRenderer<'_, Alg, CMap>
where
    Alg: FractalAlgorithm,
    CMap: ColourMap,
{
    fn render_rows(&self, rows: Range<u32>, pixels: &mut [u8]) -> Result<(), RenderChunkError> {
        let stride = self.geometry.width() as usize * BYTES_PER_PIXEL;
        let expected = rows.len() * stride;

        if pixels.len() != expected {
            return Err(RenderChunkError::BandSizeMismatch {
                start: rows.start,
                end: rows.end,
                expected,
                actual: pixels.len(),
            });
        }

        for (y, line) in rows.zip(pixels.chunks_exact_mut(stride)) {
            let columns = 0..self.geometry.width();

            for (x, pixel) in columns.zip(line.chunks_exact_mut(BYTES_PER_PIXEL)) {
                let point = pixel_to_complex_coords(Point { x, y }, self.geometry, self.window)?;
                let steps = self.algorithm.compute(point);

                pixel.copy_from_slice(&self.colour_map.map(steps).to_bytes());
            }
        }

        Ok(())
    }
}

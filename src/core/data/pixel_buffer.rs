use thiserror::Error;

use crate::core::data::chunk_plan::{Chunk, ChunkPlan};
use crate::core::data::colour::Colour;
use crate::core::data::image_geometry::ImageGeometry;
use crate::core::data::point::Point;

pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    #[error(
        "pixel at x:{}, y:{} outside of {}x{} image",
        .pixel.x,
        .pixel.y,
        .geometry.width(),
        .geometry.height()
    )]
    PixelOutsideBounds {
        pixel: Point,
        geometry: ImageGeometry,
    },
    #[error("image size {expected} bytes does not match buffer size {actual} bytes")]
    BoundsMismatch { expected: usize, actual: usize },
    #[error("chunk plan covers {plan_rows} rows but the image has {image_rows}")]
    PlanMismatch { plan_rows: u32, image_rows: u32 },
}

pub type PixelBufferData = Vec<u8>;

/// The rows of one chunk, borrowed mutably out of a [`PixelBuffer`].
#[derive(Debug)]
pub struct ChunkBand<'a> {
    pub chunk: Chunk,
    pub pixels: &'a mut [u8],
}

/// Row-major RGB pixels, three bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    geometry: ImageGeometry,
    buffer: PixelBufferData,
}

fn geometry_to_buffer_size(geometry: ImageGeometry) -> usize {
    geometry.pixel_count() * BYTES_PER_PIXEL
}

impl PixelBuffer {
    #[must_use]
    pub fn new(geometry: ImageGeometry) -> Self {
        Self {
            geometry,
            buffer: vec![0; geometry_to_buffer_size(geometry)],
        }
    }

    pub fn from_data(
        geometry: ImageGeometry,
        buffer: PixelBufferData,
    ) -> Result<Self, PixelBufferError> {
        let expected = geometry_to_buffer_size(geometry);

        if expected != buffer.len() {
            return Err(PixelBufferError::BoundsMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        Ok(Self { geometry, buffer })
    }

    #[must_use]
    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn row_stride(&self) -> usize {
        self.geometry.width() as usize * BYTES_PER_PIXEL
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn offset_of(&self, pixel: Point) -> Result<usize, PixelBufferError> {
        if !self.geometry.contains_point(pixel) {
            return Err(PixelBufferError::PixelOutsideBounds {
                pixel,
                geometry: self.geometry,
            });
        }

        Ok(pixel.y as usize * self.row_stride() + pixel.x as usize * BYTES_PER_PIXEL)
    }

    pub fn pixel(&self, pixel: Point) -> Result<Colour, PixelBufferError> {
        let index = self.offset_of(pixel)?;

        Ok(Colour {
            r: self.buffer[index],
            g: self.buffer[index + 1],
            b: self.buffer[index + 2],
        })
    }

    pub fn set_pixel(&mut self, pixel: Point, colour: Colour) -> Result<(), PixelBufferError> {
        let index = self.offset_of(pixel)?;

        self.buffer[index..index + BYTES_PER_PIXEL].copy_from_slice(&colour.to_bytes());

        Ok(())
    }

    /// Splits the buffer into one disjoint mutable band per non-empty chunk,
    /// in chunk order. Chunks lying past the last row get no band.
    ///
    /// Fails if the plan was built for a different image height.
    pub fn bands_mut(&mut self, plan: &ChunkPlan) -> Result<Vec<ChunkBand<'_>>, PixelBufferError> {
        if plan.image_height() != self.geometry.height() {
            return Err(PixelBufferError::PlanMismatch {
                plan_rows: plan.image_height(),
                image_rows: self.geometry.height(),
            });
        }

        let stride = self.row_stride();
        let mut remaining: &mut [u8] = &mut self.buffer;
        let mut bands = Vec::with_capacity(plan.non_empty_chunk_count() as usize);

        for chunk in plan.non_empty_chunks() {
            let len = chunk.row_count() as usize * stride;
            let (head, tail) = std::mem::take(&mut remaining).split_at_mut(len);
            remaining = tail;
            bands.push(ChunkBand {
                chunk,
                pixels: head,
            });
        }

        Ok(bands)
    }
}

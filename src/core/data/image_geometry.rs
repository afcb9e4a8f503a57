use thiserror::Error;

use crate::core::data::point::Point;

pub const DEFAULT_IMAGE_WIDTH: u32 = 640;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 480;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ImageGeometryError {
    #[error("image size must be positive: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Output image dimensions in pixels. Both sides are at least one pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageGeometry {
    width: u32,
    height: u32,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self, ImageGeometryError> {
        if width == 0 || height == 0 {
            return Err(ImageGeometryError::InvalidSize { width, height });
        }

        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

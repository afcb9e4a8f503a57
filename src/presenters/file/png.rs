use std::path::Path;

use image::{ColorType, ImageFormat};

use crate::controllers::ports::file_presenter::{FilePresenterPort, PresentError};
use crate::core::data::pixel_buffer::PixelBuffer;

/// Encodes the buffer as an 8-bit RGB PNG.
#[derive(Debug, Default)]
pub struct PngFilePresenter {}

impl PngFilePresenter {
    pub fn new() -> Self {
        Self {}
    }
}

impl FilePresenterPort for PngFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> Result<(), PresentError> {
        let geometry = buffer.geometry();

        image::save_buffer_with_format(
            filepath,
            buffer.buffer(),
            geometry.width(),
            geometry.height(),
            ColorType::Rgb8,
            ImageFormat::Png,
        )?;

        Ok(())
    }
}

use num_complex::Complex64;
use thiserror::Error;

use crate::core::data::complex_plane_window::ComplexPlaneWindow;
use crate::core::data::image_geometry::ImageGeometry;
use crate::core::data::point::Point;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelToComplexCoordsError {
    #[error(
        "point (x: {}, y: {}) is outside the {}x{} image",
        .point.x,
        .point.y,
        .geometry.width(),
        .geometry.height()
    )]
    PointOutsideImage {
        point: Point,
        geometry: ImageGeometry,
    },
}

/// Maps a pixel to the complex number it samples.
///
/// Row 0 is the top edge (`max_imag`) and the imaginary part decreases
/// downwards. The real part is `x * (real_span / width) - max_real`: the
/// offset is the maximum real bound, not the minimum. For a window symmetric
/// about the imaginary axis the two conventions coincide.
pub fn pixel_to_complex_coords(
    pixel: Point,
    geometry: ImageGeometry,
    window: ComplexPlaneWindow,
) -> Result<Complex64, PixelToComplexCoordsError> {
    if !geometry.contains_point(pixel) {
        return Err(PixelToComplexCoordsError::PointOutsideImage {
            point: pixel,
            geometry,
        });
    }

    let imag =
        window.max_imag() - f64::from(pixel.y) * (window.imag_span() / f64::from(geometry.height()));
    let real =
        f64::from(pixel.x) * (window.real_span() / f64::from(geometry.width())) - window.max_real();

    Ok(Complex64::new(real, imag))
}

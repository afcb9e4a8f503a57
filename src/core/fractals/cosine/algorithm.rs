use num_complex::Complex64;
use thiserror::Error;

use crate::core::actions::render_chunk::ports::fractal_algorithm::FractalAlgorithm;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum CosineAlgorithmError {
    #[error("maximum steps must be greater than zero")]
    ZeroMaxSteps,
}

/// Counts the steps of `z -> cos(z) * c`, starting from `z = 0`, until `z`
/// overflows to infinity or becomes NaN.
///
/// Returns the number of steps completed before the escaping one, or
/// `max_steps` if the orbit never escapes.
#[inline]
#[must_use]
pub fn escape_time(c: Complex64, max_steps: u32) -> u32 {
    let mut z = Complex64::new(0.0, 0.0);

    for step in 0..max_steps {
        z = z.cos() * c;

        if has_escaped(z) {
            return step;
        }
    }

    max_steps
}

#[inline]
fn has_escaped(z: Complex64) -> bool {
    z.is_infinite() || z.is_nan()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CosineAlgorithm {
    max_steps: u32,
}

impl CosineAlgorithm {
    pub fn new(max_steps: u32) -> Result<Self, CosineAlgorithmError> {
        if max_steps == 0 {
            return Err(CosineAlgorithmError::ZeroMaxSteps);
        }

        Ok(Self { max_steps })
    }
}

impl FractalAlgorithm for CosineAlgorithm {
    fn compute(&self, point: Complex64) -> u32 {
        escape_time(point, self.max_steps)
    }

    fn max_steps(&self) -> u32 {
        self.max_steps
    }
}

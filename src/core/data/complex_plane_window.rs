use thiserror::Error;

pub const DEFAULT_MIN_REAL: f64 = -2.0;
pub const DEFAULT_MAX_REAL: f64 = 2.0;
pub const DEFAULT_MIN_IMAG: f64 = -2.0;
pub const DEFAULT_MAX_IMAG: f64 = 2.0;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ComplexPlaneWindowError {
    #[error("real bounds must satisfy min < max: {min}..{max}")]
    InvalidRealRange { min: f64, max: f64 },
    #[error("imaginary bounds must satisfy min < max: {min}..{max}")]
    InvalidImagRange { min: f64, max: f64 },
    #[error("complex plane bounds and their spans must be finite")]
    NonFinite,
}

/// The region of the complex plane sampled by one render.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComplexPlaneWindow {
    min_real: f64,
    max_real: f64,
    min_imag: f64,
    max_imag: f64,
}

impl ComplexPlaneWindow {
    pub fn new(
        min_real: f64,
        max_real: f64,
        min_imag: f64,
        max_imag: f64,
    ) -> Result<Self, ComplexPlaneWindowError> {
        if ![min_real, max_real, min_imag, max_imag]
            .iter()
            .all(|bound| bound.is_finite())
        {
            return Err(ComplexPlaneWindowError::NonFinite);
        }

        if min_real >= max_real {
            return Err(ComplexPlaneWindowError::InvalidRealRange {
                min: min_real,
                max: max_real,
            });
        }

        if min_imag >= max_imag {
            return Err(ComplexPlaneWindowError::InvalidImagRange {
                min: min_imag,
                max: max_imag,
            });
        }

        let window = Self {
            min_real,
            max_real,
            min_imag,
            max_imag,
        };

        // Finite bounds can still be too far apart for the span to fit in an f64.
        if !window.real_span().is_finite() || !window.imag_span().is_finite() {
            return Err(ComplexPlaneWindowError::NonFinite);
        }

        Ok(window)
    }

    #[must_use]
    pub fn min_real(&self) -> f64 {
        self.min_real
    }

    #[must_use]
    pub fn max_real(&self) -> f64 {
        self.max_real
    }

    #[must_use]
    pub fn min_imag(&self) -> f64 {
        self.min_imag
    }

    #[must_use]
    pub fn max_imag(&self) -> f64 {
        self.max_imag
    }

    #[must_use]
    pub fn real_span(&self) -> f64 {
        self.max_real - self.min_real
    }

    #[must_use]
    pub fn imag_span(&self) -> f64 {
        self.max_imag - self.min_imag
    }
}

impl Default for ComplexPlaneWindow {
    fn default() -> Self {
        Self {
            min_real: DEFAULT_MIN_REAL,
            max_real: DEFAULT_MAX_REAL,
            min_imag: DEFAULT_MIN_IMAG,
            max_imag: DEFAULT_MAX_IMAG,
        }
    }
}

use num_complex::Complex64;

/// Per-point escape-time evaluation.
pub trait FractalAlgorithm: Send + Sync {
    /// Number of steps before the orbit of `point` escapes, capped at [`Self::max_steps`].
    fn compute(&self, point: Complex64) -> u32;

    fn max_steps(&self) -> u32;
}

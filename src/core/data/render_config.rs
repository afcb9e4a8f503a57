use thiserror::Error;

use crate::core::colour_maps::hsb_palette::{DEFAULT_PALETTE_SIZE, HsbPalette, PaletteError};
use crate::core::data::chunk_plan::{
    ChunkPlan, ChunkPlanError, DEFAULT_GRANULARITY, DEFAULT_WORKER_COUNT,
};
use crate::core::data::complex_plane_window::{
    ComplexPlaneWindow, ComplexPlaneWindowError, DEFAULT_MAX_IMAG, DEFAULT_MAX_REAL,
    DEFAULT_MIN_IMAG, DEFAULT_MIN_REAL,
};
use crate::core::data::image_geometry::{
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, ImageGeometry, ImageGeometryError,
};
use crate::core::data::render_job::{RenderJob, WorkerFailurePolicy};
use crate::core::fractals::cosine::algorithm::{CosineAlgorithm, CosineAlgorithmError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid image size: {0}")]
    Geometry(#[from] ImageGeometryError),
    #[error("invalid complex plane window: {0}")]
    Window(#[from] ComplexPlaneWindowError),
    #[error("invalid chunking: {0}")]
    ChunkPlan(#[from] ChunkPlanError),
    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),
    #[error("invalid iteration limit: {0}")]
    Algorithm(#[from] CosineAlgorithmError),
}

/// Unvalidated render settings as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub min_real: f64,
    pub max_real: f64,
    pub min_imag: f64,
    pub max_imag: f64,
    pub workers: u32,
    pub granularity: u32,
    pub palette_size: u32,
    pub quiet: bool,
    pub failure_policy: WorkerFailurePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
            min_real: DEFAULT_MIN_REAL,
            max_real: DEFAULT_MAX_REAL,
            min_imag: DEFAULT_MIN_IMAG,
            max_imag: DEFAULT_MAX_IMAG,
            workers: DEFAULT_WORKER_COUNT,
            granularity: DEFAULT_GRANULARITY,
            palette_size: DEFAULT_PALETTE_SIZE,
            quiet: false,
            failure_policy: WorkerFailurePolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Validates the settings and precomputes the palette and chunk plan.
    pub fn build_job(&self) -> Result<RenderJob, ConfigError> {
        let geometry = ImageGeometry::new(self.width, self.height)?;
        let window =
            ComplexPlaneWindow::new(self.min_real, self.max_real, self.min_imag, self.max_imag)?;
        let chunk_plan = ChunkPlan::new(geometry.height(), self.workers, self.granularity)?;
        let palette = HsbPalette::new(self.palette_size)?;
        // The iteration cap is the palette length.
        let algorithm = CosineAlgorithm::new(palette.len())?;

        Ok(RenderJob::new(
            window,
            geometry,
            chunk_plan,
            palette,
            algorithm,
            self.quiet,
            self.failure_policy,
        ))
    }
}

use crate::core::colour_maps::hsb_palette::HsbPalette;
use crate::core::data::chunk_plan::ChunkPlan;
use crate::core::data::complex_plane_window::ComplexPlaneWindow;
use crate::core::data::image_geometry::ImageGeometry;
use crate::core::fractals::cosine::algorithm::CosineAlgorithm;

/// What the coordinator does when a worker does not finish normally.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WorkerFailurePolicy {
    /// Fail the whole render.
    #[default]
    Abort,
    /// Log the failure and return the partially rendered image.
    BestEffort,
}

/// Everything one render needs, validated and shared read-only by all workers.
///
/// Built with [`RenderConfig::build_job`](crate::core::data::render_config::RenderConfig::build_job).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    window: ComplexPlaneWindow,
    geometry: ImageGeometry,
    chunk_plan: ChunkPlan,
    palette: HsbPalette,
    algorithm: CosineAlgorithm,
    quiet: bool,
    failure_policy: WorkerFailurePolicy,
}

impl RenderJob {
    pub(crate) fn new(
        window: ComplexPlaneWindow,
        geometry: ImageGeometry,
        chunk_plan: ChunkPlan,
        palette: HsbPalette,
        algorithm: CosineAlgorithm,
        quiet: bool,
        failure_policy: WorkerFailurePolicy,
    ) -> Self {
        Self {
            window,
            geometry,
            chunk_plan,
            palette,
            algorithm,
            quiet,
            failure_policy,
        }
    }

    #[must_use]
    pub fn window(&self) -> ComplexPlaneWindow {
        self.window
    }

    #[must_use]
    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    #[must_use]
    pub fn chunk_plan(&self) -> &ChunkPlan {
        &self.chunk_plan
    }

    #[must_use]
    pub fn palette(&self) -> &HsbPalette {
        &self.palette
    }

    #[must_use]
    pub fn algorithm(&self) -> &CosineAlgorithm {
        &self.algorithm
    }

    #[must_use]
    pub fn worker_count(&self) -> u32 {
        self.chunk_plan.worker_count()
    }

    #[must_use]
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    #[must_use]
    pub fn failure_policy(&self) -> WorkerFailurePolicy {
        self.failure_policy
    }
}

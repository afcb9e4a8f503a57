//! Parallel renderer for the `z = cos(z) * c` escape-time fractal.

mod controllers;
mod core;
mod input;
mod presenters;

pub use crate::controllers::ports::file_presenter::{FilePresenterPort, PresentError};
pub use crate::controllers::render::{ControllerError, RenderController};
pub use crate::core::actions::cancellation::{
    CancelFlag, CancelToken, Cancelled, NeverCancel,
};
pub use crate::core::actions::render_image::render_image::{
    RenderError, render_image, render_image_cancelable, render_image_serial, render_image_with,
};
pub use crate::core::actions::render_image::ports::chunk_renderer::ChunkRenderer;
pub use crate::core::actions::render_image::report::{
    RenderOutput, RenderReport, WorkerReport, WorkerStatus,
};
pub use crate::core::colour_maps::hsb_palette::{HsbPalette, hsb_to_rgb};
pub use crate::core::data::chunk_plan::{Chunk, ChunkPlan};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex_plane_window::ComplexPlaneWindow;
pub use crate::core::data::image_geometry::ImageGeometry;
pub use crate::core::data::pixel_buffer::PixelBuffer;
pub use crate::core::data::point::Point;
pub use crate::core::data::render_config::{ConfigError, RenderConfig};
pub use crate::core::data::render_job::{RenderJob, WorkerFailurePolicy};
pub use crate::core::fractals::cosine::algorithm::{CosineAlgorithm, escape_time};
pub use crate::input::cli::args::CliArgs;
pub use crate::input::cli::commands::run_cli::RunCliCommand;
pub use crate::presenters::file::factory::presenter_for_path;
pub use crate::presenters::file::png::PngFilePresenter;
pub use crate::presenters::file::ppm::PpmFilePresenter;

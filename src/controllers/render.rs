use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::controllers::ports::file_presenter::{FilePresenterPort, PresentError};
use crate::core::actions::render_image::render_image::{RenderError, render_image};
use crate::core::actions::render_image::report::{RenderOutput, RenderReport};
use crate::core::data::render_config::{ConfigError, RenderConfig};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Present(#[from] PresentError),
    #[error("nothing to write: no image has been rendered")]
    NothingRendered,
}

/// Validates a configuration, renders it, and hands the image to a file
/// presenter.
pub struct RenderController<P: FilePresenterPort> {
    presenter: P,
    output: Option<RenderOutput>,
}

impl<P: FilePresenterPort> RenderController<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            output: None,
        }
    }

    pub fn generate(&mut self, config: &RenderConfig) -> Result<&RenderReport, ControllerError> {
        let job = config.build_job()?;

        if !job.quiet() {
            info!(threads = job.worker_count(), "threads used in current run");
        }

        let output = self.output.insert(render_image(&job)?);

        info!(
            total_ms = output.report.elapsed_millis() as u64,
            "total execution time for current run"
        );

        Ok(&output.report)
    }

    pub fn write(&self, filepath: impl AsRef<Path>) -> Result<(), ControllerError> {
        let output = self.output.as_ref().ok_or(ControllerError::NothingRendered)?;
        let filepath = filepath.as_ref();

        self.presenter.present(&output.buffer, filepath)?;
        info!(path = %filepath.display(), "image written");

        Ok(())
    }

    pub fn output(&self) -> Option<&RenderOutput> {
        self.output.as_ref()
    }
}

use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::controllers::render::{ControllerError, RenderController};
use crate::core::actions::render_image::report::RenderReport;
use crate::input::cli::args::CliArgs;
use crate::presenters::file::factory::presenter_for_path;

pub struct RunCliCommand {
    args: CliArgs,
}

impl RunCliCommand {
    pub fn new(args: CliArgs) -> Self {
        Self { args }
    }

    /// Renders the configured image and writes it to the output path.
    pub fn execute(&self) -> Result<RenderReport, ControllerError> {
        self.execute_with(presenter_for_path(&self.args.output))
    }

    pub fn execute_with<P: FilePresenterPort>(
        &self,
        presenter: P,
    ) -> Result<RenderReport, ControllerError> {
        let mut controller = RenderController::new(presenter);

        let report = controller.generate(&self.args.render_config())?.clone();
        controller.write(&self.args.output)?;

        Ok(report)
    }
}

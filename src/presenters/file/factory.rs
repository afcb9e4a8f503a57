use std::path::Path;

use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::presenters::file::png::PngFilePresenter;
use crate::presenters::file::ppm::PpmFilePresenter;

/// Picks an encoder from the output extension. `.ppm` selects PPM, anything
/// else is written as PNG.
pub fn presenter_for_path(filepath: &Path) -> Box<dyn FilePresenterPort> {
    let is_ppm = filepath
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        Box::new(PpmFilePresenter::new())
    } else {
        Box::new(PngFilePresenter::new())
    }
}

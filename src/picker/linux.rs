//! Linux implementation of the Color Picker
//!
//! There is no toolkit-independent color dialog on Linux, so presentation
//! fails right away and the host sees `PresentationFailed`.
//!
//! TODO: Present through the XDG desktop portal (`org.freedesktop.portal.Screenshot.PickColor`)

use tracing::debug;

use super::Presenter;
use crate::controller::OutcomeReporter;
use crate::error::PresentError;
use crate::options::PickerConfiguration;

/// Presenter that refuses every presentation
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPresenter;

impl Presenter for UnsupportedPresenter {
    fn present(&mut self, _config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError> {
        debug!(session = reporter.session_id(), "no native color picker on linux");
        Err(PresentError::Unsupported("linux"))
    }
}

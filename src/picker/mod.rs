// =============================================================================
// picker/mod.rs - Color picker UI layer
// =============================================================================

use crate::controller::OutcomeReporter;
use crate::error::PresentError;
use crate::options::PickerConfiguration;

/// Code commun entre plateformes (types, fonctions utilitaires)
/// Common code between platforms (types, utility functions)
pub mod common;

/// Implémentation macOS
/// macOS implementation
#[cfg(target_os = "macos")]
pub mod macos;

/// Implémentation Windows
/// Windows implementation
#[cfg(target_os = "windows")]
pub mod windows;

/// Implémentation Linux (non implémentée)
/// Linux implementation (not implemented)
#[cfg(target_os = "linux")]
pub mod linux;

// =============================================================================
// TRAIT
// =============================================================================

/// Couche UI qui affiche réellement le dialogue
/// UI layer that actually renders the dialog
///
/// `present` either fails right away, or takes ownership of `reporter` and
/// eventually reports exactly one terminal event through it, from the UI
/// thread. Reporting before `present` returns is allowed (blocking dialogs).
pub trait Presenter {
    fn present(&mut self, config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError>;

    /// Asks the open dialog to close. The controller has already resolved
    /// the session, so a report made after this point is ignored.
    fn hide(&mut self) {}
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError> {
        (**self).present(config, reporter)
    }

    fn hide(&mut self) {
        (**self).hide()
    }
}

// =============================================================================
// FONCTION PUBLIQUE
// PUBLIC FUNCTION
// =============================================================================

/// Crée le presenter natif selon la plateforme
/// Creates the native presenter based on the platform
///
/// # Returns
/// * `Ok(presenter)` - Presenter for the current platform
/// * `Err(PresentError)` - No native picker here, or wrong thread (macOS)
pub fn native_presenter() -> Result<Box<dyn Presenter>, PresentError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(macos::ColorPanelPresenter::new()?))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::ChooseColorPresenter::new()))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::UnsupportedPresenter))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        Err(PresentError::Unsupported(std::env::consts::OS))
    }
}

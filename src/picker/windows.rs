// =============================================================================
// COLOR PICKER - VERSION WINDOWS
// =============================================================================
// Boîte de dialogue commune ChooseColorW (modale, bloquante)
// ChooseColorW common dialog (modal, blocking)
// =============================================================================

// -----------------------------------------------------------------------------
// IMPORTS - Windows API
// -----------------------------------------------------------------------------
use windows::Win32::{
    Foundation::COLORREF,                      // Couleur 0x00BBGGRR / 0x00BBGGRR color
    UI::Controls::Dialogs::{
        ChooseColorW,                          // Dialogue de couleur / Color dialog
        CommDlgExtendedError,                  // Code d'erreur étendu / Extended error code
        CC_ANYCOLOR, CC_FULLOPEN, CC_RGBINIT,  // Options du dialogue / Dialog flags
        CHOOSECOLORW,
    },
    UI::WindowsAndMessaging::GetForegroundWindow, // Propriétaire du dialogue / Dialog owner
};

use tracing::debug;

// -----------------------------------------------------------------------------
// IMPORTS - Types communs
// IMPORTS - Common types
// -----------------------------------------------------------------------------
use super::common::ColorResult;
use super::Presenter;
use crate::color::ColorObject;
use crate::controller::OutcomeReporter;
use crate::error::PresentError;
use crate::options::PickerConfiguration;

/// Nombre de couleurs personnalisées gérées par ChooseColorW
/// Number of custom colors ChooseColorW keeps
const CUSTOM_COLOR_SLOTS: usize = 16;

// =============================================================================
// PRESENTER
// =============================================================================

/// Presenter basé sur ChooseColorW
/// ChooseColorW-based presenter
///
/// The dialog runs its own modal loop, so the outcome is reported before
/// `present` returns. Custom colors live as long as the presenter.
pub struct ChooseColorPresenter {
    custom_colors: [COLORREF; CUSTOM_COLOR_SLOTS],
}

impl ChooseColorPresenter {
    pub fn new() -> Self {
        Self {
            // Blanc par défaut / White by default
            custom_colors: [to_colorref(255, 255, 255); CUSTOM_COLOR_SLOTS],
        }
    }
}

impl Default for ChooseColorPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ChooseColorPresenter {
    fn present(&mut self, config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError> {
        let initial = config.initial_color();

        // Le titre et l'alpha ne sont pas pris en charge par ChooseColorW
        // Title and alpha are not supported by ChooseColorW
        let mut dialog = CHOOSECOLORW {
            lStructSize: std::mem::size_of::<CHOOSECOLORW>() as u32,
            hwndOwner: unsafe { GetForegroundWindow() },
            rgbResult: to_colorref(initial.r, initial.g, initial.b),
            lpCustColors: self.custom_colors.as_mut_ptr(),
            Flags: CC_RGBINIT | CC_FULLOPEN | CC_ANYCOLOR,
            ..Default::default()
        };

        // Boucle modale jusqu'à OK ou Annuler
        // Modal loop until OK or Cancel
        let confirmed = unsafe { ChooseColorW(&mut dialog) }.as_bool();
        if confirmed {
            let (r, g, b) = from_colorref(dialog.rgbResult);
            reporter.selected(ColorResult::from_components(ColorObject::rgb(r, g, b), config.format()));
            return Ok(());
        }

        // Annuler laisse le code d'erreur à zéro
        // Cancel leaves the error code at zero
        let code = unsafe { CommDlgExtendedError() }.0;
        if code == 0 {
            reporter.dismissed();
            Ok(())
        } else {
            Err(PresentError::Platform(format!("ChooseColorW failed with error 0x{code:04X}")))
        }
    }

    fn hide(&mut self) {
        // Le dialogue modal tourne sur ce thread, il est déjà fermé ici
        // The modal dialog runs on this thread, it is already closed here
        debug!("ChooseColorW has no programmatic close");
    }
}

// =============================================================================
// CONVERSIONS COLORREF
// COLORREF CONVERSIONS
// =============================================================================

/// Construit un COLORREF (0x00BBGGRR)
/// Builds a COLORREF (0x00BBGGRR)
#[inline]
fn to_colorref(r: u8, g: u8, b: u8) -> COLORREF {
    COLORREF(u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16))
}

/// Décompose un COLORREF en (r, g, b)
/// Splits a COLORREF into (r, g, b)
#[inline]
fn from_colorref(color: COLORREF) -> (u8, u8, u8) {
    let value = color.0;
    (
        (value & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        ((value >> 16) & 0xFF) as u8,
    )
}

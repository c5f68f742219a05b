// =============================================================================
// lib.rs - Contrôleur de dialogue de sélection de couleur natif
// lib.rs - Native color selection dialog controller
// =============================================================================

//! One modal color dialog at a time, one outcome per dialog.
//!
//! ```no_run
//! use native_color_picker::{native_presenter, PickerConfiguration, PickerController};
//!
//! let mut picker = PickerController::new(native_presenter()?);
//! let config = PickerConfiguration::new().with_color("#FF0000").with_title("Accent");
//! picker.show(
//!     &config,
//!     |color| println!("selected {color}"),
//!     || println!("dismissed"),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

/// Valeurs par défaut partagées (constantes)
/// Shared default values (constants)
pub mod config;

/// Conversions entre encodages de couleur
/// Conversions between color encodings
pub mod color;

/// Options reconnues par le picker
/// Options recognized by the picker
pub mod options;

/// Erreurs du picker
/// Picker errors
pub mod error;

/// Machine à états, une présentation à la fois
/// State machine, one presentation at a time
pub mod controller;

/// Couche UI et presenters natifs
/// UI layer and native presenters
pub mod picker;

// =============================================================================
// RÉEXPORTS
// RE-EXPORTS
// =============================================================================

pub use color::{to_hex, to_object, to_rgba, ColorObject};
pub use controller::{OutcomeReporter, PendingPick, PickerController, PickerState, SessionId};
pub use error::{PickerError, PickerResult, PresentError};
pub use options::{ColorFormat, PickerConfiguration};
pub use picker::common::{ColorResult, PickerOutcome};
pub use picker::{native_presenter, Presenter};

//! =============================================================================
//! COMMON.RS - Code partagé entre les plateformes
//! COMMON.RS - Shared code between platforms
//! =============================================================================
//!
//! Ce module contient les types de résultat utilisés par tous les presenters.
//! This module contains the result types used by every presenter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorObject;
use crate::options::ColorFormat;

// =============================================================================
// STRUCTURES DE RÉSULTAT
// RESULT STRUCTURES
// =============================================================================

/// Couleur confirmée par l'utilisateur
/// Color confirmed by the user
///
/// Opaque to the controller: the value the presenter reports is the value the
/// host receives, byte for byte.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ColorResult(String);

impl ColorResult {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Encode des composantes dans le format demandé par l'hôte
    /// Encodes components in the format the host asked for
    pub fn from_components(color: ColorObject, format: ColorFormat) -> Self {
        match format {
            ColorFormat::Hex => Self(color.to_hex()),
            ColorFormat::Rgba => Self(color.to_rgba()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ColorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorResult {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ColorResult {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Issue terminale d'une présentation
/// Terminal outcome of one presentation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    /// The user confirmed a color
    Selected(ColorResult),
    /// The dialog closed without a confirmed color
    Dismissed,
}

impl PickerOutcome {
    /// Returns the selected color, if any
    pub fn selected(&self) -> Option<&ColorResult> {
        match self {
            PickerOutcome::Selected(color) => Some(color),
            PickerOutcome::Dismissed => None,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        matches!(self, PickerOutcome::Dismissed)
    }
}

// =============================================================================
// FONCTIONS DE FORMATAGE
// FORMATTING FUNCTIONS
// =============================================================================

/// Formate une couleur RGB en chaîne hexadécimale
/// Formats an RGB color as a hex string
///
/// # Returns
/// Chaîne au format "#RRGGBB" / String in "#RRGGBB" format
#[inline]
pub fn format_hex_color(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

// =============================================================================
// TESTS
// =============================================================================

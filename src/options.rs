// =============================================================================
// options.rs - Options recognized by the picker
// =============================================================================
//
// The host hands over an option map (JSON object). Recognized keys are read,
// unknown keys are ignored so richer UI layers can add their own.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::color::{self, ColorObject};
use crate::config;
use crate::error::{PickerError, PickerResult};

/// Encodage du résultat renvoyé à l'hôte
/// Encoding of the result handed back to the host
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// "#RRGGBB", or "#RRGGBBAA" for translucent colors
    #[default]
    Hex,
    /// "rgba(r, g, b, a)"
    #[serde(alias = "rgb")]
    Rgba,
}

/// Configuration d'une présentation du picker
/// Configuration of one picker presentation
///
/// Never mutated by the controller once a presentation begins; presenters
/// only get a shared reference.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfiguration {
    /// Couleur initiale, dans n'importe quel format reconnu
    /// Initial color, in any recognized format
    #[serde(deserialize_with = "deserialize_color")]
    color: String,

    /// Canal alpha proposé
    /// Alpha channel offered
    supports_alpha: bool,

    /// Titre du dialogue
    /// Dialog title
    title: String,

    /// Format du résultat
    /// Result format
    format: ColorFormat,
}

impl Default for PickerConfiguration {
    fn default() -> Self {
        Self {
            color: config::DEFAULT_COLOR.to_string(),
            supports_alpha: config::DEFAULT_SUPPORTS_ALPHA,
            title: config::DEFAULT_TITLE.to_string(),
            format: config::DEFAULT_FORMAT,
        }
    }
}

impl PickerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lit la configuration depuis une table d'options JSON
    /// Reads the configuration from a JSON option map
    ///
    /// `null` means "all defaults". Anything else but an object is rejected.
    pub fn from_value(value: Value) -> PickerResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(PickerError::InvalidConfiguration(format!(
                "expected an option object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Lit la configuration depuis du texte JSON
    /// Reads the configuration from JSON text
    pub fn from_json(text: &str) -> PickerResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_supports_alpha(mut self, supports_alpha: bool) -> Self {
        self.supports_alpha = supports_alpha;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_format(mut self, format: ColorFormat) -> Self {
        self.format = format;
        self
    }

    /// Initial color exactly as the host gave it
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn supports_alpha(&self) -> bool {
        self.supports_alpha
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Couleur initiale décodée, rouge si illisible
    /// Decoded initial color, red when unreadable
    pub fn initial_color(&self) -> ColorObject {
        match color::parse_color(self.color.trim()) {
            Some(parsed) if self.supports_alpha => parsed,
            Some(parsed) => ColorObject { a: 1.0, ..parsed },
            None => {
                debug!(color = %self.color, "unreadable initial color, falling back to default");
                ColorObject::default()
            }
        }
    }
}

// =============================================================================
// DÉSÉRIALISATION
// DESERIALIZATION
// =============================================================================

/// A color given either as a string or as an {r, g, b, a?} object
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Text(String),
    Components {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ColorInput::deserialize(deserializer)? {
        ColorInput::Text(text) => text,
        ColorInput::Components { r, g, b, a } => ColorObject::rgba(r, g, b, a).to_hex(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// TESTS
// =============================================================================

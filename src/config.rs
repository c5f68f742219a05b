//! Default option values shared across all platforms
//!
//! A `PickerConfiguration` falls back on these when the host leaves a key out.

use crate::options::ColorFormat;

/// Initial color shown when the host gives none, or gives one we cannot parse
/// Couleur initiale affichée si l'hôte n'en fournit pas, ou une illisible
pub const DEFAULT_COLOR: &str = "#FF0000";

/// Components of `DEFAULT_COLOR`, used as the parse fallback
/// Composantes de `DEFAULT_COLOR`, utilisées en cas d'échec du parsing
pub const DEFAULT_RGB: (u8, u8, u8) = (255, 0, 0);

/// Whether the alpha channel is offered by default
/// Indique si le canal alpha est proposé par défaut
pub const DEFAULT_SUPPORTS_ALPHA: bool = true;

/// Title of the dialog window (ignored by platforms without a titled picker)
/// Titre de la fenêtre du dialogue (ignoré par les plateformes sans titre)
pub const DEFAULT_TITLE: &str = "Select a Color";

/// Encoding of the `ColorResult` handed back to the host
/// Encodage du `ColorResult` renvoyé à l'hôte
pub const DEFAULT_FORMAT: ColorFormat = ColorFormat::Hex;

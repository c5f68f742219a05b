// =============================================================================
// color.rs - Conversions between the color encodings a host may hand us
// =============================================================================
//
// Hosts pass colors as "#RRGGBB" strings, "rgb()/rgba()" strings or as
// {r, g, b, a} objects. These helpers move between the three encodings.
// Nothing here does color-space math: components are copied, never converted.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::picker::common::format_hex_color;

// =============================================================================
// STRUCTURES
// =============================================================================

/// Couleur sous forme d'objet {r, g, b, a}
/// Color in object form {r, g, b, a}
///
/// `a` lies in `0.0..=1.0`, like the CSS alpha channel.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ColorObject {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Default for ColorObject {
    fn default() -> Self {
        let (r, g, b) = config::DEFAULT_RGB;
        Self { r, g, b, a: 1.0 }
    }
}

impl ColorObject {
    /// Creates an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with an alpha channel, clamped to `0.0..=1.0`
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: clamp_alpha(a) }
    }

    /// Formate en hexadécimal: "#RRGGBB", ou "#RRGGBBAA" si la couleur est translucide
    /// Formats as hex: "#RRGGBB", or "#RRGGBBAA" when the color is translucent
    pub fn to_hex(&self) -> String {
        if self.a < 1.0 {
            format!("{}{:02X}", format_hex_color(self.r, self.g, self.b), alpha_byte(self.a))
        } else {
            format_hex_color(self.r, self.g, self.b)
        }
    }

    /// Formate en "rgba(r, g, b, a)"
    /// Formats as "rgba(r, g, b, a)"
    pub fn to_rgba(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// CONVERSIONS PUBLIQUES
// PUBLIC CONVERSIONS
// =============================================================================

/// Convertit une couleur en hexadécimal
/// Converts a color to hex
///
/// Hex input is returned as-is. `rgba()` input keeps its alpha as a fourth
/// byte. Input in an unrecognized format is returned unchanged.
pub fn to_hex(color: &str) -> String {
    let color = color.trim();
    if color.starts_with('#') {
        return color.to_string();
    }

    if let Some(rgba) = parse_rgba_function(color) {
        // Alpha byte is always appended for rgba() input, even when opaque
        return format!(
            "{}{:02X}",
            format_hex_color(rgba.r, rgba.g, rgba.b),
            alpha_byte(rgba.a)
        );
    }

    if let Some(rgb) = parse_rgb_function(color) {
        return format_hex_color(rgb.r, rgb.g, rgb.b);
    }

    color.to_string()
}

/// Convertit une couleur en "rgba(r, g, b, a)"
/// Converts a color to "rgba(r, g, b, a)"
///
/// `rgba()` input is returned as-is. Anything unparsable yields opaque red.
pub fn to_rgba(color: &str) -> String {
    let color = color.trim();
    if color.starts_with("rgba") {
        return color.to_string();
    }

    parse_color(color).unwrap_or_default().to_rgba()
}

/// Convertit une couleur en objet {r, g, b, a}
/// Converts a color to an {r, g, b, a} object
///
/// Anything unparsable yields opaque red.
pub fn to_object(color: &str) -> ColorObject {
    parse_color(color.trim()).unwrap_or_default()
}

/// Parse une couleur dans n'importe quel format reconnu
/// Parses a color in any recognized format
pub fn parse_color(color: &str) -> Option<ColorObject> {
    if color.starts_with('#') {
        parse_hex(color)
    } else if color.starts_with("rgba") {
        parse_rgba_function(color)
    } else if color.starts_with("rgb") {
        parse_rgb_function(color)
    } else {
        None
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse "#RGB", "#RRGGBB" ou "#RRGGBBAA"
/// Parses "#RGB", "#RRGGBB" or "#RRGGBBAA"
fn parse_hex(hex: &str) -> Option<ColorObject> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => {
            // Chaque chiffre est doublé: "F0A" -> "FF00AA"
            // Each digit is doubled: "F0A" -> "FF00AA"
            let nibble = |i: usize| {
                u8::from_str_radix(&digits[i..i + 1], 16)
                    .ok()
                    .map(|n| n * 17)
            };
            Some(ColorObject::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(ColorObject::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => {
            let a = f32::from(byte(6)?) / 255.0;
            Some(ColorObject::rgba(byte(0)?, byte(2)?, byte(4)?, a))
        }
        _ => None,
    }
}

/// Parse "rgba(r, g, b, a)"
/// Parses "rgba(r, g, b, a)"
fn parse_rgba_function(color: &str) -> Option<ColorObject> {
    let parts = function_arguments(color, "rgba")?;
    let [r, g, b, a] = parts.as_slice() else {
        return None;
    };

    let a: f32 = a.parse().ok()?;
    if !a.is_finite() {
        return None;
    }
    Some(ColorObject::rgba(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?, a))
}

/// Parse "rgb(r, g, b)"
/// Parses "rgb(r, g, b)"
fn parse_rgb_function(color: &str) -> Option<ColorObject> {
    let parts = function_arguments(color, "rgb")?;
    let [r, g, b] = parts.as_slice() else {
        return None;
    };

    Some(ColorObject::rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?))
}

/// Extrait les arguments de "name(a, b, c)"
/// Extracts the arguments of "name(a, b, c)"
fn function_arguments<'a>(color: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = color
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    Some(inner.split(',').map(str::trim).collect())
}

#[inline]
fn clamp_alpha(a: f32) -> f32 {
    a.clamp(0.0, 1.0)
}

#[inline]
fn alpha_byte(a: f32) -> u8 {
    (clamp_alpha(a) * 255.0).round() as u8
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_passthrough() {
        assert_eq!(to_hex("#FF0000"), "#FF0000");
        assert_eq!(to_hex("#abc"), "#abc");
    }

    #[test]
    fn test_to_hex_from_functions() {
        // rgba garde l'octet alpha / rgba keeps the alpha byte
        assert_eq!(to_hex("rgba(255, 0, 0, 1)"), "#FF0000FF");
        assert_eq!(to_hex("rgba(0, 128, 255, 0.5)"), "#0080FF80");
        assert_eq!(to_hex("rgb(255, 0, 0)"), "#FF0000");
        assert_eq!(to_hex("rgb(1,2,3)"), "#010203");
    }

    #[test]
    fn test_to_hex_unrecognized() {
        assert_eq!(to_hex("papayawhip"), "papayawhip");
        assert_eq!(to_hex("rgb(300, 0, 0)"), "rgb(300, 0, 0)");
    }

    #[test]
    fn test_object_to_hex() {
        assert_eq!(ColorObject::rgb(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(ColorObject::rgba(255, 0, 0, 0.5).to_hex(), "#FF000080");
    }

    #[test]
    fn test_to_rgba() {
        assert_eq!(to_rgba("#FF0000"), "rgba(255, 0, 0, 1)");
        assert_eq!(to_rgba("#0F0"), "rgba(0, 255, 0, 1)");
        assert_eq!(to_rgba("rgba(255, 0, 0, 1)"), "rgba(255, 0, 0, 1)");
        assert_eq!(to_rgba("rgb(255, 0, 0)"), "rgba(255, 0, 0, 1)");
        assert_eq!(ColorObject::rgba(255, 0, 0, 0.5).to_rgba(), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_to_rgba_fallback() {
        assert_eq!(to_rgba("not a color"), "rgba(255, 0, 0, 1)");
        assert_eq!(to_rgba("#12345"), "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn test_to_object() {
        assert_eq!(to_object("#FF0000"), ColorObject::rgb(255, 0, 0));
        assert_eq!(to_object("rgba(255, 0, 0, 0.5)"), ColorObject::rgba(255, 0, 0, 0.5));
        assert_eq!(to_object("rgb(255, 0, 0)"), ColorObject::rgb(255, 0, 0));
        assert_eq!(to_object("#00FF0080").a, 128.0 / 255.0);
    }

    #[test]
    fn test_to_object_fallback() {
        assert_eq!(to_object(""), ColorObject::default());
        assert_eq!(to_object("#GG0000"), ColorObject::default());
        assert_eq!(to_object("hsl(0, 100%, 50%)"), ColorObject::default());
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(ColorObject::rgba(0, 0, 0, 4.0).a, 1.0);
        assert_eq!(to_object("rgba(0, 0, 0, -1)").a, 0.0);
    }
}

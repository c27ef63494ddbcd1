//! Player Colors
//!
//! Cosmetic only. A player's color is a pure function of their name so
//! every observer renders the same fleet in the same hue.

use sha2::{Sha256, Digest};

/// Color used when a name is empty after trimming.
pub const FALLBACK_COLOR: &str = "#808080";

const SATURATION: f64 = 0.75;
const LIGHTNESS: f64 = 0.50;

/// Derive a `#RRGGBB` color from a player name.
///
/// The first 8 bytes of the SHA-256 of the trimmed name pick the hue;
/// saturation and lightness are fixed.
pub fn generate_hex_color(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FALLBACK_COLOR.to_string();
    }

    let digest = Sha256::digest(trimmed.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let hue = (u64::from_be_bytes(prefix) % 360) as f64;

    let (r, g, b) = hsl_to_rgb(hue, SATURATION, LIGHTNESS);
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Convert HSL (hue in degrees) to 8-bit RGB.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h / 360.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 1.0 / 6.0 => (c, x, 0.0),
        h if h < 2.0 / 6.0 => (x, c, 0.0),
        h if h < 3.0 / 6.0 => (0.0, c, x),
        h if h < 4.0 / 6.0 => (0.0, x, c),
        h if h < 5.0 / 6.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (channel(r + m), channel(g + m), channel(b + m))
}

#[inline]
fn channel(value: f64) -> u8 {
    ((value * 255.0) as i32).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_colors() {
        assert_eq!(generate_hex_color("alice"), "#1FDFB5");
        assert_eq!(generate_hex_color("bob"), "#1FDFBF");
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(generate_hex_color("  alice  "), generate_hex_color("alice"));
    }

    #[test]
    fn test_empty_name_falls_back() {
        assert_eq!(generate_hex_color(""), FALLBACK_COLOR);
        assert_eq!(generate_hex_color("   \t"), FALLBACK_COLOR);
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
    }
}

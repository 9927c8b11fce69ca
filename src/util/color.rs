//! Hex color helpers for the cupboard picker and material presets.

use glam::Vec3;

/// Convert a packed `0xRRGGBB` value into an RGB triple in [0, 1].
pub fn from_hex_u32(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// Parse `#rrggbb` (or `rrggbb`) into an RGB triple. Returns `None` for
/// anything else.
pub fn parse_hex(text: &str) -> Option<Vec3> {
    let digits = text.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(from_hex_u32)
}

/// Format an RGB triple as lowercase `#rrggbb`.
pub fn to_hex(color: Vec3) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.x),
        channel(color.y),
        channel(color.z)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#ffffff"), Some(Vec3::ONE));
        assert_eq!(parse_hex("000000"), Some(Vec3::ZERO));
        assert_eq!(to_hex(parse_hex("#5C555B").unwrap_or_default()), "#5c555b");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gggggg"), None);
        assert_eq!(parse_hex(""), None);
    }
}

//! Image payload decoding.

use crate::error::LoadError;

/// 8-bit RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// Floating-point RGBA panorama.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEnvironment {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major linear RGBA32F pixels.
    pub pixels: Vec<f32>,
}

/// Decode a color texture (PNG, JPEG or WebP) to RGBA8.
///
/// Rows stay in file order: glTF texture coordinates address images from
/// the top-left corner, so no vertical flip is applied.
pub fn decode_texture(path: &str, bytes: &[u8]) -> Result<DecodedImage, LoadError> {
    let image = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    let rgba = image.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Decode an equirectangular HDR panorama to linear RGBA32F.
pub fn decode_environment(
    path: &str,
    bytes: &[u8],
) -> Result<DecodedEnvironment, LoadError> {
    let image = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    let rgba = image.to_rgba32f();
    Ok(DecodedEnvironment {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::png;

    #[test]
    fn png_decodes_to_rgba() {
        let bytes = png(2, 3, [10, 20, 30, 255]);
        let image = decode_texture("/t.png", &bytes).unwrap();
        assert_eq!((image.width, image.height), (2, 3));
        assert_eq!(image.pixels.len(), 2 * 3 * 4);
        assert_eq!(&image.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn environment_accepts_ldr_input() {
        let bytes = png(1, 1, [255, 0, 0, 255]);
        let env = decode_environment("/e.png", &bytes).unwrap();
        assert_eq!(env.pixels.len(), 4);
        assert!((env.pixels[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn garbage_reports_the_path() {
        let err = decode_texture("/bad.webp", b"nope").unwrap_err();
        assert_eq!(err.path(), "/bad.webp");
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}

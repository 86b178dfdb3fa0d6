/// Decoded RGBA8 image, rows top to bottom, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Checks the invariants backends rely on when uploading.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("image has zero size ({}x{})", self.width, self.height));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(format!(
                "pixel buffer is {} bytes, expected {expected} for {}x{} RGBA8",
                self.pixels.len(),
                self.width,
                self.height
            ));
        }
        Ok(())
    }
}

/// Image decode service: encoded bytes in, RGBA8 pixels out.
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, String>;
}

/// [`ImageDecoder`] backed by the `image` crate (PNG and JPEG).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, String> {
        let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DecodedImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_builtin_png() {
        let bytes = include_bytes!("../../assets/texture.png");
        let img = ImageCrateDecoder.decode(bytes).unwrap();
        assert_eq!((img.width, img.height), (64, 64));
        assert!(img.validate().is_ok());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(ImageCrateDecoder.decode(b"definitely not an image").is_err());
    }

    #[test]
    fn validate_rejects_short_buffer() {
        let img = DecodedImage { width: 2, height: 2, pixels: vec![0; 15] };
        assert!(img.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_size() {
        let img = DecodedImage { width: 0, height: 4, pixels: Vec::new() };
        assert!(img.validate().is_err());
    }
}

use crate::error::CardError;

/// Pixel dimensions of a rendered card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorySpec {
    pub width: u32,
    pub height: u32,
}

impl StorySpec {
    /// Full-size vertical story: 1080x1920
    pub const STORY: Self = Self {
        width: 1080,
        height: 1920,
    };

    /// Quarter-size preview shown before download: 270x480
    pub const PREVIEW: Self = Self {
        width: 270,
        height: 480,
    };

    /// Scale factor that maps the full story canvas onto this spec
    pub fn scale_from_story(&self) -> f32 {
        self.width as f32 / Self::STORY.width as f32
    }

    /// Check that an encoded image matches this spec
    pub fn validate_png(&self, png_bytes: &[u8]) -> Result<(), CardError> {
        let decoder = png::Decoder::new(std::io::Cursor::new(png_bytes));
        let reader = decoder
            .read_info()
            .map_err(|e| CardError::ImageEncoding(e.to_string()))?;
        let info = reader.info();
        if info.width != self.width || info.height != self.height {
            return Err(CardError::ImageEncoding(format!(
                "encoded {}x{}, expected {}x{}",
                info.width, info.height, self.width, self.height
            )));
        }
        Ok(())
    }
}

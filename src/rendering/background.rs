//! Background layer: a decoded photo under a dark overlay, or the default
//! purple-magenta-amber gradient.

use tiny_skia::{IntSize, Pixmap};

use super::surface::DrawingSurface;
use crate::error::CardError;

/// Gradient stops drawn when the card has no background image
pub const GRADIENT_STOPS: [(f32, [u8; 3]); 3] = [
    (0.0, [0x8B, 0x5C, 0xF6]),
    (0.5, [0xD9, 0x46, 0xEF]),
    (1.0, [0xF5, 0x9E, 0x0B]),
];

/// Opacity of the black layer drawn over a background photo
pub const PHOTO_OVERLAY_OPACITY: f32 = 0.5;

/// Background source for one render
pub enum Background {
    Gradient,
    Image(Pixmap),
}

impl Background {
    /// Decode an encoded image (PNG, JPEG, GIF, WebP)
    pub fn decode(bytes: &[u8]) -> Result<Self, CardError> {
        decode_image(bytes).map(Background::Image)
    }

    /// Paint this background over the whole surface
    pub fn paint(&self, surface: &mut DrawingSurface) {
        match self {
            Background::Gradient => surface.fill_diagonal_gradient(&GRADIENT_STOPS),
            Background::Image(image) => {
                surface.draw_stretched(image);
                surface.fill_overlay([0, 0, 0], PHOTO_OVERLAY_OPACITY);
            }
        }
    }
}

/// Decode encoded image bytes into a premultiplied pixmap.
pub fn decode_image(bytes: &[u8]) -> Result<Pixmap, CardError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CardError::ImageLoad(format!("decode failed: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| CardError::ImageLoad(format!("invalid image size {width}x{height}")))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| CardError::ImageLoad("image does not fit a pixmap".to_string()))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

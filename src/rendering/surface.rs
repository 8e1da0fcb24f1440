//! Per-render drawing surface.
//!
//! Every render acquires its own pixmap; nothing is shared between calls.
//! The surface is released when dropped, or consumed by [`DrawingSurface::encode_png`].

use std::io::Cursor;
use tiny_skia::{
    Color, FilterQuality, GradientStop, LinearGradient, Paint, Pixmap, PixmapPaint, Point, Rect,
    SpreadMode, Transform,
};

use crate::error::CardError;
use crate::models::StorySpec;

/// An owned RGBA canvas of fixed size
pub struct DrawingSurface {
    pixmap: Pixmap,
    spec: StorySpec,
}

impl DrawingSurface {
    /// Allocate a transparent surface
    pub fn acquire(spec: StorySpec) -> Result<Self, CardError> {
        let pixmap = Pixmap::new(spec.width, spec.height).ok_or(
            CardError::DrawingSurfaceUnavailable {
                width: spec.width,
                height: spec.height,
            },
        )?;
        Ok(Self { pixmap, spec })
    }

    pub fn spec(&self) -> StorySpec {
        self.spec
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    fn full_rect(&self) -> Option<Rect> {
        Rect::from_xywh(0.0, 0.0, self.spec.width as f32, self.spec.height as f32)
    }

    /// Fill the whole surface with a linear gradient running from the
    /// top-left corner to the bottom-right corner.
    pub fn fill_diagonal_gradient(&mut self, stops: &[(f32, [u8; 3])]) {
        let Some(rect) = self.full_rect() else {
            return;
        };
        let stops = stops
            .iter()
            .map(|&(pos, [r, g, b])| GradientStop::new(pos, Color::from_rgba8(r, g, b, 255)))
            .collect();
        let Some(shader) = LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(self.spec.width as f32, self.spec.height as f32),
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };

        let paint = Paint {
            shader,
            anti_alias: false,
            ..Default::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Cover the whole surface with a translucent color
    pub fn fill_overlay(&mut self, rgb: [u8; 3], opacity: f32) {
        let Some(rect) = self.full_rect() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
            opacity,
        ).unwrap_or(Color::BLACK));
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Draw `image` stretched over the whole surface, ignoring aspect ratio
    pub fn draw_stretched(&mut self, image: &Pixmap) {
        let scale_x = self.spec.width as f32 / image.width() as f32;
        let scale_y = self.spec.height as f32 / image.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..Default::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_scale(scale_x, scale_y),
            None,
        );
    }

    /// Produce a smaller copy of this surface
    pub fn downsample(&self, spec: StorySpec) -> Result<DrawingSurface, CardError> {
        let mut target = DrawingSurface::acquire(spec)?;
        target.draw_stretched(&self.pixmap);
        Ok(target)
    }

    /// Straight (non-premultiplied) RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.spec.width || y >= self.spec.height {
            return None;
        }
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Serialize to PNG, consuming the surface.
    ///
    /// An encoder failure or an empty buffer is an [`CardError::ImageEncoding`].
    pub fn encode_png(self, optimize: bool) -> Result<Vec<u8>, CardError> {
        let rgba: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, self.spec.width, self.spec.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(png::Compression::Default);
            let mut writer = encoder
                .write_header()
                .map_err(|e| CardError::ImageEncoding(e.to_string()))?;
            writer
                .write_image_data(&rgba)
                .map_err(|e| CardError::ImageEncoding(e.to_string()))?;
        }
        let png_bytes = buf.into_inner();

        if png_bytes.is_empty() {
            return Err(CardError::ImageEncoding("encoder produced no data".to_string()));
        }

        if !optimize {
            return Ok(png_bytes);
        }

        match oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..oxipng::Options::from_preset(2)
            },
        ) {
            Ok(optimized) if !optimized.is_empty() => Ok(optimized),
            Ok(_) => Ok(png_bytes),
            Err(e) => {
                tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
                Ok(png_bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: StorySpec = StorySpec {
        width: 40,
        height: 80,
    };

    #[test]
    fn test_acquire_zero_size_fails() {
        let err = DrawingSurface::acquire(StorySpec {
            width: 0,
            height: 1920,
        })
        .err()
        .unwrap();
        assert!(matches!(
            err,
            CardError::DrawingSurfaceUnavailable {
                width: 0,
                height: 1920
            }
        ));
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = DrawingSurface::acquire(SMALL).unwrap();
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(40, 0), None);
    }

    #[test]
    fn test_pixel_out_of_bounds_does_not_wrap() {
        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.pixmap_mut().fill(Color::WHITE);

        assert_eq!(surface.pixel(39, 79), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(40, 0), None);
        assert_eq!(surface.pixel(100, 1), None);
        assert_eq!(surface.pixel(0, 80), None);
    }

    #[test]
    fn test_overlay_darkens_white() {
        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.pixmap_mut().fill(Color::WHITE);
        surface.fill_overlay([0, 0, 0], 0.5);

        let [r, g, b, a] = surface.pixel(10, 10).unwrap();
        assert_eq!(a, 255);
        for channel in [r, g, b] {
            assert!((126..=129).contains(&channel), "got {channel}");
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.fill_diagonal_gradient(&[(0.0, [255, 0, 0]), (1.0, [0, 0, 255])]);

        let [r, _, b, _] = surface.pixel(0, 0).unwrap();
        assert!(r > 240 && b < 15);
        let [r, _, b, _] = surface.pixel(39, 79).unwrap();
        assert!(r < 15 && b > 240);
    }

    #[test]
    fn test_stretch_fills_surface() {
        let mut source = Pixmap::new(2, 2).unwrap();
        source.fill(Color::from_rgba8(0, 200, 0, 255));

        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.draw_stretched(&source);

        let [r, g, b, a] = surface.pixel(20, 40).unwrap();
        assert_eq!(a, 255);
        assert!(r < 3 && b < 3);
        assert!((197..=203).contains(&g), "got {g}");
    }

    #[test]
    fn test_downsample_dimensions() {
        let surface = DrawingSurface::acquire(SMALL).unwrap();
        let small = surface
            .downsample(StorySpec {
                width: 10,
                height: 20,
            })
            .unwrap();
        assert_eq!(small.pixmap().width(), 10);
        assert_eq!(small.pixmap().height(), 20);
    }

    #[test]
    fn test_encode_png_signature_and_size() {
        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.pixmap_mut().fill(Color::WHITE);
        let png_bytes = surface.encode_png(false).unwrap();

        assert_eq!(&png_bytes[0..8], b"\x89PNG\r\n\x1a\n");
        SMALL.validate_png(&png_bytes).unwrap();
    }

    #[test]
    fn test_encode_png_optimized_is_valid() {
        let mut surface = DrawingSurface::acquire(SMALL).unwrap();
        surface.fill_diagonal_gradient(&[(0.0, [10, 20, 30]), (1.0, [200, 100, 50])]);
        let png_bytes = surface.encode_png(true).unwrap();
        SMALL.validate_png(&png_bytes).unwrap();
    }
}

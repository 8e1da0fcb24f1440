use resvg::usvg::{self, Transform};
use std::borrow::Cow;
use std::sync::Arc;

use super::surface::DrawingSurface;
use crate::error::CardError;

/// Draws SVG documents onto a drawing surface.
///
/// Owns the font database used for SVG text; the same database backs the
/// text measurer so wrapping and drawing agree on glyph widths.
pub struct SvgRasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    /// Create a rasterizer with fonts loaded from the provided data
    pub fn with_fonts(fonts: Vec<(String, Cow<'static, [u8]>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data.into_owned());
            tracing::debug!(font = %name, "Loaded font");
        }

        // System fonts as fallback
        fontdb.load_system_fonts();

        tracing::info!(font_count = fontdb.len(), "Loaded fonts for card text");

        let families: std::collections::BTreeSet<_> = fontdb
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect();
        tracing::debug!(families = ?families, "Available font families");

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a rasterizer with system fonts only
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Shared font database
    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        self.fontdb.clone()
    }

    /// Parse `svg` and draw it over the surface, scaled to the surface size
    pub fn draw(&self, svg: &str, surface: &mut DrawingSurface) -> Result<(), CardError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| CardError::Template(format!("SVG parse error: {e}")))?;

        let spec = surface.spec();
        let svg_size = tree.size();
        let scale_x = spec.width as f32 / svg_size.width();
        let scale_y = spec.height as f32 / svg_size.height();

        resvg::render(
            &tree,
            Transform::from_scale(scale_x, scale_y),
            &mut surface.pixmap_mut().as_mut(),
        );
        Ok(())
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

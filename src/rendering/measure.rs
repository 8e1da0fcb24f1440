//! Text width measurement.
//!
//! The word-wrap needs the advance width of a candidate line in the same
//! font the rasterizer will draw with. [`FontMeasurer`] resolves the generic
//! `sans-serif` family through the shared font database and sums horizontal
//! glyph advances, the way a canvas `measureText` reports width (trailing
//! spaces included).
//!
//! Pair kerning from the legacy `kern` table is applied. GPOS kerning,
//! ligatures and per-glyph font fallback are not: characters the face has
//! no glyph for are estimated at a fixed fraction of the font size. resvg
//! shapes the drawn text fully, so a line close to the block width can be
//! drawn a few pixels wider or narrower than it was measured.

use std::sync::Arc;

/// Font weight used by the card template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// Value for the SVG `font-weight` attribute
    pub fn svg_value(&self) -> &'static str {
        match self {
            FontWeight::Regular => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Font settings for a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub weight: FontWeight,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }
}

/// Measures the rendered width of a string in pixels
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, style: TextStyle) -> f32;
}

/// Average advance (in em) assumed when no font face is available
const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Measures text with the faces the renderer will use
pub struct FontMeasurer {
    fontdb: Arc<fontdb::Database>,
    regular: Option<fontdb::ID>,
    bold: Option<fontdb::ID>,
}

impl FontMeasurer {
    pub fn new(fontdb: Arc<fontdb::Database>) -> Self {
        let regular = query_sans(&fontdb, fontdb::Weight::NORMAL);
        let bold = query_sans(&fontdb, fontdb::Weight::BOLD).or(regular);

        if regular.is_none() {
            tracing::warn!(
                font_count = fontdb.len(),
                "No sans-serif face found, text widths will be estimated"
            );
        }

        Self {
            fontdb,
            regular,
            bold,
        }
    }

    fn face_for(&self, weight: FontWeight) -> Option<fontdb::ID> {
        match weight {
            FontWeight::Regular => self.regular,
            FontWeight::Bold => self.bold,
        }
    }

    fn advance_width(&self, id: fontdb::ID, text: &str, size: f32) -> Option<f32> {
        self.fontdb
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let scale = size / face.units_per_em() as f32;

                let mut width = 0.0;
                let mut previous = None;
                for ch in text.chars() {
                    let Some(glyph) = face.glyph_index(ch) else {
                        width += size * FALLBACK_ADVANCE_EM;
                        previous = None;
                        continue;
                    };
                    width += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
                    if let Some(left) = previous {
                        width += pair_kerning(&face, left, glyph) as f32 * scale;
                    }
                    previous = Some(glyph);
                }
                Some(width)
            })
            .flatten()
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> f32 {
        self.face_for(style.weight)
            .and_then(|id| self.advance_width(id, text, style.size))
            .unwrap_or_else(|| estimate_width(text, style.size, FALLBACK_ADVANCE_EM))
    }
}

/// Horizontal adjustment for a glyph pair from the `kern` table, in font units
fn pair_kerning(face: &ttf_parser::Face, left: ttf_parser::GlyphId, right: ttf_parser::GlyphId) -> i16 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|st| st.horizontal && !st.variable && !st.has_cross_stream)
        .find_map(|st| st.glyphs_kerning(left, right))
        .unwrap_or(0)
}

fn query_sans(fontdb: &fontdb::Database, weight: fontdb::Weight) -> Option<fontdb::ID> {
    fontdb.query(&fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    })
}

fn estimate_width(text: &str, size: f32, advance_em: f32) -> f32 {
    text.chars().count() as f32 * size * advance_em
}

/// Every character advances by the same fraction of the font size.
///
/// Used where widths must not depend on installed fonts.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMeasurer {
    pub advance_em: f32,
}

impl FixedAdvanceMeasurer {
    pub fn new(advance_em: f32) -> Self {
        Self { advance_em }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> f32 {
        estimate_width(text, style.size, self.advance_em)
    }
}

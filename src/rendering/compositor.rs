//! Story card compositor.
//!
//! A render runs in three layers on a freshly acquired 1080x1920 surface:
//!
//! 1. Background: stretched photo under a 50% black overlay, or the
//!    diagonal brand gradient.
//! 2. Foreground: the card template (pills, wrapped title, capped
//!    description, call-to-action) rendered to SVG and rasterized.
//! 3. Export: PNG serialization of the surface.
//!
//! The compositor holds only read-only state (fonts, parsed template), so
//! one instance can serve concurrent renders.

use std::borrow::Cow;
use std::sync::Arc;

use super::background::Background;
use super::layout::CardLayout;
use super::measure::{FontMeasurer, TextMeasurer};
use super::rasterizer::SvgRasterizer;
use super::surface::DrawingSurface;
use super::template::CardTemplate;
use crate::assets::{AssetLoader, CARD_TEMPLATE};
use crate::error::CardError;
use crate::models::{CardRequest, RenderedCard, StorySpec};

pub struct CardCompositor {
    rasterizer: SvgRasterizer,
    measurer: Arc<dyn TextMeasurer>,
    template: CardTemplate,
    optimize_png: bool,
}

impl CardCompositor {
    /// Build a compositor from loaded assets, measuring text with the
    /// same fonts the rasterizer draws with.
    pub fn from_assets(loader: &AssetLoader, optimize_png: bool) -> Result<Self, CardError> {
        Self::with_fonts(loader.get_fonts(), &read_card_template(loader)?, optimize_png)
    }

    pub fn with_fonts(
        fonts: Vec<(String, Cow<'static, [u8]>)>,
        template_source: &str,
        optimize_png: bool,
    ) -> Result<Self, CardError> {
        let rasterizer = SvgRasterizer::with_fonts(fonts);
        let measurer = Arc::new(FontMeasurer::new(rasterizer.fontdb()));
        Self::new(rasterizer, measurer, template_source, optimize_png)
    }

    /// Build a compositor with an explicit text measurer
    pub fn new(
        rasterizer: SvgRasterizer,
        measurer: Arc<dyn TextMeasurer>,
        template_source: &str,
        optimize_png: bool,
    ) -> Result<Self, CardError> {
        Ok(Self {
            rasterizer,
            measurer,
            template: CardTemplate::new(template_source)?,
            optimize_png,
        })
    }

    /// Wrap the card's text blocks
    pub fn layout(&self, request: &CardRequest) -> CardLayout {
        CardLayout::compute(request, self.measurer.as_ref())
    }

    /// Foreground SVG for a request
    pub fn foreground_svg(&self, request: &CardRequest, hostname: &str) -> Result<String, CardError> {
        let layout = self.layout(request);
        self.template.render(request, &layout, hostname)
    }

    /// Draw every layer onto a new full-size surface
    pub fn compose(
        &self,
        request: &CardRequest,
        background: &Background,
        hostname: &str,
    ) -> Result<DrawingSurface, CardError> {
        let mut surface = DrawingSurface::acquire(StorySpec::STORY)?;
        background.paint(&mut surface);

        let svg = self.foreground_svg(request, hostname)?;
        self.rasterizer.draw(&svg, &mut surface)?;
        Ok(surface)
    }

    /// Render the full 1080x1920 card
    pub fn render(
        &self,
        request: &CardRequest,
        background: &Background,
        hostname: &str,
    ) -> Result<RenderedCard, CardError> {
        let surface = self.compose(request, background, hostname)?;
        self.export(surface, request)
    }

    /// Render the card and shrink it to the 270x480 preview size
    pub fn preview(
        &self,
        request: &CardRequest,
        background: &Background,
        hostname: &str,
    ) -> Result<RenderedCard, CardError> {
        let full = self.compose(request, background, hostname)?;
        let preview = full.downsample(StorySpec::PREVIEW)?;
        drop(full);
        self.export(preview, request)
    }

    fn export(&self, surface: DrawingSurface, request: &CardRequest) -> Result<RenderedCard, CardError> {
        let spec = surface.spec();
        let png_bytes = surface.encode_png(self.optimize_png)?;
        let card = RenderedCard {
            png_bytes,
            width: spec.width,
            height: spec.height,
            filename: request.suggested_filename(),
        };

        tracing::info!(
            filename = %card.filename,
            width = card.width,
            height = card.height,
            size_bytes = card.png_bytes.len(),
            "Card rendered"
        );
        Ok(card)
    }
}

fn read_card_template(loader: &AssetLoader) -> Result<String, CardError> {
    loader
        .read_template(CARD_TEMPLATE)
        .map_err(|e| CardError::Template(e.to_string()))
}

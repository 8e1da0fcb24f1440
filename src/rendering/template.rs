use serde::Serialize;
use tera::{Context, Tera};

use super::layout::{CardLayout, TextLine, DESCRIPTION_BLOCK, TITLE_BLOCK};
use crate::error::CardError;
use crate::models::{CardRequest, StorySpec};

const TEMPLATE_NAME: &str = "card.svg";

/// Values the card template is rendered with
#[derive(Debug, Serialize)]
struct CardContext<'a> {
    width: u32,
    height: u32,
    category: &'a str,
    duration: &'a str,
    location_type: &'a str,
    hostname: &'a str,
    title_font_size: f32,
    title_font_weight: &'static str,
    title_lines: &'a [TextLine],
    description_font_size: f32,
    description_font_weight: &'static str,
    description_lines: &'a [TextLine],
}

/// Renders the card foreground (everything above the background) as SVG
pub struct CardTemplate {
    tera: Tera,
}

impl CardTemplate {
    /// Parse the template source once; rendering only reads it afterwards
    pub fn new(source: &str) -> Result<Self, CardError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".svg"]);
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    pub fn render(
        &self,
        request: &CardRequest,
        layout: &CardLayout,
        hostname: &str,
    ) -> Result<String, CardError> {
        let data = CardContext {
            width: StorySpec::STORY.width,
            height: StorySpec::STORY.height,
            category: &request.category,
            duration: &request.duration,
            location_type: &request.location_type,
            hostname,
            title_font_size: TITLE_BLOCK.style.size,
            title_font_weight: TITLE_BLOCK.style.weight.svg_value(),
            title_lines: &layout.title.lines,
            description_font_size: DESCRIPTION_BLOCK.style.size,
            description_font_weight: DESCRIPTION_BLOCK.style.weight.svg_value(),
            description_lines: &layout.description.lines,
        };

        let context = Context::from_serialize(&data)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

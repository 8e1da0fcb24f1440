//! Test fixtures and constants.

use std::io::Cursor;
use std::sync::Arc;

use storycard::assets::{AssetLoader, CARD_TEMPLATE};
use storycard::models::{BackgroundConfig, BackgroundFailure, CardRequest};
use storycard::rendering::{CardCompositor, FixedAdvanceMeasurer, SvgRasterizer};
use storycard::services::{CardService, HttpImageSource};

/// 400 words of filler prose
pub fn lorem_400() -> String {
    const WORDS: [&str; 8] = [
        "lorem",
        "ipsum",
        "dolor",
        "sit",
        "amet",
        "consectetur",
        "adipiscing",
        "elit",
    ];
    (0..400)
        .map(|i| WORDS[i % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// A typical card request without a background image
pub fn card(title: &str) -> CardRequest {
    CardRequest {
        title: title.to_string(),
        category: "Technology".to_string(),
        duration: "4 hours".to_string(),
        location_type: "Virtual".to_string(),
        description: "Pair with a senior engineer through code review and a deploy".to_string(),
        background_image_url: None,
    }
}

/// JSON body for the card endpoints
pub fn card_json(title: &str) -> String {
    serde_json::to_string(&card(title)).unwrap()
}

/// A solid-color PNG of the given size
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode fixture PNG");
    out.into_inner()
}

/// Compositor measuring text at a fixed half-em advance, independent of
/// installed fonts
pub fn compositor() -> CardCompositor {
    let template = AssetLoader::new(None, None)
        .read_template(CARD_TEMPLATE)
        .expect("Embedded card template");
    CardCompositor::new(
        SvgRasterizer::with_fonts(Vec::new()),
        Arc::new(FixedAdvanceMeasurer::default()),
        &template,
        false,
    )
    .expect("Failed to build compositor")
}

/// Card service over [`compositor`] and the HTTP image source
pub fn card_service(background: BackgroundConfig) -> CardService {
    let images = HttpImageSource::new(&background).expect("Failed to build image source");
    CardService::new(Arc::new(compositor()), Arc::new(images), background.on_failure)
}

/// Background config that falls back to the gradient
pub fn gradient_fallback() -> BackgroundConfig {
    BackgroundConfig {
        on_failure: BackgroundFailure::Gradient,
        ..Default::default()
    }
}

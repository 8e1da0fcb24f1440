use std::sync::Arc;

use super::download_sink::DownloadSink;
use super::image_source::{HttpImageSource, ImageSource};
use super::origin::OriginProvider;
use crate::assets::AssetLoader;
use crate::error::CardError;
use crate::models::{AppConfig, BackgroundFailure, CardRequest, RenderedCard};
use crate::rendering::{Background, CardCompositor};

#[derive(Clone, Copy)]
enum Output {
    Full,
    Preview,
}

/// Service for rendering story cards
///
/// Background fetching stays on the async runtime; decoding, drawing and
/// encoding run on the blocking pool.
#[derive(Clone)]
pub struct CardService {
    compositor: Arc<CardCompositor>,
    images: Arc<dyn ImageSource>,
    on_failure: BackgroundFailure,
}

impl CardService {
    pub fn new(
        compositor: Arc<CardCompositor>,
        images: Arc<dyn ImageSource>,
        on_failure: BackgroundFailure,
    ) -> Self {
        Self {
            compositor,
            images,
            on_failure,
        }
    }

    /// Wire the default collaborators from assets and configuration
    pub fn from_config(loader: &AssetLoader, config: &AppConfig) -> Result<Self, CardError> {
        let compositor = CardCompositor::from_assets(loader, config.output.optimize_png)?;
        let images = HttpImageSource::new(&config.background)?;
        Ok(Self::new(
            Arc::new(compositor),
            Arc::new(images),
            config.background.on_failure,
        ))
    }

    /// Render the full-size card
    pub async fn render(
        &self,
        request: &CardRequest,
        origin: &dyn OriginProvider,
    ) -> Result<RenderedCard, CardError> {
        self.run(request, origin, Output::Full).await
    }

    /// Render the 270x480 preview
    pub async fn preview(
        &self,
        request: &CardRequest,
        origin: &dyn OriginProvider,
    ) -> Result<RenderedCard, CardError> {
        self.run(request, origin, Output::Preview).await
    }

    /// Render the full-size card and hand it to a download sink
    pub async fn share(
        &self,
        request: &CardRequest,
        origin: &dyn OriginProvider,
        sink: &dyn DownloadSink,
    ) -> Result<RenderedCard, CardError> {
        let card = self.render(request, origin).await?;
        sink.deliver(&card.filename, &card.png_bytes)?;
        Ok(card)
    }

    async fn run(
        &self,
        request: &CardRequest,
        origin: &dyn OriginProvider,
        output: Output,
    ) -> Result<RenderedCard, CardError> {
        let image = self.fetch_background(request).await?;
        let hostname = origin.hostname();
        let compositor = self.compositor.clone();
        let request = request.clone();
        let on_failure = self.on_failure;

        tokio::task::spawn_blocking(move || {
            let background = match image {
                Some(bytes) => decode_or_fallback(&bytes, on_failure)?,
                None => Background::Gradient,
            };
            match output {
                Output::Full => compositor.render(&request, &background, &hostname),
                Output::Preview => compositor.preview(&request, &background, &hostname),
            }
        })
        .await
        .map_err(|e| CardError::Task(e.to_string()))?
    }

    async fn fetch_background(
        &self,
        request: &CardRequest,
    ) -> Result<Option<Arc<Vec<u8>>>, CardError> {
        let Some(url) = request.background_url() else {
            return Ok(None);
        };

        match self.images.load(url).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if self.on_failure == BackgroundFailure::Gradient => {
                tracing::warn!(url = %url, error = %e, "Background unavailable, using gradient");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Background unavailable");
                Err(e)
            }
        }
    }
}

fn decode_or_fallback(bytes: &[u8], on_failure: BackgroundFailure) -> Result<Background, CardError> {
    match Background::decode(bytes) {
        Ok(background) => Ok(background),
        Err(e) if on_failure == BackgroundFailure::Gradient => {
            tracing::warn!(error = %e, "Background undecodable, using gradient");
            Ok(Background::Gradient)
        }
        Err(e) => Err(e),
    }
}

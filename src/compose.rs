//! Share image composition: request → scene → pixels → encoded bytes.

pub(crate) mod layout;
pub(crate) mod request;
pub(crate) mod scene;

use std::sync::Arc;
use std::time::Duration;

use crate::encode::{
    DEFAULT_ENCODE_TIMEOUT, EncodedImage, ImageCrateEncoder, ImageEncoder, encode_with_timeout,
};
use crate::foundation::error::RiddleResult;
use crate::media::VideoFrame;
use crate::render::{CpuRenderer, FrameRGBA};
use crate::text::engine::TextLayoutEngine;
use crate::text::fonts::FontSet;

pub use layout::{ShareLayout, aspect_fill};
pub use request::{BACKGROUND_SHADE, CaptureRequest, OutputFormat, ShareTexts};
pub use scene::{CameraFill, DrawOp, Paint, ShareScene, TextBaseline, TextRun, build_share_scene};

/// Owns the text engine, rasterizer and encoder used to produce share images.
pub struct Compositor<E = ImageCrateEncoder> {
    layout: ShareLayout,
    text: TextLayoutEngine,
    renderer: CpuRenderer,
    encoder: Arc<E>,
    encode_timeout: Duration,
}

impl Compositor<ImageCrateEncoder> {
    pub fn new(fonts: FontSet) -> Self {
        Self::with_encoder(fonts, ImageCrateEncoder)
    }
}

impl<E: ImageEncoder> Compositor<E> {
    pub fn with_encoder(fonts: FontSet, encoder: E) -> Self {
        if fonts.is_empty() {
            tracing::warn!("compositor has no fonts; share images will carry no text");
        }
        Self {
            layout: ShareLayout::default(),
            text: TextLayoutEngine::new(fonts),
            renderer: CpuRenderer::new(),
            encoder: Arc::new(encoder),
            encode_timeout: DEFAULT_ENCODE_TIMEOUT,
        }
    }

    pub fn with_layout(mut self, layout: ShareLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_encode_timeout(mut self, timeout: Duration) -> Self {
        self.encode_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &ShareLayout {
        &self.layout
    }

    pub fn encode_timeout(&self) -> Duration {
        self.encode_timeout
    }

    /// Shared handle to the encoder, for awaiting an encode without borrowing the compositor.
    pub fn encoder(&self) -> Arc<E> {
        Arc::clone(&self.encoder)
    }

    /// Number of text runs the last render had to leave out.
    pub fn skipped_text_runs(&self) -> usize {
        self.renderer.skipped_text_runs()
    }

    pub fn scene(
        &mut self,
        req: &CaptureRequest,
        video: Option<&VideoFrame>,
    ) -> RiddleResult<ShareScene> {
        req.validate()?;
        Ok(build_share_scene(req, &self.layout, video, &mut self.text))
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, req, video),
        fields(color = %req.color, suit = %req.suit)
    )]
    pub fn render(
        &mut self,
        req: &CaptureRequest,
        video: Option<&VideoFrame>,
    ) -> RiddleResult<FrameRGBA> {
        let scene = self.scene(req, video)?;
        tracing::debug!(
            camera = ?scene.camera,
            lines = scene.question_lines.len(),
            "share scene built"
        );
        self.renderer.render(&scene, &mut self.text)
    }

    /// Render and encode one share image, bounded by the encode timeout.
    #[tracing::instrument(skip(self, req, video), fields(color = %req.color, suit = %req.suit))]
    pub async fn compose(
        &mut self,
        req: &CaptureRequest,
        video: Option<&VideoFrame>,
    ) -> RiddleResult<EncodedImage> {
        let frame = self.render(req, video)?;
        let image = encode_with_timeout(
            self.encoder.as_ref(),
            frame,
            req.format,
            req.quality,
            self.encode_timeout,
        )
        .await?;
        tracing::info!(bytes = image.bytes.len(), "share image encoded");
        Ok(image)
    }
}

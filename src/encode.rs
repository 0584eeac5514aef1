//! Still-image encoding of rendered frames.

use std::future::Future;
use std::io::Cursor;
use std::time::Duration;

use image::ImageEncoder as _;

use crate::compose::request::OutputFormat;
use crate::foundation::error::{RiddleError, RiddleResult};
use crate::render::FrameRGBA;

/// Default bound on one encode.
pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Encoded share image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Turns a frame into file bytes.
///
/// `Ok(None)` means the encoder finished without producing data.
pub trait ImageEncoder: Send + Sync {
    fn encode(
        &self,
        frame: FrameRGBA,
        format: OutputFormat,
        quality: f32,
    ) -> impl Future<Output = RiddleResult<Option<Vec<u8>>>> + Send;
}

/// PNG and JPEG through the `image` crate, run on the blocking pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateEncoder;

impl ImageEncoder for ImageCrateEncoder {
    async fn encode(
        &self,
        frame: FrameRGBA,
        format: OutputFormat,
        quality: f32,
    ) -> RiddleResult<Option<Vec<u8>>> {
        tokio::task::spawn_blocking(move || encode_blocking(&frame, format, quality))
            .await
            .map_err(|e| RiddleError::encode(format!("encoder task failed: {e}")))?
            .map(Some)
    }
}

/// Encode synchronously; used by [`ImageCrateEncoder`] on the blocking pool.
pub fn encode_blocking(
    frame: &FrameRGBA,
    format: OutputFormat,
    quality: f32,
) -> RiddleResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(RiddleError::encode(format!(
            "frame {}x{} carries {} bytes, expected {expected}",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }

    let rgba = frame.to_straight_rgba8();
    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new_with_quality(
                &mut out,
                png_compression(quality),
                image::codecs::png::FilterType::Adaptive,
            );
            encoder
                .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
                .map_err(|e| RiddleError::encode(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality));
            encoder
                .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| RiddleError::encode(format!("jpeg: {e}")))?;
        }
    }
    Ok(out.into_inner())
}

/// Lossless PNG maps quality onto compression effort.
fn png_compression(quality: f32) -> image::codecs::png::CompressionType {
    use image::codecs::png::CompressionType;
    if quality < 0.5 {
        CompressionType::Fast
    } else if quality < 0.95 {
        CompressionType::Default
    } else {
        CompressionType::Best
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Run `encoder` with an upper bound. Elapsed time and empty output are distinct errors.
#[tracing::instrument(
    level = "debug",
    skip(encoder, frame),
    fields(w = frame.width, h = frame.height)
)]
pub async fn encode_with_timeout<E: ImageEncoder + ?Sized>(
    encoder: &E,
    frame: FrameRGBA,
    format: OutputFormat,
    quality: f32,
    timeout: Duration,
) -> RiddleResult<EncodedImage> {
    let (width, height) = (frame.width, frame.height);
    let bytes = match tokio::time::timeout(timeout, encoder.encode(frame, format, quality)).await {
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "encode timed out");
            return Err(RiddleError::EncodeTimeout(timeout));
        }
        Ok(result) => result?,
    };
    match bytes {
        Some(bytes) if !bytes.is_empty() => Ok(EncodedImage {
            bytes,
            format,
            width,
            height,
        }),
        _ => Err(RiddleError::EncodeEmpty),
    }
}

use serde::{Deserialize, Serialize};

use crate::catalog::{Color, Riddle, Suit};
use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{RiddleError, RiddleResult};

/// Static copy printed on every share image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareTexts {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
}

impl Default for ShareTexts {
    fn default() -> Self {
        Self {
            title: "GDG Noida".to_owned(),
            subtitle: "Riddle Cards".to_owned(),
            footer: "Share your riddle moment with GDG Noida!".to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// How much darker the bottom of the background gradient is than its top; white becomes `#f8f8f8`.
pub const BACKGROUND_SHADE: f64 = 0.027;

/// Everything needed to compose one share image. Built fresh for every capture.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureRequest {
    pub color: Color,
    pub suit: Suit,
    pub question: String,
    pub canvas: Canvas,
    pub background: Rgba8,
    /// Bottom stop of the background gradient.
    pub background_end: Rgba8,
    pub accent: Rgba8,
    /// `0..=1`; JPEG quality, or PNG compression effort.
    pub quality: f32,
    pub format: OutputFormat,
    pub texts: ShareTexts,
}

impl CaptureRequest {
    /// Request for `riddle` with the stock white background and brand accent.
    pub fn for_riddle(riddle: &Riddle) -> Self {
        Self {
            color: riddle.color,
            suit: riddle.suit,
            question: riddle.question.clone(),
            canvas: Canvas::STORY,
            background: Rgba8::WHITE,
            background_end: Rgba8::WHITE.darken(BACKGROUND_SHADE),
            accent: riddle.color.default_accent(),
            quality: 0.9,
            format: OutputFormat::Png,
            texts: ShareTexts::default(),
        }
    }

    pub fn validate(&self) -> RiddleResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(RiddleError::validation("capture quality must be within 0..=1"));
        }
        Ok(())
    }

    /// Download name, e.g. `gdg-riddle-blue-heart.png`.
    pub fn filename(&self, prefix: &str) -> String {
        format!(
            "{prefix}-{}-{}.{}",
            self.color,
            self.suit,
            self.format.extension()
        )
    }
}

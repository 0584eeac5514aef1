//! Application configuration: JSON file plus `RIDDLECARD_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::{CameraConstraints, CaptureSettings};
use crate::catalog::{Color, Riddle};
use crate::compose::{BACKGROUND_SHADE, CaptureRequest, OutputFormat, ShareTexts};
use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{RiddleError, RiddleResult};
use crate::share::{CommandShare, ShareMeta};
use crate::text::fonts::FontConfig;

pub const ENV_FONT: &str = "RIDDLECARD_FONT";
pub const ENV_ENCODE_TIMEOUT_MS: &str = "RIDDLECARD_ENCODE_TIMEOUT_MS";
pub const ENV_READY_TIMEOUT_MS: &str = "RIDDLECARD_READY_TIMEOUT_MS";

/// Accent color per card color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub blue: Rgba8,
    pub green: Rgba8,
    pub yellow: Rgba8,
    pub red: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            blue: Color::Blue.default_accent(),
            green: Color::Green.default_accent(),
            yellow: Color::Yellow.default_accent(),
            red: Color::Red.default_accent(),
        }
    }
}

impl Palette {
    pub fn accent(&self, color: Color) -> Rgba8 {
        match color {
            Color::Blue => self.blue,
            Color::Green => self.green,
            Color::Yellow => self.yellow,
            Color::Red => self.red,
        }
    }
}

/// Look of the share image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub texts: ShareTexts,
    pub background: Rgba8,
    /// Bottom gradient stop; a slightly darker `background` when unset.
    pub background_end: Option<Rgba8>,
    pub palette: Palette,
    pub quality: f32,
    pub format: OutputFormat,
    pub filename_prefix: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            texts: ShareTexts::default(),
            background: Rgba8::WHITE,
            background_end: None,
            palette: Palette::default(),
            quality: 0.9,
            format: OutputFormat::Png,
            filename_prefix: "gdg-riddle".to_owned(),
        }
    }
}

impl ThemeConfig {
    /// Fresh capture request for `riddle` in this theme.
    pub fn request_for(&self, riddle: &Riddle) -> CaptureRequest {
        CaptureRequest {
            color: riddle.color,
            suit: riddle.suit,
            question: riddle.question.clone(),
            canvas: Canvas::STORY,
            background: self.background,
            background_end: self
                .background_end
                .unwrap_or_else(|| self.background.darken(BACKGROUND_SHADE)),
            accent: self.palette.accent(riddle.color),
            quality: self.quality,
            format: self.format,
            texts: self.texts.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCommandConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    #[serde(flatten)]
    pub meta: ShareMeta,
    /// External share helper; downloads only when unset.
    pub command: Option<ShareCommandConfig>,
    pub download_dir: PathBuf,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            meta: ShareMeta::default(),
            command: None,
            download_dir: PathBuf::from("."),
        }
    }
}

impl ShareConfig {
    pub fn command_share(&self) -> Option<CommandShare> {
        self.command.as_ref().map(|c| {
            let mut share = CommandShare::new(&c.program);
            share.args = c.args.clone();
            share
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub constraints: CameraConstraints,
    pub ready_timeout_ms: u64,
    pub ready_poll_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            constraints: CameraConstraints::default(),
            ready_timeout_ms: 3_000,
            ready_poll_ms: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub timeout_ms: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    pub share: ShareConfig,
    pub camera: CameraConfig,
    pub encode: EncodeConfig,
    pub fonts: FontConfig,
    /// Replacement riddle table; the built-in one when unset.
    pub catalog: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> RiddleResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| RiddleError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `path` when given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> RiddleResult<Self> {
        let mut cfg = match path {
            Some(p) => {
                let s = std::fs::read_to_string(p).map_err(|e| {
                    RiddleError::validation(format!("read config '{}': {e}", p.display()))
                })?;
                Self::from_json_str(&s)?
            }
            None => Self::default(),
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `RIDDLECARD_*` overrides looked up through `var`. Unparsable numbers are ignored.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(font) = var(ENV_FONT).filter(|v| !v.is_empty()) {
            self.fonts.regular = Some(PathBuf::from(font));
        }
        if let Some(ms) = parse_ms(&var, ENV_ENCODE_TIMEOUT_MS) {
            self.encode.timeout_ms = ms;
        }
        if let Some(ms) = parse_ms(&var, ENV_READY_TIMEOUT_MS) {
            self.camera.ready_timeout_ms = ms;
        }
    }

    pub fn validate(&self) -> RiddleResult<()> {
        if !self.theme.quality.is_finite() || !(0.0..=1.0).contains(&self.theme.quality) {
            return Err(RiddleError::validation("theme.quality must be within 0..=1"));
        }
        if self.theme.filename_prefix.is_empty()
            || self.theme.filename_prefix.contains(['/', '\\'])
        {
            return Err(RiddleError::validation(
                "theme.filename_prefix must be a non-empty file name",
            ));
        }
        if self.encode.timeout_ms == 0 {
            return Err(RiddleError::validation("encode.timeout_ms must be > 0"));
        }
        if self.camera.ready_poll_ms == 0 {
            return Err(RiddleError::validation("camera.ready_poll_ms must be > 0"));
        }
        Ok(())
    }

    pub fn encode_timeout(&self) -> Duration {
        Duration::from_millis(self.encode.timeout_ms)
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            constraints: self.camera.constraints,
            ready_timeout: Duration::from_millis(self.camera.ready_timeout_ms),
            ready_poll: Duration::from_millis(self.camera.ready_poll_ms),
            ..CaptureSettings::default()
        }
    }
}

fn parse_ms(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = var(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(ms),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid millisecond override");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

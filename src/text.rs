//! Fonts, text layout and word wrapping.

pub(crate) mod engine;
pub(crate) mod fonts;
pub(crate) mod wrap;

pub use engine::TextLayoutEngine;
pub use fonts::{FontConfig, FontSet, LoadedFont};
pub use wrap::{FixedAdvanceMetrics, TextMeasure, wrap_lines};

/// Typographic role of a run of text in the share image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Body copy: riddle question, subtitle, footer.
    Regular,
    /// Header title.
    Bold,
    /// Suit glyph on the badge.
    Symbol,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::Regular, FontRole::Bold, FontRole::Symbol];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size_px: f32,
}

impl TextStyle {
    pub const fn new(role: FontRole, size_px: f32) -> Self {
        Self { role, size_px }
    }
}

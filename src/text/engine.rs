use std::collections::HashMap;

use crate::foundation::color::Rgba8;
use crate::text::fonts::FontSet;
use crate::text::wrap::{FixedAdvanceMetrics, TextMeasure};
use crate::text::{FontRole, TextStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Parley layout over the fonts of a [`FontSet`].
///
/// Each role's font is registered with Parley once; layouts then select it by family name.
/// Roles without a font measure with [`FixedAdvanceMetrics`] and produce no layout.
pub struct TextLayoutEngine {
    fonts: FontSet,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<FontRole, Option<String>>,
    font_data: HashMap<FontRole, vello_cpu::peniko::FontData>,
    fallback: FixedAdvanceMetrics,
}

impl TextLayoutEngine {
    pub fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            font_data: HashMap::new(),
            fallback: FixedAdvanceMetrics::default(),
        }
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn has_font(&self, role: FontRole) -> bool {
        self.fonts.get(role).is_some()
    }

    fn family_for(&mut self, role: FontRole) -> Option<String> {
        if let Some(cached) = self.families.get(&role) {
            return cached.clone();
        }

        let family = self.fonts.get(role).and_then(|font| {
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
            // Collections register every face; pick the family of the face we paint with.
            let family_id = families
                .iter()
                .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
                .or_else(|| families.first())
                .map(|(id, _)| *id)?;
            self.font_ctx
                .collection
                .family_name(family_id)
                .map(str::to_owned)
        });
        if family.is_none() && self.fonts.get(role).is_some() {
            tracing::warn!(?role, "font bytes registered no family; falling back to fixed metrics");
        }
        self.families.insert(role, family.clone());
        family
    }

    /// Lay out `text` as a single unwrapped line. `None` when the role has no usable font.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        style: TextStyle,
        brush: TextBrushRgba8,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return None;
        }
        let family_name = self.family_for(style.role)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if matches!(style.role, FontRole::Bold | FontRole::Symbol) {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Some(layout)
    }

    /// Font data for painting glyph runs of `role`.
    pub(crate) fn font_data(&mut self, role: FontRole) -> Option<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_data.get(&role) {
            return Some(font.clone());
        }
        let loaded = self.fonts.get(role)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(loaded.bytes.as_ref().clone()),
            loaded.index,
        );
        self.font_data.insert(role, font.clone());
        Some(font)
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, text: &str, style: TextStyle) -> f64 {
        match self.layout_line(text, style, TextBrushRgba8::default()) {
            Some(layout) => f64::from(layout.full_width()),
            None => self.fallback.measure(text, style),
        }
    }
}

use crate::text::TextStyle;

/// Horizontal advance of a run of text in a given style.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, style: TextStyle) -> f64;
}

/// Fixed per-character advance as a fraction of the font size.
///
/// Used when no font could be resolved and by layout tests that need exact metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub em_ratio: f64,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self { em_ratio: 0.55 }
    }
}

impl TextMeasure for FixedAdvanceMetrics {
    fn measure(&mut self, text: &str, style: TextStyle) -> f64 {
        text.chars().count() as f64 * f64::from(style.size_px) * self.em_ratio
    }
}

/// Greedy word wrap.
///
/// A word moves to a new line when the line plus the word and its trailing space measures wider
/// than `max_width`, unless it is the first word. The last partial line is always emitted, so the
/// result has at least one entry.
pub fn wrap_lines(
    text: &str,
    style: TextStyle,
    max_width: f64,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for (n, word) in text.split_whitespace().enumerate() {
        let candidate = format!("{line}{word} ");
        if n > 0 && measure.measure(&candidate, style) > max_width {
            lines.push(line.trim().to_owned());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }
    lines.push(line.trim().to_owned());
    lines
}

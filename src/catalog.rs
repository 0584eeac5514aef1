//! Riddle catalog: the authoritative `color -> suit -> riddle` table.
//!
//! The built-in table is embedded JSON. Replacement tables with the same shape can be loaded at
//! runtime; every consumer goes through [`RiddleCatalog`] so swapping content touches nothing else.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{RiddleError, RiddleResult};

const BUILTIN_RIDDLES_JSON: &str = include_str!("catalog/riddles.json");

/// Card color. Declaration order is the grid order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Red,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Blue, Color::Green, Color::Yellow, Color::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
        }
    }

    /// Brand accent used for the ring, badge and riddle box of the share image.
    pub fn default_accent(self) -> Rgba8 {
        match self {
            Color::Blue => Rgba8::rgb(0x42, 0x85, 0xf4),
            Color::Green => Rgba8::rgb(0x34, 0xa8, 0x53),
            Color::Yellow => Rgba8::rgb(0xf9, 0xab, 0x00),
            Color::Red => Rgba8::rgb(0xea, 0x43, 0x35),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = RiddleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RiddleError::validation(format!("unknown card color \"{s}\"")))
    }
}

/// Decorative suit used to pick among the riddles of one color.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];

    pub fn as_str(self) -> &'static str {
        match self {
            Suit::Spade => "spade",
            Suit::Club => "club",
            Suit::Heart => "heart",
            Suit::Diamond => "diamond",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Club => '♣',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
        }
    }

    /// Ink used for the glyph on a white badge: black suits and red suits.
    pub fn ink(self) -> Rgba8 {
        match self {
            Suit::Spade | Suit::Club => Rgba8::BLACK,
            Suit::Heart | Suit::Diamond => Rgba8::rgb(0xef, 0x44, 0x44),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suit {
    type Err = RiddleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suit::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RiddleError::validation(format!("unknown suit \"{s}\"")))
    }
}

/// Question/answer pair as stored in the catalog table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiddleText {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// One riddle drawn from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Riddle {
    pub color: Color,
    pub suit: Suit,
    pub question: String,
    pub answer: String,
}

type RawTable = BTreeMap<Color, BTreeMap<Suit, RiddleText>>;

/// Complete `color x suit` riddle table.
#[derive(Clone, Debug)]
pub struct RiddleCatalog {
    entries: [[RiddleText; 4]; 4],
}

impl RiddleCatalog {
    /// Catalog compiled into the crate.
    pub fn builtin() -> RiddleResult<Self> {
        Self::from_json_str(BUILTIN_RIDDLES_JSON)
    }

    pub fn from_json_str(json: &str) -> RiddleResult<Self> {
        let raw: RawTable =
            serde_json::from_str(json).map_err(|e| RiddleError::serde(e.to_string()))?;
        Self::from_table(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RiddleResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RiddleError::validation(format!("read riddle catalog '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    fn from_table(mut raw: RawTable) -> RiddleResult<Self> {
        let mut take = |color: Color, suit: Suit| -> RiddleResult<RiddleText> {
            let text = raw
                .get_mut(&color)
                .and_then(|suits| suits.remove(&suit))
                .ok_or_else(|| {
                    RiddleError::validation(format!("riddle catalog is missing {color}/{suit}"))
                })?;
            if text.question.trim().is_empty() {
                return Err(RiddleError::validation(format!(
                    "riddle {color}/{suit} has an empty question"
                )));
            }
            Ok(text)
        };

        let mut rows = Vec::with_capacity(Color::ALL.len());
        for color in Color::ALL {
            let mut row = Vec::with_capacity(Suit::ALL.len());
            for suit in Suit::ALL {
                row.push(take(color, suit)?);
            }
            rows.push(row);
        }

        let entries = rows
            .into_iter()
            .map(|row| {
                <[RiddleText; 4]>::try_from(row)
                    .map_err(|_| RiddleError::validation("riddle row must have 4 suits"))
            })
            .collect::<RiddleResult<Vec<_>>>()?;
        let entries = <[[RiddleText; 4]; 4]>::try_from(entries)
            .map_err(|_| RiddleError::validation("riddle catalog must have 4 colors"))?;

        Ok(Self { entries })
    }

    /// Colors in stable grid order.
    pub fn colors(&self) -> [Color; 4] {
        Color::ALL
    }

    pub fn suits(&self) -> [Suit; 4] {
        Suit::ALL
    }

    pub fn riddle(&self, color: Color, suit: Suit) -> Riddle {
        let text = &self.entries[color.index()][suit.index()];
        Riddle {
            color,
            suit,
            question: text.question.clone(),
            answer: text.answer.clone(),
        }
    }

    /// Uniformly random riddle among the suits of `color`.
    pub fn random_riddle<R: Rng + ?Sized>(&self, color: Color, rng: &mut R) -> Riddle {
        let suit = *Suit::ALL.choose(rng).unwrap_or(&Suit::Spade);
        self.riddle(color, suit)
    }

    /// Lookup by color name; unknown names are a validation error.
    pub fn random_riddle_named<R: Rng + ?Sized>(
        &self,
        color: &str,
        rng: &mut R,
    ) -> RiddleResult<Riddle> {
        let color: Color = color.parse()?;
        Ok(self.random_riddle(color, rng))
    }

    pub fn iter(&self) -> impl Iterator<Item = Riddle> + '_ {
        Color::ALL
            .into_iter()
            .flat_map(move |c| Suit::ALL.into_iter().map(move |s| self.riddle(c, s)))
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;

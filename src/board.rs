//! Card grid interaction state.
//!
//! Each card moves `Idle -> Selecting -> Revealed`. While any card is selected the other cards
//! ignore clicks. Animation timing is driven by [`CardBoard::advance`] so the machine runs without a
//! display or real timers.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::catalog::{Color, Riddle, RiddleCatalog};

/// Animation delays sequencing the selection of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardTiming {
    /// Grow animation; the flip toggles when it ends.
    pub grow: Duration,
    /// Flip animation; clicks on the card are ignored until it ends.
    pub flip: Duration,
}

impl Default for BoardTiming {
    fn default() -> Self {
        Self {
            grow: Duration::from_millis(400),
            flip: Duration::from_millis(600),
        }
    }
}

impl BoardTiming {
    pub fn total(self) -> Duration {
        self.grow + self.flip
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    Idle,
    Selecting {
        elapsed: Duration,
        /// Set once the grow delay passed and `flipped` was toggled.
        flip_applied: bool,
    },
    Revealed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardState {
    pub index: usize,
    pub color: Color,
    pub flipped: bool,
    pub selected: bool,
    pub phase: CardPhase,
    pub riddle: Option<Riddle>,
}

impl CardState {
    fn new(index: usize, color: Color) -> Self {
        Self {
            index,
            color,
            flipped: false,
            selected: false,
            phase: CardPhase::Idle,
            riddle: None,
        }
    }
}

/// What a click did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The card became the selected card and starts animating.
    Selected { riddle: Riddle },
    /// The already revealed card will toggle its flip after the grow delay.
    Toggling,
    /// Another card holds the selection lock.
    Locked,
    /// The card is mid-animation.
    Animating,
    /// No card at that index.
    OutOfRange,
}

pub struct CardBoard {
    catalog: Arc<RiddleCatalog>,
    timing: BoardTiming,
    cards: Vec<CardState>,
    selected: Option<usize>,
}

impl CardBoard {
    pub fn new(catalog: Arc<RiddleCatalog>) -> Self {
        Self::with_timing(catalog, BoardTiming::default())
    }

    pub fn with_timing(catalog: Arc<RiddleCatalog>, timing: BoardTiming) -> Self {
        let cards = catalog
            .colors()
            .into_iter()
            .enumerate()
            .map(|(i, c)| CardState::new(i, c))
            .collect();
        Self {
            catalog,
            timing,
            cards,
            selected: None,
        }
    }

    pub fn cards(&self) -> &[CardState] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&CardState> {
        self.cards.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_card(&self) -> Option<&CardState> {
        self.selected.and_then(|i| self.cards.get(i))
    }

    /// True while no card holds the selection lock (header/footer visible).
    pub fn is_browsing(&self) -> bool {
        self.selected.is_none()
    }

    pub fn click<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> ClickOutcome {
        if index >= self.cards.len() {
            return ClickOutcome::OutOfRange;
        }
        if let Some(sel) = self.selected
            && sel != index
        {
            return ClickOutcome::Locked;
        }

        let card = &mut self.cards[index];
        match card.phase {
            CardPhase::Selecting { .. } => ClickOutcome::Animating,
            CardPhase::Revealed => {
                card.phase = CardPhase::Selecting {
                    elapsed: Duration::ZERO,
                    flip_applied: false,
                };
                tracing::debug!(index, "re-click on revealed card toggles flip");
                ClickOutcome::Toggling
            }
            CardPhase::Idle => {
                let riddle = match &card.riddle {
                    Some(r) => r.clone(),
                    None => {
                        let r = self.catalog.random_riddle(card.color, rng);
                        card.riddle = Some(r.clone());
                        r
                    }
                };
                card.selected = true;
                card.phase = CardPhase::Selecting {
                    elapsed: Duration::ZERO,
                    flip_applied: false,
                };
                self.selected = Some(index);
                tracing::debug!(index, color = %card.color, suit = %riddle.suit, "card selected");
                ClickOutcome::Selected { riddle }
            }
        }
    }

    /// Advance animation time for the selected card.
    pub fn advance(&mut self, dt: Duration) {
        let Some(index) = self.selected else {
            return;
        };
        let timing = self.timing;
        let card = &mut self.cards[index];
        let CardPhase::Selecting {
            elapsed,
            flip_applied,
        } = card.phase
        else {
            return;
        };

        let elapsed = elapsed.saturating_add(dt);
        let mut flip_applied = flip_applied;
        if !flip_applied && elapsed >= timing.grow {
            card.flipped = !card.flipped;
            flip_applied = true;
        }
        card.phase = if elapsed >= timing.total() {
            CardPhase::Revealed
        } else {
            CardPhase::Selecting {
                elapsed,
                flip_applied,
            }
        };
    }

    /// Return every card to its initial state and release the selection lock.
    pub fn reset(&mut self) {
        for card in &mut self.cards {
            card.flipped = false;
            card.selected = false;
            card.phase = CardPhase::Idle;
            card.riddle = None;
        }
        self.selected = None;
    }
}

#[cfg(test)]
#[path = "../tests/unit/board.rs"]
mod tests;

//! Terminal layout of the card track

use super::utils::card_height;
use reel_core::{Card, CardSequence, CardTrack, Deck};

/// The card track as laid out in the terminal.
///
/// Each track entry points back at a deck card; once the engine mirrors the
/// track, the second half points at the same deck cards again. Heights are
/// measured in rows for the current width, and nothing is measurable until
/// the first layout pass has given the track a width.
#[derive(Debug, Clone, Default)]
pub struct TrackLayout {
    entries: Vec<usize>,
    cards: CardSequence,
    width: u16,
}

impl TrackLayout {
    pub fn new(deck: &Deck, gap: u16) -> Self {
        let cards = deck
            .cards
            .iter()
            .map(|card| Card::new(card.id.clone(), 0.0))
            .collect();
        Self {
            entries: (0..deck.cards.len()).collect(),
            cards: CardSequence::with_gap(cards, gap as f64),
            width: 0,
        }
    }

    /// Width the track was last laid out for (0 = never)
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn is_laid_out(&self) -> bool {
        self.width > 0
    }

    /// Deck index of each track entry, in track order
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Re-measure every entry for a new width
    pub fn relayout(&mut self, deck: &Deck, width: u16) {
        self.width = width;
        for &deck_idx in &self.entries {
            if let Some(card) = deck.cards.get(deck_idx) {
                self.cards
                    .set_height(&card.id, card_height(card, width) as f64);
            }
        }
    }

    /// Rows between the top of one card and the next
    pub fn gap(&self) -> f64 {
        self.cards.gap()
    }

    /// Height of entry `idx` in rows
    pub fn entry_height(&self, idx: usize) -> f64 {
        self.cards.cards().get(idx).map(|c| c.height).unwrap_or(0.0)
    }
}

impl CardTrack for TrackLayout {
    fn card_ids(&self) -> Vec<String> {
        self.cards.card_ids()
    }

    fn card_top(&self, index: usize) -> Option<f64> {
        if !self.is_laid_out() {
            return None;
        }
        self.cards.card_top(index)
    }

    fn scroll_height(&self) -> f64 {
        if !self.is_laid_out() {
            return 0.0;
        }
        self.cards.scroll_height()
    }

    fn append_clones(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.extend_from_within(..count);
        self.cards.append_clones(count);
    }
}

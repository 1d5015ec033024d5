//! Card deck documents and lookup by year or id

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid deck: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Deck has no cards")]
    Empty,
    #[error("Duplicate card id: {0}")]
    DuplicateId(String),
}

/// One timeline entry as authored in a deck file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub id: String,
    pub year: i32,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// A parsed deck: an ordered list of cards with unique ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    pub cards: Vec<DeckCard>,
}

impl Deck {
    /// Parse a deck from JSON, rejecting empty decks and repeated ids
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        let deck: Deck = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Read and parse a deck file
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let json = std::fs::read_to_string(path)?;
        let deck = Self::from_json(&json)?;
        log::info!("loaded deck {} ({} cards)", path.display(), deck.cards.len());
        Ok(deck)
    }

    fn validate(&self) -> Result<(), DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = FxHashSet::default();
        for card in &self.cards {
            if !seen.insert(card.id.as_str()) {
                return Err(DeckError::DuplicateId(card.id.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&DeckCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Position of the card with `id` in deck order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// First card dated `year`, in deck order
    pub fn find_by_year(&self, year: i32) -> Option<(usize, &DeckCard)> {
        self.cards.iter().enumerate().find(|(_, c)| c.year == year)
    }

    /// Resolve a free-form query: a year if it parses as one, else an id.
    ///
    /// Years with no exact match fall back to the card closest in time.
    pub fn lookup(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Ok(year) = query.parse::<i32>() {
            if let Some((idx, _)) = self.find_by_year(year) {
                return Some(idx);
            }
            return self
                .cards
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| (c.year - year).abs())
                .map(|(idx, _)| idx);
        }
        self.index_of(query)
    }
}

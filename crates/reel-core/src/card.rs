//! Card sequences and track duplication

use crate::engine::CardTrack;

/// Default vertical gap between two cards on a track
pub const DEFAULT_GAP: f64 = 0.0;

/// A single card on the track
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Stable identifier, unique within the original half of a track
    pub id: String,
    /// Rendered height (layout units)
    pub height: f64,
}

impl Card {
    pub fn new(id: impl Into<String>, height: f64) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

/// In-memory track: cards stacked top to bottom with a fixed gap.
///
/// Tops are derived from the cumulative heights on every query, so a card
/// whose height changes moves everything below it, the same way a real
/// layout pass would.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSequence {
    cards: Vec<Card>,
    gap: f64,
}

impl CardSequence {
    pub fn new(cards: Vec<Card>) -> Self {
        Self::with_gap(cards, DEFAULT_GAP)
    }

    pub fn with_gap(cards: Vec<Card>, gap: f64) -> Self {
        Self { cards, gap }
    }

    /// Build a sequence from precomputed tops and a total height.
    ///
    /// Heights are recovered from consecutive tops; the last card takes
    /// whatever remains of `total_height`.
    pub fn from_tops(ids: &[&str], tops: &[f64], total_height: f64) -> Self {
        let mut cards = Vec::with_capacity(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            let top = tops.get(idx).copied().unwrap_or(0.0);
            let next = tops.get(idx + 1).copied().unwrap_or(total_height);
            cards.push(Card::new(*id, (next - top).max(0.0)));
        }
        Self::new(cards)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Replace the height of every card sharing `id` (both copies once doubled)
    pub fn set_height(&mut self, id: &str, height: f64) {
        for card in self.cards.iter_mut().filter(|c| c.id == id) {
            card.height = height;
        }
    }

    /// Append a card at the end of the track
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Drop the mirrored half, if any, returning to the original cards
    pub fn truncate_to_original(&mut self) {
        let count = original_count(&self.ids());
        self.cards.truncate(count);
    }

    fn ids(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.id.as_str()).collect()
    }
}

impl CardTrack for CardSequence {
    fn card_ids(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    fn card_top(&self, index: usize) -> Option<f64> {
        if index >= self.cards.len() {
            return None;
        }
        let top = self.cards[..index]
            .iter()
            .map(|c| c.height + self.gap)
            .sum();
        Some(top)
    }

    fn scroll_height(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        self.cards.iter().map(|c| c.height + self.gap).sum()
    }

    fn append_clones(&mut self, count: usize) {
        let count = count.min(self.cards.len());
        let clones: Vec<Card> = self.cards[..count].to_vec();
        self.cards.extend(clones);
    }
}

// ==================== Duplication ====================

/// Check whether a sequence of identifiers is already mirrored.
///
/// True iff the length is even and non-zero and every id in the first half
/// equals the id at the same place in the second half.
pub fn is_duplicated<S: AsRef<str>>(ids: &[S]) -> bool {
    let len = ids.len();
    if len == 0 || len % 2 != 0 {
        return false;
    }
    let half = len / 2;
    (0..half).all(|i| ids[i].as_ref() == ids[i + half].as_ref())
}

/// Number of unique cards before duplication
pub fn original_count<S: AsRef<str>>(ids: &[S]) -> usize {
    if is_duplicated(ids) {
        ids.len() / 2
    } else {
        ids.len()
    }
}

/// Mirror the track once so it holds two back-to-back copies.
///
/// Clones keep their identifiers. Does nothing when the track is empty or
/// already doubled. Returns true if the track was changed.
pub fn duplicate<T: CardTrack + ?Sized>(track: &mut T) -> bool {
    let ids = track.card_ids();
    if ids.is_empty() || is_duplicated(&ids) {
        return false;
    }
    track.append_clones(ids.len());
    log::debug!("duplicated track: {} -> {} cards", ids.len(), ids.len() * 2);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(ids: &[&str]) -> CardSequence {
        CardSequence::new(ids.iter().map(|id| Card::new(*id, 10.0)).collect())
    }

    #[test]
    fn test_is_duplicated() {
        assert!(!is_duplicated::<&str>(&[]));
        assert!(!is_duplicated(&["a"]));
        assert!(is_duplicated(&["a", "a"]));
        assert!(!is_duplicated(&["a", "b"]));
        assert!(is_duplicated(&["a", "b", "a", "b"]));
        assert!(!is_duplicated(&["a", "b", "b", "a"]));
        assert!(!is_duplicated(&["a", "b", "a"]));
    }

    #[test]
    fn test_original_count() {
        assert_eq!(original_count::<&str>(&[]), 0);
        assert_eq!(original_count(&["a", "b", "c"]), 3);
        assert_eq!(original_count(&["a", "b", "c", "a", "b", "c"]), 3);
    }

    #[test]
    fn test_duplicate_is_idempotent() {
        let mut track = seq(&["1969", "1971", "1984"]);
        assert!(duplicate(&mut track));
        let once = track.clone();
        assert!(!duplicate(&mut track));
        assert_eq!(track, once);
        assert_eq!(track.len(), 6);
        assert!(is_duplicated(&track.card_ids()));
    }

    #[test]
    fn test_duplicate_preserves_ids_in_order() {
        let mut track = seq(&["x", "y"]);
        duplicate(&mut track);
        assert_eq!(track.card_ids(), vec!["x", "y", "x", "y"]);
    }

    #[test]
    fn test_duplicate_empty_is_noop() {
        let mut track = CardSequence::default();
        assert!(!duplicate(&mut track));
        assert!(track.is_empty());
    }

    #[test]
    fn test_duplicate_singleton_doubles_once() {
        let mut track = seq(&["only"]);
        assert!(duplicate(&mut track));
        assert_eq!(track.len(), 2);
        assert!(!duplicate(&mut track));
        assert_eq!(track.len(), 2);
        assert_eq!(original_count(&track.card_ids()), 1);
    }

    #[test]
    fn test_card_tops_with_gap() {
        let track = CardSequence::with_gap(
            vec![Card::new("a", 4.0), Card::new("b", 6.0), Card::new("c", 2.0)],
            1.0,
        );
        assert_eq!(track.card_top(0), Some(0.0));
        assert_eq!(track.card_top(1), Some(5.0));
        assert_eq!(track.card_top(2), Some(12.0));
        assert_eq!(track.card_top(3), None);
        assert_eq!(track.scroll_height(), 15.0);
    }

    #[test]
    fn test_from_tops() {
        let track = CardSequence::from_tops(&["a", "b", "c"], &[0.0, 100.0, 250.0], 400.0);
        assert_eq!(track.card_top(1), Some(100.0));
        assert_eq!(track.card_top(2), Some(250.0));
        assert_eq!(track.scroll_height(), 400.0);
    }

    #[test]
    fn test_set_height_touches_both_copies() {
        let mut track = seq(&["a", "b"]);
        duplicate(&mut track);
        track.set_height("a", 30.0);
        assert_eq!(track.card_top(1), Some(30.0));
        assert_eq!(track.card_top(3), Some(70.0));
    }

    #[test]
    fn test_truncate_to_original() {
        let mut track = seq(&["a", "b"]);
        duplicate(&mut track);
        track.truncate_to_original();
        assert_eq!(track.card_ids(), vec!["a", "b"]);
    }
}

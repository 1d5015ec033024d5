//! Card offsets and wrap period

use crate::engine::CardTrack;

/// Offsets of the original cards relative to the first card's top, plus the
/// wrap period of the doubled track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetTable {
    offsets: Vec<f64>,
    half_track_height: f64,
}

impl OffsetTable {
    /// Measure the first `original_count` cards of `track`.
    ///
    /// A zero count falls back to treating the whole track as original.
    /// Returns `None` if any card cannot be measured yet (layout not ready).
    pub fn compute<T: CardTrack + ?Sized>(track: &T, original_count: usize) -> Option<Self> {
        let len = track.card_ids().len();
        let count = if original_count == 0 {
            len
        } else {
            original_count.min(len)
        };

        let mut offsets = Vec::with_capacity(count);
        if count > 0 {
            let first = track.card_top(0)?;
            for idx in 0..count {
                let top = track.card_top(idx)?;
                offsets.push(top - first);
            }
        }

        let half_track_height = (track.scroll_height() / 2.0).round();
        Some(Self {
            offsets,
            half_track_height: half_track_height.max(0.0),
        })
    }

    /// Build a table directly from known offsets
    pub fn from_parts(offsets: Vec<f64>, half_track_height: f64) -> Self {
        Self {
            offsets,
            half_track_height,
        }
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Wrap period; zero disables wrapping
    pub fn half_track_height(&self) -> f64 {
        self.half_track_height
    }
}

/// Fold `position` into `(-half, 0]`. A non-positive `half` leaves it as is.
///
/// Exactly `-half` folds to `0`. Non-finite input folds to `0` as well.
pub fn wrap_position(position: f64, half: f64) -> f64 {
    if !half.is_finite() || half <= 0.0 {
        return position;
    }
    if !position.is_finite() {
        return 0.0;
    }
    let rem = position % half;
    if rem > 0.0 {
        rem - half
    } else if rem == 0.0 {
        0.0
    } else {
        rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{duplicate, Card, CardSequence};

    #[test]
    fn test_offsets_relative_to_first() {
        let track = CardSequence::from_tops(
            &["a", "b", "c", "d"],
            &[0.0, 100.0, 250.0, 420.0],
            500.0,
        );
        let table = OffsetTable::compute(&track, 4).unwrap();
        assert_eq!(table.offsets(), &[0.0, 100.0, 250.0, 420.0]);
    }

    #[test]
    fn test_offsets_monotonic() {
        let mut track = CardSequence::with_gap(
            vec![
                Card::new("a", 3.0),
                Card::new("b", 0.0),
                Card::new("c", 7.5),
                Card::new("d", 1.0),
            ],
            2.0,
        );
        duplicate(&mut track);
        let table = OffsetTable::compute(&track, 4).unwrap();
        assert_eq!(table.offsets()[0], 0.0);
        for pair in table.offsets().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_half_track_height_rounds() {
        let mut track = CardSequence::new(vec![Card::new("a", 10.5), Card::new("b", 10.0)]);
        duplicate(&mut track);
        // 41.0 total
        let table = OffsetTable::compute(&track, 2).unwrap();
        assert_eq!(table.half_track_height(), 21.0);
    }

    #[test]
    fn test_zero_count_falls_back_to_whole_track() {
        let track = CardSequence::new(vec![Card::new("a", 5.0), Card::new("b", 5.0)]);
        let table = OffsetTable::compute(&track, 0).unwrap();
        assert_eq!(table.offsets(), &[0.0, 5.0]);
    }

    #[test]
    fn test_count_larger_than_track_is_clamped() {
        let track = CardSequence::new(vec![Card::new("a", 5.0)]);
        let table = OffsetTable::compute(&track, 9).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_track() {
        let track = CardSequence::default();
        let table = OffsetTable::compute(&track, 0).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.half_track_height(), 0.0);
    }

    #[test]
    fn test_wrap_position() {
        assert_eq!(wrap_position(0.0, 420.0), 0.0);
        assert_eq!(wrap_position(-420.0, 420.0), 0.0);
        assert_eq!(wrap_position(-419.5, 420.0), -419.5);
        assert_eq!(wrap_position(10.0, 420.0), -410.0);
        assert_eq!(wrap_position(-900.0, 420.0), -60.0);
        assert_eq!(wrap_position(-900.0, 0.0), -900.0);
    }

    #[test]
    fn test_wrap_position_far_from_period() {
        assert_eq!(wrap_position(-1e9, 12.0), -4.0);
        let pos = wrap_position(-1e17, 12.0);
        assert!(pos <= 0.0 && pos > -12.0, "{}", pos);
        let pos = wrap_position(1e20, 420.0);
        assert!(pos <= 0.0 && pos > -420.0, "{}", pos);
        assert_eq!(wrap_position(-4200.0, 420.0), 0.0);
    }

    #[test]
    fn test_wrap_position_non_finite() {
        assert_eq!(wrap_position(f64::NAN, 12.0), 0.0);
        assert_eq!(wrap_position(f64::NEG_INFINITY, 12.0), 0.0);
        assert_eq!(wrap_position(-5.0, f64::NAN), -5.0);
    }
}

//! Mapping between card indices, track positions and slider values

/// Index of the card whose offset is closest to `|position|`.
///
/// Ties go to the lowest index. Empty tables map to 0.
pub fn nearest_index(position: f64, offsets: &[f64]) -> usize {
    let target = position.abs();
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, &offset) in offsets.iter().enumerate() {
        let dist = (target - offset).abs();
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

/// Clamp an index into the table bounds
pub fn clamp_index(index: usize, offsets: &[f64]) -> usize {
    index.min(offsets.len().saturating_sub(1))
}

/// Position that aligns card `index` with the reference edge
pub fn index_to_position(index: usize, offsets: &[f64]) -> f64 {
    if offsets.is_empty() {
        return 0.0;
    }
    -offsets[clamp_index(index, offsets)]
}

/// Continuous card index for a position, interpolated between the two
/// bracketing offsets. Distances outside the table clamp to the end indices.
pub fn position_to_fraction(position: f64, offsets: &[f64]) -> f64 {
    let len = offsets.len();
    if len < 2 {
        return 0.0;
    }
    let dist = position.abs();
    if dist <= offsets[0] {
        return 0.0;
    }
    if dist >= offsets[len - 1] {
        return (len - 1) as f64;
    }

    // offsets[idx] <= dist < offsets[idx + 1]
    let idx = offsets.partition_point(|&o| o <= dist).saturating_sub(1);
    let lo = offsets[idx];
    let hi = offsets[idx + 1];
    let span = hi - lo;
    if span <= 0.0 {
        return idx as f64;
    }
    idx as f64 + (dist - lo) / span
}

/// Inverse of [`position_to_fraction`]
pub fn fraction_to_position(fraction: f64, offsets: &[f64]) -> f64 {
    let len = offsets.len();
    if len == 0 {
        return 0.0;
    }
    let last = (len - 1) as f64;
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, last)
    };
    let idx = fraction.floor() as usize;
    if idx >= len - 1 {
        return -offsets[len - 1];
    }
    let t = fraction - idx as f64;
    -(offsets[idx] + t * (offsets[idx + 1] - offsets[idx]))
}

/// Slider percentage (0–100) for a fractional index over `count` cards
pub fn fraction_to_percent(fraction: f64, count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    (fraction / (count - 1) as f64 * 100.0).clamp(0.0, 100.0)
}

/// Fractional index for a slider percentage (0–100) over `count` cards
pub fn percent_to_fraction(percent: f64, count: usize) -> f64 {
    if count < 2 || percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0) / 100.0 * (count - 1) as f64
}

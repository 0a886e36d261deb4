//! Resolving the size of `fr` units.
//!
//! Spec: §12.7.1 Find the Size of an fr
//! <https://www.w3.org/TR/css-grid-2/#algo-find-fr-size>

use super::track::GridTrack;
use crate::placement::GridSpan;

/// Flex factor of a track whose max sizing function is flexible.
fn flex_factor(track: &GridTrack) -> f64 {
    f64::from(track.cached_track_size().max_breadth().flex_factor())
}

/// Size of one `fr` that fills `left_over_space` with the tracks in `span`.
///
/// Gutters must already be removed from `left_over_space`.
///
/// # Panics
/// Panics if `span` reaches past `tracks`.
pub fn find_fr_unit_size(tracks: &[GridTrack], span: GridSpan, left_over_space: f32) -> f64 {
    if left_over_space <= 0.0 {
        return 0.0;
    }
    let mut left_over = f64::from(left_over_space);
    let mut flex_factor_sum = 0.0;
    let mut flexible_tracks = Vec::new();
    for index in span {
        let track = &tracks[index];
        if track.cached_track_size().max_breadth().is_flexible() {
            flexible_tracks.push(index);
            flex_factor_sum += flex_factor(track);
        } else {
            left_over -= f64::from(track.base_size());
        }
    }
    compute_flex_factor_unit_size(tracks, flex_factor_sum, left_over, &flexible_tracks)
}

/// Hypothetical fr size, retried with every track whose base size exceeds
/// its flexible share treated as inflexible.
fn compute_flex_factor_unit_size(
    tracks: &[GridTrack],
    mut flex_factor_sum: f64,
    mut left_over_space: f64,
    flexible_tracks: &[usize],
) -> f64 {
    let mut inflexible = vec![false; flexible_tracks.len()];
    loop {
        // Sums below one would make the unit grow without bound.
        let hypothetical_unit_size = left_over_space / flex_factor_sum.max(1.0);
        let mut valid = true;
        for (slot, index) in flexible_tracks.iter().enumerate() {
            if inflexible[slot] {
                continue;
            }
            let track = &tracks[*index];
            let base_size = f64::from(track.base_size());
            let factor = flex_factor(track);
            if base_size > hypothetical_unit_size * factor {
                left_over_space -= base_size;
                flex_factor_sum -= factor;
                inflexible[slot] = true;
                valid = false;
            }
        }
        if valid {
            return hypothetical_unit_size;
        }
    }
}

/// Base size per unit of flex, flex factors below one counting as one.
pub fn normalized_flex_fraction(track: &GridTrack) -> f64 {
    f64::from(track.base_size()) / flex_factor(track).max(1.0)
}

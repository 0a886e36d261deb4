//! `repeat(auto-fill | auto-fit, ...)` expansion.
//!
//! Spec: §7.2.3.2 Repeat-to-fill: auto-fill and auto-fit repetitions
//! <https://www.w3.org/TR/css-grid-2/#auto-repeat>

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::BTreeSet;

use log::debug;

use crate::layout::GridContainerInputs;
use crate::list_grid::{GridIterator, ListGrid};
use crate::types::{GridAxis, GridTrackSize};

/// Upper bound on the number of tracks in one axis.
pub const MAX_GRID_TRACKS: usize = 1_000_000;

/// Floor applied to the size of one repetition so the count stays finite.
pub const AUTO_REPEAT_MIN_TRACK_SIZE: f32 = 1.0;

/// Size a track contributes when counting repetitions: its fixed max sizing
/// function if any, else its fixed min, else zero.
fn definite_track_size(size: &GridTrackSize, available: f32) -> f32 {
    size.max_breadth()
        .fixed_value(available)
        .or_else(|| size.min_breadth().fixed_value(available))
        .unwrap_or(0.0)
}

/// Number of tracks generated by the auto-repeat of `axis`.
///
/// `available` is the content-box size of the container in that axis, or
/// `None` while it is indefinite.
pub fn compute_auto_repeat_tracks_count(
    inputs: &GridContainerInputs,
    axis: GridAxis,
    available: Option<f32>,
) -> usize {
    let tracks = inputs.tracks(axis);
    if tracks.is_auto_fit() && inputs.size_containment {
        return 0;
    }
    if tracks.auto_repeat_type.is_none() {
        return 0;
    }
    let repeat_len = tracks.auto_repeat_tracks.len();
    if repeat_len == 0 {
        return 0;
    }

    let mut needs_to_fulfill_minimum_size = false;
    let available_size = if let Some(size) = available {
        size
    } else {
        let constraints = inputs.constraints(axis);
        let max_size = constraints.max_size;
        let min_size = constraints.min_size;
        let intrinsic_override = constraints.intrinsic_size_override;
        if max_size.is_none() && min_size.is_none() && intrinsic_override.is_none() {
            return repeat_len;
        }
        needs_to_fulfill_minimum_size =
            max_size.is_none() && (min_size.is_some() || intrinsic_override.is_some());
        let min_value = min_size.unwrap_or(0.0);
        let mut size = min_value
            .max(intrinsic_override.unwrap_or(0.0))
            .max(max_size.unwrap_or(0.0));
        if let Some(max_value) = max_size
            && max_value < size
        {
            size = min_value.max(max_value);
        }
        size
    };

    let repeat_size = tracks
        .auto_repeat_tracks
        .iter()
        .map(|size| definite_track_size(size, available_size))
        .sum::<f32>()
        .max(AUTO_REPEAT_MIN_TRACK_SIZE);

    // There is always at least one repetition.
    let gap = inputs.gap(axis, Some(available_size));
    let other_tracks: f32 = tracks
        .tracks
        .iter()
        .map(|size| definite_track_size(size, available_size))
        .sum();
    let gap_count = (tracks.tracks.len() + repeat_len).saturating_sub(1) as f32;
    let tracks_size = gap.mul_add(gap_count, repeat_size + other_tracks);

    let mut free_space = available_size - tracks_size;
    if free_space <= 0.0 {
        return repeat_len;
    }

    let repeat_size_with_gap = gap.mul_add(repeat_len as f32, repeat_size);
    let mut repetitions = 1 + (free_space / repeat_size_with_gap).floor() as usize;
    free_space -= repeat_size_with_gap * (repetitions - 1) as f32;

    // Without a max size, the smallest count that fulfills the min size wins.
    if needs_to_fulfill_minimum_size && free_space != 0.0 {
        repetitions += 1;
    }

    debug!("{axis:?} auto-repeat: {repetitions} repetitions of {repeat_len} tracks");
    repetitions * repeat_len
}

/// Keep the expanded grid within [`MAX_GRID_TRACKS`].
pub fn clamp_auto_repeat_tracks(insertion_point: usize, auto_repeat_tracks: usize) -> usize {
    if auto_repeat_tracks == 0 {
        return 0;
    }
    if insertion_point == 0 {
        return auto_repeat_tracks.min(MAX_GRID_TRACKS);
    }
    if insertion_point >= MAX_GRID_TRACKS {
        return 0;
    }
    auto_repeat_tracks.min(MAX_GRID_TRACKS - insertion_point)
}

/// Translated indices of the auto-fit tracks that hold no item.
///
/// Returns `None` unless the axis uses `auto-fit`.
pub fn compute_empty_tracks_for_auto_repeat<Item: Copy + Eq + Hash + Debug>(
    grid: &ListGrid<Item>,
    inputs: &GridContainerInputs,
    axis: GridAxis,
) -> Option<BTreeSet<usize>> {
    let tracks = inputs.tracks(axis);
    if !tracks.is_auto_fit() {
        return None;
    }
    let first = grid.explicit_grid_start(axis) + tracks.auto_repeat_insertion_point;
    let last = first + grid.auto_repeat_tracks(axis);
    let empty: BTreeSet<usize> = if grid.has_grid_items() {
        (first..last)
            .filter(|track| {
                GridIterator::new(grid, axis, *track, 0)
                    .next_grid_item()
                    .is_none()
            })
            .collect()
    } else {
        (first..last).collect()
    };
    Some(empty)
}

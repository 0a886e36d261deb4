//! Content distribution and track positions.
//!
//! Spec: §11.4 Aligning the Grid: the justify-content and align-content properties
//! <https://www.w3.org/TR/css-grid-2/#grid-align>

use core::fmt::Debug;
use core::hash::Hash;

use crate::list_grid::ListGrid;
use crate::track_sizing::GridTrack;
use crate::types::{ContentAlignment, GridAlignment, GridAxis};

/// Where the first track starts and how much space content distribution
/// adds after each track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentAlignmentOffset {
    pub position_offset: f32,
    pub distribution_offset: f32,
}

/// Offsets for `alignment` with `free_space` left over `number_of_tracks`
/// non-collapsed tracks.
///
/// Distributed alignments that cannot apply (no free space, too few
/// tracks) fall back to a position: `space-between` to `start`,
/// `space-around` and `space-evenly` to `center`.
pub fn compute_content_distribution_offset(
    alignment: ContentAlignment,
    free_space: f32,
    number_of_tracks: usize,
) -> ContentAlignmentOffset {
    if free_space > 0.0 {
        let tracks = number_of_tracks as f32;
        let distributed = match alignment {
            ContentAlignment::SpaceBetween if number_of_tracks >= 2 => {
                let distribution_offset = free_space / (tracks - 1.0);
                Some((0.0, distribution_offset))
            }
            ContentAlignment::SpaceAround if number_of_tracks >= 1 => {
                let distribution_offset = free_space / tracks;
                Some((distribution_offset / 2.0, distribution_offset))
            }
            ContentAlignment::SpaceEvenly => {
                let distribution_offset = free_space / (tracks + 1.0);
                Some((distribution_offset, distribution_offset))
            }
            _ => None,
        };
        if let Some((position_offset, distribution_offset)) = distributed {
            return ContentAlignmentOffset {
                position_offset,
                distribution_offset,
            };
        }
    }

    if free_space == 0.0 {
        return ContentAlignmentOffset::default();
    }
    // Overflowing tracks are aligned unsafely: the offset may be negative.
    let position_offset = match alignment {
        ContentAlignment::Center | ContentAlignment::SpaceAround | ContentAlignment::SpaceEvenly => {
            free_space / 2.0
        }
        ContentAlignment::End => free_space,
        ContentAlignment::Normal
        | ContentAlignment::Start
        | ContentAlignment::Stretch
        | ContentAlignment::SpaceBetween => 0.0,
    };
    ContentAlignmentOffset {
        position_offset,
        distribution_offset: 0.0,
    }
}

/// Positions of every grid line of `axis`, from the content-box start.
///
/// Gutters around collapsed tracks collapse: a run of collapsed tracks
/// between two non-empty ones keeps a single gutter, and collapsed tracks
/// at either edge keep none.
pub fn populate_grid_positions<NodeId: Copy + Eq + Hash + Debug>(
    grid: &ListGrid<NodeId>,
    axis: GridAxis,
    tracks: &[GridTrack],
    gap: f32,
    offset: ContentAlignmentOffset,
) -> Vec<f32> {
    let mut positions = Vec::with_capacity(tracks.len() + 1);
    positions.push(offset.position_offset);
    let Some((last_track, leading_tracks)) = tracks.split_last() else {
        return positions;
    };

    let empty_tracks = grid.auto_repeat_empty_tracks(axis).filter(|empty| !empty.is_empty());
    // With collapsed tracks the gutters are added afterwards.
    let line_gap = if empty_tracks.is_some() { 0.0 } else { gap };
    let mut position = offset.position_offset;
    for track in leading_tracks {
        position += offset.distribution_offset + track.base_size() + line_gap;
        positions.push(position);
    }
    positions.push(position + last_track.base_size());

    let Some(empty_tracks) = empty_tracks else {
        return positions;
    };
    let last_line = tracks.len();
    let mut remaining_empty_tracks = empty_tracks.len();
    let mut offset_accumulator = 0.0;
    let mut gap_accumulator = 0.0;
    for line in 1..last_line {
        if empty_tracks.contains(&(line - 1)) {
            remaining_empty_tracks -= 1;
            offset_accumulator += offset.distribution_offset;
        } else {
            // One gutter for any number of collapsed tracks between two
            // non-empty ones, none before trailing collapsed tracks.
            let all_remaining_tracks_are_empty = remaining_empty_tracks == last_line - line;
            if !all_remaining_tracks_are_empty || !empty_tracks.contains(&line) {
                gap_accumulator += gap;
            }
        }
        positions[line] += gap_accumulator - offset_accumulator;
    }
    positions[last_line] += gap_accumulator - offset_accumulator;
    positions
}

/// Offset of an item's margin box inside its grid area.
///
/// `free_space` is the area size minus the item's margin-box size; it is
/// negative when the item overflows, and the item then overflows unsafely.
/// `baseline_shim` applies to first-baseline alignment only.
pub fn self_alignment_offset(alignment: GridAlignment, free_space: f32, baseline_shim: f32) -> f32 {
    match alignment {
        GridAlignment::Start | GridAlignment::Stretch => 0.0,
        GridAlignment::Baseline => baseline_shim,
        GridAlignment::End | GridAlignment::LastBaseline => free_space,
        GridAlignment::Center => free_space / 2.0,
    }
}

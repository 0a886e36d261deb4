//! Gutter sizes between tracks, with collapsed `auto-fit` tracks.
//!
//! Spec: §7.2.3.2 Collapsed tracks, §10.1 Gutters
//! <https://www.w3.org/TR/css-grid-2/#collapsed-track>

use core::fmt::Debug;
use core::hash::Hash;

use tracing::warn;

use super::GridContainerInputs;
use crate::list_grid::ListGrid;
use crate::types::GridAxis;

/// Total gutter size inside `span` tracks of `axis` starting at `start_line`.
///
/// Gutters around collapsed tracks collapse too: a run of collapsed tracks
/// keeps at most one gutter, and none at the edges of the grid.
pub fn gutters_size<NodeId: Copy + Eq + Hash + Debug>(
    grid: &ListGrid<NodeId>,
    inputs: &GridContainerInputs,
    axis: GridAxis,
    start_line: usize,
    span: usize,
    available: Option<f32>,
) -> f32 {
    if span <= 1 {
        return 0.0;
    }
    let gap = inputs.gap(axis, available);
    let empty_tracks = match grid.auto_repeat_empty_tracks(axis) {
        Some(empty_tracks) if !empty_tracks.is_empty() => empty_tracks,
        _ => return gap * (span - 1) as f32,
    };

    let end_line = start_line + span;
    let last_track = end_line - 1;
    let non_empty_lines = (start_line..last_track)
        .filter(|line| !empty_tracks.contains(line))
        .count();
    let mut gutters = gap * non_empty_lines as f32;
    // Trailing collapsed tracks added one gutter too many.
    if gutters > 0.0 && empty_tracks.contains(&last_track) {
        gutters -= gap;
    }

    let mut non_empty_tracks_before = 0;
    if start_line > 0 && empty_tracks.contains(&start_line) {
        non_empty_tracks_before = start_line - empty_tracks.range(..start_line).count();
        if non_empty_tracks_before > 0 {
            gutters += gap;
        }
    }

    if empty_tracks.contains(&last_track) {
        let non_empty_tracks_after = grid
            .num_tracks(axis)
            .saturating_sub(end_line)
            .saturating_sub(empty_tracks.range(end_line..).count());
        if non_empty_tracks_after > 0 {
            if non_empty_tracks_before == 0 {
                gutters += gap;
            }
        } else if non_empty_tracks_before > 0 {
            gutters -= gap;
        }
    }

    if gutters < 0.0 {
        warn!(gutters, ?axis, start_line, span, "negative gutters clamped to zero");
        return 0.0;
    }
    gutters
}

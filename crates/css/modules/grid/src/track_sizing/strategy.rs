//! Steps of the sizing algorithm that depend on whether the axis has a
//! definite available size.

use core::fmt::Debug;
use core::hash::Hash;

use tracing::debug;

use super::GridTrackSizingAlgorithm;
use super::distribution::distribute_space_to_tracks;
use super::flex::{find_fr_unit_size, normalized_flex_fraction};
use super::phases::{ContributionKind, TrackSizeComputationPhase};
use crate::placement::GridSpan;
use crate::tree::GridLayoutTree;
use crate::types::GridAxis;

/// How free space is found while sizing one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingStrategy {
    /// The available size is known; free space drives maximization and `fr`.
    #[default]
    Definite,
    /// Sizing for an intrinsic size; tracks grow to their limits and `fr`
    /// comes from the items.
    Indefinite,
}

impl<NodeId: Copy + Eq + Hash + Debug> GridTrackSizingAlgorithm<'_, NodeId> {
    /// Grow every track towards its growth limit.
    pub(super) fn maximize_tracks(&mut self) {
        let axis = self.axis;
        match self.strategy {
            SizingStrategy::Definite => {
                let tracks = self.tracks.get_mut(axis);
                for track in &mut *tracks {
                    track.set_planned_size(track.base_size());
                }
                let mut indices: Vec<usize> = (0..tracks.len()).collect();
                let mut free_space = self.free_space.get(axis).unwrap_or(0.0);
                distribute_space_to_tracks(
                    TrackSizeComputationPhase::MaximizeTracks,
                    tracks,
                    &mut indices,
                    None,
                    &mut free_space,
                );
                for track in &mut *tracks {
                    track.set_base_size(track.planned_size());
                }
                *self.free_space.get_mut(axis) = Some(free_space);
            }
            SizingStrategy::Indefinite => {
                for track in self.tracks.get_mut(axis) {
                    track.set_base_size(track.growth_limit());
                }
            }
        }
    }

    /// Size of one `fr` for the flexible tracks.
    ///
    /// `free_space` is the free space before any track was sized.
    pub(super) fn find_used_flex_fraction<T>(&self, tree: &mut T, free_space: Option<f32>) -> f64
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let tracks = self.tracks.get(axis);
        if self.strategy == SizingStrategy::Definite {
            if tracks.is_empty() {
                return 0.0;
            }
            return find_fr_unit_size(tracks, GridSpan::new(0, tracks.len()), free_space.unwrap_or(0.0));
        }

        let mut flex_fraction = self
            .flexible_sized_tracks_index
            .iter()
            .map(|&index| normalized_flex_fraction(&tracks[index]))
            .fold(0.0, f64::max);
        if !self.grid.has_grid_items() {
            return flex_fraction;
        }
        for (item, span) in self.items_in_track_indices(&self.flexible_sized_tracks_index) {
            // Gutters are not flexible space.
            let left_over_space = self.content_for_child(tree, item, ContributionKind::MaxContent)
                - self.gutters(axis, span.start_line(), span.integer_span());
            flex_fraction = flex_fraction.max(find_fr_unit_size(tracks, span, left_over_space));
        }
        flex_fraction
    }

    /// Redo the `fr` size when the grown rows break the container's
    /// min or max block size. Columns never recompute.
    pub(super) fn recompute_used_flex_fraction_if_needed(&self, flex_fraction: &mut f64, total_growth: f32) -> bool {
        if self.strategy == SizingStrategy::Definite || self.axis == GridAxis::Column {
            return false;
        }
        let constraints = self.inputs.constraints(GridAxis::Row);
        let min_size = constraints.min_size.unwrap_or(0.0);
        let rows_size = total_growth + self.compute_track_based_size();
        let check_min_size = min_size > 0.0 && rows_size < min_size;
        let check_max_size = constraints.max_size.is_some_and(|max_size| rows_size > max_size);
        if !check_min_size && !check_max_size {
            return false;
        }

        let bound = if check_max_size {
            constraints.max_size.unwrap_or(-1.0)
        } else {
            -1.0
        };
        let num_rows = self.grid.num_tracks(GridAxis::Row);
        let free_space = bound.max(min_size) - self.gutters(GridAxis::Row, 0, num_rows);
        let tracks = self.tracks.get(GridAxis::Row);
        if tracks.is_empty() {
            return false;
        }
        *flex_fraction = find_fr_unit_size(tracks, GridSpan::new(0, tracks.len()), free_space);
        debug!(rows_size, min_size, flex_fraction = *flex_fraction, "flex fraction recomputed");
        true
    }

    /// Space that `auto` tracks may be stretched into.
    pub(super) fn free_space_for_stretch_auto_tracks_step(&self) -> f32 {
        match self.strategy {
            SizingStrategy::Definite => self.free_space.get(self.axis).unwrap_or(0.0),
            SizingStrategy::Indefinite => {
                if self.axis == GridAxis::Column {
                    return 0.0;
                }
                let min_size = self.inputs.constraints(GridAxis::Row).min_size.unwrap_or(0.0);
                min_size - self.compute_track_based_size()
            }
        }
    }

    /// Whether this run only measures a size-contained container.
    pub(super) fn is_computing_size_containment(&self) -> bool {
        match self.strategy {
            SizingStrategy::Definite => false,
            SizingStrategy::Indefinite => self.inputs.size_containment,
        }
    }

    /// Relayout an item whose containing block changed while measuring
    /// its minimum size.
    pub(super) fn layout_grid_item_for_min_size_computation<T>(&self, tree: &mut T, item: NodeId, changed: bool)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let needs_layout = match self.strategy {
            SizingStrategy::Definite => changed,
            SizingStrategy::Indefinite => changed && self.axis != GridAxis::Column,
        };
        if needs_layout {
            tree.mark_needs_layout(item);
            tree.layout_if_needed(item);
        }
    }
}

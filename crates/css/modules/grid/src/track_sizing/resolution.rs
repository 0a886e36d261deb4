//! Resolving intrinsic track sizes from the items in content-sized tracks.
//!
//! Spec: §12.5 Resolve Intrinsic Track Sizes
//! <https://www.w3.org/TR/css-grid-2/#algo-content>

use core::fmt::Debug;
use core::hash::Hash;

use log::trace;

use super::GridTrackSizingAlgorithm;
use super::distribution::distribute_space_to_tracks;
use super::phases::{ContributionKind, TrackSizeComputationPhase, TrackSizeRestriction};
use super::track::GridTrack;
use crate::list_grid::GridIterator;
use crate::placement::GridSpan;
use crate::tree::GridLayoutTree;

/// Raise a growth limit to `size`; an infinite limit takes `size` as is.
fn grow_growth_limit(track: &mut GridTrack, size: f32) {
    let growth_limit = if track.growth_limit_is_infinite() {
        size
    } else {
        track.growth_limit().max(size)
    };
    track.set_growth_limit(growth_limit);
}

impl<NodeId: Copy + Eq + Hash + Debug> GridTrackSizingAlgorithm<'_, NodeId> {
    /// Items touching any track in `track_indices`, with their span in the
    /// axis being sized.
    ///
    /// An item is reported at the first listed track it covers only.
    pub(super) fn items_in_track_indices(&self, track_indices: &[usize]) -> Vec<(NodeId, GridSpan)> {
        let axis = self.axis;
        let mut items = Vec::new();
        for (position, &track_index) in track_indices.iter().enumerate() {
            let previous = position.checked_sub(1).and_then(|previous| track_indices.get(previous));
            let mut iterator = GridIterator::new(self.grid, axis, track_index, 0);
            while let Some(item) = iterator.next_grid_item() {
                let span = self.grid.grid_item_span(item, axis);
                if let Some(&previous) = previous
                    && span.start_line() <= previous
                {
                    continue;
                }
                items.push((item, span));
            }
        }
        items
    }

    /// Whether any track under `span` has a flexible sizing function.
    fn spanning_item_crosses_flexible_sized_tracks(&self, span: GridSpan) -> bool {
        let tracks = self.tracks.get(self.axis);
        span.iter().filter_map(|index| tracks.get(index)).any(|track| {
            let track_size = track.cached_track_size();
            track_size.min_breadth().is_flexible() || track_size.max_breadth().is_flexible()
        })
    }

    /// Size the only track of a single-span item from its contributions.
    fn size_track_to_fit_non_spanning_item<T>(&mut self, tree: &mut T, span: GridSpan, item: NodeId)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let track_position = span.start_line();
        let Some(track_size) = self
            .tracks
            .get(axis)
            .get(track_position)
            .map(|track| *track.cached_track_size())
        else {
            return;
        };

        let base_contribution = if track_size.has_min_content_min() {
            Some(self.content_for_child(tree, item, ContributionKind::MinContent))
        } else if track_size.has_max_content_min() {
            Some(self.content_for_child(tree, item, ContributionKind::MaxContent))
        } else if track_size.has_auto_min() {
            Some(self.min_size_for_child(tree, item))
        } else {
            None
        };

        let limit_contribution = if track_size.has_min_content_max() {
            Some(self.content_for_child(tree, item, ContributionKind::MinContent))
        } else if track_size.has_max_content_or_auto_max() {
            let max_content = self.content_for_child(tree, item, ContributionKind::MaxContent);
            let available = self.available_space(axis).unwrap_or(0.0);
            let cap = track_size
                .fit_content_breadth()
                .and_then(|limit| limit.fixed_value(available));
            Some(cap.map_or(max_content, |cap| max_content.min(cap)))
        } else {
            None
        };

        let track = &mut self.tracks.get_mut(axis)[track_position];
        if let Some(contribution) = base_contribution {
            track.set_base_size(track.base_size().max(contribution));
        }
        if let Some(contribution) = limit_contribution {
            grow_growth_limit(track, contribution);
        }
    }

    /// Run one phase over a group of items that all span the same number of tracks.
    ///
    /// # Panics
    /// Panics if a span reaches past the tracks being sized.
    fn increase_sizes_to_accommodate_spanning_items<T>(
        &mut self,
        tree: &mut T,
        items: &[(NodeId, GridSpan)],
        phase: TrackSizeComputationPhase,
    ) where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let Some(contribution_kind) = phase.contribution() else {
            return;
        };
        {
            let tracks = self.tracks.get_mut(axis);
            for &index in &self.content_sized_tracks_index {
                let track = &mut tracks[index];
                track.set_planned_size(phase.track_size(track, TrackSizeRestriction::AllowInfinity));
            }
        }

        for &(item, span) in items {
            debug_assert!(span.integer_span() > 1, "non-spanning item in a spanning group");
            let mut filtered_tracks = Vec::new();
            let mut grow_beyond_growth_limits_tracks = Vec::new();
            let mut spanning_tracks_size = 0.0;
            for index in span {
                let track = &self.tracks.get(axis)[index];
                spanning_tracks_size += phase.track_size(track, TrackSizeRestriction::ForbidInfinity);
                let track_size = track.cached_track_size();
                if !phase.should_process(track_size) {
                    continue;
                }
                filtered_tracks.push(index);
                if phase.grows_beyond_growth_limit(track_size) {
                    grow_beyond_growth_limits_tracks.push(index);
                }
            }
            if filtered_tracks.is_empty() {
                continue;
            }

            spanning_tracks_size += self.gutters(axis, span.start_line(), span.integer_span());
            let contribution = self.contribution_for_child(tree, item, contribution_kind);
            let mut extra_space = (contribution - spanning_tracks_size).max(0.0);
            if grow_beyond_growth_limits_tracks.is_empty() {
                grow_beyond_growth_limits_tracks.clone_from(&filtered_tracks);
            }
            trace!("{phase:?}: {item:?} distributes {extra_space} over {filtered_tracks:?}");
            distribute_space_to_tracks(
                phase,
                self.tracks.get_mut(axis),
                &mut filtered_tracks,
                Some(grow_beyond_growth_limits_tracks.as_mut_slice()),
                &mut extra_space,
            );
        }

        let tracks = self.tracks.get_mut(axis);
        for &index in &self.content_sized_tracks_index {
            let track = &mut tracks[index];
            phase.mark_infinitely_growable(track);
            phase.update_track_size(track);
        }
    }

    /// Size every content-sized track from the items it holds.
    pub(super) fn resolve_intrinsic_track_sizes<T>(&mut self, tree: &mut T)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let mut items_sorted_by_increasing_span = Vec::new();
        if self.grid.has_grid_items() {
            let content_sized_tracks = self.content_sized_tracks_index.clone();
            for (item, span) in self.items_in_track_indices(&content_sized_tracks) {
                if span.integer_span() == 1 {
                    self.size_track_to_fit_non_spanning_item(tree, span, item);
                } else if !self.spanning_item_crosses_flexible_sized_tracks(span) {
                    items_sorted_by_increasing_span.push((item, span));
                }
            }
            items_sorted_by_increasing_span.sort_by_key(|(_, span)| span.integer_span());
        }

        for group in items_sorted_by_increasing_span
            .chunk_by(|(_, first), (_, second)| first.integer_span() == second.integer_span())
        {
            for phase in TrackSizeComputationPhase::SPANNING_ITEM_PHASES {
                self.increase_sizes_to_accommodate_spanning_items(tree, group, phase);
            }
        }

        let tracks = self.tracks.get_mut(axis);
        for &index in &self.content_sized_tracks_index {
            let track = &mut tracks[index];
            if track.growth_limit_is_infinite() {
                track.set_growth_limit(track.base_size());
            }
        }
    }
}

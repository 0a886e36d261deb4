//! Size contributions of grid items to the tracks they span.
//!
//! Spec: §12.4 Resolve Intrinsic Track Sizes, §6.6 Automatic Minimum Size of Grid Items
//! <https://www.w3.org/TR/css-grid-2/#min-size-auto>

use core::fmt::Debug;
use core::hash::Hash;

use super::phases::ContributionKind;
use super::strategy::SizingStrategy;
use super::track::GridTrack;
use super::{GridTrackSizingAlgorithm, SizingState};
use crate::tree::{GridLayoutTree, ItemLength};
use crate::types::GridAxis;

/// Containing-block sizes closer than this are the same size.
const SIZE_EPSILON: f32 = 1e-3;

fn same_size(current: Option<f32>, next: Option<f32>) -> bool {
    match (current, next) {
        (None, None) => true,
        (Some(current), Some(next)) => (current - next).abs() < SIZE_EPSILON,
        _ => false,
    }
}

/// Set the item's containing-block size in `axis`, reporting whether it changed.
pub fn update_override_containing_block_size<NodeId, T>(
    tree: &mut T,
    item: NodeId,
    axis: GridAxis,
    size: Option<f32>,
) -> bool
where
    NodeId: Copy,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    if same_size(tree.override_containing_block_size(item, axis), size) {
        return false;
    }
    tree.set_override_containing_block_size(item, axis, size);
    true
}

impl<NodeId: Copy + Eq + Hash + Debug> GridTrackSizingAlgorithm<'_, NodeId> {
    /// Contribution of `item` that `kind` names, in the axis being sized.
    pub(super) fn contribution_for_child<T>(&self, tree: &mut T, item: NodeId, kind: ContributionKind) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        match kind {
            ContributionKind::MinSize => self.min_size_for_child(tree, item),
            ContributionKind::MinContent | ContributionKind::MaxContent => {
                self.content_for_child(tree, item, kind)
            }
        }
    }

    /// Min-content or max-content contribution, margins and shim included.
    pub(super) fn content_for_child<T>(&self, tree: &mut T, item: NodeId, kind: ContributionKind) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let inline_axis = tree.inline_axis(item);
        if self.strategy == SizingStrategy::Indefinite && axis == GridAxis::Column && inline_axis != axis {
            // Intrinsic width from an orthogonal item: use its pre-layout.
            return tree.block_size(item)
                + tree.axis_style(item, axis).margin
                + self.baseline_offset_for_child(item, axis);
        }

        if inline_axis == axis {
            let sizes = tree.content_sizes(item);
            let content = if kind == ContributionKind::MinContent {
                sizes.min_content
            } else {
                sizes.max_content
            };
            return content + tree.axis_style(item, axis).margin + self.baseline_offset_for_child(item, axis);
        }

        let breadth = self.grid_area_breadth_for_child(&*tree, item, inline_axis);
        if update_override_containing_block_size(tree, item, inline_axis, breadth) {
            tree.mark_needs_layout(item);
        }
        self.logical_height_for_child(tree, item)
    }

    /// Block size of the item laid out in its current inline size.
    fn logical_height_for_child<T>(&self, tree: &mut T, item: NodeId) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let block_axis = self.axis;
        let style = tree.axis_style(item, block_axis);
        // A relative block size must not resolve against a stale area.
        if style.has_relative_or_intrinsic_size() || style.has_percentage_margin_or_padding {
            tree.set_override_containing_block_size(item, block_axis, None);
            tree.mark_needs_layout(item);
        }
        tree.layout_if_needed(item);
        tree.block_size(item) + style.margin + self.baseline_offset_for_child(item, block_axis)
    }

    /// Automatic minimum contribution of `item`.
    pub(super) fn min_size_for_child<T>(&self, tree: &mut T, item: NodeId) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let style = tree.axis_style(item, axis);
        if !style.size.is_auto() && !style.size.is_percentage() {
            return self.content_for_child(tree, item, ContributionKind::MinContent);
        }

        let baseline_shim = self.baseline_offset_for_child(item, axis);
        if style.min_size.is_auto() && !style.is_scroll_container {
            let min_size = self.content_for_child(tree, item, ContributionKind::MinContent);
            let available = self.available_space(axis).unwrap_or(0.0);
            let tracks = self.tracks.get(axis);
            let mut max_breadth = 0.0;
            for index in self.grid.grid_item_span(item, axis) {
                let fixed_max = tracks
                    .get(index)
                    .and_then(|track| track.cached_track_size().max_breadth().fixed_value(available));
                let Some(fixed_max) = fixed_max else {
                    return min_size;
                };
                max_breadth += fixed_max;
            }
            if min_size > max_breadth {
                return max_breadth.max(style.margin + style.border_and_padding + baseline_shim);
            }
            return min_size;
        }

        let inline_axis = tree.inline_axis(item);
        let area_breadth = self.grid_area_breadth_for_child(&*tree, item, inline_axis);
        self.min_logical_size_for_child(tree, item, style.min_size, area_breadth) + baseline_shim
    }

    /// Resolved `min-width`/`min-height` plus margins.
    fn min_logical_size_for_child<T>(
        &self,
        tree: &mut T,
        item: NodeId,
        min_size: ItemLength,
        available: Option<f32>,
    ) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let inline_axis = tree.inline_axis(item);
        let style = tree.axis_style(item, axis);
        if self.strategy == SizingStrategy::Definite {
            let indefinite_size = (axis == inline_axis).then_some(0.0);
            if style.has_percentage_margin_or_padding
                || (axis != inline_axis && style.has_relative_or_intrinsic_size())
            {
                tree.set_override_containing_block_size(item, axis, indefinite_size);
            }
        }

        if axis == inline_axis {
            let resolved = min_size.resolve(available).unwrap_or(0.0);
            return resolved.max(style.border_and_padding) + style.margin;
        }

        let changed = update_override_containing_block_size(tree, item, inline_axis, available);
        self.layout_grid_item_for_min_size_computation(tree, item, changed);
        let containing_block = tree.override_containing_block_size(item, axis);
        let resolved = min_size.resolve(containing_block).unwrap_or(0.0);
        resolved.max(style.border_and_padding) + style.margin
    }

    /// Breadth of the item's grid area in `axis` from the current base sizes.
    ///
    /// Rows are estimated while the columns are sized for the first time.
    /// `None` means the area is indefinite.
    ///
    /// # Panics
    /// Panics if `item` is not placed on the grid.
    pub fn grid_area_breadth_for_child<T>(&self, tree: &T, item: NodeId, axis: GridAxis) -> Option<f32>
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let mut add_content_alignment_offset =
            axis == GridAxis::Column && self.sizing_state == SizingState::RowSizingFirstIteration;
        if axis == GridAxis::Row && self.sizing_state.is_column_sizing() {
            debug_assert!(tree.is_orthogonal(item), "row area of a parallel item while sizing columns");
            if self.sizing_state == SizingState::ColumnSizingFirstIteration {
                return self.estimated_grid_area_breadth_for_child(tree, item, GridAxis::Row);
            }
            add_content_alignment_offset = true;
        }

        let span = self.grid.grid_item_span(item, axis);
        let tracks = self.tracks.get(axis);
        let mut breadth: f32 = span
            .iter()
            .filter_map(|index| tracks.get(index))
            .map(GridTrack::base_size)
            .sum();
        if add_content_alignment_offset {
            let gaps = (span.integer_span() - 1) as f32;
            breadth = self.distribution_offsets.get(axis).mul_add(gaps, breadth);
        }
        Some(breadth + self.gutters(axis, span.start_line(), span.integer_span()))
    }

    /// Grid area breadth from the fixed maximum sizing functions alone.
    ///
    /// Used before the tracks of `axis` are sized. Indefinite when a spanned
    /// track has a content-sized, flexible or unresolvable maximum; on the
    /// item's inline axis that falls back to its max-content size.
    ///
    /// # Panics
    /// Panics if `item` is not placed on the grid.
    pub fn estimated_grid_area_breadth_for_child<T>(
        &self,
        tree: &T,
        item: NodeId,
        axis: GridAxis,
    ) -> Option<f32>
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let span = self.grid.grid_item_span(item, axis);
        let available = self.available_space(axis);
        let mut size = 0.0;
        let mut indefinite = false;
        for index in span {
            let track_size = if self.needs_setup {
                self.raw_grid_track_size(axis, index)
            } else {
                self.calculate_grid_track_size(axis, index)
            };
            let max_breadth = track_size.max_breadth();
            if max_breadth.is_intrinsic()
                || max_breadth.is_flexible()
                || (max_breadth.has_percentage() && available.is_none())
            {
                indefinite = true;
            } else if let Some(fixed) = max_breadth.fixed_value(available.unwrap_or(0.0)) {
                size += fixed;
            }
        }
        size += self.gutters(axis, span.start_line(), span.integer_span());

        if indefinite {
            return (axis == tree.inline_axis(item)).then(|| tree.content_sizes(item).max_content.max(size));
        }
        Some(size)
    }

    /// Whether any track the item spans in `axis` depends on content.
    ///
    /// # Panics
    /// Panics if `item` is not placed on the grid.
    pub(super) fn is_intrinsic_sized_grid_area(&self, item: NodeId, axis: GridAxis) -> bool {
        let indefinite = self.available_space(axis).is_none();
        self.grid.grid_item_span(item, axis).iter().any(|index| {
            let track_size = self.raw_grid_track_size(axis, index);
            track_size.is_content_sized()
                || track_size.is_fit_content()
                || track_size.min_breadth().is_flexible()
                || (track_size.max_breadth().is_flexible() && indefinite)
        })
    }

    /// Whether a baseline-aligned item can share a baseline in `axis`
    /// without its size depending on that baseline.
    pub(super) fn can_participate_in_baseline_alignment<T>(&self, tree: &T, item: NodeId, axis: GridAxis) -> bool
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        // Parallel: the item's block axis is the axis being aligned.
        let is_parallel = tree.inline_axis(item) != axis;
        if is_parallel && tree.baseline(item, axis).is_some() {
            return true;
        }
        if !self.is_intrinsic_sized_grid_area(item, axis) {
            return true;
        }
        let size = tree.axis_style(item, axis).size;
        if is_parallel {
            !size.is_percentage()
        } else {
            !size.is_percentage() && !size.is_auto()
        }
    }

    /// Distance from the item's margin-box start to its baseline in `axis`.
    ///
    /// Items without a natural baseline synthesize one at the end of their
    /// margin box.
    pub(super) fn baseline_ascent<T>(tree: &T, item: NodeId, axis: GridAxis) -> f32
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        if let Some(ascent) = tree.baseline(item, axis) {
            return ascent;
        }
        let extent = if tree.inline_axis(item) == axis {
            let sizes = tree.content_sizes(item);
            tree.override_containing_block_size(item, axis)
                .map_or(sizes.max_content, |available| {
                    available.min(sizes.max_content).max(sizes.min_content)
                })
        } else {
            tree.block_size(item)
        };
        extent + tree.axis_style(item, axis).margin
    }

    /// Shim that moves a participating item onto its group's baseline.
    ///
    /// # Panics
    /// Panics if a participating item is no longer placed on the grid.
    pub fn baseline_offset_for_child(&self, item: NodeId, axis: GridAxis) -> f32 {
        let Some(alignment) = self.baseline_items.get(axis).participating_alignment(item) else {
            return 0.0;
        };
        let start_line = self.grid.grid_item_span(item, axis).start_line();
        self.baseline_contexts.get(axis).shim(item, alignment, start_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridContainerInputs;
    use crate::list_grid::ListGrid;
    use crate::placement::{GridArea, GridSpan};
    use crate::test_tree::{FixedItem, FixedTree};
    use crate::tree::ItemAxisStyle;
    use crate::types::{GridAxisTracks, GridTrackSize, TrackBreadth};

    const EPSILON: f32 = 1e-3;

    fn columns(tracks: Vec<GridTrackSize>, gap: f32) -> GridContainerInputs {
        GridContainerInputs::new(GridAxisTracks::new(vec![GridTrackSize::default()], 0.0), GridAxisTracks::new(tracks, gap))
    }

    /// One row holding item `1` over `columns`.
    fn grid_with_item(columns: (usize, usize), num_columns: usize) -> ListGrid<u32> {
        let mut grid = ListGrid::new();
        grid.ensure_grid_size(1, num_columns);
        grid.insert(1, GridArea::new(GridSpan::new(0, 1), GridSpan::new(columns.0, columns.1)));
        grid.set_needs_items_placement(false);
        grid
    }

    fn size_columns(grid: &ListGrid<u32>, inputs: &GridContainerInputs, tree: &mut FixedTree, available: Option<f32>) -> Vec<f32> {
        let mut algorithm = GridTrackSizingAlgorithm::new(grid, inputs);
        algorithm.setup(tree, GridAxis::Column, available);
        algorithm.run(tree);
        algorithm.tracks(GridAxis::Column).iter().map(GridTrack::base_size).collect()
    }

    fn assert_sizes(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (actual_size, expected_size) in actual.iter().zip(expected) {
            assert!((actual_size - expected_size).abs() < EPSILON, "{actual:?} != {expected:?}");
        }
    }

    fn fixed_max(max: f32) -> GridTrackSize {
        GridTrackSize::MinMax(TrackBreadth::Auto, TrackBreadth::Length(max))
    }

    /// The automatic minimum of an item in `minmax(auto, 20px)` is clamped
    /// to the fixed maximum, but never below its margins, borders and
    /// padding.
    ///
    /// # Panics
    /// Panics if the automatic minimum is not clamped.
    #[test]
    fn automatic_minimum_clamped_to_fixed_max() {
        let grid = grid_with_item((0, 1), 1);
        let inputs = columns(vec![fixed_max(20.0)], 0.0);

        let mut tree = FixedTree::new().with_item(1, FixedItem::new(50.0, 80.0));
        assert_sizes(&size_columns(&grid, &inputs, &mut tree, Some(100.0)), &[20.0]);

        let mut padded = FixedItem::new(50.0, 80.0);
        padded.column_style = ItemAxisStyle {
            border_and_padding: 30.0,
            ..ItemAxisStyle::default()
        };
        let mut tree = FixedTree::new().with_item(1, padded);
        assert_sizes(&size_columns(&grid, &inputs, &mut tree, Some(100.0)), &[30.0]);

        // Without a fixed maximum the min-content contribution stands.
        let auto = columns(vec![GridTrackSize::MinMax(TrackBreadth::Auto, TrackBreadth::MinContent)], 0.0);
        let mut tree = FixedTree::new().with_item(1, FixedItem::new(50.0, 80.0));
        assert_sizes(&size_columns(&grid, &auto, &mut tree, Some(100.0)), &[50.0]);
    }

    /// An explicit `min-width` replaces the automatic minimum and is not
    /// clamped by the track's fixed maximum.
    ///
    /// # Panics
    /// Panics if the explicit minimum is ignored or clamped.
    #[test]
    fn explicit_min_width_contribution() {
        let grid = grid_with_item((0, 1), 1);
        let inputs = columns(vec![fixed_max(20.0)], 0.0);
        let mut item = FixedItem::new(50.0, 80.0);
        item.column_style = ItemAxisStyle {
            min_size: ItemLength::Fixed(40.0),
            margin: 4.0,
            ..ItemAxisStyle::default()
        };
        let mut tree = FixedTree::new().with_item(1, item);
        assert_sizes(&size_columns(&grid, &inputs, &mut tree, Some(100.0)), &[44.0]);

        // A scroll container has no automatic minimum.
        let mut scroller = FixedItem::new(50.0, 80.0);
        scroller.column_style = ItemAxisStyle {
            border_and_padding: 6.0,
            is_scroll_container: true,
            ..ItemAxisStyle::default()
        };
        let mut tree = FixedTree::new().with_item(1, scroller);
        let inputs = columns(vec![GridTrackSize::MinMax(TrackBreadth::Auto, TrackBreadth::Length(0.0))], 0.0);
        assert_sizes(&size_columns(&grid, &inputs, &mut tree, Some(100.0)), &[6.0]);
    }

    /// Estimated area breadths sum fixed maxima and gutters, fall back to
    /// the max-content size on the inline axis when a track is content
    /// sized, and stay indefinite on the other axis.
    ///
    /// # Panics
    /// Panics if an estimate is wrong.
    #[test]
    fn estimated_area_breadth() {
        let mut tree = FixedTree::new().with_item(1, FixedItem::new(10.0, 80.0));
        let grid = grid_with_item((0, 2), 2);

        let fixed = columns(vec![GridTrackSize::length(20.0), GridTrackSize::length(30.0)], 10.0);
        let mut algorithm = GridTrackSizingAlgorithm::new(&grid, &fixed);
        algorithm.setup(&mut tree, GridAxis::Column, Some(200.0));
        let estimate = algorithm.estimated_grid_area_breadth_for_child(&tree, 1, GridAxis::Column);
        assert!((estimate.unwrap_or(f32::NAN) - 60.0).abs() < EPSILON, "{estimate:?}");

        let content_sized = columns(vec![GridTrackSize::default(), GridTrackSize::length(30.0)], 10.0);
        let mut algorithm = GridTrackSizingAlgorithm::new(&grid, &content_sized);
        algorithm.setup(&mut tree, GridAxis::Column, Some(200.0));
        let estimate = algorithm.estimated_grid_area_breadth_for_child(&tree, 1, GridAxis::Column);
        assert!((estimate.unwrap_or(f32::NAN) - 80.0).abs() < EPSILON, "{estimate:?}");

        let percentage = columns(
            vec![GridTrackSize::Breadth(TrackBreadth::Percentage(0.5)), GridTrackSize::length(30.0)],
            10.0,
        );
        let mut algorithm = GridTrackSizingAlgorithm::new(&grid, &percentage);
        algorithm.setup(&mut tree, GridAxis::Column, None);
        let estimate = algorithm.estimated_grid_area_breadth_for_child(&tree, 1, GridAxis::Column);
        assert!((estimate.unwrap_or(f32::NAN) - 80.0).abs() < EPSILON, "{estimate:?}");

        let mut orthogonal = FixedTree::new().with_item(1, FixedItem::new(10.0, 80.0).orthogonal());
        let mut algorithm = GridTrackSizingAlgorithm::new(&grid, &content_sized);
        algorithm.setup(&mut orthogonal, GridAxis::Column, Some(200.0));
        assert_eq!(
            algorithm.estimated_grid_area_breadth_for_child(&orthogonal, 1, GridAxis::Column),
            None
        );
    }

    /// Override sizes compare with a tolerance and by definiteness.
    ///
    /// # Panics
    /// Panics if two sizes compare wrongly.
    #[test]
    fn override_size_comparison() {
        assert!(same_size(None, None));
        assert!(same_size(Some(10.0), Some(10.0 + 1e-5)));
        assert!(!same_size(Some(10.0), Some(11.0)));
        assert!(!same_size(Some(0.0), None));
    }
}

//! Grid track sizing algorithm.
//!
//! Spec: §12 Grid Sizing
//! <https://www.w3.org/TR/css-grid-2/#algo-track-sizing>
//!
//! One [`GridTrackSizingAlgorithm`] sizes the columns, then the rows, then
//! (when needed) both again. Each axis is sized by a [`setup`] followed by
//! a [`run`]; the sizing state advances after every run.
//!
//! [`setup`]: GridTrackSizingAlgorithm::setup
//! [`run`]: GridTrackSizingAlgorithm::run

mod contributions;
mod distribution;
mod expansion;
mod flex;
mod phases;
mod resolution;
mod strategy;
mod track;

use core::fmt::Debug;
use core::hash::Hash;

use tracing::{debug, debug_span};

use crate::baseline::{BaselineContext, BaselineItems};
use crate::layout::{GridContainerInputs, gutters_size};
use crate::list_grid::ListGrid;
use crate::tree::GridLayoutTree;
use crate::types::{GridAlignment, GridAxis};

pub use contributions::update_override_containing_block_size;
pub use expansion::{initial_base_size, initial_growth_limit, raw_grid_track_size};
pub use flex::find_fr_unit_size;
pub use phases::{TrackSizeComputationPhase, TrackSizeRestriction};
pub use strategy::SizingStrategy;
pub use track::GridTrack;

/// Where the algorithm is in the columns, rows, columns, rows sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingState {
    #[default]
    ColumnSizingFirstIteration,
    RowSizingFirstIteration,
    ColumnSizingSecondIteration,
    RowSizingSecondIteration,
}

impl SizingState {
    pub const fn is_column_sizing(self) -> bool {
        matches!(self, Self::ColumnSizingFirstIteration | Self::ColumnSizingSecondIteration)
    }

    /// Axis a run must size in this state.
    pub const fn axis(self) -> GridAxis {
        if self.is_column_sizing() {
            GridAxis::Column
        } else {
            GridAxis::Row
        }
    }
}

/// A value kept per grid axis.
#[derive(Debug, Clone, Default)]
struct PerAxis<T> {
    rows: T,
    columns: T,
}

impl<T> PerAxis<T> {
    const fn get(&self, axis: GridAxis) -> &T {
        match axis {
            GridAxis::Row => &self.rows,
            GridAxis::Column => &self.columns,
        }
    }

    const fn get_mut(&mut self, axis: GridAxis) -> &mut T {
        match axis {
            GridAxis::Row => &mut self.rows,
            GridAxis::Column => &mut self.columns,
        }
    }
}

/// Track sizes of one grid container across its sizing passes.
///
/// Borrows the placed grid and the container inputs; measurements come
/// from the [`GridLayoutTree`] passed to each step.
#[derive(Debug)]
pub struct GridTrackSizingAlgorithm<'grid, NodeId> {
    grid: &'grid ListGrid<NodeId>,
    inputs: &'grid GridContainerInputs,
    tracks: PerAxis<Vec<GridTrack>>,
    available_space: PerAxis<Option<f32>>,
    free_space: PerAxis<Option<f32>>,
    distribution_offsets: PerAxis<f32>,
    baseline_items: PerAxis<BaselineItems<NodeId>>,
    baseline_contexts: PerAxis<BaselineContext<NodeId>>,
    axis: GridAxis,
    strategy: SizingStrategy,
    sizing_state: SizingState,
    needs_setup: bool,
    content_sized_tracks_index: Vec<usize>,
    flexible_sized_tracks_index: Vec<usize>,
    auto_sized_tracks_for_stretch_index: Vec<usize>,
    has_percent_sized_rows_indefinite_height: bool,
    min_content_size: f32,
    max_content_size: f32,
}

impl<'grid, NodeId: Copy + Eq + Hash + Debug> GridTrackSizingAlgorithm<'grid, NodeId> {
    pub fn new(grid: &'grid ListGrid<NodeId>, inputs: &'grid GridContainerInputs) -> Self {
        Self {
            grid,
            inputs,
            tracks: PerAxis::default(),
            available_space: PerAxis::default(),
            free_space: PerAxis::default(),
            distribution_offsets: PerAxis::default(),
            baseline_items: PerAxis::default(),
            baseline_contexts: PerAxis::default(),
            axis: GridAxis::Column,
            strategy: SizingStrategy::Definite,
            sizing_state: SizingState::ColumnSizingFirstIteration,
            needs_setup: true,
            content_sized_tracks_index: Vec::new(),
            flexible_sized_tracks_index: Vec::new(),
            auto_sized_tracks_for_stretch_index: Vec::new(),
            has_percent_sized_rows_indefinite_height: false,
            min_content_size: 0.0,
            max_content_size: 0.0,
        }
    }

    /// Tracks of `axis` as left by the last run.
    pub fn tracks(&self, axis: GridAxis) -> &[GridTrack] {
        self.tracks.get(axis)
    }

    pub fn free_space(&self, axis: GridAxis) -> Option<f32> {
        *self.free_space.get(axis)
    }

    pub fn set_free_space(&mut self, axis: GridAxis, free_space: Option<f32>) {
        *self.free_space.get_mut(axis) = free_space;
    }

    pub fn available_space(&self, axis: GridAxis) -> Option<f32> {
        *self.available_space.get(axis)
    }

    pub fn set_available_space(&mut self, axis: GridAxis, available_space: Option<f32>) {
        *self.available_space.get_mut(axis) = available_space;
    }

    /// Sum of base sizes before maximization, from the last run.
    pub const fn min_content_size(&self) -> f32 {
        self.min_content_size
    }

    /// Sum of growth limits, plus flexible growth, from the last run.
    pub const fn max_content_size(&self) -> f32 {
        self.max_content_size
    }

    /// Whether percentage rows were treated as `auto` for lack of a height.
    pub const fn has_percent_sized_rows_indefinite_height(&self) -> bool {
        self.has_percent_sized_rows_indefinite_height
    }

    pub const fn sizing_state(&self) -> SizingState {
        self.sizing_state
    }

    /// Distance added between tracks of `axis` by content distribution.
    pub fn set_content_distribution_offset(&mut self, axis: GridAxis, offset: f32) {
        *self.distribution_offsets.get_mut(axis) = offset;
    }

    /// Remember an item that aligns to a baseline when `axis` is sized.
    pub fn cache_baseline_aligned_item(&mut self, item: NodeId, axis: GridAxis, alignment: GridAlignment) {
        self.baseline_items.get_mut(axis).insert(item, alignment);
    }

    pub fn clear_baseline_items(&mut self) {
        self.baseline_items.rows.clear();
        self.baseline_items.columns.clear();
    }

    /// Gutters between `span` tracks of `axis` starting at `start`.
    pub fn gutters(&self, axis: GridAxis, start: usize, span: usize) -> f32 {
        gutters_size(self.grid, self.inputs, axis, start, span, self.available_space(axis))
    }

    /// Prepare a run over `axis`.
    ///
    /// # Panics
    /// Panics if the previous setup was never followed by a run.
    pub fn setup<T>(&mut self, tree: &mut T, axis: GridAxis, available_space: Option<f32>)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        assert!(self.needs_setup, "setup called twice without a run");
        self.axis = axis;
        let available_space = available_space.map(|space| space.max(0.0));
        self.set_available_space(axis, available_space);
        self.strategy = if available_space.is_some() {
            SizingStrategy::Definite
        } else {
            SizingStrategy::Indefinite
        };

        self.content_sized_tracks_index.clear();
        self.flexible_sized_tracks_index.clear();
        self.auto_sized_tracks_for_stretch_index.clear();
        self.has_percent_sized_rows_indefinite_height = false;

        let num_tracks = self.grid.num_tracks(axis);
        let free_space = available_space.map(|space| space - self.gutters(axis, 0, num_tracks));
        self.set_free_space(axis, free_space);
        self.tracks.get_mut(axis).resize_with(num_tracks, GridTrack::default);

        self.compute_baseline_alignment_context(tree);
        self.needs_setup = false;
        debug!(?axis, num_tracks, ?available_space, strategy = ?self.strategy, "grid track sizing setup");
    }

    /// Recompute which baseline-aligned items share a baseline in the axis
    /// being sized, and their ascents.
    fn compute_baseline_alignment_context<T>(&mut self, tree: &mut T)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let candidates: Vec<(NodeId, GridAlignment, bool)> = self
            .baseline_items
            .get(axis)
            .iter()
            .map(|(item, alignment)| (item, alignment, self.can_participate_in_baseline_alignment(&*tree, item, axis)))
            .collect();

        self.baseline_contexts.get_mut(axis).clear();
        for (item, alignment, participates) in candidates {
            if participates {
                tree.layout_if_needed(item);
                let start_line = self.grid.grid_item_span(item, axis).start_line();
                let ascent = Self::baseline_ascent(&*tree, item, axis);
                self.baseline_contexts.get_mut(axis).update(item, alignment, start_line, ascent);
            }
            self.baseline_items.get_mut(axis).set_participates(item, participates);
        }
    }

    /// Size the tracks of the axis given to [`setup`](Self::setup).
    ///
    /// # Panics
    /// Panics if `setup` was not called first or its axis does not match
    /// the sizing state.
    pub fn run<T>(&mut self, tree: &mut T)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        assert!(!self.needs_setup, "run called without setup");
        assert_eq!(
            self.sizing_state.axis(),
            self.axis,
            "{:?} cannot size the {:?} axis",
            self.sizing_state,
            self.axis
        );
        let _span = debug_span!("grid.track_sizing", axis = ?self.axis, state = ?self.sizing_state).entered();
        self.run_steps(tree);
        self.advance_next_state();
        self.needs_setup = true;
    }

    fn run_steps<T>(&mut self, tree: &mut T)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        let axis = self.axis;
        let initial_free_space = self.free_space(axis);
        self.initialize_track_sizes();

        if self.is_computing_size_containment() {
            self.compute_grid_container_intrinsic_sizes();
            return;
        }

        if !self.content_sized_tracks_index.is_empty() {
            self.resolve_intrinsic_track_sizes(tree);
        }

        self.compute_grid_container_intrinsic_sizes();
        debug!(
            min_content_size = self.min_content_size,
            max_content_size = self.max_content_size,
            "intrinsic track sizes resolved"
        );

        if let Some(free_space) = self.free_space(axis) {
            let free_space = free_space - self.min_content_size;
            self.set_free_space(axis, Some(free_space));
            if free_space <= 0.0 {
                return;
            }
        }

        self.maximize_tracks();
        self.stretch_flexible_tracks(tree, initial_free_space);
        self.stretch_auto_tracks();
    }

    fn advance_next_state(&mut self) {
        self.sizing_state = match self.sizing_state {
            SizingState::ColumnSizingFirstIteration => SizingState::RowSizingFirstIteration,
            SizingState::RowSizingFirstIteration => {
                if self.is_computing_size_containment() {
                    SizingState::RowSizingFirstIteration
                } else {
                    SizingState::ColumnSizingSecondIteration
                }
            }
            SizingState::ColumnSizingSecondIteration => SizingState::RowSizingSecondIteration,
            SizingState::RowSizingSecondIteration => SizingState::ColumnSizingFirstIteration,
        };
    }

    /// Cache each track's sizing function and its starting sizes.
    fn initialize_track_sizes(&mut self) {
        let axis = self.axis;
        let available = self.available_space(axis).unwrap_or(0.0);
        let indefinite_height = axis == GridAxis::Row && self.inputs.available_height.is_none();
        let num_tracks = self.tracks.get(axis).len();
        for index in 0..num_tracks {
            let track_size = self.calculate_grid_track_size(axis, index);
            if indefinite_height && !self.has_percent_sized_rows_indefinite_height {
                self.has_percent_sized_rows_indefinite_height =
                    self.raw_grid_track_size(axis, index).has_percentage();
            }

            let track = &mut self.tracks.get_mut(axis)[index];
            track.set_growth_limit_cap(None);
            track.set_cached_track_size(track_size);
            let base_size = initial_base_size(&track_size, available);
            track.set_base_size(base_size);
            track.set_growth_limit(initial_growth_limit(&track_size, base_size, available));
            track.set_infinitely_growable(false);
            if let Some(limit) = track_size.fit_content_breadth() {
                track.set_growth_limit_cap(limit.fixed_value(available));
            }

            if track_size.is_content_sized() {
                self.content_sized_tracks_index.push(index);
            }
            if track_size.max_breadth().is_flexible() {
                self.flexible_sized_tracks_index.push(index);
            }
            if track_size.has_auto_max() && !track_size.is_fit_content() {
                self.auto_sized_tracks_for_stretch_index.push(index);
            }
        }
    }

    /// Record the min- and max-content sizes from the current tracks and
    /// drop the fit-content caps.
    fn compute_grid_container_intrinsic_sizes(&mut self) {
        let mut min_content_size = 0.0;
        let mut max_content_size = 0.0;
        for track in self.tracks.get_mut(self.axis) {
            min_content_size += track.base_size();
            max_content_size += track.used_growth_limit();
            track.set_growth_limit_cap(None);
        }
        self.min_content_size = min_content_size;
        self.max_content_size = max_content_size;
    }

    /// Sum of the growth limits plus every gutter.
    pub fn compute_track_based_size(&self) -> f32 {
        let tracks = self.tracks.get(self.axis);
        let size: f32 = tracks.iter().map(GridTrack::used_growth_limit).sum();
        size + self.gutters(self.axis, 0, tracks.len())
    }

    /// Growth of each flexible track for `flex_fraction`, and their sum.
    fn compute_flex_sizes_increments(&self, flex_fraction: f64) -> (Vec<f32>, f32) {
        let tracks = self.tracks.get(self.axis);
        let mut total_growth = 0.0;
        let increments = self
            .flexible_sized_tracks_index
            .iter()
            .map(|&index| {
                let track = &tracks[index];
                let flex_factor = f64::from(track.cached_track_size().max_breadth().flex_factor());
                let old_base_size = track.base_size();
                let new_base_size = old_base_size.max((flex_fraction * flex_factor) as f32);
                let increment = new_base_size - old_base_size;
                total_growth += increment;
                increment
            })
            .collect();
        (increments, total_growth)
    }

    /// Expand flexible tracks to the used `fr` size.
    fn stretch_flexible_tracks<T>(&mut self, tree: &mut T, initial_free_space: Option<f32>)
    where
        T: GridLayoutTree<NodeId> + ?Sized,
    {
        if self.flexible_sized_tracks_index.is_empty() {
            return;
        }
        let mut flex_fraction = self.find_used_flex_fraction(tree, initial_free_space);
        let (mut increments, mut total_growth) = self.compute_flex_sizes_increments(flex_fraction);
        if self.recompute_used_flex_fraction_if_needed(&mut flex_fraction, total_growth) {
            (increments, total_growth) = self.compute_flex_sizes_increments(flex_fraction);
        }
        debug!(flex_fraction, total_growth, "flexible tracks stretched");

        let axis = self.axis;
        let tracks = self.tracks.get_mut(axis);
        for (&index, &increment) in self.flexible_sized_tracks_index.iter().zip(&increments) {
            if increment != 0.0 {
                let track = &mut tracks[index];
                track.set_base_size(track.base_size() + increment);
            }
        }
        if let Some(free_space) = self.free_space(axis) {
            self.set_free_space(axis, Some(free_space - total_growth));
        }
        self.max_content_size += total_growth;
    }

    /// Share the remaining free space between `auto` tracks under
    /// `stretch` content distribution.
    fn stretch_auto_tracks(&mut self) {
        let axis = self.axis;
        let free_space = self.free_space_for_stretch_auto_tracks_step();
        if self.auto_sized_tracks_for_stretch_index.is_empty()
            || free_space <= 0.0
            || !self.inputs.content_alignment(axis).is_stretch()
        {
            return;
        }
        let size_to_increase = free_space / self.auto_sized_tracks_for_stretch_index.len() as f32;
        let tracks = self.tracks.get_mut(axis);
        for &index in &self.auto_sized_tracks_for_stretch_index {
            let track = &mut tracks[index];
            track.set_base_size(track.base_size() + size_to_increase);
        }
        self.set_free_space(axis, Some(0.0));
        debug!(free_space, "auto tracks stretched");
    }

    /// Forget every track and start over from the first column pass.
    pub fn reset(&mut self) {
        self.sizing_state = SizingState::ColumnSizingFirstIteration;
        self.tracks.rows.clear();
        self.tracks.columns.clear();
        self.content_sized_tracks_index.clear();
        self.flexible_sized_tracks_index.clear();
        self.auto_sized_tracks_for_stretch_index.clear();
        self.has_percent_sized_rows_indefinite_height = false;
        self.set_available_space(GridAxis::Row, None);
        self.set_available_space(GridAxis::Column, None);
        self.needs_setup = true;
    }
}

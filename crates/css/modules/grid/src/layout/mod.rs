//! Grid layout algorithm.
//!
//! Spec: §12 Grid Sizing
//! <https://www.w3.org/TR/css-grid-2/#layout-algorithm>
//!
//! Drives placement and the track sizing algorithm for one grid container,
//! then positions every item inside its grid area.

mod alignment;
mod gutters;

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::BTreeSet;

use tracing::{debug, debug_span};

pub use alignment::{
    ContentAlignmentOffset, compute_content_distribution_offset, populate_grid_positions,
    self_alignment_offset,
};
pub use gutters::gutters_size;

use crate::error::GridError;
use crate::list_grid::ListGrid;
use crate::placement::{GridArea, GridSpan, place_items_on_grid};
use crate::track_sizing::{GridTrack, GridTrackSizingAlgorithm, update_override_containing_block_size};
use crate::tree::{ContentSizes, GridLayoutTree};
use crate::types::{ContentAlignment, GridAlignment, GridAutoFlow, GridAxis, GridAxisTracks, GridItem};

/// `min-*`/`max-*` sizes of the container in one axis, content box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSizeConstraints {
    pub min_size: Option<f32>,
    pub max_size: Option<f32>,
    /// Size that replaces the content-based size, as from
    /// `contain-intrinsic-size`.
    pub intrinsic_size_override: Option<f32>,
}

impl AxisSizeConstraints {
    /// Clamp `size` to the max size, then the min size.
    pub fn clamp(&self, size: f32) -> f32 {
        let size = self.max_size.map_or(size, |max_size| size.min(max_size));
        self.min_size.map_or(size, |min_size| size.max(min_size))
    }
}

/// Input parameters for grid layout.
#[derive(Debug, Clone)]
pub struct GridContainerInputs {
    /// Row tracks definition
    pub row_tracks: GridAxisTracks,
    /// Column tracks definition
    pub col_tracks: GridAxisTracks,
    /// Auto-flow direction
    pub auto_flow: GridAutoFlow,
    /// `justify-content`
    pub justify_content: ContentAlignment,
    /// `align-content`
    pub align_content: ContentAlignment,
    /// Content-box width, `None` to size the container to its content
    pub available_width: Option<f32>,
    /// Content-box height, `None` when the height depends on the rows
    pub available_height: Option<f32>,
    pub width_constraints: AxisSizeConstraints,
    pub height_constraints: AxisSizeConstraints,
    /// `contain: size`; the items do not contribute to the container size.
    pub size_containment: bool,
}

impl GridContainerInputs {
    /// Inputs with indefinite sizes and default alignment.
    pub fn new(row_tracks: GridAxisTracks, col_tracks: GridAxisTracks) -> Self {
        Self {
            row_tracks,
            col_tracks,
            auto_flow: GridAutoFlow::default(),
            justify_content: ContentAlignment::default(),
            align_content: ContentAlignment::default(),
            available_width: None,
            available_height: None,
            width_constraints: AxisSizeConstraints::default(),
            height_constraints: AxisSizeConstraints::default(),
            size_containment: false,
        }
    }

    pub const fn tracks(&self, axis: GridAxis) -> &GridAxisTracks {
        match axis {
            GridAxis::Row => &self.row_tracks,
            GridAxis::Column => &self.col_tracks,
        }
    }

    pub const fn constraints(&self, axis: GridAxis) -> &AxisSizeConstraints {
        match axis {
            GridAxis::Row => &self.height_constraints,
            GridAxis::Column => &self.width_constraints,
        }
    }

    /// Gap between tracks of `axis`, percentages resolved against `available`.
    pub fn gap(&self, axis: GridAxis, available: Option<f32>) -> f32 {
        self.tracks(axis).gap.resolve(available)
    }

    /// `justify-content` for columns, `align-content` for rows.
    pub const fn content_alignment(&self, axis: GridAxis) -> ContentAlignment {
        match axis {
            GridAxis::Row => self.align_content,
            GridAxis::Column => self.justify_content,
        }
    }

    /// Reject inputs the layout cannot work with.
    ///
    /// # Errors
    /// Returns the first invalid track list or available size found.
    pub fn validate(&self) -> Result<(), GridError> {
        self.row_tracks.validate(GridAxis::Row)?;
        self.col_tracks.validate(GridAxis::Column)?;
        for (axis, available) in [
            (GridAxis::Row, self.available_height),
            (GridAxis::Column, self.available_width),
        ] {
            if available.is_some_and(|size| size.is_nan() || size < 0.0) {
                return Err(GridError::InvalidAvailableSize { axis });
            }
        }
        Ok(())
    }
}

/// A grid item with its final position and size.
#[derive(Debug, Clone)]
pub struct GridPlacedItem<NodeId = usize> {
    /// Node identifier (generic to support different node ID types)
    pub node_id: NodeId,
    /// Margin-box x position from the container's content-box start
    pub x: f32,
    /// Margin-box y position from the container's content-box start
    pub y: f32,
    /// Margin-box width
    pub width: f32,
    /// Margin-box height
    pub height: f32,
    /// Grid area occupied
    pub area: GridArea,
}

/// Result of grid layout computation.
#[derive(Debug, Clone)]
pub struct GridLayoutResult<NodeId = usize> {
    /// Placed items in document order
    pub items: Vec<GridPlacedItem<NodeId>>,
    /// Content-box width of the container
    pub width: f32,
    /// Content-box height of the container
    pub height: f32,
    /// Position of every column line, first line included
    pub column_positions: Vec<f32>,
    /// Position of every row line, first line included
    pub row_positions: Vec<f32>,
    /// Used column sizes
    pub column_sizes: Vec<f32>,
    /// Used row sizes
    pub row_sizes: Vec<f32>,
}

fn compute_track_sizes<NodeId, T>(
    algorithm: &mut GridTrackSizingAlgorithm<'_, NodeId>,
    tree: &mut T,
    axis: GridAxis,
    available: Option<f32>,
) where
    NodeId: Copy + Eq + Hash + Debug,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    algorithm.setup(tree, axis, available);
    algorithm.run(tree);
}

/// Content distribution for the sized tracks of `axis`, shared with the
/// algorithm so later grid area breadths include it.
fn content_alignment_offset<NodeId: Copy + Eq + Hash + Debug>(
    algorithm: &mut GridTrackSizingAlgorithm<'_, NodeId>,
    grid: &ListGrid<NodeId>,
    inputs: &GridContainerInputs,
    axis: GridAxis,
) -> ContentAlignmentOffset {
    let collapsed_tracks = grid.auto_repeat_empty_tracks(axis).map_or(0, BTreeSet::len);
    let offset = compute_content_distribution_offset(
        inputs.content_alignment(axis),
        algorithm.free_space(axis).unwrap_or(0.0),
        grid.num_tracks(axis).saturating_sub(collapsed_tracks),
    );
    algorithm.set_content_distribution_offset(axis, offset.distribution_offset);
    offset
}

/// Impose a containing block on `item` in both axes, marking it for layout
/// when either changed.
fn update_grid_area_size<NodeId, T>(tree: &mut T, item: NodeId, column: Option<f32>, row: Option<f32>)
where
    NodeId: Copy,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    let column_changed = update_override_containing_block_size(tree, item, GridAxis::Column, column);
    let row_changed = update_override_containing_block_size(tree, item, GridAxis::Row, row);
    if column_changed || row_changed {
        tree.mark_needs_layout(item);
    }
}

fn cache_baseline_aligned_items<NodeId: Copy + Eq + Hash + Debug>(
    algorithm: &mut GridTrackSizingAlgorithm<'_, NodeId>,
    items: &[GridItem<NodeId>],
    axes: &[GridAxis],
) {
    for item in items {
        for &axis in axes {
            let alignment = item.self_alignment(axis);
            if alignment.is_baseline() {
                algorithm.cache_baseline_aligned_item(item.node_id, axis, alignment);
            }
        }
    }
}

/// Lay out the items whose sizes the track sizing needs up front:
/// orthogonal items, and baseline-aligned items whose baseline may have to
/// be synthesized.
fn perform_grid_items_pre_layout<NodeId, T>(
    algorithm: &GridTrackSizingAlgorithm<'_, NodeId>,
    items: &[GridItem<NodeId>],
    tree: &mut T,
) where
    NodeId: Copy + Eq + Hash + Debug,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    for item in items {
        let node = item.node_id;
        let orthogonal = tree.is_orthogonal(node);
        if !orthogonal && !item.align_self.is_baseline() && !item.justify_self.is_baseline() {
            continue;
        }
        let relative_size = [GridAxis::Row, GridAxis::Column]
            .into_iter()
            .any(|axis| tree.axis_style(node, axis).has_relative_or_intrinsic_size());
        if orthogonal || relative_size {
            let column = algorithm.estimated_grid_area_breadth_for_child(&*tree, node, GridAxis::Column);
            let row = algorithm.estimated_grid_area_breadth_for_child(&*tree, node, GridAxis::Row);
            update_grid_area_size(tree, node, column, row);
        }
        tree.layout_if_needed(node);
    }
}

/// Breadth of `span` between its first line and the end of its last
/// track, distribution offsets and gutters included.
///
/// # Panics
/// Panics if `span` reaches past `tracks`.
fn grid_area_breadth(positions: &[f32], tracks: &[GridTrack], span: GridSpan) -> f32 {
    let last_track = span.end_line() - 1;
    positions[last_track] - positions[span.start_line()] + tracks[last_track].base_size()
}

/// Border-box size of `item` in `axis` inside an area of `area_breadth`.
fn item_size<NodeId, T>(tree: &T, item: NodeId, axis: GridAxis, alignment: GridAlignment, area_breadth: f32) -> f32
where
    NodeId: Copy,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    let style = tree.axis_style(item, axis);
    let available = area_breadth - style.margin;
    let size = if let Some(size) = style.size.resolve(Some(area_breadth)) {
        size
    } else if alignment == GridAlignment::Stretch {
        available
    } else if tree.inline_axis(item) == axis {
        let sizes = tree.content_sizes(item);
        available.min(sizes.max_content).max(sizes.min_content)
    } else {
        tree.block_size(item)
    };
    let min_size = style.min_size.resolve(Some(area_breadth)).unwrap_or(0.0);
    size.max(min_size).max(style.border_and_padding)
}

/// Margin-box start and size of `item` inside its area of `axis`.
fn align_in_grid_area<NodeId, T>(
    algorithm: &GridTrackSizingAlgorithm<'_, NodeId>,
    tree: &T,
    item: &GridItem<NodeId>,
    axis: GridAxis,
    area_start: f32,
    area_breadth: f32,
) -> (f32, f32)
where
    NodeId: Copy + Eq + Hash + Debug,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    let alignment = item.self_alignment(axis);
    let margin_box = item_size(tree, item.node_id, axis, alignment, area_breadth) + tree.axis_style(item.node_id, axis).margin;
    let shim = algorithm.baseline_offset_for_child(item.node_id, axis);
    let offset = self_alignment_offset(alignment, area_breadth - margin_box, shim);
    (area_start + offset, margin_box)
}

/// Run the grid layout algorithm.
///
/// Spec: §12.1 Grid Sizing Algorithm
/// <https://www.w3.org/TR/css-grid-2/#algo-overview>
///
/// 1. Places the items on a sparse grid
/// 2. Sizes the columns, then the rows, then both again when an item is
///    orthogonal or percentage rows met an indefinite height
/// 3. Distributes free space with `justify-content` / `align-content`
/// 4. Lays out every item in its grid area and aligns it there
///
/// Without an available width the container takes its max-content width.
///
/// # Errors
/// Returns an error if a track list or an available size is invalid.
pub fn layout_grid<NodeId, T>(
    items: &[GridItem<NodeId>],
    inputs: &GridContainerInputs,
    tree: &mut T,
) -> Result<GridLayoutResult<NodeId>, GridError>
where
    NodeId: Copy + Eq + Hash + Debug,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    inputs.validate()?;
    let width = match inputs.available_width.or(inputs.width_constraints.intrinsic_size_override) {
        Some(width) => width,
        None => inputs
            .width_constraints
            .clamp(compute_intrinsic_inline_sizes(items, inputs, tree)?.max_content),
    };
    let _span = debug_span!("grid.layout", items = items.len(), width).entered();

    let mut grid = ListGrid::new();
    place_items_on_grid(&mut grid, items, inputs, Some(width));
    let has_any_orthogonal_item = items.iter().any(|item| tree.is_orthogonal(item.node_id));

    let mut algorithm = GridTrackSizingAlgorithm::new(&grid, inputs);
    cache_baseline_aligned_items(&mut algorithm, items, &[GridAxis::Row, GridAxis::Column]);
    algorithm.set_available_space(GridAxis::Column, Some(width));
    perform_grid_items_pre_layout(&algorithm, items, tree);

    compute_track_sizes(&mut algorithm, tree, GridAxis::Column, Some(width));
    let mut column_offset = content_alignment_offset(&mut algorithm, &grid, inputs, GridAxis::Column);

    let definite_height = inputs
        .available_height
        .or(inputs.height_constraints.intrinsic_size_override);
    compute_track_sizes(&mut algorithm, tree, GridAxis::Row, definite_height);
    let track_based_height = algorithm.compute_track_based_size();
    if definite_height.is_none() && inputs.size_containment {
        compute_track_sizes(&mut algorithm, tree, GridAxis::Row, Some(track_based_height));
    }
    let height = definite_height.unwrap_or_else(|| inputs.height_constraints.clamp(track_based_height));
    if definite_height.is_none() {
        algorithm.set_free_space(GridAxis::Row, Some(height - track_based_height));
    }
    let mut row_offset = content_alignment_offset(&mut algorithm, &grid, inputs, GridAxis::Row);

    // Contributions that depend on the row sizes may have changed.
    if has_any_orthogonal_item || algorithm.has_percent_sized_rows_indefinite_height() {
        debug!(has_any_orthogonal_item, "repeating track sizing");
        compute_track_sizes(&mut algorithm, tree, GridAxis::Column, Some(width));
        column_offset = content_alignment_offset(&mut algorithm, &grid, inputs, GridAxis::Column);
        compute_track_sizes(&mut algorithm, tree, GridAxis::Row, Some(height));
        row_offset = content_alignment_offset(&mut algorithm, &grid, inputs, GridAxis::Row);
    }

    let column_positions = populate_grid_positions(
        &grid,
        GridAxis::Column,
        algorithm.tracks(GridAxis::Column),
        inputs.gap(GridAxis::Column, algorithm.available_space(GridAxis::Column)),
        column_offset,
    );
    let row_positions = populate_grid_positions(
        &grid,
        GridAxis::Row,
        algorithm.tracks(GridAxis::Row),
        inputs.gap(GridAxis::Row, algorithm.available_space(GridAxis::Row)),
        row_offset,
    );

    let mut placed_items = Vec::with_capacity(items.len());
    for item in items {
        let node = item.node_id;
        let area = grid.grid_item_area(node);
        let column_breadth = grid_area_breadth(&column_positions, algorithm.tracks(GridAxis::Column), area.columns);
        let row_breadth = grid_area_breadth(&row_positions, algorithm.tracks(GridAxis::Row), area.rows);
        update_grid_area_size(tree, node, Some(column_breadth), Some(row_breadth));
        tree.layout_if_needed(node);

        let (x, item_width) = align_in_grid_area(
            &algorithm,
            &*tree,
            item,
            GridAxis::Column,
            column_positions[area.columns.start_line()],
            column_breadth,
        );
        let (y, item_height) = align_in_grid_area(
            &algorithm,
            &*tree,
            item,
            GridAxis::Row,
            row_positions[area.rows.start_line()],
            row_breadth,
        );
        placed_items.push(GridPlacedItem {
            node_id: node,
            x,
            y,
            width: item_width,
            height: item_height,
            area,
        });
    }

    let column_sizes = algorithm.tracks(GridAxis::Column).iter().map(GridTrack::base_size).collect();
    let row_sizes = algorithm.tracks(GridAxis::Row).iter().map(GridTrack::base_size).collect();
    algorithm.reset();
    algorithm.clear_baseline_items();
    debug!(width, height, "grid laid out");

    Ok(GridLayoutResult {
        items: placed_items,
        width,
        height,
        column_positions,
        row_positions,
        column_sizes,
        row_sizes,
    })
}

/// Min-content and max-content widths of the container's content box.
///
/// Spec: §12.3 Track Sizing Algorithm, applied under a min-content and
/// max-content constraint
///
/// # Errors
/// Returns an error if a track list or an available size is invalid.
pub fn compute_intrinsic_inline_sizes<NodeId, T>(
    items: &[GridItem<NodeId>],
    inputs: &GridContainerInputs,
    tree: &mut T,
) -> Result<ContentSizes, GridError>
where
    NodeId: Copy + Eq + Hash + Debug,
    T: GridLayoutTree<NodeId> + ?Sized,
{
    inputs.validate()?;
    let mut grid = ListGrid::new();
    place_items_on_grid(&mut grid, items, inputs, None);

    let mut algorithm = GridTrackSizingAlgorithm::new(&grid, inputs);
    perform_grid_items_pre_layout(&algorithm, items, tree);
    cache_baseline_aligned_items(&mut algorithm, items, &[GridAxis::Column]);
    compute_track_sizes(&mut algorithm, tree, GridAxis::Column, None);

    let gutters = algorithm.gutters(GridAxis::Column, 0, grid.num_tracks(GridAxis::Column));
    let sizes = ContentSizes {
        min_content: algorithm.min_content_size() + gutters,
        max_content: algorithm.max_content_size() + gutters,
    };
    debug!(min_content = sizes.min_content, max_content = sizes.max_content, "grid intrinsic inline sizes");
    Ok(sizes)
}

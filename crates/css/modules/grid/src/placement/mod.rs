//! Grid item placement algorithm.
//!
//! Spec: §8 Placing Grid Items
//! <https://www.w3.org/TR/css-grid-2/#placement>

mod area;
mod auto_repeat;
mod lines;

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use log::{debug, trace};

pub use area::{GridArea, GridSpan, ResolvedSpan, UntranslatedSpan};
pub use auto_repeat::{
    AUTO_REPEAT_MIN_TRACK_SIZE, MAX_GRID_TRACKS, clamp_auto_repeat_tracks,
    compute_auto_repeat_tracks_count, compute_empty_tracks_for_auto_repeat,
};
pub use lines::resolve_grid_positions;

use crate::layout::GridContainerInputs;
use crate::list_grid::{GridIterator, ListGrid};
use crate::types::{GridAxis, GridItem};

/// Placement lines resolved against the explicit grid.
#[derive(Debug, Clone, Copy)]
struct ResolvedItem<NodeId> {
    node_id: NodeId,
    rows: ResolvedSpan,
    columns: ResolvedSpan,
}

impl<NodeId> ResolvedItem<NodeId> {
    const fn span(&self, axis: GridAxis) -> ResolvedSpan {
        match axis {
            GridAxis::Row => self.rows,
            GridAxis::Column => self.columns,
        }
    }
}

/// Translate a resolved span, or `None` if it still needs auto-placement.
fn translate(span: ResolvedSpan, explicit_start: usize) -> Option<GridSpan> {
    match span {
        ResolvedSpan::Definite(lines) => Some(lines.translate(explicit_start)),
        ResolvedSpan::Indefinite(_) => None,
    }
}

/// Place every item on `grid`.
///
/// Recomputes the auto-repeat counts first; if they changed the previous
/// placement is discarded. Does nothing while the existing placement is
/// still valid.
///
/// Spec: §8.5 Grid Item Placement Algorithm
/// <https://www.w3.org/TR/css-grid-2/#auto-placement-algo>
pub fn place_items_on_grid<NodeId: Copy + Eq + Hash + Debug>(
    grid: &mut ListGrid<NodeId>,
    items: &[GridItem<NodeId>],
    inputs: &GridContainerInputs,
    available_width: Option<f32>,
) {
    let auto_repeat_rows = clamp_auto_repeat_tracks(
        inputs.row_tracks.auto_repeat_insertion_point,
        compute_auto_repeat_tracks_count(inputs, GridAxis::Row, inputs.available_height),
    );
    let auto_repeat_columns = clamp_auto_repeat_tracks(
        inputs.col_tracks.auto_repeat_insertion_point,
        compute_auto_repeat_tracks_count(inputs, GridAxis::Column, available_width),
    );
    if auto_repeat_rows != grid.auto_repeat_tracks(GridAxis::Row)
        || auto_repeat_columns != grid.auto_repeat_tracks(GridAxis::Column)
    {
        grid.set_needs_items_placement(true);
        grid.set_auto_repeat_tracks(auto_repeat_rows, auto_repeat_columns);
    }
    if !grid.needs_items_placement() {
        return;
    }
    debug_assert!(!grid.has_grid_items(), "placing items on a populated grid");

    let resolved = populate_explicit_grid(grid, items, inputs);

    let major_axis = inputs.auto_flow.major_axis();
    let mut auto_major_items = Vec::new();
    let mut specified_major_items = Vec::new();
    for (paint_order, item) in resolved.iter().enumerate() {
        grid.set_grid_item_paint_order(item.node_id, paint_order);
        let rows = translate(item.rows, grid.explicit_grid_start(GridAxis::Row));
        let columns = translate(item.columns, grid.explicit_grid_start(GridAxis::Column));
        if let (Some(row_span), Some(column_span)) = (rows, columns) {
            grid.insert(item.node_id, GridArea::new(row_span, column_span));
        } else if item.span(major_axis).is_indefinite() {
            auto_major_items.push(*item);
        } else {
            specified_major_items.push(*item);
        }
    }

    debug!(
        "grid placement: {} specified-major, {} auto-major items",
        specified_major_items.len(),
        auto_major_items.len()
    );
    place_specified_major_axis_items(grid, &specified_major_items, inputs);
    place_auto_major_axis_items(grid, &auto_major_items, inputs);

    for axis in [GridAxis::Column, GridAxis::Row] {
        let empty = compute_empty_tracks_for_auto_repeat(grid, inputs, axis);
        grid.set_auto_repeat_empty_tracks(axis, empty);
    }
    grid.set_needs_items_placement(false);
}

/// Resolve placement lines, then size the grid so it holds the explicit
/// tracks, every definite span and the largest auto-placed span.
fn populate_explicit_grid<NodeId: Copy + Eq + Hash + Debug>(
    grid: &mut ListGrid<NodeId>,
    items: &[GridItem<NodeId>],
    inputs: &GridContainerInputs,
) -> Vec<ResolvedItem<NodeId>> {
    let mut explicit_start = [0usize; 2];
    let mut maximum_index = [
        inputs
            .row_tracks
            .explicit_count(grid.auto_repeat_tracks(GridAxis::Row)),
        inputs
            .col_tracks
            .explicit_count(grid.auto_repeat_tracks(GridAxis::Column)),
    ];

    let resolved: Vec<ResolvedItem<NodeId>> = items
        .iter()
        .map(|item| {
            let mut spans = [ResolvedSpan::Indefinite(1); 2];
            for (slot, axis) in [GridAxis::Row, GridAxis::Column].into_iter().enumerate() {
                let (start, end) = item.lines(axis);
                let explicit_count = inputs
                    .tracks(axis)
                    .explicit_count(grid.auto_repeat_tracks(axis));
                let span = resolve_grid_positions(start, end, explicit_count);
                match span {
                    ResolvedSpan::Definite(lines) => {
                        explicit_start[slot] = explicit_start[slot].max((-lines.start).max(0) as usize);
                        maximum_index[slot] = maximum_index[slot].max(lines.end.max(0) as usize);
                    }
                    ResolvedSpan::Indefinite(span_size) => {
                        maximum_index[slot] = maximum_index[slot].max(span_size);
                    }
                }
                spans[slot] = span;
            }
            ResolvedItem {
                node_id: item.node_id,
                rows: spans[0],
                columns: spans[1],
            }
        })
        .collect();

    grid.set_explicit_grid_start(GridAxis::Row, explicit_start[0]);
    grid.set_explicit_grid_start(GridAxis::Column, explicit_start[1]);
    grid.ensure_grid_size(
        maximum_index[0] + explicit_start[0],
        maximum_index[1] + explicit_start[1],
    );
    resolved
}

/// Area starting past the last track of `outside_axis`, keeping
/// `kept_positions` on the other axis.
fn area_outside_grid<NodeId: Copy + Eq + Hash + Debug>(
    grid: &ListGrid<NodeId>,
    outside_axis: GridAxis,
    outside_span_size: usize,
    kept_positions: GridSpan,
) -> GridArea {
    let end = grid.num_tracks(outside_axis);
    let outside_positions = GridSpan::with_size(end, outside_span_size);
    let mut area = GridArea::new(outside_positions, outside_positions);
    area.set_span(outside_axis.orthogonal(), kept_positions);
    area
}

/// Place items locked to a major axis track.
///
/// Without `dense`, a cursor per major track keeps later items after the
/// earlier ones on the same track.
fn place_specified_major_axis_items<NodeId: Copy + Eq + Hash + Debug>(
    grid: &mut ListGrid<NodeId>,
    items: &[ResolvedItem<NodeId>],
    inputs: &GridContainerInputs,
) {
    let major_axis = inputs.auto_flow.major_axis();
    let minor_axis = major_axis.orthogonal();
    let dense = inputs.auto_flow.is_dense();
    let mut minor_axis_cursors: HashMap<usize, usize> = HashMap::new();

    for item in items {
        let Some(major_positions) = translate(
            item.span(major_axis),
            grid.explicit_grid_start(major_axis),
        ) else {
            continue;
        };
        let minor_span_size = item.span(minor_axis).integer_span();
        let major_start = major_positions.start_line();
        let cursor = if dense {
            0
        } else {
            minor_axis_cursors.get(&major_start).copied().unwrap_or(0)
        };
        let empty_area = GridIterator::new(grid, major_axis, major_start, cursor)
            .next_empty_grid_area(major_positions.integer_span(), minor_span_size);
        let area = empty_area.unwrap_or_else(|| {
            area_outside_grid(grid, minor_axis, minor_span_size, major_positions)
        });
        trace!("placed {:?} at {area:?}", item.node_id);
        grid.insert(item.node_id, area);
        if !dense {
            minor_axis_cursors.insert(major_start, area.span(minor_axis).start_line());
        }
    }
}

/// Place items whose major axis position is auto, moving a shared cursor.
fn place_auto_major_axis_items<NodeId: Copy + Eq + Hash + Debug>(
    grid: &mut ListGrid<NodeId>,
    items: &[ResolvedItem<NodeId>],
    inputs: &GridContainerInputs,
) {
    // (row, column)
    let mut cursor = (0usize, 0usize);
    for item in items {
        place_auto_major_axis_item(grid, item, inputs, &mut cursor);
        if inputs.auto_flow.is_dense() {
            cursor = (0, 0);
        }
    }
}

fn place_auto_major_axis_item<NodeId: Copy + Eq + Hash + Debug>(
    grid: &mut ListGrid<NodeId>,
    item: &ResolvedItem<NodeId>,
    inputs: &GridContainerInputs,
    cursor: &mut (usize, usize),
) {
    let major_axis = inputs.auto_flow.major_axis();
    let minor_axis = major_axis.orthogonal();
    let major_span_size = item.span(major_axis).integer_span();
    let minor_span_size = item.span(minor_axis).integer_span();
    let end_of_major = grid.num_tracks(major_axis);
    let (mut major_cursor, mut minor_cursor) = match major_axis {
        GridAxis::Row => (cursor.0, cursor.1),
        GridAxis::Column => (cursor.1, cursor.0),
    };

    let minor_positions = translate(item.span(minor_axis), grid.explicit_grid_start(minor_axis));
    let area = if let Some(minor_positions) = minor_positions {
        // Move to the next major track if the item would start before the cursor.
        if minor_positions.start_line() < minor_cursor {
            major_cursor += 1;
        }
        let found = if major_cursor < end_of_major {
            GridIterator::new(grid, minor_axis, minor_positions.start_line(), major_cursor)
                .next_empty_grid_area(minor_positions.integer_span(), major_span_size)
        } else {
            None
        };
        found.unwrap_or_else(|| area_outside_grid(grid, major_axis, major_span_size, minor_positions))
    } else {
        let end_of_minor = grid.num_tracks(minor_axis);
        let mut found = None;
        for major_index in major_cursor..end_of_major {
            let candidate = GridIterator::new(grid, major_axis, major_index, minor_cursor)
                .next_empty_grid_area(major_span_size, minor_span_size);
            // Auto-placement never grows the minor axis here.
            if let Some(area) = candidate
                && area.span(minor_axis).end_line() <= end_of_minor
            {
                found = Some(area);
                break;
            }
            minor_cursor = 0;
        }
        found.unwrap_or_else(|| {
            area_outside_grid(
                grid,
                major_axis,
                major_span_size,
                GridSpan::with_size(0, minor_span_size),
            )
        })
    };

    trace!("auto-placed {:?} at {area:?}", item.node_id);
    grid.insert(item.node_id, area);
    *cursor = (area.rows.start_line(), area.columns.start_line());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridAutoFlow, GridAxisTracks, GridLine, GridTrackSize, TrackRepeat};

    fn fixed_tracks(count: usize) -> GridAxisTracks {
        GridAxisTracks::new(vec![GridTrackSize::length(10.0); count], 0.0)
    }

    fn place(items: &[GridItem<u32>], inputs: &GridContainerInputs) -> ListGrid<u32> {
        let mut grid = ListGrid::new();
        place_items_on_grid(&mut grid, items, inputs, inputs.available_width);
        grid
    }

    fn cell_span(grid: &ListGrid<u32>, item: u32) -> ((usize, usize), (usize, usize)) {
        let area = grid.grid_item_area(item);
        (
            (area.rows.start_line(), area.rows.end_line()),
            (area.columns.start_line(), area.columns.end_line()),
        )
    }

    /// Auto-placed items fill the rows in order.
    ///
    /// # Panics
    /// Panics if placement fails or assertions fail.
    #[test]
    fn auto_placement_in_row_order() {
        let inputs = GridContainerInputs::new(fixed_tracks(2), fixed_tracks(2));
        let items = vec![GridItem::new(1), GridItem::new(2), GridItem::new(3)];
        let grid = place(&items, &inputs);

        assert_eq!(cell_span(&grid, 1), ((0, 1), (0, 1)));
        assert_eq!(cell_span(&grid, 2), ((0, 1), (1, 2)));
        assert_eq!(cell_span(&grid, 3), ((1, 2), (0, 1)));
        assert_eq!(grid.grid_item_paint_order(3), 2);
        assert!(!grid.needs_items_placement());
    }

    /// Lines before the explicit grid shift the explicit start.
    ///
    /// # Panics
    /// Panics if the grid size or explicit start is wrong.
    #[test]
    fn implicit_tracks_before_explicit_grid() {
        let inputs = GridContainerInputs::new(fixed_tracks(2), GridAxisTracks::default());
        let items = vec![GridItem::new(1).with_rows(Some(GridLine::Line(-5)), Some(GridLine::Line(7)))];
        let grid = place(&items, &inputs);

        assert_eq!(grid.num_tracks(GridAxis::Row), 8);
        assert_eq!(grid.explicit_grid_start(GridAxis::Row), 2);
        assert_eq!(cell_span(&grid, 1), ((0, 8), (0, 1)));
    }

    /// Under `repeat(2, 10px)` rows, an item on lines `-4 / 4` covers
    /// translated rows `1..5` once another item reaches two tracks before
    /// the explicit grid and four after it.
    ///
    /// # Panics
    /// Panics if the grid size, explicit start or item rows are wrong.
    #[test]
    fn item_spanning_translated_rows_one_to_five() {
        let inputs = GridContainerInputs::new(fixed_tracks(2), GridAxisTracks::default());
        let items = vec![
            GridItem::new(1).with_rows(Some(GridLine::Line(-4)), Some(GridLine::Line(4))),
            GridItem::new(2).with_rows(Some(GridLine::Line(-5)), Some(GridLine::Line(7))),
        ];
        let grid = place(&items, &inputs);

        assert_eq!(grid.num_tracks(GridAxis::Row), 8);
        assert_eq!(grid.explicit_grid_start(GridAxis::Row), 2);
        assert_eq!(cell_span(&grid, 1).0, (1, 5));
        assert_eq!(cell_span(&grid, 2).0, (0, 8));
    }

    /// Items that do not fit the minor axis wrap to a new row.
    ///
    /// # Panics
    /// Panics if an item lands in the wrong cell.
    #[test]
    fn auto_placement_wraps_and_skips_occupied() {
        let inputs = GridContainerInputs::new(GridAxisTracks::default(), fixed_tracks(3));
        let items = vec![
            GridItem::new(1)
                .with_columns(Some(GridLine::Line(2)), None)
                .with_rows(Some(GridLine::Line(1)), None),
            GridItem::new(2),
            GridItem::new(3).with_columns(None, Some(GridLine::Span(2))),
            GridItem::new(4),
        ];
        let grid = place(&items, &inputs);

        assert_eq!(cell_span(&grid, 1), ((0, 1), (1, 2)));
        assert_eq!(cell_span(&grid, 2), ((0, 1), (0, 1)));
        // No 2-wide hole remains in row 0.
        assert_eq!(cell_span(&grid, 3), ((1, 2), (0, 2)));
        assert_eq!(cell_span(&grid, 4), ((1, 2), (2, 3)));
    }

    /// Dense packing back-fills holes.
    ///
    /// # Panics
    /// Panics if the hole is not filled.
    #[test]
    fn dense_packing_fills_holes() {
        let mut inputs = GridContainerInputs::new(GridAxisTracks::default(), fixed_tracks(3));
        let items = vec![
            GridItem::new(1),
            GridItem::new(2).with_columns(None, Some(GridLine::Span(3))),
            GridItem::new(3),
        ];
        let sparse = place(&items, &inputs);
        assert_eq!(cell_span(&sparse, 3), ((2, 3), (0, 1)));
        inputs.auto_flow = GridAutoFlow::RowDense;
        let dense = place(&items, &inputs);
        assert_eq!(cell_span(&dense, 3), ((0, 1), (1, 2)));
    }

    /// Column flow fills columns first.
    ///
    /// # Panics
    /// Panics if items follow the row direction.
    #[test]
    fn column_flow() {
        let mut inputs = GridContainerInputs::new(fixed_tracks(2), GridAxisTracks::default());
        inputs.auto_flow = GridAutoFlow::Column;
        let items = vec![GridItem::new(1), GridItem::new(2), GridItem::new(3)];
        let grid = place(&items, &inputs);
        assert_eq!(cell_span(&grid, 2), ((1, 2), (0, 1)));
        assert_eq!(cell_span(&grid, 3), ((0, 1), (1, 2)));
    }

    /// Items locked to a row keep their order on that row.
    ///
    /// # Panics
    /// Panics if the per-row cursor is not honoured.
    #[test]
    fn specified_major_axis_items() {
        let inputs = GridContainerInputs::new(fixed_tracks(2), fixed_tracks(2));
        let items = vec![
            GridItem::new(1).with_rows(Some(GridLine::Line(2)), None),
            GridItem::new(2).with_rows(Some(GridLine::Line(2)), None),
            GridItem::new(3).with_rows(Some(GridLine::Line(2)), None),
        ];
        let grid = place(&items, &inputs);
        assert_eq!(cell_span(&grid, 1), ((1, 2), (0, 1)));
        assert_eq!(cell_span(&grid, 2), ((1, 2), (1, 2)));
        // Past the last column.
        assert_eq!(cell_span(&grid, 3), ((1, 2), (2, 3)));
        assert_eq!(grid.num_tracks(GridAxis::Column), 3);
    }

    /// Auto-fit tracks without items are recorded as empty.
    ///
    /// # Panics
    /// Panics if the empty set differs.
    #[test]
    fn auto_fit_empty_tracks() {
        let columns = GridAxisTracks::with_auto_repeat(
            vec![],
            0.0,
            TrackRepeat::AutoFit(vec![GridTrackSize::length(10.0)]),
        );
        let mut inputs = GridContainerInputs::new(GridAxisTracks::default(), columns);
        inputs.available_width = Some(100.0);
        let items: Vec<GridItem<u32>> = [(2, 6), (9, 10)]
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                GridItem::new(index as u32)
                    .with_columns(Some(GridLine::Line(start)), Some(GridLine::Line(end)))
            })
            .collect();
        let grid = place(&items, &inputs);

        assert_eq!(grid.auto_repeat_tracks(GridAxis::Column), 10);
        let empty: Vec<usize> = grid
            .auto_repeat_empty_tracks(GridAxis::Column)
            .map(|tracks| tracks.iter().copied().collect())
            .unwrap_or_default();
        assert_eq!(empty, vec![0, 5, 6, 7, 9]);
        assert!(grid.auto_repeat_empty_tracks(GridAxis::Row).is_none());
    }

    /// A still-valid placement is kept.
    ///
    /// # Panics
    /// Panics if the grid is rebuilt.
    #[test]
    fn valid_placement_is_reused() {
        let inputs = GridContainerInputs::new(fixed_tracks(1), fixed_tracks(1));
        let mut grid = ListGrid::new();
        place_items_on_grid(&mut grid, &[GridItem::new(1u32)], &inputs, None);
        // Different items, but nothing invalidated the placement.
        place_items_on_grid(&mut grid, &[GridItem::new(2u32)], &inputs, None);
        assert!(grid.try_grid_item_area(1).is_some());
        assert!(grid.try_grid_item_area(2).is_none());
    }
}

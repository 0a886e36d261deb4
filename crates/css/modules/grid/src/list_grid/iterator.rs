//! Walks the items of one track, or searches it for free space.

use core::fmt::Debug;
use core::hash::Hash;

use super::{Handle, ListGrid};
use crate::placement::{GridArea, GridSpan};
use crate::types::GridAxis;

/// Cursor over a single track of a [`ListGrid`].
///
/// `axis` is the axis of the fixed track: `GridAxis::Column` walks down one
/// column, visiting rows from `varying_start` on.
#[derive(Debug)]
pub struct GridIterator<'grid, Item> {
    grid: &'grid ListGrid<Item>,
    axis: GridAxis,
    fixed_track: usize,
    varying_start: usize,
    varying_index: usize,
    cell: Option<Handle>,
    started: bool,
    child_index: usize,
}

impl<'grid, Item: Copy + Eq + Hash + Debug> GridIterator<'grid, Item> {
    pub fn new(
        grid: &'grid ListGrid<Item>,
        axis: GridAxis,
        fixed_track: usize,
        varying_start: usize,
    ) -> Self {
        Self {
            grid,
            axis,
            fixed_track,
            varying_start,
            varying_index: varying_start,
            cell: None,
            started: false,
            child_index: 0,
        }
    }

    /// Next item touching the fixed track.
    ///
    /// Items covering several cells of the track are reported once, at the
    /// first visited cell of their span.
    pub fn next_grid_item(&mut self) -> Option<Item> {
        if !self.started {
            self.started = true;
            self.cell = self
                .grid
                .first_cell_from(self.axis, self.fixed_track, self.varying_start);
        }
        let varying_axis = self.axis.orthogonal();
        while let Some(cell) = self.cell {
            let items = self.grid.cell_items(cell);
            let cell_index = self.grid.cell_varying_index(self.axis, cell);
            while let Some(item) = items.get(self.child_index).copied() {
                self.child_index += 1;
                let span_start = self.grid.grid_item_span(item, varying_axis).start_line();
                if cell_index == span_start.max(self.varying_start) {
                    return Some(item);
                }
            }
            self.cell = self.grid.next_cell(self.axis, cell);
            self.child_index = 0;
        }
        None
    }

    /// Find the next area of `fixed_span` x `varying_span` tracks with no item,
    /// starting at the fixed track and the cursor position.
    ///
    /// Cells beyond the grid count as empty, so the search succeeds at the
    /// latest one position past the last track. The cursor moves past the
    /// returned position so repeated calls yield distinct areas.
    pub fn next_empty_grid_area(&mut self, fixed_span: usize, varying_span: usize) -> Option<GridArea> {
        debug_assert!(fixed_span >= 1 && varying_span >= 1, "empty area requested");
        let end_varying = self.grid.num_tracks(self.axis.orthogonal());
        while self.varying_index <= end_varying {
            let varying_index = self.varying_index;
            self.varying_index += 1;
            if self.is_empty_area(varying_index, fixed_span, varying_span) {
                let fixed = GridSpan::with_size(self.fixed_track, fixed_span);
                let varying = GridSpan::with_size(varying_index, varying_span);
                return Some(match self.axis {
                    GridAxis::Row => GridArea::new(fixed, varying),
                    GridAxis::Column => GridArea::new(varying, fixed),
                });
            }
        }
        None
    }

    fn is_empty_area(&self, varying_index: usize, fixed_span: usize, varying_span: usize) -> bool {
        let fixed_end = (self.fixed_track + fixed_span).min(self.grid.num_tracks(self.axis));
        let varying_end =
            (varying_index + varying_span).min(self.grid.num_tracks(self.axis.orthogonal()));
        (self.fixed_track..fixed_end).all(|fixed| {
            (varying_index..varying_end)
                .all(|varying| self.grid.find_cell(self.axis, fixed, varying).is_none())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rows: (usize, usize), columns: (usize, usize)) -> GridArea {
        GridArea::new(GridSpan::new(rows.0, rows.1), GridSpan::new(columns.0, columns.1))
    }

    fn collect_items(grid: &ListGrid<u32>, axis: GridAxis, fixed: usize, start: usize) -> Vec<u32> {
        let mut iterator = GridIterator::new(grid, axis, fixed, start);
        let mut items = Vec::new();
        while let Some(item) = iterator.next_grid_item() {
            items.push(item);
        }
        items
    }

    /// Spanning items are reported once per track.
    ///
    /// # Panics
    /// Panics if an item is skipped or repeated.
    #[test]
    fn items_reported_once() {
        let mut grid = ListGrid::new();
        grid.insert(1u32, area((0, 3), (0, 1)));
        grid.insert(2, area((1, 2), (0, 2)));
        grid.insert(3, area((4, 5), (0, 1)));

        assert_eq!(collect_items(&grid, GridAxis::Column, 0, 0), vec![1, 2, 3]);
        assert_eq!(collect_items(&grid, GridAxis::Row, 1, 0), vec![1, 2]);
        // Starting inside a span still reports the item.
        assert_eq!(collect_items(&grid, GridAxis::Column, 0, 2), vec![1, 3]);
        assert!(collect_items(&grid, GridAxis::Column, 5, 0).is_empty());
    }

    /// Empty area search skips occupied cells and advances the cursor.
    ///
    /// # Panics
    /// Panics if the returned areas are wrong.
    #[test]
    fn next_empty_area_skips_items() {
        let mut grid = ListGrid::new();
        grid.ensure_grid_size(2, 4);
        grid.insert(1u32, area((0, 1), (1, 2)));

        let mut iterator = GridIterator::new(&grid, GridAxis::Row, 0, 0);
        assert_eq!(iterator.next_empty_grid_area(1, 1), Some(area((0, 1), (0, 1))));
        assert_eq!(iterator.next_empty_grid_area(1, 2), Some(area((0, 1), (2, 4))));
        // A 2-wide area at column 3 overflows the grid, which counts as empty.
        assert_eq!(iterator.next_empty_grid_area(1, 2), Some(area((0, 1), (3, 5))));
        assert_eq!(iterator.next_empty_grid_area(1, 1), Some(area((0, 1), (4, 5))));
        assert_eq!(iterator.next_empty_grid_area(1, 1), None);

        let mut column_iterator = GridIterator::new(&grid, GridAxis::Column, 1, 0);
        assert_eq!(column_iterator.next_empty_grid_area(1, 1), Some(area((1, 2), (1, 2))));
    }

    /// A search several tracks wide skips positions where only one of its
    /// fixed tracks is occupied.
    ///
    /// # Panics
    /// Panics if a partly occupied area is returned.
    #[test]
    fn multi_track_empty_area_search() {
        let mut grid = ListGrid::new();
        grid.ensure_grid_size(3, 4);
        grid.insert(1u32, area((1, 2), (1, 2)));

        let mut rows = GridIterator::new(&grid, GridAxis::Row, 0, 0);
        assert_eq!(rows.next_empty_grid_area(2, 1), Some(area((0, 2), (0, 1))));
        assert_eq!(rows.next_empty_grid_area(2, 1), Some(area((0, 2), (2, 3))));

        let mut columns = GridIterator::new(&grid, GridAxis::Column, 0, 0);
        assert_eq!(columns.next_empty_grid_area(2, 1), Some(area((0, 1), (0, 2))));
        assert_eq!(columns.next_empty_grid_area(2, 1), Some(area((2, 3), (0, 2))));

        // Fixed tracks past the grid count as empty.
        let mut last_rows = GridIterator::new(&grid, GridAxis::Row, 2, 1);
        assert_eq!(last_rows.next_empty_grid_area(2, 2), Some(area((2, 4), (1, 3))));
    }
}

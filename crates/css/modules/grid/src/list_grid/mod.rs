//! Sparse storage of placed grid items.
//!
//! Only tracks that some item spans get a node. Each row track owns a chain
//! of cells ordered by column and each column track owns a chain of the same
//! cells ordered by row, so a cell is reachable from both of its tracks.

mod iterator;
mod linked_list;

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::{BTreeSet, HashMap};

use log::trace;
use smallvec::SmallVec;

pub use iterator::GridIterator;
use linked_list::{Handle, IndexedChain, Linked, Links};

use crate::placement::{GridArea, GridSpan};
use crate::types::GridAxis;

/// A populated row or column.
#[derive(Debug, Clone)]
struct TrackNode {
    index: usize,
    links: Links,
    cells: IndexedChain,
}

impl TrackNode {
    const fn new(index: usize) -> Self {
        Self {
            index,
            links: Links {
                prev: None,
                next: None,
            },
            cells: IndexedChain::new(),
        }
    }
}

impl Linked for TrackNode {
    fn index(&self, _chain: GridAxis) -> usize {
        self.index
    }

    fn links(&self, _chain: GridAxis) -> Links {
        self.links
    }

    fn links_mut(&mut self, _chain: GridAxis) -> &mut Links {
        &mut self.links
    }
}

/// The items at one (row, column) position.
///
/// On the `Row` chain a cell is keyed by its column, on the `Column` chain by
/// its row.
#[derive(Debug, Clone)]
struct CellNode<Item> {
    row: usize,
    column: usize,
    row_links: Links,
    column_links: Links,
    items: SmallVec<Item, 1>,
}

impl<Item> CellNode<Item> {
    fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            row_links: Links::default(),
            column_links: Links::default(),
            items: SmallVec::new(),
        }
    }
}

impl<Item> Linked for CellNode<Item> {
    fn index(&self, chain: GridAxis) -> usize {
        match chain {
            GridAxis::Row => self.column,
            GridAxis::Column => self.row,
        }
    }

    fn links(&self, chain: GridAxis) -> Links {
        match chain {
            GridAxis::Row => self.row_links,
            GridAxis::Column => self.column_links,
        }
    }

    fn links_mut(&mut self, chain: GridAxis) -> &mut Links {
        match chain {
            GridAxis::Row => &mut self.row_links,
            GridAxis::Column => &mut self.column_links,
        }
    }
}

/// Per-axis bookkeeping that is reset with the item placement.
#[derive(Debug, Clone, Default)]
struct AxisState {
    tracks: IndexedChain,
    nodes: Vec<TrackNode>,
    num_tracks: usize,
    explicit_start: usize,
    auto_repeat_tracks: usize,
    auto_repeat_empty_tracks: Option<BTreeSet<usize>>,
}

/// Sparse grid mapping cells to the items covering them.
///
/// `Item` is a cheap handle owned elsewhere, typically a node id.
#[derive(Debug, Clone)]
pub struct ListGrid<Item> {
    rows: AxisState,
    columns: AxisState,
    cells: Vec<CellNode<Item>>,
    item_areas: HashMap<Item, GridArea>,
    paint_order: HashMap<Item, usize>,
    needs_items_placement: bool,
}

impl<Item: Copy + Eq + Hash + Debug> Default for ListGrid<Item> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Item: Copy + Eq + Hash + Debug> ListGrid<Item> {
    /// An empty grid that still needs item placement.
    pub fn new() -> Self {
        Self {
            rows: AxisState::default(),
            columns: AxisState::default(),
            cells: Vec::new(),
            item_areas: HashMap::new(),
            paint_order: HashMap::new(),
            needs_items_placement: true,
        }
    }

    const fn axis(&self, axis: GridAxis) -> &AxisState {
        match axis {
            GridAxis::Row => &self.rows,
            GridAxis::Column => &self.columns,
        }
    }

    const fn axis_mut(&mut self, axis: GridAxis) -> &mut AxisState {
        match axis {
            GridAxis::Row => &mut self.rows,
            GridAxis::Column => &mut self.columns,
        }
    }

    /// Number of tracks in `axis`, explicit and implicit, populated or not.
    pub const fn num_tracks(&self, axis: GridAxis) -> usize {
        self.axis(axis).num_tracks
    }

    /// Grow the cached track counts. Never shrinks.
    pub fn ensure_grid_size(&mut self, maximum_row_size: usize, maximum_column_size: usize) {
        if maximum_row_size > self.rows.num_tracks || maximum_column_size > self.columns.num_tracks {
            trace!("grid grows to {maximum_row_size}x{maximum_column_size}");
        }
        self.rows.num_tracks = self.rows.num_tracks.max(maximum_row_size);
        self.columns.num_tracks = self.columns.num_tracks.max(maximum_column_size);
    }

    /// Insert `item` into every cell of `area` and record the area.
    pub fn insert(&mut self, item: Item, area: GridArea) {
        self.ensure_grid_size(area.rows.end_line(), area.columns.end_line());

        let column_handles: Vec<Handle> = area
            .columns
            .iter()
            .map(|column| {
                self.columns
                    .tracks
                    .insert(&mut self.columns.nodes, GridAxis::Column, column, || {
                        TrackNode::new(column)
                    })
                    .0
            })
            .collect();
        // Cell directly above, per column of the area.
        let mut above: Vec<Option<Handle>> = vec![None; column_handles.len()];

        for row in area.rows {
            let (row_handle, _) = self
                .rows
                .tracks
                .insert(&mut self.rows.nodes, GridAxis::Row, row, || TrackNode::new(row));
            let mut previous: Option<Handle> = None;
            for ((column, column_handle), cell_above) in
                area.columns.iter().zip(&column_handles).zip(&mut above)
            {
                let row_cells = &mut self.rows.nodes[row_handle].cells;
                let make = || CellNode::new(row, column);
                let (cell, created) = match previous {
                    Some(anchor) => {
                        row_cells.insert_after(&mut self.cells, GridAxis::Row, anchor, column, make)
                    }
                    None => row_cells.insert(&mut self.cells, GridAxis::Row, column, make),
                };
                if created {
                    trace!("new grid cell ({row}, {column})");
                    self.columns.nodes[*column_handle].cells.link_existing(
                        &mut self.cells,
                        GridAxis::Column,
                        *cell_above,
                        cell,
                    );
                }
                let items = &mut self.cells[cell].items;
                if !items.contains(&item) {
                    items.push(item);
                }
                *cell_above = Some(cell);
                previous = Some(cell);
            }
        }

        self.item_areas.insert(item, area);
    }

    /// Items at (`row`, `column`) in insertion order. Empty if the cell has no item.
    pub fn cell(&self, row: usize, column: usize) -> &[Item] {
        self.find_cell(GridAxis::Row, row, column)
            .map_or(&[][..], |cell| self.cell_items(cell))
    }

    fn find_cell(&self, axis: GridAxis, fixed: usize, varying: usize) -> Option<Handle> {
        let state = self.axis(axis);
        let track = state.tracks.find(&state.nodes, axis, fixed)?;
        state.nodes[track].cells.find(&self.cells, axis, varying)
    }

    /// First cell of track `fixed` in `axis` whose varying index is at least `varying`.
    fn first_cell_from(&self, axis: GridAxis, fixed: usize, varying: usize) -> Option<Handle> {
        let state = self.axis(axis);
        let track = state.tracks.find(&state.nodes, axis, fixed)?;
        state.nodes[track]
            .cells
            .iter(&self.cells, axis)
            .find(|cell| self.cells[*cell].index(axis) >= varying)
    }

    fn next_cell(&self, axis: GridAxis, cell: Handle) -> Option<Handle> {
        self.cells[cell].links(axis).next
    }

    fn cell_varying_index(&self, axis: GridAxis, cell: Handle) -> usize {
        self.cells[cell].index(axis)
    }

    fn cell_items(&self, cell: Handle) -> &[Item] {
        self.cells[cell].items.as_slice()
    }

    /// Number of populated track nodes in `axis`.
    pub const fn populated_track_count(&self, axis: GridAxis) -> usize {
        self.axis(axis).tracks.len()
    }

    /// Area previously assigned to `item`.
    ///
    /// # Panics
    /// Panics if `item` was never placed on this grid.
    pub fn grid_item_area(&self, item: Item) -> GridArea {
        self.item_areas[&item]
    }

    /// Overwrite the stored area of `item` without touching the cells.
    pub fn set_grid_item_area(&mut self, item: Item, area: GridArea) {
        self.item_areas.insert(item, area);
    }

    /// Area of `item`, if placed.
    pub fn try_grid_item_area(&self, item: Item) -> Option<GridArea> {
        self.item_areas.get(&item).copied()
    }

    /// Span of `item` on one axis.
    ///
    /// # Panics
    /// Panics if `item` was never placed on this grid.
    pub fn grid_item_span(&self, item: Item, axis: GridAxis) -> GridSpan {
        self.grid_item_area(item).span(axis)
    }

    /// Items and their areas, in paint order.
    pub fn items_in_paint_order(&self) -> Vec<(Item, GridArea)> {
        let mut items: Vec<(Item, GridArea)> = self
            .item_areas
            .iter()
            .map(|(item, area)| (*item, *area))
            .collect();
        items.sort_by_key(|(item, _)| self.paint_order.get(item).copied().unwrap_or(usize::MAX));
        items
    }

    pub fn set_grid_item_paint_order(&mut self, item: Item, order: usize) {
        self.paint_order.insert(item, order);
    }

    /// # Panics
    /// Panics if no paint order was recorded for `item`.
    pub fn grid_item_paint_order(&self, item: Item) -> usize {
        self.paint_order[&item]
    }

    pub fn has_grid_items(&self) -> bool {
        !self.item_areas.is_empty()
    }

    /// Number of implicit tracks before the first explicit line.
    pub const fn explicit_grid_start(&self, axis: GridAxis) -> usize {
        self.axis(axis).explicit_start
    }

    pub fn set_explicit_grid_start(&mut self, axis: GridAxis, start: usize) {
        self.axis_mut(axis).explicit_start = start;
    }

    /// Number of tracks generated by `repeat(auto-fill | auto-fit, ...)`.
    pub const fn auto_repeat_tracks(&self, axis: GridAxis) -> usize {
        self.axis(axis).auto_repeat_tracks
    }

    pub fn set_auto_repeat_tracks(&mut self, rows: usize, columns: usize) {
        self.rows.auto_repeat_tracks = rows;
        self.columns.auto_repeat_tracks = columns;
    }

    /// Record which auto-fit tracks hold no item.
    pub fn set_auto_repeat_empty_tracks(&mut self, axis: GridAxis, tracks: Option<BTreeSet<usize>>) {
        self.axis_mut(axis).auto_repeat_empty_tracks = tracks;
    }

    pub fn has_auto_repeat_empty_tracks(&self, axis: GridAxis) -> bool {
        self.axis(axis)
            .auto_repeat_empty_tracks
            .as_ref()
            .is_some_and(|tracks| !tracks.is_empty())
    }

    /// Check whether translated track `track` is a collapsed auto-fit track.
    pub fn is_empty_auto_repeat_track(&self, axis: GridAxis, track: usize) -> bool {
        self.axis(axis)
            .auto_repeat_empty_tracks
            .as_ref()
            .is_some_and(|tracks| tracks.contains(&track))
    }

    pub fn auto_repeat_empty_tracks(&self, axis: GridAxis) -> Option<&BTreeSet<usize>> {
        self.axis(axis).auto_repeat_empty_tracks.as_ref()
    }

    pub const fn needs_items_placement(&self) -> bool {
        self.needs_items_placement
    }

    /// Flag the placement as stale. Setting it discards every item, cell,
    /// track and per-axis count.
    pub fn set_needs_items_placement(&mut self, needs_items_placement: bool) {
        self.needs_items_placement = needs_items_placement;
        if !needs_items_placement {
            return;
        }
        self.rows = AxisState::default();
        self.columns = AxisState::default();
        self.cells.clear();
        self.item_areas.clear();
        self.paint_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rows: (usize, usize), columns: (usize, usize)) -> GridArea {
        GridArea::new(GridSpan::new(rows.0, rows.1), GridSpan::new(columns.0, columns.1))
    }

    /// Every cell inside an item's area holds it, and no cell outside does.
    ///
    /// # Panics
    /// Panics if cell membership does not match the stored areas.
    #[test]
    fn cells_match_item_areas() {
        let mut grid = ListGrid::new();
        let placements = [
            (1u32, area((0, 2), (1, 3))),
            (2, area((3, 4), (0, 1))),
            (3, area((1, 4), (2, 4))),
        ];
        for (item, item_area) in placements {
            grid.insert(item, item_area);
        }
        assert_eq!(grid.num_tracks(GridAxis::Row), 4);
        assert_eq!(grid.num_tracks(GridAxis::Column), 4);

        for (item, _) in placements {
            let item_area = grid.grid_item_area(item);
            for row in 0..4 {
                for column in 0..4 {
                    let inside = item_area.rows.contains(row) && item_area.columns.contains(column);
                    assert_eq!(grid.cell(row, column).contains(&item), inside);
                }
            }
        }
    }

    /// Spans read back from stored areas match the inserted spans.
    ///
    /// # Panics
    /// Panics if the projected spans differ.
    #[test]
    fn item_span_round_trips() {
        let mut grid = ListGrid::new();
        let item_area = area((2, 5), (0, 1));
        grid.insert(7u32, item_area);
        assert_eq!(grid.grid_item_span(7, GridAxis::Row), GridSpan::new(2, 5));
        assert_eq!(grid.grid_item_span(7, GridAxis::Column), GridSpan::new(0, 1));
        // Spanning creates every track in between.
        assert_eq!(grid.populated_track_count(GridAxis::Row), 3);
    }

    /// Four overlapping 2x2 items on a 3x3 grid.
    ///
    /// # Panics
    /// Panics if any cell holds the wrong number of items.
    #[test]
    fn overlapping_items_aggregate_in_cells() {
        let mut grid = ListGrid::new();
        grid.insert(1u32, area((0, 2), (0, 2)));
        grid.insert(2, area((0, 2), (1, 3)));
        grid.insert(3, area((1, 3), (0, 2)));
        grid.insert(4, area((1, 3), (1, 3)));

        let counts: Vec<usize> = (0..3)
            .flat_map(|row| (0..3).map(move |column| (row, column)))
            .map(|(row, column)| grid.cell(row, column).len())
            .collect();
        assert_eq!(counts, vec![1, 2, 1, 2, 4, 2, 1, 2, 1]);
        assert_eq!(grid.cell(1, 1), &[1, 2, 3, 4]);
    }

    /// Re-inserting an item does not duplicate it in its cells.
    ///
    /// # Panics
    /// Panics if a cell holds duplicates.
    #[test]
    fn reinsert_does_not_duplicate() {
        let mut grid = ListGrid::new();
        grid.insert(1u32, area((0, 1), (0, 2)));
        grid.insert(1, area((0, 1), (0, 2)));
        assert_eq!(grid.cell(0, 1), &[1]);
        assert_eq!(grid.populated_track_count(GridAxis::Column), 2);
    }

    /// Out-of-order insertion keeps both chains of a cell consistent.
    ///
    /// # Panics
    /// Panics if a lookup misses an inserted item.
    #[test]
    fn out_of_order_insertion() {
        let mut grid = ListGrid::new();
        grid.insert(1u32, area((4, 5), (4, 5)));
        grid.insert(2, area((0, 1), (0, 1)));
        grid.insert(3, area((2, 5), (2, 5)));
        assert_eq!(grid.cell(4, 4), &[1, 3]);
        assert_eq!(grid.cell(0, 0), &[2]);
        assert_eq!(grid.cell(3, 2), &[3]);
        assert!(grid.cell(1, 1).is_empty());
        assert!(grid.cell(9, 9).is_empty());
    }

    /// Invalidating the placement clears every per-axis value.
    ///
    /// # Panics
    /// Panics if state survives the reset.
    #[test]
    fn needs_items_placement_resets_state() {
        let mut grid = ListGrid::new();
        grid.insert(1u32, area((0, 1), (0, 1)));
        grid.set_explicit_grid_start(GridAxis::Row, 2);
        grid.set_auto_repeat_tracks(3, 4);
        grid.set_auto_repeat_empty_tracks(GridAxis::Column, Some(BTreeSet::from([1])));
        grid.set_grid_item_paint_order(1, 0);
        grid.set_needs_items_placement(false);
        assert!(!grid.needs_items_placement());
        assert!(grid.is_empty_auto_repeat_track(GridAxis::Column, 1));

        grid.set_needs_items_placement(true);
        assert!(!grid.has_grid_items());
        assert_eq!(grid.num_tracks(GridAxis::Row), 0);
        assert_eq!(grid.explicit_grid_start(GridAxis::Row), 0);
        assert_eq!(grid.auto_repeat_tracks(GridAxis::Column), 0);
        assert!(!grid.has_auto_repeat_empty_tracks(GridAxis::Column));
        assert!(grid.cell(0, 0).is_empty());
        assert_eq!(grid.try_grid_item_area(1), None);
    }

    /// Querying the area of an unplaced item is a contract violation.
    ///
    /// # Panics
    /// Panics by design.
    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn area_of_unplaced_item_panics() {
        let grid: ListGrid<u32> = ListGrid::new();
        let _area = grid.grid_item_area(3);
    }
}

//! Access to the box tree that owns the grid items.
//!
//! The grid never lays out boxes itself. Measurements, relayout with new
//! containing-block sizes and per-item style all come through
//! [`GridLayoutTree`], keyed by the same handle the [`ListGrid`] stores.
//!
//! [`ListGrid`]: crate::ListGrid

use crate::types::GridAxis;

/// A size from an item's style in one axis.
///
/// Percentages are stored as fractions (`0.5` is `50%`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ItemLength {
    /// `auto`
    #[default]
    Auto,
    /// Length in pixels
    Fixed(f32),
    /// Percentage of the containing block
    Percentage(f32),
}

impl ItemLength {
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    pub const fn is_percentage(self) -> bool {
        matches!(self, Self::Percentage(_))
    }

    /// Resolve against `containing_block`, `None` when it cannot be resolved.
    pub fn resolve(self, containing_block: Option<f32>) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Fixed(len) => Some(len),
            Self::Percentage(fraction) => containing_block.map(|size| fraction * size),
        }
    }
}

/// Style of a grid item along one axis of the grid container.
///
/// `margin` and `border_and_padding` are the sums of both sides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemAxisStyle {
    /// `width` or `height`
    pub size: ItemLength,
    /// `min-width` or `min-height`
    pub min_size: ItemLength,
    pub margin: f32,
    pub border_and_padding: f32,
    /// Whether `overflow` in this axis makes the item a scroll container.
    pub is_scroll_container: bool,
    /// Whether a margin or padding in this axis is a percentage.
    pub has_percentage_margin_or_padding: bool,
}

impl ItemAxisStyle {
    /// Percentage or content-dependent preferred size.
    pub const fn has_relative_or_intrinsic_size(&self) -> bool {
        matches!(self.size, ItemLength::Auto | ItemLength::Percentage(_))
    }
}

/// Min-content and max-content inline sizes of an item's border box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSizes {
    pub min_content: f32,
    pub max_content: f32,
}

/// The layout tree as seen from a grid container.
///
/// Axes are always the container's grid axes. An item is orthogonal when
/// its inline axis runs along the container's row tracks, i.e. when its
/// writing mode is perpendicular to the container's.
pub trait GridLayoutTree<NodeId> {
    /// Whether the item's writing mode is perpendicular to the container's.
    fn is_orthogonal(&self, item: NodeId) -> bool;

    /// Grid axis the item's inline axis runs along.
    fn inline_axis(&self, item: NodeId) -> GridAxis {
        if self.is_orthogonal(item) {
            GridAxis::Row
        } else {
            GridAxis::Column
        }
    }

    /// Intrinsic inline sizes of the item's border box, margins excluded.
    fn content_sizes(&self, item: NodeId) -> ContentSizes;

    /// Block size of the item's border box from its last layout.
    fn block_size(&self, item: NodeId) -> f32;

    /// Lay the item out again if it was marked dirty.
    fn layout_if_needed(&mut self, item: NodeId);

    /// Force the next [`layout_if_needed`](Self::layout_if_needed) to run.
    fn mark_needs_layout(&mut self, item: NodeId);

    /// Containing-block size the grid imposed on the item in `axis`.
    ///
    /// `None` when no override is set or when it is indefinite.
    fn override_containing_block_size(&self, item: NodeId, axis: GridAxis) -> Option<f32>;

    /// Impose a containing-block size on the item; `None` is indefinite.
    fn set_override_containing_block_size(&mut self, item: NodeId, axis: GridAxis, size: Option<f32>);

    /// Style of the item along `axis`.
    fn axis_style(&self, item: NodeId, axis: GridAxis) -> ItemAxisStyle;

    /// Distance from the item's margin-box start edge in `axis` to its
    /// first baseline, `None` when it has no natural baseline.
    fn baseline(&self, item: NodeId, axis: GridAxis) -> Option<f32>;
}

//! A box tree with fixed measurements, used by the unit tests.

use std::collections::{HashMap, HashSet};

use crate::tree::{ContentSizes, GridLayoutTree, ItemAxisStyle};
use crate::types::GridAxis;

/// Measurements of one test item.
#[derive(Debug, Clone, Default)]
pub struct FixedItem {
    pub content_sizes: ContentSizes,
    /// Block size when the item does not reflow.
    pub block_size: f32,
    /// Inline size times block size of reflowing text; the block size is
    /// this divided by the inline size it is laid out in.
    pub text_area: Option<f32>,
    pub orthogonal: bool,
    pub row_style: ItemAxisStyle,
    pub column_style: ItemAxisStyle,
    pub row_baseline: Option<f32>,
    pub column_baseline: Option<f32>,
}

impl FixedItem {
    pub fn new(min_content: f32, max_content: f32) -> Self {
        Self {
            content_sizes: ContentSizes {
                min_content,
                max_content,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_block_size(mut self, block_size: f32) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub const fn with_text_area(mut self, text_area: f32) -> Self {
        self.text_area = Some(text_area);
        self
    }

    #[must_use]
    pub const fn orthogonal(mut self) -> Self {
        self.orthogonal = true;
        self
    }
}

/// Items keyed by `u32`, with the overrides the grid set on them.
#[derive(Debug, Default)]
pub struct FixedTree {
    items: HashMap<u32, FixedItem>,
    overrides: HashMap<(u32, GridAxis), Option<f32>>,
    dirty: HashSet<u32>,
    /// Layouts performed through `layout_if_needed`.
    pub layouts: usize,
}

impl FixedTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(mut self, id: u32, item: FixedItem) -> Self {
        self.items.insert(id, item);
        self
    }

    fn item(&self, id: u32) -> FixedItem {
        self.items.get(&id).cloned().unwrap_or_default()
    }
}

impl GridLayoutTree<u32> for FixedTree {
    fn is_orthogonal(&self, item: u32) -> bool {
        self.item(item).orthogonal
    }

    fn content_sizes(&self, item: u32) -> ContentSizes {
        self.item(item).content_sizes
    }

    fn block_size(&self, item: u32) -> f32 {
        let fixed = self.item(item);
        let Some(text_area) = fixed.text_area else {
            return fixed.block_size;
        };
        let inline_size = self
            .override_containing_block_size(item, self.inline_axis(item))
            .unwrap_or(fixed.content_sizes.max_content)
            .max(fixed.content_sizes.min_content)
            .max(1.0);
        text_area / inline_size
    }

    fn layout_if_needed(&mut self, item: u32) {
        if self.dirty.remove(&item) {
            self.layouts += 1;
        }
    }

    fn mark_needs_layout(&mut self, item: u32) {
        self.dirty.insert(item);
    }

    fn override_containing_block_size(&self, item: u32, axis: GridAxis) -> Option<f32> {
        self.overrides.get(&(item, axis)).copied().flatten()
    }

    fn set_override_containing_block_size(&mut self, item: u32, axis: GridAxis, size: Option<f32>) {
        self.overrides.insert((item, axis), size);
    }

    fn axis_style(&self, item: u32, axis: GridAxis) -> ItemAxisStyle {
        let fixed = self.item(item);
        match axis {
            GridAxis::Row => fixed.row_style,
            GridAxis::Column => fixed.column_style,
        }
    }

    fn baseline(&self, item: u32, axis: GridAxis) -> Option<f32> {
        let fixed = self.item(item);
        match axis {
            GridAxis::Row => fixed.row_baseline,
            GridAxis::Column => fixed.column_baseline,
        }
    }
}

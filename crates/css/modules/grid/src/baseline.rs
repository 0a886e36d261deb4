//! Baseline alignment contexts and shims.
//!
//! Spec: §10.6 Aligning the Grid: Baseline alignment
//! <https://www.w3.org/TR/css-align-3/#baseline-align-self>

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use crate::types::GridAlignment;

/// Items sharing a baseline: same alignment keyword, same start line.
type SharingGroup = (GridAlignment, usize);

/// Baseline-aligned items cached for one axis.
///
/// The value records whether the item took part in the last context
/// computed for that axis.
#[derive(Debug, Clone)]
pub struct BaselineItems<NodeId> {
    items: HashMap<NodeId, BaselineItem>,
}

#[derive(Debug, Clone, Copy)]
struct BaselineItem {
    alignment: GridAlignment,
    participates: bool,
}

impl<NodeId: Copy + Eq + Hash + Debug> Default for BaselineItems<NodeId> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<NodeId: Copy + Eq + Hash + Debug> BaselineItems<NodeId> {
    /// Remember an item aligned with `alignment`, which must be a baseline keyword.
    pub fn insert(&mut self, item: NodeId, alignment: GridAlignment) {
        debug_assert!(alignment.is_baseline(), "{alignment:?} is not a baseline alignment");
        self.items.insert(
            item,
            BaselineItem {
                alignment,
                participates: true,
            },
        );
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items and their alignment, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, GridAlignment)> + '_ {
        self.items.iter().map(|(item, entry)| (*item, entry.alignment))
    }

    pub fn set_participates(&mut self, item: NodeId, participates: bool) {
        if let Some(entry) = self.items.get_mut(&item) {
            entry.participates = participates;
        }
    }

    /// Alignment of a participating item, `None` otherwise.
    pub fn participating_alignment(&self, item: NodeId) -> Option<GridAlignment> {
        self.items
            .get(&item)
            .filter(|entry| entry.participates)
            .map(|entry| entry.alignment)
    }
}

/// Shared baselines of one axis.
#[derive(Debug, Clone)]
pub struct BaselineContext<NodeId> {
    max_ascents: HashMap<SharingGroup, f32>,
    ascents: HashMap<NodeId, f32>,
}

impl<NodeId: Copy + Eq + Hash + Debug> Default for BaselineContext<NodeId> {
    fn default() -> Self {
        Self {
            max_ascents: HashMap::new(),
            ascents: HashMap::new(),
        }
    }
}

impl<NodeId: Copy + Eq + Hash + Debug> BaselineContext<NodeId> {
    pub fn clear(&mut self) {
        self.max_ascents.clear();
        self.ascents.clear();
    }

    /// Add an item whose baseline sits `ascent` from its start edge.
    pub fn update(&mut self, item: NodeId, alignment: GridAlignment, start_line: usize, ascent: f32) {
        self.ascents.insert(item, ascent);
        let max_ascent = self.max_ascents.entry((alignment, start_line)).or_insert(ascent);
        *max_ascent = max_ascent.max(ascent);
    }

    /// Offset that moves the item's baseline onto the shared one.
    ///
    /// Zero for items that never entered the context.
    pub fn shim(&self, item: NodeId, alignment: GridAlignment, start_line: usize) -> f32 {
        let Some(ascent) = self.ascents.get(&item) else {
            return 0.0;
        };
        self.max_ascents
            .get(&(alignment, start_line))
            .map_or(0.0, |max_ascent| (max_ascent - ascent).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    /// Items in the same group line up on the tallest ascent.
    ///
    /// # Panics
    /// Panics if a shim is wrong.
    #[test]
    fn shims_align_groups() {
        let mut context = BaselineContext::default();
        context.update(1u32, GridAlignment::Baseline, 0, 10.0);
        context.update(2, GridAlignment::Baseline, 0, 25.0);
        context.update(3, GridAlignment::Baseline, 1, 5.0);
        context.update(4, GridAlignment::LastBaseline, 0, 8.0);

        assert!((context.shim(1, GridAlignment::Baseline, 0) - 15.0).abs() < EPSILON);
        assert!(context.shim(2, GridAlignment::Baseline, 0).abs() < EPSILON);
        // Different start line, own group.
        assert!(context.shim(3, GridAlignment::Baseline, 1).abs() < EPSILON);
        assert!(context.shim(4, GridAlignment::LastBaseline, 0).abs() < EPSILON);
        assert!(context.shim(9, GridAlignment::Baseline, 0).abs() < EPSILON);

        context.clear();
        assert!(context.shim(1, GridAlignment::Baseline, 0).abs() < EPSILON);
    }

    /// Only participating items report an alignment.
    ///
    /// # Panics
    /// Panics if participation is not tracked.
    #[test]
    fn participation_is_tracked() {
        let mut items = BaselineItems::default();
        items.insert(1u32, GridAlignment::Baseline);
        assert_eq!(items.participating_alignment(1), Some(GridAlignment::Baseline));
        items.set_participates(1, false);
        assert_eq!(items.participating_alignment(1), None);
        assert_eq!(items.participating_alignment(2), None);
        assert_eq!(items.iter().count(), 1);
        items.clear();
        assert!(items.is_empty());
    }
}

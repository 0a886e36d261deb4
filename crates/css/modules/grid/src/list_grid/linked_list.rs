//! Ordered doubly linked lists over an arena.
//!
//! Nodes live in a `Vec` owned by the grid and are addressed by index. A
//! node may sit on several chains at once; each chain uses its own link
//! pair, selected by a [`GridAxis`] key, so linking a node on one chain
//! never disturbs its position on another.

use crate::types::GridAxis;

/// Arena index of a node.
pub type Handle = usize;

/// Previous and next neighbours on one chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub prev: Option<Handle>,
    pub next: Option<Handle>,
}

/// A node that can be threaded onto ordered chains.
pub trait Linked {
    /// Sort key of this node on the chain selected by `chain`.
    fn index(&self, chain: GridAxis) -> usize;

    fn links(&self, chain: GridAxis) -> Links;

    fn links_mut(&mut self, chain: GridAxis) -> &mut Links;
}

/// Where an index sits relative to the nodes already on a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Occupied(Handle),
    Vacant {
        prev: Option<Handle>,
        next: Option<Handle>,
    },
}

/// Head, tail and length of one ordered chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedChain {
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl IndexedChain {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub const fn head(&self) -> Option<Handle> {
        self.head
    }

    pub const fn tail(&self) -> Option<Handle> {
        self.tail
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ordered insert.
    ///
    /// Returns the handle at `index` and whether it was created. An existing
    /// node with the same index is returned unchanged.
    pub fn insert<N: Linked>(
        &mut self,
        arena: &mut Vec<N>,
        chain: GridAxis,
        index: usize,
        make: impl FnOnce() -> N,
    ) -> (Handle, bool) {
        let slot = self.locate(arena, chain, None, index);
        self.fill(arena, chain, slot, make)
    }

    /// Ordered insert that starts searching at `anchor` instead of the head.
    ///
    /// # Panics
    /// Panics in debug builds if `anchor` sorts after `index`.
    pub fn insert_after<N: Linked>(
        &mut self,
        arena: &mut Vec<N>,
        chain: GridAxis,
        anchor: Handle,
        index: usize,
        make: impl FnOnce() -> N,
    ) -> (Handle, bool) {
        debug_assert!(arena[anchor].index(chain) <= index, "anchor sorts after index");
        let slot = self.locate(arena, chain, Some(anchor), index);
        self.fill(arena, chain, slot, make)
    }

    /// Link a node that already lives in the arena, optionally searching from `anchor`.
    ///
    /// # Panics
    /// Panics in debug builds if a different node already occupies the index.
    pub fn link_existing<N: Linked>(
        &mut self,
        arena: &mut [N],
        chain: GridAxis,
        anchor: Option<Handle>,
        handle: Handle,
    ) {
        let index = arena[handle].index(chain);
        match self.locate(arena, chain, anchor, index) {
            Slot::Occupied(existing) => {
                debug_assert_eq!(existing, handle, "index {index} already linked");
            }
            Slot::Vacant { prev, next } => self.splice(arena, chain, handle, prev, next),
        }
    }

    /// Find the node with `index`.
    pub fn find<N: Linked>(&self, arena: &[N], chain: GridAxis, index: usize) -> Option<Handle> {
        match self.locate(arena, chain, None, index) {
            Slot::Occupied(handle) => Some(handle),
            Slot::Vacant { .. } => None,
        }
    }

    /// Iterate handles in index order.
    pub fn iter<'arena, N: Linked>(
        &self,
        arena: &'arena [N],
        chain: GridAxis,
    ) -> ChainIter<'arena, N> {
        ChainIter {
            arena,
            chain,
            next: self.head,
        }
    }

    fn locate<N: Linked>(
        &self,
        arena: &[N],
        chain: GridAxis,
        anchor: Option<Handle>,
        index: usize,
    ) -> Slot {
        // Appending is the common case when items arrive in order.
        if let Some(tail) = self.tail {
            let tail_index = arena[tail].index(chain);
            if tail_index == index {
                return Slot::Occupied(tail);
            }
            if tail_index < index {
                return Slot::Vacant {
                    prev: Some(tail),
                    next: None,
                };
            }
        }
        let mut prev = None;
        let mut cursor = anchor.or(self.head);
        while let Some(handle) = cursor {
            let node_index = arena[handle].index(chain);
            if node_index == index {
                return Slot::Occupied(handle);
            }
            if node_index > index {
                break;
            }
            prev = Some(handle);
            cursor = arena[handle].links(chain).next;
        }
        if prev.is_none() {
            prev = cursor.and_then(|handle| arena[handle].links(chain).prev);
        }
        Slot::Vacant { prev, next: cursor }
    }

    fn fill<N: Linked>(
        &mut self,
        arena: &mut Vec<N>,
        chain: GridAxis,
        slot: Slot,
        make: impl FnOnce() -> N,
    ) -> (Handle, bool) {
        match slot {
            Slot::Occupied(handle) => (handle, false),
            Slot::Vacant { prev, next } => {
                let handle = arena.len();
                arena.push(make());
                self.splice(arena, chain, handle, prev, next);
                (handle, true)
            }
        }
    }

    fn splice<N: Linked>(
        &mut self,
        arena: &mut [N],
        chain: GridAxis,
        handle: Handle,
        prev: Option<Handle>,
        next: Option<Handle>,
    ) {
        *arena[handle].links_mut(chain) = Links { prev, next };
        match prev {
            Some(before) => arena[before].links_mut(chain).next = Some(handle),
            None => self.head = Some(handle),
        }
        match next {
            Some(after) => arena[after].links_mut(chain).prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.len += 1;
    }
}

/// Iterator over the handles of one chain.
pub struct ChainIter<'arena, N> {
    arena: &'arena [N],
    chain: GridAxis,
    next: Option<Handle>,
}

impl<N: Linked> Iterator for ChainIter<'_, N> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        self.next = self.arena[handle].links(self.chain).next;
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Node {
        index: usize,
        links: Links,
    }

    impl Linked for Node {
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

    fn node(index: usize) -> impl FnOnce() -> Node {
        move || Node {
            index,
            links: Links::default(),
        }
    }

    fn indices(chain: &IndexedChain, arena: &[Node]) -> Vec<usize> {
        chain
            .iter(arena, GridAxis::Row)
            .map(|handle| arena[handle].index)
            .collect()
    }

    /// Out-of-order inserts end up sorted.
    ///
    /// # Panics
    /// Panics if the chain is not ordered.
    #[test]
    fn insert_keeps_order() {
        let mut arena = Vec::new();
        let mut chain = IndexedChain::new();
        for index in [5, 1, 9, 3, 7] {
            chain.insert(&mut arena, GridAxis::Row, index, node(index));
        }
        assert_eq!(indices(&chain, &arena), vec![1, 3, 5, 7, 9]);
        assert_eq!(chain.len(), 5);
        let head = chain.head().unwrap_or_default();
        let tail = chain.tail().unwrap_or_default();
        assert_eq!(arena[head].index, 1);
        assert_eq!(arena[tail].index, 9);
    }

    /// Inserting an existing index returns the same node and keeps the length.
    ///
    /// # Panics
    /// Panics if a duplicate node is created.
    #[test]
    fn insert_is_idempotent() {
        let mut arena = Vec::new();
        let mut chain = IndexedChain::new();
        let (first, created) = chain.insert(&mut arena, GridAxis::Row, 4, node(4));
        assert!(created);
        chain.insert(&mut arena, GridAxis::Row, 8, node(8));
        let (again, created_again) = chain.insert(&mut arena, GridAxis::Row, 4, node(4));
        assert!(!created_again);
        assert_eq!(first, again);
        assert_eq!(chain.len(), 2);
        assert_eq!(arena.len(), 2);
    }

    /// Inserting after an anchor links between the anchor and its successor.
    ///
    /// # Panics
    /// Panics if the chain is not ordered.
    #[test]
    fn insert_after_anchor() {
        let mut arena = Vec::new();
        let mut chain = IndexedChain::new();
        let (anchor, _) = chain.insert(&mut arena, GridAxis::Row, 2, node(2));
        chain.insert(&mut arena, GridAxis::Row, 10, node(10));
        chain.insert_after(&mut arena, GridAxis::Row, anchor, 6, node(6));
        chain.insert_after(&mut arena, GridAxis::Row, anchor, 3, node(3));
        assert_eq!(indices(&chain, &arena), vec![2, 3, 6, 10]);
        assert_eq!(chain.find(&arena, GridAxis::Row, 6).map(|handle| arena[handle].index), Some(6));
        assert_eq!(chain.find(&arena, GridAxis::Row, 7), None);
    }

    /// Linking a pre-allocated node places it by index.
    ///
    /// # Panics
    /// Panics if the node is misplaced.
    #[test]
    fn link_existing_node() {
        let mut arena = [node(4)(), node(1)()];
        let mut chain = IndexedChain::new();
        chain.link_existing(&mut arena, GridAxis::Row, None, 0);
        chain.link_existing(&mut arena, GridAxis::Row, None, 1);
        chain.link_existing(&mut arena, GridAxis::Row, None, 1);
        assert_eq!(indices(&chain, &arena), vec![1, 4]);
        assert_eq!(chain.len(), 2);
    }
}

use std::sync::atomic::{self, AtomicUsize};

use crate::error::{Error, Result};
use crate::heap::HeapId;

/// Identity of a [`NodeArena`]; a heap only accepts the arena it was first filled from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArenaId(usize);

impl ArenaId {
    fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        ArenaId(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Stable reference to a value stored in an [`IndexedHeap`](crate::heap::IndexedHeap).
///
/// A handle stays valid for the lifetime of the [`NodeArena`] that issued it,
/// regardless of how often the value moves between slots or between heaps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) owner: HeapId,
    pub(crate) slot: usize,
}

/// Fixed capacity storage for heap elements.
///
/// Heaps only hold handles in their slot arrays; the value, the owning heap and
/// the current slot of every element live here. Two heaps that exchange roots
/// must share one arena.
#[derive(Debug)]
pub struct NodeArena<T> {
    id: ArenaId,
    nodes: Vec<Node<T>>,
    capacity: usize,
}

impl<T: Copy> NodeArena<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: ArenaId::next(),
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() == self.capacity
    }

    pub fn value(&self, handle: Handle) -> Option<T> {
        self.nodes.get(handle.0).map(|node| node.value)
    }

    pub fn owner(&self, handle: Handle) -> Option<HeapId> {
        self.nodes.get(handle.0).map(|node| node.owner)
    }

    pub fn slot(&self, handle: Handle) -> Option<usize> {
        self.nodes.get(handle.0).map(|node| node.slot)
    }

    pub(crate) fn insert(&mut self, value: T, owner: HeapId, slot: usize) -> Result<Handle> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.nodes.push(Node { value, owner, slot });
        Ok(Handle(self.nodes.len() - 1))
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<&Node<T>> {
        self.nodes.get(handle.0)
    }

    /// Callers must only pass handles this arena issued.
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        &self.nodes[handle.0]
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        &mut self.nodes[handle.0]
    }
}

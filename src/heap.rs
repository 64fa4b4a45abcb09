use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::atomic::{self, AtomicUsize};

use crate::error::{Error, Result};
use crate::handle::{ArenaId, Handle, NodeArena};
use crate::sample::Sample;

/// Identity of a heap, recorded in every node it owns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeapId(usize);

impl HeapId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        HeapId(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Smallest value at the root.
    Min,
    /// Largest value at the root.
    Max,
}

impl Orientation {
    /// True when `a` belongs strictly closer to the root than `b`.
    #[inline]
    pub fn ranks_ahead<T: Sample>(self, a: &T, b: &T) -> bool {
        match self {
            Orientation::Max => a.total_cmp(b) == Ordering::Greater,
            Orientation::Min => a.total_cmp(b) == Ordering::Less,
        }
    }
}

/// A fixed capacity binary heap whose elements are addressed through stable
/// [`Handle`]s.
///
/// Values live in a [`NodeArena`] that is passed to every operation; the heap
/// itself only stores which handle occupies which slot. Besides insertion the
/// heap supports replacing the value behind any handle in place and exchanging
/// its root with the root of another heap sharing the same arena.
///
/// The first `add` binds the heap to its arena; every later call that passes a
/// different arena fails with [`Error::ForeignArena`] before touching anything.
#[derive(Debug)]
pub struct IndexedHeap<T> {
    id: HeapId,
    orientation: Orientation,
    slots: Box<[Option<Handle>]>,
    count: usize,
    arena: Option<ArenaId>,
    _values: PhantomData<T>,
}

impl<T: Sample> IndexedHeap<T> {
    pub fn new(orientation: Orientation, capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self::with_capacity(orientation, capacity))
    }

    /// Zero capacity is allowed here; a one sample window pairs its max-heap
    /// with an empty min-heap.
    pub(crate) fn with_capacity(orientation: Orientation, capacity: usize) -> Self {
        Self {
            id: HeapId::next(),
            orientation,
            slots: vec![None; capacity].into_boxed_slice(),
            count: 0,
            arena: None,
            _values: PhantomData,
        }
    }

    pub fn id(&self) -> HeapId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    pub fn root(&self) -> Option<Handle> {
        if self.count == 0 {
            None
        } else {
            self.slots[0]
        }
    }

    /// `None` when the heap is empty or `arena` is not the heap's arena.
    pub fn root_value(&self, arena: &NodeArena<T>) -> Option<T> {
        self.check_arena(arena).ok()?;
        self.root()
            .and_then(|handle| arena.get(handle))
            .map(|node| node.value)
    }

    /// Occupied slots in slot order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots[..self.count].iter().flatten().copied()
    }

    pub fn add(&mut self, arena: &mut NodeArena<T>, value: T) -> Result<Handle> {
        self.check_arena(arena)?;
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        let slot = self.count;
        let handle = arena.insert(value, self.id, slot)?;
        self.arena = Some(arena.id());
        self.slots[slot] = Some(handle);
        self.count += 1;
        self.sift_up(arena, slot);
        Ok(handle)
    }

    /// Replaces the value behind `handle` and moves it up or down until the
    /// heap order holds again. Equal values leave the heap untouched.
    pub fn update(&mut self, arena: &mut NodeArena<T>, handle: Handle, value: T) -> Result<()> {
        self.check_arena(arena)?;
        let slot = self.locate(arena, handle)?;
        let old = arena.node(handle).value;
        if value.num_eq(&old) {
            return Ok(());
        }
        arena.node_mut(handle).value = value;
        if self.orientation.ranks_ahead(&value, &old) {
            self.sift_up(arena, slot);
        } else {
            self.sift_down(arena, slot);
        }
        Ok(())
    }

    /// Exchanges the roots of `self` and `other`, then sifts each new root down
    /// in its new heap. The heaps may have different orientations.
    pub fn swap_roots(&mut self, other: &mut IndexedHeap<T>, arena: &mut NodeArena<T>) -> Result<()> {
        let (Some(ours), Some(theirs)) = (self.root(), other.root()) else {
            return Err(Error::EmptyHeap);
        };
        self.check_arena(arena)?;
        other.check_arena(arena)?;
        self.locate(arena, ours)?;
        other.locate(arena, theirs)?;

        self.slots[0] = Some(theirs);
        other.slots[0] = Some(ours);
        arena.node_mut(theirs).owner = self.id;
        arena.node_mut(ours).owner = other.id;

        self.sift_down(arena, 0);
        other.sift_down(arena, 0);
        Ok(())
    }

    /// Checks the heap order and the slot bookkeeping of every element.
    pub fn is_heap_ordered(&self, arena: &NodeArena<T>) -> bool {
        if self.check_arena(arena).is_err() {
            return false;
        }
        let bookkeeping = (0..self.count).all(|slot| match self.slots[slot] {
            Some(handle) => arena
                .get(handle)
                .is_some_and(|node| node.slot == slot && node.owner == self.id),
            None => false,
        });
        bookkeeping
            && (1..self.count).all(|slot| {
                let parent = Self::parent_of(slot);
                !self
                    .orientation
                    .ranks_ahead(&self.value_at(arena, slot), &self.value_at(arena, parent))
            })
    }

    fn check_arena(&self, arena: &NodeArena<T>) -> Result<()> {
        match self.arena {
            Some(expected) if expected != arena.id() => Err(Error::ForeignArena {
                expected,
                found: arena.id(),
            }),
            _ => Ok(()),
        }
    }

    fn locate(&self, arena: &NodeArena<T>, handle: Handle) -> Result<usize> {
        let node = arena.get(handle).ok_or(Error::UnknownHandle(handle))?;
        let owned = node.owner == self.id
            && node.slot < self.count
            && self.slots[node.slot] == Some(handle);
        if owned {
            Ok(node.slot)
        } else {
            Err(Error::UnknownHandle(handle))
        }
    }

    fn sift_up(&mut self, arena: &mut NodeArena<T>, mut slot: usize) {
        while slot > 0 {
            let parent = Self::parent_of(slot);
            if !self
                .orientation
                .ranks_ahead(&self.value_at(arena, slot), &self.value_at(arena, parent))
            {
                break;
            }
            self.swap_slots(arena, slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, arena: &mut NodeArena<T>, mut slot: usize) {
        loop {
            let left = Self::left_child_of(slot);
            if left >= self.count {
                break;
            }
            let right = left + 1;

            // Ties go to the right child.
            let child = if right < self.count
                && !self
                    .orientation
                    .ranks_ahead(&self.value_at(arena, left), &self.value_at(arena, right))
            {
                right
            } else {
                left
            };

            if !self
                .orientation
                .ranks_ahead(&self.value_at(arena, child), &self.value_at(arena, slot))
            {
                break;
            }
            self.swap_slots(arena, slot, child);
            slot = child;
        }
    }

    fn swap_slots(&mut self, arena: &mut NodeArena<T>, a: usize, b: usize) {
        self.slots.swap(a, b);
        let (at_a, at_b) = (self.occupant(a), self.occupant(b));
        arena.node_mut(at_a).slot = a;
        arena.node_mut(at_b).slot = b;
    }

    fn occupant(&self, slot: usize) -> Handle {
        match self.slots[slot] {
            Some(handle) => handle,
            None => unreachable!("slot {slot} below count {} is vacant", self.count),
        }
    }

    #[inline]
    fn value_at(&self, arena: &NodeArena<T>, slot: usize) -> T {
        arena.node(self.occupant(slot)).value
    }

    #[inline(always)]
    fn parent_of(slot: usize) -> usize {
        (slot - 1) >> 1
    }

    #[inline(always)]
    fn left_child_of(slot: usize) -> usize {
        (slot << 1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(orientation: Orientation, values: &[i32]) -> (IndexedHeap<i32>, NodeArena<i32>, Vec<Handle>) {
        let mut arena = NodeArena::with_capacity(values.len());
        let mut heap = IndexedHeap::new(orientation, values.len()).unwrap();
        let handles = values
            .iter()
            .map(|&v| heap.add(&mut arena, v).unwrap())
            .collect();
        assert!(heap.is_heap_ordered(&arena));
        (heap, arena, handles)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            IndexedHeap::<i32>::new(Orientation::Max, 0),
            Err(Error::InvalidCapacity)
        ));
    }

    #[test]
    fn test_max_heap_root() {
        let (heap, arena, _) = filled(Orientation::Max, &[3, 9, 1, 7, 4]);
        assert_eq!(heap.root_value(&arena), Some(9));
        assert_eq!(heap.len(), 5);
        assert!(heap.is_full());
    }

    #[test]
    fn test_min_heap_root() {
        let (heap, arena, _) = filled(Orientation::Min, &[3, 9, 1, 7, 4]);
        assert_eq!(heap.root_value(&arena), Some(1));
    }

    #[test]
    fn test_add_beyond_capacity() {
        let mut arena = NodeArena::with_capacity(4);
        let mut heap = IndexedHeap::new(Orientation::Min, 2).unwrap();
        heap.add(&mut arena, 1).unwrap();
        heap.add(&mut arena, 2).unwrap();
        assert!(matches!(
            heap.add(&mut arena, 3),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_root_of_empty_heap() {
        let heap = IndexedHeap::<f64>::new(Orientation::Max, 3).unwrap();
        assert_eq!(heap.root(), None);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_handles_track_slots() {
        let (heap, arena, handles) = filled(Orientation::Max, &[5, 8, 2, 10, 1, 6]);
        for handle in handles {
            let slot = arena.slot(handle).unwrap();
            assert_eq!(heap.handles().nth(slot), Some(handle));
        }
    }

    #[test]
    fn test_update_moves_up_and_down() {
        let (mut heap, mut arena, handles) = filled(Orientation::Max, &[5, 8, 2, 10, 1, 6]);

        heap.update(&mut arena, handles[4], 20).unwrap();
        assert_eq!(heap.root(), Some(handles[4]));
        assert!(heap.is_heap_ordered(&arena));

        heap.update(&mut arena, handles[4], -1).unwrap();
        assert_eq!(heap.root_value(&arena), Some(10));
        assert_eq!(arena.value(handles[4]), Some(-1));
        assert!(heap.is_heap_ordered(&arena));
    }

    #[test]
    fn test_update_min_heap() {
        let (mut heap, mut arena, handles) = filled(Orientation::Min, &[4, 6, 9, 12]);
        heap.update(&mut arena, handles[0], 11).unwrap();
        assert_eq!(heap.root_value(&arena), Some(6));
        heap.update(&mut arena, handles[3], 0).unwrap();
        assert_eq!(heap.root(), Some(handles[3]));
        assert!(heap.is_heap_ordered(&arena));
    }

    #[test]
    fn test_update_same_value_is_noop() {
        let (mut heap, mut arena, handles) = filled(Orientation::Min, &[7, 7, 3, 7, 9]);
        let before: Vec<_> = handles.iter().map(|&h| arena.slot(h)).collect();
        heap.update(&mut arena, handles[1], 7).unwrap();
        let after: Vec<_> = handles.iter().map(|&h| arena.slot(h)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_foreign_handle() {
        let mut arena = NodeArena::with_capacity(2);
        let mut a = IndexedHeap::new(Orientation::Max, 1).unwrap();
        let mut b = IndexedHeap::new(Orientation::Min, 1).unwrap();
        let ha = a.add(&mut arena, 1).unwrap();
        b.add(&mut arena, 2).unwrap();
        assert!(matches!(
            b.update(&mut arena, ha, 5),
            Err(Error::UnknownHandle(h)) if h == ha
        ));
        assert_eq!(arena.value(ha), Some(1));
    }

    #[test]
    fn test_heaps_on_different_arenas() {
        let mut arena_a = NodeArena::with_capacity(3);
        let mut arena_b = NodeArena::with_capacity(3);
        let mut a = IndexedHeap::new(Orientation::Max, 3).unwrap();
        let mut b = IndexedHeap::new(Orientation::Min, 3).unwrap();
        for v in [1, 2, 3] {
            a.add(&mut arena_a, v).unwrap();
            b.add(&mut arena_b, v + 10).unwrap();
        }
        let (root_a, root_b) = (a.root(), b.root());

        assert!(matches!(
            a.swap_roots(&mut b, &mut arena_a),
            Err(Error::ForeignArena { .. })
        ));
        assert_eq!(a.root(), root_a);
        assert_eq!(b.root(), root_b);
        assert!(a.is_heap_ordered(&arena_a));
        assert!(b.is_heap_ordered(&arena_b));
        assert_eq!(arena_a.owner(root_a.unwrap()), Some(a.id()));

        assert!(matches!(
            a.add(&mut arena_b, 4),
            Err(Error::ForeignArena { .. })
        ));
        assert!(matches!(
            b.update(&mut arena_a, root_b.unwrap(), 0),
            Err(Error::ForeignArena { .. })
        ));
        assert_eq!(b.root_value(&NodeArena::with_capacity(1)), None);
        assert!(!b.is_heap_ordered(&arena_a));
        assert_eq!(b.root_value(&arena_b), Some(11));
    }

    #[test]
    fn test_update_to_numerically_equal_float() {
        let mut arena = NodeArena::<f64>::with_capacity(4);
        let mut heap = IndexedHeap::new(Orientation::Max, 4).unwrap();
        let handles: Vec<_> = [0.0, -0.0, -0.0, -0.0]
            .into_iter()
            .map(|v| heap.add(&mut arena, v).unwrap())
            .collect();
        let before: Vec<_> = heap.handles().collect();
        heap.update(&mut arena, handles[3], 0.0).unwrap();
        assert_eq!(heap.handles().collect::<Vec<_>>(), before);
        assert!(arena.value(handles[3]).unwrap().is_sign_negative());
    }

    #[test]
    fn test_swap_roots() {
        let mut arena = NodeArena::with_capacity(6);
        let mut low = IndexedHeap::new(Orientation::Max, 3).unwrap();
        let mut high = IndexedHeap::new(Orientation::Min, 3).unwrap();
        for v in [1, 9, 4] {
            low.add(&mut arena, v).unwrap();
        }
        for v in [5, 7, 8] {
            high.add(&mut arena, v).unwrap();
        }
        let nine = low.root().unwrap();
        let five = high.root().unwrap();

        low.swap_roots(&mut high, &mut arena).unwrap();

        assert_eq!(arena.owner(nine), Some(high.id()));
        assert_eq!(arena.owner(five), Some(low.id()));
        assert_eq!(low.root(), Some(five));
        assert_eq!(high.root_value(&arena), Some(7));
        assert!(low.is_heap_ordered(&arena));
        assert!(high.is_heap_ordered(&arena));

        // The moved handle is now updatable through its new owner only.
        assert!(low.update(&mut arena, nine, 0).is_err());
        high.update(&mut arena, nine, 6).unwrap();
        assert_eq!(high.root(), Some(nine));
    }

    #[test]
    fn test_swap_roots_with_empty_heap() {
        let mut arena = NodeArena::with_capacity(2);
        let mut a = IndexedHeap::new(Orientation::Max, 1).unwrap();
        let mut b = IndexedHeap::new(Orientation::Min, 1).unwrap();
        a.add(&mut arena, 3).unwrap();
        assert!(matches!(
            a.swap_roots(&mut b, &mut arena),
            Err(Error::EmptyHeap)
        ));
        assert_eq!(a.root_value(&arena), Some(3));
    }
}

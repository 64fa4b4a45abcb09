use std::cmp::Ordering;

use log::{debug, trace};
use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::HeapRb;

use crate::error::{Error, Result};
use crate::handle::{Handle, NodeArena};
use crate::heap::{IndexedHeap, Orientation};
use crate::sample::Sample;

/// Median of the most recent `window_size` samples, updated in O(log n) per sample.
///
/// The lower half of the window lives in a max-heap and the upper half in a
/// min-heap, so the middle value(s) are always the two roots. The max-heap
/// holds the extra sample when the window length is odd. A ring buffer of
/// handles remembers arrival order; once the window is full the oldest handle
/// is overwritten in place with the new sample instead of being removed.
pub struct RollingMedian<T> {
    window_size: usize,
    arena: NodeArena<T>,
    lower: IndexedHeap<T>,
    upper: IndexedHeap<T>,
    arrivals: HeapRb<Handle>,
}

impl<T: Sample> RollingMedian<T> {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(Error::InvalidCapacity);
        }
        let upper_capacity = window_size / 2;
        let lower_capacity = window_size - upper_capacity;
        debug!(
            "rolling median over {} samples (lower {}, upper {})",
            window_size, lower_capacity, upper_capacity
        );
        Ok(Self {
            window_size,
            arena: NodeArena::with_capacity(window_size),
            lower: IndexedHeap::with_capacity(Orientation::Max, lower_capacity),
            upper: IndexedHeap::with_capacity(Orientation::Min, upper_capacity),
            arrivals: HeapRb::new(window_size),
        })
    }

    pub fn capacity(&self) -> usize {
        self.window_size
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.window_size
    }

    pub fn add(&mut self, value: T) -> Result<()> {
        if self.arrivals.is_full() {
            self.replace_oldest(value)?;
        } else {
            let heap = if self.len() % 2 == 0 {
                &mut self.lower
            } else {
                &mut self.upper
            };
            let handle = heap.add(&mut self.arena, value)?;
            self.record(handle)?;
        }
        self.restore_root_order()
    }

    /// Mean of the two middle values when the window length is even,
    /// otherwise the middle value itself.
    pub fn current_median(&self) -> Result<f64> {
        let low = self.low_median()?.to_f64();
        if self.lower.len() == self.upper.len() {
            let high = self.high_median()?.to_f64();
            Ok((low + high) / 2.0)
        } else {
            Ok(low)
        }
    }

    /// Sum of the two middle values, or twice the middle value for odd lengths.
    pub fn twice_median(&self) -> Result<f64> {
        Ok(self.low_median()?.to_f64() + self.high_median()?.to_f64())
    }

    /// Root of the lower half.
    pub fn low_median(&self) -> Result<T> {
        self.lower.root_value(&self.arena).ok_or(Error::Empty)
    }

    /// Root of the upper half when both halves are the same size, otherwise
    /// the same value as [`low_median`](Self::low_median).
    pub fn high_median(&self) -> Result<T> {
        if self.lower.len() == self.upper.len() {
            self.upper.root_value(&self.arena).ok_or(Error::Empty)
        } else {
            self.low_median()
        }
    }

    pub fn lower_half(&self) -> &IndexedHeap<T> {
        &self.lower
    }

    pub fn upper_half(&self) -> &IndexedHeap<T> {
        &self.upper
    }

    pub fn arena(&self) -> &NodeArena<T> {
        &self.arena
    }

    fn replace_oldest(&mut self, value: T) -> Result<()> {
        let oldest = *self.arrivals.iter().next().ok_or(Error::Empty)?;
        let owner = self.arena.owner(oldest).ok_or(Error::UnknownHandle(oldest))?;
        let heap = if owner == self.lower.id() {
            &mut self.lower
        } else {
            &mut self.upper
        };
        trace!("evicting {:?} for {:?}", self.arena.value(oldest), value);
        heap.update(&mut self.arena, oldest, value)?;

        self.arrivals.try_pop();
        self.record(oldest)
    }

    fn record(&mut self, handle: Handle) -> Result<()> {
        self.arrivals
            .try_push(handle)
            .map_err(|_| Error::CapacityExceeded {
                capacity: self.window_size,
            })
    }

    fn restore_root_order(&mut self) -> Result<()> {
        let roots = (
            self.lower.root_value(&self.arena),
            self.upper.root_value(&self.arena),
        );
        if let (Some(low), Some(high)) = roots {
            if high.total_cmp(&low) == Ordering::Less {
                trace!("swapping roots {:?} and {:?}", low, high);
                self.lower.swap_roots(&mut self.upper, &mut self.arena)?;
            }
        }
        Ok(())
    }
}

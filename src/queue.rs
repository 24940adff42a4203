use std::collections::VecDeque;

use crate::error::{Error, Result};

/// Anything the queue can order.
pub trait Weighted {
    fn weight(&self) -> u64;
}

/// Ascending-by-weight queue used while merging tree nodes.
///
/// A new element goes immediately before the first element whose weight is
/// greater than or equal to its own, so equal weights come out in reverse
/// insertion order. Tree shapes (and therefore encoded output) depend on this
/// exact ordering.
#[derive(Debug, Clone)]
pub struct AscendingQueue<T> {
    elements: VecDeque<T>,
}

impl<T> AscendingQueue<T> {
    pub fn new() -> Self {
        AscendingQueue {
            elements: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AscendingQueue {
            elements: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn has_at_least_two(&self) -> bool {
        self.elements.len() >= 2
    }

    pub fn extract_min(&mut self) -> Result<T> {
        self.elements.pop_front().ok_or(Error::EmptyQueue)
    }
}

impl<T: Weighted> AscendingQueue<T> {
    pub fn insert(&mut self, value: T) {
        let weight = value.weight();
        let at = self.elements.partition_point(|e| e.weight() < weight);
        self.elements.insert(at, value);
        debug_assert!(self.is_ascending());
    }

    pub fn is_ascending(&self) -> bool {
        self.elements
            .iter()
            .zip(self.elements.iter().skip(1))
            .all(|(a, b)| a.weight() <= b.weight())
    }
}

impl<T> Default for AscendingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Weighted> FromIterator<T> for AscendingQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = AscendingQueue::new();
        for value in iter {
            queue.insert(value);
        }
        queue
    }
}

// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shared Bounded Queue (C4)
//!
//! A FIFO feeding the single upload/download worker thread. `push` never
//! blocks on capacity — capacity here is only the initial allocation hint,
//! matching §4.4 — and `pop_blocking` sleeps on a condition variable until
//! an item arrives or the queue is told to stop.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    must_stop: AtomicBool,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity_hint: usize) -> Self {
        BoundedQueue {
            items: Mutex::new(VecDeque::with_capacity(capacity_hint)),
            not_empty: Condvar::new(),
            must_stop: AtomicBool::new(false),
        }
    }

    /// Appends `value`, waking one blocked `pop_blocking` caller.
    pub fn push(&self, value: T) {
        let mut items = self.items.lock();
        items.push_back(value);
        self.not_empty.notify_one();
    }

    /// Non-blocking pop: `None` if the queue is currently empty.
    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Blocks until an item is available or `signal_stop` has been called
    /// and the queue is empty, in which case it returns `None`.
    pub fn pop_blocking(&self) -> Option<T> {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            if self.must_stop.load(Ordering::Relaxed) {
                return None;
            }
            self.not_empty.wait(&mut items);
        }
    }

    /// Drops all pending items (used for cancel-on-shutdown). Items already
    /// popped by the worker are unaffected.
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Marks the queue as stopping and wakes any blocked waiter so it can
    /// observe the flag.
    pub fn signal_stop(&self) {
        self.must_stop.store(true, Ordering::Relaxed);
        self.not_empty.notify_all();
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn push_then_pop_is_fifo() {
        let q = BoundedQueue::new(4);
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn pop_blocking_wakes_on_push() {
        let q = Arc::new(BoundedQueue::new(1));
        let q2 = q.clone();
        let handle = thread::spawn(move || q2.pop_blocking());
        thread::sleep(Duration::from_millis(20));
        q.push(42);
        assert_eq!(handle.join().unwrap(), Some(42));
    }

    #[test]
    fn pop_blocking_returns_none_after_stop_on_empty_queue() {
        let q = Arc::new(BoundedQueue::<u32>::new(1));
        let q2 = q.clone();
        let handle = thread::spawn(move || q2.pop_blocking());
        thread::sleep(Duration::from_millis(20));
        q.signal_stop();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn clear_drops_pending_items() {
        let q = BoundedQueue::new(4);
        q.push(1);
        q.push(2);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn in_flight_item_already_popped_survives_clear() {
        let q = BoundedQueue::new(4);
        q.push(1);
        let item = q.pop().unwrap();
        q.clear();
        assert_eq!(item, 1);
    }
}

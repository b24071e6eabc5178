use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use platform::InputEvent;

/// Capacity of the host-side injection queue. Sized so a brief stall in the
/// injector (a modal tracking loop, a slow IME) absorbs a few seconds of
/// mouse/keyboard traffic without the network reader blocking.
pub const CAPACITY: usize = 256;

/// Single-producer (network reader), single-consumer (injection worker)
/// queue that decouples receiving input events from injecting them. Once
/// full, the oldest queued event is dropped to admit the new one — recent
/// input matters more than stale input once the injector has fallen behind.
pub struct InputQueue {
    inner: Mutex<VecDeque<InputEvent>>,
    not_empty: Condvar,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self { inner: Mutex::new(VecDeque::with_capacity(CAPACITY)), not_empty: Condvar::new() }
    }
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `event`, dropping the oldest queued event first if the queue
    /// is already at `CAPACITY`. Preserves relative order of mouse and
    /// keyboard events as received.
    pub fn push(&self, event: InputEvent) {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if guard.len() >= CAPACITY {
            guard.pop_front();
        }
        guard.push_back(event);
        self.not_empty.notify_one();
    }

    /// Blocks until an event is available, then returns it.
    pub fn pop_blocking(&self) -> InputEvent {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        loop {
            if let Some(event) = guard.pop_front() {
                return event;
            }
            guard = self.not_empty.wait(guard).unwrap_or_else(std::sync::PoisonError::into_inner);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse_move(x: i32) -> InputEvent {
        InputEvent::MouseMove { x, y: 0 }
    }

    #[test]
    fn preserves_order_under_capacity() {
        let queue = InputQueue::new();
        queue.push(mouse_move(1));
        queue.push(mouse_move(2));
        assert_eq!(queue.pop_blocking(), mouse_move(1));
        assert_eq!(queue.pop_blocking(), mouse_move(2));
    }

    #[test]
    fn drops_oldest_on_overflow() {
        let queue = InputQueue::new();
        for i in 0..CAPACITY + 10 {
            queue.push(mouse_move(i as i32));
        }
        assert_eq!(queue.len(), CAPACITY);
        assert_eq!(queue.pop_blocking(), mouse_move(10));
    }
}

//! Bounded blocking FIFO shared by the producer and the consumer pool.
//!
//! A classic monitor: one mutex guards the items, the completion flag and
//! the live-consumer count; two condition variables carry the "not full"
//! and "not empty" signals. Every wait re-checks its predicate in a loop.
//!
//! - `push` wakes one waiter on "not empty" (a push makes the queue
//!   non-empty, so one consumer is enough).
//! - `close` sets the completion flag and wakes *all* waiters on
//!   "not empty", since every parked consumer has to see the flag.
//! - `pop` returns `None` only once the queue is empty and closed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Returned by [`BoundedQueue::push`] when no consumer is left to drain
/// the queue. Carries the rejected item back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnected<T>(pub T);

impl<T> fmt::Display for Disconnected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("every consumer has detached from the queue")
    }
}

impl<T: fmt::Debug> std::error::Error for Disconnected<T> {}

struct State<T> {
    items: VecDeque<T>,
    /// Set once by the producer; never reset.
    closed: bool,
    /// Consumers currently attached. `None` until the first attach, so a
    /// queue used without the consumer accounting never disconnects.
    consumers: Option<usize>,
}

impl<T> State<T> {
    fn disconnected(&self) -> bool {
        self.consumers == Some(0)
    }
}

/// Fixed-capacity FIFO with blocking `push`/`pop` and a completion flag.
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty, open queue.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be at least 1");
        Self {
            capacity,
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                consumers: None,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    // A panicking worker never leaves the state half-updated: every
    // mutation below is a single VecDeque or field operation.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `item` at the tail, blocking while the queue is full.
    ///
    /// Fails only when every attached consumer has detached, in which case
    /// nobody would ever make room again.
    pub fn push(&self, item: T) -> Result<(), Disconnected<T>> {
        let mut state = self.lock();
        while state.items.len() >= self.capacity && !state.disconnected() {
            tracing::trace!(capacity = self.capacity, "queue full, producer waiting");
            state = self.not_full.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.disconnected() {
            return Err(Disconnected(item));
        }
        state.items.push_back(item);
        debug_assert!(state.items.len() <= self.capacity);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes the head item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is empty and closed: no more work will
    /// ever arrive.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        while state.items.is_empty() && !state.closed {
            tracing::trace!("queue empty, consumer waiting");
            state = self.not_empty.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        let item = state.items.pop_front()?;
        drop(state);
        self.not_full.notify_one();
        Some(item)
    }

    /// Sets the completion flag and wakes every consumer parked in `pop`.
    ///
    /// Idempotent. Items already queued are still handed out.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
    }

    /// Whether the completion flag has been set.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registers a consumer. The returned guard detaches it on drop,
    /// including when the consumer unwinds.
    pub fn attach_consumer(&self) -> ConsumerGuard<'_, T> {
        let mut state = self.lock();
        *state.consumers.get_or_insert(0) += 1;
        ConsumerGuard { queue: self }
    }

    /// Number of consumers currently attached.
    pub fn consumer_count(&self) -> usize {
        self.lock().consumers.unwrap_or(0)
    }

    fn detach_consumer(&self) {
        let mut state = self.lock();
        if let Some(count) = state.consumers.as_mut() {
            *count = count.saturating_sub(1);
        }
        let disconnected = state.disconnected();
        drop(state);
        if disconnected {
            // The producer may be parked on a full queue; let it observe
            // that nobody is left.
            self.not_full.notify_all();
        }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .field("consumers", &state.consumers.unwrap_or(0))
            .finish()
    }
}

/// Keeps a consumer attached to a [`BoundedQueue`] while alive.
#[must_use = "the consumer detaches as soon as the guard is dropped"]
pub struct ConsumerGuard<'a, T> {
    queue: &'a BoundedQueue<T>,
}

impl<T> Drop for ConsumerGuard<'_, T> {
    fn drop(&mut self) {
        self.queue.detach_consumer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_until(cond: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = BoundedQueue::new(4);
        for i in 0..4 {
            queue.push(i).unwrap();
        }
        assert_eq!(queue.len(), 4);
        for i in 0..4 {
            assert_eq!(queue.pop(), Some(i));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_after_close_drains_then_ends() {
        let queue = BoundedQueue::new(2);
        queue.push("a").unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert_eq!(queue.pop(), Some("a"));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_close_is_idempotent() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(1);
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_zero_capacity_panics() {
        let _ = BoundedQueue::<u8>::new(0);
    }

    #[test]
    fn test_push_blocks_when_full() {
        let queue = BoundedQueue::new(1);
        let pushed = AtomicUsize::new(0);

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..3 {
                    queue.push(i).unwrap();
                    pushed.fetch_add(1, Ordering::SeqCst);
                }
            });

            wait_until(|| pushed.load(Ordering::SeqCst) == 1);
            thread::sleep(Duration::from_millis(20));
            // Only the first push fits
            assert_eq!(pushed.load(Ordering::SeqCst), 1);
            assert_eq!(queue.len(), 1);

            for i in 0..3 {
                assert_eq!(queue.pop(), Some(i));
            }
        });
        assert_eq!(pushed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_close_wakes_all_idle_consumers() {
        let queue: BoundedQueue<u32> = BoundedQueue::new(2);
        let finished = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(queue.pop(), None);
                    finished.fetch_add(1, Ordering::SeqCst);
                });
            }
            thread::sleep(Duration::from_millis(20));
            assert_eq!(finished.load(Ordering::SeqCst), 0);
            queue.close();
        });
        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_push_fails_once_every_consumer_detached() {
        let queue = BoundedQueue::new(1);
        let guard = queue.attach_consumer();
        assert_eq!(queue.consumer_count(), 1);

        queue.push(1).unwrap();
        thread::scope(|s| {
            let blocked = s.spawn(|| queue.push(2));
            thread::sleep(Duration::from_millis(20));
            drop(guard);
            assert_eq!(blocked.join().unwrap(), Err(Disconnected(2)));
        });
        assert_eq!(queue.consumer_count(), 0);
    }

    #[test]
    fn test_partial_detach_keeps_queue_open() {
        let queue = BoundedQueue::new(2);
        let kept = queue.attach_consumer();
        drop(queue.attach_consumer());
        drop(queue.attach_consumer());
        assert_eq!(queue.consumer_count(), 1);

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..10 {
                    queue.push(i).unwrap();
                }
                queue.close();
            });

            let drained: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
            assert_eq!(drained, (0..10).collect::<Vec<_>>());
        });
        drop(kept);
    }

    #[test]
    fn test_unattached_queue_never_disconnects() {
        let queue = BoundedQueue::new(1);
        assert_eq!(queue.consumer_count(), 0);
        assert!(queue.push(1).is_ok());
    }
}

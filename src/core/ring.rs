//! Bounded lock-free ring queue
//!
//! A Vyukov-style sequence-numbered ring specialised for many producers and a
//! single consumer. Producers only ever perform compare-and-swap retries on the
//! head counter; the consumer side never synchronises with producers beyond
//! one acquire load per slot.
//!
//! Every slot carries a sequence number:
//!
//! - `seq == pos`: the slot is free for the producer that claims `pos`
//! - `seq == pos + 1`: the slot holds the value pushed at `pos`
//! - after the consumer takes the value at `pos` it stores `pos + capacity`,
//!   handing the slot to the producer of the next lap
//!
//! Popping goes through a [`Consumer`] guard. Only one guard can exist at a
//! time, which is what keeps the queue single-consumer even when several
//! threads try to drain it.

use super::error::{LoggerError, Result};
use parking_lot::{Mutex, MutexGuard};
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps the producer and consumer counters on separate cache lines.
#[repr(align(64))]
struct CacheAligned<T>(T);

struct Slot<T> {
    seq: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

pub struct MpscRing<T> {
    slots: Box<[Slot<T>]>,
    mask: usize,
    head: CacheAligned<AtomicUsize>,
    tail: CacheAligned<Mutex<usize>>,
}

// SAFETY: a slot's value is only written by the producer that won the CAS for
// its position and only read by the single consumer after observing the
// producer's release store, so values cross threads but are never shared.
unsafe impl<T: Send> Send for MpscRing<T> {}
unsafe impl<T: Send> Sync for MpscRing<T> {}

impl<T> MpscRing<T> {
    /// Create a ring holding up to `capacity` values.
    ///
    /// `capacity` must be a power of two and at least 2; a single slot cannot
    /// tell "free for the next lap" apart from "still full".
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 2 || !capacity.is_power_of_two() {
            return Err(LoggerError::config(
                "MpscRing",
                format!("capacity must be a power of two >= 2, got {}", capacity),
            ));
        }

        let slots = (0..capacity)
            .map(|i| Slot {
                seq: AtomicUsize::new(i),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            slots,
            mask: capacity - 1,
            head: CacheAligned(AtomicUsize::new(0)),
            tail: CacheAligned(Mutex::new(0)),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Enqueue `value` without blocking.
    ///
    /// Returns the value back when the ring is full. A failed push is never
    /// retried internally; the caller decides what to do with the value.
    pub fn push(&self, value: T) -> std::result::Result<(), T> {
        let mut pos = self.head.0.load(Ordering::Relaxed);

        loop {
            let slot = &self.slots[pos & self.mask];
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(pos) as isize;

            if diff == 0 {
                match self.head.0.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // SAFETY: winning the CAS for `pos` grants exclusive
                        // write access to this slot until `seq` is published.
                        unsafe { (*slot.value.get()).write(value) };
                        slot.seq.store(pos.wrapping_add(1), Ordering::Release);
                        return Ok(());
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                // previous lap not consumed yet
                return Err(value);
            } else {
                // another producer already claimed this position
                pos = self.head.0.load(Ordering::Relaxed);
            }
        }
    }

    /// Acquire the consumer side, waiting for any other consumer to finish.
    pub fn consumer(&self) -> Consumer<'_, T> {
        Consumer {
            ring: self,
            tail: self.tail.0.lock(),
        }
    }

    /// Acquire the consumer side only if nobody else holds it.
    pub fn try_consumer(&self) -> Option<Consumer<'_, T>> {
        self.tail.0.try_lock().map(|tail| Consumer { ring: self, tail })
    }

    /// Dequeue a single value. Shorthand for `self.consumer().pop()`.
    pub fn pop(&self) -> Option<T> {
        self.consumer().pop()
    }
}

impl<T> fmt::Debug for MpscRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpscRing")
            .field("capacity", &self.capacity())
            .field("head", &self.head.0.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T> Drop for MpscRing<T> {
    fn drop(&mut self) {
        if std::mem::needs_drop::<T>() {
            while self.pop().is_some() {}
        }
    }
}

/// Exclusive handle on the consuming end of an [`MpscRing`].
pub struct Consumer<'a, T> {
    ring: &'a MpscRing<T>,
    tail: MutexGuard<'a, usize>,
}

impl<T> Consumer<'_, T> {
    /// Dequeue the oldest published value, or `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<T> {
        let tail = *self.tail;
        let slot = &self.ring.slots[tail & self.ring.mask];

        if slot.seq.load(Ordering::Acquire) != tail.wrapping_add(1) {
            return None;
        }

        // SAFETY: `seq == tail + 1` means the producer for `tail` has fully
        // written the value, and holding the consumer guard means nobody else
        // reads it. Reading moves it out; the slot is logically uninit again.
        let value = unsafe { (*slot.value.get()).assume_init_read() };
        slot.seq
            .store(tail.wrapping_add(self.ring.capacity()), Ordering::Release);
        *self.tail = tail.wrapping_add(1);

        Some(value)
    }
}

impl<T> Iterator for Consumer<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_capacity_must_be_power_of_two() {
        assert!(MpscRing::<u32>::with_capacity(0).is_err());
        assert!(MpscRing::<u32>::with_capacity(1).is_err());
        assert!(MpscRing::<u32>::with_capacity(3).is_err());
        assert!(MpscRing::<u32>::with_capacity(100).is_err());
        assert_eq!(MpscRing::<u32>::with_capacity(64).unwrap().capacity(), 64);
    }

    #[test]
    fn test_push_pop_fifo() {
        let ring = MpscRing::with_capacity(8).unwrap();
        for i in 0..5 {
            ring.push(i).unwrap();
        }
        let popped: Vec<i32> = ring.consumer().collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4]);
        assert!(ring.pop().is_none());
    }

    #[test]
    fn test_full_ring_rejects_and_returns_value() {
        let ring = MpscRing::with_capacity(4).unwrap();
        for i in 0..4 {
            assert!(ring.push(i).is_ok());
        }
        assert_eq!(ring.push(99), Err(99));

        let popped: Vec<i32> = ring.consumer().collect();
        assert_eq!(popped, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_wraps_many_laps() {
        let ring = MpscRing::with_capacity(4).unwrap();
        let mut consumer_expect = 0u64;
        for lap in 0..1000u64 {
            for i in 0..3 {
                ring.push(lap * 3 + i).unwrap();
            }
            let mut consumer = ring.consumer();
            while let Some(v) = consumer.pop() {
                assert_eq!(v, consumer_expect);
                consumer_expect += 1;
            }
        }
        assert_eq!(consumer_expect, 3000);
    }

    #[test]
    fn test_slot_reusable_after_pop() {
        let ring = MpscRing::with_capacity(2).unwrap();
        ring.push("a").unwrap();
        ring.push("b").unwrap();
        assert!(ring.push("c").is_err());
        assert_eq!(ring.pop(), Some("a"));
        assert!(ring.push("c").is_ok());
        assert!(ring.push("d").is_err());
    }

    #[test]
    fn test_only_one_consumer_at_a_time() {
        let ring = MpscRing::<u8>::with_capacity(2).unwrap();
        let first = ring.consumer();
        assert!(ring.try_consumer().is_none());
        drop(first);
        assert!(ring.try_consumer().is_some());
    }

    #[test]
    fn test_drop_releases_unconsumed_values() {
        struct Tracked(Arc<AtomicUsize>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        {
            let ring = MpscRing::with_capacity(8).unwrap();
            for _ in 0..5 {
                assert!(ring.push(Tracked(Arc::clone(&drops))).is_ok());
            }
            drop(ring.pop());
            assert_eq!(drops.load(Ordering::SeqCst), 1);
        }
        assert_eq!(drops.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_concurrent_producers_per_producer_fifo() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 5_000;

        let ring = Arc::new(MpscRing::<(usize, usize)>::with_capacity(64).unwrap());
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let mut item = (p, i);
                        while let Err(back) = ring.push(item) {
                            item = back;
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let mut next = [0usize; PRODUCERS];
        let mut received = 0;
        while received < PRODUCERS * PER_PRODUCER {
            match ring.pop() {
                Some((p, i)) => {
                    assert_eq!(i, next[p], "producer {} out of order", p);
                    next[p] += 1;
                    received += 1;
                }
                None => thread::yield_now(),
            }
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(ring.pop().is_none());
        assert!(next.iter().all(|&n| n == PER_PRODUCER));
    }
}

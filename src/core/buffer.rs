//! Record buffers between producers and the draining consumer

use super::{error::Result, record::Record, ring::MpscRing};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Holding area for records between `store` and delivery.
///
/// Both operations are non-blocking from the caller's point of view. A
/// buffer may be pushed to from any number of threads; draining is expected
/// to happen from one thread at a time (the [`Logger`](crate::Logger)
/// serialises its flushes).
pub trait Buffer: Send + Sync {
    /// Enqueue a record, handing it back if the buffer cannot take it.
    fn push(&self, record: Record) -> std::result::Result<(), Record>;

    /// Dequeue the oldest record, if any.
    fn pop(&self) -> Option<Record>;

    /// Pop every currently available record into `deliver`, oldest first.
    /// Returns how many records were drained.
    fn drain(&self, deliver: &mut dyn FnMut(Record)) -> usize {
        let mut count = 0;
        while let Some(record) = self.pop() {
            deliver(record);
            count += 1;
        }
        count
    }

    /// Maximum number of buffered records, `None` when unbounded.
    fn capacity(&self) -> Option<usize>;

    fn name(&self) -> &str;
}

/// Unbounded mutex-protected queue. Never rejects a record.
#[derive(Debug, Default)]
pub struct LockedQueue {
    records: Mutex<VecDeque<Record>>,
}

impl LockedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Buffer for LockedQueue {
    fn push(&self, record: Record) -> std::result::Result<(), Record> {
        self.records.lock().push_back(record);
        Ok(())
    }

    fn pop(&self) -> Option<Record> {
        self.records.lock().pop_front()
    }

    fn drain(&self, deliver: &mut dyn FnMut(Record)) -> usize {
        // Take the whole batch so producers are not held up by delivery.
        let batch = std::mem::take(&mut *self.records.lock());
        let count = batch.len();
        batch.into_iter().for_each(|record| deliver(record));
        count
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        "locked_queue"
    }
}

/// Bounded lock-free ring. Rejects records while full.
#[derive(Debug)]
pub struct RingBuffer {
    ring: MpscRing<Record>,
}

impl RingBuffer {
    /// `capacity` must be a power of two (at least 2).
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            ring: MpscRing::with_capacity(capacity)?,
        })
    }
}

impl Buffer for RingBuffer {
    #[inline]
    fn push(&self, record: Record) -> std::result::Result<(), Record> {
        self.ring.push(record)
    }

    fn pop(&self) -> Option<Record> {
        self.ring.pop()
    }

    fn drain(&self, deliver: &mut dyn FnMut(Record)) -> usize {
        let mut consumer = self.ring.consumer();
        let mut count = 0;
        while let Some(record) = consumer.pop() {
            deliver(record);
            count += 1;
        }
        count
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.ring.capacity())
    }

    fn name(&self) -> &str {
        "ring_buffer"
    }
}

/// Which buffer a [`Logger`](crate::Logger) is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferKind {
    /// [`LockedQueue`]
    #[default]
    Unbounded,
    /// [`RingBuffer`] with the given capacity
    Ring(usize),
}

impl BufferKind {
    pub fn build(self) -> Result<Box<dyn Buffer>> {
        Ok(match self {
            BufferKind::Unbounded => Box::new(LockedQueue::new()),
            BufferKind::Ring(capacity) => Box::new(RingBuffer::with_capacity(capacity)?),
        })
    }
}

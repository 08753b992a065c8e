//! Bounded multi-consumer work queue with a one-shot completion signal.
//!
//! The queue sits between the single directory-walking producer and the pool
//! of scanning workers. `push` blocks while the queue is full and `pop` blocks
//! while it is empty, so the walker can never run more than `capacity` items
//! ahead of the workers.
//!
//! Completion is expressed by disconnecting the underlying channel: the queue
//! holds the only long-lived [`Sender`], and [`WorkQueue::signal_completion`]
//! drops it. Every receiver blocked in `pop` then wakes, drains whatever is
//! still buffered and finally observes `None`.

use crate::error::{Result, WordhuntError};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::trace;
use parking_lot::Mutex;
use std::fmt;

/// Error returned by [`WorkQueue::push`].
#[derive(PartialEq, Eq)]
pub enum QueueError<T> {
    /// Completion was already signalled; the rejected item is handed back.
    Completed(T),
}

impl<T> QueueError<T> {
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Completed(item) => item,
        }
    }
}

impl<T> fmt::Debug for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Completed(_) => f.write_str("Completed(..)"),
        }
    }
}

impl<T> fmt::Display for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Completed(_) => write!(f, "push on a completed work queue"),
        }
    }
}

impl<T> std::error::Error for QueueError<T> {}

impl<T> From<QueueError<T>> for WordhuntError {
    fn from(_: QueueError<T>) -> Self {
        WordhuntError::QueueClosed
    }
}

/// Fixed-capacity FIFO shared by one producer and any number of consumers.
pub struct WorkQueue<T> {
    capacity: usize,
    // `None` once completion has been signalled.
    sender: Mutex<Option<Sender<T>>>,
    receiver: Receiver<T>,
}

impl<T> WorkQueue<T> {
    /// Creates a queue holding at most `capacity` items.
    ///
    /// A capacity of zero is rejected: it would turn the queue into a
    /// rendezvous point rather than a buffer.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(WordhuntError::config("queue capacity must be at least 1"));
        }
        let (tx, rx) = bounded(capacity);
        Ok(Self {
            capacity,
            sender: Mutex::new(Some(tx)),
            receiver: rx,
        })
    }

    /// Appends `item`, blocking while the queue is full.
    ///
    /// The lock only guards the sender handle; the blocking send happens after
    /// it is released, so a full queue never stalls `signal_completion`.
    pub fn push(&self, item: T) -> std::result::Result<(), QueueError<T>> {
        let sender = match self.sender.lock().as_ref() {
            Some(tx) => tx.clone(),
            None => return Err(QueueError::Completed(item)),
        };
        // The receiver lives as long as `self`, so the channel cannot be
        // disconnected from the receiving side.
        sender.send(item).map_err(|e| QueueError::Completed(e.into_inner()))
    }

    /// Removes the oldest item, blocking while the queue is empty.
    ///
    /// Returns `None` only after completion has been signalled and every
    /// buffered item has been handed out. From then on every call returns
    /// `None` immediately.
    pub fn pop(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// Marks the queue as complete and wakes every blocked `pop`.
    ///
    /// Returns `true` for the call that performed the transition and `false`
    /// for any later call.
    pub fn signal_completion(&self) -> bool {
        let sender = self.sender.lock().take();
        let transitioned = sender.is_some();
        // Dropped outside the lock.
        drop(sender);
        if transitioned {
            trace!("work queue completed with {} item(s) buffered", self.len());
        }
        transitioned
    }

    pub fn is_completed(&self) -> bool {
        self.sender.lock().is_none()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pops until the queue reports completion.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.pop())
    }
}

impl<T> fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("completed", &self.is_completed())
            .finish()
    }
}

//! `IncidentStore` — FIFO incident queue plus a monotonic report counter.
//!
//! # Consistency
//!
//! The queue and the counter live behind one `Mutex`, and every operation
//! takes it exactly once.  An observer therefore never sees the counter
//! ahead of the queue (or the reverse); both change inside the same
//! critical section.
//!
//! The counter only ever grows.  [`dequeue`](IncidentStore::dequeue) shrinks
//! the queue but leaves [`total`](IncidentStore::total) alone, so the count
//! clients see is "incidents ever reported", not "incidents waiting".
//!
//! # Poisoning
//!
//! Every mutation is a single push/pop plus an increment, so the state is
//! never left half updated; a poisoned lock is recovered, not propagated.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use fb_core::IncidentId;

use crate::{Incident, IncidentError, IncidentResult};

#[derive(Default)]
struct Inner {
    queue: VecDeque<Incident>,
    total: u64,
}

/// Thread-safe incident queue.  Share it by reference (or inside an `Arc`)
/// across connection handlers; all methods take `&self`.
#[derive(Default)]
pub struct IncidentStore {
    inner: Mutex<Inner>,
}

/// Counter and queue length read under one lock acquisition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IncidentSnapshot {
    pub total:  u64,
    pub queued: usize,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `incident` to the tail and bump the report counter.
    ///
    /// Returns the id assigned to the incident, which equals the counter
    /// value after this report.
    pub fn enqueue(&self, mut incident: Incident) -> IncidentId {
        let mut inner = self.lock();
        inner.total += 1;
        incident.id = IncidentId(inner.total);
        inner.queue.push_back(incident);
        IncidentId(inner.total)
    }

    /// Remove and return the oldest queued incident.
    ///
    /// # Errors
    ///
    /// [`IncidentError::EmptyQueue`] if nothing is queued.
    pub fn dequeue(&self) -> IncidentResult<Incident> {
        self.lock().queue.pop_front().ok_or(IncidentError::EmptyQueue)
    }

    /// Put an incident taken by [`dequeue`](Self::dequeue) back at the head
    /// of the queue.  The report counter is not touched.
    pub fn requeue_front(&self, incident: Incident) {
        self.lock().queue.push_front(incident);
    }

    /// Number of incidents currently queued.
    pub fn size(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Incidents reported since startup.  Never decreases.
    pub fn total(&self) -> u64 {
        self.lock().total
    }

    pub fn snapshot(&self) -> IncidentSnapshot {
        let inner = self.lock();
        IncidentSnapshot {
            total:  inner.total,
            queued: inner.queue.len(),
        }
    }
}

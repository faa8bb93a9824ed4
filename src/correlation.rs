//! # Correlation Registry
//!
//! Matches outgoing bridge calls to the replies the external consumer
//! eventually delivers, and suspends caller threads until a correlated
//! reply arrives.
//!
//! ## Overview
//!
//! Each outgoing call gets a monotonically increasing identifier from an
//! atomic counter; ids are never reused for the lifetime of the registry, so
//! a stale reply can never be mistaken for a fresh one. Every outstanding
//! call owns exactly one [`ReplySlot`] with its own mutex and condition
//! variable: delivering a reply wakes only the one thread waiting on that
//! id, rather than broadcasting to every waiter on a shared signal.
//!
//! Slots are consumed (removed) in the same step that returns the reply, so
//! a reply can be observed at most once. Slots abandoned by a timed-out
//! waiter are removed as well, which makes late deliveries harmless no-ops.

use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Correlation key matching a call to its eventual reply.
///
/// Unique per registry instance, monotonically increasing, never reclaimed.
pub type CallId = u64;

/// Outcome of a blocking wait on a call id
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    /// The consumer delivered a reply for this id
    Replied(Value),
    /// The deadline elapsed before any reply arrived
    TimedOut(Duration),
}

/// One pending reply, owned by a single outstanding call
#[derive(Debug, Default)]
struct ReplySlot {
    reply: Mutex<Option<Value>>,
    fulfilled: Condvar,
}

/// Registry of outstanding calls and their pending replies
#[derive(Debug, Default)]
pub struct CorrelationRegistry {
    /// Monotonic call id source; ids start at 1
    counter: AtomicU64,
    /// One slot per outstanding call, removed on consumption
    slots: Mutex<HashMap<CallId, Arc<ReplySlot>>>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next call id. Safe to call concurrently with reply
    /// delivery and other allocations.
    pub fn allocate_id(&self) -> CallId {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Create the pending slot for an allocated id. Must happen before the
    /// call is dispatched, otherwise a fast consumer could reply into
    /// nothing.
    pub fn reserve(&self, id: CallId) {
        let mut slots = self.slots.lock();
        if slots.insert(id, Arc::new(ReplySlot::default())).is_some() {
            // unreachable when ids come from allocate_id
            warn!(call_id = id, "reserved a call id that already had a pending slot");
        }
    }

    /// Deliver a reply for `id`, waking its waiter. Returns `false` when the
    /// delivery was dropped: unknown id, already-consumed slot, or a
    /// duplicate delivery racing a first one.
    pub fn fulfill(&self, id: CallId, reply: Value) -> bool {
        let slot = match self.slots.lock().get(&id) {
            Some(slot) => Arc::clone(slot),
            None => {
                debug!(call_id = id, "dropping reply for unknown or consumed call id");
                return false;
            }
        };

        let mut pending = slot.reply.lock();
        if pending.is_some() {
            debug!(call_id = id, "dropping duplicate reply");
            return false;
        }
        *pending = Some(reply);
        drop(pending);
        slot.fulfilled.notify_one();
        true
    }

    /// Block the calling thread until a reply for `id` is delivered, then
    /// consume the slot and return the reply. With a deadline, returns
    /// [`WaitOutcome::TimedOut`] once the total wait exceeds it and removes
    /// the slot so a late reply is dropped.
    ///
    /// Only the thread that allocated and reserved `id` may wait on it.
    pub fn wait(&self, id: CallId, deadline: Option<Duration>) -> WaitOutcome {
        let slot = match self.slots.lock().get(&id) {
            Some(slot) => Arc::clone(slot),
            None => {
                warn!(call_id = id, "wait on an id with no pending slot");
                return WaitOutcome::TimedOut(Duration::ZERO);
            }
        };

        let started = Instant::now();
        let mut pending = slot.reply.lock();
        loop {
            if let Some(reply) = pending.take() {
                drop(pending);
                self.slots.lock().remove(&id);
                return WaitOutcome::Replied(reply);
            }

            match deadline {
                None => slot.fulfilled.wait(&mut pending),
                Some(limit) => {
                    let Some(remaining) = limit.checked_sub(started.elapsed()) else {
                        drop(pending);
                        self.slots.lock().remove(&id);
                        return WaitOutcome::TimedOut(started.elapsed());
                    };
                    // spurious wakeups loop back to the slot re-check
                    let _ = slot.fulfilled.wait_for(&mut pending, remaining);
                }
            }
        }
    }

    /// Number of calls currently awaiting a reply
    pub fn outstanding(&self) -> usize {
        self.slots.lock().len()
    }

    /// Last id handed out, 0 when none have been allocated yet
    pub fn last_issued(&self) -> CallId {
        self.counter.load(Ordering::SeqCst)
    }
}

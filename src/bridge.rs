//! # Action Bridge
//!
//! Synchronous invocation of actions handled by the external consumer.
//!
//! ## Overview
//!
//! The caller thread hands an action name and arguments to the bridge, which
//! fails fast when no handler is registered, otherwise allocates a call id,
//! publishes a `callAction` event, and blocks until the consumer delivers
//! the correlated reply through [`ActionBridge::deliver_reply`].
//!
//! Registration is the consumer's promise that every dispatched action will
//! eventually be answered, which is why the wait is unbounded by default;
//! a finite deadline can be imposed through [`BridgeConfig`].

use crate::config::BridgeConfig;
use crate::constants::events;
use crate::correlation::{CallId, CorrelationRegistry, WaitOutcome};
use crate::dispatch::EventSink;
use crate::error::{BridgeError, Result};
use dashmap::DashSet;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bridge instance for blocking action calls into the external consumer
pub struct ActionBridge {
    /// Action names the consumer has attached a handler for
    registered_actions: DashSet<String>,
    registry: CorrelationRegistry,
    sink: Arc<dyn EventSink>,
    config: BridgeConfig,
}

impl ActionBridge {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(sink, BridgeConfig::default())
    }

    pub fn with_config(sink: Arc<dyn EventSink>, config: BridgeConfig) -> Self {
        info!(
            action_deadline = ?config.action_deadline,
            "🌉 ActionBridge: created"
        );
        Self {
            registered_actions: DashSet::new(),
            registry: CorrelationRegistry::new(),
            sink,
            config,
        }
    }

    /// Mark an action name as having a live handler on the consumer side.
    /// Idempotent.
    pub fn register_handler(&self, name: impl Into<String>) {
        let name = name.into();
        if self.registered_actions.insert(name.clone()) {
            debug!(action = %name, "handler registered");
        }
    }

    /// Whether an action currently has a registered handler
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered_actions.contains(name)
    }

    /// Invoke `action` on the external consumer and block until its reply
    /// arrives.
    ///
    /// Short-circuits with [`BridgeError::HandlerNotRegistered`] before any
    /// call id is allocated when the action has no handler. With a
    /// configured deadline, returns [`BridgeError::ReplyTimeout`] once it
    /// elapses without a reply.
    pub fn invoke_action(&self, action: &str, args: Value) -> Result<Value> {
        if !self.registered_actions.contains(action) {
            debug!(action = %action, "rejecting call for unregistered action");
            return Err(BridgeError::HandlerNotRegistered {
                action: action.to_string(),
            });
        }

        let id = self.registry.allocate_id();
        self.registry.reserve(id);

        debug!(call_id = id, action = %action, "dispatching action call");
        self.sink.emit(
            events::CALL_ACTION,
            json!({ "id": id, "action": action, "args": args }),
        );

        match self.registry.wait(id, self.config.action_deadline) {
            WaitOutcome::Replied(reply) => {
                debug!(call_id = id, action = %action, "action call replied");
                Ok(reply)
            }
            WaitOutcome::TimedOut(elapsed) => {
                warn!(
                    call_id = id,
                    action = %action,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "action call timed out"
                );
                Err(BridgeError::ReplyTimeout {
                    call_id: id,
                    elapsed,
                })
            }
        }
    }

    /// Reply sink for the external consumer. Unknown, late, or duplicate
    /// ids are dropped silently; callers must tolerate duplicate wakeups.
    pub fn deliver_reply(&self, id: CallId, reply: Value) {
        self.registry.fulfill(id, reply);
    }

    /// Number of calls currently blocked on a reply
    pub fn outstanding(&self) -> usize {
        self.registry.outstanding()
    }

    /// Last call id handed out, 0 when no call has been dispatched
    pub fn last_issued(&self) -> CallId {
        self.registry.last_issued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::NullSink;

    #[test]
    fn registration_is_idempotent() {
        let bridge = ActionBridge::new(Arc::new(NullSink));
        bridge.register_handler("search");
        bridge.register_handler("search");
        assert!(bridge.is_registered("search"));
        assert!(!bridge.is_registered("autocomplete"));
    }

    #[test]
    fn unregistered_action_allocates_no_id() {
        let bridge = ActionBridge::new(Arc::new(NullSink));
        let err = bridge.invoke_action("missing", json!({})).unwrap_err();
        assert!(matches!(err, BridgeError::HandlerNotRegistered { .. }));
        assert_eq!(bridge.last_issued(), 0);
        assert_eq!(bridge.outstanding(), 0);
    }
}

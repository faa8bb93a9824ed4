//! # Request Gate
//!
//! Blocking web-request evaluation: a caller thread hands a request
//! descriptor to the gate and blocks until the external consumer delivers a
//! verdict, with two escape hatches the action bridge does not have.
//!
//! - **Fail-open readiness gate**: until the consumer signals readiness,
//!   every request passes immediately without being dispatched at all. A
//!   request must never hang behind a consumer that has not attached yet.
//! - **Finite deadline**: a consumer that never replies costs at most the
//!   configured deadline, surfaced as a timeout rather than an indefinite
//!   stall.
//!
//! An empty reply object means "do not block this request"; any non-empty
//! reply is treated as a blocking verdict.

use crate::config::BridgeConfig;
use crate::constants::{events, UNKNOWN_FRAME_ID};
use crate::correlation::{CallId, CorrelationRegistry, WaitOutcome};
use crate::dispatch::EventSink;
use crate::error::{BridgeError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the consumer decided about a request
#[derive(Debug, Clone, PartialEq)]
pub enum BlockDecision {
    /// Let the request through: consumer not ready, or it replied with an
    /// empty verdict
    Pass,
    /// Non-empty verdict from the consumer; the request should be blocked
    /// or modified according to its contents
    Verdict(Value),
}

impl BlockDecision {
    /// True iff the consumer returned a non-empty verdict
    pub fn should_block(&self) -> bool {
        matches!(self, BlockDecision::Verdict(_))
    }
}

/// Typed request descriptor dispatched to the consumer.
///
/// Field names on the wire follow the consumer-side contract
/// (`tabId`, `originUrl`, `requestHeaders`, ...). The call id is assigned by
/// the gate at dispatch; any id set by the descriptor source is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    #[serde(default)]
    pub id: CallId,
    pub url: String,
    pub method: String,
    pub tab_id: i64,
    pub frame_id: i64,
    pub parent_frame_id: i64,
    pub is_private: bool,
    pub origin_url: Option<String>,
    /// Content-policy classification code, opaque to the gate
    #[serde(rename = "type")]
    pub resource_type: Option<i64>,
    pub source: Option<String>,
    pub request_headers: HashMap<String, String>,
}

impl RequestDescriptor {
    /// Descriptor with unresolved tab/frame ids and no headers
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: 0,
            url: url.into(),
            method: method.into(),
            tab_id: UNKNOWN_FRAME_ID,
            frame_id: UNKNOWN_FRAME_ID,
            parent_frame_id: UNKNOWN_FRAME_ID,
            is_private: false,
            origin_url: None,
            resource_type: None,
            source: None,
            request_headers: HashMap::new(),
        }
    }
}

/// Gate instance for blocking request-evaluation calls
pub struct RequestGate {
    registry: CorrelationRegistry,
    sink: Arc<dyn EventSink>,
    /// Consumer readiness; while false the gate fails open
    ready: AtomicBool,
    config: BridgeConfig,
}

impl RequestGate {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(sink, BridgeConfig::default())
    }

    pub fn with_config(sink: Arc<dyn EventSink>, config: BridgeConfig) -> Self {
        info!(
            request_deadline_ms = config.request_deadline.as_millis() as u64,
            "🌉 RequestGate: created"
        );
        Self {
            registry: CorrelationRegistry::new(),
            sink,
            ready: AtomicBool::new(false),
            config,
        }
    }

    /// Readiness signal from the consumer: from now on requests are
    /// dispatched and awaited instead of passing unexamined.
    pub fn on_ready(&self) {
        self.ready.store(true, Ordering::Release);
        info!("request consumer ready, gating enabled");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Dispatch `descriptor` to the consumer and block until it delivers a
    /// verdict or the configured deadline elapses.
    ///
    /// Fails open with [`BlockDecision::Pass`] when the consumer has not
    /// signalled readiness; nothing is dispatched in that case.
    pub fn evaluate_request(&self, mut descriptor: RequestDescriptor) -> Result<BlockDecision> {
        if !self.is_ready() {
            debug!(url = %descriptor.url, "consumer not ready, passing request");
            return Ok(BlockDecision::Pass);
        }

        let id = self.registry.allocate_id();
        descriptor.id = id;
        let body = serde_json::to_value(&descriptor).map_err(|e| BridgeError::Serialization {
            message: e.to_string(),
        })?;

        // slot must exist before the event goes out, a fast consumer could
        // reply before this thread reaches wait()
        self.registry.reserve(id);

        let dispatched_at = Utc::now();
        debug!(call_id = id, url = %descriptor.url, method = %descriptor.method, "dispatching request for evaluation");
        self.sink.emit(events::WEB_REQUEST, body);

        match self.registry.wait(id, Some(self.config.request_deadline)) {
            WaitOutcome::Replied(reply) => {
                debug!(
                    call_id = id,
                    waited_ms = (Utc::now() - dispatched_at).num_milliseconds(),
                    "request verdict received"
                );
                if is_empty_reply(&reply) {
                    Ok(BlockDecision::Pass)
                } else {
                    Ok(BlockDecision::Verdict(reply))
                }
            }
            WaitOutcome::TimedOut(elapsed) => {
                warn!(
                    call_id = id,
                    url = %descriptor.url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request evaluation timed out"
                );
                Err(BridgeError::ReplyTimeout {
                    call_id: id,
                    elapsed,
                })
            }
        }
    }

    /// Convenience wrapper: true iff the consumer returned a non-empty
    /// verdict for the request
    pub fn should_block_request(&self, descriptor: RequestDescriptor) -> Result<bool> {
        Ok(self.evaluate_request(descriptor)?.should_block())
    }

    /// Reply sink for the external consumer. Unknown, late, or duplicate
    /// ids are dropped silently.
    pub fn deliver_reply(&self, id: CallId, reply: Value) {
        self.registry.fulfill(id, reply);
    }

    /// Number of requests currently blocked on a verdict
    pub fn outstanding(&self) -> usize {
        self.registry.outstanding()
    }
}

/// The consumer signals "no verdict" with null or an empty object
fn is_empty_reply(reply: &Value) -> bool {
    match reply {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

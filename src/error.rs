//! # Bridge Error Types
//!
//! Structured error handling for the bridge core using thiserror
//! instead of `Box<dyn Error>` patterns. Every error condition is resolved
//! locally into a typed value; no panic crosses the bridge boundary.

use crate::correlation::CallId;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The action name has no registered handler on the consumer side.
    /// Raised synchronously, before any call id is allocated.
    #[error("function not registered: {action}")]
    HandlerNotRegistered { action: String },

    /// No reply arrived for the call within the configured deadline.
    #[error("no reply for call {call_id} after {elapsed:?}")]
    ReplyTimeout { call_id: CallId, elapsed: Duration },

    /// Payload could not be serialized for dispatch.
    #[error("payload serialization error: {message}")]
    Serialization { message: String },

    /// Invalid configuration value.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl BridgeError {
    /// Render the error as a reply-shaped structured value for callers on
    /// the far side of an FFI boundary that expect a dictionary, never an
    /// exception.
    pub fn as_reply(&self) -> Value {
        match self {
            BridgeError::HandlerNotRegistered { .. } => {
                json!({ "error": "function not registered" })
            }
            BridgeError::ReplyTimeout { call_id, .. } => {
                json!({ "error": "timeout", "id": call_id })
            }
            other => json!({ "error": other.to_string() }),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_registered_reply_shape() {
        let err = BridgeError::HandlerNotRegistered {
            action: "getLogoDetails".to_string(),
        };
        assert_eq!(err.as_reply(), json!({ "error": "function not registered" }));
    }

    #[test]
    fn timeout_reply_carries_call_id() {
        let err = BridgeError::ReplyTimeout {
            call_id: 7,
            elapsed: Duration::from_millis(250),
        };
        let reply = err.as_reply();
        assert_eq!(reply["error"], "timeout");
        assert_eq!(reply["id"], 7);
    }
}

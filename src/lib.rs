#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Bridge Core
//!
//! Rust core for synchronous calls from native threads into an external,
//! asynchronously scheduled consumer (typically an embedded script runtime).
//!
//! ## Overview
//!
//! A caller thread publishes an event carrying a freshly allocated call id,
//! then blocks on a per-id reply slot. The consumer processes the event on
//! its own schedule and feeds the reply back through a reply sink, waking
//! exactly the one waiting thread. Two instantiations of that pattern are
//! provided:
//!
//! - [`ActionBridge`] - generic action invocation. Fails fast for action
//!   names without a registered handler; waits without limit by default
//!   because registration is a contract that a reply will come.
//! - [`RequestGate`] - web-request blocking decisions. Fails open while the
//!   consumer has not signalled readiness, and every wait carries a finite
//!   deadline.
//!
//! ## Module Organization
//!
//! - [`bridge`] - Blocking action invocation with handler registration
//! - [`request`] - Request evaluation gate with readiness and deadlines
//! - [`correlation`] - Call-id allocation and per-id reply slots
//! - [`dispatch`] - Fire-and-forget event publication to the consumer
//! - [`tabs`] - Tab/window activity registry
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_core::{ActionBridge, EventPublisher};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let publisher = EventPublisher::default();
//! let bridge = Arc::new(ActionBridge::new(Arc::new(publisher.clone())));
//! let mut events = publisher.subscribe();
//!
//! bridge.register_handler("echo");
//!
//! // consumer side: answer each dispatched call by id
//! let replier = Arc::clone(&bridge);
//! std::thread::spawn(move || {
//!     let event = events.blocking_recv().unwrap();
//!     let id = event.body["id"].as_u64().unwrap();
//!     replier.deliver_reply(id, json!({ "echoed": event.body["args"] }));
//! });
//!
//! let reply = bridge.invoke_action("echo", json!({ "x": 1 })).unwrap();
//! assert_eq!(reply["echoed"]["x"], 1);
//! ```

pub mod bridge;
pub mod config;
pub mod constants;
pub mod correlation;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod request;
pub mod tabs;

pub use bridge::ActionBridge;
pub use config::BridgeConfig;
pub use correlation::{CallId, CorrelationRegistry, WaitOutcome};
pub use dispatch::{EventPublisher, EventSink, NullSink, PublishedEvent};
pub use error::{BridgeError, Result};
pub use request::{BlockDecision, RequestDescriptor, RequestGate};
pub use tabs::TabRegistry;

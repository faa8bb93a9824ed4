//! System constants shared across the bridge core.
//!
//! Event names mirror what the consumer-side runtime listens for; defaults
//! feed [`crate::config::BridgeConfig`].

/// Event names published on the dispatch channel
pub mod events {
    /// Generic action invocation, body `{id, action, args}`
    pub const CALL_ACTION: &str = "callAction";

    /// Web-request blocking decision, body is the request descriptor
    pub const WEB_REQUEST: &str = "webRequest";
}

/// Default timing and capacity values
pub mod defaults {
    /// Maximum total wait for a request-blocking decision
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

    /// Dispatch channel capacity before the oldest event is dropped
    pub const CHANNEL_CAPACITY: usize = 1000;
}

/// Sentinel for tab/frame identifiers the descriptor source could not resolve
pub const UNKNOWN_FRAME_ID: i64 = -1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        assert_eq!(events::CALL_ACTION, "callAction");
        assert_eq!(events::WEB_REQUEST, "webRequest");
    }

    #[test]
    fn default_values() {
        assert_eq!(defaults::REQUEST_TIMEOUT_MS, 30_000);
        assert_eq!(defaults::CHANNEL_CAPACITY, 1000);
        assert_eq!(UNKNOWN_FRAME_ID, -1);
    }
}

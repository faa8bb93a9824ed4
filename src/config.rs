use crate::constants::defaults;
use crate::error::{BridgeError, Result};
use std::time::Duration;

/// Runtime configuration for a bridge instance.
///
/// The reference behavior waited forever in both variants; here every
/// blocking wait can carry a finite deadline, and the request-blocking
/// variant always does.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Deadline for `invoke_action` waits. `None` means wait without limit,
    /// relying on the registration contract that a handler always replies.
    pub action_deadline: Option<Duration>,
    /// Deadline for `evaluate_request` waits. Always finite: a consumer that
    /// never replies must not stall the request thread indefinitely.
    pub request_deadline: Duration,
    /// Capacity of the broadcast dispatch channel.
    pub channel_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            action_deadline: None,
            request_deadline: Duration::from_millis(defaults::REQUEST_TIMEOUT_MS),
            channel_capacity: defaults::CHANNEL_CAPACITY,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(action_ms) = std::env::var("BRIDGE_ACTION_TIMEOUT_MS") {
            let ms: u64 = action_ms.parse().map_err(|e| BridgeError::Configuration {
                message: format!("invalid BRIDGE_ACTION_TIMEOUT_MS: {e}"),
            })?;
            // zero keeps the unbounded contract
            config.action_deadline = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Ok(request_ms) = std::env::var("BRIDGE_REQUEST_TIMEOUT_MS") {
            let ms: u64 = request_ms.parse().map_err(|e| BridgeError::Configuration {
                message: format!("invalid BRIDGE_REQUEST_TIMEOUT_MS: {e}"),
            })?;
            if ms == 0 {
                return Err(BridgeError::Configuration {
                    message: "BRIDGE_REQUEST_TIMEOUT_MS must be positive".to_string(),
                });
            }
            config.request_deadline = Duration::from_millis(ms);
        }

        if let Ok(capacity) = std::env::var("BRIDGE_CHANNEL_CAPACITY") {
            config.channel_capacity = capacity.parse().map_err(|e| BridgeError::Configuration {
                message: format!("invalid BRIDGE_CHANNEL_CAPACITY: {e}"),
            })?;
        }

        Ok(config)
    }
}

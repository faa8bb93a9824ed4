//! Property test: no matter what order replies arrive in, every call
//! consumes exactly the reply delivered for its own id.

use bridge_core::{CorrelationRegistry, WaitOutcome};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn shuffled_reply_order_always_correlates(
        order in (1usize..16).prop_flat_map(|n| {
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle()
        })
    ) {
        let registry = CorrelationRegistry::new();

        let ids: Vec<_> = (0..order.len())
            .map(|_| {
                let id = registry.allocate_id();
                registry.reserve(id);
                id
            })
            .collect();

        // deliver out of issuance order
        for &idx in &order {
            let fulfilled = registry.fulfill(ids[idx], json!({ "slot": idx }));
            prop_assert!(fulfilled);
        }

        for (idx, &id) in ids.iter().enumerate() {
            prop_assert_eq!(
                registry.wait(id, None),
                WaitOutcome::Replied(json!({ "slot": idx }))
            );
        }
        prop_assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn ids_never_repeat(count in 1u64..512) {
        let registry = CorrelationRegistry::new();
        let mut previous = 0;
        for _ in 0..count {
            let id = registry.allocate_id();
            prop_assert!(id > previous);
            previous = id;
        }
    }
}

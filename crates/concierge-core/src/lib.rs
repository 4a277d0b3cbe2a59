// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge restaurant-suggestion service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Concierge workspace. All component
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ConciergeError;
pub use types::{AdapterType, HealthStatus, MessageId, SessionId, UserId};

// Re-export all adapter traits at crate root.
pub use traits::{
    ChannelAdapter, ComponentAdapter, Mailer, PreferenceStore, RequestQueue, RestaurantSearch,
    StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concierge_error_has_all_variants() {
        // Verify all 8 error variants exist and can be constructed.
        let _config = ConciergeError::Config("test".into());
        let _storage = ConciergeError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = ConciergeError::Channel {
            message: "test".into(),
            source: None,
        };
        let _mailer = ConciergeError::Mailer {
            message: "test".into(),
            source: None,
        };
        let _not_found = ConciergeError::AdapterNotFound {
            adapter_type: "Channel".into(),
            name: "test".into(),
        };
        let _health = ConciergeError::HealthCheckFailed {
            name: "test".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _timeout = ConciergeError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = ConciergeError::Internal("test".into());
    }

    #[test]
    fn adapter_type_has_five_variants() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Channel,
            AdapterType::Storage,
            AdapterType::Queue,
            AdapterType::Search,
            AdapterType::Mailer,
        ];

        assert_eq!(variants.len(), 5, "AdapterType must have exactly 5 variants");

        // Verify Display and FromStr round-trip for all variants.
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn adapter_type_serialization() {
        let storage = AdapterType::Storage;
        let json = serde_json::to_string(&storage).expect("should serialize");
        let parsed: AdapterType = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(storage, parsed);
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn session_and_user_ids() {
        let sid = SessionId("session-1".into());
        let uid = UserId("user-1".into());

        // Verify Clone works.
        let sid2 = sid.clone();
        assert_eq!(sid, sid2);

        let uid2 = uid.clone();
        assert_eq!(uid, uid2);
    }

    #[test]
    fn search_request_json_roundtrip() {
        let request = types::SearchRequest {
            location: "manhattan".into(),
            cuisine: "japanese".into(),
            dining_date: "tomorrow".into(),
            dining_time: "7 pm".into(),
            party_size: 4,
            email: "diner@example.com".into(),
            requested_at: "2026-08-01T19:00:00Z".into(),
        };

        let json = serde_json::to_string(&request).expect("should serialize");
        let parsed: types::SearchRequest =
            serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(request, parsed);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // This test verifies that all adapter trait modules compile and are
        // accessible through the public API. If any module is missing or has
        // a compile error, this test won't compile.
        fn _assert_component_adapter<T: ComponentAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_preference_store<T: PreferenceStore>() {}
        fn _assert_request_queue<T: RequestQueue>() {}
        fn _assert_restaurant_search<T: RestaurantSearch>() {}
        fn _assert_mailer<T: Mailer>() {}
    }
}

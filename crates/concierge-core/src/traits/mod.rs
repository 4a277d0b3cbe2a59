// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Concierge component architecture.
//!
//! All adapters extend the [`ComponentAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod mailer;
pub mod preferences;
pub mod queue;
pub mod search;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::ComponentAdapter;
pub use channel::ChannelAdapter;
pub use mailer::Mailer;
pub use preferences::PreferenceStore;
pub use queue::RequestQueue;
pub use search::RestaurantSearch;
pub use storage::StorageAdapter;

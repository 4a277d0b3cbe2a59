// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Concierge integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with message injection and capture
//! - [`MockMailer`] - Mock mailer that captures deliveries and can be made to fail
//! - [`TestHarness`] - Complete conversation stack over a temp SQLite database

pub mod fixtures;
pub mod harness;
pub mod mock_channel;
pub mod mock_mailer;

pub use fixtures::sample_restaurants;
pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_mailer::{MockMailer, SentMail};

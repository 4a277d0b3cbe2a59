// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailer trait for delivering suggestion emails.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;

/// Adapter for outbound email delivery.
#[async_trait]
pub trait Mailer: ComponentAdapter {
    /// Delivers a plain-text email to a single recipient.
    ///
    /// Returns only once the transport has accepted the message; callers
    /// rely on this to decide whether a queued request is complete.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ConciergeError>;
}

// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock mailer for deterministic testing.
//!
//! `MockMailer` implements `Mailer`, capturing every delivery for
//! assertion. Failure injection lets worker tests exercise the retry
//! path without a real transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use concierge_core::types::{AdapterType, HealthStatus};
use concierge_core::{ComponentAdapter, ConciergeError, Mailer};

/// One captured email delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A mock mailer for testing.
///
/// Clones share the same capture buffer and failure flag.
#[derive(Clone)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    failing: Arc<AtomicBool>,
}

impl MockMailer {
    /// Create a new mock mailer that accepts every delivery.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent `send()` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all captured deliveries.
    pub async fn sent_mail(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// Get the count of captured deliveries.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComponentAdapter for MockMailer {
    fn name(&self) -> &str {
        "mock-mailer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mailer
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConciergeError> {
        Ok(())
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ConciergeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConciergeError::Mailer {
                message: "mock mailer configured to fail".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_captures_deliveries() {
        let mailer = MockMailer::new();
        mailer
            .send("a@b.com", "Subject", "Body text")
            .await
            .unwrap();

        let sent = mailer.sent_mail().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Subject");
        assert_eq!(sent[0].body, "Body text");
    }

    #[tokio::test]
    async fn failing_mailer_rejects_without_capturing() {
        let mailer = MockMailer::new();
        mailer.set_failing(true);

        let err = mailer.send("a@b.com", "s", "b").await.unwrap_err();
        assert!(matches!(err, ConciergeError::Mailer { .. }));
        assert_eq!(mailer.sent_count().await, 0);

        // Recovery is observable on the same instance.
        mailer.set_failing(false);
        mailer.send("a@b.com", "s", "b").await.unwrap();
        assert_eq!(mailer.sent_count().await, 1);
    }

    #[tokio::test]
    async fn clones_share_the_capture_buffer() {
        let mailer = MockMailer::new();
        let clone = mailer.clone();
        clone.send("a@b.com", "s", "b").await.unwrap();
        assert_eq!(mailer.sent_count().await, 1);
    }
}

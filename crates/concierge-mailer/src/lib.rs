// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP delivery for restaurant suggestion emails.
//!
//! [`SmtpMailer`] wraps a [`lettre`] async transport behind the core
//! [`Mailer`] trait. Connections use STARTTLS against the configured
//! relay, with optional credentials for relays that require
//! authentication. Suggestions are plain text, so messages carry a
//! single `text/plain` body.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use concierge_config::model::SmtpConfig;
use concierge_core::types::{AdapterType, HealthStatus};
use concierge_core::{ComponentAdapter, ConciergeError, Mailer};

/// Mailer backed by an SMTP relay.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a mailer from the SMTP configuration.
    ///
    /// Fails when the relay hostname or the configured from-address is
    /// unusable, so a misconfiguration surfaces at startup instead of on
    /// the first delivery.
    pub fn new(config: &SmtpConfig) -> Result<Self, ConciergeError> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| ConciergeError::Mailer {
                message: format!("invalid from address {:?}", config.from_address),
                source: Some(Box::new(e)),
            })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.relay)
            .map_err(|e| ConciergeError::Mailer {
                message: format!("invalid SMTP relay {:?}", config.relay),
                source: Some(Box::new(e)),
            })?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, ConciergeError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| ConciergeError::Mailer {
                message: format!("invalid recipient address {to:?}"),
                source: Some(Box::new(e)),
            })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ConciergeError::Mailer {
                message: "failed to build email".to_string(),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl ComponentAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp-mailer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mailer
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Unhealthy(
                "SMTP relay refused the connection".to_string(),
            )),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ConciergeError> {
        // Pooled connections close on drop.
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ConciergeError> {
        let message = self.build_message(to, subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ConciergeError::Mailer {
                message: format!("delivery to {to} failed"),
                source: Some(Box::new(e)),
            })?;
        debug!(to = to, subject = subject, "email accepted by relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_mailer() {
        assert!(SmtpMailer::new(&SmtpConfig::default()).is_ok());
    }

    #[test]
    fn credentials_are_accepted() {
        let config = SmtpConfig {
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
            ..SmtpConfig::default()
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }

    #[test]
    fn bad_from_address_fails_at_construction() {
        let config = SmtpConfig {
            from_address: "not an address".to_string(),
            ..SmtpConfig::default()
        };
        let err = SmtpMailer::new(&config).unwrap_err();
        assert!(matches!(err, ConciergeError::Mailer { .. }));
    }

    #[test]
    fn message_building_validates_the_recipient() {
        let mailer = SmtpMailer::new(&SmtpConfig::default()).unwrap();
        assert!(mailer.build_message("diner@example.com", "s", "b").is_ok());
        assert!(mailer.build_message("not an address", "s", "b").is_err());
    }
}

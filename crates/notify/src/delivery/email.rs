//! Notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send the
//! bilingual HTML messages from [`crate::messages`]. Configuration is loaded
//! from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be constructed.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::messages::{render_bilingual_html, MessageData, MessageKey};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or the sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (implicit TLS).
const DEFAULT_SMTP_PORT: u16 = 465;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@docent.local";

/// Default organization name used in message sign-offs.
pub const DEFAULT_ORGANIZATION: &str = "Overbeck Museum";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 465).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Name filled into the `{organization}` placeholder.
    pub organization: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable            | Required | Default                |
    /// |---------------------|----------|------------------------|
    /// | `SMTP_HOST`         | yes      |                        |
    /// | `SMTP_PORT`         | no       | `465`                  |
    /// | `SMTP_FROM`         | no       | `noreply@docent.local` |
    /// | `SMTP_USER`         | no       |                        |
    /// | `SMTP_PASSWORD`     | no       |                        |
    /// | `ORGANIZATION_NAME` | no       | `Overbeck Museum`      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            organization: std::env::var("ORGANIZATION_NAME")
                .unwrap_or_else(|_| DEFAULT_ORGANIZATION.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Build the message for `key` addressed to every recipient.
    ///
    /// Returns `Ok(None)` when there are no recipients.
    pub fn build_message(
        &self,
        recipients: &[String],
        key: MessageKey,
        data: &MessageData,
    ) -> Result<Option<Message>, EmailError> {
        if recipients.is_empty() {
            return Ok(None);
        }

        let mut builder = Message::builder()
            .from(self.config.from_address.parse::<Mailbox>()?)
            .subject(key.subject())
            .header(ContentType::TEXT_HTML);
        for recipient in recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let body = render_bilingual_html(key, &self.config.organization, data);
        builder
            .body(body)
            .map(Some)
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    /// Send the message for `key` to `recipients`. An empty recipient list is
    /// a no-op.
    pub async fn send(
        &self,
        recipients: &[String],
        key: MessageKey,
        data: &MessageData,
    ) -> Result<(), EmailError> {
        let Some(email) = self.build_message(recipients, key, data)? else {
            tracing::debug!(message = %key, "No recipients, skipping notification email");
            return Ok(());
        };

        // Port 465 speaks TLS from the first byte; anything else upgrades.
        let mut transport_builder = if self.config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
        }
        .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            recipients = recipients.len(),
            message = %key,
            "Notification email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

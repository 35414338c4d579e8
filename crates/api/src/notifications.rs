//! Fire-and-forget email notifications.
//!
//! Handlers call these after their database change has committed. Sending
//! happens on a spawned task; failures are logged and never reach the
//! client. When SMTP is not configured the calls are no-ops.

use std::sync::Arc;

use docent_db::repositories::AdminRepo;
use docent_notify::{EmailDelivery, MessageData, MessageKey};

use crate::state::AppState;

/// Send `key` to the given recipients in the background.
pub fn notify(state: &AppState, recipients: Vec<String>, key: MessageKey, data: MessageData) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::debug!(message = %key, "SMTP not configured, skipping notification");
        return;
    };

    tokio::spawn(async move {
        deliver(&mailer, &recipients, key, &data).await;
    });
}

/// Send `key` to a single recipient in the background.
pub fn notify_one(state: &AppState, recipient: &str, key: MessageKey, data: MessageData) {
    notify(state, vec![recipient.to_string()], key, data);
}

/// Send `key` to every active admin in the background.
pub fn notify_admins(state: &AppState, key: MessageKey, data: MessageData) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::debug!(message = %key, "SMTP not configured, skipping admin notification");
        return;
    };
    let pool = state.pool.clone();

    tokio::spawn(async move {
        let recipients = match AdminRepo::list_emails(&pool).await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::error!(error = %e, message = %key, "Failed to load admin recipients");
                return;
            }
        };
        deliver(&mailer, &recipients, key, &data).await;
    });
}

async fn deliver(
    mailer: &Arc<EmailDelivery>,
    recipients: &[String],
    key: MessageKey,
    data: &MessageData,
) {
    if let Err(e) = mailer.send(recipients, key, data).await {
        tracing::error!(
            error = %e,
            message = %key,
            recipients = recipients.len(),
            "Failed to send notification email"
        );
    }
}

//! Outbound notifications for Docent.
//!
//! [`messages`] holds the closed bilingual message bank and renders
//! placeholder-filled HTML bodies; [`delivery::email`] sends them over SMTP.

pub mod delivery;
pub mod messages;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use messages::{Language, MessageData, MessageKey};

//! Outbound HTTP integrations.
//!
//! - [`holidays`] -- public holiday calendar backed by the Nager.Date API.
//! - [`openai`] -- chat-completion client implementing
//!   [`docent_core::recommendation::CompletionModel`].

pub mod holidays;
pub mod openai;

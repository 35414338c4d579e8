//! Domain logic for the Docent volunteer scheduling service.
//!
//! This crate has zero internal dependencies so the API, repository and
//! provider crates can all share it:
//!
//! - [`calendar`] -- qualifying volunteer days, weekday names, slot times.
//! - [`coverage`] -- the forward-walking coverage gap finder.
//! - [`stats`] -- per-volunteer shift history aggregation.
//! - [`recommendation`] -- prompt building, reply parsing and fallback ranking.
//! - [`cache`] / [`rate_limit`] -- in-memory TTL cache and daily request caps.
//! - [`clock`] -- injectable time source.

pub mod cache;
pub mod calendar;
pub mod clock;
pub mod coverage;
pub mod error;
pub mod rate_limit;
pub mod recommendation;
pub mod stats;
pub mod status;
pub mod types;

pub mod admin;
pub mod application;
pub mod auth;
pub mod holiday;
pub mod recommendation;
pub mod slot;
pub mod volunteer;

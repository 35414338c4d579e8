//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the API patches rows, an update DTO with all `Option` fields
//!
//! Entities serialize with camelCase keys and name their primary key after
//! the entity (`slotId`, `volunteerId`, ...).

pub mod admin;
pub mod application;
pub mod slot;
pub mod volunteer;

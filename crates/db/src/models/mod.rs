//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO where the entity is created through the API

pub mod dictionary;
pub mod port;
pub mod task;
pub mod template;

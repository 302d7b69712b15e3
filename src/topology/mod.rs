//! Mesh topology: component handles, tags, the `Level` container and the
//! algorithms that complete, orient and validate its relations.

pub mod complete;
pub mod dynamic_relation;
pub mod index;
pub mod level;
pub mod orient;
pub mod tags;
pub mod validate;

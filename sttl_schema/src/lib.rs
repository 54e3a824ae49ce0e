//! # STTL Schema
//!
//! The code tables behind the STTL encoding. Every entity type, attribute
//! name, and relation name has a short alphabetic code; this crate owns those
//! mappings and the schema they are derived from. It contains no parsing logic.
//!
//! ## Core Components
//!
//! - **code_table**: Bijective label <-> code registries with longest-match lookup
//! - **schema**: TOML schema definitions and table derivation

pub mod code_table;
pub mod error;
pub mod schema;

pub use code_table::*;
pub use error::*;
pub use schema::*;

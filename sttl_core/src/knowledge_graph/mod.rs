//! Knowledge graph module - the decoded form of an STTL document.
//!
//! The graph consists of:
//! - **Entities**: Named records with a type label and attributes, kept in declaration order
//! - **Triples**: Subject/relation/object statements, kept in decode order

mod entity;
mod graph;
mod triple;

pub use entity::*;
pub use graph::*;
pub use triple::*;

//! Error types for table and schema construction.

use thiserror::Error;

use crate::code_table::TableKind;

/// Errors raised while building code tables.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{0} table has no labels")]
    EmptyTable(TableKind),

    #[error("{kind} label '{label}' is declared more than once")]
    DuplicateLabel { kind: TableKind, label: String },

    #[error("{kind} table has {count} labels, at most {max} can be coded")]
    CodeSpaceExhausted {
        kind: TableKind,
        count: usize,
        max: usize,
    },

    #[error("invalid schema definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

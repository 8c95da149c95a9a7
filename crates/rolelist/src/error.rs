//! Error types for the list model.

use rolelist_core::CallError;

use crate::model::ItemData;

/// Result type alias for list model operations.
pub type Result<T> = std::result::Result<T, ListModelError>;

/// Reasons a list model operation was rejected.
///
/// None of these are fatal: a rejected operation leaves the sequence, the
/// role table and the emitted notifications exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum ListModelError {
    /// Row index outside the current sequence.
    #[error("row index {row} is out of range for a list of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    /// Move arguments that do not describe two adjacent blocks in range.
    #[error("invalid indexing for move: from {from}, to {to}, count {count} in a list of {len} rows")]
    InvalidMove {
        from: usize,
        to: usize,
        count: usize,
        len: usize,
    },

    /// Role index outside the current role table.
    #[error("role index {index} is out of range for {count} roles")]
    RoleOutOfRange { index: usize, count: usize },

    /// A role with this name already exists.
    #[error("role {0:?} exists")]
    DuplicateRole(String),

    /// No getter was supplied for the role.
    #[error("invalid getter for role {0:?}")]
    MissingGetter(String),

    /// No role has this name.
    #[error("role name {0:?} not found")]
    UnknownRole(String),

    /// The role has no setter.
    #[error("null setter for role {0:?}, not changing value")]
    ReadOnlyRole(String),

    /// Append or insert without a constructor.
    #[error("no constructor function set, cannot add an item to the list")]
    NoConstructor,

    /// The constructor failed or produced nothing.
    #[error(
        "error constructing list element from {fields:?}: {reason}; did you define all roles the constructor requires?"
    )]
    Construction { fields: Vec<ItemData>, reason: String },

    /// The setter itself failed.
    #[error("setter for role {role:?} failed")]
    SetterFailed {
        role: String,
        #[source]
        source: CallError,
    },
}

/// Errors from loading or saving a [`ListModelConfig`](crate::config::ListModelConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed into a configuration.
    #[error("invalid list model configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize list model configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

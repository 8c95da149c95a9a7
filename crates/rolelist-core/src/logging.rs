//! Logging facilities for rolelist.
//!
//! rolelist uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("rolelist::model=warn,rolelist_core::gc=trace")
//!     .init();
//! ```
//!
//! Rejected operations (out-of-range rows, unknown roles, read-only roles,
//! failed constructors) are reported at `warn` on [`targets::MODEL`].

/// Span names used for tracing structural changes.
///
/// These constants can be used to filter traces for specific operations.
pub mod span_names {
    /// Row insertion bracket.
    pub const INSERT: &str = "rolelist::insert";
    /// Row removal bracket.
    pub const REMOVE: &str = "rolelist::remove";
    /// Row move bracket.
    pub const MOVE: &str = "rolelist::move";
    /// Clear bracket.
    pub const CLEAR: &str = "rolelist::clear";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// List adapter target.
    pub const MODEL: &str = "rolelist::model";
    /// Role table target.
    pub const ROLES: &str = "rolelist::roles";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rolelist_core::signal";
    /// Pin bookkeeping target.
    pub const GC: &str = "rolelist_core::gc";
}

//! Error types for the organism-world crate.

/// Errors that can occur when building or configuring the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A configured value is outside its valid range.
    #[error("invalid world configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the constraint that was violated.
        reason: String,
    },

    /// Enemy combat settings failed validation.
    #[error("invalid enemy combat settings: {source}")]
    EnemyCombat {
        /// The underlying agent error.
        #[from]
        source: organism_agents::AgentError,
    },
}

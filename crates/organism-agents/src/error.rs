//! Error types for the organism-agents crate.
//!
//! Status and combat mutations never fail -- they clamp. The only fallible
//! operations are configuration checks performed once at startup.

/// Errors that can occur when preparing agent mechanics.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A configured rate or distance is outside its valid range.
    #[error("invalid agent configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the constraint that was violated.
        reason: String,
    },
}

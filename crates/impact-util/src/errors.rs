use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for impact front ends.
#[derive(Debug, Error, Diagnostic)]
pub enum ImpactError {
    /// Dependency resolution failed (conflicts, starvation, unknown libraries).
    #[error("Dependency resolution failed: {message}")]
    #[diagnostic(help("Run with --verbose to trace every candidate the resolver tried"))]
    Resolution { message: String },

    /// A command-line fact could not be understood.
    #[error("Invalid argument `{value}`: {message}")]
    #[diagnostic(help("Libraries are written as name@version, edges as name@version=dep@version"))]
    InvalidArgument { value: String, message: String },

    /// Resolver configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type ImpactResult<T> = miette::Result<T>;

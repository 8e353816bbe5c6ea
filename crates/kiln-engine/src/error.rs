//! Error types for naming and lowering
//!
//! These describe engine-level failures. Problems in the user's program are
//! never errors; they are reported through `Diagnostics` and resolution
//! carries on with a fallback semantics.

use crate::config::ConfigError;
use thiserror::Error;

/// Failures of the naming engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NamingError {
    /// A type was queried that `prepare` never resolved
    #[error("Type '{0}' has no script semantics")]
    UnresolvedType(String),

    /// A member was queried that `prepare` never resolved
    #[error("Member '{0}' has no script semantics")]
    UnresolvedMember(String),

    /// A type parameter was queried before its owner was resolved
    #[error("Type parameter '{0}' has no script name")]
    UnresolvedTypeParameter(String),

    /// An override whose base member could not be resolved
    #[error("'{member}' overrides '{base}', which has no script semantics")]
    MissingBaseSemantics {
        /// Overriding member
        member: String,
        /// Overridden member
        base: String,
    },
}

/// Failures of the lowering pass
#[derive(Debug, Error)]
pub enum LowerError {
    /// Semantics lookup failed
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// The method-body compiler rejected a body
    #[error("Body compiler error: {0}")]
    Body(String),

    /// A declaration did not resolve to what its syntax promised
    #[error("Declaration '{name}' does not resolve to a {expected}")]
    UnexpectedResolution {
        /// Declaration name as written
        name: String,
        /// Expected declaration kind
        expected: &'static str,
    },

    /// A non-constant field on an enum type
    #[error("Enum field '{0}' is not a constant")]
    NonConstantEnumField(String),
}

/// Structural problems in a declaration set that did not come from
/// `TypeSystemBuilder`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeSystemError {
    /// An id that points past the end of its arena
    #[error("{owner} refers to {kind} #{index}, which does not exist")]
    DanglingId {
        /// The declaration holding the id
        owner: String,
        /// Arena the id indexes
        kind: &'static str,
        index: u32,
    },

    /// A type that is (transitively) nested in itself
    #[error("Type '{name}' (#{index}) is nested in itself")]
    DeclaringTypeCycle { name: String, index: u32 },

    /// A method that (transitively) overrides itself
    #[error("Method '{name}' (#{index}) overrides itself")]
    OverrideCycle { name: String, index: u32 },
}

/// Failures of `Compiler::compile`
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid declarations: {0}")]
    Declarations(#[from] TypeSystemError),
}

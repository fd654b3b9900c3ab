//! Error types for the Idiolect system.
//!
//! Uses `thiserror` for ergonomic error definition. Source-processing errors
//! (lexing and parsing) carry 1-based line/column positions; configuration
//! errors (unresolved parents, cyclic chains) are fail-fast and never
//! recovered by the engine.

use thiserror::Error;

/// Result alias used throughout the Idiolect crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Idiolect operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a lex error at a source position.
    #[must_use]
    pub fn lex(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(ErrorKind::Lex {
            message: message.into(),
            line,
            column,
        })
    }

    /// Creates a parse error at a source position.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            line,
            column,
        })
    }

    /// Creates a namespace-path validation error.
    #[must_use]
    pub fn path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Path {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unresolved-parent configuration error.
    #[must_use]
    pub fn unknown_parent(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownParent {
            child: child.into(),
            parent: parent.into(),
        })
    }

    /// Creates a cyclic-chain configuration error.
    #[must_use]
    pub fn cyclic_chain(receiver: impl Into<String>) -> Self {
        Self::new(ErrorKind::CyclicChain(receiver.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a lex or parse error, i.e. one that is local
    /// to source processing and safe to drop at statement granularity.
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Lex { .. } | ErrorKind::Parse { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Unrecognized character or unterminated span during lexing.
    #[error("lex error at {line}:{column}: {message}")]
    Lex {
        /// Description of the lex error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// Expected-token mismatch during parsing.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// Namespace path does not match the receiver's ancestor chain.
    #[error("invalid path {path}: {reason}")]
    Path {
        /// The offending path, `::`-joined.
        path: String,
        /// Why the path failed validation.
        reason: String,
    },

    /// A parent was referenced by name but never defined.
    #[error("receiver {child} names undefined parent {parent}")]
    UnknownParent {
        /// The receiver carrying the reference.
        child: String,
        /// The parent name that never resolved.
        parent: String,
    },

    /// A cycle was detected in the parent chain.
    #[error("cyclic parent chain through {0}")]
    CyclicChain(String),

    /// Filesystem failure while reading or writing vocabulary state.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

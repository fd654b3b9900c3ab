//! Statement nodes produced by the parser.
//!
//! The statement set is a closed sum type matched exhaustively by the
//! dispatcher.

use std::fmt;

use crate::span::Span;

/// A namespace path naming a receiver: one or more `::`-joined segments,
/// leaf last (`Root::Parent::Leaf`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiverPath {
    /// Path segments, outermost ancestor first.
    pub segments: Vec<String>,
}

impl ReceiverPath {
    /// Creates a single-segment path.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Returns the leaf receiver name.
    ///
    /// # Panics
    /// Never panics: paths always hold at least one segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().expect("path has at least one segment")
    }
}

impl fmt::Display for ReceiverPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

/// A parsed statement with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// What the statement does.
    pub kind: StatementKind,
    /// Source location of the statement's first token.
    pub span: Span,
}

/// The closed set of statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// `R. # → [#a, #b]` — replaces/seeds the receiver's local vocabulary.
    VocabularyDefinition {
        /// The receiver being defined.
        receiver: ReceiverPath,
        /// The new local vocabulary, in written order.
        symbols: Vec<String>,
    },
    /// `R. #` or bare `R` — lists the receiver's native vocabulary.
    VocabularyQuery {
        /// The receiver being queried.
        receiver: ReceiverPath,
    },
    /// `R. # #` — native plus full inherited listing, grouped by defining
    /// ancestor.
    DeepVocabularyQuery {
        /// The receiver being queried.
        receiver: ReceiverPath,
    },
    /// `R. #sym` — resolves one symbol against the receiver's chain.
    ScopedLookup {
        /// The receiver resolving the symbol.
        receiver: ReceiverPath,
        /// The symbol, `#`-prefixed.
        symbol: String,
    },
    /// `R. #sym super` — reports the resolution at every level of the chain.
    SuperLookup {
        /// The receiver resolving the symbol.
        receiver: ReceiverPath,
        /// The symbol, `#`-prefixed.
        symbol: String,
    },
    /// `R kw: value (kw: value)* ['note']` — keyword message.
    KeywordMessage {
        /// The receiver addressed.
        receiver: ReceiverPath,
        /// Keyword/value pairs in written order.
        pairs: Vec<(String, Argument)>,
        /// Optional trailing human annotation.
        annotation: Option<String>,
    },
    /// `R selector [super]` — unary message, no arguments.
    UnaryMessage {
        /// The receiver addressed.
        receiver: ReceiverPath,
        /// The message selector.
        selector: String,
        /// With `super`, dispatch starts one level above the receiver's own
        /// definition.
        is_super: bool,
    },
}

impl StatementKind {
    /// Returns the receiver path this statement addresses.
    #[must_use]
    pub fn receiver(&self) -> &ReceiverPath {
        match self {
            Self::VocabularyDefinition { receiver, .. }
            | Self::VocabularyQuery { receiver }
            | Self::DeepVocabularyQuery { receiver }
            | Self::ScopedLookup { receiver, .. }
            | Self::SuperLookup { receiver, .. }
            | Self::KeywordMessage { receiver, .. }
            | Self::UnaryMessage { receiver, .. } => receiver,
        }
    }
}

/// An argument value in a keyword message.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    /// A `#`-prefixed symbol.
    Symbol(String),
    /// A receiver, possibly path-qualified.
    Receiver(ReceiverPath),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A single-quoted string.
    Str(String),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(s) | Self::Str(s) => write!(f, "{s}"),
            Self::Receiver(path) => write!(f, "{path}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

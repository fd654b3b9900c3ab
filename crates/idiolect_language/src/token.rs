//! Token types for the Idiolect language.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types for the Idiolect language.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Receiver name: a capitalized bare word, or `@name` normalized to
    /// capitalized form, or bare `@` normalized to the root receiver.
    Receiver(String),
    /// Symbol like `#light`, or the bare primitive symbol `#`.
    /// Carries the `#` prefix.
    Symbol(String),
    /// Lowercase bare word (message selector or keyword).
    Identifier(String),
    /// Reserved word `super` (never an identifier or receiver).
    Super,
    /// Single-quoted string, used as a human annotation.
    Str(String),
    /// Integer literal like `42`.
    Int(i64),
    /// Float literal like `3.14`.
    Float(f64),

    // Structural punctuation
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `→` or `->`
    Arrow,

    // Markdown structure, recognized only at column 1
    /// `# text` at the start of a line.
    Heading1(String),
    /// `## text` at the start of a line.
    Heading2(String),
    /// `- text` at the start of a line.
    ListItem(String),

    /// End of input.
    Eof,
    /// Lexer error.
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Receiver(_) => "receiver",
            Self::Symbol(_) => "symbol",
            Self::Identifier(_) => "identifier",
            Self::Super => "'super'",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::DoubleColon => "'::'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Arrow => "'→'",
            Self::Heading1(_) => "heading",
            Self::Heading2(_) => "subheading",
            Self::ListItem(_) => "list item",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }

    /// Returns true if this token can begin a statement.
    #[must_use]
    pub const fn starts_statement(&self) -> bool {
        matches!(self, Self::Receiver(_))
    }
}

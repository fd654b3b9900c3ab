//! Lexer and statement parser for the Idiolect dialogue language.
//!
//! This crate provides:
//! - [`Lexer`] - Converts source text into a token stream
//! - [`Parser`] - Consumes tokens into statement nodes
//! - [`Statement`] - The closed set of statement kinds
//!
//! The same tokenizer handles both pure DSL source and vocabulary files
//! with Markdown headings: heading and list-item tokens are recognized
//! only when the cursor sits at column 1, so no mode switch is needed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{Argument, ReceiverPath, Statement, StatementKind};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_lenient, Parser};
pub use span::Span;
pub use token::{Token, TokenKind};

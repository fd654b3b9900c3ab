//! Parser for the Idiolect language.
//!
//! The parser consumes the token stream into statement nodes. Recovery is
//! best-effort at statement granularity: tokens that do not start a
//! statement are skipped, and the lenient entry point drops malformed
//! statements instead of aborting the whole parse.

use idiolect_foundation::{Error, Result};

use crate::ast::{Argument, ReceiverPath, Statement, StatementKind};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for Idiolect source text.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses all statements, failing on the first malformed one.
    ///
    /// # Errors
    /// Returns a lex or parse error carrying the offending position.
    pub fn parse_program(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            self.skip_to_statement();
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Error(message) => {
                    return Err(self.lex_error(message.clone()));
                }
                _ => statements.push(self.parse_statement()?),
            }
        }
        Ok(statements)
    }

    /// Parses all statements, dropping malformed ones and collecting their
    /// errors (REPL-style usage).
    pub fn parse_program_lenient(&mut self) -> (Vec<Statement>, Vec<Error>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        loop {
            self.skip_to_statement();
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Error(message) => {
                    errors.push(self.lex_error(message.clone()));
                    self.advance();
                }
                _ => match self.parse_statement() {
                    Ok(statement) => statements.push(statement),
                    Err(err) => {
                        errors.push(err);
                        self.resynchronize();
                    }
                },
            }
        }
        (statements, errors)
    }

    /// Parses a single statement. The current token must be a receiver.
    ///
    /// # Errors
    /// Returns a parse error if the statement is malformed.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let span = self.current.span;
        let receiver = self.parse_path()?;

        // The dot before the symbol part is conventional but optional.
        if self.current.kind == TokenKind::Dot {
            self.advance();
        }

        let kind = match self.current.kind.clone() {
            TokenKind::Symbol(symbol) => {
                self.advance();
                if symbol == "#" {
                    self.parse_hash_statement(receiver)?
                } else if self.current.kind == TokenKind::Super {
                    self.advance();
                    StatementKind::SuperLookup { receiver, symbol }
                } else {
                    StatementKind::ScopedLookup { receiver, symbol }
                }
            }
            TokenKind::Identifier(selector) => {
                self.advance();
                if self.current.kind == TokenKind::Colon {
                    self.advance();
                    self.parse_keyword_message(receiver, selector)?
                } else {
                    let is_super = self.current.kind == TokenKind::Super;
                    if is_super {
                        self.advance();
                    }
                    StatementKind::UnaryMessage {
                        receiver,
                        selector,
                        is_super,
                    }
                }
            }
            // Bare receiver: vocabulary query.
            _ => StatementKind::VocabularyQuery { receiver },
        };

        Ok(Statement { kind, span })
    }

    /// Parses the statement forms that follow a bare `#`: a vocabulary
    /// definition (`→ [...]`), a double-hash query, or a plain query.
    fn parse_hash_statement(&mut self, receiver: ReceiverPath) -> Result<StatementKind> {
        match &self.current.kind {
            TokenKind::Arrow => {
                self.advance();
                let symbols = self.parse_symbol_list()?;
                Ok(StatementKind::VocabularyDefinition { receiver, symbols })
            }
            TokenKind::Symbol(second) if second == "#" => {
                self.advance();
                Ok(StatementKind::DeepVocabularyQuery { receiver })
            }
            TokenKind::Symbol(_) => Err(self.error("expected '#' after '#'")),
            _ => Ok(StatementKind::VocabularyQuery { receiver }),
        }
    }

    /// Parses a bracketed, comma-separated symbol list. The list may be
    /// empty.
    fn parse_symbol_list(&mut self) -> Result<Vec<String>> {
        self.expect(&TokenKind::LBracket)?;
        let mut symbols = Vec::new();

        if self.current.kind != TokenKind::RBracket {
            symbols.push(self.expect_symbol()?);
            while self.current.kind == TokenKind::Comma {
                self.advance();
                symbols.push(self.expect_symbol()?);
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(symbols)
    }

    /// Parses the remainder of a keyword message after `first:`.
    fn parse_keyword_message(
        &mut self,
        receiver: ReceiverPath,
        first: String,
    ) -> Result<StatementKind> {
        let mut pairs = vec![(first, self.parse_argument()?)];

        while let TokenKind::Identifier(keyword) = self.current.kind.clone() {
            self.advance();
            self.expect(&TokenKind::Colon)?;
            pairs.push((keyword, self.parse_argument()?));
        }

        let annotation = if let TokenKind::Str(text) = self.current.kind.clone() {
            self.advance();
            Some(text)
        } else {
            None
        };

        Ok(StatementKind::KeywordMessage {
            receiver,
            pairs,
            annotation,
        })
    }

    /// Parses a keyword-message argument value.
    fn parse_argument(&mut self) -> Result<Argument> {
        match self.current.kind.clone() {
            TokenKind::Symbol(symbol) => {
                self.advance();
                Ok(Argument::Symbol(symbol))
            }
            TokenKind::Receiver(_) => Ok(Argument::Receiver(self.parse_path()?)),
            TokenKind::Int(n) => {
                self.advance();
                Ok(Argument::Int(n))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Argument::Float(n))
            }
            TokenKind::Str(text) => {
                self.advance();
                Ok(Argument::Str(text))
            }
            _ => Err(self.error(&format!(
                "expected argument value, found {}",
                self.current.kind.name()
            ))),
        }
    }

    /// Parses a receiver path: `Receiver (:: Receiver)*`.
    fn parse_path(&mut self) -> Result<ReceiverPath> {
        let mut segments = vec![self.expect_receiver()?];
        while self.current.kind == TokenKind::DoubleColon {
            self.advance();
            segments.push(self.expect_receiver()?);
        }
        Ok(ReceiverPath { segments })
    }

    /// Expects the current token to be a receiver and returns its name.
    fn expect_receiver(&mut self) -> Result<String> {
        if let TokenKind::Receiver(name) = self.current.kind.clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error(&format!(
                "expected receiver, found {}",
                self.current.kind.name()
            )))
        }
    }

    /// Expects the current token to be a symbol and returns it.
    fn expect_symbol(&mut self) -> Result<String> {
        if let TokenKind::Symbol(symbol) = self.current.kind.clone() {
            self.advance();
            Ok(symbol)
        } else {
            Err(self.error(&format!(
                "expected symbol, found {}",
                self.current.kind.name()
            )))
        }
    }

    /// Skips tokens that cannot start a statement (Markdown structure,
    /// stray values) without consuming error tokens or `Eof`.
    fn skip_to_statement(&mut self) {
        loop {
            match &self.current.kind {
                TokenKind::Eof | TokenKind::Error(_) => break,
                kind if kind.starts_statement() => break,
                _ => self.advance(),
            }
        }
    }

    /// Advances past the current (mid-statement) position to the next
    /// plausible statement start.
    fn resynchronize(&mut self) {
        while !matches!(
            self.current.kind,
            TokenKind::Eof | TokenKind::Receiver(_) | TokenKind::Error(_)
        ) {
            self.advance();
        }
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        if std::mem::discriminant(&self.current.kind) == std::mem::discriminant(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            )))
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a parse error at a specific span.
    #[allow(clippy::unused_self)]
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span.line, span.column)
    }

    /// Creates a lex error from an error token at the current position.
    fn lex_error(&self, message: String) -> Error {
        Error::lex(message, self.current.span.line, self.current.span.column)
    }
}

/// Parses source into statements, failing on the first malformed one.
///
/// # Errors
/// Returns a lex or parse error carrying the offending position.
pub fn parse(source: &str) -> Result<Vec<Statement>> {
    Parser::new(source).parse_program()
}

/// Parses source into statements, dropping malformed ones and collecting
/// their errors.
#[must_use]
pub fn parse_lenient(source: &str) -> (Vec<Statement>, Vec<Error>) {
    Parser::new(source).parse_program_lenient()
}

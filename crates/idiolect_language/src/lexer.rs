//! Lexer for the Idiolect language.
//!
//! The lexer converts source text into a stream of tokens. Markdown
//! structure (`# `, `## `, `- `) is recognized only when the cursor sits at
//! column 1, so the same lexer handles pure DSL source and vocabulary files
//! without a mode switch. Double-quoted spans and `<!-- -->` spans are
//! comments and are consumed silently.

use idiolect_foundation::{name, Error, Result};

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for Idiolect source text.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.position;
            let start_line = self.line;
            let start_column = self.column;

            let Some(c) = self.peek_char() else {
                return Token::new(
                    TokenKind::Eof,
                    Span::new(start, start, start_line, start_column),
                );
            };

            // Comment spans are consumed silently, then lexing resumes.
            if c == '"' {
                match self.skip_quoted_comment() {
                    Ok(()) => continue,
                    Err(kind) => {
                        return Token::new(
                            kind,
                            Span::new(start, self.position, start_line, start_column),
                        );
                    }
                }
            }
            if c == '<' && self.rest.starts_with("<!--") {
                match self.skip_html_comment() {
                    Ok(()) => continue,
                    Err(kind) => {
                        return Token::new(
                            kind,
                            Span::new(start, self.position, start_line, start_column),
                        );
                    }
                }
            }

            let kind = self.scan(c, start_column);
            return Token::new(
                kind,
                Span::new(start, self.position, start_line, start_column),
            );
        }
    }

    /// Tokenizes all source and returns a vector of tokens, error tokens
    /// included. The vector always ends with `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Scans a single token starting at character `c`.
    fn scan(&mut self, c: char, start_column: u32) -> TokenKind {
        // Markdown structure is recognized only at column 1.
        if start_column == 1 {
            if c == '#' {
                if self.rest.starts_with("## ") || self.rest.starts_with("##\t") {
                    return self.scan_heading(2);
                }
                if self.rest.starts_with("# ") || self.rest.starts_with("#\t") {
                    return self.scan_heading(1);
                }
            }
            if c == '-' && matches!(self.peek_char_n(1), Some(' ' | '\t')) {
                self.advance(); // consume '-'
                return TokenKind::ListItem(self.take_line());
            }
        }

        match c {
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            ':' => {
                self.advance();
                if self.peek_char() == Some(':') {
                    self.advance();
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }
            '[' => {
                self.advance();
                TokenKind::LBracket
            }
            ']' => {
                self.advance();
                TokenKind::RBracket
            }
            '→' => {
                self.advance();
                TokenKind::Arrow
            }
            '#' => self.scan_symbol(),
            '@' => self.scan_at_receiver(),
            '\'' => self.scan_string(),
            '-' => {
                if self.peek_char_n(1) == Some('>') {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                } else if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.advance();
                    TokenKind::Error(format!("unexpected character: {c}"))
                }
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() => self.scan_word(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skips a double-quoted comment span, which may cross lines.
    fn skip_quoted_comment(&mut self) -> std::result::Result<(), TokenKind> {
        self.advance(); // consume opening '"'
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
                None => return Err(TokenKind::Error("unterminated comment".into())),
            }
        }
    }

    /// Skips an HTML-style `<!-- -->` comment span.
    fn skip_html_comment(&mut self) -> std::result::Result<(), TokenKind> {
        for _ in 0..4 {
            self.advance(); // consume "<!--"
        }
        loop {
            if self.rest.is_empty() {
                return Err(TokenKind::Error("unterminated comment".into()));
            }
            if self.rest.starts_with("-->") {
                for _ in 0..3 {
                    self.advance();
                }
                return Ok(());
            }
            self.advance();
        }
    }

    /// Scans a Markdown heading of the given level, consuming the rest of
    /// the line.
    fn scan_heading(&mut self, level: u8) -> TokenKind {
        for _ in 0..level {
            self.advance(); // consume '#'s
        }
        let text = self.take_line();
        if level == 1 {
            TokenKind::Heading1(text)
        } else {
            TokenKind::Heading2(text)
        }
    }

    /// Consumes up to the end of the current line and returns the trimmed
    /// text. The newline itself is left for `skip_whitespace`.
    fn take_line(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.source[start..self.position].trim().to_string()
    }

    /// Scans a symbol: `#` followed by a name, or the bare primitive `#`.
    fn scan_symbol(&mut self) -> TokenKind {
        self.advance(); // consume '#'
        let name = self.scan_word_text();
        if name.is_empty() {
            TokenKind::Symbol("#".into())
        } else {
            TokenKind::Symbol(format!("#{name}"))
        }
    }

    /// Scans the legacy `@name` receiver form; bare `@` is the root
    /// receiver.
    fn scan_at_receiver(&mut self) -> TokenKind {
        self.advance(); // consume '@'
        let word = self.scan_word_text();
        if word.is_empty() {
            TokenKind::Receiver(name::ROOT_RECEIVER.to_string())
        } else {
            TokenKind::Receiver(name::normalize_receiver(&word))
        }
    }

    /// Scans a single-quoted annotation string.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '\''
        let start = self.position;
        loop {
            match self.peek_char() {
                Some('\'') => {
                    let text = self.source[start..self.position].to_string();
                    self.advance();
                    return TokenKind::Str(text);
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated string".into()),
            }
        }
    }

    /// Scans a number (integer or float), with an optional leading minus.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_dot = false;

        if self.peek_char() == Some('-') {
            self.advance();
        }

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.position];
        if has_dot {
            match text.parse::<f64>() {
                Ok(n) => TokenKind::Float(n),
                Err(e) => TokenKind::Error(format!("invalid float: {e}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                Err(e) => TokenKind::Error(format!("invalid integer: {e}")),
            }
        }
    }

    /// Scans a bare word: receiver if capitalized, otherwise the reserved
    /// word `super` or an identifier.
    fn scan_word(&mut self) -> TokenKind {
        let word = self.scan_word_text();
        if name::is_receiver_word(&word) {
            TokenKind::Receiver(word)
        } else if word == "super" {
            TokenKind::Super
        } else {
            TokenKind::Identifier(word)
        }
    }

    /// Scans word text: alphanumerics and underscores.
    fn scan_word_text(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.source[start..self.position].to_string()
    }
}

/// Tokenizes source text, failing with a lex error on the first
/// unrecognized character or unterminated span.
///
/// # Errors
/// Returns a lex error carrying the offending line/column.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let tokens = Lexer::tokenize_all(source);
    for token in &tokens {
        if let TokenKind::Error(message) = &token.kind {
            return Err(Error::lex(message.clone(), token.span.line, token.span.column));
        }
    }
    Ok(tokens)
}

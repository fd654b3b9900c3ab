//! Integration tests for the lexer
//!
//! Tests tokenization of dialogue source and vocabulary-file text.

use idiolect_language::{tokenize, Lexer, TokenKind};

// =============================================================================
// Basic Tokens
// =============================================================================

#[test]
fn tokenize_receiver() {
    let tokens = Lexer::tokenize_all("AlphaR");
    assert_eq!(tokens.len(), 2); // receiver + eof
    assert_eq!(tokens[0].kind, TokenKind::Receiver("AlphaR".into()));
}

#[test]
fn tokenize_legacy_at_receiver() {
    let tokens = Lexer::tokenize_all("@codex @");
    assert_eq!(tokens[0].kind, TokenKind::Receiver("Codex".into()));
    assert_eq!(tokens[1].kind, TokenKind::Receiver("HelloWorld".into()));
}

#[test]
fn tokenize_symbols() {
    let tokens = Lexer::tokenize_all("AlphaR. #light #");
    assert_eq!(tokens[2].kind, TokenKind::Symbol("#light".into()));
    assert_eq!(tokens[3].kind, TokenKind::Symbol("#".into()));
}

#[test]
fn tokenize_identifier_and_super() {
    let tokens = Lexer::tokenize_all("listen super");
    assert_eq!(tokens[0].kind, TokenKind::Identifier("listen".into()));
    assert_eq!(tokens[1].kind, TokenKind::Super);
}

#[test]
fn tokenize_numbers() {
    let tokens = Lexer::tokenize_all("42 -17 3.14");
    assert_eq!(tokens[0].kind, TokenKind::Int(42));
    assert_eq!(tokens[1].kind, TokenKind::Int(-17));
    assert!(matches!(tokens[2].kind, TokenKind::Float(_)));
}

#[test]
fn tokenize_annotation_string() {
    let tokens = Lexer::tokenize_all("'first contact'");
    assert_eq!(tokens[0].kind, TokenKind::Str("first contact".into()));
}

#[test]
fn tokenize_punctuation() {
    let tokens = Lexer::tokenize_all(". , : :: [ ]");
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert_eq!(kinds[0], &TokenKind::Dot);
    assert_eq!(kinds[1], &TokenKind::Comma);
    assert_eq!(kinds[2], &TokenKind::Colon);
    assert_eq!(kinds[3], &TokenKind::DoubleColon);
    assert_eq!(kinds[4], &TokenKind::LBracket);
    assert_eq!(kinds[5], &TokenKind::RBracket);
}

#[test]
fn tokenize_both_arrow_forms() {
    let tokens = Lexer::tokenize_all("→ ->");
    assert_eq!(tokens[0].kind, TokenKind::Arrow);
    assert_eq!(tokens[1].kind, TokenKind::Arrow);
}

// =============================================================================
// Markdown Structure at Column 1
// =============================================================================

#[test]
fn tokenize_headings_at_column_one() {
    let tokens = Lexer::tokenize_all("# AlphaR : Agent\n## light\n- emitted brightness\n");
    assert_eq!(tokens[0].kind, TokenKind::Heading1("AlphaR : Agent".into()));
    assert_eq!(tokens[1].kind, TokenKind::Heading2("light".into()));
    assert_eq!(
        tokens[2].kind,
        TokenKind::ListItem("emitted brightness".into())
    );
}

#[test]
fn hash_midline_is_a_symbol_not_a_heading() {
    let tokens = Lexer::tokenize_all("AlphaR. # #light");
    assert_eq!(tokens[2].kind, TokenKind::Symbol("#".into()));
    assert_eq!(tokens[3].kind, TokenKind::Symbol("#light".into()));
}

#[test]
fn dash_midline_is_not_a_list_item() {
    // A negative number after other tokens must not read as a list item.
    let tokens = Lexer::tokenize_all("count: -3");
    assert_eq!(tokens[2].kind, TokenKind::Int(-3));
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn quoted_spans_are_skipped() {
    let tokens = Lexer::tokenize_all("AlphaR \"a comment\nspanning lines\" #light");
    assert_eq!(tokens[0].kind, TokenKind::Receiver("AlphaR".into()));
    assert_eq!(tokens[1].kind, TokenKind::Symbol("#light".into()));
}

#[test]
fn html_comments_are_skipped() {
    let tokens = Lexer::tokenize_all("AlphaR <!-- aside --> #light");
    assert_eq!(tokens[0].kind, TokenKind::Receiver("AlphaR".into()));
    assert_eq!(tokens[1].kind, TokenKind::Symbol("#light".into()));
}

// =============================================================================
// Errors and Positions
// =============================================================================

#[test]
fn unterminated_comment_is_an_error() {
    assert!(tokenize("AlphaR \"never closed").is_err());
}

#[test]
fn error_carries_position() {
    let err = tokenize("AlphaR\n  \"open").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("2:"), "expected line 2 in {msg:?}");
}

#[test]
fn spans_track_lines_and_columns() {
    let tokens = Lexer::tokenize_all("AlphaR\n  #light");
    assert_eq!(tokens[0].span.line, 1);
    assert_eq!(tokens[0].span.column, 1);
    assert_eq!(tokens[1].span.line, 2);
    assert_eq!(tokens[1].span.column, 3);
}

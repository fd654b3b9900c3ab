//! Integration tests for the parser
//!
//! Tests statement parsing and best-effort recovery.

use idiolect_language::{parse, parse_lenient, Argument, StatementKind};

// =============================================================================
// Statement Forms
// =============================================================================

#[test]
fn parse_all_statement_forms() {
    let source = "\
AlphaR. # → [#light, #dark]
AlphaR. #
AlphaR. # #
AlphaR. #light
AlphaR. #light super
AlphaR send: #light to: BetaR
AlphaR listen
AlphaR listen super";
    let statements = parse(source).expect("parse failed");
    assert_eq!(statements.len(), 8);
    assert!(matches!(
        statements[0].kind,
        StatementKind::VocabularyDefinition { .. }
    ));
    assert!(matches!(
        statements[1].kind,
        StatementKind::VocabularyQuery { .. }
    ));
    assert!(matches!(
        statements[2].kind,
        StatementKind::DeepVocabularyQuery { .. }
    ));
    assert!(matches!(
        statements[3].kind,
        StatementKind::ScopedLookup { .. }
    ));
    assert!(matches!(statements[4].kind, StatementKind::SuperLookup { .. }));
    assert!(matches!(
        statements[5].kind,
        StatementKind::KeywordMessage { .. }
    ));
    assert!(matches!(
        statements[6].kind,
        StatementKind::UnaryMessage { is_super: false, .. }
    ));
    assert!(matches!(
        statements[7].kind,
        StatementKind::UnaryMessage { is_super: true, .. }
    ));
}

#[test]
fn parse_namespace_path() {
    let statements = parse("HelloWorld::Agent::Codex. #send").expect("parse failed");
    let StatementKind::ScopedLookup { receiver, symbol } = &statements[0].kind else {
        panic!("expected scoped lookup");
    };
    assert_eq!(receiver.segments, vec!["HelloWorld", "Agent", "Codex"]);
    assert_eq!(receiver.leaf(), "Codex");
    assert_eq!(symbol, "#send");
}

#[test]
fn parse_keyword_message_argument_kinds() {
    let statements =
        parse("AlphaR send: #light to: BetaR count: 3 weight: 0.5 note: 'aside'")
            .expect("parse failed");
    let StatementKind::KeywordMessage { pairs, .. } = &statements[0].kind else {
        panic!("expected keyword message");
    };
    assert_eq!(pairs.len(), 5);
    assert!(matches!(pairs[0].1, Argument::Symbol(_)));
    assert!(matches!(pairs[1].1, Argument::Receiver(_)));
    assert!(matches!(pairs[2].1, Argument::Int(3)));
    assert!(matches!(pairs[3].1, Argument::Float(_)));
    assert!(matches!(pairs[4].1, Argument::Str(_)));
}

#[test]
fn parse_trailing_annotation() {
    let statements = parse("AlphaR send: #light to: BetaR 'first contact'").expect("parse");
    let StatementKind::KeywordMessage { annotation, .. } = &statements[0].kind else {
        panic!("expected keyword message");
    };
    assert_eq!(annotation.as_deref(), Some("first contact"));
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn strict_parse_fails_on_first_malformed_statement() {
    let err = parse("AlphaR. # → [#light\nBetaR. #").unwrap_err();
    assert!(format!("{err}").contains("parse error"));
}

#[test]
fn lenient_parse_recovers_at_statement_granularity() {
    let source = "AlphaR. # → [#light,]\nBetaR. # → [#sound]\nGammaR. #tone";
    let (statements, errors) = parse_lenient(source);
    assert_eq!(statements.len(), 2);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_source_error());
}

#[test]
fn markdown_lines_are_skipped_between_statements() {
    let source = "# AlphaR : Agent\n- identity text\nAlphaR. #light\n## light\n- bright\nBetaR. #";
    let statements = parse(source).expect("parse failed");
    assert_eq!(statements.len(), 2);
}

//! Integration tests for the escalation inbox
//!
//! Tests durability of pending collisions and Tier-3a inbox draining.

use idiolect_engine::{
    CollisionArtifact, Engine, EngineConfig, EscalationChannel, FileInbox, InterpreterError,
};

fn engine(dir: &std::path::Path) -> Engine {
    Engine::open(EngineConfig::new(dir)).unwrap()
}

// =============================================================================
// Durability
// =============================================================================

#[test]
fn pending_set_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut engine = engine(dir.path());
        engine.eval("AlphaR. # → [#light]").unwrap();
        engine.eval("BetaR. # → [#light]").unwrap();
        engine.eval("AlphaR send: #light to: BetaR").unwrap();
        assert!(engine.pending().contains("#light"));
    }

    // A fresh engine over the same directory rebuilds the pending set
    // from the inbox artifacts.
    let reopened = engine(dir.path());
    assert!(reopened.pending().contains("#light"));
}

#[test]
fn resolution_purges_queued_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut engine = engine(dir.path());
        engine.eval("AlphaR. # → [#light]").unwrap();
        engine.eval("BetaR. # → [#light]").unwrap();

        // First send escalates; the second resolves the same symbol once
        // an interpreter is attached.
        engine.eval("AlphaR send: #light to: BetaR").unwrap();
        assert!(engine.pending().contains("#light"));

        engine.set_interpreter(Some(Box::new(|_: &str| {
            Ok::<_, InterpreterError>("shared meaning".to_string())
        })));
        let results = engine.eval("AlphaR send: #light to: BetaR").unwrap();
        assert!(results[0].contains("RESOLVED COLLISION"));
        assert!(!engine.pending().contains("#light"));

        // The earlier artifact is gone from the inbox too.
        let inbox = FileInbox::new(dir.path());
        assert!(inbox.snapshot("HelloWorld").unwrap().is_empty());
    }

    // A resolved symbol must not resurface as pending after restart.
    let reopened = engine(dir.path());
    assert!(!reopened.pending().contains("#light"));
}

#[test]
fn artifact_captures_both_sides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    engine.eval("AlphaR. # → [#light, #dark]").unwrap();
    engine.eval("BetaR. # → [#light, #sound]").unwrap();
    engine.eval("AlphaR send: #light to: BetaR").unwrap();

    let inbox = FileInbox::new(dir.path());
    let items = inbox.snapshot("HelloWorld").unwrap();
    assert_eq!(items.len(), 1);
    let artifact = CollisionArtifact::from_json(&items[0]).expect("artifact");
    assert_eq!(artifact.symbol, "#light");
    assert_eq!(artifact.sender, "AlphaR");
    assert_eq!(artifact.target, "BetaR");
    assert!(artifact.sender_vocabulary.contains(&"#dark".to_string()));
    assert!(artifact.target_vocabulary.contains(&"#sound".to_string()));
}

// =============================================================================
// Tier 3a: Draining the Inbox
// =============================================================================

#[test]
fn process_inbox_without_interpreter_is_a_no_op() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    engine.eval("AlphaR. # → [#light]").unwrap();
    engine.eval("BetaR. # → [#light]").unwrap();
    engine.eval("AlphaR send: #light to: BetaR").unwrap();

    let results = engine.process_inbox().unwrap();
    assert!(results.is_empty());
    assert!(engine.pending().contains("#light"));

    // The artifact is still queued.
    let inbox = FileInbox::new(dir.path());
    assert_eq!(inbox.snapshot("HelloWorld").unwrap().len(), 1);
}

#[test]
fn process_inbox_resolves_queued_collisions() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut engine = engine(dir.path());
        engine.eval("AlphaR. # → [#light]").unwrap();
        engine.eval("BetaR. # → [#light]").unwrap();
        engine.eval("AlphaR send: #light to: BetaR").unwrap();
    }

    let mut reopened = engine(dir.path()).with_interpreter(Box::new(|_: &str| {
        Ok::<_, InterpreterError>("Light emerges from both perspectives.".to_string())
    }));
    assert!(reopened.pending().contains("#light"));

    let results = reopened.process_inbox().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("RESOLVED COLLISION"));
    assert!(!reopened.pending().contains("#light"));

    for file in ["AlphaR.hw", "BetaR.hw"] {
        let text = std::fs::read_to_string(dir.path().join(file)).unwrap();
        assert!(text.contains("Light emerges from both perspectives."));
    }

    // Drained artifacts are gone.
    let inbox = FileInbox::new(dir.path());
    assert!(inbox.snapshot("HelloWorld").unwrap().is_empty());
}

#[test]
fn failed_resolution_requeues_the_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    engine.eval("AlphaR. # → [#light]").unwrap();
    engine.eval("BetaR. # → [#light]").unwrap();
    engine.eval("AlphaR send: #light to: BetaR").unwrap();

    engine.set_interpreter(Some(Box::new(|_: &str| {
        Err::<String, _>(InterpreterError::new("still unavailable"))
    })));
    let results = engine.process_inbox().unwrap();
    assert!(results.is_empty());
    assert!(engine.pending().contains("#light"));

    let inbox = FileInbox::new(dir.path());
    assert_eq!(inbox.snapshot("HelloWorld").unwrap().len(), 1);
}

#[test]
fn inboxes_are_keyed_by_receiver() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut inbox = FileInbox::new(dir.path());
    inbox.append("HelloWorld", "for the root").unwrap();
    inbox.append("AlphaR", "for alpha").unwrap();

    assert_eq!(inbox.drain("AlphaR").unwrap(), vec!["for alpha"]);
    assert_eq!(
        inbox.snapshot("HelloWorld").unwrap(),
        vec!["for the root"]
    );
}

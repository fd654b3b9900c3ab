//! Integration tests for statement dispatch
//!
//! Tests the statement forms end to end through `Engine::eval`.

use idiolect_engine::{Engine, EngineConfig};

fn engine(dir: &std::path::Path) -> Engine {
    Engine::open(EngineConfig::new(dir)).unwrap()
}

fn eval_one(engine: &mut Engine, source: &str) -> String {
    let mut results = engine.eval(source).unwrap();
    assert_eq!(results.len(), 1, "expected one result for {source:?}");
    results.pop().unwrap()
}

// =============================================================================
// Vocabulary Definition and Queries
// =============================================================================

#[test]
fn definition_replaces_the_local_vocabulary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    engine.eval("AlphaR. # → [#light, #dark]").unwrap();
    engine.eval("AlphaR. # → [#sound]").unwrap();

    assert_eq!(eval_one(&mut engine, "AlphaR. #"), "AlphaR # → [#sound]");

    // The file reflects the replacement too.
    let text = std::fs::read_to_string(dir.path().join("AlphaR.hw")).unwrap();
    assert!(text.contains("## sound"));
    assert!(!text.contains("## light"));
}

#[test]
fn deep_query_lists_every_chain_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("HelloWorld.hw"),
        "# HelloWorld\n\n## send\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Agent.hw"),
        "# Agent : HelloWorld\n\n## parse\n",
    )
    .unwrap();

    let mut engine = engine(dir.path());
    let result = eval_one(&mut engine, "Agent. # #");
    assert_eq!(result, "Agent # → [#parse]\nHelloWorld # → [#send]");
}

#[test]
fn reopening_a_directory_the_engine_wrote_to() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut engine = engine(dir.path());
        engine.eval("AlphaR. # → [#light]").unwrap();
    }

    // The written file names HelloWorld as parent even though the root
    // has no file of its own; reopening must still wire the chain.
    let reopened = engine(dir.path());
    let alpha = reopened.registry().id_of("AlphaR").unwrap();
    assert!(reopened.registry().receiver(alpha).is_native("#light"));
    assert_eq!(
        reopened.registry().chain(alpha).unwrap(),
        vec!["AlphaR", "HelloWorld"]
    );
}

#[test]
fn first_mention_creates_a_rooted_receiver() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    engine.eval("NovaR. # → [#spark]").unwrap();

    let nova = engine.registry().id_of("NovaR").unwrap();
    assert_eq!(
        engine.registry().chain(nova).unwrap(),
        vec!["NovaR", "HelloWorld"]
    );
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn scoped_lookup_reports_native_with_description() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("AlphaR.hw"),
        "# AlphaR\n\n## light\n- emitted brightness\n",
    )
    .unwrap();
    let mut engine = engine(dir.path());
    assert_eq!(
        eval_one(&mut engine, "AlphaR. #light"),
        "AlphaR #light → native: emitted brightness"
    );
}

#[test]
fn scoped_lookup_reports_inheritance_without_promotion() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("HelloWorld.hw"),
        "# HelloWorld\n\n## send\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("Agent.hw"), "# Agent : HelloWorld\n").unwrap();
    std::fs::write(dir.path().join("Codex.hw"), "# Codex : Agent\n").unwrap();

    let mut engine = engine(dir.path());
    assert_eq!(
        eval_one(&mut engine, "Codex. #send"),
        "Codex #send → inherited from HelloWorld"
    );
    let codex = engine.registry().id_of("Codex").unwrap();
    assert!(!engine.registry().receiver(codex).is_native("#send"));
}

#[test]
fn super_lookup_walks_every_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("HelloWorld.hw"),
        "# HelloWorld\n\n## send\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Agent.hw"),
        "# Agent : HelloWorld\n\n## send\n",
    )
    .unwrap();

    let mut engine = engine(dir.path());
    assert_eq!(
        eval_one(&mut engine, "Agent. #send super"),
        "Agent defines #send\nHelloWorld defines #send"
    );
}

#[test]
fn unary_super_starts_above_the_receiver() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("HelloWorld.hw"),
        "# HelloWorld\n\n## listen\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Agent.hw"),
        "# Agent : HelloWorld\n\n## listen\n",
    )
    .unwrap();

    let mut engine = engine(dir.path());
    assert_eq!(
        eval_one(&mut engine, "Agent listen"),
        "Agent #listen → native"
    );
    assert_eq!(
        eval_one(&mut engine, "Agent listen super"),
        "Agent #listen → inherited from HelloWorld"
    );
}

#[test]
fn namespace_path_must_match_the_chain() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("HelloWorld.hw"), "# HelloWorld\n").unwrap();
    std::fs::write(dir.path().join("Object.hw"), "# Object : HelloWorld\n").unwrap();
    std::fs::write(dir.path().join("Agent.hw"), "# Agent : Object\n").unwrap();
    std::fs::write(dir.path().join("Claude.hw"), "# Claude : Agent\n").unwrap();

    let mut engine = engine(dir.path());
    assert!(engine.eval("Object::Agent::Claude #parse").is_ok());
    let err = engine.eval("Agent::Object::Claude #parse").unwrap_err();
    assert!(format!("{err}").contains("Agent::Object::Claude"));
}

// =============================================================================
// Evaluation Modes
// =============================================================================

#[test]
fn strict_eval_stops_at_the_first_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    assert!(engine.eval("AlphaR. # → [#light,]").is_err());
}

#[test]
fn lenient_eval_drops_failing_statements() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let (results, errors) =
        engine.eval_lenient("AlphaR. # → [#light,]\nBetaR. # → [#sound]");
    assert_eq!(results.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(engine.registry().contains("BetaR"));
}

//! Cross-layer integration tests
//!
//! A full dialogue session: bootstrap from files, mixed evaluation, a
//! collision left pending across a restart, and deferred resolution.

use idiolect::engine::{Engine, EngineConfig, InterpreterError};
use idiolect::registry::LookupResult;

#[test]
fn full_dialogue_session() {
    let dir = tempfile::tempdir().expect("tempdir");

    // Session 1: two receivers grow vocabularies and collide on #light
    // with no interpreter configured.
    {
        let mut engine = Engine::open(EngineConfig::new(dir.path())).unwrap();
        let (results, errors) = engine.eval_lenient(
            "\
AlphaR. # → [#light, #dark]
BetaR. # → [#light, #sound]
AlphaR. #light
AlphaR send: #light to: BetaR 'first contact'
BetaR send: #sound to: AlphaR",
        );
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(results.len(), 5);
        assert!(results[3].contains("UNRESOLVED COLLISION"));
        assert!(results[4].contains("FOREIGN EVENT"));
        assert!(engine.pending().contains("#light"));

        // #sound drifted into AlphaR's vocabulary.
        let alpha = engine.registry().id_of("AlphaR").unwrap();
        assert!(engine.registry().receiver(alpha).is_native("#sound"));
    }

    // Session 2: restart, attach an interpreter, drain the inbox.
    {
        let mut engine = Engine::open(EngineConfig::new(dir.path()))
            .unwrap()
            .with_interpreter(Box::new(|_: &str| {
                Ok::<_, InterpreterError>("Light emerges from both perspectives.".to_string())
            }));
        assert!(engine.pending().contains("#light"));

        let resolved = engine.process_inbox().unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(!engine.pending().contains("#light"));

        let alpha = engine.registry().id_of("AlphaR").unwrap();
        assert!(engine
            .registry()
            .receiver(alpha)
            .description("#light")
            .is_some_and(|text| text.contains("Light emerges")));
    }

    // Session 3: everything is durable and inheritance stays live.
    {
        let mut engine = Engine::open(EngineConfig::new(dir.path())).unwrap();
        assert!(engine.pending().is_empty());

        let results = engine.eval("AlphaR. #light").unwrap();
        assert!(results[0].contains("Light emerges"));

        // The collision log kept the whole history.
        let lines = engine.log().lines().unwrap();
        assert!(lines.iter().any(|l| l.contains("UNRESOLVED COLLISION")));
        assert!(lines.iter().any(|l| l.contains("RESOLVED COLLISION")));

        let beta = engine.registry().id_of("BetaR").unwrap();
        assert_eq!(engine.registry().lookup(beta, "#light"), LookupResult::Native);
    }
}

#[test]
fn bootstrapped_inheritance_feeds_dispatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("HelloWorld.hw"),
        "# HelloWorld\n- the root receiver\n\n## send\n- passing a symbol onward\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("Agent.hw"), "# Agent : HelloWorld\n").unwrap();
    std::fs::write(
        dir.path().join("Codex.hw"),
        "# Codex : Agent\n- a careful reader\n\n## parse\n- turning text into structure\n",
    )
    .unwrap();

    let mut engine = Engine::open(EngineConfig::new(dir.path())).unwrap();
    assert_eq!(
        engine.eval("Codex. #send").unwrap()[0],
        "Codex #send → inherited from HelloWorld"
    );
    assert_eq!(
        engine.eval("HelloWorld::Agent::Codex. #parse").unwrap()[0],
        "Codex #parse → native: turning text into structure"
    );

    // Vocabulary files written by hand and by the engine coexist: a
    // definition rewrites only the receiver it names.
    engine.eval("Agent. # → [#plan]").unwrap();
    let text = std::fs::read_to_string(dir.path().join("Codex.hw")).unwrap();
    assert!(text.contains("a careful reader"));
}

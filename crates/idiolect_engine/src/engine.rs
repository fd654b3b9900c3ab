//! The engine: explicit construction over one vocabulary directory.
//!
//! An [`Engine`] owns its registry, pending-collision set, collision log,
//! and escalation inbox; no process-wide statics, so multiple isolated
//! engines can coexist in one process. Run one engine per directory.

use std::collections::BTreeSet;
use std::path::PathBuf;

use idiolect_foundation::{name, Error, Result};
use idiolect_language::parser;
use idiolect_registry::{ReceiverId, Registry};
use tracing::debug;

use crate::collision::CollisionArtifact;
use crate::collision_log::CollisionLog;
use crate::escalation::{EscalationChannel, FileInbox};
use crate::interpreter::Interpreter;

/// Configuration for one engine instance.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Directory holding `.hw` files, inboxes, and the collision log.
    pub vocab_dir: PathBuf,
    /// Name of the root receiver, the fixed escalation target.
    pub root_receiver: String,
    /// File name of the collision log within `vocab_dir`.
    pub log_file: String,
}

impl EngineConfig {
    /// Creates a configuration with conventional defaults for the given
    /// directory.
    #[must_use]
    pub fn new(vocab_dir: impl Into<PathBuf>) -> Self {
        Self {
            vocab_dir: vocab_dir.into(),
            root_receiver: name::ROOT_RECEIVER.to_string(),
            log_file: "collisions.log".to_string(),
        }
    }

    /// Overrides the root receiver name.
    #[must_use]
    pub fn with_root_receiver(mut self, root: impl Into<String>) -> Self {
        self.root_receiver = root.into();
        self
    }
}

/// The dispatch and collision-resolution engine for one vocabulary
/// directory.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) registry: Registry,
    pub(crate) interpreter: Option<Box<dyn Interpreter>>,
    pub(crate) pending: BTreeSet<String>,
    pub(crate) log: CollisionLog,
    pub(crate) inbox: FileInbox,
}

impl Engine {
    /// Opens an engine over a vocabulary directory, creating it if
    /// missing. Bootstraps the registry from `*.hw` files in two phases,
    /// guarantees the root receiver exists, and re-derives the
    /// pending-collision set from the root's escalation inbox.
    ///
    /// # Errors
    /// Fails on I/O errors and on configuration errors (an unresolved
    /// parent name or a cyclic chain).
    pub fn open(config: EngineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.vocab_dir)?;

        // The root must exist before parent links are wired: receivers
        // created through dispatch are persisted with the root as parent,
        // while the root itself may have no file of its own.
        let mut registry = Registry::new();
        registry.register(&config.root_receiver, None)?;
        registry.load_dir(&config.vocab_dir)?;

        let inbox = FileInbox::new(&config.vocab_dir);
        let log = CollisionLog::new(config.vocab_dir.join(&config.log_file));

        let mut pending = BTreeSet::new();
        for item in inbox.snapshot(&config.root_receiver)? {
            if let Some(artifact) = CollisionArtifact::from_json(&item) {
                pending.insert(artifact.symbol);
            }
        }
        debug!(
            receivers = registry.len(),
            pending = pending.len(),
            "engine opened"
        );

        Ok(Self {
            config,
            registry,
            interpreter: None,
            pending,
            log,
            inbox,
        })
    }

    /// Attaches an interpreter.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: Box<dyn Interpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    /// Sets or clears the interpreter.
    pub fn set_interpreter(&mut self, interpreter: Option<Box<dyn Interpreter>>) {
        self.interpreter = interpreter;
    }

    /// Returns true if an interpreter is currently attached.
    #[must_use]
    pub fn has_interpreter(&self) -> bool {
        self.interpreter.is_some()
    }

    /// Returns the receiver registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the symbols currently awaiting collision resolution.
    #[must_use]
    pub fn pending(&self) -> &BTreeSet<String> {
        &self.pending
    }

    /// Returns the collision log handle.
    #[must_use]
    pub fn log(&self) -> &CollisionLog {
        &self.log
    }

    /// Returns the configured root receiver name.
    #[must_use]
    pub fn root_receiver(&self) -> &str {
        &self.config.root_receiver
    }

    /// Evaluates source in batch mode: the first malformed statement or
    /// dispatch failure surfaces as a single error.
    ///
    /// # Errors
    /// Returns lex, parse, path, or I/O errors.
    pub fn eval(&mut self, source: &str) -> Result<Vec<String>> {
        let statements = parser::parse(source)?;
        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            results.push(self.dispatch(statement)?);
        }
        Ok(results)
    }

    /// Evaluates source REPL-style: malformed or failing statements are
    /// dropped from the result sequence and their errors collected.
    pub fn eval_lenient(&mut self, source: &str) -> (Vec<String>, Vec<Error>) {
        let (statements, mut errors) = parser::parse_lenient(source);
        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            match self.dispatch(statement) {
                Ok(result) => results.push(result),
                Err(err) => errors.push(err),
            }
        }
        (results, errors)
    }

    /// Drains the root receiver's escalation inbox, resolving each pending
    /// artifact Tier-1 style. Without an interpreter the inbox is left
    /// untouched and nothing is resolved.
    ///
    /// # Errors
    /// Returns an error on I/O failure; interpreter failures re-queue the
    /// artifact instead of erroring.
    pub fn process_inbox(&mut self) -> Result<Vec<String>> {
        if self.interpreter.is_none() {
            debug!("inbox processing skipped: no interpreter");
            return Ok(Vec::new());
        }

        let root = self.config.root_receiver.clone();
        let items = self.inbox.drain(&root)?;
        let mut results = Vec::new();
        for item in items {
            match CollisionArtifact::from_json(&item) {
                Some(artifact) => match self.resolve_artifact(&artifact)? {
                    Some(result) => results.push(result),
                    None => self.inbox.append(&root, &item)?,
                },
                None => {
                    tracing::warn!("dropping malformed escalation artifact");
                }
            }
        }
        Ok(results)
    }

    /// Gets or creates a receiver named by a DSL statement. Newly created
    /// receivers get the root receiver as parent so every chain stays
    /// rooted.
    pub(crate) fn ensure_receiver(&mut self, receiver_name: &str) -> Result<ReceiverId> {
        if receiver_name == self.config.root_receiver {
            self.registry.register(receiver_name, None)
        } else {
            let root = self.config.root_receiver.clone();
            self.registry.register(receiver_name, Some(&root))
        }
    }
}

//! The receiver registry: an in-memory graph with inheritance-aware
//! symbol resolution.

use std::collections::HashMap;
use std::path::Path;

use idiolect_foundation::{name, Error, Result};
use tracing::debug;

use crate::receiver::{Receiver, ReceiverId};
use crate::vocab_file::{self, VocabDoc, VocabEntry};

/// The outcome of resolving a symbol against a receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupResult {
    /// The symbol is in the receiver's own local vocabulary. Native always
    /// shadows inherited definitions.
    Native,
    /// The symbol was found by walking the parent chain.
    Inherited {
        /// Name of the nearest ancestor whose local vocabulary holds the
        /// symbol.
        ancestor: String,
    },
    /// The symbol is not held anywhere along the chain.
    Unknown,
}

impl LookupResult {
    /// Returns true if the symbol resolved natively.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Returns true if the symbol resolved at all, natively or by
    /// inheritance.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Owns all receivers for one engine, keyed by name.
#[derive(Debug, Default)]
pub struct Registry {
    /// Receiver table; handles index into it. Receivers are never removed.
    receivers: Vec<Receiver>,
    /// Name → handle index.
    index: HashMap<String, ReceiverId>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered receivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    /// Returns true if no receivers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Returns the handle for a receiver name, if registered.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ReceiverId> {
        self.index.get(name).copied()
    }

    /// Returns true if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the receiver for a handle minted by this registry.
    #[must_use]
    pub fn receiver(&self, id: ReceiverId) -> &Receiver {
        &self.receivers[id.index()]
    }

    /// Returns a mutable receiver for a handle minted by this registry.
    pub fn receiver_mut(&mut self, id: ReceiverId) -> &mut Receiver {
        &mut self.receivers[id.index()]
    }

    /// Iterates over all receivers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Receiver> {
        self.receivers.iter()
    }

    /// Registers a receiver, idempotently: creates it if absent, otherwise
    /// returns the existing one. A parent is only linked if the receiver
    /// does not already have one, so a manually modified chain is never
    /// clobbered.
    ///
    /// # Errors
    /// Fails if the named parent is not registered, or if linking it would
    /// create a cycle.
    pub fn register(&mut self, name: &str, parent: Option<&str>) -> Result<ReceiverId> {
        let id = match self.id_of(name) {
            Some(id) => id,
            None => {
                let id = ReceiverId::new(self.receivers.len());
                self.receivers.push(Receiver::new(name));
                self.index.insert(name.to_string(), id);
                id
            }
        };

        if let Some(parent_name) = parent {
            if self.receiver(id).parent().is_none() {
                let parent_id = self
                    .id_of(parent_name)
                    .ok_or_else(|| Error::unknown_parent(name, parent_name))?;
                self.link_parent(id, parent_id)?;
            }
        }

        Ok(id)
    }

    /// Links a parent after walking the prospective chain to rule out a
    /// cycle.
    fn link_parent(&mut self, child: ReceiverId, parent: ReceiverId) -> Result<()> {
        let mut cursor = Some(parent);
        let mut hops = 0;
        while let Some(id) = cursor {
            if id == child {
                return Err(Error::cyclic_chain(self.receiver(child).name().to_string()));
            }
            hops += 1;
            if hops > self.receivers.len() {
                return Err(Error::cyclic_chain(self.receiver(child).name().to_string()));
            }
            cursor = self.receiver(id).parent();
        }
        self.receiver_mut(child).set_parent(parent);
        Ok(())
    }

    /// Resolves a symbol against a receiver: local vocabulary first
    /// (native shadows inheritance), then the parent chain. The walk is
    /// bounded by registry size, so a corrupt chain resolves as `Unknown`
    /// rather than looping.
    #[must_use]
    pub fn lookup(&self, id: ReceiverId, symbol: &str) -> LookupResult {
        if self.receiver(id).is_native(symbol) {
            return LookupResult::Native;
        }
        match self.receiver(id).parent() {
            Some(parent) => self.lookup_above(parent, symbol),
            None => LookupResult::Unknown,
        }
    }

    /// Resolves a symbol starting at the given receiver inclusive; a
    /// native hit here reports that receiver as the defining ancestor.
    /// Used for `super` dispatch, which starts one level above.
    #[must_use]
    pub fn lookup_above(&self, start: ReceiverId, symbol: &str) -> LookupResult {
        let mut cursor = Some(start);
        let mut hops = 0;
        while let Some(id) = cursor {
            if hops > self.receivers.len() {
                return LookupResult::Unknown;
            }
            let receiver = self.receiver(id);
            if receiver.is_native(symbol) {
                return LookupResult::Inherited {
                    ancestor: receiver.name().to_string(),
                };
            }
            hops += 1;
            cursor = receiver.parent();
        }
        LookupResult::Unknown
    }

    /// Returns the receiver's chain: its own name first, then each
    /// ancestor up to the root, inclusive.
    ///
    /// # Errors
    /// Fails fast if the walk exceeds registry size (a cycle slipped in).
    pub fn chain(&self, id: ReceiverId) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if names.len() > self.receivers.len() {
                return Err(Error::cyclic_chain(self.receiver(id).name().to_string()));
            }
            let receiver = self.receiver(current);
            names.push(receiver.name().to_string());
            cursor = receiver.parent();
        }
        Ok(names)
    }

    /// Promotes a symbol into a receiver's local vocabulary (vocabulary
    /// drift through dialogue).
    pub fn add_symbol(&mut self, id: ReceiverId, symbol: &str, description: Option<&str>) {
        self.receiver_mut(id).insert_symbol(symbol, description);
    }

    /// Resolves a namespace path (`A::B::C`) to the leaf receiver,
    /// validating that the leaf's chain passes through each preceding
    /// segment in path order.
    ///
    /// # Errors
    /// Fails with a path error if the leaf is unregistered or the path
    /// order does not match the ancestor order.
    pub fn resolve_path(&self, segments: &[String]) -> Result<ReceiverId> {
        let path = segments.join("::");
        let leaf = segments
            .last()
            .ok_or_else(|| Error::path(&path, "empty path"))?;
        let id = self
            .id_of(leaf)
            .ok_or_else(|| Error::path(&path, format!("unknown receiver {leaf}")))?;

        if segments.len() > 1 {
            let chain = self.chain(id)?;
            // Nearest ancestor first: C's chain must pass through B, then A.
            let mut position = 1;
            for expected in segments[..segments.len() - 1].iter().rev() {
                match chain[position..].iter().position(|name| name == expected) {
                    Some(offset) => position += offset + 1,
                    None => {
                        return Err(Error::path(
                            &path,
                            format!("{expected} is not an ancestor of {leaf} in path order"),
                        ));
                    }
                }
            }
        }

        Ok(id)
    }

    /// Persists a receiver's local vocabulary and descriptions to its
    /// `.hw` file in `dir`. Inherited symbols are never written.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn save(&self, id: ReceiverId, dir: &Path) -> Result<()> {
        let doc = self.doc_for(id);
        vocab_file::save(&self.vocab_path(dir, id), &doc)
    }

    /// Persists a receiver with full-replace semantics, rewriting its
    /// `.hw` file. Used when a vocabulary definition replaces the local
    /// vocabulary outright.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn save_replacing(&self, id: ReceiverId, dir: &Path) -> Result<()> {
        let doc = self.doc_for(id);
        vocab_file::write_new(&self.vocab_path(dir, id), &doc)
    }

    /// Bootstraps the registry from every `.hw` file in `dir`, in two
    /// phases: first create all receivers, then wire parent links. A
    /// parent referenced by name but never defined is a configuration
    /// error.
    ///
    /// # Errors
    /// Fails on I/O errors, unresolved parents, or a cyclic chain.
    pub fn load_dir(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == name::VOCAB_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut parents: Vec<(String, String)> = Vec::new();

        for path in &paths {
            let Some(doc) = vocab_file::read(path)? else {
                debug!(path = %path.display(), "no receiver in vocabulary file");
                continue;
            };
            let id = self.register(&doc.receiver, None)?;
            let receiver = self.receiver_mut(id);
            if !doc.identity.is_empty() {
                receiver.set_identity(doc.identity.join("\n"));
            }
            for entry in &doc.entries {
                let description = entry.description.join("\n");
                let description = (!description.is_empty()).then_some(description.as_str());
                receiver.insert_symbol(entry.symbol.clone(), description);
            }
            if let Some(parent) = doc.parent {
                parents.push((doc.receiver, parent));
            }
        }

        for (child, parent) in parents {
            self.register(&child, Some(&parent))?;
        }

        debug!(receivers = self.len(), files = paths.len(), "registry bootstrapped");
        Ok(())
    }

    /// Builds the on-disk document for a receiver.
    fn doc_for(&self, id: ReceiverId) -> VocabDoc {
        let receiver = self.receiver(id);
        let identity: Vec<String> = receiver
            .identity()
            .lines()
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();
        let entries = receiver
            .local_vocabulary()
            .iter()
            .map(|symbol| VocabEntry {
                symbol: symbol.clone(),
                description: receiver
                    .description(symbol)
                    .map(|text| text.lines().map(ToString::to_string).collect())
                    .unwrap_or_default(),
            })
            .collect();
        VocabDoc {
            receiver: receiver.name().to_string(),
            parent: receiver
                .parent()
                .map(|pid| self.receiver(pid).name().to_string()),
            identity,
            entries,
        }
    }

    /// Path of a receiver's `.hw` file in `dir`.
    fn vocab_path(&self, dir: &Path, id: ReceiverId) -> std::path::PathBuf {
        dir.join(format!(
            "{}.{}",
            self.receiver(id).name(),
            name::VOCAB_EXTENSION
        ))
    }
}

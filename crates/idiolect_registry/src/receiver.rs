//! Receivers: named entities holding a local vocabulary.

use std::collections::{BTreeMap, BTreeSet};

/// A handle into the registry's receiver table.
///
/// Parent links are stored as handles rather than references so the
/// registry can be rebuilt without dangling pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReceiverId(usize);

impl ReceiverId {
    /// Creates a handle for the given table index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A named entity with its own vocabulary, the unit of identity in the
/// dialogue language.
#[derive(Clone, Debug)]
pub struct Receiver {
    /// Unique, case-sensitive name (capitalized by convention).
    name: String,
    /// Symbols this receiver holds natively.
    local_vocabulary: BTreeSet<String>,
    /// Free-text meaning per native symbol. Appends concatenate with a
    /// newline so each line round-trips as one list item on disk.
    descriptions: BTreeMap<String, String>,
    /// Free text describing the receiver's character, used for
    /// collision-prompt generation.
    identity: String,
    /// At most one parent; absent for roots.
    parent: Option<ReceiverId>,
}

impl Receiver {
    /// Creates a receiver with an empty vocabulary and no parent.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_vocabulary: BTreeSet::new(),
            descriptions: BTreeMap::new(),
            identity: String::new(),
            parent: None,
        }
    }

    /// Returns this receiver's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this receiver's identity text.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Sets the identity text.
    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = identity.into();
    }

    /// Returns the parent handle, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ReceiverId> {
        self.parent
    }

    /// Sets the parent handle. Callers must have validated the prospective
    /// chain for cycles first.
    pub(crate) fn set_parent(&mut self, parent: ReceiverId) {
        self.parent = Some(parent);
    }

    /// Returns the native vocabulary.
    #[must_use]
    pub fn local_vocabulary(&self) -> &BTreeSet<String> {
        &self.local_vocabulary
    }

    /// Returns true if the symbol is in the local vocabulary.
    #[must_use]
    pub fn is_native(&self, symbol: &str) -> bool {
        self.local_vocabulary.contains(symbol)
    }

    /// Returns the description of a native symbol, if one exists.
    #[must_use]
    pub fn description(&self, symbol: &str) -> Option<&str> {
        self.descriptions.get(symbol).map(String::as_str)
    }

    /// Adds a symbol to the local vocabulary, optionally with a
    /// description.
    pub fn insert_symbol(&mut self, symbol: impl Into<String>, description: Option<&str>) {
        let symbol = symbol.into();
        if let Some(text) = description {
            self.append_description(&symbol, text);
        }
        self.local_vocabulary.insert(symbol);
    }

    /// Appends to a symbol's description; a later append is concatenated
    /// onto the existing text with a newline separator.
    pub fn append_description(&mut self, symbol: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.descriptions.get_mut(symbol) {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => {
                self.descriptions.insert(symbol.to_string(), text.to_string());
            }
        }
    }

    /// Replaces the local vocabulary with the given symbols, dropping
    /// descriptions of symbols no longer held.
    pub fn define(&mut self, symbols: impl IntoIterator<Item = String>) {
        self.local_vocabulary = symbols.into_iter().collect();
        let vocabulary = &self.local_vocabulary;
        self.descriptions.retain(|symbol, _| vocabulary.contains(symbol));
    }
}

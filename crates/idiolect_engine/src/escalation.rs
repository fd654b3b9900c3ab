//! Durable, ordered, per-receiver escalation inboxes.
//!
//! The root receiver's inbox is the fixed escalation target for collisions
//! detected without an available interpreter. Items must survive process
//! restart: the pending-collision set is reconstructed from them.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use idiolect_foundation::Result;

/// A durable, ordered inbox abstraction keyed by receiver name.
pub trait EscalationChannel {
    /// Appends an item to a receiver's inbox.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    fn append(&mut self, receiver: &str, content: &str) -> Result<()>;

    /// Removes and returns all items in a receiver's inbox, oldest first.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    fn drain(&mut self, receiver: &str) -> Result<Vec<String>>;

    /// Returns all items without removing them. Used to rebuild the
    /// pending-collision set on startup.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    fn snapshot(&self, receiver: &str) -> Result<Vec<String>>;
}

/// File-backed inbox: one `.inbox` file per receiver, one JSON-encoded
/// string per line so items may contain newlines.
#[derive(Debug)]
pub struct FileInbox {
    dir: PathBuf,
}

impl FileInbox {
    /// Creates an inbox store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, receiver: &str) -> PathBuf {
        self.dir.join(format!("{receiver}.inbox"))
    }

    fn read_lines(&self, receiver: &str) -> Result<Vec<String>> {
        let text = match std::fs::read_to_string(self.path(receiver)) {
            Ok(text) => text,
            Err(err) if err.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut items = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(item) = serde_json::from_str::<String>(line) {
                items.push(item);
            }
        }
        Ok(items)
    }
}

impl EscalationChannel for FileInbox {
    fn append(&mut self, receiver: &str, content: &str) -> Result<()> {
        let encoded = serde_json::to_string(content)
            .map_err(|e| idiolect_foundation::Error::internal(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(receiver))?;
        writeln!(file, "{encoded}")?;
        file.sync_all()?;
        Ok(())
    }

    fn drain(&mut self, receiver: &str) -> Result<Vec<String>> {
        let items = self.read_lines(receiver)?;
        if !items.is_empty() {
            let file = File::create(self.path(receiver))?;
            file.sync_all()?;
        }
        Ok(items)
    }

    fn snapshot(&self, receiver: &str) -> Result<Vec<String>> {
        self.read_lines(receiver)
    }
}

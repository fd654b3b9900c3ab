//! The append-only collision audit log.
//!
//! One line per entry:
//!
//! ```text
//! [ISO-8601 timestamp] KIND: ReceiverA ReceiverB #symbol — context
//! ```
//!
//! Entries are never deleted or rewritten. Unknown-symbol events carry a
//! single receiver name.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use idiolect_foundation::Result;

/// The kind of a collision-log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    /// A collision was detected but no interpreter was available.
    Unresolved,
    /// A collision was resolved by the interpreter.
    Resolved,
    /// A symbol resolved to `Unknown`.
    Unknown,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "UNRESOLVED COLLISION"),
            Self::Resolved => write!(f, "RESOLVED COLLISION"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Append-only handle on the collision log file.
#[derive(Debug)]
pub struct CollisionLog {
    path: PathBuf,
}

impl CollisionLog {
    /// Creates a log handle for the given file path. The file is created
    /// lazily on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one entry and flushes it before returning.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn append(
        &self,
        kind: LogKind,
        first: &str,
        second: Option<&str>,
        symbol: &str,
        context: &str,
    ) -> Result<()> {
        let receivers = match second {
            Some(second) => format!("{first} {second}"),
            None => first.to_string(),
        };
        let line = format!(
            "[{}] {kind}: {receivers} {symbol} — {context}\n",
            Utc::now().to_rfc3339()
        );
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Reads the raw log lines, oldest first. Missing file reads as empty.
    ///
    /// # Errors
    /// Returns an error on I/O failure other than a missing file.
    pub fn lines(&self) -> Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text.lines().map(ToString::to_string).collect()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

//! The `.hw` on-disk vocabulary format.
//!
//! Line-oriented and independent of the DSL lexer/parser, so bootstrap
//! never depends on the language layer. The format:
//!
//! ```text
//! # ReceiverName[ : ParentName]
//! - identity line
//! ## symbolRawName
//! - description line
//! "this span is a comment, skipped"
//! ```
//!
//! Symbol headings carry the raw name: `#` maps to the bare primitive
//! symbol, anything else gains the `#` prefix in memory. Writing never
//! duplicates or reorders existing headings: strictly-new symbols are
//! literal appends, and a grown description rewrites the document with
//! entry order preserved.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::Path;

use idiolect_foundation::{name, Result};

/// Document model for one `.hw` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabDoc {
    /// The receiver this file defines.
    pub receiver: String,
    /// Optional parent named on the Heading1 line.
    pub parent: Option<String>,
    /// Identity lines (list items before the first Heading2).
    pub identity: Vec<String>,
    /// Symbol entries in file order.
    pub entries: Vec<VocabEntry>,
}

/// One Heading2 and its description lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabEntry {
    /// The symbol, `#`-prefixed in memory.
    pub symbol: String,
    /// Description lines in file order.
    pub description: Vec<String>,
}

impl VocabDoc {
    /// Returns the entry for a symbol, if present.
    #[must_use]
    pub fn entry(&self, symbol: &str) -> Option<&VocabEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    fn entry_mut(&mut self, symbol: &str) -> Option<&mut VocabEntry> {
        self.entries.iter_mut().find(|e| e.symbol == symbol)
    }
}

/// Parses `.hw` text into a document. Returns `None` if the text has no
/// Heading1 line ("no receiver").
#[must_use]
pub fn parse(text: &str) -> Option<VocabDoc> {
    let text = strip_comments(text);
    let mut doc: Option<VocabDoc> = None;

    for line in text.lines() {
        let line = line.trim_end();
        match &mut doc {
            None => {
                if let Some(heading) = heading_text(line, "#") {
                    let (receiver, parent) = split_parent(heading);
                    doc = Some(VocabDoc {
                        receiver,
                        parent,
                        identity: Vec::new(),
                        entries: Vec::new(),
                    });
                }
            }
            Some(doc) => {
                if let Some(raw) = heading_text(line, "##") {
                    doc.entries.push(VocabEntry {
                        symbol: name::symbol_name(raw),
                        description: Vec::new(),
                    });
                } else if let Some(item) = heading_text(line, "-") {
                    match doc.entries.last_mut() {
                        Some(entry) => entry.description.push(item.to_string()),
                        None => doc.identity.push(item.to_string()),
                    }
                }
            }
        }
    }

    doc
}

/// Reads and parses a `.hw` file. A missing file yields "no receiver",
/// not an error.
///
/// # Errors
/// Returns an error only for I/O failures other than a missing file.
pub fn read(path: &Path) -> Result<Option<VocabDoc>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse(&text)),
        Err(err) if err.kind() == IoErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Renders a document in canonical form.
#[must_use]
pub fn render(doc: &VocabDoc) -> String {
    let mut out = String::new();
    match &doc.parent {
        Some(parent) => out.push_str(&format!("# {} : {}\n", doc.receiver, parent)),
        None => out.push_str(&format!("# {}\n", doc.receiver)),
    }
    for line in &doc.identity {
        out.push_str(&format!("- {line}\n"));
    }
    for entry in &doc.entries {
        out.push_str(&render_entry(entry));
    }
    out
}

/// Writes a fresh document, replacing any existing file. Used when a
/// vocabulary definition replaces a receiver's local vocabulary outright.
///
/// # Errors
/// Returns an error on I/O failure.
pub fn write_new(path: &Path, doc: &VocabDoc) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(render(doc).as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Merges a document into the file at `path`.
///
/// Symbols not yet present are literally appended; new description lines
/// under an existing heading rewrite the document with entry order
/// preserved. Existing headings are never duplicated. Symbols absent from
/// `doc` but present on disk are left untouched.
///
/// # Errors
/// Returns an error on I/O failure.
pub fn save(path: &Path, doc: &VocabDoc) -> Result<()> {
    let Some(existing) = read(path)? else {
        return write_new(path, doc);
    };

    let mut merged = existing.clone();
    let mut appended: Vec<VocabEntry> = Vec::new();
    let mut grew_existing = false;

    for entry in &doc.entries {
        match merged.entry_mut(&entry.symbol) {
            Some(present) => {
                for line in &entry.description {
                    if !present.description.contains(line) {
                        present.description.push(line.clone());
                        grew_existing = true;
                    }
                }
            }
            None => {
                merged.entries.push(entry.clone());
                appended.push(entry.clone());
            }
        }
    }

    if grew_existing {
        // An existing entry changed: rewrite the whole document, order
        // preserved.
        write_new(path, &merged)
    } else if appended.is_empty() {
        Ok(())
    } else {
        let mut file = OpenOptions::new().append(true).open(path)?;
        for entry in &appended {
            file.write_all(render_entry(entry).as_bytes())?;
        }
        file.sync_all()?;
        Ok(())
    }
}

/// Renders one entry: a blank separator, the heading, and its description
/// lines.
fn render_entry(entry: &VocabEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n## {}\n", name::symbol_raw(&entry.symbol)));
    for line in &entry.description {
        out.push_str(&format!("- {line}\n"));
    }
    out
}

/// Returns the text after a heading marker followed by whitespace, or
/// `None` if the line does not start with exactly that marker.
fn heading_text<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    // `#` must not match `##`.
    if rest.starts_with('#') {
        return None;
    }
    if rest.starts_with(' ') || rest.starts_with('\t') {
        Some(rest.trim())
    } else {
        None
    }
}

/// Splits a Heading1 into receiver and optional parent (`Name : Parent`).
fn split_parent(heading: &str) -> (String, Option<String>) {
    match heading.split_once(" : ") {
        Some((receiver, parent)) => (receiver.trim().to_string(), Some(parent.trim().to_string())),
        None => (heading.trim().to_string(), None),
    }
}

/// Removes double-quoted spans (which may cross lines) and `<!-- -->`
/// spans, mirroring the tokenizer's comment handling.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let quote = rest.find('"');
        let html = rest.find("<!--");
        match (quote, html) {
            (Some(q), h) if h.is_none_or(|h| q < h) => {
                out.push_str(&rest[..q]);
                rest = &rest[q + 1..];
                match rest.find('"') {
                    Some(end) => rest = &rest[end + 1..],
                    None => return out,
                }
            }
            (_, Some(h)) => {
                out.push_str(&rest[..h]);
                rest = &rest[h + 4..];
                match rest.find("-->") {
                    Some(end) => rest = &rest[end + 3..],
                    None => return out,
                }
            }
            _ => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

//! Naming conventions for receivers and symbols.
//!
//! Receivers are capitalized bare words; the legacy `@name` form is
//! normalized to the capitalized form, and a bare `@` denotes the root
//! receiver. Symbols carry a `#` prefix in memory; the bare primitive
//! symbol is `#` itself.

/// Name of the root receiver, the top of every parent chain and the fixed
/// escalation target.
pub const ROOT_RECEIVER: &str = "HelloWorld";

/// File extension for on-disk vocabulary files.
pub const VOCAB_EXTENSION: &str = "hw";

/// Normalizes a receiver name: capitalizes the first letter so that the
/// legacy `@codex` form resolves to `Codex`.
#[must_use]
pub fn normalize_receiver(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => ROOT_RECEIVER.to_string(),
    }
}

/// Maps a raw symbol name to its in-memory form: the raw name `#` is the
/// bare primitive symbol, anything else gains a `#` prefix.
#[must_use]
pub fn symbol_name(raw: &str) -> String {
    if raw == "#" || raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("#{raw}")
    }
}

/// Strips the `#` prefix from a symbol for on-disk headings. The bare
/// primitive symbol renders as `#` itself.
#[must_use]
pub fn symbol_raw(symbol: &str) -> &str {
    if symbol == "#" {
        symbol
    } else {
        symbol.strip_prefix('#').unwrap_or(symbol)
    }
}

/// Returns true if `word` follows the receiver convention (leading
/// uppercase letter).
#[must_use]
pub fn is_receiver_word(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

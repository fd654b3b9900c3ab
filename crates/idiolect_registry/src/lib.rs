//! Receiver registry, inheritance resolution, and vocabulary file I/O.
//!
//! This crate provides:
//! - [`Receiver`] - A named entity holding a local vocabulary
//! - [`Registry`] - The in-memory receiver graph with three-outcome lookup
//! - [`LookupResult`] - Native / inherited / unknown resolution outcomes
//! - [`vocab_file`] - The line-oriented `.hw` on-disk format
//!
//! The `.hw` reader is deliberately independent of the DSL lexer/parser so
//! that bootstrap never depends on the language layer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod receiver;
pub mod registry;
pub mod vocab_file;

pub use receiver::{Receiver, ReceiverId};
pub use registry::{LookupResult, Registry};
pub use vocab_file::{VocabDoc, VocabEntry};

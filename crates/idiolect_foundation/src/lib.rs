//! Error types and naming conventions for Idiolect.
//!
//! This crate provides:
//! - [`Error`] - The error taxonomy shared by all layers
//! - [`Result`] - Shared result alias
//! - Name conventions for receivers and symbols ([`name`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod name;

pub use error::{Error, ErrorKind, Result};
pub use name::{normalize_receiver, symbol_name, ROOT_RECEIVER, VOCAB_EXTENSION};

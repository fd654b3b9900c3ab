//! Idiolect - Symbolic dialogue engine
//!
//! This crate re-exports all layers of the Idiolect system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: idiolect_engine     — Dispatch, collision cascade, escalation
//! Layer 2: idiolect_registry   — Receivers, inheritance, .hw persistence
//! Layer 1: idiolect_language   — Lexer, parser, statement AST
//! Layer 0: idiolect_foundation — Core types (Error, naming conventions)
//! ```

pub use idiolect_engine as engine;
pub use idiolect_foundation as foundation;
pub use idiolect_language as language;
pub use idiolect_registry as registry;

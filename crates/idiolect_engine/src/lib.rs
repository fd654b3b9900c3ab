//! Statement dispatch and collision resolution for Idiolect.
//!
//! This crate provides:
//! - [`Engine`] - Owns a registry, pending-collision set, collision log,
//!   and escalation inbox for one vocabulary directory
//! - [`Interpreter`] - The narrow blocking seam to an external interpreter
//! - [`EscalationChannel`] / [`FileInbox`] - Durable per-receiver inboxes
//! - [`CollisionLog`] - The append-only collision audit log
//!
//! The engine is single-threaded and synchronous: one statement is fully
//! resolved, file writes included, before the next is processed. Run one
//! engine per vocabulary directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collision;
pub mod collision_log;
mod dispatch;
pub mod engine;
pub mod escalation;
pub mod interpreter;

pub use collision::CollisionArtifact;
pub use collision_log::{CollisionLog, LogKind};
pub use engine::{Engine, EngineConfig};
pub use escalation::{EscalationChannel, FileInbox};
pub use interpreter::{Interpreter, InterpreterError};

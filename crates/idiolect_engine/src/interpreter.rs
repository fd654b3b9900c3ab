//! The interpreter collaborator: the one external seam of the engine.
//!
//! The engine builds the prompt text and only consumes the returned
//! string; any non-success is treated as a Tier-2-equivalent failure and
//! never propagates out of the collision cascade. A caller that wants a
//! timeout implements it behind this trait and returns an error on
//! expiry.

use thiserror::Error;

/// Failure of an interpreter call. Always recoverable: the collision
/// engine downgrades Tier 1 to Tier 2 on any error.
#[derive(Debug, Error)]
#[error("interpreter call failed: {0}")]
pub struct InterpreterError(pub String);

impl InterpreterError {
    /// Creates an interpreter error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An external interpreter that renders a collision prompt into agreed
/// description text.
pub trait Interpreter {
    /// Interprets the prompt, returning the agreed text.
    ///
    /// # Errors
    /// Returns an error when the interpreter is unavailable or fails; the
    /// engine treats this as "no interpreter" for the current operation.
    fn call(&self, prompt: &str) -> Result<String, InterpreterError>;
}

/// Closures serve as interpreters, which keeps test doubles terse.
impl<F> Interpreter for F
where
    F: Fn(&str) -> Result<String, InterpreterError>,
{
    fn call(&self, prompt: &str) -> Result<String, InterpreterError> {
        self(prompt)
    }
}

//! Integration tests for Layer 3: Engine
//!
//! Tests for statement dispatch, the collision cascade, and the
//! escalation inbox.

mod dispatch;
mod inbox;

//! Collision artifacts and prompt construction.
//!
//! When a collision cannot be resolved immediately, a durable artifact is
//! queued on the root receiver's inbox. The artifact captures both sides'
//! vocabularies and descriptions at detection time; the pending-collision
//! set is re-derived from these artifacts on restart.

use chrono::{DateTime, Utc};
use idiolect_registry::{Receiver, ReceiverId, Registry};
use serde::{Deserialize, Serialize};

/// A queued, durable record of one unresolved collision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionArtifact {
    /// The colliding symbol, `#`-prefixed.
    pub symbol: String,
    /// The sending receiver's name.
    pub sender: String,
    /// The target receiver's name.
    pub target: String,
    /// The sender's local vocabulary at detection time.
    pub sender_vocabulary: Vec<String>,
    /// The target's local vocabulary at detection time.
    pub target_vocabulary: Vec<String>,
    /// The sender's existing description of the symbol, if any.
    pub sender_description: Option<String>,
    /// The target's existing description of the symbol, if any.
    pub target_description: Option<String>,
    /// When the collision was queued.
    pub queued_at: DateTime<Utc>,
}

impl CollisionArtifact {
    /// Captures an artifact from the current registry state.
    #[must_use]
    pub fn capture(
        registry: &Registry,
        sender: ReceiverId,
        target: ReceiverId,
        symbol: &str,
    ) -> Self {
        let sender = registry.receiver(sender);
        let target = registry.receiver(target);
        Self {
            symbol: symbol.to_string(),
            sender: sender.name().to_string(),
            target: target.name().to_string(),
            sender_vocabulary: sender.local_vocabulary().iter().cloned().collect(),
            target_vocabulary: target.local_vocabulary().iter().cloned().collect(),
            sender_description: sender.description(symbol).map(ToString::to_string),
            target_description: target.description(symbol).map(ToString::to_string),
            queued_at: Utc::now(),
        }
    }

    /// Serializes the artifact for the escalation channel.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Deserializes an artifact drained from the escalation channel.
    #[must_use]
    pub fn from_json(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }
}

/// Builds the Tier-1 collision prompt from live registry state: both
/// identities, both vocabularies, and any existing descriptions of the
/// symbol.
#[must_use]
pub fn build_prompt(
    registry: &Registry,
    sender: ReceiverId,
    target: ReceiverId,
    symbol: &str,
) -> String {
    let sender = registry.receiver(sender);
    let target = registry.receiver(target);
    let mut prompt = format!(
        "Two receivers hold the symbol {symbol} natively with potentially different meanings.\n\n"
    );
    prompt.push_str(&describe_side(sender, symbol));
    prompt.push_str(&describe_side(target, symbol));
    prompt.push_str(&format!(
        "Write one shared description of {symbol} that honors both perspectives."
    ));
    prompt
}

fn describe_side(receiver: &Receiver, symbol: &str) -> String {
    let vocabulary: Vec<&str> = receiver
        .local_vocabulary()
        .iter()
        .map(String::as_str)
        .collect();
    let mut side = format!("{}\n", receiver.name());
    if !receiver.identity().is_empty() {
        side.push_str(&format!("identity: {}\n", receiver.identity()));
    }
    side.push_str(&format!("vocabulary: [{}]\n", vocabulary.join(", ")));
    if let Some(description) = receiver.description(symbol) {
        side.push_str(&format!("{symbol}: {description}\n"));
    }
    side.push('\n');
    side
}

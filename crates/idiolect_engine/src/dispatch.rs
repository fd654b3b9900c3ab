//! Statement dispatch: the exhaustive match from parsed statements to
//! rendered result strings, including the cross-receiver send protocol.

use idiolect_foundation::{name, Result};
use idiolect_language::ast::{Argument, ReceiverPath, Statement, StatementKind};
use idiolect_registry::{LookupResult, ReceiverId};
use tracing::{info, warn};

use crate::collision::{self, CollisionArtifact};
use crate::collision_log::LogKind;
use crate::engine::Engine;
use crate::escalation::EscalationChannel;

impl Engine {
    /// Dispatches one statement, returning its rendered result.
    ///
    /// # Errors
    /// Returns path errors, configuration errors, and I/O errors. Unknown
    /// symbols and interpreter failures are outcomes, not errors.
    pub fn dispatch(&mut self, statement: &Statement) -> Result<String> {
        match &statement.kind {
            StatementKind::VocabularyDefinition { receiver, symbols } => {
                self.define_vocabulary(receiver, symbols)
            }
            StatementKind::VocabularyQuery { receiver } => self.query_vocabulary(receiver),
            StatementKind::DeepVocabularyQuery { receiver } => self.deep_query(receiver),
            StatementKind::ScopedLookup { receiver, symbol } => {
                self.scoped_lookup(receiver, symbol)
            }
            StatementKind::SuperLookup { receiver, symbol } => self.super_lookup(receiver, symbol),
            StatementKind::KeywordMessage {
                receiver,
                pairs,
                annotation,
            } => self.keyword_message(receiver, pairs, annotation.as_deref()),
            StatementKind::UnaryMessage {
                receiver,
                selector,
                is_super,
            } => self.unary_message(receiver, selector, *is_super),
        }
    }

    /// Resolves a statement's receiver path. A single unqualified name is
    /// brought into being on first mention; a qualified path must match
    /// the existing chain.
    fn resolve_receiver(&mut self, path: &ReceiverPath) -> Result<ReceiverId> {
        if path.segments.len() == 1 {
            self.ensure_receiver(path.leaf())
        } else {
            self.registry.resolve_path(&path.segments)
        }
    }

    /// `R. # → [#a, #b]`: replaces the receiver's local vocabulary and
    /// rewrites its file to match.
    fn define_vocabulary(&mut self, path: &ReceiverPath, symbols: &[String]) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        self.registry
            .receiver_mut(id)
            .define(symbols.iter().cloned());
        self.registry.save_replacing(id, &self.config.vocab_dir)?;
        let receiver = self.registry.receiver(id);
        info!(receiver = receiver.name(), symbols = symbols.len(), "vocabulary defined");
        Ok(render_vocabulary(receiver.name(), receiver.local_vocabulary().iter()))
    }

    /// `R. #` or bare `R`: lists the native vocabulary.
    fn query_vocabulary(&mut self, path: &ReceiverPath) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        let receiver = self.registry.receiver(id);
        Ok(render_vocabulary(receiver.name(), receiver.local_vocabulary().iter()))
    }

    /// `R. # #`: native plus inherited vocabulary, one line per chain
    /// level, nearest first.
    fn deep_query(&mut self, path: &ReceiverPath) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        let chain = self.registry.chain(id)?;
        let lines: Vec<String> = chain
            .iter()
            .map(|level| {
                let level_id = self
                    .registry
                    .id_of(level)
                    .unwrap_or(id);
                let receiver = self.registry.receiver(level_id);
                render_vocabulary(level, receiver.local_vocabulary().iter())
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// `R. #sym`: resolves one symbol against the chain. A pending
    /// collision on the symbol is resolved first if an interpreter has
    /// since become available.
    fn scoped_lookup(&mut self, path: &ReceiverPath, symbol: &str) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        if self.pending.contains(symbol) && self.interpreter.is_some() {
            self.resolve_pending(symbol)?;
        }
        let receiver_name = self.registry.receiver(id).name().to_string();
        match self.registry.lookup(id, symbol) {
            LookupResult::Native => {
                let description = self.registry.receiver(id).description(symbol);
                Ok(match description {
                    Some(text) => format!("{receiver_name} {symbol} → native: {text}"),
                    None => format!("{receiver_name} {symbol} → native"),
                })
            }
            LookupResult::Inherited { ancestor } => {
                Ok(format!("{receiver_name} {symbol} → inherited from {ancestor}"))
            }
            LookupResult::Unknown => {
                self.log
                    .append(LogKind::Unknown, &receiver_name, None, symbol, "scoped lookup")?;
                Ok(format!("UNKNOWN: {receiver_name} {symbol}"))
            }
        }
    }

    /// `R. #sym super`: reports the resolution at every level of the
    /// chain, nearest first.
    fn super_lookup(&mut self, path: &ReceiverPath, symbol: &str) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        let chain = self.registry.chain(id)?;
        let lines: Vec<String> = chain
            .iter()
            .map(|level| {
                let native = self
                    .registry
                    .id_of(level)
                    .is_some_and(|lid| self.registry.receiver(lid).is_native(symbol));
                if native {
                    format!("{level} defines {symbol}")
                } else {
                    format!("{level} does not define {symbol}")
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Keyword messages: `send:`/`to:` pairs are the cross-receiver send;
    /// anything else echoes back as an acknowledged message.
    fn keyword_message(
        &mut self,
        path: &ReceiverPath,
        pairs: &[(String, Argument)],
        annotation: Option<&str>,
    ) -> Result<String> {
        if let [(first, Argument::Symbol(symbol)), (second, Argument::Receiver(target))] =
            pairs
        {
            if first == "send" && second == "to" {
                return self.exec_send(path, symbol, target, annotation);
            }
        }

        let id = self.resolve_receiver(path)?;
        let receiver_name = self.registry.receiver(id).name().to_string();
        let rendered: Vec<String> = pairs
            .iter()
            .map(|(keyword, value)| format!("{keyword}: {value}"))
            .collect();
        let mut result = format!("{receiver_name} {}", rendered.join(" "));
        if let Some(note) = annotation {
            result.push_str(&format!(" '{note}'"));
        }
        Ok(result)
    }

    /// `R selector [super]`: resolves the selector as a symbol against the
    /// chain; with `super`, resolution starts at the parent.
    fn unary_message(
        &mut self,
        path: &ReceiverPath,
        selector: &str,
        is_super: bool,
    ) -> Result<String> {
        let id = self.resolve_receiver(path)?;
        let symbol = name::symbol_name(selector);
        let receiver_name = self.registry.receiver(id).name().to_string();

        let outcome = if is_super {
            match self.registry.receiver(id).parent() {
                Some(parent) => self.registry.lookup_above(parent, &symbol),
                None => LookupResult::Unknown,
            }
        } else {
            self.registry.lookup(id, &symbol)
        };

        match outcome {
            LookupResult::Native => Ok(format!("{receiver_name} {symbol} → native")),
            LookupResult::Inherited { ancestor } => {
                Ok(format!("{receiver_name} {symbol} → inherited from {ancestor}"))
            }
            LookupResult::Unknown => {
                self.log
                    .append(LogKind::Unknown, &receiver_name, None, &symbol, "unary message")?;
                Ok(format!("UNKNOWN: {receiver_name} {symbol}"))
            }
        }
    }

    /// The cross-receiver send protocol.
    fn exec_send(
        &mut self,
        sender_path: &ReceiverPath,
        symbol: &str,
        target_path: &ReceiverPath,
        annotation: Option<&str>,
    ) -> Result<String> {
        let sender = self.resolve_receiver(sender_path)?;
        let target = self.resolve_receiver(target_path)?;

        let sender_native = self.registry.receiver(sender).is_native(symbol);
        let target_native = self.registry.receiver(target).is_native(symbol);

        if sender_native && target_native {
            return self.collide(sender, target, symbol, annotation);
        }

        let sender_name = self.registry.receiver(sender).name().to_string();
        let target_name = self.registry.receiver(target).name().to_string();

        if sender_native {
            // Foreign event: the target learns the symbol with the
            // sender's meaning. Not a collision, so the collision log
            // stays untouched.
            let description = self
                .registry
                .receiver(sender)
                .description(symbol)
                .map(ToString::to_string);
            self.registry
                .add_symbol(target, symbol, description.as_deref());
            self.registry.save(target, &self.config.vocab_dir)?;
            info!(
                sender = %sender_name,
                target = %target_name,
                symbol,
                "foreign symbol learned"
            );
            return Ok(format!(
                "FOREIGN EVENT: {target_name} learns {symbol} from {sender_name}"
            ));
        }

        let sender_lookup = self.registry.lookup(sender, symbol);
        let target_lookup = self.registry.lookup(target, symbol);
        match (sender_lookup, target_lookup) {
            (_, LookupResult::Native) => Ok(format!(
                "{target_name} already speaks {symbol}; {sender_name} does not hold it natively"
            )),
            (
                LookupResult::Inherited {
                    ancestor: sender_ancestor,
                },
                LookupResult::Inherited {
                    ancestor: target_ancestor,
                },
            ) => {
                if sender_ancestor == target_ancestor {
                    Ok(format!(
                        "SHARED: {sender_name} and {target_name} inherit {symbol} from {sender_ancestor}"
                    ))
                } else {
                    Ok(format!(
                        "{sender_name} inherits {symbol} from {sender_ancestor}; \
                         {target_name} inherits it from {target_ancestor}"
                    ))
                }
            }
            _ => {
                self.log.append(
                    LogKind::Unknown,
                    &sender_name,
                    Some(&target_name),
                    symbol,
                    "send of a symbol unknown to both",
                )?;
                Ok(format!("UNKNOWN: {sender_name} {target_name} {symbol}"))
            }
        }
    }

    /// The three-tier collision cascade for a both-native send. Exactly
    /// one collision-log entry per call.
    fn collide(
        &mut self,
        sender: ReceiverId,
        target: ReceiverId,
        symbol: &str,
        annotation: Option<&str>,
    ) -> Result<String> {
        let prompt = collision::build_prompt(&self.registry, sender, target, symbol);
        let outcome = self.interpreter.as_ref().map(|i| i.call(&prompt));
        match outcome {
            Some(Ok(text)) => self.apply_resolution(sender, target, symbol, &text),
            Some(Err(err)) => {
                warn!(symbol, error = %err, "interpreter failed; escalating");
                self.escalate(sender, target, symbol, annotation)
            }
            None => self.escalate(sender, target, symbol, annotation),
        }
    }

    /// Tier 1 outcome: the agreed text becomes the shared description on
    /// both sides, in memory and on disk, before the send returns.
    fn apply_resolution(
        &mut self,
        sender: ReceiverId,
        target: ReceiverId,
        symbol: &str,
        text: &str,
    ) -> Result<String> {
        self.registry
            .receiver_mut(sender)
            .append_description(symbol, text);
        self.registry
            .receiver_mut(target)
            .append_description(symbol, text);
        self.registry.save(sender, &self.config.vocab_dir)?;
        self.registry.save(target, &self.config.vocab_dir)?;
        self.pending.remove(symbol);
        self.purge_artifacts(symbol)?;

        let sender_name = self.registry.receiver(sender).name().to_string();
        let target_name = self.registry.receiver(target).name().to_string();
        self.log.append(
            LogKind::Resolved,
            &sender_name,
            Some(&target_name),
            symbol,
            "interpreter agreed on a shared description",
        )?;
        info!(sender = %sender_name, target = %target_name, symbol, "collision resolved");
        Ok(format!(
            "RESOLVED COLLISION: {sender_name} {target_name} {symbol} — {text}"
        ))
    }

    /// Tier 2: queue a durable artifact on the root's inbox, mark the
    /// symbol pending, log, and move on without blocking.
    fn escalate(
        &mut self,
        sender: ReceiverId,
        target: ReceiverId,
        symbol: &str,
        annotation: Option<&str>,
    ) -> Result<String> {
        let artifact = CollisionArtifact::capture(&self.registry, sender, target, symbol);
        let root = self.config.root_receiver.clone();
        self.inbox.append(&root, &artifact.to_json())?;
        self.pending.insert(symbol.to_string());

        let context = match annotation {
            Some(note) => format!("escalated to {root} ({note})"),
            None => format!("escalated to {root}"),
        };
        self.log.append(
            LogKind::Unresolved,
            &artifact.sender,
            Some(&artifact.target),
            symbol,
            &context,
        )?;
        warn!(
            sender = %artifact.sender,
            target = %artifact.target,
            symbol,
            "collision escalated"
        );
        Ok(format!(
            "UNRESOLVED COLLISION: {} {} {symbol} — escalated to {root}",
            artifact.sender, artifact.target
        ))
    }

    /// Resolves one queued artifact against live registry state. `None`
    /// means the artifact stays queued (no interpreter, or the call
    /// failed).
    pub(crate) fn resolve_artifact(
        &mut self,
        artifact: &CollisionArtifact,
    ) -> Result<Option<String>> {
        let sender = self.ensure_receiver(&artifact.sender)?;
        let target = self.ensure_receiver(&artifact.target)?;
        let prompt = collision::build_prompt(&self.registry, sender, target, &artifact.symbol);
        let outcome = match self.interpreter.as_ref() {
            Some(interpreter) => interpreter.call(&prompt),
            None => return Ok(None),
        };
        match outcome {
            Ok(text) => Ok(Some(self.apply_resolution(
                sender,
                target,
                &artifact.symbol,
                &text,
            )?)),
            Err(err) => {
                warn!(symbol = %artifact.symbol, error = %err, "interpreter failed; collision stays pending");
                Ok(None)
            }
        }
    }

    /// Drops queued artifacts for a symbol whose collision has been
    /// resolved, so a restart does not resurrect it as pending.
    fn purge_artifacts(&mut self, symbol: &str) -> Result<()> {
        let root = self.config.root_receiver.clone();
        let items = self.inbox.drain(&root)?;
        for item in items {
            let keep = CollisionArtifact::from_json(&item)
                .is_some_and(|artifact| artifact.symbol != symbol);
            if keep {
                self.inbox.append(&root, &item)?;
            }
        }
        Ok(())
    }

    /// Lazy deferred resolution: drains only the artifacts queued for one
    /// symbol, requeueing everything else in order.
    fn resolve_pending(&mut self, symbol: &str) -> Result<()> {
        let root = self.config.root_receiver.clone();
        let items = self.inbox.drain(&root)?;
        for item in items {
            let keep = match CollisionArtifact::from_json(&item) {
                // Duplicates of an already-resolved symbol are dropped.
                Some(artifact) if artifact.symbol == symbol => {
                    self.pending.contains(symbol) && self.resolve_artifact(&artifact)?.is_none()
                }
                Some(_) => true,
                None => false,
            };
            if keep {
                self.inbox.append(&root, &item)?;
            }
        }
        Ok(())
    }
}

fn render_vocabulary<'a>(receiver: &str, symbols: impl Iterator<Item = &'a String>) -> String {
    let listed: Vec<&str> = symbols.map(String::as_str).collect();
    format!("{receiver} # → [{}]", listed.join(", "))
}

//! Action kind to handler lookup.

use crate::action::ActionHandler;
use crate::consensus::ActionKind;
use crate::core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registered handlers, one per action kind.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `kind`.
    pub fn register(&mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.insert(kind, handler)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(mut self, kind: ActionKind, handler: impl ActionHandler + 'static) -> Self {
        self.register(kind, Arc::new(handler));
        self
    }

    /// Handler for `kind`.
    pub fn get(&self, kind: ActionKind) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Target-dispatched kinds that have no handler, in declaration order.
    pub fn missing_kinds(&self) -> Vec<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .filter(|k| k.dispatches_to_target() && !self.contains(*k))
            .collect()
    }

    /// Fail on the first target-dispatched kind without a handler.
    pub fn ensure_complete(&self) -> Result<()> {
        match self.missing_kinds().first() {
            Some(kind) => Err(Error::UnsupportedAction(*kind)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
    }
}

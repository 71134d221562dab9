//! Registration scopes.
//!
//! Every animation, trigger, batch and media group is tagged with the innermost
//! open scope when it is created. Releasing a scope releases its descendants too.

use crate::ids::ScopeId;

#[derive(Clone, Debug)]
struct ScopeEntry {
    id: ScopeId,
    parent: ScopeId,
    label: String,
}

#[derive(Debug, Default)]
pub struct ScopeTable {
    entries: Vec<ScopeEntry>,
    /// Open scopes, innermost last. The root is implicit below the stack.
    stack: Vec<ScopeId>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost open scope.
    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::ROOT)
    }

    /// Register `id` as a child of the current scope and open it.
    pub(crate) fn open(&mut self, id: ScopeId, label: impl Into<String>) {
        self.entries.push(ScopeEntry {
            id,
            parent: self.current(),
            label: label.into(),
        });
        self.stack.push(id);
    }

    /// Register `id` under an explicit parent without opening it.
    pub(crate) fn adopt(&mut self, id: ScopeId, parent: ScopeId, label: impl Into<String>) {
        self.entries.push(ScopeEntry {
            id,
            parent,
            label: label.into(),
        });
    }

    /// Re-enter a registered scope, for callbacks that run later on its behalf.
    pub(crate) fn enter(&mut self, id: ScopeId) {
        self.stack.push(id);
    }

    /// Close the innermost scope if it is `id`. Mismatched closes are ignored.
    pub(crate) fn close(&mut self, id: ScopeId) {
        if !self.stack.contains(&id) {
            return;
        }
        if self.stack.last() == Some(&id) {
            self.stack.pop();
        } else {
            log::warn!("scope {:?} closed out of order", id);
            self.stack.retain(|s| *s != id);
        }
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn label(&self, id: ScopeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.parent)
    }

    /// Forget `id` and its descendants, returning all of them (`id` first).
    pub(crate) fn release(&mut self, id: ScopeId) -> Vec<ScopeId> {
        if id == ScopeId::ROOT {
            return Vec::new();
        }
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                self.entries
                    .iter()
                    .filter(|e| e.parent == parent)
                    .map(|e| e.id),
            );
            i += 1;
        }
        self.entries.retain(|e| !doomed.contains(&e.id));
        self.stack.retain(|s| !doomed.contains(s));
        doomed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::types::{NotificationId, RegistryEntry};

/// Session-scoped working set of observed notifications, keyed by id.
///
/// Pure bookkeeping; it never talks to the presenter. Entries keep their
/// own visibility and handle consistent (see [`RegistryEntry`]).
#[derive(Debug, Default)]
pub struct NotificationRegistry {
    entries: BTreeMap<NotificationId, RegistryEntry>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `id`, returning the previous one.
    pub fn upsert(&mut self, id: NotificationId, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries.insert(id, entry)
    }

    pub fn remove(&mut self, id: &NotificationId) -> Option<RegistryEntry> {
        self.entries.remove(id)
    }

    pub fn has(&self, id: &NotificationId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get_mut(&mut self, id: &NotificationId) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(id)
    }

    pub fn entries(&self) -> btree_map::Iter<'_, NotificationId, RegistryEntry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> btree_map::IterMut<'_, NotificationId, RegistryEntry> {
        self.entries.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NotificationId> {
        self.entries.keys()
    }

    pub fn visible_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_visible()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

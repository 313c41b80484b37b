//! The seen-set: ids that must not be presented again.
//!
//! Stored as a comma-joined list under a single key. Order carries no meaning;
//! the in-memory form is a `BTreeSet` so the serialized value is stable.

use std::collections::btree_set;
use std::collections::BTreeSet;

use super::errors::InvalidNotificationId;
use super::types::{NotificationId, ID_DELIMITER};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<NotificationId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the durable representation.
    ///
    /// Blank segments (e.g. from an empty value or a trailing comma) are skipped;
    /// any other segment that is not a valid id makes the whole value malformed.
    pub fn parse_storage(raw: &str) -> Result<Self, InvalidNotificationId> {
        raw.split(ID_DELIMITER)
            .filter(|segment| !segment.trim().is_empty())
            .map(NotificationId::new)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|ids| Self { ids })
    }

    pub fn to_storage_string(&self) -> String {
        let mut joined = String::new();
        for (index, id) in self.ids.iter().enumerate() {
            if index > 0 {
                joined.push(ID_DELIMITER);
            }
            joined.push_str(id.as_str());
        }
        joined
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not already present.
    pub fn insert(&mut self, id: NotificationId) -> bool {
        self.ids.insert(id)
    }

    /// Drops every id for which `keep` returns `false` and returns the dropped ids.
    pub fn retain_collect<F>(&mut self, mut keep: F) -> Vec<NotificationId>
    where
        F: FnMut(&NotificationId) -> bool,
    {
        let dropped: Vec<NotificationId> =
            self.ids.iter().filter(|id| !keep(id)).cloned().collect();
        for id in &dropped {
            self.ids.remove(id);
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, NotificationId> {
        self.ids.iter()
    }
}

impl Extend<NotificationId> for SeenSet {
    fn extend<T: IntoIterator<Item = NotificationId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

impl FromIterator<NotificationId> for SeenSet {
    fn from_iter<T: IntoIterator<Item = NotificationId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SeenSet {
    type Item = &'a NotificationId;
    type IntoIter = btree_set::Iter<'a, NotificationId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

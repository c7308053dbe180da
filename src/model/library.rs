use serde::{Deserialize, Serialize};

use super::item::ContentItem;

/// ID prefix for content items (e.g. `C-014`)
pub const ID_PREFIX: &str = "C";

/// The shared content store: every item of every user, including
/// soft-deleted ones. Normal access paths go through the scoped
/// accessors below, which enforce owner + active visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Library {
    /// All active (non-soft-deleted) items owned by `owner`.
    pub fn active(&self, owner: &str) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(move |i| i.owner_id == owner && i.is_active)
    }

    /// Find one active owned item by ID. Foreign-owned, inactive, and
    /// missing IDs all come back `None` — callers cannot tell them apart.
    pub fn find(&self, owner: &str, id: &str) -> Option<&ContentItem> {
        self.items
            .iter()
            .find(|i| i.id == id && i.owner_id == owner && i.is_active)
    }

    /// Mutable variant of [`find`](Self::find), same visibility rules.
    pub fn find_mut(&mut self, owner: &str, id: &str) -> Option<&mut ContentItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == id && i.owner_id == owner && i.is_active)
    }

    /// Next available item ID. Scans the highest existing numeric suffix
    /// across the whole store (including inactive items) so soft-deleted
    /// IDs are never reissued.
    pub fn next_id(&self) -> String {
        let prefix_dash = format!("{}-", ID_PREFIX);
        let mut max = 0usize;
        for item in &self.items {
            if let Some(num_str) = item.id.strip_prefix(&prefix_dash) {
                if let Ok(n) = num_str.parse::<usize>() {
                    if n > max {
                        max = n;
                    }
                }
            }
        }
        format!("{}-{:03}", ID_PREFIX, max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Subject;
    use chrono::{DateTime, Utc};

    fn now() -> DateTime<Utc> {
        "2026-08-24T10:00:00Z".parse().unwrap()
    }

    fn item(id: &str, owner: &str) -> ContentItem {
        ContentItem::new(
            id.into(),
            owner.into(),
            "body".into(),
            Subject::new("Math", "blue"),
            now(),
        )
    }

    fn sample_library() -> Library {
        let mut lib = Library::default();
        lib.items.push(item("C-001", "ana"));
        lib.items.push(item("C-002", "ana"));
        lib.items.push(item("C-003", "bob"));
        let mut deleted = item("C-004", "ana");
        deleted.is_active = false;
        lib.items.push(deleted);
        lib
    }

    #[test]
    fn test_active_scopes_by_owner_and_flag() {
        let lib = sample_library();
        let ids: Vec<_> = lib.active("ana").map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["C-001", "C-002"]);
    }

    #[test]
    fn test_find_hides_foreign_and_inactive() {
        let lib = sample_library();
        assert!(lib.find("ana", "C-001").is_some());
        // bob's item is invisible to ana
        assert!(lib.find("ana", "C-003").is_none());
        // soft-deleted item is invisible to its own owner
        assert!(lib.find("ana", "C-004").is_none());
        assert!(lib.find("ana", "C-999").is_none());
    }

    #[test]
    fn test_next_id_skips_deleted_ids() {
        let lib = sample_library();
        // C-004 is soft-deleted but its ID must not be reissued
        assert_eq!(lib.next_id(), "C-005");
        assert_eq!(Library::default().next_id(), "C-001");
    }
}

use chrono::{DateTime, Utc};

use crate::model::library::Library;
use crate::ops::item_ops;

/// Error type for action dispatch
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("unknown action '{0}' (expected: reviewed, archive, delete)")]
    UnknownAction(String),
}

/// The closed set of state-transition actions. Free-text action names are
/// rejected at the boundary instead of falling through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Record a completed review (advances the scheduler ladder)
    Reviewed,
    /// Set the archived flag
    Archive,
    /// Soft-delete
    Delete,
}

impl Action {
    pub fn parse(s: &str) -> Result<Action, ActionError> {
        match s {
            "reviewed" => Ok(Action::Reviewed),
            "archive" => Ok(Action::Archive),
            "delete" => Ok(Action::Delete),
            _ => Err(ActionError::UnknownAction(s.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Reviewed => "reviewed",
            Action::Archive => "archive",
            Action::Delete => "delete",
        }
    }
}

/// Apply an action to one item. Returns the matched count: 1 when an
/// active owned item was found, 0 otherwise. A zero is a silent no-op —
/// missing, foreign, and inactive IDs are indistinguishable here.
pub fn apply_action(
    library: &mut Library,
    owner: &str,
    id: &str,
    action: Action,
    now: DateTime<Utc>,
) -> usize {
    let result = match action {
        Action::Reviewed => item_ops::review_item(library, owner, id, now),
        Action::Archive => item_ops::archive_item(library, owner, id, now),
        Action::Delete => item_ops::soft_delete_item(library, owner, id, now),
    };
    match result {
        Ok(()) => 1,
        Err(item_ops::ItemError::NotFound(_)) => 0,
    }
}

/// Apply one action across a set of IDs, reporting only the modified
/// count. Unmatched IDs are skipped, never an error.
pub fn apply_bulk(
    library: &mut Library,
    owner: &str,
    ids: &[String],
    action: Action,
    now: DateTime<Utc>,
) -> usize {
    ids.iter()
        .map(|id| apply_action(library, owner, id, action, now))
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{ContentItem, ReviewStage, Subject};

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
        lib.items.push(item("C-003", "ana"));
        lib.items.push(item("C-004", "bob"));
        lib
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert!(matches!(Action::parse("reviewed"), Ok(Action::Reviewed)));
        assert!(matches!(Action::parse("archive"), Ok(Action::Archive)));
        assert!(matches!(Action::parse("delete"), Ok(Action::Delete)));
        let err = Action::parse("shred").unwrap_err();
        assert!(err.to_string().contains("shred"));
    }

    #[test]
    fn test_reviewed_advances_the_ladder() {
        let mut lib = sample_library();
        lib.find_mut("ana", "C-001").unwrap().review_count = 1;

        let matched = apply_action(&mut lib, "ana", "C-001", Action::Reviewed, now());
        assert_eq!(matched, 1);
        let item = lib.find("ana", "C-001").unwrap();
        assert_eq!(item.review_count, 2);
        assert_eq!(item.review_stage, ReviewStage::Weekly);
        assert_eq!(item.next_review_date, Some(now()));
    }

    #[test]
    fn test_delete_then_further_actions_miss() {
        let mut lib = sample_library();
        assert_eq!(
            apply_action(&mut lib, "ana", "C-001", Action::Delete, now()),
            1
        );
        // The soft-deleted item no longer matches anything
        assert_eq!(
            apply_action(&mut lib, "ana", "C-001", Action::Archive, now()),
            0
        );
        assert_eq!(
            apply_action(&mut lib, "ana", "C-001", Action::Delete, now()),
            0
        );
    }

    #[test]
    fn test_foreign_and_missing_ids_are_silent_noops() {
        let mut lib = sample_library();
        assert_eq!(
            apply_action(&mut lib, "ana", "C-004", Action::Archive, now()),
            0
        );
        assert_eq!(
            apply_action(&mut lib, "ana", "C-999", Action::Archive, now()),
            0
        );
        assert!(!lib.find("bob", "C-004").unwrap().archived);
    }

    #[test]
    fn test_bulk_counts_only_matches() {
        let mut lib = sample_library();
        let ids: Vec<String> = ["C-001", "C-404", "C-003"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let modified = apply_bulk(&mut lib, "ana", &ids, Action::Archive, now());
        assert_eq!(modified, 2);
        assert!(lib.find("ana", "C-001").unwrap().archived);
        assert!(!lib.find("ana", "C-002").unwrap().archived);
        assert!(lib.find("ana", "C-003").unwrap().archived);
    }

    #[test]
    fn test_bulk_archive_twice_still_matches() {
        let mut lib = sample_library();
        let ids = vec!["C-001".to_string(), "C-002".to_string()];
        assert_eq!(apply_bulk(&mut lib, "ana", &ids, Action::Archive, now()), 2);
        // archived does not touch is_active, so the repeat matches too
        assert_eq!(apply_bulk(&mut lib, "ana", &ids, Action::Archive, now()), 2);
    }

    #[test]
    fn test_bulk_delete_excludes_foreign_items() {
        let mut lib = sample_library();
        let ids: Vec<String> = ["C-001", "C-004"].iter().map(|s| s.to_string()).collect();
        let modified = apply_bulk(&mut lib, "ana", &ids, Action::Delete, now());
        assert_eq!(modified, 1);
        assert!(lib.find("bob", "C-004").unwrap().is_active);
    }
}

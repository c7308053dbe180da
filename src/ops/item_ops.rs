use chrono::{DateTime, Utc};

use crate::model::item::{ContentItem, Difficulty, ReviewStage, Subject};
use crate::model::library::Library;

/// Error type for item operations
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Missing, foreign-owned, and soft-deleted IDs all surface as this
    /// one variant so an unauthorized probe looks identical to a miss.
    #[error("content not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Fields supplied at creation time.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub title: Option<String>,
    pub content: String,
    pub subject_name: String,
    pub subject_color: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub estimated_time: Option<String>,
}

/// Add a new item for `owner`. Review history always starts fresh:
/// count 0, daily stage, due immediately. Returns the assigned ID.
pub fn add_item(
    library: &mut Library,
    owner: &str,
    new: NewItem,
    default_color: &str,
    now: DateTime<Utc>,
) -> String {
    let id = library.next_id();
    let color = new
        .subject_color
        .unwrap_or_else(|| default_color.to_string());
    let mut item = ContentItem::new(
        id.clone(),
        owner.to_string(),
        new.content,
        Subject::new(new.subject_name, color),
        now,
    );
    item.title = new.title;
    item.tags = new.tags;
    if let Some(difficulty) = new.difficulty {
        item.difficulty = difficulty;
    }
    item.estimated_time = new.estimated_time;
    library.items.push(item);
    id
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Fetch one active owned item.
pub fn get_item<'a>(
    library: &'a Library,
    owner: &str,
    id: &str,
) -> Result<&'a ContentItem, ItemError> {
    library
        .find(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// Field overwrites for an edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub subject_name: Option<String>,
    pub subject_color: Option<String>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    /// The stage is normally derived, but an edit may set it directly.
    pub review_stage: Option<ReviewStage>,
    pub estimated_time: Option<String>,
}

/// Overwrite item fields. No version check: concurrent edits to the same
/// item last-write-win.
pub fn update_item(
    library: &mut Library,
    owner: &str,
    id: &str,
    patch: ItemPatch,
    now: DateTime<Utc>,
) -> Result<(), ItemError> {
    let item = library
        .find_mut(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))?;

    if let Some(title) = patch.title {
        item.title = Some(title);
    }
    if let Some(content) = patch.content {
        item.content = content;
    }
    if let Some(name) = patch.subject_name {
        item.subject.name = name;
    }
    if let Some(color) = patch.subject_color {
        item.subject.color = color;
    }
    if let Some(tags) = patch.tags {
        item.tags = tags;
    }
    if let Some(difficulty) = patch.difficulty {
        item.difficulty = difficulty;
    }
    if let Some(stage) = patch.review_stage {
        item.review_stage = stage;
    }
    if let Some(estimated_time) = patch.estimated_time {
        item.estimated_time = Some(estimated_time);
    }
    item.updated_at = now;
    Ok(())
}

/// Record one completed review through the scheduler.
pub fn review_item(
    library: &mut Library,
    owner: &str,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(), ItemError> {
    let item = library
        .find_mut(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))?;
    crate::ops::schedule::record_review(item, now);
    Ok(())
}

/// Soft-delete: the item stays in storage but leaves every normal path.
pub fn soft_delete_item(
    library: &mut Library,
    owner: &str,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(), ItemError> {
    let item = library
        .find_mut(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))?;
    item.is_active = false;
    item.updated_at = now;
    Ok(())
}

/// Set the archived flag. Independent of `is_active`, so archiving twice
/// still matches and succeeds.
pub fn archive_item(
    library: &mut Library,
    owner: &str,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(), ItemError> {
    let item = library
        .find_mut(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))?;
    item.archived = true;
    item.updated_at = now;
    Ok(())
}

// ---------------------------------------------------------------------------
// Duplication
// ---------------------------------------------------------------------------

/// Copy an item under a fresh ID. The copy restarts the review ladder
/// (count 0, daily stage, due now) no matter how far the source climbed;
/// all other fields carry over. Returns the new ID.
pub fn duplicate_item(
    library: &mut Library,
    owner: &str,
    id: &str,
    now: DateTime<Utc>,
) -> Result<String, ItemError> {
    let source = library
        .find(owner, id)
        .ok_or_else(|| ItemError::NotFound(id.to_string()))?
        .clone();

    let new_id = library.next_id();
    let mut copy = source;
    copy.id = new_id.clone();
    copy.title = Some(format!("{} (Copy)", copy.display_title()));
    copy.review_count = 0;
    copy.review_stage = ReviewStage::Daily;
    copy.next_review_date = Some(now);
    copy.created_at = now;
    copy.updated_at = now;
    library.items.push(copy);
    Ok(new_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::schedule;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-08-24T10:00:00Z".parse().unwrap()
    }

    fn sample_library() -> Library {
        let mut lib = Library::default();
        add_item(
            &mut lib,
            "ana",
            NewItem {
                title: Some("Eigenvalues".into()),
                content: "Av = λv".into(),
                subject_name: "Math".into(),
                subject_color: Some("blue".into()),
                tags: vec!["linear-algebra".into()],
                difficulty: Some(Difficulty::Hard),
                estimated_time: Some("10 min".into()),
            },
            "gray",
            now(),
        );
        add_item(
            &mut lib,
            "bob",
            NewItem {
                content: "bob's note".into(),
                subject_name: "History".into(),
                ..Default::default()
            },
            "gray",
            now(),
        );
        lib
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut lib = sample_library();
        let id = add_item(
            &mut lib,
            "ana",
            NewItem {
                content: "more".into(),
                subject_name: "Math".into(),
                ..Default::default()
            },
            "gray",
            now(),
        );
        assert_eq!(id, "C-003");
        let item = lib.find("ana", "C-003").unwrap();
        assert_eq!(item.review_count, 0);
        assert_eq!(item.review_stage, ReviewStage::Daily);
        assert_eq!(item.subject.color, "gray");
    }

    #[test]
    fn test_get_item_tenant_isolation() {
        let lib = sample_library();
        assert!(get_item(&lib, "ana", "C-001").is_ok());
        // bob probing ana's item gets the same error as a missing ID
        let foreign = get_item(&lib, "bob", "C-001").unwrap_err();
        let missing = get_item(&lib, "bob", "C-999").unwrap_err();
        assert_eq!(foreign.to_string(), "content not found: C-001");
        assert_eq!(missing.to_string(), "content not found: C-999");
    }

    #[test]
    fn test_update_overwrites_and_bumps_updated_at() {
        let mut lib = sample_library();
        let later = now() + Duration::hours(1);
        update_item(
            &mut lib,
            "ana",
            "C-001",
            ItemPatch {
                title: Some("Spectra".into()),
                tags: Some(vec!["spectral".into()]),
                review_stage: Some(ReviewStage::Monthly),
                ..Default::default()
            },
            later,
        )
        .unwrap();
        let item = lib.find("ana", "C-001").unwrap();
        assert_eq!(item.title.as_deref(), Some("Spectra"));
        assert_eq!(item.tags, vec!["spectral".to_string()]);
        assert_eq!(item.review_stage, ReviewStage::Monthly);
        assert_eq!(item.updated_at, later);
        // Untouched fields survive
        assert_eq!(item.content, "Av = λv");
        assert_eq!(item.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_update_foreign_item_leaves_it_unchanged() {
        let mut lib = sample_library();
        let result = update_item(
            &mut lib,
            "bob",
            "C-001",
            ItemPatch {
                title: Some("hijacked".into()),
                ..Default::default()
            },
            now(),
        );
        assert!(result.is_err());
        let item = lib.find("ana", "C-001").unwrap();
        assert_eq!(item.title.as_deref(), Some("Eigenvalues"));
    }

    #[test]
    fn test_soft_delete_then_invisible_to_all_ops() {
        let mut lib = sample_library();
        soft_delete_item(&mut lib, "ana", "C-001", now()).unwrap();
        assert!(get_item(&lib, "ana", "C-001").is_err());
        assert!(archive_item(&mut lib, "ana", "C-001", now()).is_err());
        assert!(duplicate_item(&mut lib, "ana", "C-001", now()).is_err());
        // Still in storage
        assert_eq!(lib.items.len(), 2);
    }

    #[test]
    fn test_archive_is_idempotent() {
        let mut lib = sample_library();
        archive_item(&mut lib, "ana", "C-001", now()).unwrap();
        // archived does not affect is_active, so the second call still matches
        archive_item(&mut lib, "ana", "C-001", now()).unwrap();
        let item = lib.find("ana", "C-001").unwrap();
        assert!(item.archived);
        assert!(item.is_active);
    }

    #[test]
    fn test_duplicate_resets_review_ladder() {
        let mut lib = sample_library();
        // Climb the source to yearly
        for _ in 0..8 {
            let item = lib.find_mut("ana", "C-001").unwrap();
            schedule::record_review(item, now());
        }
        assert_eq!(
            lib.find("ana", "C-001").unwrap().review_stage,
            ReviewStage::Yearly
        );

        let later = now() + Duration::days(1);
        let new_id = duplicate_item(&mut lib, "ana", "C-001", later).unwrap();
        let copy = lib.find("ana", &new_id).unwrap();
        assert_eq!(copy.review_count, 0);
        assert_eq!(copy.review_stage, ReviewStage::Daily);
        assert_eq!(copy.next_review_date, Some(later));
        assert_eq!(copy.title.as_deref(), Some("Eigenvalues (Copy)"));
        // Everything else carries over
        assert_eq!(copy.content, "Av = λv");
        assert_eq!(copy.tags, vec!["linear-algebra".to_string()]);
        assert_eq!(copy.difficulty, Difficulty::Hard);
        assert_eq!(copy.estimated_time.as_deref(), Some("10 min"));
    }

    #[test]
    fn test_duplicate_untitled_source() {
        let mut lib = sample_library();
        let new_id = duplicate_item(&mut lib, "bob", "C-002", now()).unwrap();
        let copy = lib.find("bob", &new_id).unwrap();
        assert_eq!(copy.title.as_deref(), Some("Untitled (Copy)"));
    }
}

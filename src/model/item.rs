use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often an item is expected to resurface for review.
///
/// The ladder is one-directional: an item only climbs as its review count
/// grows (see `ops::schedule`). Derived `Ord` follows ladder position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStage {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReviewStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStage::Daily => "daily",
            ReviewStage::Weekly => "weekly",
            ReviewStage::Monthly => "monthly",
            ReviewStage::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<ReviewStage> {
        match s {
            "daily" => Some(ReviewStage::Daily),
            "weekly" => Some(ReviewStage::Weekly),
            "monthly" => Some(ReviewStage::Monthly),
            "yearly" => Some(ReviewStage::Yearly),
            _ => None,
        }
    }
}

/// Self-assessed difficulty. Derived `Ord` is easy < medium < hard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Difficulty> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A display category. Not a normalized entity: items match on `name` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    /// Display color token (free text, e.g. "blue")
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "gray".to_string()
}

impl Subject {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Subject {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Fallback estimated-time label for items that never got one.
pub const DEFAULT_ESTIMATED_TIME: &str = "5 min";

/// A single piece of study content with its review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Opaque unique identifier, assigned at creation (e.g. `C-014`)
    pub id: String,
    /// Owning user. Every read and write is scoped to this.
    pub owner_id: String,
    /// Optional title — rendered as "Untitled" when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text
    pub content: String,
    pub subject: Subject,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub review_stage: ReviewStage,
    /// Incremented exactly once per "reviewed" action
    #[serde(default)]
    pub review_count: u32,
    /// Free-text duration label like "5 min" (leading integer = minutes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    /// The item is due when this is at or before now.
    /// Absent means "due now" — never persisted as null by creation paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// false = soft-deleted: retained in storage, invisible to normal paths
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub archived: bool,
}

fn default_true() -> bool {
    true
}

impl ContentItem {
    /// Create a new item at the start of the review ladder, due immediately.
    pub fn new(
        id: String,
        owner_id: String,
        content: String,
        subject: Subject,
        now: DateTime<Utc>,
    ) -> Self {
        ContentItem {
            id,
            owner_id,
            title: None,
            content,
            subject,
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            review_stage: ReviewStage::default(),
            review_count: 0,
            estimated_time: None,
            next_review_date: Some(now),
            created_at: now,
            updated_at: now,
            is_active: true,
            archived: false,
        }
    }

    /// Title for display ("Untitled" when absent)
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Estimated-time label for display ("5 min" when absent)
    pub fn estimated_time_label(&self) -> &str {
        self.estimated_time
            .as_deref()
            .unwrap_or(DEFAULT_ESTIMATED_TIME)
    }

    /// Minutes parsed from the leading integer of the estimated-time label.
    /// Labels with no leading integer count as zero.
    pub fn estimated_minutes(&self) -> u32 {
        let label = self.estimated_time_label();
        let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }

    /// Effective due date: a missing `next_review_date` reads as "now".
    pub fn due_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.next_review_date.unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-08-24T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_new_item_starts_on_ladder_bottom() {
        let item = ContentItem::new(
            "C-001".into(),
            "ana".into(),
            "body".into(),
            Subject::new("Math", "blue"),
            now(),
        );
        assert_eq!(item.review_count, 0);
        assert_eq!(item.review_stage, ReviewStage::Daily);
        assert_eq!(item.next_review_date, Some(now()));
        assert!(item.is_active);
        assert!(!item.archived);
    }

    #[test]
    fn test_display_defaults() {
        let mut item = ContentItem::new(
            "C-001".into(),
            "ana".into(),
            "body".into(),
            Subject::new("Math", "blue"),
            now(),
        );
        assert_eq!(item.display_title(), "Untitled");
        assert_eq!(item.estimated_time_label(), "5 min");
        item.title = Some("Eigenvalues".into());
        assert_eq!(item.display_title(), "Eigenvalues");
    }

    #[test]
    fn test_estimated_minutes_leading_integer() {
        let mut item = ContentItem::new(
            "C-001".into(),
            "ana".into(),
            "body".into(),
            Subject::new("Math", "blue"),
            now(),
        );
        assert_eq!(item.estimated_minutes(), 5); // default "5 min"
        item.estimated_time = Some("15 minutes".into());
        assert_eq!(item.estimated_minutes(), 15);
        item.estimated_time = Some("about an hour".into());
        assert_eq!(item.estimated_minutes(), 0);
    }

    #[test]
    fn test_due_date_missing_reads_as_now() {
        let mut item = ContentItem::new(
            "C-001".into(),
            "ana".into(),
            "body".into(),
            Subject::new("Math", "blue"),
            now(),
        );
        item.next_review_date = None;
        assert_eq!(item.due_date(now()), now());
    }

    #[test]
    fn test_serde_defaults_on_minimal_object() {
        let json = r#"{
            "id": "C-001",
            "owner_id": "ana",
            "content": "body",
            "subject": {"name": "Math"},
            "created_at": "2026-08-24T10:00:00Z",
            "updated_at": "2026-08-24T10:00:00Z"
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.subject.color, "gray");
        assert_eq!(item.difficulty, Difficulty::Medium);
        assert_eq!(item.review_stage, ReviewStage::Daily);
        assert_eq!(item.review_count, 0);
        assert!(item.tags.is_empty());
        assert!(item.is_active);
        assert!(!item.archived);
    }

    #[test]
    fn test_stage_and_difficulty_round_trip() {
        for s in ["daily", "weekly", "monthly", "yearly"] {
            assert_eq!(ReviewStage::from_str(s).unwrap().as_str(), s);
        }
        for d in ["easy", "medium", "hard"] {
            assert_eq!(Difficulty::from_str(d).unwrap().as_str(), d);
        }
        assert!(ReviewStage::from_str("hourly").is_none());
        assert!(Difficulty::from_str("brutal").is_none());
    }

    #[test]
    fn test_stage_order_follows_ladder() {
        assert!(ReviewStage::Daily < ReviewStage::Weekly);
        assert!(ReviewStage::Weekly < ReviewStage::Monthly);
        assert!(ReviewStage::Monthly < ReviewStage::Yearly);
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
    }
}

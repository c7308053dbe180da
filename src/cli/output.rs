use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::item::{ContentItem, Difficulty, ReviewStage, Subject};
use crate::ops::query::{LibraryStats, Pagination, SortKey, SortOrder};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub title: String,
    pub content: String,
    pub subject: Subject,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub review_stage: ReviewStage,
    pub review_count: u32,
    pub estimated_time: String,
    /// Calendar day, e.g. "2026-08-24"
    pub next_review: String,
    /// Calendar day the item was added
    pub date_added: String,
}

#[derive(Serialize)]
pub struct ListJson {
    pub items: Vec<ItemJson>,
    pub pagination: Pagination,
    pub stats: LibraryStats,
}

#[derive(Serialize)]
pub struct TodayJson {
    pub items: Vec<ItemJson>,
    pub due_count: usize,
    /// Sum of leading-integer minutes across due items
    pub estimated_minutes: u32,
}

#[derive(Serialize)]
pub struct IdJson {
    pub id: String,
}

#[derive(Serialize)]
pub struct BulkJson {
    pub action: String,
    pub modified_count: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn day(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert an item to its wire shape. Dates normalize to calendar days;
/// display defaults are applied.
pub fn item_to_json(item: &ContentItem, now: DateTime<Utc>) -> ItemJson {
    ItemJson {
        id: item.id.clone(),
        title: item.display_title().to_string(),
        content: item.content.clone(),
        subject: item.subject.clone(),
        tags: item.tags.clone(),
        difficulty: item.difficulty,
        review_stage: item.review_stage,
        review_count: item.review_count,
        estimated_time: item.estimated_time_label().to_string(),
        next_review: day(item.due_date(now)),
        date_added: day(item.created_at),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single item as a one-line summary
pub fn format_item_line(item: &ContentItem, now: DateTime<Utc>) -> String {
    let tags_str = if item.tags.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            item.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    format!(
        "{} [{}] {}{} ({}, due {})",
        item.id,
        item.review_stage.as_str(),
        item.display_title(),
        tags_str,
        item.subject.name,
        day(item.due_date(now)),
    )
}

/// Format detailed item view
pub fn format_item_detail(item: &ContentItem, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{} {}", item.id, item.display_title()));
    lines.push(format!(
        "subject: {} ({})",
        item.subject.name, item.subject.color
    ));
    if !item.tags.is_empty() {
        lines.push(format!(
            "tags: {}",
            item.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    lines.push(format!("difficulty: {}", item.difficulty.as_str()));
    lines.push(format!(
        "stage: {} (reviewed {} times)",
        item.review_stage.as_str(),
        item.review_count
    ));
    lines.push(format!("estimated: {}", item.estimated_time_label()));
    lines.push(format!("next review: {}", day(item.due_date(now))));
    lines.push(format!("added: {}", day(item.created_at)));
    lines.push(format!("updated: {}", day(item.updated_at)));
    if item.archived {
        lines.push("archived: yes".to_string());
    }
    lines.push(String::new());
    for line in item.content.lines() {
        lines.push(line.to_string());
    }
    lines
}

/// Format library statistics
pub fn format_stats(name: &str, stats: &LibraryStats) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "== {} ({} items, {} due) ==",
        name, stats.total_items, stats.due_today
    ));
    lines.push(format!(
        "stages:      {} daily / {} weekly / {} monthly / {} yearly",
        stats.review_stages.daily,
        stats.review_stages.weekly,
        stats.review_stages.monthly,
        stats.review_stages.yearly
    ));
    lines.push(format!(
        "difficulty:  {} easy / {} medium / {} hard",
        stats.difficulties.easy, stats.difficulties.medium, stats.difficulties.hard
    ));
    if !stats.subjects.is_empty() {
        let subjects = stats
            .subjects
            .iter()
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("subjects:    {}", subjects));
    }
    lines
}

// ---------------------------------------------------------------------------
// Flag parsing
// ---------------------------------------------------------------------------

pub fn parse_stage(s: &str) -> Result<ReviewStage, String> {
    ReviewStage::from_str(s).ok_or_else(|| {
        format!(
            "unknown stage '{}' (expected: daily, weekly, monthly, yearly)",
            s
        )
    })
}

pub fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s)
        .ok_or_else(|| format!("unknown difficulty '{}' (expected: easy, medium, hard)", s))
}

pub fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    SortKey::from_str(s).ok_or_else(|| {
        format!(
            "unknown sort key '{}' (expected: created, title, next-review, difficulty, stage)",
            s
        )
    })
}

pub fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    SortOrder::from_str(s)
        .ok_or_else(|| format!("unknown sort order '{}' (expected: asc, desc)", s))
}

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::model::item::{ContentItem, Difficulty, ReviewStage};
use crate::model::library::Library;
use crate::ops::schedule;

// ---------------------------------------------------------------------------
// Query description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Creation time (the default)
    #[default]
    Created,
    Title,
    NextReview,
    Difficulty,
    Stage,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<SortKey> {
        match s {
            "created" => Some(SortKey::Created),
            "title" => Some(SortKey::Title),
            "next-review" => Some(SortKey::NextReview),
            "difficulty" => Some(SortKey::Difficulty),
            "stage" => Some(SortKey::Stage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Option<SortOrder> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Ad-hoc filters, sort, and page window for one list read.
///
/// The filters narrow the returned page and the pagination total only —
/// never the aggregate statistics, which always cover the owner's whole
/// active library.
#[derive(Debug, Default)]
pub struct ListQuery {
    /// Exact match against `subject.name`
    pub subject: Option<String>,
    pub stage: Option<ReviewStage>,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring match over title, content, tags, and
    /// subject name (build with [`substring_pattern`])
    pub search: Option<Regex>,
    pub sort: SortKey,
    pub order: SortOrder,
    /// 1-based; 0 is treated as page 1
    pub page: usize,
    /// 0 falls back to the default page size
    pub limit: usize,
}

/// Default page size when neither the query nor the config supplies one.
pub const DEFAULT_LIMIT: usize = 20;

/// Compile a free-text search into a case-insensitive substring matcher.
pub fn substring_pattern(text: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", regex::escape(text)))
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    /// Items matching the ad-hoc filters (not just this page)
    pub total: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub yearly: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

/// Aggregate statistics over ALL of an owner's active items, regardless
/// of whatever filter the current list view applies. The UI relies on
/// this asymmetry to show "X due today" next to a filtered list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LibraryStats {
    pub total_items: usize,
    pub due_today: usize,
    pub review_stages: StageCounts,
    pub difficulties: DifficultyCounts,
    /// Subject name → item count, in first-seen order
    pub subjects: IndexMap<String, usize>,
}

/// One logically atomic list read: a filtered page, pagination math over
/// the filtered total, and whole-library statistics.
#[derive(Debug)]
pub struct ListResult {
    pub items: Vec<ContentItem>,
    pub pagination: Pagination,
    pub stats: LibraryStats,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run a list query for one owner.
///
/// Returned items are clones with display defaults filled in (title,
/// estimated time, due date); soft-deleted and foreign items are never
/// considered.
pub fn run_query(
    library: &Library,
    owner: &str,
    query: &ListQuery,
    now: DateTime<Utc>,
) -> ListResult {
    let mut matching: Vec<&ContentItem> = library
        .active(owner)
        .filter(|item| matches_query(item, query))
        .collect();
    sort_items(&mut matching, query.sort, query.order, now);

    let total = matching.len();
    let limit = if query.limit == 0 {
        DEFAULT_LIMIT
    } else {
        query.limit
    };
    let page = query.page.max(1);
    let pages = total.div_ceil(limit);
    let skip = (page - 1) * limit;

    let items = matching
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|item| filled(item, now))
        .collect();

    ListResult {
        items,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
        stats: collect_stats(library, owner, now),
    }
}

/// Aggregate statistics over the owner's whole active library.
pub fn collect_stats(library: &Library, owner: &str, now: DateTime<Utc>) -> LibraryStats {
    let mut stats = LibraryStats::default();
    for item in library.active(owner) {
        stats.total_items += 1;
        match item.review_stage {
            ReviewStage::Daily => stats.review_stages.daily += 1,
            ReviewStage::Weekly => stats.review_stages.weekly += 1,
            ReviewStage::Monthly => stats.review_stages.monthly += 1,
            ReviewStage::Yearly => stats.review_stages.yearly += 1,
        }
        match item.difficulty {
            Difficulty::Easy => stats.difficulties.easy += 1,
            Difficulty::Medium => stats.difficulties.medium += 1,
            Difficulty::Hard => stats.difficulties.hard += 1,
        }
        *stats.subjects.entry(item.subject.name.clone()).or_insert(0) += 1;
        if schedule::is_due(item, now) {
            stats.due_today += 1;
        }
    }
    stats
}

/// The owner's due items as of `now`, soonest-due first, defaults filled.
pub fn due_items(library: &Library, owner: &str, now: DateTime<Utc>) -> Vec<ContentItem> {
    let mut due: Vec<&ContentItem> = library
        .active(owner)
        .filter(|item| schedule::is_due(item, now))
        .collect();
    due.sort_by_key(|item| item.due_date(now));
    due.into_iter().map(|item| filled(item, now)).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn matches_query(item: &ContentItem, query: &ListQuery) -> bool {
    if let Some(ref subject) = query.subject {
        if item.subject.name != *subject {
            return false;
        }
    }
    if let Some(stage) = query.stage {
        if item.review_stage != stage {
            return false;
        }
    }
    if let Some(difficulty) = query.difficulty {
        if item.difficulty != difficulty {
            return false;
        }
    }
    if let Some(ref re) = query.search {
        // OR across fields; a missing title is not matched
        let title_hit = item.title.as_deref().is_some_and(|t| re.is_match(t));
        let hit = title_hit
            || re.is_match(&item.content)
            || item.tags.iter().any(|t| re.is_match(t))
            || re.is_match(&item.subject.name);
        if !hit {
            return false;
        }
    }
    true
}

fn sort_items(items: &mut [&ContentItem], key: SortKey, order: SortOrder, now: DateTime<Utc>) {
    items.sort_by(|a, b| {
        let ord = match key {
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.display_title().cmp(b.display_title()),
            SortKey::NextReview => a.due_date(now).cmp(&b.due_date(now)),
            SortKey::Difficulty => a.difficulty.cmp(&b.difficulty),
            SortKey::Stage => a.review_stage.cmp(&b.review_stage),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// Clone an item with read-time display defaults applied.
fn filled(item: &ContentItem, now: DateTime<Utc>) -> ContentItem {
    let mut filled = item.clone();
    filled.title = Some(item.display_title().to_string());
    filled.estimated_time = Some(item.estimated_time_label().to_string());
    filled.next_review_date = Some(item.due_date(now));
    filled
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

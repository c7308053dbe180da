use chrono::{DateTime, Utc};

use crate::model::item::{ContentItem, ReviewStage};

// ---------------------------------------------------------------------------
// Stage ladder
// ---------------------------------------------------------------------------

/// Map an accumulated review count to its review stage.
///
/// The ladder is monotonic and one-directional: there is no regression
/// path for a failed or delayed review, only advancement as the count
/// grows.
pub fn stage_for_count(review_count: u32) -> ReviewStage {
    if review_count < 2 {
        ReviewStage::Daily
    } else if review_count < 5 {
        ReviewStage::Weekly
    } else if review_count < 8 {
        ReviewStage::Monthly
    } else {
        ReviewStage::Yearly
    }
}

/// Record one completed review: bump the count, recompute the stage from
/// the new count, and reset the due baseline to `now`.
///
/// Not idempotent — calling twice advances the count twice. Callers own
/// at-most-once invocation per logical review event.
pub fn record_review(item: &mut ContentItem, now: DateTime<Utc>) {
    item.review_count += 1;
    item.review_stage = stage_for_count(item.review_count);
    item.next_review_date = Some(now);
    item.updated_at = now;
}

/// True iff the item's due date is at or before `as_of`.
pub fn is_due(item: &ContentItem, as_of: DateTime<Utc>) -> bool {
    item.due_date(as_of) <= as_of
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

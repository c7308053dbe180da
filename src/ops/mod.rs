pub mod actions;
pub mod item_ops;
pub mod query;
pub mod schedule;

//! Notion database adapter for weekly report pages.
//!
//! One database row per week, keyed by the `Week` date property and titled
//! `Week of {start}`. Implements [`adweekly_report::ReportStore`].

pub mod blocks;
pub mod client;
pub mod error;
pub mod properties;
pub mod types;

mod retry;
mod store;

pub use client::{NotionClient, NotionClientConfig, DatabaseInfo};
pub use error::NotionError;

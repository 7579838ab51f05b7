//! Marketing API insights adapter.
//!
//! Fetches daily campaign insights and demographic breakdowns for one ad
//! account and converts them into the pipeline's raw rows.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod retry;
mod source;

pub use client::{MetaClient, MetaClientConfig};
pub use error::MetaError;

//! Descriptive analytics over the NPS tracker ticket export: loading,
//! filtering, per-view aggregation and Markdown rendering.

pub mod audit;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod report;
pub mod rollup;
pub mod sankey;
pub mod schema;
pub mod session;
pub mod sla;
pub mod tagger;
pub mod terms;

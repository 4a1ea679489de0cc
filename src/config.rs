use std::path::PathBuf;

use crate::sankey::SankeyOptions;
use crate::schema;
use crate::sla::DEFAULT_SLA_THRESHOLD_DAYS;
use crate::terms::DEFAULT_MAX_WORDS;

pub const DEFAULT_TAG_PREVIEW: usize = 10;

/// Settings shared by every view, resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: PathBuf,
    pub sla_threshold_days: i64,
    pub max_words: usize,
    pub tag_preview: usize,
    pub record_limit: Option<usize>,
    pub sankey: SankeyOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(schema::DEFAULT_SOURCE_FILE),
            sla_threshold_days: DEFAULT_SLA_THRESHOLD_DAYS,
            max_words: DEFAULT_MAX_WORDS,
            tag_preview: DEFAULT_TAG_PREVIEW,
            record_limit: None,
            sankey: SankeyOptions::default(),
        }
    }
}

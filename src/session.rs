use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, error, info};

use crate::error::LoadError;
use crate::loader;
use crate::models::Dataset;

struct CachedLoad {
    dataset: Dataset,
    modified: Option<SystemTime>,
    error: Option<LoadError>,
}

/// Owns the full record set for the lifetime of a run. The file is read at
/// most once until [`Session::invalidate`] is called or the file changes on
/// disk and [`Session::refresh_if_changed`] notices it.
pub struct Session {
    source: PathBuf,
    cache: Option<CachedLoad>,
    loads: usize,
}

impl Session {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache: None,
            loads: 0,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// The cached dataset, loading it first if needed. A failed load yields
    /// an empty dataset; the failure is kept and exposed by [`Session::notice`].
    pub fn dataset(&mut self) -> &Dataset {
        let Self {
            source,
            cache,
            loads,
        } = self;
        &cache
            .get_or_insert_with(|| {
                *loads += 1;
                load(source)
            })
            .dataset
    }

    pub fn notice(&self) -> Option<&LoadError> {
        self.cache.as_ref().and_then(|cached| cached.error.as_ref())
    }

    pub fn invalidate(&mut self) {
        debug!("invalidating cached dataset for {}", self.source.display());
        self.cache = None;
    }

    /// Reloads when the file's modification time differs from the one seen at
    /// load time. Returns whether a reload happened.
    pub fn refresh_if_changed(&mut self) -> bool {
        let Some(cached) = &self.cache else {
            return false;
        };
        if modified_at(&self.source) == cached.modified {
            return false;
        }
        info!("{} changed on disk, reloading", self.source.display());
        self.loads += 1;
        self.cache = Some(load(&self.source));
        true
    }
}

fn load(source: &Path) -> CachedLoad {
    let modified = modified_at(source);
    match loader::load_tickets(source) {
        Ok(dataset) => CachedLoad {
            dataset,
            modified,
            error: None,
        },
        Err(err) => {
            error!("{err}");
            CachedLoad {
                dataset: Dataset::default(),
                modified,
                error: Some(err),
            }
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

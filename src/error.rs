use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data file '{}' was not found, make sure it is in the correct folder", .path.display())]
    MissingSourceFile { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    pub fn is_missing_source(&self) -> bool {
        matches!(self, LoadError::MissingSourceFile { .. })
    }
}

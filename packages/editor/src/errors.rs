//! Error types for the editor

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}

//! Error types for Scenery generation passes.
//!
//! This module provides the main error type [`SceneryError`]. Every variant
//! aborts the pass, and no document of that pass is produced.

use std::{io, path::PathBuf};

use thiserror::Error;

use scenery_parser::error::ParseError;

/// The main error type for Scenery operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the diagnostics of a malformed scene file
/// together with its text and path, so each diagnostic can be rendered
/// against the file it came from.
#[derive(Debug, Error)]
pub enum SceneryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse {
        err: ParseError,
        src: String,
        path: PathBuf,
    },

    /// The wired edges close a cycle through the named node.
    #[error("Hierarchy cycle detected at `{0}`")]
    Cycle(String),

    #[error("Generation cancelled")]
    Cancelled,

    /// A configuration or declaration manifest could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SceneryError {
    /// Creates a parse error carrying the source text and the file it came from.
    pub fn new_parse_error(err: ParseError, src: &str, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            err,
            src: src.to_string(),
            path: path.into(),
        }
    }
}

//!
//! src/errors.rs  Andrew Belles  Oct 16th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the normalizer uses
//!
//!

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("config error: {0}")]
    Config(String),
    #[error("dictionary store corrupt: {0}")]
    StoreCorrupt(String),
    #[error("unknown dictionary category: {0}")]
    UnknownCategory(String),
    #[error("category missing from dictionary: {0}")]
    CategoryNotFound(String),
    #[error("{tag} is a required tag and was not found in {path}")]
    MissingRequiredTag { tag: String, path: PathBuf },
    #[error("tag read error: {0}")]
    TagRead(String),
    #[error("mixed-format release: found both {0} and {1}")]
    MixedFormat(String, String),
    #[error("no audio tracks found in {0}")]
    NoTracks(PathBuf),
    #[error("upload artifact not found: {0}")]
    MissingArtifact(PathBuf),
    #[error("no operator answer available for: {0}")]
    PromptExhausted(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<serde_json::Error> for NormalizerError {
    fn from(e: serde_json::Error) -> Self { NormalizerError::Parse(e.to_string()) }
}

impl From<lofty::error::LoftyError> for NormalizerError {
    fn from(e: lofty::error::LoftyError) -> Self { NormalizerError::TagRead(e.to_string()) }
}

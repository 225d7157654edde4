use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the reading core and its collaborators.
///
/// Out-of-range seeks and empty input are not represented here: seeks are
/// clamped and an empty token stream leaves the pacing controller finished.
#[derive(Error, Debug)]
pub enum GlanceError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no state directory available")]
    NoStateDir,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("library item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("vocabulary entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("no definition found for {0:?}")]
    DefinitionNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GlanceError>;

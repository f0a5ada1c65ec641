use crate::domain::entities::filter::{FilterCommit, FilterState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    Message(String),
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PresetError {}

/// Host-side storage for the last committed filter set. The filter core
/// never calls this; only the dashboard shell does.
pub trait PresetStore: Send + Sync {
    fn init(&self) -> Result<(), PresetError>;

    fn save_last(&self, commit: &FilterCommit) -> Result<(), PresetError>;
    fn load_last(&self) -> Result<Option<FilterState>, PresetError>;
    fn clear(&self) -> Result<(), PresetError>;
}

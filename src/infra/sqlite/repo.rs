use std::path::PathBuf;

use crate::domain::entities::filter::{FilterCommit, FilterState};
use crate::infra::sqlite::queries::{clear_presets, load_last_preset, save_last_preset};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::presets::{PresetError, PresetStore};

pub struct SqlitePresetStore {
    pub db_path: PathBuf,
}

impl PresetStore for SqlitePresetStore {
    fn init(&self) -> Result<(), PresetError> {
        init_db(&self.db_path).map_err(|err| PresetError::Message(err.to_string()))
    }

    fn save_last(&self, commit: &FilterCommit) -> Result<(), PresetError> {
        save_last_preset(&self.db_path, commit)
            .map_err(|err| PresetError::Message(err.to_string()))
    }

    fn load_last(&self) -> Result<Option<FilterState>, PresetError> {
        load_last_preset(&self.db_path).map_err(|err| PresetError::Message(err.to_string()))
    }

    fn clear(&self) -> Result<(), PresetError> {
        clear_presets(&self.db_path).map_err(|err| PresetError::Message(err.to_string()))
    }
}

use std::sync::Arc;

use crate::domain::entities::filter::{FilterCommit, FilterState};
use crate::usecase::ports::presets::{PresetError, PresetStore};

pub struct PresetService {
    store: Arc<dyn PresetStore>,
}

impl PresetService {
    pub fn new(store: Arc<dyn PresetStore>) -> Self {
        Self { store }
    }

    pub fn init(&self) -> Result<(), PresetError> {
        self.store.init()
    }

    pub fn save_last(&self, commit: &FilterCommit) -> Result<(), PresetError> {
        self.store.save_last(commit)
    }

    pub fn load_last(&self) -> Result<Option<FilterState>, PresetError> {
        self.store.load_last()
    }

    pub fn clear(&self) -> Result<(), PresetError> {
        self.store.clear()
    }
}

use crate::domain::entities::filter::{FieldChange, FilterCommit, FilterState};
use crate::domain::entities::geo::GeoDataSource;
use crate::domain::entities::options::SelectOption;
use crate::usecase::services::cascade::apply_field_change;
use crate::usecase::services::ward_options::derive_ward_options;

/// Monotonic marker handed to the nested tree so it re-derives its checked
/// set against the current `(zone, ward)` scope. Moves on every zone or
/// ward mutation, including re-selecting the value already chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScopeRevision(pub u64);

impl ScopeRevision {
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Closed,
    Open,
}

/// One filter-panel session: opened with caller-supplied state, edited
/// field by field, closed with a commit. Edits run synchronously; the
/// recomputed ward options and the bumped revision are in place before
/// the call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSession {
    phase: PanelPhase,
    state: FilterState,
    ward_options: Vec<SelectOption>,
    revision: ScopeRevision,
}

impl PanelSession {
    pub fn closed() -> Self {
        PanelSession {
            phase: PanelPhase::Closed,
            state: FilterState::default(),
            ward_options: Vec::new(),
            revision: ScopeRevision::default(),
        }
    }

    pub fn open(initial: FilterState, geo: &GeoDataSource) -> Self {
        let ward_options = derive_ward_options(&initial.zone, geo);
        PanelSession {
            phase: PanelPhase::Open,
            state: initial,
            ward_options,
            revision: ScopeRevision::default(),
        }
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn ward_options(&self) -> &[SelectOption] {
        &self.ward_options
    }

    pub fn revision(&self) -> ScopeRevision {
        self.revision
    }

    pub fn edit(&mut self, change: FieldChange, geo: &GeoDataSource) {
        if self.phase != PanelPhase::Open {
            return;
        }

        let zone_changed = matches!(change, FieldChange::Zone(_));
        let outcome = apply_field_change(&self.state, change);
        self.state = outcome.state;

        if zone_changed {
            self.ward_options = derive_ward_options(&self.state.zone, geo);
        }
        if outcome.scope_changed {
            self.revision.bump();
        }
    }

    pub fn set_checked_items(&mut self, items: impl IntoIterator<Item = String>) {
        if self.phase != PanelPhase::Open {
            return;
        }
        self.state.checked_items = items.into_iter().collect();
    }

    /// Nothing is validated here: a partial or empty selection is a valid
    /// commit.
    pub fn close(&mut self) -> FilterCommit {
        self.phase = PanelPhase::Closed;
        FilterCommit::from_state(&self.state)
    }
}

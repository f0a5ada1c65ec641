use crate::domain::entities::filter::{FieldChange, FilterState};
use crate::domain::entities::options::SelectOption;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub state: FilterState,
    pub scope_changed: bool,
}

/// Applies a field edit to a filter state, returning a new aggregate; the
/// input is never mutated. A zone edit is the only one with side effects
/// on other fields: the ward falls back to "All" and the checked leaves
/// are cleared, so neither can outlive the zone they were picked under.
/// `scope_changed` reports a zone or ward move once, not twice.
pub fn apply_field_change(state: &FilterState, change: FieldChange) -> CascadeOutcome {
    let mut next = state.clone();
    let scope_changed = match change {
        FieldChange::Company(options) => {
            next.company = options;
            false
        }
        FieldChange::Branch(options) => {
            next.branch = options;
            false
        }
        FieldChange::Town(options) => {
            next.town = options;
            false
        }
        FieldChange::Zone(option) => {
            next.zone = option;
            next.ward = SelectOption::all();
            next.checked_items.clear();
            true
        }
        FieldChange::Ward(option) => {
            next.ward = option;
            true
        }
        FieldChange::DateRange(range) => {
            next.date_range = range;
            false
        }
    };

    CascadeOutcome {
        state: next,
        scope_changed,
    }
}

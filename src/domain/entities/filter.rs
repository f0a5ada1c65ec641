use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::entities::options::SelectOption;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// The mutable filter aggregate for one panel session. `ward` stays within
/// the option set derived from `zone`; `checked_items` is scoped to the
/// current `(zone, ward)` pair. Both are enforced by the cascade rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub company: Vec<SelectOption>,
    pub branch: Vec<SelectOption>,
    pub town: Vec<SelectOption>,
    pub zone: SelectOption,
    pub ward: SelectOption,
    pub date_range: Option<DateRange>,
    pub checked_items: BTreeSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            company: Vec::new(),
            branch: Vec::new(),
            town: Vec::new(),
            zone: SelectOption::all(),
            ward: SelectOption::all(),
            date_range: None,
            checked_items: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Company(Vec<SelectOption>),
    Branch(Vec<SelectOption>),
    Town(Vec<SelectOption>),
    Zone(SelectOption),
    Ward(SelectOption),
    DateRange(Option<DateRange>),
}

/// What the panel hands back to its host on Apply/close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommit {
    pub state: FilterState,
    pub date_range: Option<DateRange>,
    pub checked_items: Vec<String>,
}

impl FilterCommit {
    pub fn from_state(state: &FilterState) -> Self {
        FilterCommit {
            date_range: state.date_range,
            checked_items: state.checked_items.iter().cloned().collect(),
            state: state.clone(),
        }
    }
}

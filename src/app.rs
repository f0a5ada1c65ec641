use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::domain::entities::filter::{DateRange, FieldChange, FilterCommit, FilterState};
use crate::domain::entities::geo::GeoDataSource;
use crate::domain::entities::options::{FilterConfig, SelectOption, ALL_VALUE};
use crate::infra::import::csv::load_geo_csv;
use crate::infra::import::xlsx::load_geo_xlsx;
use crate::infra::sqlite::repo::SqlitePresetStore;
use crate::ui::state::panel_state::PanelState;
use crate::usecase::services::preset_service::PresetService;
use crate::usecase::services::session::PanelSession;
use crate::{default_db_path, default_filter_config, default_geo_data};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub title: &'static str,
    pub items: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub title: &'static str,
    pub submenu: Vec<NavGroup>,
}

pub fn nav_items() -> Vec<NavItem> {
    vec![
        NavItem {
            id: "nav_dashboard",
            title: "Dashboard",
            submenu: Vec::new(),
        },
        NavItem {
            id: "nav_tracking",
            title: "Tracking",
            submenu: Vec::new(),
        },
        NavItem {
            id: "nav_reports",
            title: "Reports",
            submenu: vec![NavGroup {
                title: "Job",
                items: vec![
                    NavLink {
                        name: "Job Summary",
                        href: "/jobsummary",
                    },
                    NavLink {
                        name: "Job Details Summary",
                        href: "/jobdetailssummary",
                    },
                ],
            }],
        },
        NavItem {
            id: "nav_settings",
            title: "Settings",
            submenu: Vec::new(),
        },
    ]
}

pub fn nav_initial(title: &str) -> String {
    title.chars().next().map(|c| c.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLeaf {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub title: &'static str,
    pub leaves: Vec<CategoryLeaf>,
}

pub fn report_categories() -> Vec<CategoryGroup> {
    vec![
        CategoryGroup {
            title: "Job",
            leaves: vec![
                CategoryLeaf {
                    id: "job_summary",
                    name: "Job Summary",
                },
                CategoryLeaf {
                    id: "job_details_summary",
                    name: "Job Details Summary",
                },
            ],
        },
        CategoryGroup {
            title: "Grievance",
            leaves: vec![
                CategoryLeaf {
                    id: "grievance_open",
                    name: "Open Grievances",
                },
                CategoryLeaf {
                    id: "grievance_resolved",
                    name: "Resolved Grievances",
                },
            ],
        },
        CategoryGroup {
            title: "Billing",
            leaves: vec![
                CategoryLeaf {
                    id: "billing_collection",
                    name: "Collection Summary",
                },
                CategoryLeaf {
                    id: "billing_arrears",
                    name: "Arrears",
                },
            ],
        },
    ]
}

/// Drops checked leaves that no longer exist in the rendered tree.
pub fn prune_checked_items(checked: &BTreeSet<String>, groups: &[CategoryGroup]) -> Vec<String> {
    let valid: HashSet<&str> = groups
        .iter()
        .flat_map(|group| group.leaves.iter().map(|leaf| leaf.id))
        .collect();
    checked
        .iter()
        .filter(|item| valid.contains(item.as_str()))
        .cloned()
        .collect()
}

pub fn commit_chips(commit: &FilterCommit) -> Vec<String> {
    let mut chips = Vec::new();
    if !commit.state.zone.is_all() {
        chips.push(format!("Zone: {}", commit.state.zone.label));
    }
    if !commit.state.ward.is_all() {
        chips.push(format!("Ward: {}", commit.state.ward.label));
    }
    let multi_fields = [
        ("Company", &commit.state.company),
        ("Branch", &commit.state.branch),
        ("Town", &commit.state.town),
    ];
    for (label, selected) in multi_fields {
        if selected.is_empty() {
            continue;
        }
        let values: Vec<&str> = selected.iter().map(|option| option.label.as_str()).collect();
        chips.push(format!("{}: {}", label, values.join(", ")));
    }
    if let Some(range) = commit.date_range {
        let from = range
            .from
            .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
            .unwrap_or_else(|| "any".to_string());
        let to = range
            .to
            .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
            .unwrap_or_else(|| "any".to_string());
        chips.push(format!("Dates: {from} to {to}"));
    }
    if !commit.checked_items.is_empty() {
        chips.push(format!("Categories: {}", commit.checked_items.len()));
    }
    chips
}

pub fn sidebar_style(collapsed: bool) -> String {
    let width = if collapsed { "64px" } else { "200px" };
    format!(
        "width: {width}; flex-shrink: 0; height: 100vh; display: flex; flex-direction: column; \
         background: #f2f2f2; color: #444; border-right: 1px solid #ddd; padding: 8px 0;"
    )
}

pub fn nav_button_style(active: bool) -> String {
    let background = if active { "#e4e8f5" } else { "transparent" };
    format!(
        "display: block; width: 100%; border: none; background: {background}; \
         padding: 10px 12px; text-align: left; cursor: pointer; font-size: 13px;"
    )
}

pub fn submenu_style() -> &'static str {
    "position: absolute; left: 100%; top: 0; margin-left: 2px; min-width: 220px; \
     background: #db4848; color: #fff; border-radius: 6px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); \
     z-index: 1200; padding: 6px;"
}

pub fn panel_overlay_style() -> &'static str {
    "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; \
     align-items: stretch; justify-content: flex-end; z-index: 1100;"
}

pub fn panel_container_style() -> &'static str {
    "background: #fff; width: 720px; max-width: 90vw; height: 100vh; overflow-y: auto; \
     display: flex; flex-direction: column; box-shadow: -8px 0 24px rgba(0,0,0,0.2);"
}

pub fn multi_select_box_style() -> &'static str {
    "border: 1px solid #bbb; border-radius: 6px; padding: 6px 8px; max-height: 120px; \
     overflow-y: auto; background: #fff;"
}

pub fn chip_style() -> &'static str {
    "background: #eef4ff; border: 1px solid #4c6ef5; border-radius: 12px; \
     padding: 2px 10px; font-size: 12px;"
}

#[component]
fn SingleSelectField(
    label: &'static str,
    options: Vec<SelectOption>,
    selected: SelectOption,
    on_change: EventHandler<SelectOption>,
) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 4px;",
            label { "{label}" }
            select {
                value: "{selected.value}",
                onchange: move |event| {
                    on_change.call(SelectOption::new(event.value()));
                },
                option { value: "{ALL_VALUE}", "{ALL_VALUE}" }
                for opt in options.clone() {
                    option { value: "{opt.value}", "{opt.label}" }
                }
            }
        }
    }
}

#[component]
fn MultiSelectField(
    label: &'static str,
    options: Vec<SelectOption>,
    selected: Vec<SelectOption>,
    on_change: EventHandler<Vec<SelectOption>>,
) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 4px;",
            label { "{label}" }
            div {
                style: "{multi_select_box_style()}",
                {options.iter().map(|option| {
                    let option = option.clone();
                    let option_label = option.label.clone();
                    let is_selected = selected.iter().any(|s| s.value == option.value);
                    let selected_for_toggle = selected.clone();
                    rsx!(
                        label {
                            style: "display: flex; align-items: center; gap: 6px; padding: 2px 0; cursor: pointer;",
                            input {
                                r#type: "checkbox",
                                checked: is_selected,
                                onclick: move |_| {
                                    let mut next = selected_for_toggle.clone();
                                    if is_selected {
                                        next.retain(|s| s.value != option.value);
                                    } else {
                                        next.push(option.clone());
                                    }
                                    on_change.call(next);
                                }
                            }
                            span { "{option_label}" }
                        }
                    )
                })}
            }
        }
    }
}

/// Checkbox tree of report categories, scoped to the panel's current
/// zone/ward. Re-derives its checked set whenever the scope revision
/// moves, even when the re-selected values are structurally unchanged.
#[component]
fn CategoryTree(
    session: Signal<PanelSession>,
    on_checked_items_change: EventHandler<Vec<String>>,
) -> Element {
    let groups = report_categories();
    let mut expanded = use_signal(BTreeSet::<String>::new);
    let mut last_seen = use_signal(|| 0_u64);

    use_effect(move || {
        let revision = session.read().revision().0;
        if *last_seen.peek() == revision {
            return;
        }
        last_seen.set(revision);
        let checked = session.read().state().checked_items.clone();
        let valid = prune_checked_items(&checked, &report_categories());
        if valid.len() != checked.len() {
            on_checked_items_change.call(valid);
        }
    });

    let snapshot = session();
    let zone = snapshot.state().zone.label.clone();
    let ward = snapshot.state().ward.label.clone();
    let checked = snapshot.state().checked_items.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 4px; border: 1px solid #bbb; border-radius: 6px; padding: 8px;",
            div {
                style: "font-size: 12px; color: #777;",
                "Scope: {zone} / {ward}"
            }
            {groups.iter().map(|group| {
                let title = group.title;
                let is_expanded = expanded().contains(title);
                let leaves = group.leaves.clone();
                rsx!(
                    div {
                        button {
                            style: "border: none; background: transparent; text-align: left; cursor: pointer; font-weight: 600; padding: 4px 0;",
                            onclick: move |_| {
                                let mut next = expanded();
                                if !next.remove(title) {
                                    next.insert(title.to_string());
                                }
                                expanded.set(next);
                            },
                            if is_expanded { "- {title}" } else { "+ {title}" }
                        }
                        if is_expanded {
                            div {
                                style: "display: flex; flex-direction: column; gap: 2px; padding-left: 16px;",
                                {leaves.iter().map(|leaf| {
                                    let leaf_id = leaf.id;
                                    let leaf_name = leaf.name;
                                    let is_checked = checked.contains(leaf_id);
                                    let checked_for_toggle = checked.clone();
                                    rsx!(
                                        label {
                                            style: "display: flex; align-items: center; gap: 6px; cursor: pointer;",
                                            input {
                                                r#type: "checkbox",
                                                checked: is_checked,
                                                onclick: move |_| {
                                                    let mut next = checked_for_toggle.clone();
                                                    if !next.remove(leaf_id) {
                                                        next.insert(leaf_id.to_string());
                                                    }
                                                    on_checked_items_change.call(next.into_iter().collect());
                                                }
                                            }
                                            span { "{leaf_name}" }
                                        }
                                    )
                                })}
                            }
                        }
                    }
                )
            })}
        }
    }
}

#[component]
fn FiltersPanel(
    mut session: Signal<PanelSession>,
    geo: Signal<GeoDataSource>,
    config: FilterConfig,
    on_form_data_change: EventHandler<FilterState>,
    on_checked_items_change: EventHandler<Vec<String>>,
    on_date_range_change: EventHandler<Option<DateRange>>,
    on_close: EventHandler<FilterCommit>,
) -> Element {
    let snapshot = session();
    let state = snapshot.state().clone();
    let ward_options = snapshot.ward_options().to_vec();

    let date_from_value = state
        .date_range
        .and_then(|range| range.from)
        .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
        .unwrap_or_default();
    let date_to_value = state
        .date_range
        .and_then(|range| range.to)
        .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
        .unwrap_or_default();

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-bottom: 1px solid #ddd;",
            h2 { style: "margin: 0; font-size: 16px;", "Filters" }
            button {
                style: "border: none; background: transparent; cursor: pointer; font-size: 16px;",
                onclick: move |_| {
                    let commit = session.write().close();
                    on_close.call(commit);
                },
                "X"
            }
        }
        div {
            style: "display: flex; gap: 16px; padding: 16px;",
            div {
                style: "display: flex; flex-direction: column; gap: 12px; width: 280px;",
                MultiSelectField {
                    label: "Company",
                    options: config.company_options.clone(),
                    selected: state.company.clone(),
                    on_change: move |options: Vec<SelectOption>| {
                        session.write().edit(FieldChange::Company(options), &geo.read());
                        on_form_data_change.call(session.read().state().clone());
                    }
                }
                MultiSelectField {
                    label: "Branch",
                    options: config.branch_options.clone(),
                    selected: state.branch.clone(),
                    on_change: move |options: Vec<SelectOption>| {
                        session.write().edit(FieldChange::Branch(options), &geo.read());
                        on_form_data_change.call(session.read().state().clone());
                    }
                }
                MultiSelectField {
                    label: "Town",
                    options: config.town_options.clone(),
                    selected: state.town.clone(),
                    on_change: move |options: Vec<SelectOption>| {
                        session.write().edit(FieldChange::Town(options), &geo.read());
                        on_form_data_change.call(session.read().state().clone());
                    }
                }
                SingleSelectField {
                    label: "Zone",
                    options: config.zone_options.clone(),
                    selected: state.zone.clone(),
                    on_change: move |option: SelectOption| {
                        session.write().edit(FieldChange::Zone(option), &geo.read());
                        on_checked_items_change.call(Vec::new());
                        on_form_data_change.call(session.read().state().clone());
                    }
                }
                SingleSelectField {
                    label: "Ward",
                    options: ward_options.clone(),
                    selected: state.ward.clone(),
                    on_change: move |option: SelectOption| {
                        session.write().edit(FieldChange::Ward(option), &geo.read());
                        on_form_data_change.call(session.read().state().clone());
                    }
                }
            }
            div {
                style: "display: flex; flex-direction: column; gap: 12px; flex: 1;",
                div {
                    style: "display: flex; flex-direction: column; gap: 4px;",
                    label { "Date Range" }
                    div {
                        style: "display: flex; gap: 8px; align-items: center;",
                        input {
                            r#type: "date",
                            value: "{date_from_value}",
                            onchange: move |event| {
                                let parsed = NaiveDate::parse_from_str(&event.value(), DATE_INPUT_FORMAT).ok();
                                let current = session.read().state().date_range.unwrap_or_default();
                                let range = DateRange { from: parsed, ..current };
                                let next = if range.from.is_none() && range.to.is_none() {
                                    None
                                } else {
                                    Some(range)
                                };
                                session.write().edit(FieldChange::DateRange(next), &geo.read());
                                on_date_range_change.call(next);
                            }
                        }
                        span { "to" }
                        input {
                            r#type: "date",
                            value: "{date_to_value}",
                            onchange: move |event| {
                                let parsed = NaiveDate::parse_from_str(&event.value(), DATE_INPUT_FORMAT).ok();
                                let current = session.read().state().date_range.unwrap_or_default();
                                let range = DateRange { to: parsed, ..current };
                                let next = if range.from.is_none() && range.to.is_none() {
                                    None
                                } else {
                                    Some(range)
                                };
                                session.write().edit(FieldChange::DateRange(next), &geo.read());
                                on_date_range_change.call(next);
                            }
                        }
                    }
                }
                CategoryTree {
                    session: session,
                    on_checked_items_change: move |items: Vec<String>| {
                        session.write().set_checked_items(items.clone());
                        on_checked_items_change.call(items);
                    }
                }
                button {
                    style: "padding: 8px 12px; border: 1px solid #4c6ef5; background: #4c6ef5; color: #fff; border-radius: 6px; cursor: pointer;",
                    onclick: move |_| {
                        let commit = session.write().close();
                        on_close.call(commit);
                    },
                    "Apply Filters"
                }
            }
        }
    }
}

#[component]
fn SidebarNav(
    mut collapsed: Signal<bool>,
    mut open_submenu: Signal<Option<&'static str>>,
) -> Element {
    let items = nav_items();

    rsx! {
        aside {
            style: "{sidebar_style(collapsed())}",
            div {
                style: "display: flex; justify-content: flex-end; padding: 0 8px 8px;",
                button {
                    style: "border: 1px solid #bbb; background: #fff; border-radius: 6px; cursor: pointer; padding: 2px 8px;",
                    onclick: move |_| {
                        collapsed.set(!collapsed());
                        open_submenu.set(None);
                    },
                    if collapsed() { ">" } else { "<" }
                }
            }
            nav {
                style: "display: flex; flex-direction: column; gap: 2px;",
                {items.iter().map(|item| {
                    let id = item.id;
                    let title = item.title;
                    let has_submenu = !item.submenu.is_empty();
                    let is_open = open_submenu() == Some(id);
                    let submenu = item.submenu.clone();
                    rsx!(
                        div {
                            style: "position: relative;",
                            button {
                                style: "{nav_button_style(is_open)}",
                                onclick: move |event| {
                                    event.stop_propagation();
                                    if !has_submenu {
                                        open_submenu.set(None);
                                        return;
                                    }
                                    open_submenu.set(if is_open { None } else { Some(id) });
                                },
                                if collapsed() { "{nav_initial(title)}" } else { "{title}" }
                            }
                            if is_open && has_submenu {
                                div {
                                    style: "{submenu_style()}",
                                    onclick: move |event| event.stop_propagation(),
                                    {submenu.iter().map(|group| rsx!(
                                        div {
                                            div { style: "font-weight: 600; padding: 4px 8px;", "{group.title}" }
                                            {group.items.iter().map(|link| rsx!(
                                                a {
                                                    href: "{link.href}",
                                                    style: "display: block; color: #fff; padding: 6px 8px 6px 16px; border-radius: 4px; font-size: 13px; text-decoration: none;",
                                                    "{link.name}"
                                                }
                                            ))}
                                        }
                                    ))}
                                }
                            }
                        }
                    )
                })}
            }
            div {
                style: "margin-top: auto; display: flex; flex-direction: column; gap: 2px; padding: 8px 0;",
                for footer in ["Help", "Sign out", "Support"] {
                    button {
                        style: "{nav_button_style(false)}",
                        if collapsed() { "{nav_initial(footer)}" } else { "{footer}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match default_db_path() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div {
                    p { "failed to resolve data directory: {err}" }
                }
            };
        }
    };

    let PanelState {
        mut geo,
        mut session,
        mut show_filters,
        mut committed,
        sidebar_collapsed,
        mut open_submenu,
        mut busy,
        mut status,
    } = PanelState::new();

    let store = Arc::new(SqlitePresetStore { db_path });
    let presets = Arc::new(PresetService::new(store));
    let presets_for_init = presets.clone();
    let presets_for_close = presets.clone();
    let presets_for_clear = presets.clone();

    use_effect(move || {
        *busy.write() = true;
        match default_geo_data() {
            Ok(data) => {
                *geo.write() = data;
            }
            Err(err) => {
                *status.write() = format!("failed to load bundled ward register: {err}");
            }
        }
        match presets_for_init.init().and_then(|_| presets_for_init.load_last()) {
            Ok(Some(state)) => {
                *committed.write() = Some(FilterCommit::from_state(&state));
                *status.write() = "restored last applied filters".to_string();
            }
            Ok(None) => {}
            Err(err) => {
                *status.write() = format!("failed to load saved filters: {err}");
            }
        }
        *busy.write() = false;
    });

    let config = default_filter_config();
    let committed_snapshot = committed();

    rsx! {
        div {
            style: "display: flex; font-family: sans-serif; min-height: 100vh; background: #fff;",
            onclick: move |_| {
                open_submenu.set(None);
            },
            SidebarNav {
                collapsed: sidebar_collapsed,
                open_submenu: open_submenu,
            }
            main {
                style: "flex: 1; padding: 16px; display: flex; flex-direction: column; gap: 12px;",
                h2 { style: "margin: 0;", "Reports Dashboard" }
                div {
                    style: "display: flex; gap: 8px; align-items: center;",
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let initial = committed().map(|commit| commit.state).unwrap_or_default();
                            session.set(PanelSession::open(initial, &geo.read()));
                            show_filters.set(true);
                        },
                        "Filters"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let Some(file_path) = FileDialog::new()
                                .add_filter("Ward register", &["csv", "xlsx"])
                                .pick_file() else {
                                *status.write() = "load cancelled".to_string();
                                return;
                            };

                            let has_records = !geo.read().is_empty();
                            if has_records {
                                let confirmed = MessageDialog::new()
                                    .set_level(MessageLevel::Warning)
                                    .set_title("Replace ward register")
                                    .set_description("Replace the loaded ward register? The next filter session will use the new wards.")
                                    .set_buttons(MessageButtons::YesNo)
                                    .show();
                                if confirmed != MessageDialogResult::Yes {
                                    return;
                                }
                            }

                            *busy.write() = true;
                            let ext = file_path
                                .extension()
                                .and_then(|e| e.to_str())
                                .map(|s| s.to_ascii_lowercase())
                                .unwrap_or_default();
                            let loaded = if ext == "xlsx" {
                                load_geo_xlsx(&file_path)
                            } else {
                                load_geo_csv(&file_path)
                            };
                            match loaded {
                                Ok(data) => {
                                    *status.write() =
                                        format!("loaded {} ward records", data.record_count());
                                    *geo.write() = data;
                                }
                                Err(err) => {
                                    *status.write() = format!("failed to load ward register: {err}");
                                }
                            }
                            *busy.write() = false;
                        },
                        "Load ward register"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            match presets_for_clear.clear() {
                                Ok(_) => {
                                    *committed.write() = None;
                                    *status.write() = "cleared saved filters".to_string();
                                }
                                Err(err) => {
                                    *status.write() = format!("failed to clear saved filters: {err}");
                                }
                            }
                        },
                        "Clear saved filters"
                    }
                    span { " {status}" }
                }

                if let Some(commit) = committed_snapshot {
                    div {
                        h3 { style: "margin: 0 0 8px;", "Current report query" }
                        div {
                            style: "display: flex; flex-wrap: wrap; gap: 6px;",
                            for chip in commit_chips(&commit) {
                                span { style: "{chip_style()}", "{chip}" }
                            }
                        }
                    }
                } else {
                    p { "No filters applied yet." }
                }
            }

            if show_filters() {
                div {
                    style: "{panel_overlay_style()}",
                    div {
                        style: "{panel_container_style()}",
                        FiltersPanel {
                            session: session,
                            geo: geo,
                            config: config.clone(),
                            on_form_data_change: move |state: FilterState| {
                                *status.write() =
                                    format!("zone {} / ward {}", state.zone.value, state.ward.value);
                            },
                            on_checked_items_change: move |items: Vec<String>| {
                                *status.write() =
                                    format!("{} report categories selected", items.len());
                            },
                            on_date_range_change: move |range: Option<DateRange>| {
                                *status.write() = match range {
                                    Some(_) => "date range updated".to_string(),
                                    None => "date range cleared".to_string(),
                                };
                            },
                            on_close: move |commit: FilterCommit| {
                                show_filters.set(false);
                                match presets_for_close.save_last(&commit) {
                                    Ok(_) => {
                                        *status.write() = "filters applied".to_string();
                                    }
                                    Err(err) => {
                                        *status.write() = format!("failed to save filters: {err}");
                                    }
                                }
                                *committed.write() = Some(commit);
                            },
                        }
                    }
                }
            }
        }
    }
}

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::app::{
    commit_chips, nav_initial, nav_items, panel_overlay_style, prune_checked_items,
    report_categories, sidebar_style, submenu_style,
};
use crate::domain::entities::filter::{DateRange, FieldChange, FilterCommit, FilterState};
use crate::domain::entities::geo::{GeoDataSource, GeoRecord, EAST_ZONE_VALUE, WEST_ZONE_VALUE};
use crate::domain::entities::options::{SelectOption, ALL_VALUE};
use crate::infra::import::csv::{load_geo_csv, parse_ward_records_csv};
use crate::infra::import::xlsx::load_geo_xlsx;
use crate::infra::sqlite::queries::{load_last_preset, save_last_preset};
use crate::infra::sqlite::repo::SqlitePresetStore;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::services::cascade::apply_field_change;
use crate::usecase::services::preset_service::PresetService;
use crate::usecase::services::session::{PanelPhase, PanelSession, ScopeRevision};
use crate::usecase::services::ward_options::derive_ward_options;
use crate::*;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("bmc-{prefix}-{nanos}"))
}

fn geo_fixture() -> GeoDataSource {
    GeoDataSource::new(
        vec![
            GeoRecord::new("W1"),
            GeoRecord::new("W2"),
            GeoRecord::new("W1"),
        ],
        vec![GeoRecord::new("W3")],
    )
}

fn option_values(options: &[SelectOption]) -> Vec<&str> {
    options.iter().map(|option| option.value.as_str()).collect()
}

#[test]
fn derive_ward_options_deduplicates_east_zone() {
    let geo = geo_fixture();

    let options = derive_ward_options(&SelectOption::new(EAST_ZONE_VALUE), &geo);

    assert_eq!(option_values(&options), vec!["W1", "W2"]);
    assert!(
        options.iter().all(|option| option.value == option.label),
        "ward labels should mirror values"
    );
}

#[test]
fn derive_ward_options_unions_east_before_west_for_all() {
    let geo = geo_fixture();

    let options = derive_ward_options(&SelectOption::all(), &geo);

    assert_eq!(option_values(&options), vec!["W1", "W2", "W3"]);
}

#[test]
fn derive_ward_options_falls_back_to_union_for_unknown_zone() {
    let geo = geo_fixture();

    let options = derive_ward_options(&SelectOption::new("CENTRAL_ZONE"), &geo);

    assert_eq!(option_values(&options), vec!["W1", "W2", "W3"]);
}

#[test]
fn derive_ward_options_handles_empty_register() {
    let geo = GeoDataSource::default();

    assert!(derive_ward_options(&SelectOption::new(EAST_ZONE_VALUE), &geo).is_empty());
    assert!(derive_ward_options(&SelectOption::all(), &geo).is_empty());
}

#[test]
fn derive_ward_options_orders_by_first_occurrence() {
    let geo = GeoDataSource::new(
        vec![
            GeoRecord::new("Vadva"),
            GeoRecord::new("Akwada"),
            GeoRecord::new("Vadva"),
            GeoRecord::new("Kumbharwada"),
        ],
        Vec::new(),
    );

    let options = derive_ward_options(&SelectOption::new(EAST_ZONE_VALUE), &geo);

    assert_eq!(
        option_values(&options),
        vec!["Vadva", "Akwada", "Kumbharwada"]
    );
}

#[test]
fn derive_ward_options_deduplicates_across_zones() {
    let geo = GeoDataSource::new(
        vec![GeoRecord::new("W1")],
        vec![GeoRecord::new("W1"), GeoRecord::new("W2")],
    );

    let options = derive_ward_options(&SelectOption::all(), &geo);

    assert_eq!(option_values(&options), vec!["W1", "W2"]);
}

fn populated_state() -> FilterState {
    FilterState {
        company: vec![SelectOption::new("BMC")],
        branch: vec![SelectOption::new("BMC")],
        town: vec![SelectOption::new("BHAVNAGAR_OSC")],
        zone: SelectOption::new(EAST_ZONE_VALUE),
        ward: SelectOption::new("W1"),
        date_range: Some(DateRange {
            from: NaiveDate::from_ymd_opt(2025, 4, 1),
            to: NaiveDate::from_ymd_opt(2025, 4, 30),
        }),
        checked_items: BTreeSet::from(["leaf3".to_string()]),
    }
}

#[test]
fn zone_change_resets_ward_and_checked_items() {
    let state = populated_state();

    let outcome = apply_field_change(
        &state,
        FieldChange::Zone(SelectOption::new(WEST_ZONE_VALUE)),
    );

    assert_eq!(outcome.state.zone.value, WEST_ZONE_VALUE);
    assert_eq!(outcome.state.ward, SelectOption::all());
    assert!(outcome.state.checked_items.is_empty());
    assert!(outcome.scope_changed);
}

#[test]
fn ward_change_keeps_checked_items() {
    let state = populated_state();

    let outcome = apply_field_change(&state, FieldChange::Ward(SelectOption::new("W2")));

    assert_eq!(outcome.state.ward.value, "W2");
    assert_eq!(outcome.state.checked_items, state.checked_items);
    assert!(outcome.scope_changed);
}

#[test]
fn branch_change_only_touches_branch() {
    let state = populated_state();
    let next_branch = vec![SelectOption::new("BMC"), SelectOption::new("OSC")];

    let outcome = apply_field_change(&state, FieldChange::Branch(next_branch.clone()));

    assert_eq!(outcome.state.branch, next_branch);
    assert_eq!(outcome.state.company, state.company);
    assert_eq!(outcome.state.town, state.town);
    assert_eq!(outcome.state.zone, state.zone);
    assert_eq!(outcome.state.ward, state.ward);
    assert_eq!(outcome.state.date_range, state.date_range);
    assert_eq!(outcome.state.checked_items, state.checked_items);
    assert!(!outcome.scope_changed);
}

#[test]
fn independent_field_changes_leave_scope_alone() {
    let state = populated_state();
    let changes = vec![
        FieldChange::Company(Vec::new()),
        FieldChange::Town(vec![SelectOption::new("GHOGHA")]),
        FieldChange::DateRange(None),
    ];

    for change in changes {
        let outcome = apply_field_change(&state, change);
        assert_eq!(outcome.state.zone, state.zone);
        assert_eq!(outcome.state.ward, state.ward);
        assert_eq!(outcome.state.checked_items, state.checked_items);
        assert!(!outcome.scope_changed);
    }
}

#[test]
fn apply_field_change_returns_fresh_aggregate() {
    let state = populated_state();
    let before = state.clone();

    let outcome = apply_field_change(
        &state,
        FieldChange::Zone(SelectOption::new(WEST_ZONE_VALUE)),
    );

    assert_eq!(state, before, "input state should not be mutated");
    assert_ne!(outcome.state, state);
}

#[test]
fn session_open_derives_options_for_initial_zone() {
    let geo = geo_fixture();
    let initial = FilterState {
        zone: SelectOption::new(EAST_ZONE_VALUE),
        ..FilterState::default()
    };

    let session = PanelSession::open(initial, &geo);

    assert_eq!(session.phase(), PanelPhase::Open);
    assert_eq!(option_values(session.ward_options()), vec!["W1", "W2"]);
}

#[test]
fn session_zone_change_bumps_revision_once() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(populated_state(), &geo);

    session.edit(
        FieldChange::Zone(SelectOption::new(WEST_ZONE_VALUE)),
        &geo,
    );

    assert_eq!(
        session.revision(),
        ScopeRevision(1),
        "zone change with its implied ward reset should count once"
    );
    assert_eq!(option_values(session.ward_options()), vec!["W3"]);
    assert_eq!(session.state().ward, SelectOption::all());
}

#[test]
fn session_bumps_revision_for_repeated_zone_selection() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(FilterState::default(), &geo);

    session.edit(
        FieldChange::Zone(SelectOption::new(EAST_ZONE_VALUE)),
        &geo,
    );
    let first = session.revision();
    session.edit(
        FieldChange::Zone(SelectOption::new(EAST_ZONE_VALUE)),
        &geo,
    );

    assert_ne!(session.revision(), first);
    assert_eq!(session.revision(), ScopeRevision(2));
}

#[test]
fn session_ward_edit_bumps_revision_but_keeps_options() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(FilterState::default(), &geo);
    let options_before = session.ward_options().to_vec();

    session.edit(FieldChange::Ward(SelectOption::new("W2")), &geo);

    assert_eq!(session.revision(), ScopeRevision(1));
    assert_eq!(session.ward_options(), options_before.as_slice());
    assert_eq!(session.state().ward.value, "W2");
}

#[test]
fn session_independent_edit_keeps_revision() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(FilterState::default(), &geo);

    session.edit(
        FieldChange::Company(vec![SelectOption::new("BMC")]),
        &geo,
    );

    assert_eq!(session.revision(), ScopeRevision(0));
}

#[test]
fn session_close_commits_current_selection() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(FilterState::default(), &geo);

    session.edit(
        FieldChange::Zone(SelectOption::new(EAST_ZONE_VALUE)),
        &geo,
    );
    session.edit(FieldChange::Ward(SelectOption::new("W1")), &geo);
    session.set_checked_items(["grievance_open".to_string()]);
    let range = Some(DateRange {
        from: NaiveDate::from_ymd_opt(2025, 4, 1),
        to: None,
    });
    session.edit(FieldChange::DateRange(range), &geo);

    let commit = session.close();

    assert_eq!(session.phase(), PanelPhase::Closed);
    assert_eq!(commit.state.zone.value, EAST_ZONE_VALUE);
    assert_eq!(commit.state.ward.value, "W1");
    assert_eq!(commit.date_range, range);
    assert_eq!(commit.checked_items, vec!["grievance_open".to_string()]);
}

#[test]
fn session_ignores_edits_after_close() {
    let geo = geo_fixture();
    let mut session = PanelSession::open(populated_state(), &geo);
    session.close();
    let state_before = session.state().clone();
    let revision_before = session.revision();

    session.edit(
        FieldChange::Zone(SelectOption::new(WEST_ZONE_VALUE)),
        &geo,
    );
    session.set_checked_items(["late".to_string()]);

    assert_eq!(session.state(), &state_before);
    assert_eq!(session.revision(), revision_before);
}

#[test]
fn commit_copies_checked_items_in_order() {
    let mut state = FilterState::default();
    state.checked_items = BTreeSet::from(["b".to_string(), "a".to_string()]);

    let commit = FilterCommit::from_state(&state);

    assert_eq!(commit.checked_items, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(commit.state, state);
}

#[test]
fn preset_roundtrip_restores_selection() {
    let temp_dir = unique_test_dir("preset-roundtrip");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("filters.sqlite");

    init_db(&db_path).expect("init_db should succeed");

    let state = FilterState {
        company: vec![SelectOption::new("BMC")],
        town: vec![SelectOption::new("BHAVNAGAR_OSC")],
        zone: SelectOption::new(WEST_ZONE_VALUE),
        ward: SelectOption::new("W3"),
        date_range: Some(DateRange {
            from: NaiveDate::from_ymd_opt(2025, 4, 1),
            to: NaiveDate::from_ymd_opt(2025, 4, 30),
        }),
        checked_items: BTreeSet::from([
            "grievance_open".to_string(),
            "billing_arrears".to_string(),
        ]),
        ..FilterState::default()
    };
    let commit = FilterCommit::from_state(&state);

    save_last_preset(&db_path, &commit).expect("save should succeed");
    let loaded = load_last_preset(&db_path)
        .expect("load should succeed")
        .expect("preset should exist");

    assert_eq!(loaded, state);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_last_preset_returns_none_on_fresh_db() {
    let temp_dir = unique_test_dir("preset-empty");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("filters.sqlite");

    init_db(&db_path).expect("init_db should succeed");

    let loaded = load_last_preset(&db_path).expect("load should succeed");
    assert!(loaded.is_none());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn save_last_preset_overwrites_previous_slot() {
    let temp_dir = unique_test_dir("preset-overwrite");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("filters.sqlite");

    init_db(&db_path).expect("init_db should succeed");

    let first = FilterState {
        zone: SelectOption::new(EAST_ZONE_VALUE),
        company: vec![SelectOption::new("BMC")],
        ..FilterState::default()
    };
    let second = FilterState {
        zone: SelectOption::new(WEST_ZONE_VALUE),
        ward: SelectOption::new("W3"),
        checked_items: BTreeSet::from(["job_summary".to_string()]),
        ..FilterState::default()
    };

    save_last_preset(&db_path, &FilterCommit::from_state(&first)).expect("save should succeed");
    save_last_preset(&db_path, &FilterCommit::from_state(&second)).expect("save should succeed");

    let loaded = load_last_preset(&db_path)
        .expect("load should succeed")
        .expect("preset should exist");
    assert_eq!(loaded, second);

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let preset_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM preset", [], |row| row.get(0))
        .expect("preset count query should succeed");
    let field_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM preset_field", [], |row| row.get(0))
        .expect("field count query should succeed");

    assert_eq!(preset_count, 1, "only the last slot should remain");
    assert_eq!(field_count, 0, "previous multi-select rows should be gone");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn preset_service_roundtrip_through_store_trait() {
    let temp_dir = unique_test_dir("preset-service");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("filters.sqlite");

    let service = PresetService::new(Arc::new(SqlitePresetStore {
        db_path: db_path.clone(),
    }));

    service.init().expect("init should succeed");
    assert!(service.load_last().expect("load should succeed").is_none());

    let state = populated_state();
    service
        .save_last(&FilterCommit::from_state(&state))
        .expect("save should succeed");
    let loaded = service
        .load_last()
        .expect("load should succeed")
        .expect("preset should exist");
    assert_eq!(loaded, state);

    service.clear().expect("clear should succeed");
    assert!(service.load_last().expect("load should succeed").is_none());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn preset_store_surfaces_init_failure() {
    let temp_dir = unique_test_dir("preset-init-fail");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let blocker = temp_dir.join("blocker");
    fs::write(&blocker, "not a directory").expect("should write blocker file");

    let service = PresetService::new(Arc::new(SqlitePresetStore {
        db_path: blocker.join("filters.sqlite"),
    }));

    assert!(service.init().is_err());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_geo_csv_splits_zones_and_skips_unknown() {
    let temp_dir = unique_test_dir("geo-csv");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let csv_path = temp_dir.join("wards.csv");
    fs::write(
        &csv_path,
        "Zone,Ward\nEAST_ZONE,W1\nWEST_ZONE,W3\nNORTH_ZONE,W9\nEAST_ZONE,\nEAST_ZONE,W2\n",
    )
    .expect("should write csv fixture");

    let geo = load_geo_csv(&csv_path).expect("load should succeed");

    assert_eq!(
        geo.east,
        vec![GeoRecord::new("W1"), GeoRecord::new("W2")],
        "unknown zones and blank wards should be skipped"
    );
    assert_eq!(geo.west, vec![GeoRecord::new("W3")]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_geo_csv_requires_zone_column() {
    let temp_dir = unique_test_dir("geo-csv-no-zone");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let csv_path = temp_dir.join("wards.csv");
    fs::write(&csv_path, "Ward\nW1\n").expect("should write csv fixture");

    let err = load_geo_csv(&csv_path).expect_err("missing zone column should fail");
    assert!(
        err.to_string().contains("missing a Zone column"),
        "unexpected error: {err:#}"
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_geo_xlsx_reads_zone_sheets() {
    let xlsx_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("wards_test.xlsx");

    let geo = load_geo_xlsx(&xlsx_path).expect("should read ward workbook");

    assert_eq!(
        geo.east,
        vec![
            GeoRecord::new("Kumbharwada"),
            GeoRecord::new("Vadva"),
            GeoRecord::new("Kumbharwada"),
        ],
        "blank ward rows should be skipped"
    );
    assert_eq!(
        geo.west,
        vec![GeoRecord::new("Ghogha Circle"), GeoRecord::new("Chitra")],
        "ward column should be found by header scan"
    );
}

#[test]
fn parse_ward_records_csv_reads_ward_column() {
    let records =
        parse_ward_records_csv("ward\nW1\n\nW2\n", "fixture").expect("parse should succeed");

    assert_eq!(records, vec![GeoRecord::new("W1"), GeoRecord::new("W2")]);
}

#[test]
fn parse_ward_records_csv_rejects_missing_column() {
    let err = parse_ward_records_csv("Name\nW1\n", "fixture")
        .expect_err("missing ward column should fail");

    assert!(
        err.to_string().contains("missing a Ward column"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn default_geo_data_parses_embedded_register() {
    let geo = default_geo_data().expect("bundled register should parse");

    assert_eq!(geo.east.len(), 9);
    assert_eq!(geo.west.len(), 8);
    assert!(geo.east.iter().any(|record| record.ward == "Kumbharwada"));

    let east_options = derive_ward_options(&SelectOption::new(EAST_ZONE_VALUE), &geo);
    assert_eq!(east_options.len(), 8, "duplicate east wards should collapse");
    let west_options = derive_ward_options(&SelectOption::new(WEST_ZONE_VALUE), &geo);
    assert_eq!(west_options.len(), 7, "duplicate west wards should collapse");
}

#[test]
fn default_filter_config_matches_dashboard_options() {
    let config = default_filter_config();

    assert_eq!(option_values(&config.company_options), vec!["BMC"]);
    assert_eq!(option_values(&config.branch_options), vec!["BMC"]);
    assert_eq!(option_values(&config.town_options), vec!["BHAVNAGAR_OSC"]);
    assert_eq!(
        option_values(&config.zone_options),
        vec![EAST_ZONE_VALUE, WEST_ZONE_VALUE]
    );
}

#[test]
fn all_sentinel_is_its_own_label() {
    let all = SelectOption::all();

    assert_eq!(all.value, ALL_VALUE);
    assert_eq!(all.label, ALL_VALUE);
    assert!(all.is_all());
    assert!(!SelectOption::new(EAST_ZONE_VALUE).is_all());
}

#[test]
fn default_db_path_points_at_reports_data_dir() {
    let db_path = default_db_path().expect("default db path should resolve");

    assert_eq!(
        db_path.file_name().and_then(|name| name.to_str()),
        Some("filters.sqlite")
    );
    assert!(
        db_path.to_string_lossy().contains("reports"),
        "db path should live under the reports data dir: {}",
        db_path.display()
    );
}

#[test]
fn ensure_webview_data_dir_creates_webview2_subdir() {
    let temp_dir = unique_test_dir("webview-data-dir");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let webview_dir =
        ensure_webview_data_dir(&temp_dir).expect("webview data dir should be created");

    assert_eq!(webview_dir, temp_dir.join("webview2"));
    assert!(webview_dir.is_dir(), "webview2 directory should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn nav_reports_carries_job_submenu() {
    let items = nav_items();
    let reports = items
        .iter()
        .find(|item| item.id == "nav_reports")
        .expect("reports entry should exist");

    assert_eq!(reports.submenu.len(), 1);
    let group = &reports.submenu[0];
    assert_eq!(group.title, "Job");
    let names: Vec<&str> = group.items.iter().map(|link| link.name).collect();
    assert_eq!(names, vec!["Job Summary", "Job Details Summary"]);
}

#[test]
fn nav_initial_takes_first_character() {
    assert_eq!(nav_initial("Dashboard"), "D");
    assert_eq!(nav_initial(""), "");
}

#[test]
fn report_categories_have_unique_leaf_ids() {
    let groups = report_categories();
    let ids: Vec<&str> = groups
        .iter()
        .flat_map(|group| group.leaves.iter().map(|leaf| leaf.id))
        .collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();

    assert_eq!(ids.len(), unique.len());
}

#[test]
fn prune_checked_items_drops_unknown_leaves() {
    let checked = BTreeSet::from(["job_summary".to_string(), "stale_leaf".to_string()]);

    let pruned = prune_checked_items(&checked, &report_categories());

    assert_eq!(pruned, vec!["job_summary".to_string()]);
}

#[test]
fn commit_chips_list_scope_and_counts() {
    let state = FilterState {
        company: vec![SelectOption::new("BMC")],
        zone: SelectOption::new(EAST_ZONE_VALUE),
        ward: SelectOption::new("W1"),
        date_range: Some(DateRange {
            from: NaiveDate::from_ymd_opt(2025, 4, 1),
            to: None,
        }),
        checked_items: BTreeSet::from(["a".to_string(), "b".to_string()]),
        ..FilterState::default()
    };

    let chips = commit_chips(&FilterCommit::from_state(&state));

    assert!(chips.contains(&"Zone: EAST_ZONE".to_string()));
    assert!(chips.contains(&"Ward: W1".to_string()));
    assert!(chips.contains(&"Company: BMC".to_string()));
    assert!(chips.contains(&"Dates: 2025-04-01 to any".to_string()));
    assert!(chips.contains(&"Categories: 2".to_string()));
    assert!(
        !chips.iter().any(|chip| chip.starts_with("Branch")),
        "empty multi-selects should not produce chips"
    );

    let unconstrained = commit_chips(&FilterCommit::from_state(&FilterState::default()));
    assert!(
        unconstrained.is_empty(),
        "All-valued zone/ward should not produce chips: {unconstrained:?}"
    );
}

#[test]
fn sidebar_style_collapses_width() {
    let collapsed = sidebar_style(true);
    let expanded = sidebar_style(false);

    assert!(collapsed.contains("width: 64px"));
    assert!(expanded.contains("width: 200px"));
    for style in [collapsed, expanded] {
        assert!(style.contains("height: 100vh"));
        assert!(style.contains("flex-direction: column"));
    }
}

#[test]
fn overlay_and_submenu_styles_position_layers() {
    let overlay = panel_overlay_style();
    assert!(overlay.contains("position: fixed"));
    assert!(overlay.contains("inset: 0"));

    let submenu = submenu_style();
    assert!(submenu.contains("position: absolute"));
    assert!(submenu.contains("left: 100%"));
    assert!(submenu.contains("z-index"));
}

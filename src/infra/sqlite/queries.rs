use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::params;

use crate::domain::entities::filter::{DateRange, FilterCommit, FilterState};
use crate::domain::entities::options::SelectOption;
use crate::infra::sqlite::schema::open_connection;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MULTI_FIELDS: [&str; 3] = ["company", "branch", "town"];

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn parse_date(text: Option<String>) -> Option<NaiveDate> {
    text.and_then(|t| NaiveDate::parse_from_str(&t, DATE_FORMAT).ok())
}

fn multi_field_values<'a>(state: &'a FilterState, field: &str) -> &'a [SelectOption] {
    match field {
        "company" => &state.company,
        "branch" => &state.branch,
        _ => &state.town,
    }
}

/// There is exactly one preset slot; saving discards whatever was there.
pub fn save_last_preset(db_path: &Path, commit: &FilterCommit) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start preset transaction")?;

    tx.execute("DELETE FROM preset_checked", [])
        .context("failed to clear previous checked items")?;
    tx.execute("DELETE FROM preset_field", [])
        .context("failed to clear previous field values")?;
    tx.execute("DELETE FROM preset", [])
        .context("failed to clear previous preset")?;

    let (date_from, date_to) = match commit.date_range {
        Some(range) => (format_date(range.from), format_date(range.to)),
        None => (None, None),
    };
    tx.execute(
        "INSERT INTO preset(zone, ward, date_from, date_to) VALUES (?1, ?2, ?3, ?4)",
        params![
            commit.state.zone.value,
            commit.state.ward.value,
            date_from,
            date_to
        ],
    )
    .context("failed to insert preset")?;
    let preset_id = tx.last_insert_rowid();

    let mut insert_field = tx
        .prepare(
            "INSERT INTO preset_field(preset_id, field, item_idx, value) VALUES (?1, ?2, ?3, ?4)",
        )
        .context("failed to prepare field insert")?;
    for field in MULTI_FIELDS {
        for (item_idx, option) in multi_field_values(&commit.state, field).iter().enumerate() {
            insert_field
                .execute(params![preset_id, field, item_idx as i64, option.value])
                .context("failed to insert field value")?;
        }
    }
    drop(insert_field);

    let mut insert_checked = tx
        .prepare("INSERT INTO preset_checked(preset_id, item) VALUES (?1, ?2)")
        .context("failed to prepare checked insert")?;
    for item in &commit.checked_items {
        insert_checked
            .execute(params![preset_id, item])
            .context("failed to insert checked item")?;
    }
    drop(insert_checked);

    tx.commit().context("failed to commit preset transaction")
}

pub fn load_last_preset(db_path: &Path) -> Result<Option<FilterState>> {
    let conn = open_connection(db_path)?;

    let mut preset_stmt = conn
        .prepare(
            "SELECT id, zone, ward, date_from, date_to
             FROM preset
             ORDER BY id DESC
             LIMIT 1",
        )
        .context("failed to prepare preset query")?;
    let mut preset_rows = preset_stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })
        .context("failed to query preset")?;

    let Some(head) = preset_rows.next() else {
        return Ok(None);
    };
    let (preset_id, zone, ward, date_from, date_to) = head.context("failed to read preset row")?;
    drop(preset_rows);
    drop(preset_stmt);

    let mut state = FilterState {
        zone: SelectOption::new(zone),
        ward: SelectOption::new(ward),
        ..FilterState::default()
    };

    let from = parse_date(date_from);
    let to = parse_date(date_to);
    if from.is_some() || to.is_some() {
        state.date_range = Some(DateRange { from, to });
    }

    let mut field_stmt = conn
        .prepare(
            "SELECT field, value
             FROM preset_field
             WHERE preset_id = ?1
             ORDER BY field ASC, item_idx ASC",
        )
        .context("failed to prepare field query")?;
    let field_rows = field_stmt
        .query_map([preset_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to query field values")?;
    for row in field_rows {
        let (field, value) = row.context("failed to read field row")?;
        let target = match field.as_str() {
            "company" => &mut state.company,
            "branch" => &mut state.branch,
            "town" => &mut state.town,
            _ => continue,
        };
        target.push(SelectOption::new(value));
    }
    drop(field_stmt);

    let mut checked_stmt = conn
        .prepare("SELECT item FROM preset_checked WHERE preset_id = ?1")
        .context("failed to prepare checked query")?;
    let checked_rows = checked_stmt
        .query_map([preset_id], |row| row.get::<_, String>(0))
        .context("failed to query checked items")?;
    let mut checked = BTreeSet::new();
    for row in checked_rows {
        checked.insert(row.context("failed to read checked row")?);
    }
    state.checked_items = checked;

    Ok(Some(state))
}

pub fn clear_presets(db_path: &Path) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM preset_checked", [])
        .context("failed to clear checked items")?;
    conn.execute("DELETE FROM preset_field", [])
        .context("failed to clear field values")?;
    conn.execute("DELETE FROM preset", [])
        .context("failed to clear presets")?;
    Ok(())
}

use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::domain::entities::geo::{GeoDataSource, GeoRecord};

pub const EAST_SHEET: &str = "East Zone";
pub const WEST_SHEET: &str = "West Zone";

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn read_ward_sheet<RS>(workbook: &mut Sheets<RS>, sheet: &str) -> Result<Vec<GeoRecord>>
where
    RS: Read + Seek,
{
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("failed to read sheet: {sheet}"))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let ward_idx = header
        .iter()
        .position(|cell| data_to_string(cell).eq_ignore_ascii_case("ward"))
        .with_context(|| format!("sheet is missing a Ward column: {sheet}"))?;

    let mut records = Vec::new();
    for row in rows {
        let ward = row.get(ward_idx).map(data_to_string).unwrap_or_default();
        if ward.is_empty() {
            continue;
        }
        records.push(GeoRecord::new(ward));
    }
    Ok(records)
}

/// Ward register from a workbook with one sheet per zone.
pub fn load_geo_xlsx(path: &Path) -> Result<GeoDataSource> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open xlsx: {}", path.display()))?;

    let east = read_ward_sheet(&mut workbook, EAST_SHEET)?;
    let west = read_ward_sheet(&mut workbook, WEST_SHEET)?;
    Ok(GeoDataSource::new(east, west))
}

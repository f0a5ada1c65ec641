use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::geo::{GeoDataSource, GeoRecord, EAST_ZONE_VALUE, WEST_ZONE_VALUE};

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn ward_records_from_reader<R: Read>(
    reader: &mut csv::Reader<R>,
    source: &str,
) -> Result<Vec<GeoRecord>> {
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {source}"))?
        .clone();
    let ward_idx = column_index(&headers, "Ward")
        .with_context(|| format!("csv is missing a Ward column: {source}"))?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("failed to parse csv record: {source}"))?;
        let ward = record.get(ward_idx).unwrap_or("").trim();
        if ward.is_empty() {
            continue;
        }
        records.push(GeoRecord::new(ward));
    }
    Ok(records)
}

/// Single-zone ward list (a `Ward` column) from in-memory CSV data. Used
/// for the bundled default register.
pub fn parse_ward_records_csv(data: &str, source: &str) -> Result<Vec<GeoRecord>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    ward_records_from_reader(&mut reader, source)
}

/// Combined ward register from a CSV file with `Zone` and `Ward` columns.
/// Rows whose zone is neither east nor west are skipped.
pub fn load_geo_csv(path: &Path) -> Result<GeoDataSource> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open csv: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", path.display()))?
        .clone();
    let zone_idx = column_index(&headers, "Zone")
        .with_context(|| format!("csv is missing a Zone column: {}", path.display()))?;
    let ward_idx = column_index(&headers, "Ward")
        .with_context(|| format!("csv is missing a Ward column: {}", path.display()))?;

    let mut geo = GeoDataSource::default();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let zone = record.get(zone_idx).unwrap_or("").trim();
        let ward = record.get(ward_idx).unwrap_or("").trim();
        if ward.is_empty() {
            continue;
        }
        match zone {
            EAST_ZONE_VALUE => geo.east.push(GeoRecord::new(ward)),
            WEST_ZONE_VALUE => geo.west.push(GeoRecord::new(ward)),
            _ => {}
        }
    }
    Ok(geo)
}

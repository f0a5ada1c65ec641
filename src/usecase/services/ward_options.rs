use std::collections::HashSet;

use crate::domain::entities::geo::{GeoDataSource, GeoRecord, EAST_ZONE_VALUE, WEST_ZONE_VALUE};
use crate::domain::entities::options::SelectOption;

/// Ward options for the given zone selection. Any zone value other than
/// the two known ones (including the "All" sentinel) scans the union of
/// both registers, east first. Duplicates keep their first occurrence.
pub fn derive_ward_options(zone: &SelectOption, geo: &GeoDataSource) -> Vec<SelectOption> {
    let (primary, secondary): (&[GeoRecord], &[GeoRecord]) = match zone.value.as_str() {
        EAST_ZONE_VALUE => (&geo.east, &[]),
        WEST_ZONE_VALUE => (&geo.west, &[]),
        _ => (&geo.east, &geo.west),
    };

    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for record in primary.iter().chain(secondary.iter()) {
        if seen.insert(record.ward.clone()) {
            options.push(SelectOption::new(record.ward.clone()));
        }
    }
    options
}

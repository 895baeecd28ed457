use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::mileage_table::{MileageEntry, MileageKind, MileageTable};
use crate::routing::{Loc, MileageRoute, MpmCollector, RouteItem, TpmRetriever};

/// Tries the city codes first and falls back to the raw airport codes.
fn lookup_pair(
    table: &MileageTable,
    origin: &[&Loc],
    destination: &[&Loc],
    kind: MileageKind,
) -> Option<MileageEntry> {
    origin.iter().find_map(|from| {
        destination.iter().find_map(|to| {
            table
                .lookup(from.city_code(), to.city_code(), kind)
                .or_else(|| table.lookup(&from.code, &to.code, kind))
        })
    })
}

/// Per-leg ticketed point mileage from a [`MileageTable`].
#[derive(Debug, Clone)]
pub struct TableTpmCollector {
    table: Arc<MileageTable>,
}

impl TableTpmCollector {
    pub fn new(table: Arc<MileageTable>) -> Self {
        Self { table }
    }
}

impl TpmRetriever for TableTpmCollector {
    fn retrieve(&self, item: &mut RouteItem) -> bool {
        let entry = lookup_pair(
            &self.table,
            &[item.orig_city_or_airport(), item.city1.as_ref()],
            &[item.dest_city_or_airport(), item.city2.as_ref()],
            MileageKind::Tpm,
        );
        match entry {
            Some(entry) => {
                item.tpm = entry.mileage;
                item.tpm_global_direction = entry.global_direction;
                true
            }
            None => {
                debug!(leg = %item.label(), "no published TPM");
                false
            }
        }
    }

    fn mileage_between(&self, origin: &Loc, destination: &Loc, _date: NaiveDate) -> Option<u16> {
        lookup_pair(&self.table, &[origin], &[destination], MileageKind::Tpm)
            .map(|entry| entry.mileage)
    }
}

/// Maximum permitted mileage from the route origin to each fare point.
#[derive(Debug, Clone)]
pub struct TableMpmCollector {
    table: Arc<MileageTable>,
}

impl TableMpmCollector {
    pub fn new(table: Arc<MileageTable>) -> Self {
        Self { table }
    }
}

impl MpmCollector for TableMpmCollector {
    fn collect(&self, route: &mut MileageRoute) -> bool {
        let Some(first) = route.items.first() else {
            return false;
        };
        let origin = first.orig_city_or_airport().clone();
        let origin_airport = Arc::clone(&first.city1);

        for item in route.items.iter_mut() {
            let entry = lookup_pair(
                &self.table,
                &[&origin, origin_airport.as_ref()],
                &[item.dest_city_or_airport(), item.city2.as_ref()],
                MileageKind::Mpm,
            );
            item.mpm = entry.map_or(0, |entry| entry.mileage);
            if let Some(entry) = entry {
                item.mpm_global_direction = entry.global_direction;
            }
        }

        route.mileage_route_mpm = route.items.last().map_or(0, |item| item.mpm);
        route.mileage_route_mpm != 0
    }
}

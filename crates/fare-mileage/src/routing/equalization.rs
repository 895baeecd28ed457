use std::sync::Arc;

use tracing::debug;

use super::global_direction::GlobalDirection;
use super::mileage_route::{saturate, MileageRoute};
use super::services::{LocationLookup, MpmCollector, TpmRetriever};
use super::surcharge::get_ems;
use super::tpd::TicketedPointDeduction;

const RIO: &str = "RIO";
const SAO: &str = "SAO";
const NORTH_AMERICA_AREA: &str = "1";

/// RIO/SAO mileage equalization.
///
/// Within the Western Hemisphere, a fare to or from Rio de Janeiro may be
/// assessed as if it were to or from Sao Paulo (and vice versa) when that
/// lowers the surcharge.
#[derive(Clone)]
pub struct MileageEqualization {
    locations: Arc<dyn LocationLookup>,
    tpm: Arc<dyn TpmRetriever>,
    mpm: Arc<dyn MpmCollector>,
    tpd: TicketedPointDeduction,
}

impl MileageEqualization {
    pub fn new(
        locations: Arc<dyn LocationLookup>,
        tpm: Arc<dyn TpmRetriever>,
        mpm: Arc<dyn MpmCollector>,
        tpd: TicketedPointDeduction,
    ) -> Self {
        Self {
            locations,
            tpm,
            mpm,
            tpd,
        }
    }

    /// Replaces the route mileages with the substituted ones when the
    /// substitution yields a strictly lower surcharge than `route.ems`.
    pub fn apply(&self, route: &mut MileageRoute) -> bool {
        if route.global_direction != GlobalDirection::WesternHemisphere || route.items.is_empty() {
            return false;
        }

        let last = route.items.len() - 1;
        let (index, substitute_origin, current, opposite_area) = {
            let origin = route.items[0].orig_city_or_airport();
            let destination = route.items[last].dest_city_or_airport();
            if is_equalized_city(origin.city_code()) {
                (0, true, origin.city_code().to_string(), destination.area.clone())
            } else if is_equalized_city(destination.city_code()) {
                (last, false, destination.city_code().to_string(), origin.area.clone())
            } else {
                return false;
            }
        };

        if opposite_area != NORTH_AMERICA_AREA {
            return false;
        }

        let swapped = if current == RIO { SAO } else { RIO };
        let already_on_route = route.items.iter().any(|item| {
            item.orig_city_or_airport().city_code() == swapped
                || item.dest_city_or_airport().city_code() == swapped
        });
        if already_on_route {
            return false;
        }

        let Some(swapped_loc) = self.locations.location(swapped, route.items[index].travel_date)
        else {
            return false;
        };

        let mut substituted = route.clone();
        {
            let item = &mut substituted.items[index];
            if substitute_origin {
                item.city1 = swapped_loc;
                item.multi_transport_origin = None;
            } else {
                item.city2 = swapped_loc;
                item.multi_transport_destination = None;
            }
            if !self.tpm.retrieve(item) {
                return false;
            }
        }
        if !self.mpm.collect(&mut substituted) {
            return false;
        }

        for item in substituted.items.iter_mut() {
            item.tpd = 0;
        }
        substituted.tpd = 0;
        let total_tpm = substituted.applicable_tpm(self.tpm.as_ref());
        if self.tpd.apply(&mut substituted) {
            debug!(tpd = substituted.tpd, "tpd applied to equalized route");
        }
        substituted.mileage_route_tpm = saturate(total_tpm.saturating_sub(u32::from(substituted.tpd)));
        substituted.ems = get_ems(substituted.mileage_route_tpm, substituted.mileage_route_mpm);

        if substituted.ems >= route.ems {
            debug!(
                current = route.ems,
                equalized = substituted.ems,
                "equalization does not lower the surcharge"
            );
            return false;
        }

        debug!(from = %current, to = swapped, ems = substituted.ems, "mileage equalization applied");
        route.items[index].tpm = substituted.items[index].tpm;
        route.items[last].mpm = substituted.items[last].mpm;
        route.items[last].tpd = substituted.items[last].tpd;
        route.mileage_route_tpm = substituted.mileage_route_tpm;
        route.mileage_route_mpm = substituted.mileage_route_mpm;
        route.tpd = substituted.tpd;
        route.ems = substituted.ems;
        route.mileage_equalization_applies = true;
        true
    }
}

fn is_equalized_city(code: &str) -> bool {
    code == RIO || code == SAO
}

mod geo_locs;

use std::sync::Arc;

use tracing::debug;

use super::carrier_rules;
use super::mileage_route::MileageRoute;
use super::services::TpdPsrRepository;
use super::tpd_psr::{ApplInd, TpdPsr, UNLIMITED_STOPOVERS};
use geo_locs::GeoLocCursor;

/// Permissible specified routing engine.
///
/// A PSR publishes routings that are valid regardless of mileage. The route is
/// tested as travelled and, failing that, in the reverse direction.
#[derive(Clone)]
pub struct PermissibleSpecifiedRouting {
    repository: Arc<dyn TpdPsrRepository>,
}

impl PermissibleSpecifiedRouting {
    pub fn new(repository: Arc<dyn TpdPsrRepository>) -> Self {
        Self { repository }
    }

    /// Records the matched PSR, its set number and the HIP exemption on the
    /// route when a record applies. `psr_may_apply` is raised when a record
    /// fitted the route except for its stopover conditions.
    pub fn apply(&self, route: &mut MileageRoute) -> bool {
        if route.items.len() <= 1 {
            return false;
        }

        let candidates = self.candidates(route);
        if candidates.is_empty() {
            return false;
        }

        if validate(route, &candidates) {
            return true;
        }

        let mut reversed = route.reversed();
        reversed.psr_may_apply = false;
        let matched = validate(&mut reversed, &candidates);
        route.psr_may_apply |= reversed.psr_may_apply;
        if matched {
            debug!(set_no = reversed.psr_set_number, "psr matched reversed route");
            route.applicable_psr = reversed.applicable_psr.take();
            route.psr_set_number = reversed.psr_set_number;
            route.hip_exempt |= reversed.hip_exempt;
            route.stopover_count = reversed.stopover_count;
        }
        matched
    }

    fn candidates(&self, route: &MileageRoute) -> Vec<Arc<TpdPsr>> {
        match (route.origin(), route.destination()) {
            (Some(origin), Some(destination)) => self.repository.tpd_psr(
                ApplInd::Psr,
                route.record_lookup_carrier(),
                &origin.area,
                &destination.area,
                route.travel_date,
            ),
            _ => Vec::new(),
        }
    }
}

fn validate(route: &mut MileageRoute, candidates: &[Arc<TpdPsr>]) -> bool {
    for record in candidates {
        if !record.applies_to_direction(route.global_direction) {
            continue;
        }
        let Some(orig_is_loc1) = record.orientation(route) else {
            continue;
        };

        let carriers_ok = carrier_rules::thru_market_carriers_ok(route, record)
            && carrier_rules::via_market_same_carrier_ok(route, record)
            && carrier_rules::via_carrier_locs_ok(route, record)
            && carrier_rules::via_carrier_exceptions_ok(route, record)
            && fare_type_ok(route, record);
        if !carriers_ok {
            continue;
        }

        let Some(set_no) = match_via_geo_locs(route, record, orig_is_loc1) else {
            continue;
        };
        if !stopover_conditions_ok(route, record) {
            debug!(seq_no = record.seq_no, "psr may apply: stopover conditions not met");
            continue;
        }

        debug!(seq_no = record.seq_no, set_no, "psr matched");
        route.applicable_psr = Some(Arc::clone(record));
        route.psr_set_number = set_no;
        if record.psr_hip {
            route.hip_exempt = true;
        }
        return true;
    }
    false
}

/// Fare type applicability is not coded yet: every record passes.
fn fare_type_ok(_route: &MileageRoute, _record: &TpdPsr) -> bool {
    true
}

/// Returns the number of the first via geo-loc set the route's via points
/// satisfy. A record without via geo-locs matches with set number 0.
pub(crate) fn match_via_geo_locs(
    route: &mut MileageRoute,
    record: &TpdPsr,
    orig_is_loc1: bool,
) -> Option<u32> {
    for item in route.items.iter_mut() {
        item.psr_stop_not_allowed = false;
    }

    let sets = record.geo_loc_sets();
    if sets.is_empty() {
        return Some(0);
    }

    let via_points = route.items.len().saturating_sub(1);
    for set in &sets {
        let mut cursor = GeoLocCursor::new(set);
        let walked = route.items[..via_points]
            .iter_mut()
            .all(|item| cursor.advance(item, orig_is_loc1));
        if walked && cursor.is_complete() {
            return Some(set.set_no);
        }
        for item in route.items.iter_mut() {
            item.psr_stop_not_allowed = false;
        }
    }
    None
}

/// Stopover restrictions raised while matching via points, then the record's
/// stopover count limit. A failure here means the PSR may still apply.
fn stopover_conditions_ok(route: &mut MileageRoute, record: &TpdPsr) -> bool {
    let via_points = route.intermediate_items();
    if via_points.iter().any(|item| item.psr_stop_not_allowed) {
        route.psr_may_apply = true;
        return false;
    }

    let stopovers = via_points
        .iter()
        .filter(|item| item.is_effective_stopover())
        .count();
    route.stopover_count = u16::try_from(stopovers).unwrap_or(u16::MAX);

    let limit_exceeded = record.stopover_cnt != UNLIMITED_STOPOVERS
        && i64::try_from(stopovers).unwrap_or(i64::MAX) > i64::from(record.stopover_cnt);
    if limit_exceeded {
        route.psr_may_apply = true;
        return false;
    }
    true
}

use std::sync::Arc;

use tracing::debug;

use super::carrier_rules;
use super::diagnostics::TpdMatchInfo;
use super::is_in_loc::{is_in_loc, MatchOutcome};
use super::location::LocKey;
use super::mileage_route::MileageRoute;
use super::services::TpdPsrRepository;
use super::tpd_psr::{ApplInd, GeoLocSet, RelationalInd, TpdPsr, ViaGeoLoc};

/// Ticketed point deduction engine.
///
/// Selects, among the TPD records that fit the route, the one with the largest
/// mileage deduction and writes it to the last route item and the route.
#[derive(Clone)]
pub struct TicketedPointDeduction {
    repository: Arc<dyn TpdPsrRepository>,
}

impl TicketedPointDeduction {
    pub fn new(repository: Arc<dyn TpdPsrRepository>) -> Self {
        Self { repository }
    }

    pub fn apply(&self, route: &mut MileageRoute) -> bool {
        self.apply_with_diagnostics(route, None)
    }

    pub fn apply_with_diagnostics(
        &self,
        route: &mut MileageRoute,
        trace: Option<&mut TpdMatchInfo>,
    ) -> bool {
        let (origin_area, destination_area) = match (route.origin(), route.destination()) {
            (Some(origin), Some(destination)) => (origin.area.clone(), destination.area.clone()),
            _ => return false,
        };

        let candidates = self.repository.tpd_psr(
            ApplInd::Tpd,
            route.record_lookup_carrier(),
            &origin_area,
            &destination_area,
            route.travel_date,
        );

        let direction = route.global_direction;
        let mut best: Option<TpdMatchInfo> = None;
        for record in candidates
            .iter()
            .filter(|record| record.applies_to_direction(direction))
        {
            let Some(orig_is_loc1) = record.orientation(route) else {
                continue;
            };
            let Some(matched) = self.matching_record(route, record, orig_is_loc1) else {
                continue;
            };
            if best
                .as_ref()
                .map_or(true, |current| matched.deduction > current.deduction)
            {
                best = Some(matched);
            }
        }

        let Some(winner) = best.filter(|winner| winner.deduction > 0) else {
            return false;
        };

        debug!(
            seq_no = winner.seq_no,
            deduction = winner.deduction,
            "ticketed point deduction applied"
        );
        if let Some(last) = route.items.last_mut() {
            last.tpd = winner.deduction;
        }
        route.tpd = winner.deduction;
        if let Some(trace) = trace {
            *trace = winner;
        }
        true
    }

    fn matching_record(
        &self,
        route: &mut MileageRoute,
        record: &TpdPsr,
        orig_is_loc1: bool,
    ) -> Option<TpdMatchInfo> {
        let mut matched = TpdMatchInfo {
            seq_no: record.seq_no,
            deduction: record.tpm_deduction,
            ..TpdMatchInfo::default()
        };

        let accepted = process_via_geo_locs(route, record, orig_is_loc1, &mut matched)
            && thru_via_market_only_ok(route, record)
            && carrier_rules::thru_market_carriers_ok(route, record)
            && carrier_rules::via_market_same_carrier_ok(route, record)
            && carrier_rules::via_carrier_locs_ok(route, record)
            && carrier_rules::via_carrier_exceptions_ok(route, record);

        accepted.then_some(matched)
    }
}

/// Sets are alternatives: the first one that matches accepts the record.
pub(crate) fn process_via_geo_locs(
    route: &mut MileageRoute,
    record: &TpdPsr,
    orig_is_loc1: bool,
    trace: &mut TpdMatchInfo,
) -> bool {
    let sets = record.geo_loc_sets();
    if sets.is_empty() {
        return true;
    }

    sets.iter()
        .any(|set| match_geo_loc_set(route, set, orig_is_loc1, trace))
}

fn match_geo_loc_set(
    route: &mut MileageRoute,
    set: &GeoLocSet,
    orig_is_loc1: bool,
    trace: &mut TpdMatchInfo,
) -> bool {
    let mut local_match = false;
    let mut matched_locs = Vec::new();
    let mut matched_segments = Vec::new();

    for geo_loc in &set.entries {
        let probe = match geo_loc.relational_ind {
            RelationalInd::Blank => true,
            RelationalInd::Or | RelationalInd::AndOr => !local_match,
            RelationalInd::And => local_match,
        };
        if !probe {
            continue;
        }

        local_match = match probe_route(route, geo_loc, orig_is_loc1) {
            Some(segment) => {
                matched_locs.push(geo_loc.loc.clone());
                matched_segments.push(segment);
                true
            }
            None => false,
        };
    }

    if local_match {
        trace.matched_geo_locs = matched_locs;
        trace.matched_segments = matched_segments;
    }
    local_match
}

/// Probes every via point of the route; returns the label of the first
/// matching leg. Stopover-only failures are kept on the last item.
fn probe_route(route: &mut MileageRoute, geo_loc: &ViaGeoLoc, orig_is_loc1: bool) -> Option<String> {
    let via_points = route.items.len().saturating_sub(1);
    let mut conditional: Option<LocKey> = None;
    let mut matched = None;

    for item in route.items[..via_points].iter_mut() {
        match is_in_loc(geo_loc, item, orig_is_loc1) {
            MatchOutcome::Matched => {
                matched = Some(item.label());
                break;
            }
            MatchOutcome::FailedStopoverOnly => conditional = Some(geo_loc.loc.clone()),
            MatchOutcome::FailedLocation => {}
        }
    }

    if let (Some(loc), Some(last)) = (conditional, route.items.last_mut()) {
        last.add_conditional_tpd_via_geo_loc(&loc);
    }
    matched
}

/// With the through/via market only flag every via point must be one of the
/// record's via geo-locs.
fn thru_via_market_only_ok(route: &MileageRoute, record: &TpdPsr) -> bool {
    if !record.tpd_thru_via_mkt_only || record.via_geo_locs.is_empty() {
        return true;
    }

    route.intermediate_items().iter().all(|item| {
        record
            .via_geo_locs
            .iter()
            .any(|geo_loc| item.destination_in(&geo_loc.loc))
    })
}

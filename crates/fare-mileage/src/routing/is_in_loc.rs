use super::route_item::RouteItem;
use super::tpd_psr::ViaGeoLoc;

/// Result of probing a via geo-loc against a route item's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    FailedLocation,
    /// The location matched but a stopover or no-stop restriction did not.
    FailedStopoverOnly,
}

impl MatchOutcome {
    pub fn is_match(self) -> bool {
        self == Self::Matched
    }
}

/// Tests whether `item`'s destination satisfies `geo_loc`.
///
/// `orig_is_loc1` tells which record side the route origin was matched to, so
/// the loc1/loc2 service requirements map onto route begin/route end. A failed
/// direct-service requirement marks `item.failed_dir_service`.
pub fn is_in_loc(geo_loc: &ViaGeoLoc, item: &mut RouteItem, orig_is_loc1: bool) -> MatchOutcome {
    if !item.destination_in(&geo_loc.loc) {
        return MatchOutcome::FailedLocation;
    }

    let (direct_loc1, direct_loc2) = if orig_is_loc1 {
        (item.is_direct_from_route_begin, item.is_direct_to_route_end)
    } else {
        (item.is_direct_to_route_end, item.is_direct_from_route_begin)
    };
    if (geo_loc.req_direct_svc_btw_via_and_loc1 && !direct_loc1)
        || (geo_loc.req_direct_svc_btw_via_and_loc2 && !direct_loc2)
    {
        item.failed_dir_service = true;
        return MatchOutcome::FailedLocation;
    }

    let stop_free = !item.is_effective_stopover();
    if geo_loc.no_stop_btw_via_and_loc1 || geo_loc.no_stop_btw_via_and_loc2 {
        let (occurrence_loc1, occurrence_loc2) = if orig_is_loc1 {
            (
                item.is_first_occurrence_from_route_begin,
                item.is_last_occurrence_to_route_end,
            )
        } else {
            (
                item.is_last_occurrence_to_route_end,
                item.is_first_occurrence_from_route_begin,
            )
        };
        let loc1_ok = !geo_loc.no_stop_btw_via_and_loc1 || (occurrence_loc1 && stop_free);
        let loc2_ok = !geo_loc.no_stop_btw_via_and_loc2 || (occurrence_loc2 && stop_free);
        return if loc1_ok && loc2_ok {
            MatchOutcome::Matched
        } else {
            MatchOutcome::FailedStopoverOnly
        };
    }

    if geo_loc.stopover_not_allowed && !stop_free {
        return MatchOutcome::FailedStopoverOnly;
    }

    MatchOutcome::Matched
}

use super::common::{pit_nyc_bna_mia, route};
use crate::routing::{
    is_in_loc, GlobalDirection, LocKey, LocType, MatchOutcome, RelationalInd, ViaGeoLoc,
};

fn via(code: &str) -> ViaGeoLoc {
    ViaGeoLoc::new(1, 1, LocKey::city(code), RelationalInd::Blank)
}

#[test]
fn matches_destination_through_multi_transport_city() {
    let mut route = route(
        "AA",
        GlobalDirection::Atlantic,
        &[("PIT", "JFK", "AA"), ("JFK", "LHR", "AA")],
    );
    let item = &mut route.items[0];

    assert_eq!(is_in_loc(&via("NYC"), item, true), MatchOutcome::Matched);
    let airport = ViaGeoLoc::new(1, 1, LocKey::new(LocType::Airport, "JFK"), RelationalInd::Blank);
    assert_eq!(is_in_loc(&airport, item, true), MatchOutcome::Matched);
    assert_eq!(is_in_loc(&via("BOS"), item, true), MatchOutcome::FailedLocation);
}

#[test]
fn direct_service_failure_marks_the_item() {
    let mut route = pit_nyc_bna_mia("SAO");
    let mut geo_loc = via("BNA");
    geo_loc.req_direct_svc_btw_via_and_loc1 = true;

    let item = &mut route.items[1];
    assert!(!item.is_direct_from_route_begin);
    assert_eq!(is_in_loc(&geo_loc, item, true), MatchOutcome::FailedLocation);
    assert!(item.failed_dir_service);
}

#[test]
fn direct_service_side_follows_orientation() {
    let mut route = pit_nyc_bna_mia("SAO");
    let mut geo_loc = via("BNA");
    geo_loc.req_direct_svc_btw_via_and_loc1 = true;

    // route runs loc2 -> loc1, so loc1 is the route end and BNA-MIA-SAO is not direct
    let item = &mut route.items[1];
    assert_eq!(is_in_loc(&geo_loc, item, false), MatchOutcome::FailedLocation);

    let item = &mut route.items[2];
    let mut mia = via("MIA");
    mia.req_direct_svc_btw_via_and_loc1 = true;
    assert_eq!(is_in_loc(&mia, item, false), MatchOutcome::Matched);
    assert!(!item.failed_dir_service);
}

#[test]
fn stopover_not_allowed_fails_only_the_stopover_rule() {
    let mut route = pit_nyc_bna_mia("SAO");
    let mut geo_loc = via("NYC");
    geo_loc.stopover_not_allowed = true;

    let item = &mut route.items[0];
    assert_eq!(is_in_loc(&geo_loc, item, true), MatchOutcome::Matched);
    item.is_stopover = true;
    assert_eq!(is_in_loc(&geo_loc, item, true), MatchOutcome::FailedStopoverOnly);
    item.forced_connection = true;
    assert_eq!(is_in_loc(&geo_loc, item, true), MatchOutcome::Matched);
}

#[test]
fn no_stop_requirement_checks_occurrence_and_stopover() {
    let mut route = route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[("PIT", "NYC", "AA"), ("NYC", "MIA", "AA"), ("MIA", "NYC", "AA"), ("NYC", "BOS", "AA")],
    );
    let mut geo_loc = via("NYC");
    geo_loc.no_stop_btw_via_and_loc1 = true;

    assert_eq!(is_in_loc(&geo_loc, &mut route.items[0], true), MatchOutcome::Matched);
    // second visit to NYC is not the first occurrence from the route begin
    assert_eq!(
        is_in_loc(&geo_loc, &mut route.items[2], true),
        MatchOutcome::FailedStopoverOnly
    );

    route.items[0].is_stopover = true;
    assert_eq!(
        is_in_loc(&geo_loc, &mut route.items[0], true),
        MatchOutcome::FailedStopoverOnly
    );
}

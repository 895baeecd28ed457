use std::sync::Arc;

use super::common::{locations, mileages, pit_nyc_bna_mia, route, services_with, store};
use crate::data::{MileageKind, MileageTable, TableMpmCollector, TableTpmCollector};
use crate::routing::{
    get_ems, GlobalDirection, MileageEqualization, MileageRoute, MpmCollector,
    TicketedPointDeduction, TpmRetriever,
};

fn engine(table: MileageTable) -> MileageEqualization {
    let table = Arc::new(table);
    MileageEqualization::new(
        locations(),
        Arc::new(TableTpmCollector::new(Arc::clone(&table))),
        Arc::new(TableMpmCollector::new(table)),
        TicketedPointDeduction::new(store(Vec::new())),
    )
}

/// Collects TPM/MPM and the surcharge the way the validator leaves them.
fn priced(mut route: MileageRoute, table: &MileageTable) -> MileageRoute {
    let table = Arc::new(table.clone());
    let tpm = TableTpmCollector::new(Arc::clone(&table));
    for item in route.items.iter_mut() {
        assert!(tpm.retrieve(item), "tpm for {:?}", item.city2.code);
    }
    assert!(TableMpmCollector::new(table).collect(&mut route));
    let total = route.applicable_tpm(&tpm);
    route.mileage_route_tpm = u16::try_from(total).expect("fits");
    route.ems = get_ems(route.mileage_route_tpm, route.mileage_route_mpm);
    route
}

#[test]
fn sao_destination_is_assessed_as_rio() {
    let table = mileages();
    let mut route = priced(pit_nyc_bna_mia("SAO"), &table);
    assert_eq!(route.mileage_route_tpm, 5967);
    assert_eq!(route.mileage_route_mpm, 5911);
    assert_eq!(route.ems, 5);

    assert!(engine(table).apply(&mut route));
    assert_eq!(route.mileage_route_tpm, 5976);
    assert_eq!(route.mileage_route_mpm, 5995);
    assert_eq!(route.ems, 0);
    assert_eq!(route.items[3].tpm, 4179);
    assert_eq!(route.items[3].mpm, 5995);
    assert!(route.mileage_equalization_applies);
    // the route still ends in SAO
    assert_eq!(route.items[3].city2.code, "SAO");
}

#[test]
fn rio_destination_is_assessed_as_sao_when_cheaper() {
    let mut table = mileages();
    table.insert("MIA", "RIO", MileageKind::Tpm, 4300, GlobalDirection::WesternHemisphere);
    table.insert("PIT", "RIO", MileageKind::Mpm, 5600, GlobalDirection::WesternHemisphere);
    let mut route = priced(pit_nyc_bna_mia("RIO"), &table);
    assert_eq!(route.ems, 10);

    assert!(engine(table).apply(&mut route));
    assert_eq!(route.mileage_route_tpm, 5967);
    assert_eq!(route.mileage_route_mpm, 5911);
    assert_eq!(route.ems, 5);
}

#[test]
fn substituted_total_skips_surface_exempt_legs() {
    let mut table = mileages();
    table.insert("MIA", "RIO", MileageKind::Tpm, 4300, GlobalDirection::WesternHemisphere);
    table.insert("PIT", "RIO", MileageKind::Mpm, 5600, GlobalDirection::WesternHemisphere);
    let mut exempt = pit_nyc_bna_mia("RIO");
    exempt.items[0].tpm_surface_sector_exempt = true;
    let mut route = priced(exempt, &table);
    assert_eq!(route.mileage_route_tpm, 5766);
    assert_eq!(route.ems, 5);

    assert!(engine(table).apply(&mut route));
    assert_eq!(route.mileage_route_tpm, 5636);
    assert_eq!(route.mileage_route_mpm, 5911);
    assert_eq!(route.ems, 0);
}

#[test]
fn reversed_route_substitutes_the_origin() {
    let table = mileages();
    let reversed = route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[
            ("SAO", "MIA", "AA"),
            ("MIA", "BNA", "AA"),
            ("BNA", "NYC", "AA"),
            ("NYC", "PIT", "AA"),
        ],
    );
    let mut route = priced(reversed, &table);
    assert_eq!(route.ems, 5);

    assert!(engine(table).apply(&mut route));
    assert_eq!(route.items[0].tpm, 4179);
    assert_eq!(route.mileage_route_mpm, 5995);
    assert_eq!(route.ems, 0);
}

#[test]
fn equal_surcharge_is_rejected() {
    let mut table = mileages();
    table.insert("PIT", "RIO", MileageKind::Mpm, 5700, GlobalDirection::WesternHemisphere);
    let mut route = priced(pit_nyc_bna_mia("SAO"), &table);
    let before = route.clone();

    assert!(!engine(table).apply(&mut route));
    assert_eq!(route, before);
}

#[test]
fn already_cheaper_route_is_left_alone() {
    let table = mileages();
    let mut route = priced(pit_nyc_bna_mia("RIO"), &table);
    assert_eq!(route.ems, 0);
    let before = route.clone();

    assert!(!engine(table).apply(&mut route));
    assert_eq!(route, before);
}

#[test]
fn only_western_hemisphere_rio_sao_routes_qualify() {
    let table = mileages();
    let mut atlantic = priced(pit_nyc_bna_mia("SAO"), &table);
    atlantic.global_direction = GlobalDirection::Atlantic;
    assert!(!engine(table.clone()).apply(&mut atlantic));

    let mut elsewhere = route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[("PIT", "NYC", "AA"), ("NYC", "BNA", "AA")],
    );
    elsewhere.ems = 10;
    assert!(!engine(table.clone()).apply(&mut elsewhere));

    let mut empty = MileageRoute {
        global_direction: GlobalDirection::WesternHemisphere,
        ..MileageRoute::default()
    };
    assert!(!engine(table).apply(&mut empty));
}

#[test]
fn opposite_point_outside_area_one_or_swapped_city_on_route() {
    let table = mileages();
    let mut from_europe = route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[("LHR", "MIA", "AA"), ("MIA", "SAO", "AA")],
    );
    from_europe.ems = 10;
    assert!(!engine(table.clone()).apply(&mut from_europe));

    let mut via_rio = route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[("MIA", "RIO", "AA"), ("RIO", "SAO", "AA")],
    );
    via_rio.ems = 10;
    assert!(!engine(table).apply(&mut via_rio));
}

#[test]
fn validator_reports_surcharges_before_and_after() {
    let services = services_with(mileages(), Vec::new());
    let validator = crate::routing::MileageValidator::new(services);
    let mut info = crate::routing::MileageInfo::default();
    let mut route = priced(pit_nyc_bna_mia("SAO"), &mileages());
    info.surcharge_amt = route.ems;

    assert!(validator.apply_mileage_equalization(
        &mut route,
        &mut info,
        &mut crate::routing::NoDiagnostics
    ));
    assert!(info.equalization_applies);
    assert_eq!(info.equalization_surcharges, Some((5, 0)));
    assert_eq!(info.total_applicable_tpm, 5976);
    assert_eq!(info.total_applicable_mpm, 5995);
    assert_eq!(info.surcharge_amt, 0);
}

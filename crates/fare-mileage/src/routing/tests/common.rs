use std::sync::Arc;

use chrono::NaiveDate;

use crate::data::{
    LocationTable, MileageKind, MileageTable, TableMpmCollector, TableTpmCollector, TpdPsrStore,
};
use crate::routing::{
    ApplInd, GlobalDirection, LocKey, MileageRoute, MileageServices, RelationalInd, RouteBuilder,
    TpdPsr, TravelRoute, TravelSegment, ViaGeoLoc,
};

const LOCATIONS: &str = "code,city,nation,state,area,sub_area
AAA,,BR,,1,13
ASU,,PY,,1,13
BNA,,US,TN,1,11
BOS,,US,MA,1,11
BUE,,AR,,1,13
EZE,BUE,AR,,1,13
CHI,,US,IL,1,11
ORD,CHI,US,IL,1,11
DEN,,US,CO,1,11
DFW,,US,TX,1,11
DUB,,IE,,2,21
FRA,,DE,,2,21
KRK,,PL,,2,21
LON,,GB,,2,21
LHR,LON,GB,,2,21
MAN,,GB,,2,21
MIA,,US,FL,1,11
NYC,,US,NY,1,11
JFK,NYC,US,NY,1,11
LGA,NYC,US,NY,1,11
OSL,,NO,,2,21
PAR,,FR,,2,21
ORY,PAR,FR,,2,21
PIT,,US,PA,1,11
RIO,,BR,,1,13
GIG,RIO,BR,,1,13
ROM,,IT,,2,21
SAO,,BR,,1,13
GRU,SAO,BR,,1,13
SCL,,CL,,1,13
SEA,,US,WA,1,11
SFO,,US,CA,1,11
SJU,,PR,,1,12
VIE,,AT,,2,21
YTO,,CA,ON,1,11
TYO,,JP,,3,31
";

pub(super) fn travel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).expect("valid date")
}

pub(super) fn locations() -> Arc<LocationTable> {
    Arc::new(LocationTable::from_reader(LOCATIONS.as_bytes()).expect("locations fixture parses"))
}

pub(super) fn mileages() -> MileageTable {
    let mut table = MileageTable::default();
    let wh = GlobalDirection::WesternHemisphere;
    let at = GlobalDirection::Atlantic;
    for (origin, destination, mileage, direction) in [
        ("PIT", "NYC", 331, wh),
        ("NYC", "BNA", 758, wh),
        ("BNA", "MIA", 708, wh),
        ("MIA", "SAO", 4170, wh),
        ("MIA", "RIO", 4179, wh),
        ("SEA", "MIA", 2722, at),
        ("MIA", "PAR", 4579, at),
        ("PAR", "VIE", 647, at),
        ("BUE", "DFW", 5293, at),
        ("DFW", "MIA", 1115, at),
        ("MIA", "LON", 4430, at),
        ("BUE", "LON", 6951, at),
    ] {
        table.insert(origin, destination, MileageKind::Tpm, mileage, direction);
    }
    for (origin, destination, mileage, direction) in [
        ("PIT", "SAO", 5911, wh),
        ("PIT", "RIO", 5995, wh),
        ("SEA", "VIE", 6477, at),
        ("BUE", "LON", 8342, at),
    ] {
        table.insert(origin, destination, MileageKind::Mpm, mileage, direction);
    }
    table
}

pub(super) fn services_with(mileages: MileageTable, records: Vec<TpdPsr>) -> MileageServices {
    let mileages = Arc::new(mileages);
    MileageServices {
        locations: locations(),
        tpm: Arc::new(TableTpmCollector::new(Arc::clone(&mileages))),
        mpm: Arc::new(TableMpmCollector::new(mileages)),
        records: Arc::new(TpdPsrStore::from_records(records)),
    }
}

pub(super) fn services(records: Vec<TpdPsr>) -> MileageServices {
    services_with(mileages(), records)
}

pub(super) fn store(records: Vec<TpdPsr>) -> Arc<TpdPsrStore> {
    Arc::new(TpdPsrStore::from_records(records))
}

pub(super) fn travel_route(
    carrier: &str,
    direction: GlobalDirection,
    segments: &[(&str, &str, &str)],
) -> TravelRoute {
    TravelRoute {
        governing_carrier: carrier.to_string(),
        global_direction: direction,
        travel_date: travel_date(),
        ticketing_date: None,
        outbound: true,
        south_atlantic_exception: false,
        segments: segments
            .iter()
            .map(|(origin, destination, carrier)| TravelSegment::flown(origin, destination, carrier))
            .collect(),
    }
}

pub(super) fn build(travel_route: &TravelRoute) -> MileageRoute {
    RouteBuilder::new(locations())
        .build(travel_route)
        .expect("fixture route builds")
}

/// Route built from `(origin, destination, carrier)` legs without stopovers.
pub(super) fn route(
    carrier: &str,
    direction: GlobalDirection,
    segments: &[(&str, &str, &str)],
) -> MileageRoute {
    build(&travel_route(carrier, direction, segments))
}

pub(super) fn rom_lon_mia_bue_scl() -> MileageRoute {
    route(
        "AA",
        GlobalDirection::Atlantic,
        &[
            ("ROM", "LHR", "AA"),
            ("LHR", "MIA", "AA"),
            ("MIA", "BUE", "AA"),
            ("BUE", "SCL", "AA"),
        ],
    )
}

pub(super) fn sea_mia_par_vie() -> MileageRoute {
    route(
        "AA",
        GlobalDirection::Atlantic,
        &[("SEA", "MIA", "AA"), ("MIA", "PAR", "AA"), ("PAR", "VIE", "AA")],
    )
}

pub(super) fn pit_nyc_bna_mia(last: &str) -> MileageRoute {
    route(
        "AA",
        GlobalDirection::WesternHemisphere,
        &[
            ("PIT", "NYC", "AA"),
            ("NYC", "BNA", "AA"),
            ("BNA", "MIA", "AA"),
            ("MIA", last, "AA"),
        ],
    )
}

pub(super) fn psr(loc1: LocKey, loc2: LocKey, carrier: &str) -> TpdPsr {
    let mut record = TpdPsr::new(ApplInd::Psr, carrier);
    record.loc1 = Some(loc1);
    record.loc2 = Some(loc2);
    record
}

pub(super) fn tpd(loc1: LocKey, loc2: LocKey, carrier: &str, deduction: u16) -> TpdPsr {
    let mut record = TpdPsr::new(ApplInd::Tpd, carrier);
    record.loc1 = Some(loc1);
    record.loc2 = Some(loc2);
    record.tpm_deduction = deduction;
    record
}

/// Geo-loc set from city codes: the first entry's indicator is ignored.
pub(super) fn geo_set(set_no: u32, entries: &[(&str, RelationalInd)]) -> Vec<ViaGeoLoc> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, (code, ind))| {
            ViaGeoLoc::new(set_no, idx as u32 + 1, LocKey::city(code), *ind)
        })
        .collect()
}

pub(super) fn nation_set(set_no: u32, entries: &[(&str, RelationalInd)]) -> Vec<ViaGeoLoc> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, (code, ind))| {
            ViaGeoLoc::new(set_no, idx as u32 + 1, LocKey::nation(code), *ind)
        })
        .collect()
}

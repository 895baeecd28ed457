use std::path::PathBuf;

use chrono::NaiveDate;
use fare_mileage::data::{
    DataLoadError, LocationTable, MileageKind, MileageTable, ReferenceData, TpdPsrStore,
};
use fare_mileage::routing::{ApplInd, GlobalDirection, LocationLookup, TpdPsrRepository};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn travel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).expect("valid travel date")
}

#[test]
fn loads_the_shipped_reference_data() {
    let reference = ReferenceData::from_dir(data_dir()).expect("reference data loads");

    assert!(!reference.locations.is_empty());
    assert!(!reference.mileages.is_empty());
    assert_eq!(reference.records.len(), 2);

    let gru = reference
        .locations
        .location("GRU", travel_date())
        .expect("GRU known");
    assert_eq!(gru.city_code(), "SAO");
    assert_eq!(
        reference.locations.multi_transport_city("LGA").as_deref(),
        Some("NYC")
    );

    let entry = reference
        .mileages
        .lookup("VIE", "SEA", MileageKind::Mpm)
        .expect("MPM published in either direction");
    assert_eq!(entry.mileage, 6477);
    assert_eq!(entry.global_direction, GlobalDirection::Atlantic);
}

#[test]
fn records_are_filtered_by_application_and_areas() {
    let reference = ReferenceData::from_dir(data_dir()).expect("reference data loads");

    let tpds = reference
        .records
        .tpd_psr(ApplInd::Tpd, "AA", "2", "1", travel_date());
    assert_eq!(tpds.len(), 1);
    assert_eq!(tpds[0].tpm_deduction, 948);

    let psrs = reference
        .records
        .tpd_psr(ApplInd::Psr, "AA", "1", "2", travel_date());
    assert_eq!(psrs.len(), 1);
    assert!(psrs[0].psr_hip);

    let before_effective = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date");
    assert!(reference
        .records
        .tpd_psr(ApplInd::Psr, "AA", "1", "2", before_effective)
        .is_empty());
    assert!(reference
        .records
        .tpd_psr(ApplInd::Psr, "BA", "1", "2", travel_date())
        .is_empty());
}

#[test]
fn missing_directory_reports_the_path() {
    let err = ReferenceData::from_dir(data_dir().join("absent")).expect_err("no such directory");
    match err {
        DataLoadError::Io { path, .. } => assert!(path.ends_with("locations.csv")),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn malformed_rows_are_rejected() {
    let locations = "code,city,nation,state,area,sub_area\nNYC,,US,NY,1,11\n,,US,,1,11\n";
    match LocationTable::from_reader(locations.as_bytes()) {
        Err(DataLoadError::InvalidRow { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected invalid row, got {other:?}"),
    }

    let mileages = "origin,destination,kind,global_direction,mileage\nNYC,LON,T,QQ,3458\n";
    assert!(matches!(
        MileageTable::from_reader(mileages.as_bytes()),
        Err(DataLoadError::InvalidRow { line: 2, .. })
    ));

    assert!(matches!(
        TpdPsrStore::from_reader("[{\"seq_no\": 1}]".as_bytes()),
        Err(DataLoadError::Json(_))
    ));
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::global_direction::GlobalDirection;
use super::location::{key_admits, LocKey};
use super::mileage_route::MileageRoute;

/// Stopover count value meaning "no limit".
pub const UNLIMITED_STOPOVERS: i32 = -1;

/// Which engine a [`TpdPsr`] record feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplInd {
    #[serde(rename = "T")]
    Tpd,
    #[serde(rename = "P")]
    Psr,
}

/// How a via geo-loc entry combines with the entry before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationalInd {
    #[default]
    #[serde(rename = " ", alias = "")]
    Blank,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "/")]
    Or,
    #[serde(rename = "-")]
    AndOr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaGeoLoc {
    pub set_no: u32,
    #[serde(default)]
    pub order_no: u32,
    pub loc: LocKey,
    #[serde(default)]
    pub relational_ind: RelationalInd,
    #[serde(default)]
    pub stopover_not_allowed: bool,
    #[serde(default)]
    pub req_direct_svc_btw_via_and_loc1: bool,
    #[serde(default)]
    pub req_direct_svc_btw_via_and_loc2: bool,
    #[serde(default)]
    pub no_stop_btw_via_and_loc1: bool,
    #[serde(default)]
    pub no_stop_btw_via_and_loc2: bool,
}

impl ViaGeoLoc {
    pub fn new(set_no: u32, order_no: u32, loc: LocKey, relational_ind: RelationalInd) -> Self {
        Self {
            set_no,
            order_no,
            loc,
            relational_ind,
            stopover_not_allowed: false,
            req_direct_svc_btw_via_and_loc1: false,
            req_direct_svc_btw_via_and_loc2: false,
            no_stop_btw_via_and_loc1: false,
            no_stop_btw_via_and_loc2: false,
        }
    }
}

/// Carrier constraint between two optional locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaCarrierLoc {
    pub via_carrier: String,
    #[serde(default)]
    pub loc1: Option<LocKey>,
    #[serde(default)]
    pub loc2: Option<LocKey>,
}

/// Via geo-locs sharing one set number, ordered by `order_no`. The first
/// entry's relational indicator is normalised to blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocSet {
    pub set_no: u32,
    pub entries: Vec<ViaGeoLoc>,
}

/// Ticketed point deduction or permissible specified routing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpdPsr {
    #[serde(default)]
    pub seq_no: u32,
    pub appl_ind: ApplInd,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub area1: String,
    #[serde(default)]
    pub area2: String,
    #[serde(default)]
    pub global_dir: GlobalDirection,
    #[serde(default)]
    pub loc1: Option<LocKey>,
    #[serde(default)]
    pub loc2: Option<LocKey>,
    #[serde(default)]
    pub thru_mkt_cxrs: Vec<String>,
    #[serde(default)]
    pub thru_mkt_carrier_except: bool,
    #[serde(default)]
    pub thru_via_mkt_same_cxr: bool,
    #[serde(default)]
    pub this_carrier_restr: bool,
    #[serde(default)]
    pub tpd_thru_via_mkt_only: bool,
    #[serde(default = "unlimited_stopovers")]
    pub stopover_cnt: i32,
    #[serde(default)]
    pub fare_type_appl: String,
    #[serde(default)]
    pub psr_hip: bool,
    #[serde(default)]
    pub tpm_deduction: u16,
    #[serde(default)]
    pub via_cxr_locs: Vec<ViaCarrierLoc>,
    #[serde(default)]
    pub via_cxr_loc_excepts: Vec<ViaCarrierLoc>,
    #[serde(default)]
    pub via_geo_locs: Vec<ViaGeoLoc>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub discontinue_date: Option<NaiveDate>,
}

fn unlimited_stopovers() -> i32 {
    UNLIMITED_STOPOVERS
}

impl TpdPsr {
    pub fn new(appl_ind: ApplInd, carrier: &str) -> Self {
        Self {
            seq_no: 0,
            appl_ind,
            carrier: carrier.to_string(),
            area1: String::new(),
            area2: String::new(),
            global_dir: GlobalDirection::Any,
            loc1: None,
            loc2: None,
            thru_mkt_cxrs: Vec::new(),
            thru_mkt_carrier_except: false,
            thru_via_mkt_same_cxr: false,
            this_carrier_restr: false,
            tpd_thru_via_mkt_only: false,
            stopover_cnt: UNLIMITED_STOPOVERS,
            fare_type_appl: String::new(),
            psr_hip: false,
            tpm_deduction: 0,
            via_cxr_locs: Vec::new(),
            via_cxr_loc_excepts: Vec::new(),
            via_geo_locs: Vec::new(),
            effective_date: None,
            discontinue_date: None,
        }
    }

    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_date.map_or(true, |start| start <= date)
            && self.discontinue_date.map_or(true, |end| date <= end)
    }

    /// A route travelling in ZZ is not filtered; a ZZ record fits any route.
    pub fn applies_to_direction(&self, route_direction: GlobalDirection) -> bool {
        route_direction.is_wildcard()
            || self.global_dir.is_wildcard()
            || self.global_dir == route_direction
    }

    /// Matches the route endpoints against loc1/loc2. Returns `Some(true)`
    /// when the route origin lies in loc1, `Some(false)` when the route runs
    /// from loc2 to loc1, `None` otherwise.
    pub fn orientation(&self, route: &MileageRoute) -> Option<bool> {
        let first = route.items.first()?;
        let last = route.items.last()?;
        let starts_in = |key: Option<&LocKey>| {
            key_admits(key, &first.city1) || key_admits(key, first.orig_city_or_airport())
        };
        let ends_in = |key: Option<&LocKey>| {
            key_admits(key, &last.city2) || key_admits(key, last.dest_city_or_airport())
        };

        if starts_in(self.loc1.as_ref()) && ends_in(self.loc2.as_ref()) {
            Some(true)
        } else if starts_in(self.loc2.as_ref()) && ends_in(self.loc1.as_ref()) {
            Some(false)
        } else {
            None
        }
    }

    /// Groups the via geo-locs by set number (ascending), each set ordered by
    /// `order_no`. The returned sets are copies owned by the caller.
    pub fn geo_loc_sets(&self) -> Vec<GeoLocSet> {
        let mut grouped: BTreeMap<u32, Vec<ViaGeoLoc>> = BTreeMap::new();
        for geo_loc in &self.via_geo_locs {
            grouped
                .entry(geo_loc.set_no)
                .or_default()
                .push(geo_loc.clone());
        }

        grouped
            .into_iter()
            .map(|(set_no, mut entries)| {
                entries.sort_by_key(|entry| entry.order_no);
                if let Some(first) = entries.first_mut() {
                    first.relational_ind = RelationalInd::Blank;
                }
                GeoLocSet { set_no, entries }
            })
            .collect()
    }

    pub fn geo_locs_in_set(&self, set_no: u32) -> Vec<LocKey> {
        self.via_geo_locs
            .iter()
            .filter(|geo_loc| geo_loc.set_no == set_no)
            .map(|geo_loc| geo_loc.loc.clone())
            .collect()
    }
}

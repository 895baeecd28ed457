use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::global_direction::GlobalDirection;
use super::location::{Loc, LocKey};

/// One fare-construction leg of a [`super::MileageRoute`].
///
/// Multi-transport overrides replace `city1`/`city2` for matching and mileage
/// lookups; read the endpoints through [`RouteItem::orig_city_or_airport`] and
/// [`RouteItem::dest_city_or_airport`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteItem {
    pub city1: Arc<Loc>,
    pub city2: Arc<Loc>,
    #[serde(default)]
    pub multi_transport_origin: Option<Arc<Loc>>,
    #[serde(default)]
    pub multi_transport_destination: Option<Arc<Loc>>,
    pub travel_date: NaiveDate,
    #[serde(default)]
    pub segment_carrier: String,
    #[serde(default)]
    pub is_surface: bool,
    #[serde(default)]
    pub is_constructed: bool,
    #[serde(default)]
    pub is_stopover: bool,
    #[serde(default)]
    pub forced_connection: bool,
    #[serde(default)]
    pub forced_stopover: bool,
    #[serde(default)]
    pub is_direct_from_route_begin: bool,
    #[serde(default)]
    pub is_direct_to_route_end: bool,
    #[serde(default)]
    pub is_first_occurrence_from_route_begin: bool,
    #[serde(default)]
    pub is_last_occurrence_to_route_end: bool,
    #[serde(default)]
    pub failed_dir_service: bool,
    #[serde(default)]
    pub psr_stop_not_allowed: bool,
    #[serde(default)]
    pub tpm: u16,
    #[serde(default)]
    pub tpd: u16,
    #[serde(default)]
    pub mpm: u16,
    #[serde(default)]
    pub tpm_global_direction: GlobalDirection,
    #[serde(default)]
    pub mpm_global_direction: GlobalDirection,
    #[serde(default)]
    pub condit_tpd_via_geo_locs: Vec<LocKey>,
    #[serde(default)]
    pub pnr_segment: u16,
    #[serde(default)]
    pub tpm_surface_sector_exempt: bool,
    #[serde(default)]
    pub south_atlantic_exclusion: bool,
}

impl RouteItem {
    pub fn new(city1: Arc<Loc>, city2: Arc<Loc>, travel_date: NaiveDate) -> Self {
        Self {
            city1,
            city2,
            travel_date,
            ..Self::default()
        }
    }

    pub fn orig_city_or_airport(&self) -> &Loc {
        self.multi_transport_origin.as_deref().unwrap_or(&self.city1)
    }

    pub fn dest_city_or_airport(&self) -> &Loc {
        self.multi_transport_destination
            .as_deref()
            .unwrap_or(&self.city2)
    }

    pub fn origin_in(&self, key: &LocKey) -> bool {
        key.contains(&self.city1) || key.contains(self.orig_city_or_airport())
    }

    pub fn destination_in(&self, key: &LocKey) -> bool {
        key.contains(&self.city2) || key.contains(self.dest_city_or_airport())
    }

    /// Stopover at the destination after applying the forced overrides.
    pub fn is_effective_stopover(&self) -> bool {
        self.forced_stopover || (self.is_stopover && !self.forced_connection)
    }

    pub fn add_conditional_tpd_via_geo_loc(&mut self, key: &LocKey) {
        if !self.condit_tpd_via_geo_locs.contains(key) {
            self.condit_tpd_via_geo_locs.push(key.clone());
        }
    }

    /// Same leg flown in the opposite direction. The carrier stays with the
    /// leg; stopover and positional flags are fixed up by the owning route.
    pub fn reversed(&self) -> Self {
        Self {
            city1: Arc::clone(&self.city2),
            city2: Arc::clone(&self.city1),
            multi_transport_origin: self.multi_transport_destination.clone(),
            multi_transport_destination: self.multi_transport_origin.clone(),
            ..self.clone()
        }
    }

    pub(crate) fn label(&self) -> String {
        format!(
            "{}-{}",
            self.orig_city_or_airport().code,
            self.dest_city_or_airport().code
        )
    }
}

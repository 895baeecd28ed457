use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::global_direction::GlobalDirection;
use super::location::Loc;
use super::mileage_route::MileageRoute;
use super::route_item::RouteItem;
use super::services::LocationLookup;

/// One travel segment of an itinerary, keyed by airport or city codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub surface: bool,
    #[serde(default)]
    pub stopover: bool,
    #[serde(default)]
    pub forced_connection: bool,
    #[serde(default)]
    pub forced_stopover: bool,
    #[serde(default)]
    pub surface_sector_exempt: bool,
    #[serde(default)]
    pub south_atlantic_exclusion: bool,
    #[serde(default)]
    pub travel_date: Option<NaiveDate>,
}

impl TravelSegment {
    pub fn flown(origin: &str, destination: &str, carrier: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            carrier: carrier.to_string(),
            surface: false,
            stopover: false,
            forced_connection: false,
            forced_stopover: false,
            surface_sector_exempt: false,
            south_atlantic_exclusion: false,
            travel_date: None,
        }
    }

    pub fn surface(origin: &str, destination: &str) -> Self {
        Self {
            surface: true,
            ..Self::flown(origin, destination, "")
        }
    }
}

/// Fare component itinerary submitted for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRoute {
    pub governing_carrier: String,
    #[serde(default)]
    pub global_direction: GlobalDirection,
    pub travel_date: NaiveDate,
    #[serde(default)]
    pub ticketing_date: Option<NaiveDate>,
    #[serde(default)]
    pub outbound: bool,
    #[serde(default)]
    pub south_atlantic_exception: bool,
    pub segments: Vec<TravelSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteBuildError {
    #[error("travel route has no segments")]
    EmptyRoute,
    #[error("unknown location '{code}' in segment {segment}")]
    UnknownLocation { code: String, segment: usize },
}

/// Resolves a [`TravelRoute`] into a [`MileageRoute`].
#[derive(Clone)]
pub struct RouteBuilder {
    locations: Arc<dyn LocationLookup>,
}

impl RouteBuilder {
    pub fn new(locations: Arc<dyn LocationLookup>) -> Self {
        Self { locations }
    }

    pub fn build(&self, travel_route: &TravelRoute) -> Result<MileageRoute, RouteBuildError> {
        if travel_route.segments.is_empty() {
            return Err(RouteBuildError::EmptyRoute);
        }

        let mut items = Vec::with_capacity(travel_route.segments.len());
        for (idx, segment) in travel_route.segments.iter().enumerate() {
            let ordinal = idx + 1;
            let date = segment.travel_date.unwrap_or(travel_route.travel_date);
            let city1 = self.resolve(&segment.origin, date, ordinal)?;
            let city2 = self.resolve(&segment.destination, date, ordinal)?;

            let mut item = RouteItem::new(city1, city2, date);
            item.multi_transport_origin = self.multi_transport(&segment.origin, date);
            item.multi_transport_destination = self.multi_transport(&segment.destination, date);
            item.segment_carrier = if segment.surface {
                String::new()
            } else {
                segment.carrier.clone()
            };
            item.is_surface = segment.surface;
            item.is_stopover = segment.stopover;
            item.forced_connection = segment.forced_connection;
            item.forced_stopover = segment.forced_stopover;
            item.tpm_surface_sector_exempt = segment.surface_sector_exempt;
            item.south_atlantic_exclusion = segment.south_atlantic_exclusion;
            item.tpm_global_direction = travel_route.global_direction;
            item.mpm_global_direction = travel_route.global_direction;
            item.pnr_segment = u16::try_from(ordinal).unwrap_or(u16::MAX);
            items.push(item);
        }

        let south_atlantic_exclusion = items.iter().any(|item| item.south_atlantic_exclusion);
        let mut route = MileageRoute {
            items,
            global_direction: travel_route.global_direction,
            governing_carrier: travel_route.governing_carrier.clone(),
            is_outbound: travel_route.outbound,
            south_atlantic_exclusion,
            south_atlantic_exception_applies: travel_route.south_atlantic_exception,
            travel_date: travel_route.travel_date,
            ticketing_date: travel_route.ticketing_date,
            ..MileageRoute::default()
        };
        route.refresh_positional_flags();

        debug!(
            items = route.items.len(),
            carrier = %route.governing_carrier,
            direction = %route.global_direction,
            "mileage route built"
        );
        Ok(route)
    }

    fn resolve(&self, code: &str, date: NaiveDate, segment: usize) -> Result<Arc<Loc>, RouteBuildError> {
        self.locations
            .location(code, date)
            .ok_or_else(|| RouteBuildError::UnknownLocation {
                code: code.to_string(),
                segment,
            })
    }

    fn multi_transport(&self, code: &str, date: NaiveDate) -> Option<Arc<Loc>> {
        let city = self.locations.multi_transport_city(code)?;
        if city == code {
            return None;
        }
        self.locations.location(&city, date)
    }
}

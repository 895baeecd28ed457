use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::global_direction::GlobalDirection;
use super::location::Loc;
use super::route_item::RouteItem;
use super::services::TpmRetriever;
use super::tpd_psr::TpdPsr;

/// Governing carrier code standing for "any carrier".
pub const INDUSTRY_CARRIER: &str = "YY";

/// Fare component under validation together with its mileage aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MileageRoute {
    pub items: Vec<RouteItem>,
    #[serde(default)]
    pub mileage_route_tpm: u16,
    #[serde(default)]
    pub mileage_route_mpm: u16,
    #[serde(default)]
    pub tpd: u16,
    #[serde(default)]
    pub ems: u16,
    #[serde(default)]
    pub global_direction: GlobalDirection,
    #[serde(default)]
    pub governing_carrier: String,
    #[serde(default)]
    pub stopover_count: u16,
    #[serde(default)]
    pub hip_exempt: bool,
    #[serde(default)]
    pub psr_applies: bool,
    #[serde(default)]
    pub psr_may_apply: bool,
    #[serde(default)]
    pub applicable_psr: Option<Arc<TpdPsr>>,
    #[serde(default)]
    pub psr_set_number: u32,
    #[serde(default)]
    pub mileage_equalization_applies: bool,
    #[serde(default)]
    pub is_outbound: bool,
    #[serde(default)]
    pub south_atlantic_exclusion: bool,
    #[serde(default)]
    pub south_atlantic_exception_applies: bool,
    pub travel_date: NaiveDate,
    #[serde(default)]
    pub ticketing_date: Option<NaiveDate>,
}

impl MileageRoute {
    pub fn origin(&self) -> Option<&Loc> {
        self.items.first().map(RouteItem::orig_city_or_airport)
    }

    pub fn destination(&self) -> Option<&Loc> {
        self.items.last().map(RouteItem::dest_city_or_airport)
    }

    pub fn is_industry_carrier(&self) -> bool {
        self.governing_carrier == INDUSTRY_CARRIER
    }

    /// Carrier used to look up TPD/PSR records: blank for the industry carrier.
    pub fn record_lookup_carrier(&self) -> &str {
        if self.is_industry_carrier() {
            ""
        } else {
            &self.governing_carrier
        }
    }

    /// Sums the leg TPMs. Surface-sector exempt legs are skipped and each
    /// South Atlantic span (between two excluded legs) counts as one
    /// published mileage from the span origin to its closing destination.
    pub fn applicable_tpm(&self, tpm: &dyn TpmRetriever) -> u32 {
        let mut total = 0u32;
        let mut span: Option<(usize, u32)> = None;

        for (idx, item) in self.items.iter().enumerate() {
            if item.tpm_surface_sector_exempt {
                continue;
            }
            let leg = u32::from(item.tpm);
            match (span.take(), item.south_atlantic_exclusion) {
                (None, true) => span = Some((idx, leg)),
                (None, false) => total += leg,
                (Some((start, sum)), false) => span = Some((start, sum + leg)),
                (Some((start, sum)), true) => {
                    let origin = self.items[start].orig_city_or_airport();
                    total += tpm
                        .mileage_between(origin, item.dest_city_or_airport(), item.travel_date)
                        .map(u32::from)
                        .unwrap_or(sum + leg);
                }
            }
        }

        if let Some((_, sum)) = span {
            total += sum;
        }
        total
    }

    /// Sum of the leg TPMs, surface-sector exempt legs excluded.
    pub fn plain_tpm(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| !item.tpm_surface_sector_exempt)
            .map(|item| u32::from(item.tpm))
            .sum()
    }

    /// `ORIG-DEST` labels of the surface-sector exempt legs.
    pub fn surface_exempt_legs(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.tpm_surface_sector_exempt)
            .map(RouteItem::label)
            .collect()
    }

    /// Items whose destination is a via point of the fare component.
    pub fn intermediate_items(&self) -> &[RouteItem] {
        match self.items.len() {
            0 => &[],
            len => &self.items[..len - 1],
        }
    }

    /// Recomputes the direct-service and occurrence flags of every item.
    pub fn refresh_positional_flags(&mut self) {
        let len = self.items.len();
        let destinations: Vec<String> = self
            .items
            .iter()
            .map(|item| item.dest_city_or_airport().city_code().to_string())
            .collect();

        for (idx, item) in self.items.iter_mut().enumerate() {
            let city = &destinations[idx];
            item.is_direct_from_route_begin = idx == 0;
            item.is_direct_to_route_end = idx + 2 >= len;
            item.is_first_occurrence_from_route_begin =
                !destinations[..idx].iter().any(|other| other == city);
            item.is_last_occurrence_to_route_end =
                !destinations[idx + 1..].iter().any(|other| other == city);
        }
    }

    /// The same fare component travelled backwards.
    ///
    /// Stopovers mark the destination of a leg, so after reversing the item
    /// order each flag moves one position: the reversed leg `j` ends where the
    /// original leg `n - 2 - j` ended. The last leg keeps its own flags.
    pub fn reversed(&self) -> Self {
        let len = self.items.len();
        let mut items: Vec<RouteItem> = self.items.iter().rev().map(RouteItem::reversed).collect();

        for (idx, item) in items.iter_mut().enumerate() {
            let source = if idx + 1 < len { len - 2 - idx } else { len - 1 };
            let original = &self.items[source];
            item.is_stopover = original.is_stopover;
            item.forced_connection = original.forced_connection;
            item.forced_stopover = original.forced_stopover;
        }

        let mut reversed = Self {
            items,
            ..self.clone()
        };
        reversed.refresh_positional_flags();
        reversed
    }
}

pub(crate) fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(codes: &[&str], stopovers: &[bool]) -> MileageRoute {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let items = codes
            .windows(2)
            .zip(stopovers)
            .map(|(pair, stop)| {
                let mut item = RouteItem::new(
                    Arc::new(Loc::city_row(pair[0], "US", "1")),
                    Arc::new(Loc::city_row(pair[1], "US", "1")),
                    date,
                );
                item.is_stopover = *stop;
                item.segment_carrier = format!("{}{}", &pair[0][..1], &pair[1][..1]);
                item
            })
            .collect();
        let mut route = MileageRoute {
            items,
            travel_date: date,
            ..MileageRoute::default()
        };
        route.refresh_positional_flags();
        route
    }

    #[test]
    fn reversal_shifts_stopovers_to_the_same_city() {
        let original = route(&["BOS", "NYC", "WAS", "MIA"], &[true, false, false]);
        let reversed = original.reversed();

        let path: Vec<&str> = reversed
            .items
            .iter()
            .map(|item| item.dest_city_or_airport().code.as_str())
            .collect();
        assert_eq!(path, vec!["WAS", "NYC", "BOS"]);
        // NYC was a stopover; in the reversed route NYC is the destination of leg 1
        assert!(!reversed.items[0].is_stopover);
        assert!(reversed.items[1].is_stopover);
        assert_eq!(reversed.items[0].segment_carrier, "WM");
    }

    #[test]
    fn double_reversal_restores_the_route() {
        let original = route(&["BOS", "NYC", "WAS", "MIA", "ASU"], &[true, false, true, false]);
        assert_eq!(original.reversed().reversed(), original);
    }

    #[test]
    fn positional_flags_track_occurrences() {
        let route = route(&["BOS", "NYC", "WAS", "NYC", "MIA"], &[false; 4]);
        assert!(route.items[0].is_direct_from_route_begin);
        assert!(!route.items[1].is_direct_from_route_begin);
        assert!(route.items[2].is_direct_to_route_end);
        assert!(route.items[0].is_first_occurrence_from_route_begin);
        assert!(!route.items[0].is_last_occurrence_to_route_end);
        assert!(!route.items[2].is_first_occurrence_from_route_begin);
    }

    #[test]
    fn empty_route_has_no_endpoints() {
        let route = MileageRoute::default();
        assert!(route.origin().is_none());
        assert!(route.intermediate_items().is_empty());
        assert_eq!(route.reversed(), route);
    }
}

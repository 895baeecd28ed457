use crate::routing::is_in_loc::{is_in_loc, MatchOutcome};
use crate::routing::route_item::RouteItem;
use crate::routing::tpd_psr::{GeoLocSet, RelationalInd, ViaGeoLoc};

/// One slot of a via geo-loc set: entries chained with OR are alternatives
/// for the same via point.
#[derive(Debug)]
struct Position<'a> {
    alternatives: Vec<&'a ViaGeoLoc>,
    required: bool,
}

/// Walks the via points of a route against a geo-loc set in order.
///
/// A position joined to its neighbour with AND must be visited; positions
/// linked with AND-OR (or standing alone) may be skipped. Each via point has
/// to land on the next unvisited position it matches without skipping a
/// required one.
#[derive(Debug)]
pub(crate) struct GeoLocCursor<'a> {
    positions: Vec<Position<'a>>,
    next: usize,
}

impl<'a> GeoLocCursor<'a> {
    pub(crate) fn new(set: &'a GeoLocSet) -> Self {
        let mut positions: Vec<Position<'a>> = Vec::new();
        let mut leading_ind = Vec::new();

        for (idx, geo_loc) in set.entries.iter().enumerate() {
            match positions.last_mut() {
                Some(position) if idx > 0 && geo_loc.relational_ind == RelationalInd::Or => {
                    position.alternatives.push(geo_loc);
                }
                _ => {
                    positions.push(Position {
                        alternatives: vec![geo_loc],
                        required: false,
                    });
                    leading_ind.push(geo_loc.relational_ind);
                }
            }
        }

        for idx in 0..positions.len() {
            let own_and = positions[idx]
                .alternatives
                .iter()
                .any(|geo_loc| geo_loc.relational_ind == RelationalInd::And);
            let next_and = leading_ind.get(idx + 1) == Some(&RelationalInd::And);
            positions[idx].required = own_and || next_and;
        }

        Self { positions, next: 0 }
    }

    /// Moves the cursor past the position matched by `item`. A position that
    /// matched the location but failed a stopover restriction still counts,
    /// with `item.psr_stop_not_allowed` raised.
    pub(crate) fn advance(&mut self, item: &mut RouteItem, orig_is_loc1: bool) -> bool {
        for idx in self.next..self.positions.len() {
            let mut stop_failure = false;
            let mut matched = false;
            for geo_loc in &self.positions[idx].alternatives {
                match is_in_loc(geo_loc, item, orig_is_loc1) {
                    MatchOutcome::Matched => {
                        matched = true;
                        break;
                    }
                    MatchOutcome::FailedStopoverOnly => stop_failure = true,
                    MatchOutcome::FailedLocation => {}
                }
            }

            if matched || stop_failure {
                if !matched {
                    item.psr_stop_not_allowed = true;
                }
                self.next = idx + 1;
                return true;
            }
            if self.positions[idx].required {
                return false;
            }
        }
        false
    }

    /// True once no required position is left unvisited.
    pub(crate) fn is_complete(&self) -> bool {
        self.positions[self.next..]
            .iter()
            .all(|position| !position.required)
    }
}

//! Carrier restrictions shared by the TPD and PSR engines.

use std::ops::Range;

use super::location::key_admits;
use super::mileage_route::MileageRoute;
use super::route_item::RouteItem;
use super::tpd_psr::{TpdPsr, ViaCarrierLoc};

/// A carrier-less record with a through-market carrier list only applies when
/// the governing carrier's membership in the list matches the except flag.
pub(crate) fn thru_market_carriers_ok(route: &MileageRoute, record: &TpdPsr) -> bool {
    if !record.carrier.is_empty() || record.thru_mkt_cxrs.is_empty() {
        return true;
    }
    listed_with_polarity(record, &route.governing_carrier)
}

/// Via-market same carrier: every flown leg must use the governing carrier.
/// Under the industry carrier, legs without a carrier are tolerated.
pub(crate) fn via_market_same_carrier_ok(route: &MileageRoute, record: &TpdPsr) -> bool {
    let restricted = record.thru_via_mkt_same_cxr
        || (!record.carrier.is_empty() && record.this_carrier_restr);
    if !restricted {
        return true;
    }

    let industry = route.is_industry_carrier();
    let check_list = record.carrier.is_empty() && !record.thru_mkt_cxrs.is_empty();

    flown_items(&route.items).all(|item| {
        if industry && item.segment_carrier.is_empty() {
            return true;
        }
        if check_list && !listed_with_polarity(record, &item.segment_carrier) {
            return false;
        }
        item.segment_carrier == route.governing_carrier
    })
}

/// Every flown leg between the constraint's locations uses the via carrier.
pub(crate) fn via_carrier_locs_ok(route: &MileageRoute, record: &TpdPsr) -> bool {
    record.via_cxr_locs.iter().all(|constraint| {
        carrier_span(&route.items, constraint).map_or(true, |span| {
            flown_items(&route.items[span]).all(|item| item.segment_carrier == constraint.via_carrier)
        })
    })
}

/// No flown leg between the constraint's locations uses the excepted carrier.
pub(crate) fn via_carrier_exceptions_ok(route: &MileageRoute, record: &TpdPsr) -> bool {
    record.via_cxr_loc_excepts.iter().all(|constraint| {
        carrier_span(&route.items, constraint).map_or(true, |span| {
            flown_items(&route.items[span]).all(|item| item.segment_carrier != constraint.via_carrier)
        })
    })
}

fn listed_with_polarity(record: &TpdPsr, carrier: &str) -> bool {
    let listed = record.thru_mkt_cxrs.iter().any(|listed| listed == carrier);
    listed != record.thru_mkt_carrier_except
}

fn flown_items(items: &[RouteItem]) -> impl Iterator<Item = &RouteItem> {
    items.iter().filter(|item| !item.is_surface)
}

/// Item range travelled between `loc1` and `loc2`, searched forward first and
/// then with the locations swapped. `None` means the constraint does not
/// touch the route.
pub(crate) fn carrier_span(items: &[RouteItem], constraint: &ViaCarrierLoc) -> Option<Range<usize>> {
    if constraint.loc1.is_none() && constraint.loc2.is_none() {
        return Some(0..items.len());
    }

    span_between(items, constraint, false).or_else(|| span_between(items, constraint, true))
}

fn span_between(items: &[RouteItem], constraint: &ViaCarrierLoc, swapped: bool) -> Option<Range<usize>> {
    let (from, to) = if swapped {
        (constraint.loc2.as_ref(), constraint.loc1.as_ref())
    } else {
        (constraint.loc1.as_ref(), constraint.loc2.as_ref())
    };

    let start = items
        .iter()
        .position(|item| key_admits(from, &item.city1) || key_admits(from, item.orig_city_or_airport()))?;
    let end = items[start..]
        .iter()
        .position(|item| key_admits(to, &item.city2) || key_admits(to, item.dest_city_or_airport()))?;
    Some(start..start + end + 1)
}

use std::sync::Arc;

use chrono::NaiveDate;

use super::location::Loc;
use super::mileage_route::MileageRoute;
use super::route_item::RouteItem;
use super::tpd_psr::{ApplInd, TpdPsr};

/// Location reference data.
pub trait LocationLookup: Send + Sync {
    fn location(&self, code: &str, date: NaiveDate) -> Option<Arc<Loc>>;
    /// Multi-transport city owning an airport code, if any.
    fn multi_transport_city(&self, code: &str) -> Option<String>;
}

/// Ticketed point mileage source.
pub trait TpmRetriever: Send + Sync {
    /// Fills `item.tpm` (and its global direction); `false` when unpublished.
    fn retrieve(&self, item: &mut RouteItem) -> bool;
    fn mileage_between(&self, origin: &Loc, destination: &Loc, date: NaiveDate) -> Option<u16>;
}

/// Maximum permitted mileage source.
pub trait MpmCollector: Send + Sync {
    /// Fills the item MPMs and `route.mileage_route_mpm`; `false` when the
    /// route MPM is unavailable.
    fn collect(&self, route: &mut MileageRoute) -> bool;
}

/// TPD/PSR reference records. Area matching is order-insensitive.
pub trait TpdPsrRepository: Send + Sync {
    fn tpd_psr(
        &self,
        appl_ind: ApplInd,
        carrier: &str,
        area1: &str,
        area2: &str,
        date: NaiveDate,
    ) -> Vec<Arc<TpdPsr>>;
}

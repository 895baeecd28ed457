//! Route model and mileage engines.

mod builder;
mod carrier_rules;
mod diagnostics;
mod equalization;
mod global_direction;
mod is_in_loc;
mod location;
mod mileage_route;
mod psr;
mod route_item;
mod services;
mod surcharge;
mod tpd;
mod tpd_psr;
mod validator;

pub use builder::{RouteBuildError, RouteBuilder, TravelRoute, TravelSegment};
pub use diagnostics::{
    CollectedDiagnostics, DiagnosticEvent, DiagnosticSink, MileageStage, NoDiagnostics,
    TpdMatchInfo,
};
pub use equalization::MileageEqualization;
pub use global_direction::{GlobalDirection, UnknownGlobalDirection};
pub use is_in_loc::{is_in_loc, MatchOutcome};
pub use location::{Loc, LocKey, LocType};
pub use mileage_route::{MileageRoute, INDUSTRY_CARRIER};
pub use psr::PermissibleSpecifiedRouting;
pub use route_item::RouteItem;
pub use services::{LocationLookup, MpmCollector, TpdPsrRepository, TpmRetriever};
pub use surcharge::{get_ems, MAX_PERMITTED_SURCHARGE};
pub use tpd::TicketedPointDeduction;
pub use tpd_psr::{
    ApplInd, GeoLocSet, RelationalInd, TpdPsr, ViaCarrierLoc, ViaGeoLoc, UNLIMITED_STOPOVERS,
};
pub use validator::{MileageInfo, MileageServices, MileageValidator};

#[cfg(test)]
mod tests;

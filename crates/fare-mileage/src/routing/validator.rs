use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::builder::{RouteBuildError, RouteBuilder, TravelRoute};
use super::diagnostics::{
    DiagnosticEvent, DiagnosticSink, MileageStage, NoDiagnostics, TpdMatchInfo,
};
use super::equalization::MileageEqualization;
use super::location::LocKey;
use super::mileage_route::{saturate, MileageRoute, INDUSTRY_CARRIER};
use super::psr::PermissibleSpecifiedRouting;
use super::services::{LocationLookup, MpmCollector, TpdPsrRepository, TpmRetriever};
use super::surcharge::{get_ems, MAX_PERMITTED_SURCHARGE};
use super::tpd::TicketedPointDeduction;

/// Outcome of validating one fare component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MileageInfo {
    pub valid: bool,
    pub total_applicable_tpm: u16,
    pub total_applicable_mpm: u16,
    pub tpd: u16,
    pub surcharge_amt: u16,
    pub psr_applies: bool,
    pub psr_may_apply: bool,
    pub psr_governing_carrier: Option<String>,
    pub psr_geo_locs: Vec<LocKey>,
    pub psr_set_number: u32,
    pub hip_exempt: bool,
    pub tpd_matched_via_locs: Vec<LocKey>,
    pub tpd_conditional_via_locs: Vec<LocKey>,
    pub surface_sector_exempt_cities: Vec<String>,
    pub total_applicable_tpm_sa_exception: u16,
    pub surcharge_amt_sa_exception: u16,
    pub equalization_applies: bool,
    /// Surcharge before and after RIO/SAO substitution.
    pub equalization_surcharges: Option<(u16, u16)>,
}

/// Collaborators the validator is assembled from.
#[derive(Clone)]
pub struct MileageServices {
    pub locations: Arc<dyn LocationLookup>,
    pub tpm: Arc<dyn TpmRetriever>,
    pub mpm: Arc<dyn MpmCollector>,
    pub records: Arc<dyn TpdPsrRepository>,
}

/// Orchestrates PSR, TPM/MPM collection, TPD, the surcharge and equalization.
#[derive(Clone)]
pub struct MileageValidator {
    builder: RouteBuilder,
    psr: PermissibleSpecifiedRouting,
    tpd: TicketedPointDeduction,
    equalization: MileageEqualization,
    tpm: Arc<dyn TpmRetriever>,
    mpm: Arc<dyn MpmCollector>,
    max_permitted_surcharge: u16,
}

impl MileageValidator {
    pub fn new(services: MileageServices) -> Self {
        let tpd = TicketedPointDeduction::new(Arc::clone(&services.records));
        Self {
            builder: RouteBuilder::new(Arc::clone(&services.locations)),
            psr: PermissibleSpecifiedRouting::new(Arc::clone(&services.records)),
            equalization: MileageEqualization::new(
                services.locations,
                Arc::clone(&services.tpm),
                Arc::clone(&services.mpm),
                tpd.clone(),
            ),
            tpd,
            tpm: services.tpm,
            mpm: services.mpm,
            max_permitted_surcharge: MAX_PERMITTED_SURCHARGE,
        }
    }

    pub fn with_max_permitted_surcharge(mut self, max_permitted_surcharge: u16) -> Self {
        self.max_permitted_surcharge = max_permitted_surcharge;
        self
    }

    pub fn validate(&self, travel_route: &TravelRoute) -> Result<MileageInfo, RouteBuildError> {
        self.validate_with_diagnostics(travel_route, &mut NoDiagnostics)
    }

    pub fn validate_with_diagnostics(
        &self,
        travel_route: &TravelRoute,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<MileageInfo, RouteBuildError> {
        let mut route = self.builder.build(travel_route)?;
        Ok(self.validate_route(&mut route, sink))
    }

    pub fn validate_route(
        &self,
        route: &mut MileageRoute,
        sink: &mut dyn DiagnosticSink,
    ) -> MileageInfo {
        let mut info = MileageInfo::default();

        if self.psr.apply(route) {
            route.psr_applies = true;
            self.fill_psr_info(route, &mut info, sink);
            info!(set_no = info.psr_set_number, "route validated by permissible specified routing");
            return info;
        }
        info.psr_may_apply = route.psr_may_apply;
        if route.psr_may_apply {
            sink.record(DiagnosticEvent::PsrMayApply);
        }

        if !self.collect_tpm(route) {
            warn!("ticketed point mileage unavailable");
            sink.record(DiagnosticEvent::MileageUnavailable {
                stage: MileageStage::Tpm,
            });
            return info;
        }
        if !self.mpm.collect(route) {
            warn!("maximum permitted mileage unavailable");
            sink.record(DiagnosticEvent::MileageUnavailable {
                stage: MileageStage::Mpm,
            });
            return info;
        }

        self.calculate_mileage(&mut info, route, sink);
        if info.surcharge_amt > 0 {
            self.apply_mileage_equalization(route, &mut info, sink);
        }

        info.valid =
            info.total_applicable_mpm != 0 && info.surcharge_amt <= self.max_permitted_surcharge;
        info!(
            tpm = info.total_applicable_tpm,
            mpm = info.total_applicable_mpm,
            surcharge = info.surcharge_amt,
            valid = info.valid,
            "mileage validated"
        );
        info
    }

    fn collect_tpm(&self, route: &mut MileageRoute) -> bool {
        route.items.iter_mut().all(|item| self.tpm.retrieve(item))
    }

    /// Totals the route TPM, applies TPD when the TPM exceeds the MPM and
    /// computes the surcharge.
    pub fn calculate_mileage(
        &self,
        info: &mut MileageInfo,
        route: &mut MileageRoute,
        sink: &mut dyn DiagnosticSink,
    ) {
        info.surface_sector_exempt_cities = route.surface_exempt_legs();
        let total_tpm = route.applicable_tpm(self.tpm.as_ref());
        let mpm = route.mileage_route_mpm;

        let mut tpm = saturate(total_tpm);
        if tpm > mpm {
            let mut trace = TpdMatchInfo::default();
            if self.tpd.apply_with_diagnostics(route, Some(&mut trace)) {
                info.tpd = route.tpd;
                info.tpd_matched_via_locs = trace.matched_geo_locs.clone();
                tpm = tpm.saturating_sub(route.tpd);
                sink.record(trace.into_event());
            }
        }
        if let Some(last) = route.items.last() {
            if !last.condit_tpd_via_geo_locs.is_empty() {
                info.tpd_conditional_via_locs = last.condit_tpd_via_geo_locs.clone();
                sink.record(DiagnosticEvent::TpdConditionalViaLocs {
                    locs: info.tpd_conditional_via_locs.clone(),
                });
            }
        }

        route.mileage_route_tpm = tpm;
        route.ems = get_ems(tpm, mpm);
        info.total_applicable_tpm = tpm;
        info.total_applicable_mpm = mpm;
        info.surcharge_amt = route.ems;
        sink.record(DiagnosticEvent::SurchargeComputed {
            tpm,
            mpm,
            surcharge: route.ems,
        });

        if route.south_atlantic_exception_applies {
            info.total_applicable_tpm_sa_exception = saturate(route.plain_tpm());
            info.surcharge_amt_sa_exception = get_ems(info.total_applicable_tpm_sa_exception, mpm);
        }
        debug!(tpm, mpm, surcharge = route.ems, "mileage calculated");
    }

    /// Applies RIO/SAO equalization and refreshes `info` when it lowers the
    /// surcharge.
    pub fn apply_mileage_equalization(
        &self,
        route: &mut MileageRoute,
        info: &mut MileageInfo,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let before = route.ems;
        if !self.equalization.apply(route) {
            return false;
        }

        info.total_applicable_tpm = route.mileage_route_tpm;
        info.total_applicable_mpm = route.mileage_route_mpm;
        info.tpd = route.tpd;
        info.surcharge_amt = route.ems;
        info.equalization_applies = true;
        info.equalization_surcharges = Some((before, route.ems));
        sink.record(DiagnosticEvent::EqualizationApplied {
            surcharge_before: before,
            surcharge_after: route.ems,
        });
        true
    }

    fn fill_psr_info(
        &self,
        route: &MileageRoute,
        info: &mut MileageInfo,
        sink: &mut dyn DiagnosticSink,
    ) {
        info.valid = true;
        info.psr_applies = true;
        info.psr_may_apply = route.psr_may_apply;
        info.psr_set_number = route.psr_set_number;
        info.hip_exempt = route.hip_exempt;

        if let Some(psr) = &route.applicable_psr {
            let carrier = if psr.carrier.is_empty() {
                INDUSTRY_CARRIER.to_string()
            } else {
                psr.carrier.clone()
            };
            info.psr_governing_carrier = Some(carrier);
            info.psr_geo_locs = psr.geo_locs_in_set(route.psr_set_number);
            sink.record(DiagnosticEvent::PsrMatched {
                seq_no: psr.seq_no,
                set_no: route.psr_set_number,
            });
        }
    }
}

use serde::Serialize;

use super::location::LocKey;

/// Observable decision taken while validating a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    PsrMatched {
        seq_no: u32,
        set_no: u32,
    },
    PsrMayApply,
    MileageUnavailable {
        stage: MileageStage,
    },
    TpdApplied {
        seq_no: u32,
        deduction: u16,
        matched_geo_locs: Vec<LocKey>,
        matched_segments: Vec<String>,
    },
    TpdConditionalViaLocs {
        locs: Vec<LocKey>,
    },
    SurchargeComputed {
        tpm: u16,
        mpm: u16,
        surcharge: u16,
    },
    EqualizationApplied {
        surcharge_before: u16,
        surcharge_after: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MileageStage {
    Tpm,
    Mpm,
}

/// Write-only consumer of [`DiagnosticEvent`]s.
pub trait DiagnosticSink {
    fn record(&mut self, event: DiagnosticEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn record(&mut self, _event: DiagnosticEvent) {}
}

/// Keeps events in arrival order.
#[derive(Debug, Default, Clone)]
pub struct CollectedDiagnostics {
    events: Vec<DiagnosticEvent>,
}

impl CollectedDiagnostics {
    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<DiagnosticEvent> {
        self.events
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn record(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

/// Trace of the TPD record that won, filled by
/// [`super::TicketedPointDeduction::apply_with_diagnostics`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TpdMatchInfo {
    pub seq_no: u32,
    pub deduction: u16,
    pub matched_geo_locs: Vec<LocKey>,
    pub matched_segments: Vec<String>,
}

impl TpdMatchInfo {
    pub fn into_event(self) -> DiagnosticEvent {
        DiagnosticEvent::TpdApplied {
            seq_no: self.seq_no,
            deduction: self.deduction,
            matched_geo_locs: self.matched_geo_locs,
            matched_segments: self.matched_segments,
        }
    }
}

use crate::format::{GaugeKind, GaugeReading};
use cardash_shared::TelemetrySample;
use std::time::{Duration, Instant};

use super::view::TelemetryView;

/// Telemetry only ever flows server -> client, so this surface never leaves
/// the idle phase: each sample simply replaces the last one.
#[derive(Debug, Default)]
pub struct TelemetrySurface {
    sample: Option<TelemetrySample>,
    received_at: Option<Instant>,
    obd_status: Option<String>,
}

impl TelemetrySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sample(&mut self, sample: TelemetrySample, now: Instant) {
        for (kind, raw) in [(GaugeKind::Rpm, sample.rpm), (GaugeKind::Speed, sample.kmh_speed)] {
            if let Err(e) = GaugeReading::read(kind, raw) {
                log::debug!("[UI] {} gauge not drawn: {e}", kind.unit());
            }
        }
        self.sample = Some(sample);
        self.received_at = Some(now);
    }

    pub fn on_status(&mut self, message: String) {
        log::info!("[UI] OBD: {message}");
        self.obd_status = Some(message);
    }

    /// When the current sample turns stale, if it has not already.
    pub fn stale_deadline(&self, now: Instant, stale_after: Duration) -> Option<Instant> {
        let deadline = self.received_at? + stale_after;
        (deadline > now).then_some(deadline)
    }

    pub fn view(&self, now: Instant, stale_after: Duration) -> TelemetryView {
        let reading = |kind, raw| GaugeReading::read(kind, raw).ok();
        TelemetryView {
            rpm: self.sample.and_then(|s| reading(GaugeKind::Rpm, s.rpm)),
            speed: self.sample.and_then(|s| reading(GaugeKind::Speed, s.kmh_speed)),
            obd_status: self.obd_status.clone(),
            stale: self
                .received_at
                .is_some_and(|at| now.saturating_duration_since(at) >= stale_after),
        }
    }
}

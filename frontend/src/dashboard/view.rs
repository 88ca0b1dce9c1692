//! What a front end draws. Built fresh from the surfaces after every event.

use super::player::PhaseKind;
use crate::format::GaugeReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting,
    Connected,
    Reconnecting,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Connecting => "connecting",
            LinkStatus::Connected => "connected",
            LinkStatus::Reconnecting => "reconnecting",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub song_line: String,
    pub is_playing: bool,
    pub play_button: &'static str,
    pub position_label: String,
    pub length_label: String,
    /// Seek slider position, `0..=100`.
    pub seek_percent: f64,
    pub volume: Option<f32>,
    pub phase: PhaseKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryView {
    /// `None` when there is no sample yet or the value is off the dial.
    pub rpm: Option<GaugeReading>,
    pub speed: Option<GaugeReading>,
    pub obd_status: Option<String>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// `None` until the first player state arrives.
    pub player: Option<PlayerView>,
    pub telemetry: TelemetryView,
    pub link: LinkStatus,
    pub notice: Option<String>,
}

impl DashboardView {
    /// One line summary used by [`LogRenderer`].
    pub fn status_line(&self) -> String {
        let player = match &self.player {
            Some(p) => {
                let volume = p
                    .volume
                    .map(|v| format!(" vol {:.0}%", v * 100.0))
                    .unwrap_or_default();
                format!(
                    "{} {} {}/{}{volume}",
                    p.play_button, p.song_line, p.position_label, p.length_label
                )
            }
            None => "no player state".to_string(),
        };

        let gauge = |g: &Option<GaugeReading>| match g {
            Some(reading) => reading.label(),
            None => "--".to_string(),
        };
        let mut line = format!(
            "{player} | {} {}",
            gauge(&self.telemetry.rpm),
            gauge(&self.telemetry.speed)
        );
        if self.telemetry.stale {
            line.push_str(" (stale)");
        }
        if let Some(status) = &self.telemetry.obd_status {
            line.push_str(&format!(" [{status}]"));
        }
        line.push_str(&format!(" | link {}", self.link.as_str()));
        if let Some(notice) = &self.notice {
            line.push_str(&format!(" | {notice}"));
        }
        line
    }
}

/// Front-end seam. The runtime calls this whenever the view changes.
pub trait Renderer {
    fn render(&mut self, view: &DashboardView);
}

/// Writes each view as a single log line.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, view: &DashboardView) {
        log::info!("[UI] {}", view.status_line());
    }
}

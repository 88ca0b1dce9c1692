//! The reconciler. Every input (push frames, link changes, user commands,
//! slider gestures, command settlements, timer ticks) arrives as one
//! [`DashboardEvent`] and is applied in order on a single task, so no two
//! updates ever race on the rendered state.

mod player;
mod telemetry;
mod view;

pub use player::{
    FieldSet, PendingCommand, PhaseKind, PlayerField, PlayerPatch, PlayerPhase, PlayerSurface,
    TrackPatch,
};
pub use telemetry::TelemetrySurface;
pub use view::{DashboardView, LinkStatus, LogRenderer, PlayerView, Renderer, TelemetryView};

use crate::config::DashboardConfig;
use crate::error::DispatchError;
use crate::interaction::{ControlId, InteractionTracker};
use cardash_shared::{ControlCommand, PlayerState, PushMessage};
use std::fmt;
use std::time::{Duration, Instant};

/// Identifies one dispatched command so a late answer can be told apart
/// from the one currently awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandTicket(pub u64);

impl fmt::Display for CommandTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Push(PushMessage),
    Link(LinkStatus),
    Command(ControlCommand),
    GestureBegin(ControlId),
    GestureMove(ControlId, f32),
    GestureEnd(ControlId),
    Settled {
        ticket: CommandTicket,
        outcome: Result<PlayerState, DispatchError>,
    },
    Delivered {
        command: ControlCommand,
        outcome: Result<(), DispatchError>,
    },
    Tick,
    Quit,
}

/// Work the runtime has to start on the reconciler's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Send and feed the answer back as [`DashboardEvent::Settled`].
    Dispatch {
        ticket: CommandTicket,
        command: ControlCommand,
    },
    /// Send and report back as [`DashboardEvent::Delivered`]; no player
    /// state comes back.
    FireAndForget(ControlCommand),
}

#[derive(Debug)]
pub struct Dashboard {
    player: PlayerSurface,
    telemetry: TelemetrySurface,
    tracker: InteractionTracker,
    link: LinkStatus,
    notice: Option<String>,
    next_ticket: u64,
    ack_timeout: Duration,
    stale_after: Duration,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_timeouts(config.ack_timeout, config.stale_after)
    }

    pub fn with_timeouts(ack_timeout: Duration, stale_after: Duration) -> Self {
        Self {
            player: PlayerSurface::new(),
            telemetry: TelemetrySurface::new(),
            tracker: InteractionTracker::new(),
            link: LinkStatus::Connecting,
            notice: None,
            next_ticket: 1,
            ack_timeout,
            stale_after,
        }
    }

    pub fn player(&self) -> &PlayerSurface {
        &self.player
    }

    pub fn telemetry(&self) -> &TelemetrySurface {
        &self.telemetry
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub fn link(&self) -> LinkStatus {
        self.link
    }

    /// Apply one event. Returns the request to start, if any.
    pub fn handle(&mut self, event: DashboardEvent, now: Instant) -> Option<Outbound> {
        match event {
            DashboardEvent::Push(msg) => {
                self.on_push(msg, now);
                None
            }
            DashboardEvent::Link(status) => {
                if status != self.link {
                    log::info!("[WS] link {}", status.as_str());
                }
                if status == LinkStatus::Connected {
                    self.notice = None;
                }
                self.link = status;
                None
            }
            DashboardEvent::Command(command) => self.issue(command, now),
            DashboardEvent::GestureBegin(control) => {
                let current = self.slider_value(control);
                self.tracker.begin(control, current);
                self.player.on_edit_begin(self.editing_fields());
                None
            }
            DashboardEvent::GestureMove(control, value) => {
                if value.is_nan() {
                    return None;
                }
                let (min, max) = control.range();
                if !self.tracker.update(control, value.clamp(min, max)) {
                    log::debug!("[UI] {} moved without being held", control.as_str());
                }
                None
            }
            DashboardEvent::GestureEnd(control) => {
                if !self.tracker.is_active(control) {
                    log::debug!("[UI] {} released without being held", control.as_str());
                    return None;
                }
                let released = self.tracker.end(control);
                self.player.on_edit_end(self.editing_fields());
                released.and_then(|value| self.issue(control.command(value), now))
            }
            DashboardEvent::Settled { ticket, outcome } => {
                let notice = outcome.as_ref().err().and_then(DispatchError::notice);
                if self.player.on_settled(ticket, outcome, self.editing_fields()) {
                    self.notice = notice;
                }
                None
            }
            DashboardEvent::Delivered { command, outcome } => {
                match outcome {
                    Ok(()) => log::debug!("[CMD] {command} delivered"),
                    Err(e) => {
                        log::warn!("[CMD] {command} failed: {e}");
                        if let Some(notice) = e.notice() {
                            self.notice = Some(notice);
                        }
                    }
                }
                None
            }
            DashboardEvent::Tick => {
                self.player.on_tick(now, self.editing_fields());
                None
            }
            DashboardEvent::Quit => None,
        }
    }

    /// The next instant at which a [`DashboardEvent::Tick`] would change
    /// something.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        let stale = self.telemetry.stale_deadline(now, self.stale_after);
        match (self.player.deadline(), stale) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn view(&self, now: Instant) -> DashboardView {
        DashboardView {
            player: self.player.view(&self.tracker),
            telemetry: self.telemetry.view(now, self.stale_after),
            link: self.link,
            notice: self.notice.clone(),
        }
    }

    fn on_push(&mut self, msg: PushMessage, now: Instant) {
        match msg {
            PushMessage::Telemetry(t) => self.telemetry.on_sample(t.sample(), now),
            PushMessage::ObdStatus(s) => self.telemetry.on_status(s.message),
            PushMessage::Player(p) => {
                let editing = self.editing_fields();
                self.player.on_push(PlayerPatch::from(p), editing);
            }
        }
    }

    fn issue(&mut self, command: ControlCommand, now: Instant) -> Option<Outbound> {
        if !command.expects_player_state() {
            log::info!("[CMD] {command}");
            return Some(Outbound::FireAndForget(command));
        }

        let ticket = CommandTicket(self.next_ticket);
        self.next_ticket += 1;
        log::info!("[CMD] {command} {ticket}");
        self.player
            .on_dispatch(ticket, command, now + self.ack_timeout);
        Some(Outbound::Dispatch { ticket, command })
    }

    fn editing_fields(&self) -> FieldSet {
        FieldSet::for_controls(self.tracker.active_controls())
    }

    /// Where the slider currently sits, as the user sees it. `None` until
    /// the server has reported a value.
    fn slider_value(&self, control: ControlId) -> Option<f32> {
        let view = self.player.view(&self.tracker)?;
        match control {
            ControlId::Seek => Some(view.seek_percent as f32),
            ControlId::Volume => view.volume,
        }
    }
}

// frontend/src/dashboard/player.rs
//
// Player panel reconciliation. One phase at a time:
//   Idle               -> last known state is shown as-is
//   AwaitingAck        -> pushes for the command's fields are held back
//   UserEditing        -> pushes for held sliders go into a shadow patch;
//                         a command sent mid-gesture is still awaited

use super::CommandTicket;
use crate::error::DispatchError;
use crate::format::{format_clock, percentage_to_seek_target, seek_target_to_percentage};
use crate::interaction::{ControlId, InteractionTracker};
use cardash_shared::{ControlCommand, PlayerMessage, PlayerState};
use std::mem;
use std::time::Instant;

use super::view::PlayerView;

const PLAYING_GLYPH: &str = "⏸";
const PAUSED_GLYPH: &str = "▶";

/// Logical fields of the player panel that can be updated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    Playback,
    Track,
    Position,
    Volume,
}

impl PlayerField {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn for_control(control: ControlId) -> Self {
        match control {
            ControlId::Seek => PlayerField::Position,
            ControlId::Volume => PlayerField::Volume,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);

    pub fn of(fields: &[PlayerField]) -> Self {
        fields.iter().fold(Self::EMPTY, |set, f| set.with(*f))
    }

    pub fn with(self, field: PlayerField) -> Self {
        FieldSet(self.0 | field.bit())
    }

    pub fn union(self, other: FieldSet) -> Self {
        FieldSet(self.0 | other.0)
    }

    pub fn without(self, other: FieldSet) -> Self {
        FieldSet(self.0 & !other.0)
    }

    pub fn overlaps(self, other: FieldSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, field: PlayerField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Fields a command is expected to change.
    pub fn for_command(command: &ControlCommand) -> Self {
        match command {
            ControlCommand::PlayPause => Self::of(&[PlayerField::Playback]),
            ControlCommand::SkipForward | ControlCommand::SkipBack => {
                Self::of(&[PlayerField::Track, PlayerField::Position])
            }
            ControlCommand::SeekTo(_) => Self::of(&[PlayerField::Position]),
            ControlCommand::SetVolume(_) => Self::of(&[PlayerField::Volume]),
            _ => Self::EMPTY,
        }
    }

    pub fn for_controls(controls: impl IntoIterator<Item = ControlId>) -> Self {
        controls
            .into_iter()
            .fold(Self::EMPTY, |set, c| set.with(PlayerField::for_control(c)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPatch {
    pub title: String,
    pub artist: String,
    pub length: Option<u32>,
}

/// Field-wise update carried by a push message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatch {
    pub track: Option<TrackPatch>,
    pub playing: Option<bool>,
    pub volume: Option<f32>,
}

impl From<PlayerMessage> for PlayerPatch {
    fn from(msg: PlayerMessage) -> Self {
        Self {
            track: Some(TrackPatch {
                title: msg.song.title,
                artist: msg.song.artist,
                length: msg.song.length,
            }),
            playing: Some(msg.is_playing),
            volume: msg.volume,
        }
    }
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.track.is_none() && self.playing.is_none() && self.volume.is_none()
    }

    pub fn fields(&self) -> FieldSet {
        let mut set = FieldSet::EMPTY;
        if self.track.is_some() {
            set = set.with(PlayerField::Track);
        }
        if self.playing.is_some() {
            set = set.with(PlayerField::Playback);
        }
        if self.volume.is_some() {
            set = set.with(PlayerField::Volume);
        }
        set
    }

    /// Move the parts touching `fields` into a new patch.
    pub fn split_off(&mut self, fields: FieldSet) -> PlayerPatch {
        let mut held = PlayerPatch::default();
        if fields.contains(PlayerField::Track) {
            held.track = self.track.take();
        }
        if fields.contains(PlayerField::Playback) {
            held.playing = self.playing.take();
        }
        if fields.contains(PlayerField::Volume) {
            held.volume = self.volume.take();
        }
        held
    }

    /// Newer values win field by field.
    pub fn merge(&mut self, newer: PlayerPatch) {
        if newer.track.is_some() {
            self.track = newer.track;
        }
        if newer.playing.is_some() {
            self.playing = newer.playing;
        }
        if newer.volume.is_some() {
            self.volume = newer.volume;
        }
    }

    pub fn apply_to(self, state: &mut Option<PlayerState>) {
        if self.is_empty() {
            return;
        }
        let state = state.get_or_insert_with(PlayerState::default);

        if let Some(track) = self.track {
            let new_song = track.title != state.title || track.artist != state.artist;
            if new_song {
                state.position_seconds = Some(0);
                state.length_seconds = track.length.unwrap_or(0);
            } else if let Some(length) = track.length {
                state.length_seconds = length;
            }
            state.title = track.title;
            state.artist = track.artist;
        }
        if let Some(playing) = self.playing {
            state.is_playing = playing;
        }
        if let Some(volume) = self.volume {
            state.volume = Some(volume);
        }
        if state.length_seconds > 0 {
            let length = state.length_seconds;
            state.position_seconds = state.position_seconds.map(|p| p.min(length));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    AwaitingCommandAck,
    UserEditing,
}

/// A dispatched player command whose ack has not come back yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommand {
    pub ticket: CommandTicket,
    pub command: ControlCommand,
    /// Fields the ack is expected to change.
    pub fields: FieldSet,
    pub deadline: Instant,
}

impl PendingCommand {
    fn new(ticket: CommandTicket, command: ControlCommand, deadline: Instant) -> Self {
        Self {
            ticket,
            fields: FieldSet::for_command(&command),
            command,
            deadline,
        }
    }

    /// The newer command inherits this one's fields; this ticket is stale
    /// from now on.
    fn superseded_by(self, newer: PendingCommand) -> Self {
        log::debug!(
            "[CMD] {} {} supersedes {}",
            newer.command,
            newer.ticket,
            self.ticket
        );
        PendingCommand {
            fields: newer.fields.union(self.fields),
            ..newer
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerPhase {
    Idle,
    AwaitingAck {
        pending: PendingCommand,
        held: PlayerPatch,
    },
    /// `shadow` collects pushes for the held sliders, plus the fields of
    /// `pending` when a command went out mid-gesture.
    UserEditing {
        shadow: PlayerPatch,
        pending: Option<PendingCommand>,
    },
}

impl PlayerPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PlayerPhase::Idle => PhaseKind::Idle,
            PlayerPhase::AwaitingAck { .. } => PhaseKind::AwaitingCommandAck,
            PlayerPhase::UserEditing { .. } => PhaseKind::UserEditing,
        }
    }

    pub fn pending(&self) -> Option<&PendingCommand> {
        match self {
            PlayerPhase::Idle => None,
            PlayerPhase::AwaitingAck { pending, .. } => Some(pending),
            PlayerPhase::UserEditing { pending, .. } => pending.as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct PlayerSurface {
    confirmed: Option<PlayerState>,
    phase: PlayerPhase,
}

impl Default for PlayerSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerSurface {
    pub fn new() -> Self {
        Self {
            confirmed: None,
            phase: PlayerPhase::Idle,
        }
    }

    /// Last authoritative state (ack or push), without any local overlay.
    pub fn confirmed(&self) -> Option<&PlayerState> {
        self.confirmed.as_ref()
    }

    pub fn phase(&self) -> &PlayerPhase {
        &self.phase
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.phase.pending().map(|p| p.deadline)
    }

    pub fn on_push(&mut self, mut patch: PlayerPatch, editing: FieldSet) {
        match &mut self.phase {
            PlayerPhase::Idle => {}
            PlayerPhase::AwaitingAck { pending, held } => {
                held.merge(patch.split_off(pending.fields));
            }
            PlayerPhase::UserEditing { shadow, pending } => {
                let hold = pending
                    .as_ref()
                    .map_or(editing, |p| editing.union(p.fields));
                shadow.merge(patch.split_off(hold));
            }
        }
        patch.apply_to(&mut self.confirmed);
    }

    pub fn on_dispatch(
        &mut self,
        ticket: CommandTicket,
        command: ControlCommand,
        deadline: Instant,
    ) {
        let next = PendingCommand::new(ticket, command, deadline);
        self.phase = match mem::replace(&mut self.phase, PlayerPhase::Idle) {
            PlayerPhase::Idle => PlayerPhase::AwaitingAck {
                pending: next,
                held: PlayerPatch::default(),
            },
            PlayerPhase::AwaitingAck { pending, held } => PlayerPhase::AwaitingAck {
                pending: pending.superseded_by(next),
                held,
            },
            PlayerPhase::UserEditing { shadow, pending } => {
                log::debug!("[CMD] {command} {ticket} sent mid-gesture");
                PlayerPhase::UserEditing {
                    shadow,
                    pending: Some(match pending {
                        Some(older) => older.superseded_by(next),
                        None => next,
                    }),
                }
            }
        };
    }

    /// Returns true if the settlement was the one this surface waited for.
    /// `editing` covers the sliders still held; their fields keep the last
    /// confirmed value until release.
    pub fn on_settled(
        &mut self,
        ticket: CommandTicket,
        outcome: Result<PlayerState, DispatchError>,
        editing: FieldSet,
    ) -> bool {
        if self.phase.pending().is_none_or(|p| p.ticket != ticket) {
            log::debug!("[CMD] discarding stale settlement for {ticket}");
            return false;
        }

        match mem::replace(&mut self.phase, PlayerPhase::Idle) {
            PlayerPhase::AwaitingAck { pending, held } => {
                self.settle(pending, outcome, held, FieldSet::EMPTY);
            }
            PlayerPhase::UserEditing {
                mut shadow,
                pending: Some(pending),
            } => {
                let held = shadow.split_off(pending.fields.without(editing));
                self.settle(pending, outcome, held, editing);
                self.phase = PlayerPhase::UserEditing {
                    shadow,
                    pending: None,
                };
            }
            other => self.phase = other,
        }
        true
    }

    fn settle(
        &mut self,
        pending: PendingCommand,
        outcome: Result<PlayerState, DispatchError>,
        held: PlayerPatch,
        editing: FieldSet,
    ) {
        let PendingCommand {
            ticket, command, ..
        } = pending;
        match outcome {
            Ok(ack) => {
                // Held pushes predate the ack and are dropped.
                log::debug!("[CMD] {command} {ticket} acknowledged");
                self.confirmed = Some(self.merge_ack(&command, ack, editing));
            }
            Err(e) => {
                log::warn!("[CMD] {command} {ticket} failed: {e}");
                held.apply_to(&mut self.confirmed);
            }
        }
    }

    /// Fill in what the ack leaves out. The player server never reports
    /// position and older builds omit volume.
    fn merge_ack(
        &self,
        command: &ControlCommand,
        mut ack: PlayerState,
        editing: FieldSet,
    ) -> PlayerState {
        let known = self.confirmed.as_ref();
        let same_song = known.is_some_and(|k| k.title == ack.title && k.artist == ack.artist);

        if ack.position_seconds.is_none() {
            ack.position_seconds = match command {
                ControlCommand::SeekTo(p) => {
                    Some(percentage_to_seek_target(*p as f64, ack.length_seconds))
                }
                _ if same_song => known.and_then(|k| k.position_seconds),
                _ => Some(0),
            };
        }
        if ack.volume.is_none() {
            ack.volume = known.and_then(|k| k.volume);
        }

        if let Some(known) = known {
            if editing.contains(PlayerField::Position) && same_song {
                ack.position_seconds = known.position_seconds;
            }
            if editing.contains(PlayerField::Volume) {
                ack.volume = known.volume;
            }
        }

        if ack.length_seconds > 0 {
            ack.position_seconds = ack.position_seconds.map(|p| p.min(ack.length_seconds));
        }
        ack
    }

    /// Returns true if an outstanding ack timed out.
    pub fn on_tick(&mut self, now: Instant, editing: FieldSet) -> bool {
        if !self.phase.pending().is_some_and(|p| p.deadline <= now) {
            return false;
        }

        match mem::replace(&mut self.phase, PlayerPhase::Idle) {
            PlayerPhase::AwaitingAck { pending, held } => {
                log::warn!(
                    "[CMD] no ack for {} {} in time; back to idle",
                    pending.command,
                    pending.ticket
                );
                held.apply_to(&mut self.confirmed);
            }
            PlayerPhase::UserEditing {
                mut shadow,
                pending: Some(pending),
            } => {
                log::warn!(
                    "[CMD] no ack for {} {} in time",
                    pending.command,
                    pending.ticket
                );
                shadow
                    .split_off(pending.fields.without(editing))
                    .apply_to(&mut self.confirmed);
                self.phase = PlayerPhase::UserEditing {
                    shadow,
                    pending: None,
                };
            }
            other => self.phase = other,
        }
        true
    }

    /// A slider was grabbed. `editing` covers every slider now held.
    ///
    /// An outstanding command keeps waiting for its ack unless the grabbed
    /// slider controls one of its fields; then the gesture wins.
    pub fn on_edit_begin(&mut self, editing: FieldSet) {
        self.phase = match mem::replace(&mut self.phase, PlayerPhase::Idle) {
            PlayerPhase::Idle => PlayerPhase::UserEditing {
                shadow: PlayerPatch::default(),
                pending: None,
            },
            PlayerPhase::AwaitingAck { pending, held } => PlayerPhase::UserEditing {
                shadow: held,
                pending: Some(pending),
            },
            editing_phase @ PlayerPhase::UserEditing { .. } => editing_phase,
        };

        if let PlayerPhase::UserEditing { shadow, pending } = &mut self.phase {
            if let Some(contested) = pending.take_if(|p| p.fields.overlaps(editing)) {
                log::debug!("[UI] gesture supersedes {}", contested.ticket);
                shadow
                    .split_off(contested.fields.without(editing))
                    .apply_to(&mut self.confirmed);
            }
        }
    }

    /// A slider was released. `still_editing` covers the sliders still held.
    pub fn on_edit_end(&mut self, still_editing: FieldSet) {
        let PlayerPhase::UserEditing { shadow, pending } = &mut self.phase else {
            return;
        };

        let keep = pending
            .as_ref()
            .map_or(still_editing, |p| still_editing.union(p.fields));
        let mut released = mem::take(shadow);
        *shadow = released.split_off(keep);
        released.apply_to(&mut self.confirmed);

        if !still_editing.is_empty() {
            return;
        }
        self.phase = match mem::replace(&mut self.phase, PlayerPhase::Idle) {
            PlayerPhase::UserEditing {
                shadow,
                pending: Some(pending),
            } => PlayerPhase::AwaitingAck {
                pending,
                held: shadow,
            },
            _ => PlayerPhase::Idle,
        };
    }

    pub fn view(&self, tracker: &InteractionTracker) -> Option<PlayerView> {
        let state = self.confirmed.as_ref()?;
        let length = state.length_seconds;

        let mut is_playing = state.is_playing;
        let mut position = state.position_seconds.unwrap_or(0);
        let mut seek_percent = seek_target_to_percentage(position, length);
        let mut volume = state.volume;

        let seek_to = |percentage: f32| {
            let percentage = (percentage as f64).clamp(0.0, 100.0);
            (percentage, percentage_to_seek_target(percentage, length))
        };

        if let Some(pending) = self.phase.pending() {
            match pending.command {
                ControlCommand::PlayPause => is_playing = !is_playing,
                ControlCommand::SeekTo(p) => (seek_percent, position) = seek_to(p),
                ControlCommand::SetVolume(v) => volume = Some(v),
                _ => {}
            }
        }
        if let Some(p) = tracker.pending(ControlId::Seek) {
            (seek_percent, position) = seek_to(p);
        }
        if let Some(v) = tracker.pending(ControlId::Volume) {
            volume = Some(v);
        }

        Some(PlayerView {
            song_line: state.song_line(),
            is_playing,
            play_button: if is_playing { PLAYING_GLYPH } else { PAUSED_GLYPH },
            position_label: format_clock(position as u64),
            length_label: format_clock(length as u64),
            seek_percent,
            volume,
            phase: self.phase.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state(title: &str, playing: bool) -> PlayerState {
        PlayerState {
            title: title.to_string(),
            artist: "Kenny Loggins".to_string(),
            is_playing: playing,
            position_seconds: Some(30),
            length_seconds: 200,
            volume: Some(0.5),
        }
    }

    fn patch(title: &str, playing: bool, volume: Option<f32>) -> PlayerPatch {
        PlayerPatch {
            track: Some(TrackPatch {
                title: title.to_string(),
                artist: "Kenny Loggins".to_string(),
                length: None,
            }),
            playing: Some(playing),
            volume,
        }
    }

    fn surface_with(state: PlayerState) -> PlayerSurface {
        let mut surface = PlayerSurface::new();
        surface.confirmed = Some(state);
        surface
    }

    #[test]
    fn field_sets() {
        let set = FieldSet::for_command(&ControlCommand::SkipForward);
        assert!(set.contains(PlayerField::Track));
        assert!(set.contains(PlayerField::Position));
        assert!(!set.contains(PlayerField::Volume));
        assert!(FieldSet::for_command(&ControlCommand::Shutdown).is_empty());
        assert_eq!(
            FieldSet::for_controls([ControlId::Volume]),
            FieldSet::of(&[PlayerField::Volume])
        );
    }

    #[test]
    fn split_off_moves_only_requested_fields() {
        let mut p = patch("Danger Zone", true, Some(0.2));
        let held = p.split_off(FieldSet::of(&[PlayerField::Volume]));
        assert_eq!(held.volume, Some(0.2));
        assert!(held.track.is_none());
        assert_eq!(p.volume, None);
        assert_eq!(p.playing, Some(true));
        assert_eq!(
            p.fields(),
            FieldSet::of(&[PlayerField::Track, PlayerField::Playback])
        );
    }

    #[test]
    fn first_push_creates_state_and_new_song_resets_position() {
        let mut confirmed = None;
        patch("Danger Zone", true, None).apply_to(&mut confirmed);
        let s = confirmed.as_ref().expect("created");
        assert_eq!(s.title, "Danger Zone");
        assert_eq!(s.position_seconds, Some(0));

        let mut confirmed = Some(state("Danger Zone", true));
        patch("Highway to the Danger Zone", true, None).apply_to(&mut confirmed);
        let s = confirmed.as_ref().expect("kept");
        assert_eq!(s.position_seconds, Some(0));
        assert_eq!(s.length_seconds, 0);
    }

    #[test]
    fn same_song_push_keeps_position() {
        let mut confirmed = Some(state("Danger Zone", true));
        patch("Danger Zone", false, None).apply_to(&mut confirmed);
        let s = confirmed.as_ref().expect("kept");
        assert_eq!(s.position_seconds, Some(30));
        assert_eq!(s.length_seconds, 200);
        assert!(!s.is_playing);
    }

    #[test]
    fn unrelated_push_fields_apply_while_awaiting_ack() {
        let mut surface = surface_with(state("Danger Zone", false));
        let now = Instant::now();
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::SetVolume(0.9),
            now + Duration::from_secs(3),
        );
        surface.on_push(patch("Danger Zone", true, Some(0.1)), FieldSet::EMPTY);

        let confirmed = surface.confirmed().expect("state");
        assert!(confirmed.is_playing);
        assert_eq!(confirmed.volume, Some(0.5));
    }

    #[test]
    fn ack_keeps_known_volume_when_server_omits_it() {
        let mut surface = surface_with(state("Danger Zone", false));
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::PlayPause,
            Instant::now() + Duration::from_secs(3),
        );
        let mut ack = state("Danger Zone", true);
        ack.volume = None;
        assert!(surface.on_settled(CommandTicket(1), Ok(ack), FieldSet::EMPTY));
        assert_eq!(surface.confirmed().and_then(|s| s.volume), Some(0.5));
    }

    #[test]
    fn timeout_only_fires_after_deadline() {
        let mut surface = surface_with(state("Danger Zone", false));
        let now = Instant::now();
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::PlayPause,
            now + Duration::from_secs(3),
        );
        assert!(!surface.on_tick(now + Duration::from_secs(1), FieldSet::EMPTY));
        assert!(surface.on_tick(now + Duration::from_secs(3), FieldSet::EMPTY));
        assert_eq!(surface.phase(), &PlayerPhase::Idle);
    }

    #[test]
    fn documented_ack_body_keeps_known_position() {
        let mut known = state("Danger Zone", false);
        known.position_seconds = Some(90);
        let mut surface = surface_with(known);
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::PlayPause,
            Instant::now() + Duration::from_secs(3),
        );

        let ack: PlayerState = serde_json::from_str(
            r#"{"title":"Danger Zone","interpret":"Kenny Loggins","length":200,"isPlaying":true,"volume":0.5,"error":null}"#,
        )
        .expect("ack body");
        assert_eq!(ack.position_seconds, None);
        assert!(surface.on_settled(CommandTicket(1), Ok(ack), FieldSet::EMPTY));

        let view = surface.view(&InteractionTracker::new()).expect("view");
        assert_eq!(view.position_label, "1:30");
        assert!(view.is_playing);
    }

    #[test]
    fn seek_ack_without_position_lands_on_target() {
        let mut surface = surface_with(state("Danger Zone", true));
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::SeekTo(50.0),
            Instant::now() + Duration::from_secs(3),
        );
        let mut ack = state("Danger Zone", true);
        ack.position_seconds = None;
        assert!(surface.on_settled(CommandTicket(1), Ok(ack), FieldSet::EMPTY));
        assert_eq!(surface.confirmed().and_then(|s| s.position_seconds), Some(100));
    }

    #[test]
    fn new_song_ack_without_position_starts_at_zero() {
        let mut surface = surface_with(state("Danger Zone", true));
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::SkipForward,
            Instant::now() + Duration::from_secs(3),
        );
        let mut ack = state("Footloose", true);
        ack.position_seconds = None;
        assert!(surface.on_settled(CommandTicket(1), Ok(ack), FieldSet::EMPTY));
        assert_eq!(surface.confirmed().and_then(|s| s.position_seconds), Some(0));
    }

    #[test]
    fn command_sent_mid_gesture_is_still_awaited() {
        let mut surface = surface_with(state("Danger Zone", true));
        let volume_held = FieldSet::of(&[PlayerField::Volume]);
        let now = Instant::now();

        surface.on_edit_begin(volume_held);
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::SeekTo(50.0),
            now + Duration::from_secs(3),
        );
        assert_eq!(surface.deadline(), Some(now + Duration::from_secs(3)));

        // A stale push for the seek field is held back, the held volume is shadowed.
        surface.on_push(
            PlayerPatch {
                track: None,
                playing: None,
                volume: Some(0.1),
            },
            volume_held,
        );

        let mut ack = state("Danger Zone", true);
        ack.position_seconds = Some(100);
        ack.volume = Some(0.9);
        assert!(surface.on_settled(CommandTicket(1), Ok(ack), volume_held));

        let confirmed = surface.confirmed().expect("state");
        assert_eq!(confirmed.position_seconds, Some(100));
        // Held slider keeps its value until release.
        assert_eq!(confirmed.volume, Some(0.5));
        assert_eq!(surface.phase().kind(), PhaseKind::UserEditing);

        surface.on_edit_end(FieldSet::EMPTY);
        assert_eq!(surface.phase(), &PlayerPhase::Idle);
        assert_eq!(surface.confirmed().and_then(|s| s.volume), Some(0.1));
    }

    #[test]
    fn grabbing_the_commanded_slider_drops_the_pending_ack() {
        let mut surface = surface_with(state("Danger Zone", true));
        surface.on_dispatch(
            CommandTicket(1),
            ControlCommand::SetVolume(0.9),
            Instant::now() + Duration::from_secs(3),
        );
        surface.on_edit_begin(FieldSet::of(&[PlayerField::Volume]));
        assert_eq!(surface.deadline(), None);
        assert!(!surface.on_settled(
            CommandTicket(1),
            Ok(state("Danger Zone", true)),
            FieldSet::of(&[PlayerField::Volume])
        ));
    }
}

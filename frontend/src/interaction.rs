//! Slider gestures. Each control owns its own session slot so a drag on one
//! slider can never mark another one as changed.

use cardash_shared::ControlCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Song position slider, value is a percentage `0..=100`.
    Seek,
    /// Volume slider, value is a fraction `0.0..=1.0`.
    Volume,
}

impl ControlId {
    pub const ALL: [ControlId; 2] = [ControlId::Seek, ControlId::Volume];
    const COUNT: usize = Self::ALL.len();

    fn slot(self) -> usize {
        match self {
            ControlId::Seek => 0,
            ControlId::Volume => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::Seek => "seek",
            ControlId::Volume => "volume",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "seek" | "position" => Some(ControlId::Seek),
            "volume" | "vol" => Some(ControlId::Volume),
            _ => None,
        }
    }

    /// Accepted value range for the slider.
    pub fn range(&self) -> (f32, f32) {
        match self {
            ControlId::Seek => (0.0, 100.0),
            ControlId::Volume => (0.0, 1.0),
        }
    }

    /// Command sent when a changed gesture is released.
    pub fn command(&self, value: f32) -> ControlCommand {
        match self {
            ControlId::Seek => ControlCommand::SeekTo(value),
            ControlId::Volume => ControlCommand::SetVolume(value),
        }
    }
}

/// A held slider. Values are `None` until the slider shows or is moved to a
/// known value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSession {
    pub control: ControlId,
    pub initial_value: Option<f32>,
    pub pending_value: Option<f32>,
}

#[derive(Debug, Default)]
pub struct InteractionTracker {
    sessions: [Option<InteractionSession>; ControlId::COUNT],
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start holding `control`, which currently shows `current_value`.
    /// `None` means the value is unknown, so any move counts as a change.
    pub fn begin(&mut self, control: ControlId, current_value: Option<f32>) {
        let slot = &mut self.sessions[control.slot()];
        if slot.is_some() {
            log::debug!(
                "[UI] {} grabbed again without a release; restarting gesture",
                control.as_str()
            );
        }
        *slot = Some(InteractionSession {
            control,
            initial_value: current_value,
            pending_value: current_value,
        });
    }

    /// Returns false when `control` is not being held.
    pub fn update(&mut self, control: ControlId, value: f32) -> bool {
        match &mut self.sessions[control.slot()] {
            Some(session) => {
                session.pending_value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Release `control`. Yields the final value only if it moved since
    /// `begin`; `None` means nothing should be sent.
    pub fn end(&mut self, control: ControlId) -> Option<f32> {
        let session = self.sessions[control.slot()].take()?;
        session
            .pending_value
            .filter(|_| session.pending_value != session.initial_value)
    }

    pub fn session(&self, control: ControlId) -> Option<&InteractionSession> {
        self.sessions[control.slot()].as_ref()
    }

    pub fn is_active(&self, control: ControlId) -> bool {
        self.session(control).is_some()
    }

    pub fn pending(&self, control: ControlId) -> Option<f32> {
        self.session(control).and_then(|s| s.pending_value)
    }

    pub fn active_controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        ControlId::ALL
            .into_iter()
            .filter(|control| self.is_active(*control))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_without_drag_sends_nothing() {
        let mut tracker = InteractionTracker::new();
        tracker.begin(ControlId::Seek, Some(40.0));
        assert_eq!(tracker.end(ControlId::Seek), None);
        assert!(!tracker.is_active(ControlId::Seek));
    }

    #[test]
    fn drag_away_and_back_counts_as_unchanged() {
        let mut tracker = InteractionTracker::new();
        tracker.begin(ControlId::Volume, Some(0.5));
        assert!(tracker.update(ControlId::Volume, 0.8));
        assert!(tracker.update(ControlId::Volume, 0.5));
        assert_eq!(tracker.end(ControlId::Volume), None);
    }

    #[test]
    fn release_returns_final_value() {
        let mut tracker = InteractionTracker::new();
        tracker.begin(ControlId::Seek, Some(10.0));
        tracker.update(ControlId::Seek, 30.0);
        tracker.update(ControlId::Seek, 55.0);
        assert_eq!(tracker.pending(ControlId::Seek), Some(55.0));
        assert_eq!(tracker.end(ControlId::Seek), Some(55.0));
        assert_eq!(tracker.end(ControlId::Seek), None);
    }

    #[test]
    fn sessions_are_independent_per_control() {
        let mut tracker = InteractionTracker::new();
        tracker.begin(ControlId::Seek, Some(0.0));
        tracker.begin(ControlId::Volume, Some(0.5));
        tracker.update(ControlId::Volume, 0.9);

        assert_eq!(
            tracker.active_controls().collect::<Vec<_>>(),
            vec![ControlId::Seek, ControlId::Volume]
        );
        // Moving the volume slider must not make the seek release look changed.
        assert_eq!(tracker.end(ControlId::Seek), None);
        assert!(tracker.is_active(ControlId::Volume));
        assert_eq!(tracker.end(ControlId::Volume), Some(0.9));
        assert_eq!(tracker.active_controls().next(), None);
    }

    #[test]
    fn unknown_start_value_makes_any_move_a_change() {
        let mut tracker = InteractionTracker::new();
        tracker.begin(ControlId::Volume, None);
        assert_eq!(tracker.pending(ControlId::Volume), None);
        tracker.update(ControlId::Volume, 0.5);
        assert_eq!(tracker.end(ControlId::Volume), Some(0.5));

        tracker.begin(ControlId::Volume, None);
        assert_eq!(tracker.end(ControlId::Volume), None);
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut tracker = InteractionTracker::new();
        assert!(!tracker.update(ControlId::Seek, 20.0));
        assert_eq!(tracker.end(ControlId::Seek), None);
    }

    #[test]
    fn release_maps_to_slider_command() {
        assert_eq!(ControlId::Seek.command(50.0), ControlCommand::SeekTo(50.0));
        assert_eq!(
            ControlId::Volume.command(0.3),
            ControlCommand::SetVolume(0.3)
        );
    }
}

//! Overhead alert marker.
//!
//! Each agent carries an exclamation mark and a question mark. At most one of
//! them is visible, and which one is decided entirely by the owning
//! controller's current state.
use log::error;

use crate::agent::AgentId;

/// Perceived alert level of an agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlertState {
    /// Nothing shown.
    #[default]
    None,
    /// Curious: something was heard.
    Question,
    /// Alarmed: the player was seen.
    Exclamation,
}

impl AlertState {
    /// Whether `marker` is visible in this state.
    #[must_use]
    pub const fn shows(self, marker: Marker) -> bool {
        matches!(
            (self, marker),
            (Self::Question, Marker::Question) | (Self::Exclamation, Marker::Exclamation)
        )
    }
}

/// One of the two overhead markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The `!` marker.
    Exclamation,
    /// The `?` marker.
    Question,
}

impl Marker {
    /// Both markers in display order.
    pub const ALL: [Self; 2] = [Self::Exclamation, Self::Question];
}

/// Presentation side of the indicator, implemented by whatever draws the
/// markers.
pub trait AlertDisplay {
    /// Shows or hides a single marker.
    fn show(&mut self, marker: Marker, visible: bool);
}

/// Holds an agent's [`AlertState`] and mirrors it onto an optional display.
pub struct AlertIndicator {
    state: AlertState,
    display: Option<Box<dyn AlertDisplay>>,
}

impl AlertIndicator {
    /// Creates an indicator with both markers hidden.
    ///
    /// An agent spawned without markers still tracks its state; nothing is
    /// drawn.
    #[must_use]
    pub fn new(owner: AgentId, display: Option<Box<dyn AlertDisplay>>) -> Self {
        let mut indicator = Self {
            state: AlertState::None,
            display,
        };
        if indicator.display.is_none() {
            error!("{owner} has no alert markers; indicator will not be shown");
        }
        indicator.apply();
        indicator
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AlertState {
        self.state
    }

    /// Whether `marker` is currently visible.
    #[must_use]
    pub const fn is_visible(&self, marker: Marker) -> bool {
        self.state.shows(marker)
    }

    /// Switches to `state`. Setting the current state again is a no-op.
    pub fn set_state(&mut self, state: AlertState) {
        if state == self.state {
            return;
        }
        self.state = state;
        self.apply();
    }

    fn apply(&mut self) {
        let state = self.state;
        if let Some(display) = self.display.as_mut() {
            for marker in Marker::ALL {
                display.show(marker, state.shows(marker));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDisplay;
    use rstest::rstest;

    #[rstest]
    #[case(AlertState::None, false, false)]
    #[case(AlertState::Question, false, true)]
    #[case(AlertState::Exclamation, true, false)]
    fn exactly_one_marker_at_most(
        #[case] state: AlertState,
        #[case] exclamation: bool,
        #[case] question: bool,
    ) {
        let display = RecordingDisplay::default();
        let mut indicator = AlertIndicator::new(AgentId(1), Some(Box::new(display.clone())));
        indicator.set_state(state);
        assert_eq!(indicator.is_visible(Marker::Exclamation), exclamation);
        assert_eq!(indicator.is_visible(Marker::Question), question);
        assert_eq!(display.visible(Marker::Exclamation), exclamation);
        assert_eq!(display.visible(Marker::Question), question);
    }

    #[test]
    fn repeated_state_does_not_redraw() {
        let display = RecordingDisplay::default();
        let mut indicator = AlertIndicator::new(AgentId(1), Some(Box::new(display.clone())));
        indicator.set_state(AlertState::Question);
        let drawn = display.calls();
        indicator.set_state(AlertState::Question);
        assert_eq!(display.calls(), drawn);
    }

    #[test]
    fn missing_display_still_tracks_state() {
        let mut indicator = AlertIndicator::new(AgentId(2), None);
        indicator.set_state(AlertState::Exclamation);
        assert_eq!(indicator.state(), AlertState::Exclamation);
    }
}

//! Pointer-rest focus timer.
//!
//! ```text
//! idle --hover begins--> hovering
//! hovering --rest >= focus_in--> focused        (pointer-focus-in)
//! focused --rest >= focus_out--> expired        (pointer-focus-out)
//! hovering --pointer leaves--> idle
//! focused --pointer leaves--> idle              (pointer-focus-out)
//! ```
//!
//! Rest time is measured from the last pointer motion. Any motion resets it
//! and retracts an outstanding focus-in. `expired` behaves like `idle` but
//! remembers the widget so that focus-in does not fire again until the
//! pointer moves.

use std::time::Duration;

use horizon_strata_core::WidgetId;

use crate::widget::PointerFocusable;

/// Where the focus timer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Idle,
    Hovering(WidgetId),
    Focused(WidgetId),
    Expired(WidgetId),
}

impl FocusState {
    /// The widget the state refers to.
    pub fn widget(self) -> Option<WidgetId> {
        match self {
            FocusState::Idle => None,
            FocusState::Hovering(w) | FocusState::Focused(w) | FocusState::Expired(w) => Some(w),
        }
    }
}

/// A focus event to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTransition {
    In(WidgetId),
    Out(WidgetId),
}

/// The per-window focus state machine.
#[derive(Debug, Clone, Default)]
pub struct FocusTimer {
    state: FocusState,
    rest_since: Duration,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    /// The pointer moved at `now`. Returns the widget whose focus-in must be
    /// retracted.
    pub fn on_motion(&mut self, now: Duration) -> Option<WidgetId> {
        self.rest_since = now;
        let retract = match self.state {
            FocusState::Focused(w) => Some(w),
            _ => None,
        };
        self.state = FocusState::Idle;
        retract
    }

    /// Advance to `now` with `target` being the focusable widget under the
    /// resting pointer.
    pub fn tick(
        &mut self,
        now: Duration,
        target: Option<(WidgetId, PointerFocusable)>,
    ) -> Vec<FocusTransition> {
        let mut transitions = Vec::new();

        if self.state.widget() != target.map(|(w, _)| w) {
            if let FocusState::Focused(w) = self.state {
                transitions.push(FocusTransition::Out(w));
            }
            self.state = match target {
                Some((w, _)) => FocusState::Hovering(w),
                None => FocusState::Idle,
            };
        }

        let Some((w, focus)) = target else {
            return transitions;
        };
        let rest = now.saturating_sub(self.rest_since);
        match self.state {
            FocusState::Hovering(_) if focus.in_focus_window(rest) => {
                transitions.push(FocusTransition::In(w));
                self.state = FocusState::Focused(w);
            }
            FocusState::Hovering(_) if rest >= focus.focus_out => {
                self.state = FocusState::Expired(w);
            }
            FocusState::Focused(_) if rest >= focus.focus_out => {
                transitions.push(FocusTransition::Out(w));
                self.state = FocusState::Expired(w);
            }
            _ => {}
        }
        transitions
    }
}

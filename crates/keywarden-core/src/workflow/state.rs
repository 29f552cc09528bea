//! Interactive session state machine
//!
//! One configuration pass moves through these states:
//! `MainMenu → ProviderSelected → AwaitingValue → Validating →
//! (Saved | AwaitingOverrideDecision) → (Saved | Discarded) → MainMenu`,
//! with `Exit` as the only terminal state.

/// States of an interactive configuration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Listing providers, awaiting a selection or global command
    MainMenu,
    /// A provider was chosen; may need an overwrite confirmation
    ProviderSelected,
    /// Collecting the candidate value
    AwaitingValue,
    /// Probe in flight
    Validating,
    /// Probe failed; the user decides between force-save and discard
    AwaitingOverrideDecision,
    /// Value persisted
    Saved,
    /// Value dropped
    Discarded,
    /// Session over
    Exit,
}

/// Inputs that drive the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A provider was picked from the main menu
    SelectProvider,
    /// Proceed to value entry (also taken when nothing is configured
    /// yet and no confirmation is needed)
    ConfirmOverwrite,
    /// Keep the existing value; back to the menu unchanged
    DeclineOverwrite,
    /// A non-empty candidate was entered
    SubmitValue,
    /// Empty input; skip without error
    EmptyValue,
    /// Probe succeeded
    ValidationPassed,
    /// Probe failed
    ValidationFailed,
    /// Save despite a failed probe
    ForceSave,
    /// Drop the candidate
    Discard,
    /// Leave a Saved/Discarded state back to the menu
    Finish,
    /// End the session
    Quit,
}

impl SessionState {
    /// Apply an event, returning the next state or `None` when the
    /// event does not apply in this state.
    pub fn transition(self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (MainMenu, SelectProvider) => Some(ProviderSelected),
            (MainMenu, Quit) => Some(Exit),
            (ProviderSelected, ConfirmOverwrite) => Some(AwaitingValue),
            (ProviderSelected, DeclineOverwrite) => Some(MainMenu),
            (AwaitingValue, SubmitValue) => Some(Validating),
            (AwaitingValue, EmptyValue) => Some(MainMenu),
            (Validating, ValidationPassed) => Some(Saved),
            (Validating, ValidationFailed) => Some(AwaitingOverrideDecision),
            (AwaitingOverrideDecision, ForceSave) => Some(Saved),
            (AwaitingOverrideDecision, Discard) => Some(Discarded),
            (Saved, Finish) => Some(MainMenu),
            (Discarded, Finish) => Some(MainMenu),
            _ => None,
        }
    }

    /// Whether the session is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Exit)
    }
}

/// Current state of one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    current: SessionState,
}

impl Session {
    /// Start a session at the main menu.
    pub fn new() -> Self {
        Self {
            current: SessionState::MainMenu,
        }
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        self.current
    }

    /// Apply an event; returns false (and stays put) when the event
    /// does not apply in the current state.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match self.current.transition(event) {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_reaches_saved() {
        let mut session = Session::new();

        assert!(session.apply(SessionEvent::SelectProvider));
        assert!(session.apply(SessionEvent::ConfirmOverwrite));
        assert!(session.apply(SessionEvent::SubmitValue));
        assert!(session.apply(SessionEvent::ValidationPassed));
        assert_eq!(session.state(), SessionState::Saved);

        assert!(session.apply(SessionEvent::Finish));
        assert_eq!(session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_failed_validation_offers_override() {
        let mut session = Session::new();
        session.apply(SessionEvent::SelectProvider);
        session.apply(SessionEvent::ConfirmOverwrite);
        session.apply(SessionEvent::SubmitValue);
        session.apply(SessionEvent::ValidationFailed);
        assert_eq!(session.state(), SessionState::AwaitingOverrideDecision);

        // Force-save is the escape hatch for transient probe failures.
        let mut forced = session.clone();
        assert!(forced.apply(SessionEvent::ForceSave));
        assert_eq!(forced.state(), SessionState::Saved);

        assert!(session.apply(SessionEvent::Discard));
        assert_eq!(session.state(), SessionState::Discarded);
        assert!(session.apply(SessionEvent::Finish));
        assert_eq!(session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_decline_overwrite_returns_to_menu() {
        let mut session = Session::new();
        session.apply(SessionEvent::SelectProvider);

        assert!(session.apply(SessionEvent::DeclineOverwrite));
        assert_eq!(session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_empty_value_skips_back_to_menu() {
        let mut session = Session::new();
        session.apply(SessionEvent::SelectProvider);
        session.apply(SessionEvent::ConfirmOverwrite);

        assert!(session.apply(SessionEvent::EmptyValue));
        assert_eq!(session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut session = Session::new();

        assert!(!session.apply(SessionEvent::ForceSave));
        assert!(!session.apply(SessionEvent::ValidationPassed));
        assert_eq!(session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut session = Session::new();
        assert!(session.apply(SessionEvent::Quit));
        assert!(session.state().is_terminal());

        // Nothing applies after exit.
        assert!(!session.apply(SessionEvent::SelectProvider));
    }
}

use std::fmt;

use rust_fsm::state_machine;

/*
 * Idle        - no game in the room
 * InProgress  - a round is running, Advance moves to the next round in place
 * Completed   - the last round ended, the session is discarded right after
 */
state_machine! {
    derive(Debug, Clone, Copy, PartialEq, Eq)
    pub GameSessionFsm(Idle)

    Idle => {
        Start => InProgress,
        Reset => Idle,
    },
    InProgress => {
        Advance => InProgress,
        Complete => Completed,
        Reset => Idle,
    },
    Completed => {
        Reset => Idle,
    }
}

pub type GameStatus = GameSessionFsmState;

impl GameSessionFsmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameSessionFsmState::Idle => "IDLE",
            GameSessionFsmState::InProgress => "IN_PROGRESS",
            GameSessionFsmState::Completed => "COMPLETED",
        }
    }

    /// True once `Start` went through, until the session is reset.
    pub fn was_started(&self) -> bool {
        *self != GameSessionFsmState::Idle
    }
}

impl fmt::Display for GameSessionFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

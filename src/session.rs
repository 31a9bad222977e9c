use clap::ValueEnum;

use crate::digits::{Digit, PiSequence};

/// Wrong guesses allowed in a timed run before it ends
pub const MAX_MISTAKES: u8 = 3;
/// Digits shown after a wrong guess in practice (the correct one plus four)
pub const HINT_LEN: usize = 5;
/// Digits revealed once a timed run is over
pub const REVEAL_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Mode {
    /// wrong guesses show the next digits and never end the game
    Practice,
    /// three wrong guesses end the run and the streak is scored
    Timed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    /// Digits entered correctly so far
    pub cursor: usize,
    pub mistakes: u8,
    pub hint_active: bool,
    pub active: bool,
}

/// Result of feeding one digit through [`SessionState::advance`]. Nothing
/// here touches storage; the caller decides what to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Timed run already over
    Ignored,
    /// Every known digit has been entered
    Exhausted { score: usize },
    Correct { cursor: usize, resumed: bool },
    Hint { correct_digit: Digit, hint: Vec<Digit> },
    Retry { remaining: u8 },
    /// Third timed mistake; `score` counts the correct digits before it
    Fatal { score: usize, reveal: Vec<Digit> },
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            cursor: 0,
            mistakes: 0,
            hint_active: false,
            active: true,
        }
    }

    pub fn remaining_guesses(&self) -> u8 {
        MAX_MISTAKES.saturating_sub(self.mistakes)
    }

    /// Pure transition: returns the next state and what happened
    pub fn advance(&self, digit: Digit, pi: &PiSequence) -> (SessionState, Step) {
        let mut next = *self;

        if !self.active && self.mode == Mode::Timed {
            return (next, Step::Ignored);
        }

        // The end-of-sequence check wins over the correctness check
        let Ok(expected) = pi.digit_at(self.cursor) else {
            next.active = false;
            return (next, Step::Exhausted { score: self.cursor });
        };

        if digit == expected {
            next.cursor += 1;
            let resumed = match self.mode {
                Mode::Practice => self.hint_active,
                Mode::Timed => false,
            };
            next.hint_active = false;
            return (
                next,
                Step::Correct {
                    cursor: next.cursor,
                    resumed,
                },
            );
        }

        match self.mode {
            Mode::Practice => {
                next.mistakes = next.mistakes.saturating_add(1);
                next.hint_active = true;
                let step = Step::Hint {
                    correct_digit: expected,
                    hint: pi.slice(self.cursor, HINT_LEN).to_vec(),
                };
                (next, step)
            }
            Mode::Timed => {
                next.mistakes += 1;
                if next.mistakes < MAX_MISTAKES {
                    let step = Step::Retry {
                        remaining: next.remaining_guesses(),
                    };
                    (next, step)
                } else {
                    next.active = false;
                    let step = Step::Fatal {
                        score: self.cursor,
                        reveal: pi.slice(self.cursor, REVEAL_LEN).to_vec(),
                    };
                    (next, step)
                }
            }
        }
    }
}

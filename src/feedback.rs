//! User-facing text for game screens.

use crate::digits::{digits_to_string, PiSequence};
use crate::game::Outcome;
use crate::session::{Mode, SessionState, MAX_MISTAKES};

pub fn opening_line(mode: Mode) -> String {
    match mode {
        Mode::Practice => "Start with 1".to_string(),
        Mode::Timed => format!("Start with 1 - {MAX_MISTAKES} guesses left"),
    }
}

/// The single feedback line shown under the digit trail
pub fn feedback_line(state: &SessionState, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ignored => opening_line(state.mode),
        Outcome::Correct { resumed: true, .. } => "Back to normal - keep going".to_string(),
        Outcome::Correct { .. } => match state.mode {
            Mode::Practice => "Nice one! Keep going".to_string(),
            Mode::Timed => format!("Correct - {} guesses left", state.remaining_guesses()),
        },
        Outcome::IncorrectWithHint {
            correct_digit,
            hint,
        } => format!(
            "Incorrect, the next number was {correct_digit} - Next {}: {}",
            hint.len(),
            digits_to_string(hint)
        ),
        Outcome::IncorrectRetry { remaining } => {
            format!("Wrong! {remaining} guesses left - try again")
        }
        Outcome::GameOver {
            score,
            new_all_time_best: true,
            ..
        } => format!("Game Over! New high score: {score}"),
        Outcome::GameOver { score, .. } => format!("Game Over! Score: {score}"),
        Outcome::SequenceComplete { score, .. } => format!("You got all {score} digits!"),
    }
}

/// Secondary line for terminal outcomes
pub fn detail_line(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::GameOver { reveal, .. } => Some(format!(
            "Next {} digits: {}",
            reveal.len(),
            digits_to_string(reveal)
        )),
        Outcome::SequenceComplete { .. } => Some("You reached the end!".to_string()),
        _ => None,
    }
}

/// "3." followed by the digits entered so far, keeping only the trailing
/// `width` characters once it grows longer.
pub fn digit_trail(pi: &PiSequence, cursor: usize, width: usize) -> String {
    let full = format!("3.{}", digits_to_string(pi.slice(0, cursor)));
    let skip = full.len().saturating_sub(width.max(1));
    full[skip..].to_string()
}

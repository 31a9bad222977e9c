use chrono::{Local, NaiveDate};

use crate::digits::{Digit, PiSequence};
use crate::scores::{ScoreRecord, ScoreStore};
use crate::session::{Mode, SessionState, Step};

/// What a submitted digit did, as seen by the screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No running session, or a timed run that is already over
    Ignored,
    SequenceComplete {
        score: usize,
        new_all_time_best: bool,
    },
    Correct {
        cursor: usize,
        resumed: bool,
    },
    IncorrectWithHint {
        correct_digit: Digit,
        hint: Vec<Digit>,
    },
    IncorrectRetry {
        remaining: u8,
    },
    GameOver {
        score: usize,
        new_all_time_best: bool,
        reveal: Vec<Digit>,
    },
}

impl Outcome {
    /// Whether the terminal bell should ring for this outcome
    pub fn wants_bell(&self) -> bool {
        matches!(
            self,
            Outcome::IncorrectRetry { .. }
                | Outcome::GameOver { .. }
                | Outcome::SequenceComplete { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::GameOver { .. } | Outcome::SequenceComplete { .. }
        )
    }
}

/// Idle / Running / Ended lifecycle around [`SessionState`], wired to the
/// score store.
#[derive(Debug)]
pub struct Game<S: ScoreStore> {
    pi: PiSequence,
    store: S,
    session: Option<SessionState>,
    last_mode: Option<Mode>,
    last_outcome: Option<Outcome>,
    warning: Option<String>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<S: ScoreStore> Game<S> {
    pub fn new(pi: PiSequence, store: S) -> Self {
        Self {
            pi,
            store,
            session: None,
            last_mode: None,
            last_outcome: None,
            warning: None,
            today: local_today,
        }
    }

    /// Replace the clock used to date finished runs
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn pi(&self) -> &PiSequence {
        &self.pi
    }

    pub fn scores(&self) -> &ScoreRecord {
        self.store.record()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Best-effort message left behind by a failed score write
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn start(&mut self, mode: Mode) {
        tracing::debug!(%mode, "starting session");
        self.session = Some(SessionState::new(mode));
        self.last_mode = Some(mode);
        self.last_outcome = None;
        self.warning = None;
    }

    /// Start over in the mode last played. Returns false when no mode has
    /// been played yet.
    pub fn restart(&mut self) -> bool {
        match self.last_mode {
            Some(mode) => {
                self.start(mode);
                true
            }
            None => false,
        }
    }

    /// Drop the current session, e.g. when returning to the menu
    pub fn leave(&mut self) {
        self.session = None;
        self.last_outcome = None;
    }

    pub fn submit(&mut self, digit: Digit) -> Outcome {
        let Some(state) = self.session else {
            return Outcome::Ignored;
        };

        let (next, step) = state.advance(digit, &self.pi);
        self.session = Some(next);

        let outcome = match step {
            Step::Ignored => return Outcome::Ignored,
            Step::Correct { cursor, resumed } => Outcome::Correct { cursor, resumed },
            Step::Hint {
                correct_digit,
                hint,
            } => Outcome::IncorrectWithHint {
                correct_digit,
                hint,
            },
            Step::Retry { remaining } => Outcome::IncorrectRetry { remaining },
            Step::Fatal { score, reveal } => {
                let new_all_time_best = self.finish_timed_run(score);
                Outcome::GameOver {
                    score,
                    new_all_time_best,
                    reveal,
                }
            }
            Step::Exhausted { score } => {
                let new_all_time_best = match next.mode {
                    Mode::Timed if state.active => self.finish_timed_run(score),
                    _ => false,
                };
                Outcome::SequenceComplete {
                    score,
                    new_all_time_best,
                }
            }
        };

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Persist a finished timed run; returns whether it set a new all-time best
    fn finish_timed_run(&mut self, score: usize) -> bool {
        let streak = u32::try_from(score).unwrap_or(u32::MAX);
        let previous_best = self.store.record().all_time_best;
        let date = (self.today)();
        tracing::info!(%date, streak, "timed run finished");

        match self.store.record_if_best(date, streak) {
            Ok(change) => change.all_time_best_changed,
            Err(e) => {
                tracing::warn!(error = %e, "could not save scores");
                self.warning = Some(format!("Scores could not be saved: {e}"));
                streak > previous_best
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digits::digits_to_string;
    use crate::scores::FileScoreStore;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn pi_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn type_digits<S: ScoreStore>(game: &mut Game<S>, input: &str) -> Vec<Outcome> {
        input
            .chars()
            .map(|c| game.submit(Digit::try_from(c).unwrap()))
            .collect()
    }

    #[test]
    fn idle_game_ignores_input() {
        let dir = tempdir().unwrap();
        let mut game = Game::new(PiSequence::new(), FileScoreStore::open(dir.path()));
        assert!(game.is_idle());
        assert_eq!(type_digits(&mut game, "1"), vec![Outcome::Ignored]);
        assert!(!game.restart());
    }

    #[test]
    fn timed_game_over_records_scores() {
        let dir = tempdir().unwrap();
        let mut game =
            Game::new(PiSequence::new(), FileScoreStore::open(dir.path())).with_today(pi_day);
        game.start(Mode::Timed);

        let outcomes = type_digits(&mut game, "1415926000");
        assert_eq!(outcomes[7], Outcome::IncorrectRetry { remaining: 2 });
        assert_eq!(outcomes[8], Outcome::IncorrectRetry { remaining: 1 });
        assert_matches!(&outcomes[9], Outcome::GameOver { score, new_all_time_best, reveal } => {
            assert_eq!(*score, 7);
            assert!(*new_all_time_best);
            assert_eq!(digits_to_string(reveal), "5358979323");
        });

        assert!(!game.session().unwrap().active);
        assert_eq!(game.scores().all_time_best, 7);
        assert_eq!(game.scores().daily_best.get(&pi_day()), Some(&7));
        assert_eq!(type_digits(&mut game, "5"), vec![Outcome::Ignored]);
        assert_matches!(game.last_outcome(), Some(Outcome::GameOver { score: 7, .. }));
    }

    #[test]
    fn practice_never_touches_the_store() {
        let dir = tempdir().unwrap();
        let mut game = Game::new(PiSequence::new(), FileScoreStore::open(dir.path()));
        game.start(Mode::Practice);
        type_digits(&mut game, "1415000000");
        assert_eq!(game.session().unwrap().cursor, 4);
        assert!(game.session().unwrap().active);
        assert!(!dir.path().join("daily_scores.txt").exists());
        assert!(!dir.path().join("high_score.txt").exists());
    }

    #[test]
    fn restart_keeps_mode_and_resets_state() {
        let dir = tempdir().unwrap();
        let mut game = Game::new(PiSequence::new(), FileScoreStore::open(dir.path()));
        game.start(Mode::Practice);
        type_digits(&mut game, "140");
        assert!(game.restart());
        assert_eq!(game.session(), Some(&SessionState::new(Mode::Practice)));
        assert_eq!(game.last_outcome(), None);

        game.leave();
        assert!(game.is_idle());
        assert!(game.restart());
        assert_eq!(game.session().unwrap().mode, Mode::Practice);
    }

    #[test]
    fn timed_completion_records_full_length() {
        let dir = tempdir().unwrap();
        let pi = PiSequence::from_digits("1415").unwrap();
        let mut game = Game::new(pi, FileScoreStore::open(dir.path())).with_today(pi_day);
        game.start(Mode::Timed);
        let outcomes = type_digits(&mut game, "14150");
        assert_eq!(
            outcomes[4],
            Outcome::SequenceComplete {
                score: 4,
                new_all_time_best: true
            }
        );
        assert_eq!(game.scores().all_time_best, 4);
        // A second keystroke after completion neither scores nor re-records
        assert_eq!(type_digits(&mut game, "1"), vec![Outcome::Ignored]);
    }

    #[test]
    fn failed_write_leaves_a_warning() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut game = Game::new(PiSequence::new(), FileScoreStore::open(&blocker));
        game.start(Mode::Timed);

        let outcomes = type_digits(&mut game, "14000");
        assert_matches!(
            outcomes.last(),
            Some(Outcome::GameOver { score: 2, new_all_time_best: true, .. })
        );
        assert!(game.warning().unwrap().starts_with("Scores could not be saved"));

        game.start(Mode::Timed);
        assert_eq!(game.warning(), None);
    }

    #[test]
    fn bell_and_terminal_flags() {
        assert!(Outcome::IncorrectRetry { remaining: 1 }.wants_bell());
        assert!(!Outcome::Correct {
            cursor: 1,
            resumed: false
        }
        .wants_bell());
        assert!(Outcome::GameOver {
            score: 0,
            new_all_time_best: false,
            reveal: vec![]
        }
        .is_terminal());
        assert!(!Outcome::Ignored.is_terminal());
    }
}

use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

use pimem::digits::PiSequence;
use pimem::game::{Game, Outcome};
use pimem::scores::{FileScoreStore, ScoreStore, DAILY_SCORES_FILE, HIGH_SCORE_FILE};
use pimem::session::Mode;

/// Integration tests for score persistence across game runs and reloads.

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn play_timed(game: &mut Game<FileScoreStore>, input: &str) -> Outcome {
    game.start(Mode::Timed);
    let mut last = Outcome::Ignored;
    for c in input.chars() {
        last = game.submit(c.try_into().unwrap());
    }
    last
}

#[test]
fn lower_score_leaves_existing_bests_alone() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(HIGH_SCORE_FILE), "50\n").unwrap();
    fs::write(dir.path().join(DAILY_SCORES_FILE), "2024-01-01:50\n").unwrap();
    let mut game =
        Game::new(PiSequence::new(), FileScoreStore::open(dir.path())).with_today(new_year);

    // 30 correct digits, then three misses
    let pi = PiSequence::new();
    let mut input: String = pi.slice(0, 30).iter().map(|d| d.as_char()).collect();
    let miss = if pi.digit_at(30).unwrap().value() == 0 { "111" } else { "000" };
    input.push_str(miss);

    match play_timed(&mut game, &input) {
        Outcome::GameOver {
            score,
            new_all_time_best,
            ..
        } => {
            assert_eq!(score, 30);
            assert!(!new_all_time_best);
        }
        other => panic!("expected GameOver, got {other:?}"),
    }

    let reloaded = FileScoreStore::open(dir.path());
    assert_eq!(reloaded.record().all_time_best, 50);
    assert_eq!(reloaded.record().daily_best.get(&new_year()), Some(&50));
    assert_eq!(
        fs::read_to_string(dir.path().join(HIGH_SCORE_FILE)).unwrap(),
        "50\n"
    );
}

#[test]
fn best_of_several_runs_is_kept() {
    let dir = tempdir().unwrap();
    let mut game =
        Game::new(PiSequence::new(), FileScoreStore::open(dir.path())).with_today(new_year);

    play_timed(&mut game, "14000");
    play_timed(&mut game, "14159000");
    play_timed(&mut game, "1000");

    let reloaded = FileScoreStore::open(dir.path());
    assert_eq!(reloaded.record().all_time_best, 5);
    assert_eq!(reloaded.record().daily_best.get(&new_year()), Some(&5));
    assert_eq!(
        fs::read_to_string(dir.path().join(DAILY_SCORES_FILE)).unwrap(),
        "2024-01-01:5\n"
    );
}

#[test]
fn corrupt_files_do_not_stop_play() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(HIGH_SCORE_FILE), "lots").unwrap();
    fs::write(
        dir.path().join(DAILY_SCORES_FILE),
        "2023-12-31:12\nnot:a:line\n\n2023-12-30:x\n",
    )
    .unwrap();
    let mut store = FileScoreStore::open(dir.path());
    assert_eq!(store.record().all_time_best, 0);
    assert_eq!(store.record().daily_best.len(), 1);

    let change = store.record_if_best(new_year(), 3).unwrap();
    assert!(change.all_time_best_changed);
    assert!(change.daily_best_changed);

    // Bad lines are dropped on the next full rewrite
    assert_eq!(
        fs::read_to_string(dir.path().join(DAILY_SCORES_FILE)).unwrap(),
        "2023-12-31:12\n2024-01-01:3\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(HIGH_SCORE_FILE)).unwrap(),
        "3\n"
    );
}

#[test]
fn load_rereads_files_written_elsewhere() {
    let dir = tempdir().unwrap();
    let mut store = FileScoreStore::open(dir.path());
    assert_eq!(store.record().all_time_best, 0);

    fs::write(dir.path().join(HIGH_SCORE_FILE), "21").unwrap();
    assert_eq!(store.load().all_time_best, 21);
}

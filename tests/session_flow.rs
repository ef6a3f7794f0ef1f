use std::fs;

use loop_dash::audio::NullSound;
use loop_dash::mistakes::FIRST_RUN_MESSAGE;
use loop_dash::persistence::{BEST_PATH_KEY, FileStore, KvStore, MISTAKES_KEY};
use loop_dash::sim::Viewport;
use loop_dash::{RunStatus, Session, Settings, Tuning};

fn open_session(dir: &std::path::Path, seed: u64) -> Session<FileStore, NullSound> {
    let store = FileStore::open(dir).unwrap();
    let settings = Settings::load(&store);
    Session::new(
        Viewport::new(800.0, 600.0),
        seed,
        Tuning::default(),
        settings,
        store,
        NullSound,
    )
}

/// Flap once, then fall into the floor
fn die(session: &mut Session<FileStore, NullSound>) -> u64 {
    session.trigger(0.0);
    loop {
        if let Some(score) = session.frame(0.0).ended {
            return score;
        }
        assert!(session.state().game_time < 10_000);
    }
}

#[test]
fn test_boundary_death_persists_record_and_echo() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path(), 11);
    assert_eq!(session.feedback_message(), FIRST_RUN_MESSAGE);

    let score = die(&mut session);
    let ticks = session.state().game_time;
    assert_eq!(score, ticks / 10);

    // A brand new session sees the same history on disk
    let next = open_session(dir.path(), 12);
    let log = next.mistakes();
    assert_eq!(log.len(), 1);
    assert_eq!(log.latest().unwrap().cause, "boundary");
    assert_eq!(log.latest().unwrap().score, score);
    assert_ne!(next.feedback_message(), FIRST_RUN_MESSAGE);
    if score > 0 {
        assert_eq!(next.best_score(), score);
        assert_eq!(next.best_path().len() as u64, ticks);
    }
}

#[test]
fn test_mistakes_file_is_plain_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path(), 3);
    die(&mut session);

    let raw = fs::read_to_string(dir.path().join(format!("{MISTAKES_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    for field in ["score", "y", "obstacleType", "timestamp"] {
        assert!(entry.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn test_equal_score_keeps_previous_echo() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(dir.path(), 5);
    let first = die(&mut session);
    let echo = session.memory().best_path();

    // Same inputs, same fall, same score: not a strictly better run
    session.restart(6);
    assert_eq!(session.best_path(), echo.as_slice());
    let second = die(&mut session);
    assert_eq!(second, first);
    assert_eq!(
        session.status(),
        RunStatus::GameOver {
            score: second,
            new_best: false,
        }
    );
    assert_eq!(session.memory().best_path(), echo);
    assert_eq!(session.mistakes().len(), 2);
}

#[test]
fn test_corrupt_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set(MISTAKES_KEY, "not json at all").unwrap();
        store.set(BEST_PATH_KEY, "{\"y\": 1}").unwrap();
        store.set(Settings::STORAGE_KEY, "[]").unwrap();
    }

    let mut session = open_session(dir.path(), 9);
    assert!(session.mistakes().is_empty());
    assert!(session.best_path().is_empty());
    assert_eq!(session.settings(), &Settings::default());
    assert_eq!(session.feedback_message(), FIRST_RUN_MESSAGE);

    // And the next death overwrites the garbage
    die(&mut session);
    assert_eq!(session.mistakes().len(), 1);
}

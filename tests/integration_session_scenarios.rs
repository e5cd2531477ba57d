use std::time::{Duration, SystemTime};

use assert_matches::assert_matches;
use typeflow::matcher::{classify, Match};
use typeflow::session::{
    KeystrokeOutcome, Mode, Phase, Session, SessionError, SessionSettings, SessionSignal,
    DRILL_WORD_COUNT,
};
use typeflow::word::{builtin_word_list, WordItem};

fn at(ms: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000) + Duration::from_millis(ms)
}

fn shi() -> WordItem {
    WordItem::new("し", "shi", vec!["shi", "si", "ci"])
}

/// Types `spelling` one character at a time, returning the last outcome.
fn type_word(session: &mut Session, spelling: &str, start_ms: u64) -> KeystrokeOutcome {
    let mut outcome = KeystrokeOutcome::Unchanged;
    for (n, (i, c)) in spelling.char_indices().enumerate() {
        let buffer = &spelling[..i + c.len_utf8()];
        outcome = session.apply_keystroke(buffer, at(start_ms + n as u64 * 100));
    }
    outcome
}

#[test]
fn shi_si_ci_guide_follows_typing() {
    assert_eq!(classify(&shi().accepts, "s"), Match::Advance { variant: 0 });
    assert_eq!(classify(&shi().accepts, "si"), Match::Complete { variant: 1 });

    let mut session = Session::new(vec![shi()], SessionSettings::default()).unwrap();

    session.apply_keystroke("s", at(0));
    assert_eq!(session.active_variant(), "shi");
    assert_eq!(session.apply_keystroke("s", at(10)), KeystrokeOutcome::Unchanged);

    assert_eq!(session.apply_keystroke("si", at(100)), KeystrokeOutcome::Completed);
    assert_eq!(session.state().metrics.correct_keystrokes, 2);
    assert_eq!(session.state().metrics.missed_keystrokes, 0);
}

#[test]
fn rejected_keystroke_keeps_buffer() {
    let mut session = Session::new(
        vec![WordItem::new("し", "shi", vec!["shi"])],
        SessionSettings::default(),
    )
    .unwrap();

    session.apply_keystroke("s", at(0));
    assert_matches!(
        session.apply_keystroke("sx", at(100)),
        KeystrokeOutcome::Rejected { counted: true }
    );

    assert_eq!(session.state().metrics.missed_keystrokes, 1);
    assert_eq!(session.buffer(), "s");
}

#[test]
fn endless_single_word_never_finishes() {
    let mut session = Session::new(
        vec![shi()],
        SessionSettings::with_mode(Mode::Endless),
    )
    .unwrap();

    for round in 0..(DRILL_WORD_COUNT as u64 + 5) {
        assert_eq!(type_word(&mut session, "ci", round * 1_000), KeystrokeOutcome::Completed);
        assert_eq!(session.current_index(), 0);
    }

    assert_eq!(session.completed_count(), DRILL_WORD_COUNT + 5);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.exit(), SessionSignal::Exited);
}

#[test]
fn drill_over_builtin_list_finishes_once() {
    let words = builtin_word_list("kana").unwrap();
    let mut session = Session::new(words, SessionSettings::with_mode(Mode::Drill100)).unwrap();
    let mut finished = Vec::new();

    for round in 0..DRILL_WORD_COUNT as u64 + 3 {
        let spelling = session.current_word().accepts.last().unwrap().clone();
        match type_word(&mut session, &spelling, round * 2_000) {
            KeystrokeOutcome::Finished(stats) => finished.push((round, stats)),
            KeystrokeOutcome::Completed | KeystrokeOutcome::Ignored => {}
            other => panic!("unexpected outcome {other:?}"),
        }
        let _ = session.apply_tick(at(round * 2_000 + 1_500));
    }

    assert_eq!(finished.len(), 1);
    let (round, stats) = &finished[0];
    assert_eq!(*round, DRILL_WORD_COUNT as u64 - 1);
    assert_eq!(stats.words_completed, DRILL_WORD_COUNT);
    assert_eq!(stats.missed_keystrokes, 0);
    assert_eq!(stats.accuracy, 100);
    assert_eq!(stats.total_keystrokes, stats.correct_keystrokes);
    assert!(!stats.history.is_empty());
    assert!(stats
        .history
        .windows(2)
        .all(|w| w[0].elapsed_seconds < w[1].elapsed_seconds));
    assert_eq!(session.phase(), Phase::Finished);
}

#[test]
fn empty_word_list_is_refused() {
    assert_matches!(
        Session::new(Vec::new(), SessionSettings::default()),
        Err(SessionError::EmptyWordList)
    );
}

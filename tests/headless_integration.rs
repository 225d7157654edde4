use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glance::pacing::{
    ManualClock, PacingController, PacingEvent, PlayState, ReadingMode, ReadingSettings,
};
use glance::runtime::{FixedTicker, ReaderEvent, Runner, TestEventSource};
use glance::tokenizer::tokenize;

const TICK_MS: i64 = 50;

fn key(c: char) -> ReaderEvent {
    ReaderEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn controller(
    text: &str,
    settings: ReadingSettings,
) -> (PacingController<ManualClock>, ManualClock) {
    let clock = ManualClock::default();
    let c = PacingController::with_clock(tokenize(text), settings, clock.clone()).unwrap();
    (c, clock)
}

// Headless playback using the internal runtime without a TTY.
// Each tick moves the manual clock forward so timing is deterministic.
#[test]
fn headless_playback_finishes() {
    let settings = ReadingSettings::new(600, ReadingMode::Single, 1).unwrap();
    let (mut controller, clock) = controller("Hello world. Again, yes", settings);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(' ')).unwrap();

    let mut events = Vec::new();
    for _ in 0..100u32 {
        match runner.step() {
            ReaderEvent::Key(key) if key.code == KeyCode::Char(' ') => controller.toggle(),
            ReaderEvent::Key(_) | ReaderEvent::Resize => {}
            ReaderEvent::Tick => {
                clock.advance_ms(TICK_MS);
                if let Some(event) = controller.poll() {
                    events.push(event);
                }
            }
        }
        if controller.is_finished() {
            break;
        }
    }

    assert_eq!(controller.play_state(), PlayState::Finished);
    assert_eq!(
        &events[..3],
        &[
            PacingEvent::PositionChanged(1),
            PacingEvent::PositionChanged(2),
            PacingEvent::PositionChanged(3),
        ]
    );
    match events.last() {
        // 100 + 200 + 150 + 100 ms
        Some(PacingEvent::SessionEnded(summary)) => {
            assert_eq!(summary.words_read, 4);
            assert_eq!(summary.wpm, 600);
            assert!((summary.duration_secs - 0.55).abs() < 1e-9);
        }
        other => panic!("expected session end, got {other:?}"),
    }
}

#[test]
fn headless_seek_cancels_scheduled_advance() {
    let settings = ReadingSettings::new(600, ReadingMode::Single, 1).unwrap();
    let (mut controller, clock) = controller("one two three four five", settings);

    controller.start();
    clock.advance_ms(50);
    assert_eq!(controller.seek(3), Some(PacingEvent::PositionChanged(3)));

    // the deadline armed for "one" has passed, the one for "four" has not
    clock.advance_ms(60);
    assert_eq!(controller.poll(), None);
    assert_eq!(controller.position(), 3);

    clock.advance_ms(40);
    assert_eq!(controller.poll(), Some(PacingEvent::PositionChanged(4)));
}

#[test]
fn headless_chunk_mode_clamps_to_last_token() {
    let settings = ReadingSettings::new(300, ReadingMode::Chunk, 3).unwrap();
    let (mut controller, _clock) = controller("a b c d e f g h i j", settings);

    controller.start();
    let positions: Vec<usize> = (0..3)
        .filter_map(|_| match controller.tick() {
            Some(PacingEvent::PositionChanged(p)) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![3, 6, 9]);
    assert!(!controller.is_finished());

    let last = controller.tick();
    assert!(matches!(last, Some(PacingEvent::SessionEnded(_))));
    assert!(controller.is_finished());
}

#[test]
fn headless_context_view_holds_position() {
    let settings = ReadingSettings::new(600, ReadingMode::Single, 1).unwrap();
    let (mut controller, clock) = controller("one two three", settings);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(' ')).unwrap();
    tx.send(key('c')).unwrap();

    for _ in 0..20u32 {
        match runner.step() {
            ReaderEvent::Key(key) => match key.code {
                KeyCode::Char(' ') => controller.toggle(),
                KeyCode::Char('c') => controller.enter_context(),
                _ => {}
            },
            ReaderEvent::Tick => {
                clock.advance_ms(TICK_MS);
                controller.poll();
            }
            ReaderEvent::Resize => {}
        }
    }

    assert_eq!(controller.play_state(), PlayState::ContextView);
    assert_eq!(controller.position(), 0);
    assert!(!controller.has_pending_tick());

    controller.exit_context();
    assert_eq!(controller.play_state(), PlayState::Playing);
    assert!(controller.has_pending_tick());
}

use std::{io, sync::Arc, thread, time::Duration};

use config::{Action, Binding, Channel, Config, ScrollDir};
use hintmap_engine::{
    Decision, ElementHandle, Engine,
    test_support::{Mocks, chord, grid_targets, tap_key, type_label},
};
use keymode::Mode;
use parking_lot::Mutex;
use vkey::{Chord, Key};

/// Test helper to create an engine over fresh mocks.
fn create_test_engine(cfg: &Config) -> (Engine, Mocks) {
    let mocks = Mocks::new();
    let engine = Engine::new(cfg, mocks.services()).expect("valid config");
    engine.pump();
    (engine, mocks)
}

/// Engine with the default config and `n` scannable targets.
fn engine_with_targets(n: usize) -> (Engine, Mocks) {
    let (engine, mocks) = create_test_engine(&Config::default());
    mocks.scan.set_targets(grid_targets(n));
    (engine, mocks)
}

/// Open a session through the s+d+f chord.
fn open_via_chord(engine: &Engine) {
    chord(engine, &[Key::S, Key::D, Key::F]);
    engine.pump();
}

fn down(engine: &Engine, key: Key) -> Decision {
    engine.handle_key(key, true, Channel::Hook)
}

fn up(engine: &Engine, key: Key) -> Decision {
    engine.handle_key(key, false, Channel::Hook)
}

#[test]
fn test_chord_fires_once_per_full_press() {
    let cfg = Config {
        shortcuts: vec![Binding::new(
            Chord::parse("a+b").expect("chord"),
            Action::Notify("ab".into()),
        )],
        gestures: vec![],
        ..Config::default()
    };
    let (engine, mocks) = create_test_engine(&cfg);
    let fired = || {
        engine.pump();
        mocks.actions.performed().len()
    };

    down(&engine, Key::A);
    down(&engine, Key::B);
    assert_eq!(fired(), 1);

    // auto-repeat, then release and re-press B while A stays down
    down(&engine, Key::B);
    up(&engine, Key::B);
    down(&engine, Key::B);
    assert_eq!(fired(), 1);

    up(&engine, Key::A);
    up(&engine, Key::B);
    down(&engine, Key::A);
    down(&engine, Key::B);
    assert_eq!(fired(), 2);
    assert_eq!(mocks.actions.performed()[1], Action::Notify("ab".into()));
}

#[test]
fn test_command_mode_consumes_everything_but_toggle_modifiers() {
    let cfg = Config {
        shortcuts: vec![],
        gestures: vec![],
        ..Config::default()
    };
    let (engine, _mocks) = create_test_engine(&cfg);
    assert_eq!(engine.mode(), Mode::Command);
    for key in Key::ALL {
        if cfg.toggle_modifiers.contains(key) {
            continue;
        }
        assert_eq!(tap_key(&engine, *key), Decision::Consumed, "{:?}", key);
    }
    assert_eq!(engine.mode(), Mode::Command);
    assert_eq!(tap_key(&engine, Key::Control), Decision::PassThrough);
    assert_eq!(engine.mode(), Mode::Insert);
}

#[test]
fn test_insert_mode_passes_keys_and_skips_shortcuts() {
    let cfg = Config {
        initial_mode: Mode::Insert,
        ..Config::default()
    };
    let (engine, mocks) = create_test_engine(&cfg);
    assert!(mocks.cursor.calls().is_empty());
    assert_eq!(down(&engine, Key::G), Decision::PassThrough);
    assert_eq!(down(&engine, Key::H), Decision::PassThrough);
    engine.pump();
    assert!(mocks.actions.performed().is_empty());
}

#[test]
fn test_ctrl_tap_toggles_mode_and_cursor() {
    let (engine, mocks) = create_test_engine(&Config::default());
    assert_eq!(mocks.cursor.calls(), vec!["show"]);

    assert_eq!(tap_key(&engine, Key::LeftControl), Decision::PassThrough);
    engine.pump();
    assert_eq!(engine.mode(), Mode::Insert);
    assert_eq!(mocks.cursor.last(), Some("hide"));

    // ctrl+c is a copy, not a toggle
    down(&engine, Key::LeftControl);
    assert_eq!(tap_key(&engine, Key::C), Decision::PassThrough);
    up(&engine, Key::LeftControl);
    assert_eq!(engine.mode(), Mode::Insert);

    tap_key(&engine, Key::RightControl);
    engine.pump();
    assert_eq!(engine.mode(), Mode::Command);
    assert_eq!(mocks.cursor.calls(), vec!["show", "hide", "show"]);
}

#[test]
fn test_modifier_auto_repeat_keeps_tap() {
    let (engine, _mocks) = create_test_engine(&Config::default());
    down(&engine, Key::LeftControl);
    down(&engine, Key::LeftControl);
    down(&engine, Key::LeftControl);
    up(&engine, Key::LeftControl);
    assert_eq!(engine.mode(), Mode::Insert);
}

#[test]
fn test_non_authoritative_channel_is_ignored() {
    let (engine, mocks) = engine_with_targets(3);
    for k in [Key::S, Key::D, Key::F] {
        assert_eq!(
            engine.handle_key(k, true, Channel::RawInput),
            Decision::Ignored
        );
    }
    assert!(engine.held_keys().is_empty());
    engine.pump();
    assert_eq!(mocks.scan.scan_count(), 0);
    assert_eq!(
        engine.handle_vk(0x41, true, Channel::RawInput),
        Decision::Ignored
    );

    let cfg = Config {
        authoritative_channel: Channel::RawInput,
        ..Config::default()
    };
    let (raw, _m) = create_test_engine(&cfg);
    assert_eq!(down(&raw, Key::A), Decision::Ignored);
    assert_eq!(
        raw.handle_key(Key::A, true, Channel::RawInput),
        Decision::Consumed
    );
}

#[test]
fn test_unknown_virtual_keys_follow_mode() {
    let (engine, _mocks) = create_test_engine(&Config::default());
    // VK_F24 is outside the key table
    assert_eq!(engine.handle_vk(0x87, true, Channel::Hook), Decision::Consumed);
    tap_key(&engine, Key::LeftControl);
    assert_eq!(
        engine.handle_vk(0x87, true, Channel::Hook),
        Decision::PassThrough
    );
    assert_eq!(
        engine.handle_vk(Key::A.code(), true, Channel::Hook),
        Decision::PassThrough
    );
}

#[test]
fn test_hint_chord_opens_session() {
    let (engine, mocks) = engine_with_targets(10);
    open_via_chord(&engine);
    assert_eq!(engine.mode(), Mode::LabelCapture);
    assert!(engine.session_active());
    assert_eq!(mocks.scan.scan_count(), 1);
    assert_eq!(mocks.overlay.open_count(), 1);
    let boxes = mocks.overlay.last_boxes();
    let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["E", "M", "C", "G", "H", "W", "L", "P", "AA", "AS"]
    );
    assert!(engine.held_keys().is_empty());
}

#[test]
fn test_full_label_activates_exactly_once() {
    let (engine, mocks) = engine_with_targets(10);
    open_via_chord(&engine);

    type_label(&engine, "as");
    assert_eq!(engine.mode(), Mode::Command);
    assert_eq!(engine.typed(), "");
    assert!(!engine.session_active());

    engine.pump();
    assert_eq!(mocks.activator.calls(), vec![ElementHandle(9)]);
    assert!(!mocks.overlay.is_visible());

    // further letters are ordinary command-mode keys
    type_label(&engine, "as");
    engine.pump();
    assert_eq!(mocks.activator.calls().len(), 1);
}

#[test]
fn test_invalid_sequence_clears_buffer_and_stays_in_capture() {
    let (engine, mocks) = engine_with_targets(10);
    open_via_chord(&engine);

    assert_eq!(tap_key(&engine, Key::Z), Decision::Consumed);
    assert_eq!(engine.typed(), "Z");
    tap_key(&engine, Key::Z);
    assert_eq!(engine.typed(), "ZZ");
    tap_key(&engine, Key::Z);
    assert_eq!(engine.typed(), "");
    assert_eq!(engine.mode(), Mode::LabelCapture);

    // a valid label still works afterwards
    type_label(&engine, "e");
    engine.pump();
    assert_eq!(mocks.activator.calls(), vec![ElementHandle(0)]);
}

#[test]
fn test_cancel_key_closes_without_activation() {
    let (engine, mocks) = engine_with_targets(3);
    open_via_chord(&engine);
    type_label(&engine, "z");
    assert_eq!(tap_key(&engine, Key::Escape), Decision::Consumed);
    assert_eq!(engine.mode(), Mode::Command);
    assert_eq!(engine.typed(), "");
    engine.pump();
    assert!(mocks.activator.calls().is_empty());
    assert_eq!(mocks.overlay.close_count(), 1);
}

#[test]
fn test_open_while_open_is_noop() {
    let (engine, mocks) = engine_with_targets(3);
    engine.open_session();
    engine.open_session();
    engine.perform(&Action::ShowHints);
    assert_eq!(mocks.scan.scan_count(), 1);
    assert_eq!(mocks.overlay.open_count(), 1);
    assert_eq!(engine.mode(), Mode::LabelCapture);
}

#[test]
fn test_empty_scan_is_silent() {
    let (engine, mocks) = engine_with_targets(0);
    open_via_chord(&engine);
    assert_eq!(mocks.scan.scan_count(), 1);
    assert_eq!(mocks.overlay.open_count(), 0);
    assert_eq!(engine.mode(), Mode::Command);
    assert!(engine.overlay_view().is_none());
}

#[test]
fn test_open_aborts_in_insert_mode() {
    let cfg = Config {
        initial_mode: Mode::Insert,
        ..Config::default()
    };
    let (engine, mocks) = create_test_engine(&cfg);
    mocks.scan.set_targets(grid_targets(3));
    engine.open_session();
    assert_eq!(engine.mode(), Mode::Insert);
    assert!(!engine.session_active());
    assert!(!mocks.overlay.is_visible());
}

#[test]
fn test_external_close_is_idempotent() {
    let (engine, mocks) = engine_with_targets(3);
    open_via_chord(&engine);
    type_label(&engine, "a");
    engine.close_session();
    engine.close_session();
    assert_eq!(engine.mode(), Mode::Command);
    assert_eq!(engine.typed(), "");
    assert_eq!(mocks.overlay.close_count(), 1);
    assert!(mocks.activator.calls().is_empty());
}

#[test]
fn test_activation_failure_still_closes() {
    let (engine, mocks) = engine_with_targets(3);
    mocks.activator.set_fail(true);
    open_via_chord(&engine);
    type_label(&engine, "m");
    engine.pump();
    assert_eq!(mocks.activator.calls(), vec![ElementHandle(1)]);
    assert_eq!(engine.mode(), Mode::Command);
    assert!(!mocks.overlay.is_visible());
}

#[test]
fn test_keys_held_at_open_do_not_type() {
    let (engine, mocks) = engine_with_targets(20);
    down(&engine, Key::S);
    down(&engine, Key::D);
    down(&engine, Key::F);
    engine.pump();
    assert_eq!(engine.mode(), Mode::LabelCapture);

    // OS repeats of the still-held chord keys
    assert_eq!(down(&engine, Key::S), Decision::Consumed);
    assert_eq!(down(&engine, Key::D), Decision::Consumed);
    assert_eq!(engine.typed(), "");
    up(&engine, Key::S);
    up(&engine, Key::D);
    up(&engine, Key::F);

    // 10th label is AS, 11th is AD
    type_label(&engine, "ad");
    engine.pump();
    assert_eq!(mocks.activator.calls(), vec![ElementHandle(10)]);
}

#[test]
fn test_ctrl_held_through_match_does_not_toggle() {
    let (engine, _mocks) = engine_with_targets(3);
    open_via_chord(&engine);
    down(&engine, Key::LeftControl);
    tap_key(&engine, Key::E);
    assert_eq!(engine.mode(), Mode::Command);
    up(&engine, Key::LeftControl);
    assert_eq!(engine.mode(), Mode::Command);
}

#[test]
fn test_ctrl_held_across_open_is_never_swallowed() {
    let (engine, _mocks) = engine_with_targets(3);
    assert_eq!(down(&engine, Key::LeftControl), Decision::PassThrough);
    chord(&engine, &[Key::S, Key::D, Key::F]);
    engine.pump();
    assert_eq!(engine.mode(), Mode::LabelCapture);

    assert_eq!(down(&engine, Key::LeftControl), Decision::PassThrough);
    assert_eq!(up(&engine, Key::LeftControl), Decision::PassThrough);
    assert_eq!(engine.mode(), Mode::LabelCapture);
}

#[test]
fn test_keys_held_at_close_do_not_complete_chords() {
    let (engine, mocks) = engine_with_targets(3);
    open_via_chord(&engine);
    assert_eq!(down(&engine, Key::G), Decision::Consumed);
    tap_key(&engine, Key::Escape);
    assert_eq!(engine.mode(), Mode::Command);
    assert!(engine.held_keys().is_empty());

    // G was pressed inside the session, so G+H is not a fresh chord
    down(&engine, Key::H);
    up(&engine, Key::H);
    up(&engine, Key::G);
    engine.pump();
    assert!(mocks.actions.performed().is_empty());

    chord(&engine, &[Key::G, Key::H]);
    engine.pump();
    assert_eq!(mocks.actions.performed(), vec![Action::SwitchWindow]);
}

#[test]
fn test_concurrent_opens_install_one_session() {
    let (engine, mocks) = engine_with_targets(3);
    let release = mocks.scan.hold_scans();
    let opener = {
        let e = engine.clone();
        thread::spawn(move || e.open_session())
    };
    while mocks.scan.scan_count() == 0 {
        thread::yield_now();
    }

    // the first open is still scanning
    engine.open_session();
    engine.perform(&Action::ShowHints);
    assert_eq!(mocks.scan.scan_count(), 1);

    release.send_timeout((), Duration::from_secs(2)).ok();
    opener.join().unwrap();
    assert_eq!(engine.mode(), Mode::LabelCapture);
    assert!(engine.session_active());
    assert!(mocks.overlay.is_visible());
    assert_eq!(mocks.overlay.open_count(), 1);
    assert_eq!(mocks.overlay.close_count(), 0);

    // a finished open no longer blocks the next one
    drop(release);
    engine.close_session();
    engine.open_session();
    assert!(engine.session_active());
}

#[test]
fn test_gestures_repeat_and_pause_during_session() {
    let (engine, mocks) = engine_with_targets(3);
    down(&engine, Key::D);
    down(&engine, Key::F);
    down(&engine, Key::F);
    engine.pump();
    assert_eq!(
        mocks.actions.performed(),
        vec![
            Action::Scroll(ScrollDir::Down),
            Action::Scroll(ScrollDir::Down)
        ]
    );
    up(&engine, Key::D);
    up(&engine, Key::F);

    engine.open_session();
    down(&engine, Key::J);
    down(&engine, Key::K);
    engine.pump();
    assert_eq!(mocks.actions.performed().len(), 2);
}

#[test]
fn test_shortcut_actions_reach_sink() {
    let (engine, mocks) = create_test_engine(&Config::default());
    chord(&engine, &[Key::Q, Key::W, Key::E]);
    chord(&engine, &[Key::G, Key::H]);
    engine.pump();
    assert_eq!(
        mocks.actions.performed(),
        vec![
            Action::Notify("QWE shortcut triggered!".into()),
            Action::SwitchWindow
        ]
    );
}

#[test]
fn test_overlay_view_tracks_typing() {
    let (engine, _mocks) = engine_with_targets(12);
    open_via_chord(&engine);
    type_label(&engine, "a");
    let view = engine.overlay_view().expect("session open");
    assert_eq!(view.boxes.len(), 12);
    assert_eq!(view.typed, "A");
    let first = &view.boxes[0];
    assert_eq!(first.origin.x, first.target.rect.left + 8);
    assert_eq!(first.origin.y, first.target.rect.top - 6);
}

/// Collects formatted log output.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_label_shortage_labels_prefix_and_warns() {
    let cfg = Config {
        singles: "E".into(),
        doubles: "A".into(),
        ..Config::default()
    };
    let (engine, mocks) = create_test_engine(&cfg);
    mocks.scan.set_targets(grid_targets(7));

    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || engine.open_session());

    let boxes = mocks.overlay.last_boxes();
    assert_eq!(boxes.len(), 5);
    assert_eq!(boxes[4].target.handle, ElementHandle(4));
    let logs = String::from_utf8(capture.0.lock().clone()).unwrap();
    assert!(logs.contains("label_shortage"), "{}", logs);
    assert!(logs.contains("requested=7"), "{}", logs);
}

#[test]
fn test_reload_replaces_shortcuts_and_closes_session() {
    let (engine, mocks) = engine_with_targets(3);
    open_via_chord(&engine);
    let cfg = Config {
        shortcuts: vec![Binding::new(
            Chord::parse("z+x").expect("chord"),
            Action::ShowHints,
        )],
        ..Config::default()
    };
    engine.reload(&cfg).unwrap();
    assert_eq!(engine.mode(), Mode::Command);
    assert!(!mocks.overlay.is_visible());

    open_via_chord(&engine);
    assert!(!engine.session_active());
    chord(&engine, &[Key::Z, Key::X]);
    engine.pump();
    assert!(engine.session_active());

    let bad = Config {
        doubles: "EA".into(),
        ..Config::default()
    };
    assert!(engine.reload(&bad).is_err());
}

#[test]
fn test_callback_and_polling_threads_share_engine() {
    let (engine, mocks) = engine_with_targets(3);
    let hook = {
        let e = engine.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                chord(&e, &[Key::G, Key::H]);
            }
        })
    };
    let poller = {
        let e = engine.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                e.pump();
            }
        })
    };
    hook.join().unwrap();
    poller.join().unwrap();
    engine.pump();
    assert_eq!(mocks.actions.performed().len(), 200);
    assert_eq!(engine.mode(), Mode::Command);
    assert!(engine.held_keys().is_empty());
}

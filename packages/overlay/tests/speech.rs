//! Read-aloud and voice commands through the Action API.

mod common;

use a11y_overlay::{
    Action, FeatureTier, ListeningStatus, OverlayConfig, OverlayError, PanelState, PlatformEvent,
    READ_BUDGET_CHARS, StaticText, Theme, UnsupportedRecognizer, UnsupportedSynthesizer,
    UtteranceState, VoiceName,
};
use common::{Fixture, RecordingSynth, init_tracing, shared};

fn page(nodes: &[&str]) -> StaticText {
    StaticText {
        selection: None,
        nodes: nodes.iter().map(|n| (*n).to_string()).collect(),
    }
}

/* ───────────────────────────── read-aloud ───────────────────────────── */

#[test]
fn second_read_replaces_the_first() {
    init_tracing();
    let fx = Fixture {
        text: shared(page(&["Page A"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();

    overlay.read_page().unwrap();
    fx.text.borrow_mut().selection = Some("  Selection B ".into());
    overlay.read_selection().unwrap();

    let synth = fx.synth.borrow();
    assert!(!synth.overlapped);
    assert_eq!(synth.audible_text(), Some("Selection B"));
    assert_eq!(synth.spoken.len(), 2);
    assert_eq!(fx.last_announcement().as_deref(), Some("Reading selection"));
}

#[test]
fn page_text_is_joined_and_capped() {
    let long = "x".repeat(READ_BUDGET_CHARS);
    let fx = Fixture {
        text: shared(page(&["Hello", "  ", "world", &long])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();
    overlay.read_page().unwrap();

    let synth = fx.synth.borrow();
    let text = synth.audible_text().unwrap();
    assert!(text.starts_with("Hello world x"));
    assert_eq!(text.chars().count(), READ_BUDGET_CHARS);
}

#[test]
fn empty_selection_is_announced_not_spoken() {
    let fx = Fixture {
        text: shared(StaticText {
            selection: Some("   ".into()),
            nodes: Vec::new(),
        }),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();
    overlay.read_selection().unwrap();
    assert!(fx.synth.borrow().spoken.is_empty());
    assert_eq!(fx.last_announcement().as_deref(), Some("Select text first"));
}

#[test]
fn pause_resume_and_stop() {
    let fx = Fixture {
        text: shared(page(&["Some text"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();

    overlay.pause_resume().unwrap();
    assert_eq!(overlay.utterance_state(), UtteranceState::Idle);

    overlay.read_page().unwrap();
    assert_eq!(overlay.utterance_state(), UtteranceState::Speaking);

    overlay.pause_resume().unwrap();
    assert_eq!(overlay.utterance_state(), UtteranceState::Paused);
    assert!(fx.synth.borrow().paused);
    assert_eq!(fx.last_announcement().as_deref(), Some("Paused"));

    overlay.pause_resume().unwrap();
    assert_eq!(overlay.utterance_state(), UtteranceState::Speaking);
    assert_eq!(fx.last_announcement().as_deref(), Some("Resumed"));

    overlay.stop_read().unwrap();
    assert_eq!(overlay.utterance_state(), UtteranceState::Idle);
    assert_eq!(fx.synth.borrow().audible, None);
    assert_eq!(fx.last_announcement().as_deref(), Some("Stopped"));
}

#[test]
fn late_end_of_canceled_utterance_is_ignored() {
    let fx = Fixture {
        text: shared(page(&["First"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();

    overlay.read_page().unwrap();
    let first = fx.synth.borrow().spoken[0].0;
    overlay.read_page().unwrap();
    let second = fx.synth.borrow().spoken[1].0;

    overlay.handle_event(PlatformEvent::UtteranceEnd(first));
    assert_eq!(overlay.utterance_state(), UtteranceState::Speaking);

    overlay.handle_event(PlatformEvent::UtteranceEnd(second));
    assert_eq!(overlay.utterance_state(), UtteranceState::Idle);
}

#[test]
fn configured_voice_is_used_or_deferred() {
    let config = OverlayConfig {
        read_voice: Some(VoiceName::new("Samantha")),
        ..OverlayConfig::default()
    };

    let fx = Fixture {
        synth: shared(RecordingSynth::with_voices(&["Alex", "Samantha"])),
        text: shared(page(&["Hi"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount_with(config.clone());
    overlay.read_page().unwrap();
    assert_eq!(fx.synth.borrow().spoken[0].2.as_deref(), Some("Samantha"));
    overlay.teardown();

    // voice list not populated yet: speak now, assign once it arrives
    let fx = Fixture {
        text: shared(page(&["Hi"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount_with(config);
    overlay.read_page().unwrap();
    assert_eq!(fx.synth.borrow().spoken[0].2, None);

    let audible = fx.synth.borrow().audible;
    *fx.synth.borrow_mut() = RecordingSynth {
        audible,
        ..RecordingSynth::with_voices(&["Samantha"])
    };
    overlay.handle_voices_changed();
    overlay.handle_voices_changed();
    assert_eq!(fx.synth.borrow().assigned, vec!["Samantha".to_string()]);
}

#[test]
fn missing_synthesis_posts_a_notice() {
    let fx = Fixture {
        text: shared(page(&["Hi"])),
        ..Fixture::default()
    };
    let mut overlay = fx.builder().synthesizer(UnsupportedSynthesizer).mount().unwrap();

    assert!(overlay.read_page().unwrap_err().is_unsupported());
    assert_eq!(overlay.utterance_state(), UtteranceState::Idle);
    assert_eq!(
        fx.announcer.borrow().notices,
        vec!["Speech synthesis not supported in this browser.".to_string()]
    );
}

/* ───────────────────────────── voice commands ───────────────────────────── */

#[test]
fn transcript_dispatches_exactly_once() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    let session = overlay.start_voice().unwrap();
    assert_eq!(overlay.listening_status(), ListeningStatus::Listening);
    assert_eq!(overlay.voice_indicator(), "Listening…");

    let action = overlay.handle_transcript(session, "Increase font please", true);
    assert_eq!(action, Some(Action::FontPlus));
    assert_eq!(overlay.preferences().font_scale.value(), 1.1);
    assert_eq!(overlay.voice_indicator(), "Heard: increase font please");

    let saved = *overlay.preferences();
    assert_eq!(overlay.handle_transcript(session, "what a lovely day", true), None);
    assert_eq!(*overlay.preferences(), saved);
}

#[test]
fn interim_and_stale_results_do_nothing() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    let first = overlay.start_voice().unwrap();
    let second = overlay.start_voice().unwrap();

    assert_eq!(overlay.handle_transcript(second, "dark mode", false), None);
    assert_eq!(overlay.handle_transcript(first, "dark mode", true), None);
    assert_eq!(overlay.preferences().theme, Theme::Default);

    overlay.handle_event(PlatformEvent::Transcript {
        session: second,
        transcript: "dark mode".into(),
        is_final: true,
    });
    assert_eq!(overlay.preferences().theme, Theme::Dark);
}

#[test]
fn second_start_stops_the_first() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    overlay.start_voice().unwrap();
    overlay.start_voice().unwrap();

    let recognizer = fx.recognizer.borrow();
    assert!(!recognizer.overlapped);
    assert_eq!(recognizer.started.len(), 2);
    assert_eq!(recognizer.stops, 1);
    assert!(recognizer.started[0].1.continuous);
    assert!(!recognizer.started[0].1.interim_results);
}

#[test]
fn platform_end_returns_to_idle_without_restart() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    let first = overlay.start_voice().unwrap();
    let second = overlay.start_voice().unwrap();

    overlay.handle_recognition_end(first);
    assert_eq!(overlay.listening_status(), ListeningStatus::Listening);

    overlay.handle_event(PlatformEvent::RecognitionEnd(second));
    assert_eq!(overlay.listening_status(), ListeningStatus::Idle);
    assert_eq!(overlay.voice_indicator(), "Idle");
    assert_eq!(fx.recognizer.borrow().started.len(), 2);
}

#[test]
fn toggle_voice_and_announcements() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    assert_eq!(overlay.toggle_voice(), Ok(ListeningStatus::Listening));
    assert_eq!(fx.last_announcement().as_deref(), Some("Listening"));
    assert_eq!(overlay.toggle_voice(), Ok(ListeningStatus::Idle));
    assert_eq!(fx.last_announcement().as_deref(), Some("Voice commands off"));
    assert!(!overlay.stop_voice());
}

#[test]
fn voice_can_drive_the_panel() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();
    let session = overlay.start_voice().unwrap();
    overlay.handle_transcript(session, "open the menu", true);
    assert_eq!(overlay.panel_state(), PanelState::Open);
    overlay.handle_transcript(session, "close the panel", true);
    assert_eq!(overlay.panel_state(), PanelState::Closed);
}

#[test]
fn advanced_vocabulary_only_in_aaa() {
    let fx = Fixture::default();
    let mut overlay = fx.mount_with(OverlayConfig {
        tier: FeatureTier::AAA,
        ..OverlayConfig::default()
    });
    let session = overlay.start_voice().unwrap();
    assert_eq!(
        overlay.handle_transcript(session, "turn on focus highlight", true),
        Some(Action::ToggleFocusHighlight(Some(true)))
    );
    assert!(overlay.preferences().focus_highlight);
    assert_eq!(overlay.preferences().theme, Theme::Default);
    overlay.teardown();

    let mut overlay = fx.mount();
    let session = overlay.start_voice().unwrap();
    assert_eq!(overlay.handle_transcript(session, "enable dyslexia font", true), None);
}

#[test]
fn missing_recognition_posts_a_notice() {
    let fx = Fixture::default();
    let mut overlay = fx.builder().recognizer(UnsupportedRecognizer).mount().unwrap();
    assert_eq!(
        overlay.start_voice().unwrap_err(),
        OverlayError::Unsupported(a11y_overlay::Capability::SpeechRecognition)
    );
    assert_eq!(overlay.listening_status(), ListeningStatus::Idle);
    assert_eq!(
        fx.announcer.borrow().notices,
        vec!["Voice recognition not supported on this device.".to_string()]
    );
}

#[test]
fn teardown_silences_speech() {
    let fx = Fixture {
        text: shared(page(&["Hi"])),
        ..Fixture::default()
    };
    let mut overlay = fx.mount();
    overlay.read_page().unwrap();
    overlay.start_voice().unwrap();
    overlay.teardown();
    assert_eq!(fx.synth.borrow().audible, None);
    assert_eq!(fx.recognizer.borrow().active, None);
}

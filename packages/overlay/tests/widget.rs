//! Panel buttons and the rows shown per tier.

mod common;

use a11y_overlay::widget::{Control, layout};
use a11y_overlay::{FeatureTier, ListeningStatus, OverlayConfig, OverlayError};
use common::{Fixture, init_tracing};

#[test]
fn buttons_run_the_action_api() {
    init_tracing();
    let fx = Fixture::default();
    let mut overlay = fx.mount();

    overlay.activate(Control::FontPlus).unwrap();
    assert_eq!(overlay.scale_label(), "110%");

    overlay.activate(Control::Dyslexia).unwrap();
    assert!(overlay.preferences().dyslexia_font);
    let mirrored = fx.announcer.borrow().last_record.expect("record mirrored");
    assert_eq!(Control::Dyslexia.pressed(&mirrored), Some(true));
}

#[test]
fn voice_button_starts_and_stops_recognition() {
    let fx = Fixture::default();
    let mut overlay = fx.mount();

    overlay.activate(Control::VoiceToggle).unwrap();
    assert_eq!(overlay.listening_status(), ListeningStatus::Listening);
    assert!(fx.recognizer.borrow().active.is_some());

    overlay.activate(Control::VoiceToggle).unwrap();
    assert_eq!(overlay.listening_status(), ListeningStatus::Idle);
    assert_eq!(fx.recognizer.borrow().active, None);
}

#[test]
fn hidden_controls_stay_gated() {
    let fx = Fixture::default();
    let mut overlay = fx.mount_with(OverlayConfig {
        tier: FeatureTier::A,
        ..OverlayConfig::default()
    });
    let shown: Vec<Control> = layout(overlay.features())
        .into_iter()
        .flat_map(|row| row.controls)
        .collect();
    assert!(!shown.contains(&Control::VoiceToggle));

    assert!(matches!(
        overlay.activate(Control::VoiceToggle),
        Err(OverlayError::FeatureDisabled(_))
    ));
    assert!(matches!(
        overlay.activate(Control::StopRead),
        Err(OverlayError::FeatureDisabled(_))
    ));
    assert!(fx.recognizer.borrow().started.is_empty());
}

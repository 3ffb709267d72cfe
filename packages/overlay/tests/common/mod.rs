//! In-memory platform fakes shared by the integration tests.
#![allow(dead_code)]

use a11y_overlay::prelude::*;
use a11y_overlay::{
    MemoryAnnouncer, MemoryDocument, MemoryStore, RecognitionConfig, SessionId, StaticText,
    UtteranceId, VoiceInfo,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/* ───────────────────────────── panel host ───────────────────────────── */

pub const TRIGGER: u32 = 1;
pub const PANEL: u32 = 2;
/// A page control outside the overlay.
pub const PAGE_BUTTON: u32 = 10;

/// Nodes are plain ids; the panel's controls are 20, 21, 22.
#[derive(Debug)]
pub struct FakeHost {
    pub active: Option<u32>,
    pub focusables: Vec<u32>,
    pub attached: BTreeSet<u32>,
    pub visible: bool,
    pub expanded: bool,
    pub detached: bool,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::with_controls(vec![20, 21, 22])
    }
}

impl FakeHost {
    pub fn with_controls(focusables: Vec<u32>) -> Self {
        let mut attached: BTreeSet<u32> = [TRIGGER, PANEL, PAGE_BUTTON].into_iter().collect();
        attached.extend(focusables.iter().copied());
        Self {
            active: Some(TRIGGER),
            focusables,
            attached,
            visible: true,
            expanded: true,
            detached: false,
        }
    }
}

impl FocusHost for FakeHost {
    type Node = u32;

    fn active_element(&self) -> Option<u32> {
        self.active
    }

    fn focus(&mut self, node: &u32) {
        self.active = Some(*node);
    }

    fn is_attached(&self, node: &u32) -> bool {
        self.attached.contains(node)
    }

    fn panel(&self) -> u32 {
        PANEL
    }

    fn panel_focusables(&self) -> Vec<u32> {
        self.focusables.clone()
    }

    fn is_within_overlay(&self, node: &u32) -> bool {
        *node == TRIGGER || *node == PANEL || self.focusables.contains(node)
    }

    fn set_panel_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_trigger_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    fn detach(&mut self) {
        self.detached = true;
        self.attached.remove(&TRIGGER);
        self.attached.remove(&PANEL);
        for node in &self.focusables {
            self.attached.remove(node);
        }
    }
}

/* ───────────────────────────── speech ───────────────────────────── */

/// Synthesizer that tracks what would be audible.
#[derive(Debug, Default)]
pub struct RecordingSynth {
    pub voices: Vec<VoiceInfo>,
    pub spoken: Vec<(UtteranceId, String, Option<String>)>,
    pub audible: Option<UtteranceId>,
    /// Set when `speak` ran while another utterance was still audible.
    pub overlapped: bool,
    pub paused: bool,
    pub cancels: usize,
    pub assigned: Vec<String>,
}

impl RecordingSynth {
    pub fn with_voices(names: &[&str]) -> Self {
        Self {
            voices: names
                .iter()
                .map(|name| VoiceInfo {
                    name: (*name).to_string(),
                    lang: "en-US".into(),
                    default: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn audible_text(&self) -> Option<&str> {
        let id = self.audible?;
        self.spoken
            .iter()
            .find(|(spoken, _, _)| *spoken == id)
            .map(|(_, text, _)| text.as_str())
    }
}

impl SpeechSynthesizer for RecordingSynth {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn speak(&mut self, id: UtteranceId, text: &str, voice: Option<&VoiceInfo>) -> Result<()> {
        if self.audible.is_some() {
            self.overlapped = true;
        }
        self.spoken
            .push((id, text.to_string(), voice.map(|v| v.name.clone())));
        self.audible = Some(id);
        self.paused = false;
        Ok(())
    }

    fn assign_voice(&mut self, voice: &VoiceInfo) {
        self.assigned.push(voice.name.clone());
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.audible = None;
        self.paused = false;
    }
}

/// Recognizer that tracks sessions.
#[derive(Debug, Default)]
pub struct RecordingRecognizer {
    pub started: Vec<(SessionId, RecognitionConfig)>,
    pub active: Option<SessionId>,
    /// Set when `start` ran while another session was still active.
    pub overlapped: bool,
    pub stops: usize,
}

impl SpeechRecognizer for RecordingRecognizer {
    fn start(&mut self, session: SessionId, config: &RecognitionConfig) -> Result<()> {
        if self.active.is_some() {
            self.overlapped = true;
        }
        self.started.push((session, config.clone()));
        self.active = Some(session);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.active = None;
    }
}

/* ───────────────────────────── fixture ───────────────────────────── */

/// Every platform surface, shared so tests can inspect them after mount.
pub struct Fixture {
    pub document: Shared<MemoryDocument>,
    pub host: Shared<FakeHost>,
    pub store: Shared<MemoryStore>,
    pub synth: Shared<RecordingSynth>,
    pub recognizer: Shared<RecordingRecognizer>,
    pub text: Shared<StaticText>,
    pub announcer: Shared<MemoryAnnouncer>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            document: shared(MemoryDocument::new()),
            host: shared(FakeHost::default()),
            store: shared(MemoryStore::new()),
            synth: shared(RecordingSynth::default()),
            recognizer: shared(RecordingRecognizer::default()),
            text: shared(StaticText::default()),
            announcer: shared(MemoryAnnouncer::default()),
        }
    }
}

impl Fixture {
    pub fn builder(&self) -> OverlayBuilder<Shared<FakeHost>> {
        Overlay::builder(self.document.clone(), self.host.clone())
            .store(self.store.clone())
            .synthesizer(self.synth.clone())
            .recognizer(self.recognizer.clone())
            .text_source(self.text.clone())
            .announcer(self.announcer.clone())
    }

    pub fn mount(&self) -> Overlay<Shared<FakeHost>> {
        self.builder().mount().expect("mount")
    }

    pub fn mount_with(&self, config: OverlayConfig) -> Overlay<Shared<FakeHost>> {
        self.builder().config(config).mount().expect("mount")
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.document.borrow().attributes.get(name).cloned()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.document.borrow().properties.get(name).cloned()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.document.borrow().classes.contains(name)
    }

    pub fn last_announcement(&self) -> Option<String> {
        self.announcer.borrow().last().map(str::to_string)
    }
}

//! Read-aloud over an injected synthesis capability.
//!
//! At most one utterance is ever audible: every `read` cancels whatever is
//! speaking or paused before starting.

use crate::Result;
use a11y_overlay_domain::{Capability, OverlayError, UtteranceState, VoiceName};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// A platform voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub default: bool,
}

/// Identifies one utterance so late `end` events from a canceled utterance
/// are not mistaken for the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

/// Speech synthesis capability.
pub trait SpeechSynthesizer {
    /// Voices known so far; may be empty until the platform populates it.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Start speaking `text`. The platform reports completion through
    /// [`SpeechReader::on_utterance_end`] with the same `id`.
    fn speak(&mut self, id: UtteranceId, text: &str, voice: Option<&VoiceInfo>) -> Result<()>;

    /// Set the voice of the utterance started by the last `speak`.
    fn assign_voice(&mut self, voice: &VoiceInfo);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Drop the current utterance and anything queued.
    fn cancel(&mut self);
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<T> {
    fn voices(&self) -> Vec<VoiceInfo> {
        (**self).voices()
    }
    fn speak(&mut self, id: UtteranceId, text: &str, voice: Option<&VoiceInfo>) -> Result<()> {
        (**self).speak(id, text, voice)
    }
    fn assign_voice(&mut self, voice: &VoiceInfo) {
        (**self).assign_voice(voice)
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn resume(&mut self) {
        (**self).resume()
    }
    fn cancel(&mut self) {
        (**self).cancel()
    }
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Rc<RefCell<T>> {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.borrow().voices()
    }
    fn speak(&mut self, id: UtteranceId, text: &str, voice: Option<&VoiceInfo>) -> Result<()> {
        self.borrow_mut().speak(id, text, voice)
    }
    fn assign_voice(&mut self, voice: &VoiceInfo) {
        self.borrow_mut().assign_voice(voice)
    }
    fn pause(&mut self) {
        self.borrow_mut().pause()
    }
    fn resume(&mut self) {
        self.borrow_mut().resume()
    }
    fn cancel(&mut self) {
        self.borrow_mut().cancel()
    }
}

/// Null synthesizer for platforms without speech output.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSynthesizer;

impl SpeechSynthesizer for UnsupportedSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }
    fn speak(&mut self, _id: UtteranceId, _text: &str, _voice: Option<&VoiceInfo>) -> Result<()> {
        Err(OverlayError::Unsupported(Capability::SpeechSynthesis))
    }
    fn assign_voice(&mut self, _voice: &VoiceInfo) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn cancel(&mut self) {}
}

/// IDLE / SPEAKING / PAUSED state machine over a synthesizer.
pub struct SpeechReader<S> {
    synth: S,
    state: UtteranceState,
    current: Option<UtteranceId>,
    next_id: u64,
    pending_voice: Option<VoiceName>,
}

impl<S: SpeechSynthesizer> SpeechReader<S> {
    pub fn new(synth: S) -> Self {
        Self {
            synth,
            state: UtteranceState::Idle,
            current: None,
            next_id: 1,
            pending_voice: None,
        }
    }

    pub fn state(&self) -> UtteranceState {
        self.state
    }

    pub fn current(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Voice still waiting for the platform voice list.
    pub fn pending_voice(&self) -> Option<&VoiceName> {
        self.pending_voice.as_ref()
    }

    fn find_voice(&self, name: &VoiceName) -> Option<VoiceInfo> {
        self.synth.voices().into_iter().find(|v| v.name == name.name())
    }

    /// Cancel the current utterance and speak `text`.
    ///
    /// A voice that is not enumerable yet is assigned on the next
    /// [`on_voices_changed`](Self::on_voices_changed); speech starts now.
    pub fn read(&mut self, text: &str, voice: Option<&VoiceName>) -> Result<UtteranceId> {
        self.stop();

        let resolved = voice.and_then(|name| self.find_voice(name));
        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        self.synth.speak(id, text, resolved.as_ref())?;

        if resolved.is_none() {
            self.pending_voice = voice.cloned();
        }
        self.current = Some(id);
        self.state = self.state.begin();
        tracing::debug!(
            "utterance {:?} started ({} chars, deferred voice: {:?})",
            id,
            text.chars().count(),
            self.pending_voice
        );
        Ok(id)
    }

    /// Pause when speaking, resume when paused, nothing when idle.
    ///
    /// Returns the new state when a transition happened.
    pub fn pause_or_resume(&mut self) -> Option<UtteranceState> {
        match self.state {
            UtteranceState::Speaking => {
                self.synth.pause();
                self.state = self.state.pause();
            }
            UtteranceState::Paused => {
                self.synth.resume();
                self.state = self.state.resume();
            }
            UtteranceState::Idle => return None,
        }
        Some(self.state)
    }

    /// Cancel outright. Returns whether an utterance was active.
    pub fn stop(&mut self) -> bool {
        let was_active = self.state.is_active();
        self.synth.cancel();
        self.state = self.state.finish();
        self.current = None;
        self.pending_voice = None;
        was_active
    }

    /// One-shot deferred voice assignment.
    pub fn on_voices_changed(&mut self) {
        let Some(name) = self.pending_voice.take() else {
            return;
        };
        match self.find_voice(&name) {
            Some(voice) if self.state.is_active() => self.synth.assign_voice(&voice),
            Some(_) => {}
            None => tracing::debug!("voice {:?} still unavailable, using platform default", name),
        }
    }

    /// Platform reported the end of an utterance.
    pub fn on_utterance_end(&mut self, id: UtteranceId) {
        if self.current == Some(id) {
            self.state = self.state.finish();
            self.current = None;
            self.pending_voice = None;
        }
    }
}

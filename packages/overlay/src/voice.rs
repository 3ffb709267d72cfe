//! Voice commands: recognition session lifecycle and the command grammar.
//!
//! The interpreter never touches preferences or the panel. It turns each
//! finalized transcript into at most one [`Action`] and hands it back to the
//! Action API.

use crate::Result;
use a11y_overlay_domain::{
    Action, Capability, FeatureSet, Language, ListeningStatus, OverlayError, Theme,
};
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one recognition session so a late `end` from a stopped
/// session does not reset the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Recognition session parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub language: Language,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: Language::ENGLISH_US,
            continuous: true,
            interim_results: false,
        }
    }
}

/// Speech recognition capability.
pub trait SpeechRecognizer {
    /// Begin a session. Results and the platform `end` are delivered to
    /// [`VoiceCommandInterpreter::on_result`] and
    /// [`VoiceCommandInterpreter::on_end`] tagged with `session`.
    fn start(&mut self, session: SessionId, config: &RecognitionConfig) -> Result<()>;

    fn stop(&mut self);
}

impl<T: SpeechRecognizer + ?Sized> SpeechRecognizer for Box<T> {
    fn start(&mut self, session: SessionId, config: &RecognitionConfig) -> Result<()> {
        (**self).start(session, config)
    }
    fn stop(&mut self) {
        (**self).stop()
    }
}

impl<T: SpeechRecognizer + ?Sized> SpeechRecognizer for Rc<RefCell<T>> {
    fn start(&mut self, session: SessionId, config: &RecognitionConfig) -> Result<()> {
        self.borrow_mut().start(session, config)
    }
    fn stop(&mut self) {
        self.borrow_mut().stop()
    }
}

/// Null recognizer for platforms without speech input.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn start(&mut self, _session: SessionId, _config: &RecognitionConfig) -> Result<()> {
        Err(OverlayError::Unsupported(Capability::SpeechRecognition))
    }
    fn stop(&mut self) {}
}

/// Lower-case, trimmed, single-spaced form of a transcript.
pub fn normalize_transcript(transcript: &str) -> String {
    transcript
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

struct CommandPattern {
    regex: Regex,
    action: Action,
}

/// Ordered command patterns; the first match wins.
pub struct CommandGrammar {
    patterns: Vec<CommandPattern>,
}

/// Dyslexia font, focus highlight, big cursor. Checked before the base
/// vocabulary so "focus highlight on" is not read as the "light" theme.
///
/// A trailing "on"/"off" only counts as the last word, so "disable dyslexia
/// font on this page" still disables.
const ADVANCED_VOCABULARY: &[(&str, Action)] = &[
    (
        r"\b(turn off|disable)\b.*\bdyslexi(a|c)\b|\bdyslexi(a|c)\b.*\boff$",
        Action::ToggleDyslexia(Some(false)),
    ),
    (
        r"\b(turn on|enable)\b.*\bdyslexi(a|c)\b|\bdyslexi(a|c)\b.*\bon$",
        Action::ToggleDyslexia(Some(true)),
    ),
    (r"\bdyslexi(a|c)\b", Action::ToggleDyslexia(None)),
    (
        r"\b(turn off|disable)\b.*\bfocus (highlight|outline)\b|\bfocus (highlight|outline)\b.*\boff$",
        Action::ToggleFocusHighlight(Some(false)),
    ),
    (
        r"\b(turn on|enable)\b.*\bfocus (highlight|outline)\b|\bfocus (highlight|outline)\b.*\bon$",
        Action::ToggleFocusHighlight(Some(true)),
    ),
    (
        r"\bfocus (highlight|outline)\b",
        Action::ToggleFocusHighlight(None),
    ),
    (
        r"\b(turn off|disable)\b.*\b(big|large) (cursor|pointer)\b|\b(big|large) (cursor|pointer)\b.*\boff$",
        Action::ToggleBigCursor(Some(false)),
    ),
    (
        r"\b(turn on|enable)\b.*\b(big|large) (cursor|pointer)\b|\b(big|large) (cursor|pointer)\b.*\bon$",
        Action::ToggleBigCursor(Some(true)),
    ),
    (
        r"\b(big|large|bigger|larger) (cursor|pointer)\b",
        Action::ToggleBigCursor(None),
    ),
];

const BASE_VOCABULARY: &[(&str, Action)] = &[
    (
        r"\b(increase|enlarge) (the )?(text|font)\b|\b(bigger|larger) (text|font)\b",
        Action::FontPlus,
    ),
    (
        r"\b(decrease|reduce) (the )?(text|font)\b|\bsmaller (text|font)\b",
        Action::FontMinus,
    ),
    (r"\breset (the )?(text|font)\b", Action::FontReset),
    (r"\b(high )?contrast\b", Action::SetTheme(Theme::Contrast)),
    (r"\bdark\b", Action::SetTheme(Theme::Dark)),
    (r"\bsepia\b", Action::SetTheme(Theme::Sepia)),
    (
        r"\b(default|normal|light)\b",
        Action::SetTheme(Theme::Default),
    ),
    (r"\bread (the )?selection\b", Action::ReadSelection),
    (r"\bread (the )?(page|this)\b", Action::ReadPage),
    (r"\b(pause|resume)\b", Action::PauseResume),
    (r"\b(stop|cancel)\b", Action::StopRead),
    (r"\bopen (the )?(menu|panel)\b", Action::Open),
    (r"\b(close|hide) (the )?(menu|panel)\b", Action::Close),
];

impl CommandGrammar {
    /// Compile the vocabulary selected by `features`.
    pub fn new(features: &FeatureSet) -> Result<Self> {
        let mut table: Vec<(&str, Action)> = Vec::new();
        if features.advanced_voice {
            table.extend_from_slice(ADVANCED_VOCABULARY);
        }
        table.extend_from_slice(BASE_VOCABULARY);

        let patterns = table
            .into_iter()
            .map(|(pattern, action)| {
                Regex::new(pattern)
                    .map(|regex| CommandPattern { regex, action })
                    .map_err(|e| OverlayError::Config(format!("voice command pattern: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Match a normalized phrase; `None` is not an error.
    pub fn interpret(&self, phrase: &str) -> Option<Action> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(phrase))
            .map(|p| p.action)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// IDLE / LISTENING state machine over a recognizer.
pub struct VoiceCommandInterpreter<R> {
    recognizer: R,
    grammar: CommandGrammar,
    config: RecognitionConfig,
    status: ListeningStatus,
    session: Option<SessionId>,
    next_session: u64,
    last_transcript: Option<String>,
}

impl<R: SpeechRecognizer> VoiceCommandInterpreter<R> {
    pub fn new(recognizer: R, grammar: CommandGrammar, config: RecognitionConfig) -> Self {
        Self {
            recognizer,
            grammar,
            config,
            status: ListeningStatus::Idle,
            session: None,
            next_session: 1,
            last_transcript: None,
        }
    }

    pub fn status(&self) -> ListeningStatus {
        self.status
    }

    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn last_transcript(&self) -> Option<&str> {
        self.last_transcript.as_deref()
    }

    /// Start a session, stopping any active one first.
    pub fn start(&mut self) -> Result<SessionId> {
        self.stop();
        let session = SessionId(self.next_session);
        self.next_session += 1;
        self.recognizer.start(session, &self.config)?;
        self.session = Some(session);
        self.status = ListeningStatus::Listening;
        self.last_transcript = None;
        tracing::debug!("recognition session {:?} started", session);
        Ok(session)
    }

    /// Stop the active session. Returns whether one was active.
    pub fn stop(&mut self) -> bool {
        if self.status != ListeningStatus::Listening {
            return false;
        }
        self.recognizer.stop();
        self.status = ListeningStatus::Idle;
        self.session = None;
        true
    }

    /// A recognition result. Interim results are ignored.
    pub fn on_result(
        &mut self,
        session: SessionId,
        transcript: &str,
        is_final: bool,
    ) -> Option<Action> {
        if !is_final || self.session != Some(session) {
            return None;
        }
        let phrase = normalize_transcript(transcript);
        if phrase.is_empty() {
            return None;
        }
        let action = self.grammar.interpret(&phrase);
        if action.is_none() {
            tracing::trace!("no voice command in {:?}", phrase);
        }
        self.last_transcript = Some(phrase);
        action
    }

    /// Platform ended the session. No automatic restart.
    pub fn on_end(&mut self, session: SessionId) -> bool {
        if self.session != Some(session) {
            return false;
        }
        self.status = ListeningStatus::Idle;
        self.session = None;
        tracing::debug!("recognition session {:?} ended by platform", session);
        true
    }

    /// Label for the status indicator.
    pub fn indicator(&self) -> String {
        match (self.status, &self.last_transcript) {
            (ListeningStatus::Listening, Some(phrase)) => format!("Heard: {phrase}"),
            (status, _) => status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_overlay_domain::FeatureTier;

    fn grammar(tier: FeatureTier) -> CommandGrammar {
        CommandGrammar::new(&tier.into()).expect("patterns compile")
    }

    #[test]
    fn base_vocabulary() {
        let g = grammar(FeatureTier::AA);
        let cases = [
            ("increase font please", Action::FontPlus),
            ("bigger text", Action::FontPlus),
            ("decrease the text", Action::FontMinus),
            ("reset font", Action::FontReset),
            ("high contrast", Action::SetTheme(Theme::Contrast)),
            ("theme dark", Action::SetTheme(Theme::Dark)),
            ("sepia", Action::SetTheme(Theme::Sepia)),
            ("normal theme", Action::SetTheme(Theme::Default)),
            ("read selection", Action::ReadSelection),
            ("read this", Action::ReadPage),
            ("pause", Action::PauseResume),
            ("cancel", Action::StopRead),
            ("open menu", Action::Open),
            ("hide the panel", Action::Close),
        ];
        for (phrase, expected) in cases {
            assert_eq!(g.interpret(phrase), Some(expected), "phrase {phrase:?}");
        }
    }

    #[test]
    fn unrecognized_speech_is_ignored() {
        let g = grammar(FeatureTier::AAA);
        assert_eq!(g.interpret("what a lovely day"), None);
        assert_eq!(g.interpret("darkness"), None);
    }

    #[test]
    fn advanced_vocabulary_needs_the_tier() {
        assert_eq!(
            grammar(FeatureTier::AAA).interpret("dyslexia font on"),
            Some(Action::ToggleDyslexia(Some(true)))
        );
        assert_eq!(
            grammar(FeatureTier::AAA).interpret("turn off focus highlight"),
            Some(Action::ToggleFocusHighlight(Some(false)))
        );
        assert_eq!(
            grammar(FeatureTier::AAA).interpret("big cursor"),
            Some(Action::ToggleBigCursor(None))
        );
        assert_eq!(grammar(FeatureTier::AA).interpret("dyslexia font on"), None);
        assert_eq!(grammar(FeatureTier::AA).interpret("focus highlight"), None);
    }

    #[test]
    fn trailing_on_off_is_only_the_last_word() {
        let g = grammar(FeatureTier::AAA);
        let cases = [
            (
                "disable dyslexia font on this page",
                Action::ToggleDyslexia(Some(false)),
            ),
            ("enable dyslexic font", Action::ToggleDyslexia(Some(true))),
            ("dyslexia font off", Action::ToggleDyslexia(Some(false))),
            (
                "turn off focus highlight on links",
                Action::ToggleFocusHighlight(Some(false)),
            ),
            ("focus outline on", Action::ToggleFocusHighlight(Some(true))),
            (
                "disable big cursor on every page",
                Action::ToggleBigCursor(Some(false)),
            ),
            ("large pointer on", Action::ToggleBigCursor(Some(true))),
            ("dyslexia on the side", Action::ToggleDyslexia(None)),
        ];
        for (phrase, expected) in cases {
            assert_eq!(g.interpret(phrase), Some(expected), "phrase {phrase:?}");
        }
    }

    #[test]
    fn transcripts_are_normalized() {
        assert_eq!(normalize_transcript("  Increase   FONT "), "increase font");
    }

    #[test]
    fn unsupported_recognizer_stays_idle() {
        let mut voice = VoiceCommandInterpreter::new(
            UnsupportedRecognizer,
            grammar(FeatureTier::AA),
            RecognitionConfig::default(),
        );
        assert_eq!(
            voice.start().unwrap_err(),
            OverlayError::Unsupported(Capability::SpeechRecognition)
        );
        assert_eq!(voice.status(), ListeningStatus::Idle);
        assert_eq!(voice.indicator(), "Idle");
    }
}

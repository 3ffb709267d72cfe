//! The Action API: one engine owning preferences, projection, panel and
//! speech, built through [`OverlayBuilder`].
//!
//! Every preference-mutating operation follows the same protocol: validate
//! and clamp, update the in-memory record, persist, project, announce.
//! Panel buttons and voice commands both end up in [`Overlay::dispatch`].

use crate::Result;
use crate::announcer::{Announcer, MemoryAnnouncer};
use crate::page_text::{NoText, READ_BUDGET_CHARS, TextSource, collect_page_text, selected_text};
use crate::panel::{FocusHost, KeyInput, KeyOutcome, PanelController, PanelTransition};
use crate::projector::{PresentationContext, Projector, RootSnapshot, hooks};
use crate::reader::{SpeechReader, SpeechSynthesizer, UnsupportedSynthesizer, UtteranceId};
use crate::store::{KeyValueStore, MemoryStore, PreferenceStore};
use crate::styles::StyleSheet;
use crate::voice::{
    CommandGrammar, RecognitionConfig, SessionId, SpeechRecognizer, UnsupportedRecognizer,
    VoiceCommandInterpreter,
};
use crate::widget::Control;
use a11y_overlay_domain::{
    Action, FeatureSet, ListeningStatus, OverlayConfig, OverlayError, PanelState,
    PreferenceRecord, Theme, UtteranceState,
};

/* ───────────────────────── events ───────────────────────── */

/// Asynchronous completions reported by platform speech services.
///
/// Browser bindings funnel their callbacks into one sink of these so the
/// embedder can route them to [`Overlay::handle_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    UtteranceEnd(UtteranceId),
    VoicesChanged,
    Transcript {
        session: SessionId,
        transcript: String,
        is_final: bool,
    },
    RecognitionEnd(SessionId),
}

/* ───────────────────────── builder ───────────────────────── */

/// Initialization entry point.
///
/// The document root and the panel host are required; every capability
/// defaults to its null object, and storage defaults to memory only.
pub struct OverlayBuilder<H: FocusHost> {
    config: OverlayConfig,
    host: H,
    document: Box<dyn PresentationContext>,
    store: Box<dyn KeyValueStore>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    recognizer: Box<dyn SpeechRecognizer>,
    text: Box<dyn TextSource>,
    announcer: Box<dyn Announcer>,
    prefers_dark: Box<dyn FnOnce() -> bool>,
}

impl<H: FocusHost> OverlayBuilder<H> {
    pub fn new(document: impl PresentationContext + 'static, host: H) -> Self {
        Self {
            config: OverlayConfig::default(),
            host,
            document: Box::new(document),
            store: Box::new(MemoryStore::new()),
            synthesizer: Box::new(UnsupportedSynthesizer),
            recognizer: Box::new(UnsupportedRecognizer),
            text: Box::new(NoText),
            announcer: Box::new(MemoryAnnouncer::default()),
            prefers_dark: Box::new(|| false),
        }
    }

    pub fn config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn synthesizer(mut self, synthesizer: impl SpeechSynthesizer + 'static) -> Self {
        self.synthesizer = Box::new(synthesizer);
        self
    }

    pub fn recognizer(mut self, recognizer: impl SpeechRecognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    pub fn text_source(mut self, text: impl TextSource + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    pub fn announcer(mut self, announcer: impl Announcer + 'static) -> Self {
        self.announcer = Box::new(announcer);
        self
    }

    /// System light/dark signal, queried at most once during `mount` and
    /// only when no theme was stored.
    pub fn prefers_dark(mut self, signal: impl FnOnce() -> bool + 'static) -> Self {
        self.prefers_dark = Box::new(signal);
        self
    }

    /// Load preferences, install the stylesheet, project and attach.
    pub fn mount(self) -> Result<Overlay<H>> {
        let Self {
            config,
            host,
            mut document,
            store,
            synthesizer,
            recognizer,
            text,
            mut announcer,
            prefers_dark,
        } = self;

        if document.has_class(hooks::BASE_CLASS) {
            return Err(OverlayError::AlreadyMounted);
        }

        let features = config.features();
        let grammar = CommandGrammar::new(&features)?;
        let snapshot = RootSnapshot::capture(&document);

        let mut store = PreferenceStore::new(store);
        let record = store.load(|| Theme::from_system(prefers_dark()));

        document.install_stylesheet(&StyleSheet::render(&config, &features));
        Projector::mount_writes(&config).write_to(&mut document);
        let projector = Projector::new(features);
        projector.apply(&record, &mut document);
        store.save(&record);

        let panel = PanelController::new(host);
        let recognition = RecognitionConfig {
            language: config.language.clone(),
            ..RecognitionConfig::default()
        };
        let voice = VoiceCommandInterpreter::new(recognizer, grammar, recognition);

        announcer.preferences_changed(&record);
        announcer.voice_status(&voice.indicator());
        tracing::debug!("overlay mounted (tier {}, theme {})", config.tier, record.theme);

        Ok(Overlay {
            config,
            features,
            record,
            store,
            document,
            projector,
            snapshot,
            panel,
            reader: SpeechReader::new(synthesizer),
            voice,
            text,
            announcer,
        })
    }
}

/* ───────────────────────── engine ───────────────────────── */

/// A mounted overlay.
pub struct Overlay<H: FocusHost> {
    config: OverlayConfig,
    features: FeatureSet,
    record: PreferenceRecord,
    store: PreferenceStore<Box<dyn KeyValueStore>>,
    document: Box<dyn PresentationContext>,
    projector: Projector,
    snapshot: RootSnapshot,
    panel: PanelController<H>,
    reader: SpeechReader<Box<dyn SpeechSynthesizer>>,
    voice: VoiceCommandInterpreter<Box<dyn SpeechRecognizer>>,
    text: Box<dyn TextSource>,
    announcer: Box<dyn Announcer>,
}

impl<H: FocusHost> Overlay<H> {
    pub fn builder(document: impl PresentationContext + 'static, host: H) -> OverlayBuilder<H> {
        OverlayBuilder::new(document, host)
    }

    pub fn preferences(&self) -> &PreferenceRecord {
        &self.record
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn listening_status(&self) -> ListeningStatus {
        self.voice.status()
    }

    pub fn utterance_state(&self) -> UtteranceState {
        self.reader.state()
    }

    /// Percentage shown next to the text size controls.
    pub fn scale_label(&self) -> String {
        format!("{}%", self.record.font_scale.percent())
    }

    pub fn voice_indicator(&self) -> String {
        self.voice.indicator()
    }

    pub fn host(&self) -> &H {
        self.panel.host()
    }

    /* ───── Action API ───── */

    /// Run one named operation.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.features
            .check(&action)
            .map_err(OverlayError::FeatureDisabled)?;
        tracing::debug!("action {}", action.name());

        let current = self.record;
        match action {
            Action::FontPlus => self.commit(
                PreferenceRecord {
                    font_scale: current.font_scale.step_up(),
                    ..current
                },
                "Text larger",
            ),
            Action::FontMinus => self.commit(
                PreferenceRecord {
                    font_scale: current.font_scale.step_down(),
                    ..current
                },
                "Text smaller",
            ),
            Action::FontReset => self.commit(
                PreferenceRecord {
                    font_scale: Default::default(),
                    ..current
                },
                "Text size reset",
            ),
            Action::SetTheme(theme) => self.commit(
                PreferenceRecord { theme, ..current },
                &format!("Theme: {theme}"),
            ),
            Action::ToggleDyslexia(force) => {
                let on = force.unwrap_or(!current.dyslexia_font);
                self.commit(
                    PreferenceRecord {
                        dyslexia_font: on,
                        ..current
                    },
                    if on { "Dyslexia font on" } else { "Dyslexia font off" },
                )
            }
            Action::ToggleFocusHighlight(force) => {
                let on = force.unwrap_or(!current.focus_highlight);
                self.commit(
                    PreferenceRecord {
                        focus_highlight: on,
                        ..current
                    },
                    if on { "Focus highlight on" } else { "Focus highlight off" },
                )
            }
            Action::ToggleBigCursor(force) => {
                let on = force.unwrap_or(!current.big_cursor);
                self.commit(
                    PreferenceRecord {
                        big_cursor: on,
                        ..current
                    },
                    if on { "Big cursor on" } else { "Big cursor off" },
                )
            }
            Action::ReadPage => {
                let text = collect_page_text(&self.text, READ_BUDGET_CHARS);
                if !text.is_empty() {
                    self.speak(&text, "Reading page")?;
                }
            }
            Action::ReadSelection => match selected_text(&self.text, READ_BUDGET_CHARS) {
                Some(text) => self.speak(&text, "Reading selection")?,
                None => self.announcer.announce("Select text first"),
            },
            Action::PauseResume => match self.reader.pause_or_resume() {
                Some(UtteranceState::Paused) => self.announcer.announce("Paused"),
                Some(_) => self.announcer.announce("Resumed"),
                None => {}
            },
            Action::StopRead => {
                self.reader.stop();
                self.announcer.announce("Stopped");
            }
            Action::Open => {
                self.panel.open();
            }
            Action::Close => {
                self.panel.close();
            }
        }
        Ok(())
    }

    fn commit(&mut self, next: PreferenceRecord, message: &str) {
        self.record = next;
        self.store.save(&self.record);
        self.projector.apply(&self.record, &mut self.document);
        self.announcer.preferences_changed(&self.record);
        self.announcer.announce(message);
    }

    fn speak(&mut self, text: &str, announcement: &str) -> Result<()> {
        match self.reader.read(text, self.config.read_voice.as_ref()) {
            Ok(_) => {
                self.announcer.announce(announcement);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    fn report(&mut self, err: OverlayError) -> OverlayError {
        if let OverlayError::Unsupported(capability) = &err {
            tracing::warn!("{}", err);
            self.announcer.notice(capability.notice());
        }
        err
    }

    pub fn font_plus(&mut self) -> Result<()> {
        self.dispatch(Action::FontPlus)
    }

    pub fn font_minus(&mut self) -> Result<()> {
        self.dispatch(Action::FontMinus)
    }

    pub fn font_reset(&mut self) -> Result<()> {
        self.dispatch(Action::FontReset)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.dispatch(Action::SetTheme(theme))
    }

    /// Theme by name, as it arrives from a `<select>`. Unknown names are
    /// rejected and leave every surface untouched.
    pub fn set_theme_named(&mut self, name: &str) -> Result<()> {
        let theme = Theme::parse(name)?;
        self.set_theme(theme)
    }

    pub fn toggle_dyslexia(&mut self, force: Option<bool>) -> Result<()> {
        self.dispatch(Action::ToggleDyslexia(force))
    }

    pub fn toggle_focus_highlight(&mut self, force: Option<bool>) -> Result<()> {
        self.dispatch(Action::ToggleFocusHighlight(force))
    }

    pub fn toggle_big_cursor(&mut self, force: Option<bool>) -> Result<()> {
        self.dispatch(Action::ToggleBigCursor(force))
    }

    pub fn read_page(&mut self) -> Result<()> {
        self.dispatch(Action::ReadPage)
    }

    pub fn read_selection(&mut self) -> Result<()> {
        self.dispatch(Action::ReadSelection)
    }

    pub fn pause_resume(&mut self) -> Result<()> {
        self.dispatch(Action::PauseResume)
    }

    pub fn stop_read(&mut self) -> Result<()> {
        self.dispatch(Action::StopRead)
    }

    pub fn open(&mut self) -> Result<()> {
        self.dispatch(Action::Open)
    }

    pub fn close(&mut self) -> Result<()> {
        self.dispatch(Action::Close)
    }

    /// Launcher button click.
    pub fn toggle_panel(&mut self) -> PanelTransition {
        self.panel.toggle()
    }

    /// A panel button was pressed.
    pub fn activate(&mut self, control: Control) -> Result<()> {
        match control.action() {
            Some(action) => self.dispatch(action),
            None => self.toggle_voice().map(|_| ()),
        }
    }

    /* ───── voice commands ───── */

    pub fn start_voice(&mut self) -> Result<SessionId> {
        if !self.features.voice_commands {
            return Err(OverlayError::FeatureDisabled("voice commands"));
        }
        match self.voice.start() {
            Ok(session) => {
                self.announcer.voice_status(&self.voice.indicator());
                self.announcer.announce("Listening");
                Ok(session)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn stop_voice(&mut self) -> bool {
        if !self.voice.stop() {
            return false;
        }
        self.announcer.voice_status(&self.voice.indicator());
        self.announcer.announce("Voice commands off");
        true
    }

    /// Start/stop control next to the status indicator.
    pub fn toggle_voice(&mut self) -> Result<ListeningStatus> {
        if self.voice.status() == ListeningStatus::Listening {
            self.stop_voice();
        } else {
            self.start_voice()?;
        }
        Ok(self.voice.status())
    }

    /* ───── platform events ───── */

    /// A recognition result. Dispatches the matched command, if any.
    pub fn handle_transcript(
        &mut self,
        session: SessionId,
        transcript: &str,
        is_final: bool,
    ) -> Option<Action> {
        let action = self.voice.on_result(session, transcript, is_final);
        if is_final && self.voice.session() == Some(session) {
            self.announcer.voice_status(&self.voice.indicator());
        }
        if let Some(action) = action {
            if let Err(e) = self.dispatch(action) {
                tracing::debug!("voice command {} not applied: {}", action.name(), e);
            }
        }
        action
    }

    /// Platform ended a recognition session.
    pub fn handle_recognition_end(&mut self, session: SessionId) {
        if self.voice.on_end(session) {
            self.announcer.voice_status(&self.voice.indicator());
        }
    }

    /// Platform voice list changed.
    pub fn handle_voices_changed(&mut self) {
        self.reader.on_voices_changed();
    }

    /// Platform finished or canceled an utterance.
    pub fn handle_utterance_end(&mut self, id: UtteranceId) {
        self.reader.on_utterance_end(id);
    }

    /// Route one platform completion to its handler.
    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::UtteranceEnd(id) => self.handle_utterance_end(id),
            PlatformEvent::VoicesChanged => self.handle_voices_changed(),
            PlatformEvent::Transcript {
                session,
                transcript,
                is_final,
            } => {
                self.handle_transcript(session, &transcript, is_final);
            }
            PlatformEvent::RecognitionEnd(session) => self.handle_recognition_end(session),
        }
    }

    /// Document-level keydown.
    pub fn handle_key(&mut self, input: &KeyInput) -> KeyOutcome {
        self.panel.handle_key(input)
    }

    /// Document-level pointer press; closes the panel on outside clicks.
    pub fn handle_pointer_down(&mut self, target: &H::Node) -> bool {
        self.panel.handle_pointer_down(target)
    }

    /* ───── teardown ───── */

    /// Stop speech, remove created nodes and restore the document root.
    pub fn teardown(mut self) {
        self.voice.stop();
        self.reader.stop();
        self.panel.detach();
        self.document.remove_stylesheet();
        self.snapshot.restore(&mut self.document);
        tracing::debug!("overlay torn down");
    }
}

//! Browser bindings over `web-sys` (the `web` feature).
//!
//! Each type adapts one browser surface to an engine trait. Asynchronous
//! speech callbacks are forwarded to an [`EventSink`]; the embedder routes
//! them into [`Overlay::handle_event`](crate::Overlay::handle_event).
//! [`init`] wires all of them into the self-contained widget.
//!
//! Every callback handed to the browser is detached before its closure is
//! dropped, so events that arrive after teardown find no handler.

mod mount;

pub use mount::{WidgetHandle, init};

use crate::Result;
use crate::announcer::Announcer;
use crate::overlay::PlatformEvent;
use crate::page_text::TextSource;
use crate::panel::{FocusHost, Key, KeyInput};
use crate::projector::PresentationContext;
use crate::reader::{SpeechSynthesizer, UtteranceId, VoiceInfo};
use crate::store::KeyValueStore;
use crate::styles::{STYLESHEET_ID, StyleSheet};
use crate::voice::{RecognitionConfig, SessionId, SpeechRecognizer};
use crate::widget::Control;
use a11y_overlay_domain::{Capability, OverlayError, PreferenceRecord};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::{Closure, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlSelectElement, KeyboardEvent, SpeechRecognition,
    SpeechRecognitionEvent, SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice,
    Storage, Window,
};

/// Receives speech completions from the browser.
pub type EventSink = Rc<dyn Fn(PlatformEvent)>;

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

/// Elements whose text is never read aloud.
const SKIPPED_CONTAINERS: &str = "script, style, noscript, template, .a11y-panel, .a11y-btn";

/// Focusable controls inside the panel, in DOM order.
const FOCUSABLE: &str = "button:not([disabled]), [href], input:not([disabled]), select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

fn platform(err: JsValue) -> OverlayError {
    OverlayError::Platform(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| OverlayError::Platform("no window".into()))
}

fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| OverlayError::Platform("no document".into()))
}

/// Route Rust panics to the browser console.
pub fn install_panic_hook() {
    console_error_panic_hook::set_once();
}

/// The `(prefers-color-scheme: dark)` media query.
pub fn prefers_dark_scheme() -> bool {
    window()
        .ok()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|query| query.matches())
}

/// Keydown as the panel controller sees it.
///
/// With Alt held some layouts report a composed character in `key`, so the
/// physical `KeyA` code wins for the open shortcut.
pub fn key_input(event: &KeyboardEvent) -> KeyInput {
    let key = if event.alt_key() && event.code() == "KeyA" {
        Key::Char('a')
    } else {
        Key::from_dom(&event.key())
    };
    KeyInput {
        key,
        shift: event.shift_key(),
        alt: event.alt_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
    }
}

/* ───────────────────────── storage ───────────────────────── */

/// `window.localStorage`
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Fails when storage is disabled (private mode, sandboxed frames).
    pub fn new() -> Result<Self> {
        let unavailable = |reason: &str| OverlayError::StorageUnavailable(reason.to_owned());
        let storage = window()?
            .local_storage()
            .map_err(|_| unavailable("localStorage access denied"))?
            .ok_or_else(|| unavailable("localStorage missing"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| OverlayError::StorageUnavailable(platform(e).to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| OverlayError::StorageUnavailable(platform(e).to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| OverlayError::StorageUnavailable(platform(e).to_string()))
    }
}

/* ───────────────────────── document root ───────────────────────── */

/// `<html>` as the presentation context.
pub struct DocumentRoot {
    document: Document,
    root: HtmlElement,
}

impl DocumentRoot {
    pub fn new() -> Result<Self> {
        let document = document()?;
        let root = document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| OverlayError::Platform("no document element".into()))?;
        Ok(Self { document, root })
    }

    fn log(op: &str, name: &str, result: std::result::Result<impl Sized, JsValue>) {
        if let Err(e) = result {
            tracing::warn!("{} {} failed: {}", op, name, platform(e));
        }
    }
}

impl PresentationContext for DocumentRoot {
    fn property(&self, name: &str) -> Option<String> {
        self.root
            .style()
            .get_property_value(name)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_property(&mut self, name: &str, value: &str) {
        Self::log("set property", name, self.root.style().set_property(name, value));
    }

    fn remove_property(&mut self, name: &str) {
        Self::log("remove property", name, self.root.style().remove_property(name));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.root.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        Self::log("set attribute", name, self.root.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, name: &str) {
        Self::log("remove attribute", name, self.root.remove_attribute(name));
    }

    fn has_class(&self, name: &str) -> bool {
        self.root.class_list().contains(name)
    }

    fn set_class(&mut self, name: &str, on: bool) {
        Self::log("toggle class", name, self.root.class_list().toggle_with_force(name, on));
    }

    fn install_stylesheet(&mut self, sheet: &StyleSheet) {
        let style = match self.document.get_element_by_id(STYLESHEET_ID) {
            Some(existing) => existing,
            None => match self.document.create_element("style") {
                Ok(style) => {
                    style.set_id(STYLESHEET_ID);
                    let parent: Element = match self.document.head() {
                        Some(head) => head.into(),
                        None => self.root.clone().into(),
                    };
                    Self::log("append", STYLESHEET_ID, parent.append_child(&style));
                    style
                }
                Err(e) => {
                    tracing::warn!("cannot create stylesheet: {}", platform(e));
                    return;
                }
            },
        };
        if let Some(nonce) = &sheet.nonce {
            Self::log("set attribute", "nonce", style.set_attribute("nonce", nonce));
        }
        style.set_text_content(Some(&sheet.css));
    }

    fn remove_stylesheet(&mut self) {
        if let Some(style) = self.document.get_element_by_id(STYLESHEET_ID) {
            style.remove();
        }
    }
}

/* ───────────────────────── panel ───────────────────────── */

/// Launcher button and panel elements created by the embedder.
pub struct DomPanelHost {
    document: Document,
    trigger: Element,
    panel: Element,
}

impl DomPanelHost {
    pub fn new(trigger: Element, panel: Element) -> Result<Self> {
        Ok(Self {
            document: document()?,
            trigger,
            panel,
        })
    }
}

impl FocusHost for DomPanelHost {
    type Node = Element;

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&mut self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            if let Err(e) = el.focus() {
                tracing::debug!("focus failed: {}", platform(e));
            }
        }
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn panel(&self) -> Element {
        self.panel.clone()
    }

    fn panel_focusables(&self) -> Vec<Element> {
        let Ok(list) = self.panel.query_selector_all(FOCUSABLE) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn is_within_overlay(&self, node: &Element) -> bool {
        self.panel.contains(Some(node.as_ref())) || self.trigger.contains(Some(node.as_ref()))
    }

    fn set_panel_visible(&mut self, visible: bool) {
        let result = if visible {
            self.panel.set_attribute("data-a11y-active", "true")
        } else {
            self.panel.remove_attribute("data-a11y-active")
        };
        if let Err(e) = result {
            tracing::warn!("panel visibility: {}", platform(e));
        }
        if let Err(e) = self
            .panel
            .set_attribute("aria-hidden", if visible { "false" } else { "true" })
        {
            tracing::warn!("panel aria-hidden: {}", platform(e));
        }
    }

    fn set_trigger_expanded(&mut self, expanded: bool) {
        if let Err(e) = self
            .trigger
            .set_attribute("aria-expanded", if expanded { "true" } else { "false" })
        {
            tracing::warn!("trigger aria-expanded: {}", platform(e));
        }
    }

    fn detach(&mut self) {
        self.panel.remove();
        self.trigger.remove();
    }
}

/* ───────────────────────── page text ───────────────────────── */

/// Selection and visible body text of the live page.
pub struct PageText {
    window: Window,
    document: Document,
}

impl PageText {
    pub fn new() -> Result<Self> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| OverlayError::Platform("no document".into()))?;
        Ok(Self { window, document })
    }

    fn is_readable(parent: &Element) -> bool {
        if parent.closest(SKIPPED_CONTAINERS).ok().flatten().is_some() {
            return false;
        }
        // offsetParent is null for display:none subtrees
        match parent.dyn_ref::<HtmlElement>() {
            Some(el) => el.offset_parent().is_some() || el.tag_name() == "BODY",
            None => true,
        }
    }
}

impl TextSource for PageText {
    fn selection(&self) -> Option<String> {
        let selection = self.window.get_selection().ok().flatten()?;
        Some(String::from(selection.to_string()))
    }

    fn visible_text(&self, budget: usize) -> Vec<String> {
        let Some(body) = self.document.body() else {
            return Vec::new();
        };
        let walker = match self
            .document
            .create_tree_walker_with_what_to_show(&body, SHOW_TEXT)
        {
            Ok(walker) => walker,
            Err(e) => {
                tracing::debug!("tree walker unavailable: {}", platform(e));
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        let mut total = 0;
        while let Ok(Some(node)) = walker.next_node() {
            let Some(parent) = node.parent_element() else {
                continue;
            };
            if !Self::is_readable(&parent) {
                continue;
            }
            let Some(text) = node.text_content() else {
                continue;
            };
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            total += trimmed.chars().count() + 1;
            out.push(trimmed.to_owned());
            if total >= budget {
                break;
            }
        }
        out
    }
}

/* ───────────────────────── synthesis ───────────────────────── */

/// The utterance being spoken and its `end` callback.
struct Utterance {
    utterance: SpeechSynthesisUtterance,
    _on_end: Closure<dyn FnMut()>,
}

impl Drop for Utterance {
    fn drop(&mut self) {
        self.utterance.set_onend(None);
    }
}

/// `window.speechSynthesis`
///
/// Takes over `onvoiceschanged` while alive. A handler the page had already
/// installed keeps firing after ours and is put back on drop.
pub struct WebSpeechSynthesizer {
    synth: SpeechSynthesis,
    sink: EventSink,
    current: Option<Utterance>,
    voices_changed: Closure<dyn FnMut()>,
    page_voices_changed: Option<js_sys::Function>,
}

impl WebSpeechSynthesizer {
    /// Fails with `Unsupported` when the browser has no synthesis API.
    pub fn new(sink: EventSink) -> Result<Self> {
        let synth = window()?
            .speech_synthesis()
            .map_err(|_| OverlayError::Unsupported(Capability::SpeechSynthesis))?;
        let page_voices_changed = synth.onvoiceschanged();

        let notify = Rc::clone(&sink);
        let chained = page_voices_changed.clone();
        let this = JsValue::from(synth.clone());
        let voices_changed = Closure::<dyn FnMut()>::new(move || {
            notify(PlatformEvent::VoicesChanged);
            if let Some(handler) = &chained {
                if let Err(e) = handler.call0(&this) {
                    tracing::debug!("page voiceschanged handler threw: {}", platform(e));
                }
            }
        });
        synth.set_onvoiceschanged(Some(voices_changed.as_ref().unchecked_ref()));
        Ok(Self {
            synth,
            sink,
            current: None,
            voices_changed,
            page_voices_changed,
        })
    }

    fn platform_voice(&self, voice: &VoiceInfo) -> Option<SpeechSynthesisVoice> {
        self.synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .find(|v| v.name() == voice.name)
    }
}

impl SpeechSynthesizer for WebSpeechSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .map(|v| VoiceInfo {
                name: v.name(),
                lang: v.lang(),
                default: v.default(),
            })
            .collect()
    }

    fn speak(&mut self, id: UtteranceId, text: &str, voice: Option<&VoiceInfo>) -> Result<()> {
        let utterance = SpeechSynthesisUtterance::new_with_text(text).map_err(platform)?;
        if let Some(voice) = voice.and_then(|v| self.platform_voice(v)) {
            utterance.set_voice(Some(&voice));
        }
        let sink = Rc::clone(&self.sink);
        let on_end = Closure::<dyn FnMut()>::new(move || sink(PlatformEvent::UtteranceEnd(id)));
        utterance.set_onend(Some(on_end.as_ref().unchecked_ref()));

        self.current = None;
        self.synth.speak(&utterance);
        self.current = Some(Utterance {
            utterance,
            _on_end: on_end,
        });
        Ok(())
    }

    fn assign_voice(&mut self, voice: &VoiceInfo) {
        let Some(platform_voice) = self.platform_voice(voice) else {
            return;
        };
        if let Some(current) = &self.current {
            current.utterance.set_voice(Some(&platform_voice));
        }
    }

    fn pause(&mut self) {
        self.synth.pause();
    }

    fn resume(&mut self) {
        self.synth.resume();
    }

    fn cancel(&mut self) {
        // detach `end` first: the browser fires it for the canceled utterance
        self.current = None;
        self.synth.cancel();
    }
}

impl Drop for WebSpeechSynthesizer {
    fn drop(&mut self) {
        self.current = None;
        let ours: &JsValue = self.voices_changed.as_ref();
        let installed = self.synth.onvoiceschanged().map(JsValue::from);
        if installed.as_ref() == Some(ours) {
            self.synth
                .set_onvoiceschanged(self.page_voices_changed.as_ref());
        } else {
            // the page replaced the handler after us; leave its choice alone
            tracing::debug!("onvoiceschanged no longer ours, not restored");
        }
    }
}

/* ───────────────────────── recognition ───────────────────────── */

struct RecognitionSession {
    recognition: SpeechRecognition,
    _on_result: Closure<dyn FnMut(SpeechRecognitionEvent)>,
    _on_end: Closure<dyn FnMut()>,
}

impl Drop for RecognitionSession {
    fn drop(&mut self) {
        // `end` still arrives after stop(); it must find no handler
        self.recognition.set_onresult(None);
        self.recognition.set_onend(None);
        self.recognition.stop();
    }
}

/// `SpeechRecognition`, falling back to the prefixed constructor.
///
/// One platform instance per session; stopping drops it.
pub struct WebSpeechRecognizer {
    sink: EventSink,
    active: Option<RecognitionSession>,
}

impl WebSpeechRecognizer {
    pub fn new(sink: EventSink) -> Result<Self> {
        if !Self::is_available() {
            return Err(OverlayError::Unsupported(Capability::SpeechRecognition));
        }
        Ok(Self { sink, active: None })
    }

    pub fn is_available() -> bool {
        let Ok(window) = window() else {
            return false;
        };
        ["SpeechRecognition", "webkitSpeechRecognition"]
            .iter()
            .any(|name| {
                js_sys::Reflect::get(&window, &JsValue::from_str(name))
                    .is_ok_and(|ctor| ctor.is_function())
            })
    }

    fn construct() -> Result<SpeechRecognition> {
        if let Ok(recognition) = SpeechRecognition::new() {
            return Ok(recognition);
        }
        let window = window()?;
        let ctor = js_sys::Reflect::get(&window, &JsValue::from_str("webkitSpeechRecognition"))
            .map_err(platform)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| OverlayError::Unsupported(Capability::SpeechRecognition))?;
        let instance = js_sys::Reflect::construct(&ctor, &js_sys::Array::new()).map_err(platform)?;
        Ok(instance.unchecked_into())
    }
}

impl SpeechRecognizer for WebSpeechRecognizer {
    fn start(&mut self, session: SessionId, config: &RecognitionConfig) -> Result<()> {
        self.stop();

        let recognition = Self::construct()?;
        recognition.set_lang(config.language.code());
        recognition.set_continuous(config.continuous);
        recognition.set_interim_results(config.interim_results);

        let sink = Rc::clone(&self.sink);
        let on_result = Closure::<dyn FnMut(SpeechRecognitionEvent)>::new(
            move |event: SpeechRecognitionEvent| {
                let Some(results) = event.results() else {
                    return;
                };
                for i in event.result_index()..results.length() {
                    let Some(result) = results.get(i) else {
                        continue;
                    };
                    let Some(best) = result.get(0) else {
                        continue;
                    };
                    sink(PlatformEvent::Transcript {
                        session,
                        transcript: best.transcript(),
                        is_final: result.is_final(),
                    });
                }
            },
        );
        let sink = Rc::clone(&self.sink);
        let on_end =
            Closure::<dyn FnMut()>::new(move || sink(PlatformEvent::RecognitionEnd(session)));

        recognition.set_onresult(Some(on_result.as_ref().unchecked_ref()));
        recognition.set_onend(Some(on_end.as_ref().unchecked_ref()));
        recognition.start().map_err(platform)?;

        self.active = Some(RecognitionSession {
            recognition,
            _on_result: on_result,
            _on_end: on_end,
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.active = None;
    }
}

/* ───────────────────────── live region ───────────────────────── */

/// Polite live region plus the panel controls that mirror state.
pub struct ElementLiveRegion {
    window: Window,
    region: Element,
    voice_status: Option<Element>,
    scale_label: Option<Element>,
    theme_select: Option<HtmlSelectElement>,
    toggles: Vec<(Element, Control)>,
}

impl ElementLiveRegion {
    /// `region` gets `aria-live="polite"` and the `sr-only` class.
    pub fn new(region: Element) -> Result<Self> {
        region.set_attribute("aria-live", "polite").map_err(platform)?;
        region.class_list().add_1("sr-only").map_err(platform)?;
        Ok(Self {
            window: window()?,
            region,
            voice_status: None,
            scale_label: None,
            theme_select: None,
            toggles: Vec::new(),
        })
    }

    pub fn with_voice_status(mut self, element: Element) -> Self {
        self.voice_status = Some(element);
        self
    }

    pub fn with_scale_label(mut self, element: Element) -> Self {
        self.scale_label = Some(element);
        self
    }

    pub fn with_theme_select(mut self, select: HtmlSelectElement) -> Self {
        self.theme_select = Some(select);
        self
    }

    /// Keep `aria-pressed` on `button` in sync with a toggle control.
    pub fn with_toggle(mut self, button: Element, control: Control) -> Self {
        self.toggles.push((button, control));
        self
    }
}

impl Announcer for ElementLiveRegion {
    fn announce(&mut self, message: &str) {
        // clearing first makes screen readers repeat identical messages
        self.region.set_text_content(None);
        self.region.set_text_content(Some(message));
    }

    fn notice(&mut self, message: &str) {
        self.announce(message);
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::debug!("alert suppressed: {}", platform(e));
        }
    }

    fn voice_status(&mut self, label: &str) {
        if let Some(el) = &self.voice_status {
            el.set_text_content(Some(label));
        }
    }

    fn preferences_changed(&mut self, record: &PreferenceRecord) {
        if let Some(el) = &self.scale_label {
            el.set_text_content(Some(&format!("{}%", record.font_scale.percent())));
        }
        if let Some(select) = &self.theme_select {
            select.set_value(record.theme.as_ref());
        }
        for (button, control) in &self.toggles {
            let Some(pressed) = control.pressed(record) else {
                continue;
            };
            let value = if pressed { "true" } else { "false" };
            if let Err(e) = button.set_attribute("aria-pressed", value) {
                tracing::debug!("aria-pressed: {}", platform(e));
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
    use web_sys::Event;

    wasm_bindgen_test_configure!(run_in_browser);

    fn recording_sink() -> (EventSink, Rc<RefCell<Vec<PlatformEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&events);
        let sink: EventSink = Rc::new(move |event| seen.borrow_mut().push(event));
        (sink, events)
    }

    fn fire(target: &web_sys::EventTarget, kind: &str) {
        let event = Event::new(kind).expect("event");
        target.dispatch_event(&event).expect("dispatch");
    }

    fn page_calls() -> f64 {
        js_sys::Reflect::get(&window().expect("window"), &JsValue::from_str("__pageVoices"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    #[wasm_bindgen_test]
    fn page_voiceschanged_handler_is_chained_and_restored() {
        let synth = window().expect("window").speech_synthesis().expect("speechSynthesis");
        let page = js_sys::Function::new_no_args(
            "window.__pageVoices = (window.__pageVoices || 0) + 1;",
        );
        synth.set_onvoiceschanged(Some(&page));
        let before = page_calls();

        let (sink, events) = recording_sink();
        let engine = WebSpeechSynthesizer::new(sink).expect("synthesizer");
        fire(&synth, "voiceschanged");
        assert_eq!(*events.borrow(), vec![PlatformEvent::VoicesChanged]);
        assert_eq!(page_calls(), before + 1.0);

        drop(engine);
        let installed = synth.onvoiceschanged().map(JsValue::from);
        assert_eq!(installed, Some(JsValue::from(page)));

        // only the page handler runs once the engine is gone
        fire(&synth, "voiceschanged");
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(page_calls(), before + 2.0);
        synth.set_onvoiceschanged(None);
    }

    #[wasm_bindgen_test]
    fn dropping_the_synthesizer_clears_a_missing_page_handler() {
        let synth = window().expect("window").speech_synthesis().expect("speechSynthesis");
        synth.set_onvoiceschanged(None);
        let (sink, _) = recording_sink();
        drop(WebSpeechSynthesizer::new(sink).expect("synthesizer"));
        assert!(synth.onvoiceschanged().is_none());
        fire(&synth, "voiceschanged");
    }

    #[wasm_bindgen_test]
    fn canceled_utterance_has_no_end_handler() {
        let (sink, events) = recording_sink();
        let mut engine = WebSpeechSynthesizer::new(sink).expect("synthesizer");
        engine.speak(UtteranceId(1), "hello", None).expect("speak");
        let utterance = engine.current.as_ref().expect("current").utterance.clone();
        assert!(utterance.onend().is_some());

        engine.cancel();
        assert!(utterance.onend().is_none());
        fire(&utterance, "end");
        assert!(events.borrow().is_empty());
    }

    #[wasm_bindgen_test]
    fn stopped_recognition_ignores_a_late_end() {
        if !WebSpeechRecognizer::is_available() {
            return;
        }
        let (sink, events) = recording_sink();
        let mut recognizer = WebSpeechRecognizer::new(sink).expect("recognizer");
        if recognizer
            .start(SessionId(1), &RecognitionConfig::default())
            .is_err()
        {
            return;
        }
        let recognition = recognizer.active.as_ref().expect("session").recognition.clone();

        recognizer.stop();
        assert!(recognizer.active.is_none());
        assert!(recognition.onend().is_none());
        assert!(recognition.onresult().is_none());
        fire(&recognition, "end");
        assert!(events.borrow().is_empty());
    }
}

//! The self-contained widget: `init(options)` builds the launcher, panel and
//! live region, mounts the engine over them and returns a handle whose
//! `destroy()` undoes all of it.

use super::{
    DocumentRoot, DomPanelHost, ElementLiveRegion, EventSink, LocalStorage, PageText,
    WebSpeechRecognizer, WebSpeechSynthesizer, document, install_panic_hook, key_input, platform,
    prefers_dark_scheme,
};
use crate::Result;
use crate::overlay::{Overlay, OverlayBuilder, PlatformEvent};
use crate::panel::KeyOutcome;
use crate::projector::{PresentationContext, hooks};
use crate::reader::UnsupportedSynthesizer;
use crate::store::UnavailableStore;
use crate::voice::UnsupportedRecognizer;
use crate::widget::{
    Control, Indicator, LAUNCHER_LABEL, PANEL_NOTE, PANEL_TITLE, READY_EVENT, Row, ids, layout,
    theme_options,
};
use a11y_overlay_domain::{OverlayConfig, OverlayError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::{Closure, JsValue, wasm_bindgen};
use web_sys::{Document, Element, Event, EventTarget, HtmlOptionElement, HtmlSelectElement};

type Engine = Overlay<DomPanelHost>;

/* ───────────────────────── engine cell ───────────────────────── */

/// The mounted engine plus platform events that arrived while it was busy.
///
/// Speech callbacks can fire from inside an engine call (a synchronous
/// `end` on cancel), so events are queued and drained once the engine is
/// free again.
#[derive(Default)]
struct EngineCell {
    engine: RefCell<Option<Engine>>,
    pending: RefCell<VecDeque<PlatformEvent>>,
}

impl EngineCell {
    fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        let result = match self.engine.try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().map(f),
            Err(_) => {
                tracing::debug!("engine busy, input dropped");
                None
            }
        };
        self.drain();
        result
    }

    fn post(&self, event: PlatformEvent) {
        self.pending.borrow_mut().push_back(event);
        self.drain();
    }

    fn drain(&self) {
        // the caller holding the engine drains when it returns
        let Ok(mut slot) = self.engine.try_borrow_mut() else {
            return;
        };
        let Some(engine) = slot.as_mut() else {
            self.pending.borrow_mut().clear();
            return;
        };
        loop {
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                return;
            };
            engine.handle_event(event);
        }
    }

    fn take(&self) -> Option<Engine> {
        self.pending.borrow_mut().clear();
        self.engine.borrow_mut().take()
    }
}

/* ───────────────────────── listeners ───────────────────────── */

/// An event listener that removes itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(platform)?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            tracing::debug!("removing {} listener: {}", self.kind, platform(e));
        }
    }
}

/* ───────────────────────── DOM ───────────────────────── */

fn element(document: &Document, tag: &str, attributes: &[(&str, &str)]) -> Result<Element> {
    let el = document.create_element(tag).map_err(platform)?;
    for (name, value) in attributes {
        el.set_attribute(name, value).map_err(platform)?;
    }
    Ok(el)
}

fn text_element(
    document: &Document,
    tag: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<Element> {
    let el = element(document, tag, attributes)?;
    el.set_text_content(Some(text));
    Ok(el)
}

/// Nodes created by the widget.
struct Nodes {
    launcher: Element,
    panel: Element,
    live: Element,
    theme_select: HtmlSelectElement,
    scale_label: Option<Element>,
    voice_status: Option<Element>,
    toggles: Vec<(Element, Control)>,
}

impl Nodes {
    fn build(document: &Document, rows: &[Row]) -> Result<Self> {
        let launcher = element(
            document,
            "button",
            &[
                ("id", ids::LAUNCHER),
                ("type", "button"),
                ("class", "a11y-btn"),
                ("aria-label", LAUNCHER_LABEL),
                ("title", "Accessibility options"),
                ("aria-haspopup", "dialog"),
                ("aria-expanded", "false"),
                ("aria-controls", ids::PANEL),
            ],
        )?;
        let icon = text_element(document, "span", &[("aria-hidden", "true")], "\u{267f}")?;
        launcher.append_child(&icon).map_err(platform)?;

        let panel = element(
            document,
            "div",
            &[
                ("id", ids::PANEL),
                ("class", "a11y-panel"),
                ("role", "dialog"),
                ("aria-modal", "true"),
                ("aria-label", PANEL_TITLE),
                ("aria-hidden", "true"),
                ("tabindex", "-1"),
            ],
        )?;
        let header = element(document, "div", &[("class", "a11y-hdr")])?;
        header
            .append_child(&text_element(document, "span", &[], PANEL_TITLE)?)
            .map_err(platform)?;
        panel.append_child(&header).map_err(platform)?;

        let select = element(
            document,
            "select",
            &[("id", ids::THEME_SELECT), ("class", "a11y-select"), ("aria-label", "Theme")],
        )?;
        let theme_select: HtmlSelectElement = select
            .dyn_into()
            .map_err(|_| OverlayError::Platform("select is not a HtmlSelectElement".into()))?;
        for (value, label) in theme_options() {
            let option =
                HtmlOptionElement::new_with_text_and_value(label, value).map_err(platform)?;
            theme_select.append_child(&option).map_err(platform)?;
        }

        let mut nodes = Self {
            launcher,
            panel,
            live: element(document, "div", &[("id", ids::LIVE_REGION)])?,
            theme_select,
            scale_label: None,
            voice_status: None,
            toggles: Vec::new(),
        };
        for row in rows {
            let row_el = nodes.build_row(document, row)?;
            nodes.panel.append_child(&row_el).map_err(platform)?;
        }
        let note = text_element(document, "div", &[("class", "a11y-note")], PANEL_NOTE)?;
        nodes.panel.append_child(&note).map_err(platform)?;
        Ok(nodes)
    }

    fn build_row(&mut self, document: &Document, row: &Row) -> Result<Element> {
        let row_el = element(document, "div", &[("class", "a11y-row")])?;
        row_el
            .append_child(&text_element(document, "div", &[], row.heading)?)
            .map_err(platform)?;
        let actions = element(document, "div", &[("class", "a11y-actions")])?;

        if row.theme_select {
            actions.append_child(&self.theme_select).map_err(platform)?;
        }
        for control in &row.controls {
            let toggle = control.is_toggle();
            let button = text_element(
                document,
                "button",
                &[
                    ("id", control.id()),
                    ("type", "button"),
                    ("class", if toggle { "a11y-chip" } else { "a11y-ctrl" }),
                    ("aria-label", control.label()),
                    ("title", control.label()),
                ],
                control.text(),
            )?;
            if toggle {
                button.set_attribute("aria-pressed", "false").map_err(platform)?;
                self.toggles.push((button.clone(), *control));
            }
            actions.append_child(&button).map_err(platform)?;
        }
        if let Some(indicator) = row.indicator {
            let pill = element(
                document,
                "span",
                &[("id", indicator.id()), ("class", "a11y-pill")],
            )?;
            actions.append_child(&pill).map_err(platform)?;
            match indicator {
                Indicator::ScaleLabel => self.scale_label = Some(pill),
                Indicator::VoiceStatus => self.voice_status = Some(pill),
            }
        }
        row_el.append_child(&actions).map_err(platform)?;
        Ok(row_el)
    }

    fn attach(&self, document: &Document) -> Result<()> {
        let body = document
            .body()
            .ok_or_else(|| OverlayError::Platform("no body".into()))?;
        body.append_child(&self.launcher).map_err(platform)?;
        body.append_child(&self.panel).map_err(platform)?;
        body.append_child(&self.live).map_err(platform)?;
        Ok(())
    }

    fn remove(&self) {
        self.launcher.remove();
        self.panel.remove();
        self.live.remove();
    }
}

/* ───────────────────────── mount ───────────────────────── */

fn options(value: &JsValue) -> Result<OverlayConfig> {
    if value.is_undefined() || value.is_null() {
        return Ok(OverlayConfig::default());
    }
    let json = js_sys::JSON::stringify(value).map_err(platform)?;
    OverlayConfig::from_json(&String::from(json))
}

fn builder(
    document_root: DocumentRoot,
    host: DomPanelHost,
    config: OverlayConfig,
    announcer: ElementLiveRegion,
    sink: &EventSink,
) -> OverlayBuilder<DomPanelHost> {
    let mut builder = Overlay::builder(document_root, host)
        .config(config)
        .announcer(announcer)
        .prefers_dark(prefers_dark_scheme);
    builder = match LocalStorage::new() {
        Ok(storage) => builder.store(storage),
        Err(e) => {
            tracing::warn!("{e}, preferences last for this page only");
            builder.store(UnavailableStore)
        }
    };
    builder = match WebSpeechSynthesizer::new(Rc::clone(sink)) {
        Ok(synth) => builder.synthesizer(synth),
        Err(_) => builder.synthesizer(UnsupportedSynthesizer),
    };
    builder = match WebSpeechRecognizer::new(Rc::clone(sink)) {
        Ok(recognizer) => builder.recognizer(recognizer),
        Err(_) => builder.recognizer(UnsupportedRecognizer),
    };
    match PageText::new() {
        Ok(text) => builder.text_source(text),
        Err(e) => {
            tracing::debug!("page text unavailable: {e}");
            builder
        }
    }
}

fn listen(cell: &Rc<EngineCell>, nodes: &Nodes, document: &Document) -> Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(5);

    let engine = Rc::clone(cell);
    listeners.push(Listener::new(&nodes.launcher, "click", move |_| {
        engine.with(|overlay| overlay.toggle_panel());
    })?);

    let engine = Rc::clone(cell);
    listeners.push(Listener::new(&nodes.panel, "click", move |event: Event| {
        let Some(control) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("button[id]").ok().flatten())
            .and_then(|button| Control::from_id(&button.id()))
        else {
            return;
        };
        if let Some(Err(e)) = engine.with(|overlay| overlay.activate(control)) {
            tracing::debug!("{:?} not applied: {}", control, e);
        }
    })?);

    let engine = Rc::clone(cell);
    let select = nodes.theme_select.clone();
    listeners.push(Listener::new(&nodes.theme_select, "change", move |_| {
        let value = select.value();
        if let Some(Err(e)) = engine.with(|overlay| overlay.set_theme_named(&value)) {
            tracing::warn!("theme {:?} rejected: {}", value, e);
        }
    })?);

    let engine = Rc::clone(cell);
    listeners.push(Listener::new(document, "keydown", move |event: Event| {
        let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        let input = key_input(key);
        if engine.with(|overlay| overlay.handle_key(&input)) == Some(KeyOutcome::Handled) {
            event.prevent_default();
        }
    })?);

    let engine = Rc::clone(cell);
    listeners.push(Listener::new(document, "pointerdown", move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        engine.with(|overlay| overlay.handle_pointer_down(&target));
    })?);

    Ok(listeners)
}

/// A mounted widget. Dropping the handle (or freeing it from JavaScript)
/// tears the widget down like `destroy()`.
#[wasm_bindgen]
pub struct WidgetHandle {
    cell: Rc<EngineCell>,
    listeners: Vec<Listener>,
    live: Element,
}

#[wasm_bindgen]
impl WidgetHandle {
    /// Stop speech, remove every created node and restore the page.
    pub fn destroy(self) {}
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        self.listeners.clear();
        if let Some(engine) = self.cell.take() {
            engine.teardown();
        }
        self.live.remove();
        tracing::debug!("widget destroyed");
    }
}

/// Mount the widget with `options` (an object of [`OverlayConfig`] fields).
#[wasm_bindgen]
pub fn init(options_value: JsValue) -> std::result::Result<WidgetHandle, JsValue> {
    mount(&options_value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn mount(options_value: &JsValue) -> Result<WidgetHandle> {
    install_panic_hook();
    let config = options(options_value)?;
    let document = document()?;
    let root = DocumentRoot::new()?;
    if root.has_class(hooks::BASE_CLASS) {
        return Err(OverlayError::AlreadyMounted);
    }

    let nodes = Nodes::build(&document, &layout(config.features()))?;

    let cell = Rc::new(EngineCell::default());
    let weak = Rc::downgrade(&cell);
    let sink: EventSink = Rc::new(move |event| {
        if let Some(cell) = weak.upgrade() {
            cell.post(event);
        }
    });

    let mut announcer = ElementLiveRegion::new(nodes.live.clone())?
        .with_theme_select(nodes.theme_select.clone());
    if let Some(label) = &nodes.scale_label {
        announcer = announcer.with_scale_label(label.clone());
    }
    if let Some(status) = &nodes.voice_status {
        announcer = announcer.with_voice_status(status.clone());
    }
    for (button, control) in &nodes.toggles {
        announcer = announcer.with_toggle(button.clone(), *control);
    }

    let host = DomPanelHost::new(nodes.launcher.clone(), nodes.panel.clone())?;
    let mounted = nodes
        .attach(&document)
        .and_then(|()| builder(root, host, config, announcer, &sink).mount());
    let overlay = match mounted {
        Ok(overlay) => overlay,
        Err(e) => {
            nodes.remove();
            return Err(e);
        }
    };
    *cell.engine.borrow_mut() = Some(overlay);

    let listeners = match listen(&cell, &nodes, &document) {
        Ok(listeners) => listeners,
        Err(e) => {
            if let Some(engine) = cell.take() {
                engine.teardown();
            }
            nodes.remove();
            return Err(e);
        }
    };

    match Event::new(READY_EVENT) {
        Ok(ready) => {
            if let Err(e) = document.dispatch_event(&ready) {
                tracing::debug!("{} listener threw: {}", READY_EVENT, platform(e));
            }
        }
        Err(e) => tracing::debug!("cannot create {}: {}", READY_EVENT, platform(e)),
    }
    tracing::debug!("widget mounted");

    Ok(WidgetHandle {
        cell,
        listeners,
        live: nodes.live,
    })
}

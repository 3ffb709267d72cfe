//! Panel controller: visibility, focus capture/restore and the focus trap.

use a11y_overlay_domain::PanelState;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The embedding surface the panel lives in.
///
/// Implemented over real DOM nodes by the `web` feature and over plain ids
/// in tests. Every method is synchronous.
pub trait FocusHost {
    /// Handle to a focusable node.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Currently focused node, if any.
    fn active_element(&self) -> Option<Self::Node>;

    fn focus(&mut self, node: &Self::Node);

    /// Whether `node` is still in the document.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// The panel container itself.
    fn panel(&self) -> Self::Node;

    /// Focusable controls inside the panel, in tab order.
    fn panel_focusables(&self) -> Vec<Self::Node>;

    /// Whether `node` is the panel, the trigger, or a descendant of either.
    fn is_within_overlay(&self, node: &Self::Node) -> bool;

    fn set_panel_visible(&mut self, visible: bool);

    /// Reflect the panel state on the trigger's `aria-expanded`.
    fn set_trigger_expanded(&mut self, expanded: bool);

    /// Remove every node the overlay created.
    fn detach(&mut self);
}

impl<T: FocusHost + ?Sized> FocusHost for Rc<RefCell<T>> {
    type Node = T::Node;

    fn active_element(&self) -> Option<Self::Node> {
        self.borrow().active_element()
    }
    fn focus(&mut self, node: &Self::Node) {
        self.borrow_mut().focus(node)
    }
    fn is_attached(&self, node: &Self::Node) -> bool {
        self.borrow().is_attached(node)
    }
    fn panel(&self) -> Self::Node {
        self.borrow().panel()
    }
    fn panel_focusables(&self) -> Vec<Self::Node> {
        self.borrow().panel_focusables()
    }
    fn is_within_overlay(&self, node: &Self::Node) -> bool {
        self.borrow().is_within_overlay(node)
    }
    fn set_panel_visible(&mut self, visible: bool) {
        self.borrow_mut().set_panel_visible(visible)
    }
    fn set_trigger_expanded(&mut self, expanded: bool) {
        self.borrow_mut().set_trigger_expanded(expanded)
    }
    fn detach(&mut self) {
        self.borrow_mut().detach()
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Char(char),
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        match (key, chars.next(), chars.next()) {
            ("Escape" | "Esc", _, _) => Self::Escape,
            ("Tab", _, _) => Self::Tab,
            (_, Some(c), None) => Self::Char(c),
            _ => Self::Other(key.to_string()),
        }
    }
}

/// A keydown with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            alt: false,
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Alt+Shift+A, the global "open panel" shortcut.
    pub fn is_open_shortcut(&self) -> bool {
        self.alt
            && self.shift
            && !self.ctrl
            && !self.meta
            && matches!(self.key, Key::Char('a' | 'A'))
    }
}

/// What the host should do with the key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; the host must prevent the default action.
    Handled,
    Ignored,
}

/// Result of an open/close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTransition {
    Opened,
    Closed,
    Unchanged,
}

/// CLOSED <-> OPEN state machine with focus bookkeeping.
pub struct PanelController<H: FocusHost> {
    host: H,
    state: PanelState,
    restore_to: Option<H::Node>,
}

impl<H: FocusHost> PanelController<H> {
    /// Starts closed; hides the panel and collapses the trigger.
    pub fn new(mut host: H) -> Self {
        host.set_panel_visible(false);
        host.set_trigger_expanded(false);
        Self {
            host,
            state: PanelState::Closed,
            restore_to: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn open(&mut self) -> PanelTransition {
        if self.is_open() {
            return PanelTransition::Unchanged;
        }
        self.restore_to = self.host.active_element();
        self.host.set_panel_visible(true);
        self.host.set_trigger_expanded(true);
        self.state = PanelState::Open;

        let target = match self.host.panel_focusables().into_iter().next() {
            Some(first) => first,
            None => self.host.panel(),
        };
        self.host.focus(&target);
        tracing::debug!("panel opened, focus moved to {:?}", target);
        PanelTransition::Opened
    }

    pub fn close(&mut self) -> PanelTransition {
        if !self.is_open() {
            return PanelTransition::Unchanged;
        }
        self.host.set_panel_visible(false);
        self.host.set_trigger_expanded(false);
        self.state = PanelState::Closed;

        if let Some(previous) = self.restore_to.take() {
            if self.host.is_attached(&previous) {
                self.host.focus(&previous);
            } else {
                tracing::debug!("focus origin {:?} detached, not restored", previous);
            }
        }
        PanelTransition::Closed
    }

    pub fn toggle(&mut self) -> PanelTransition {
        if self.is_open() { self.close() } else { self.open() }
    }

    /// Global keydown handling: shortcut, Escape and the focus trap.
    pub fn handle_key(&mut self, input: &KeyInput) -> KeyOutcome {
        if input.is_open_shortcut() {
            self.open();
            return KeyOutcome::Handled;
        }
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match input.key {
            Key::Escape => {
                self.close();
                KeyOutcome::Handled
            }
            Key::Tab => self.trap_tab(input.shift),
            _ => KeyOutcome::Ignored,
        }
    }

    fn trap_tab(&mut self, backwards: bool) -> KeyOutcome {
        let nodes = self.host.panel_focusables();
        let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
            let panel = self.host.panel();
            self.host.focus(&panel);
            return KeyOutcome::Handled;
        };
        let wrap_to = match self.host.active_element() {
            Some(active) if backwards && &active == first => last,
            Some(active) if !backwards && &active == last => first,
            Some(active) if nodes.contains(&active) => return KeyOutcome::Ignored,
            // Focus escaped the panel; pull it back in.
            _ => {
                if backwards {
                    last
                } else {
                    first
                }
            }
        };
        let wrap_to = wrap_to.clone();
        self.host.focus(&wrap_to);
        KeyOutcome::Handled
    }

    /// Pointer press anywhere in the document. Closes on outside clicks.
    pub fn handle_pointer_down(&mut self, target: &H::Node) -> bool {
        if self.is_open() && !self.host.is_within_overlay(target) {
            self.close();
            return true;
        }
        false
    }

    /// Close and remove the overlay's nodes. Focus goes back to the origin
    /// first while it is still in the page, so it never lands on a removed
    /// node.
    pub fn detach(&mut self) {
        self.close();
        self.restore_to = None;
        self.host.set_panel_visible(false);
        self.host.set_trigger_expanded(false);
        self.host.detach();
    }
}

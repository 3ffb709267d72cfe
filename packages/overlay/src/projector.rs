//! Projection of the preference record onto the document root.
//!
//! The projector writes only the hooks listed in [`hooks`], through a
//! single-writer [`PresentationContext`]. Host styling consumes those hooks;
//! nothing here touches inline styles of host elements.

use crate::styles::StyleSheet;
use a11y_overlay_domain::{FeatureSet, OverlayConfig, PreferenceRecord};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Documented presentation hooks on the document root.
pub mod hooks {
    /// Numeric font scale consumed by root typography.
    pub const FONT_SCALE_PROPERTY: &str = "--a11y-font-scale";
    /// Theme name consumed by theme-scoped rules.
    pub const THEME_ATTRIBUTE: &str = "data-a11y-theme";
    /// Dyslexia-friendly typography.
    pub const DYSLEXIA_CLASS: &str = "a11y-dyslexia";
    /// Derived compact panel layout (`"true"` / `"false"`).
    pub const COMPACT_ATTRIBUTE: &str = "data-a11y-compact";
    pub const FOCUS_HIGHLIGHT_CLASS: &str = "a11y-focus-highlight";
    pub const BIG_CURSOR_CLASS: &str = "a11y-big-cursor";
    /// Present while an overlay is mounted; scopes every rule.
    pub const BASE_CLASS: &str = "a11y-base";
    pub const ACCENT_PROPERTY: &str = "--a11y-accent";
    pub const BOTTOM_PROPERTY: &str = "--a11y-bottom";
    pub const SIDE_PROPERTY: &str = "--a11y-side";
}

/// Global document state the overlay is allowed to write.
pub trait PresentationContext {
    /// Custom property on the root element's inline style.
    fn property(&self, name: &str) -> Option<String>;
    fn set_property(&mut self, name: &str, value: &str);
    fn remove_property(&mut self, name: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);

    fn has_class(&self, name: &str) -> bool;
    fn set_class(&mut self, name: &str, on: bool);

    /// Insert the overlay stylesheet, replacing a previous one.
    fn install_stylesheet(&mut self, sheet: &StyleSheet);
    /// Remove the overlay stylesheet if present.
    fn remove_stylesheet(&mut self);
}

impl<T: PresentationContext + ?Sized> PresentationContext for Box<T> {
    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }
    fn set_property(&mut self, name: &str, value: &str) {
        (**self).set_property(name, value)
    }
    fn remove_property(&mut self, name: &str) {
        (**self).remove_property(name)
    }
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }
    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value)
    }
    fn remove_attribute(&mut self, name: &str) {
        (**self).remove_attribute(name)
    }
    fn has_class(&self, name: &str) -> bool {
        (**self).has_class(name)
    }
    fn set_class(&mut self, name: &str, on: bool) {
        (**self).set_class(name, on)
    }
    fn install_stylesheet(&mut self, sheet: &StyleSheet) {
        (**self).install_stylesheet(sheet)
    }
    fn remove_stylesheet(&mut self) {
        (**self).remove_stylesheet()
    }
}

impl<T: PresentationContext + ?Sized> PresentationContext for Rc<RefCell<T>> {
    fn property(&self, name: &str) -> Option<String> {
        self.borrow().property(name)
    }
    fn set_property(&mut self, name: &str, value: &str) {
        self.borrow_mut().set_property(name, value)
    }
    fn remove_property(&mut self, name: &str) {
        self.borrow_mut().remove_property(name)
    }
    fn attribute(&self, name: &str) -> Option<String> {
        self.borrow().attribute(name)
    }
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.borrow_mut().set_attribute(name, value)
    }
    fn remove_attribute(&mut self, name: &str) {
        self.borrow_mut().remove_attribute(name)
    }
    fn has_class(&self, name: &str) -> bool {
        self.borrow().has_class(name)
    }
    fn set_class(&mut self, name: &str, on: bool) {
        self.borrow_mut().set_class(name, on)
    }
    fn install_stylesheet(&mut self, sheet: &StyleSheet) {
        self.borrow_mut().install_stylesheet(sheet)
    }
    fn remove_stylesheet(&mut self) {
        self.borrow_mut().remove_stylesheet()
    }
}

/// Document root held in memory, for headless use and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    pub properties: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub stylesheet: Option<StyleSheet>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationContext for MemoryDocument {
    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }
    fn remove_property(&mut self, name: &str) {
        self.properties.remove(name);
    }
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
    fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }
    fn set_class(&mut self, name: &str, on: bool) {
        if on {
            self.classes.insert(name.to_string());
        } else {
            self.classes.remove(name);
        }
    }
    fn install_stylesheet(&mut self, sheet: &StyleSheet) {
        self.stylesheet = Some(sheet.clone());
    }
    fn remove_stylesheet(&mut self) {
        self.stylesheet = None;
    }
}

/// One write to a documented hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookWrite {
    Property(&'static str, String),
    Attribute(&'static str, String),
    Class(&'static str, bool),
}

impl HookWrite {
    fn write_to<C: PresentationContext + ?Sized>(&self, ctx: &mut C) {
        match self {
            Self::Property(name, value) => ctx.set_property(name, value),
            Self::Attribute(name, value) => ctx.set_attribute(name, value),
            Self::Class(name, on) => ctx.set_class(name, *on),
        }
    }
}

/// The complete set of hook writes for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub writes: Vec<HookWrite>,
}

impl Projection {
    pub fn write_to<C: PresentationContext + ?Sized>(&self, ctx: &mut C) {
        for write in &self.writes {
            write.write_to(ctx);
        }
    }
}

/// Maps preference records onto document hooks.
///
/// Stateless apart from the feature set; never reads or writes the record.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    features: FeatureSet,
}

impl Projector {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    /// Pure mapping from record to hook writes.
    pub fn project(&self, record: &PreferenceRecord) -> Projection {
        let mut writes = vec![
            HookWrite::Property(hooks::FONT_SCALE_PROPERTY, record.font_scale.css_value()),
            HookWrite::Attribute(hooks::THEME_ATTRIBUTE, record.theme.to_string()),
            HookWrite::Class(hooks::DYSLEXIA_CLASS, record.dyslexia_font),
            HookWrite::Attribute(
                hooks::COMPACT_ATTRIBUTE,
                record.font_scale.is_compact().to_string(),
            ),
        ];
        if self.features.focus_highlight {
            writes.push(HookWrite::Class(
                hooks::FOCUS_HIGHLIGHT_CLASS,
                record.focus_highlight,
            ));
        }
        if self.features.big_cursor {
            writes.push(HookWrite::Class(hooks::BIG_CURSOR_CLASS, record.big_cursor));
        }
        Projection { writes }
    }

    /// Idempotent: applying the same record twice equals applying it once.
    pub fn apply<C: PresentationContext + ?Sized>(&self, record: &PreferenceRecord, ctx: &mut C) {
        self.project(record).write_to(ctx);
    }

    /// Hooks written once at mount: scoping class and placement variables.
    pub fn mount_writes(config: &OverlayConfig) -> Projection {
        Projection {
            writes: vec![
                HookWrite::Class(hooks::BASE_CLASS, true),
                HookWrite::Property(hooks::ACCENT_PROPERTY, config.accent.clone()),
                HookWrite::Property(hooks::BOTTOM_PROPERTY, config.bottom_offset.clone()),
                HookWrite::Property(hooks::SIDE_PROPERTY, config.side_offset.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SavedHook {
    Property(&'static str, Option<String>),
    Attribute(&'static str, Option<String>),
    Class(&'static str, bool),
}

/// Values of every documented hook before the overlay mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSnapshot {
    saved: Vec<SavedHook>,
}

impl RootSnapshot {
    const PROPERTIES: [&'static str; 4] = [
        hooks::FONT_SCALE_PROPERTY,
        hooks::ACCENT_PROPERTY,
        hooks::BOTTOM_PROPERTY,
        hooks::SIDE_PROPERTY,
    ];
    const ATTRIBUTES: [&'static str; 2] = [hooks::THEME_ATTRIBUTE, hooks::COMPACT_ATTRIBUTE];
    const CLASSES: [&'static str; 4] = [
        hooks::BASE_CLASS,
        hooks::DYSLEXIA_CLASS,
        hooks::FOCUS_HIGHLIGHT_CLASS,
        hooks::BIG_CURSOR_CLASS,
    ];

    pub fn capture<C: PresentationContext + ?Sized>(ctx: &C) -> Self {
        let properties = Self::PROPERTIES
            .iter()
            .map(|&name| SavedHook::Property(name, ctx.property(name)));
        let attributes = Self::ATTRIBUTES
            .iter()
            .map(|&name| SavedHook::Attribute(name, ctx.attribute(name)));
        let classes = Self::CLASSES
            .iter()
            .map(|&name| SavedHook::Class(name, ctx.has_class(name)));
        Self {
            saved: properties.chain(attributes).chain(classes).collect(),
        }
    }

    /// Put every hook back the way it was found.
    pub fn restore<C: PresentationContext + ?Sized>(&self, ctx: &mut C) {
        for hook in &self.saved {
            match hook {
                SavedHook::Property(name, Some(value)) => ctx.set_property(name, value),
                SavedHook::Property(name, None) => ctx.remove_property(name),
                SavedHook::Attribute(name, Some(value)) => ctx.set_attribute(name, value),
                SavedHook::Attribute(name, None) => ctx.remove_attribute(name),
                SavedHook::Class(name, on) => ctx.set_class(name, *on),
            }
        }
    }
}

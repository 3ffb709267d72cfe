//! Durable preference persistence.
//!
//! The overlay keeps the whole [`PreferenceRecord`] under a single key. A
//! store that refuses writes only costs persistence: the in-memory record
//! stays authoritative for the session.

use crate::Result;
use a11y_overlay_domain::{OverlayError, PreferenceRecord, Theme};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key holding the serialized preference record.
pub const PREFERENCES_KEY: &str = "__a11y_prefs__";

/// String key-value medium (browser `localStorage`, a file, memory).
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value in one step.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<RefCell<T>> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.borrow_mut().remove(key)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    /// Raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store standing in for disabled or full storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(OverlayError::StorageUnavailable("storage disabled".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(OverlayError::StorageUnavailable("storage disabled".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(OverlayError::StorageUnavailable("storage disabled".into()))
    }
}

/// Loads and saves the preference record through a [`KeyValueStore`].
#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: S,
    key: Cow<'static, str>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Wrap `store` using [`PREFERENCES_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, PREFERENCES_KEY)
    }

    pub fn with_key(store: S, key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and repair the stored record. Never fails.
    ///
    /// `system_theme` is called at most once, and only when no theme was
    /// stored.
    pub fn load(&self, system_theme: impl FnOnce() -> Theme) -> PreferenceRecord {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("preferences not readable, using defaults: {}", e);
                None
            }
        };
        PreferenceRecord::repair(raw.as_deref(), system_theme)
    }

    /// Write the full record.
    ///
    /// Failures are logged and swallowed; returns whether the write landed.
    pub fn save(&mut self, record: &PreferenceRecord) -> bool {
        match self.store.set(&self.key, &record.to_json()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("preferences not persisted: {}", e);
                false
            }
        }
    }

    /// Forget the stored record.
    pub fn clear(&mut self) -> bool {
        self.store.remove(&self.key).is_ok()
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

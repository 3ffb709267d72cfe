//! Assistive-technology live region and panel status reflection.

use a11y_overlay_domain::PreferenceRecord;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives human-readable status updates.
pub trait Announcer {
    /// Polite live-region announcement.
    fn announce(&mut self, message: &str);

    /// One-off notice shown at the point of use (capability missing).
    fn notice(&mut self, message: &str) {
        self.announce(message);
    }

    /// Voice status indicator ("Idle", "Listening…", "Heard: …").
    fn voice_status(&mut self, _label: &str) {}

    /// Panel controls mirroring the record (scale label, pressed states).
    fn preferences_changed(&mut self, _record: &PreferenceRecord) {}
}

impl<T: Announcer + ?Sized> Announcer for Box<T> {
    fn announce(&mut self, message: &str) {
        (**self).announce(message)
    }
    fn notice(&mut self, message: &str) {
        (**self).notice(message)
    }
    fn voice_status(&mut self, label: &str) {
        (**self).voice_status(label)
    }
    fn preferences_changed(&mut self, record: &PreferenceRecord) {
        (**self).preferences_changed(record)
    }
}

impl<T: Announcer + ?Sized> Announcer for Rc<RefCell<T>> {
    fn announce(&mut self, message: &str) {
        self.borrow_mut().announce(message)
    }
    fn notice(&mut self, message: &str) {
        self.borrow_mut().notice(message)
    }
    fn voice_status(&mut self, label: &str) {
        self.borrow_mut().voice_status(label)
    }
    fn preferences_changed(&mut self, record: &PreferenceRecord) {
        self.borrow_mut().preferences_changed(record)
    }
}

/// Records every update; the live region of headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnnouncer {
    pub announcements: Vec<String>,
    pub notices: Vec<String>,
    pub voice_labels: Vec<String>,
    pub last_record: Option<PreferenceRecord>,
}

impl MemoryAnnouncer {
    pub fn last(&self) -> Option<&str> {
        self.announcements.last().map(String::as_str)
    }
}

impl Announcer for MemoryAnnouncer {
    fn announce(&mut self, message: &str) {
        self.announcements.push(message.to_string());
    }
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
    fn voice_status(&mut self, label: &str) {
        self.voice_labels.push(label.to_string());
    }
    fn preferences_changed(&mut self, record: &PreferenceRecord) {
        self.last_record = Some(*record);
    }
}

//! Text extraction for read-aloud.

use std::cell::RefCell;
use std::rc::Rc;

/// Upper bound on characters handed to the synthesizer per read.
pub const READ_BUDGET_CHARS: usize = 3000;

/// Readable text of the host page.
pub trait TextSource {
    /// The live selection, as the user sees it.
    fn selection(&self) -> Option<String>;

    /// Text of visible text nodes in document order.
    ///
    /// Implementations may stop early once they have produced `budget`
    /// characters.
    fn visible_text(&self, budget: usize) -> Vec<String>;
}

impl<T: TextSource + ?Sized> TextSource for Box<T> {
    fn selection(&self) -> Option<String> {
        (**self).selection()
    }
    fn visible_text(&self, budget: usize) -> Vec<String> {
        (**self).visible_text(budget)
    }
}

impl<T: TextSource + ?Sized> TextSource for Rc<RefCell<T>> {
    fn selection(&self) -> Option<String> {
        self.borrow().selection()
    }
    fn visible_text(&self, budget: usize) -> Vec<String> {
        self.borrow().visible_text(budget)
    }
}

/// Page without readable text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoText;

impl TextSource for NoText {
    fn selection(&self) -> Option<String> {
        None
    }
    fn visible_text(&self, _budget: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Static text, for headless use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticText {
    pub selection: Option<String>,
    pub nodes: Vec<String>,
}

impl TextSource for StaticText {
    fn selection(&self) -> Option<String> {
        self.selection.clone()
    }
    fn visible_text(&self, _budget: usize) -> Vec<String> {
        self.nodes.clone()
    }
}

fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The trimmed selection, if it has any content.
pub fn selected_text<T: TextSource + ?Sized>(source: &T, budget: usize) -> Option<String> {
    let selection = source.selection()?;
    let trimmed = selection.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, budget).to_string())
}

/// Text to read for "read page": the selection if non-empty, else visible
/// text nodes joined by spaces, cut at `budget` characters.
pub fn collect_page_text<T: TextSource + ?Sized>(source: &T, budget: usize) -> String {
    if let Some(selection) = selected_text(source, budget) {
        return selection;
    }

    let mut text = String::new();
    let mut chars = 0;
    for node in source.visible_text(budget) {
        if chars >= budget {
            break;
        }
        let node = node.trim();
        if node.is_empty() {
            continue;
        }
        text.push_str(node);
        text.push(' ');
        chars += node.chars().count() + 1;
    }
    truncate_chars(&text, budget).trim_end().to_string()
}

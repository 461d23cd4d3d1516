use std::collections::HashMap;

use scribe_core::position::replace_range;

use super::types::TextDocumentContentChangeEvent;

/// In-memory mirror of the documents the editor has opened.
///
/// The server never mutates documents on its own; it only tracks the
/// editor's synchronization notifications so ranged requests can be
/// answered against current text.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: HashMap<String, String>,
}

impl DocumentStore {
    pub fn open(&mut self, uri: String, text: String) {
        self.docs.insert(uri, text);
    }

    pub fn close(&mut self, uri: &str) {
        self.docs.remove(uri);
    }

    pub fn text(&self, uri: &str) -> Option<&str> {
        self.docs.get(uri).map(String::as_str)
    }

    /// Apply editor content changes in order. A change without a range
    /// replaces the whole document.
    pub fn apply_changes(&mut self, uri: &str, changes: &[TextDocumentContentChangeEvent]) {
        let Some(doc) = self.docs.get_mut(uri) else {
            log::warn!("change notification for unopened document: {uri}");
            return;
        };

        for change in changes {
            match &change.range {
                Some(range) => {
                    *doc = replace_range(doc, range.start.into(), range.end.into(), &change.text);
                }
                None => {
                    *doc = change.text.clone();
                }
            }
        }
    }
}

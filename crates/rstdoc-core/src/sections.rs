//! Section scope tracking.
//!
//! The tracker owns the registry of open sections: titles whose closing
//! `SectionEnd` marker has not been emitted yet. Titles are registered in
//! the order they were opened and are closed either on request (a sibling or
//! shallower title appears) or by the end-of-document sweep.
//!
//! Closing is keyed on title identity. Closing a title that is not open is a
//! no-op, so a section can never be closed twice.
//!
//! Both the sweep and `close_from_level` walk the registry in insertion order,
//! not most-recent-first: with `T1` (level 1) and `T2` (level 2) open, the
//! markers come out as `SectionEnd(T1)`, `SectionEnd(T2)`.

use crate::ast::{Document, Node, SectionEnd, Title, TitleId};

/// Registry of open sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenSections {
    open: Vec<Title>,
}

impl OpenSections {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a title as open. A title already open is not added twice.
    pub fn open(&mut self, title: &Title) {
        if self.contains(title.id) {
            return;
        }
        log::trace!("open section {:?} level {}", title.id, title.level);
        self.open.push(title.clone());
    }

    /// Append a `SectionEnd` for `id` to `document` and forget the title.
    ///
    /// Returns false, without touching the document, if `id` is not open.
    pub fn end_open_section(&mut self, document: &mut Document, id: TitleId) -> bool {
        let Some(index) = self.open.iter().position(|title| title.id == id) else {
            return false;
        };
        let level = self.open[index].level;
        document.push(Node::SectionEnd(SectionEnd { title: id, level }));
        self.open.remove(index);
        log::trace!("close section {:?}", id);
        true
    }

    /// Close every open section whose level is `level` or deeper, in
    /// registry order.
    pub fn close_from_level(&mut self, document: &mut Document, level: usize) {
        let ids: Vec<TitleId> = self
            .open
            .iter()
            .filter(|title| title.level >= level)
            .map(|title| title.id)
            .collect();
        for id in ids {
            self.end_open_section(document, id);
        }
    }

    /// Close everything still open, in registry order.
    pub fn close_all(&mut self, document: &mut Document) {
        let ids: Vec<TitleId> = self.open.iter().map(|title| title.id).collect();
        for id in ids {
            self.end_open_section(document, id);
        }
    }

    /// Check if a title is currently open.
    pub fn contains(&self, id: TitleId) -> bool {
        self.open.iter().any(|title| title.id == id)
    }

    /// Open titles in the order they were opened.
    pub fn titles(&self) -> &[Title] {
        &self.open
    }

    /// Number of open sections.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Check if no section is open.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Forget every open section without emitting markers.
    pub fn clear(&mut self) {
        self.open.clear();
    }
}

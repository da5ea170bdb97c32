//! Linear, cursor-addressed edit history with page grouping for display.
//!
//! The original entry always sits at index 0: `reset` puts it there, appends
//! only truncate after the cursor, and `delete` refuses to remove it. Edits
//! therefore occupy indices `1..len`, and an edit's position among the
//! non-original entries is its index minus one.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Opaque identity of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub const ORIGINAL: Self = Self(0);

    pub const fn is_original(self) -> bool {
        self.0 == Self::ORIGINAL.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_original() {
            f.write_str("original")
        } else {
            write!(f, "edit-{}", self.0)
        }
    }
}

/// Immutable snapshot of the working image at one point in history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    id: EntryId,
    image: Arc<RgbaImage>,
}

impl HistoryEntry {
    pub const fn id(&self) -> EntryId {
        self.id
    }

    pub const fn is_original(&self) -> bool {
        self.id.is_original()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn shared_image(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.image)
    }
}

#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    next_id: u64,
    page_size: usize,
    page: usize,
}

impl EditHistory {
    pub fn new(original: RgbaImage) -> Self {
        Self::with_page_size(original, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(original: RgbaImage, page_size: usize) -> Self {
        let mut history = Self {
            entries: Vec::new(),
            cursor: 0,
            next_id: 1,
            page_size: page_size.max(1),
            page: 0,
        };
        history.reset(original);
        history
    }

    pub fn reset(&mut self, original: RgbaImage) {
        self.entries.clear();
        self.entries.push(HistoryEntry {
            id: EntryId::ORIGINAL,
            image: Arc::new(original),
        });
        self.cursor = 0;
        self.page = 0;
        tracing::debug!("history reset to original");
    }

    /// Discards the redo branch, then pushes `image` and moves the cursor onto it.
    pub fn append(&mut self, image: RgbaImage) -> EntryId {
        if self.cursor + 1 < self.entries.len() {
            let discarded = self.entries.len() - self.cursor - 1;
            self.entries.truncate(self.cursor + 1);
            tracing::debug!(discarded, "discarded redo branch");
        }

        let id = EntryId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(HistoryEntry {
            id,
            image: Arc::new(image),
        });
        self.cursor = self.entries.len() - 1;
        self.sync_page();
        tracing::debug!(%id, cursor = self.cursor, "history entry appended");
        id
    }

    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.sync_page();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.sync_page();
        true
    }

    /// Moves the cursor onto `id` without touching the list.
    pub fn select(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.cursor = index;
                self.sync_page();
                true
            }
            None => false,
        }
    }

    /// Removes a non-original entry and repairs the cursor.
    pub fn delete(&mut self, id: EntryId) -> bool {
        if id.is_original() {
            tracing::debug!("refusing to delete the original entry");
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };

        self.entries.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        } else if index == self.cursor {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.sync_page();
        tracing::debug!(%id, cursor = self.cursor, "history entry deleted");
        true
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn original(&self) -> &HistoryEntry {
        &self.entries[0]
    }

    /// Newest non-original entry, if any.
    pub fn last_edit(&self) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|entry| !entry.is_original())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn edit_count(&self) -> usize {
        self.entries.len() - 1
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.edit_count().div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= self.page_count() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    /// Non-original entries on the currently shown page.
    pub fn page_entries(&self) -> &[HistoryEntry] {
        let edits = &self.entries[1..];
        let start = (self.page * self.page_size).min(edits.len());
        let end = (start + self.page_size).min(edits.len());
        &edits[start..end]
    }

    fn sync_page(&mut self) {
        self.page = match self.cursor.checked_sub(1) {
            Some(edit_index) => edit_index / self.page_size,
            None => self.page.min(self.page_count() - 1),
        };
    }
}

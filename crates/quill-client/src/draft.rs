//! Draft-body editing: cursor-anchored insertion and marker substitution.
//!
//! Offsets are character offsets, not byte offsets, because the cursor the
//! UI reports counts characters. Both operations are pure; [`DraftBuffer`]
//! wraps them with the cursor bookkeeping the paste flow needs.

use uuid::Uuid;

use quill_core::validate::TITLE_MAX_CHARS;
use quill_shared::dto::StorePostRequest;

fn byte_offset(buffer: &str, char_offset: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_offset)
        .map(|(at, _)| at)
        .unwrap_or(buffer.len())
}

/// Splice `text` into `buffer` between the `start` and `end` character
/// offsets, discarding any selected text between them. Returns the new
/// buffer and the cursor placed immediately after the inserted text.
/// Out-of-range offsets clamp to the buffer end.
pub fn insert_at_cursor(buffer: &str, start: usize, end: usize, text: &str) -> (String, usize) {
    let end = end.max(start);
    let start_byte = byte_offset(buffer, start);
    let end_byte = byte_offset(buffer, end);

    let mut next = String::with_capacity(buffer.len() - (end_byte - start_byte) + text.len());
    next.push_str(&buffer[..start_byte]);
    next.push_str(text);
    next.push_str(&buffer[end_byte..]);

    let cursor = buffer[..start_byte].chars().count() + text.chars().count();
    (next, cursor)
}

/// Replace the first occurrence of `marker` in `buffer` with `resolved`.
///
/// Returns the new buffer and, when the marker was found, the cursor placed
/// after the substituted text. A buffer without the marker comes back
/// unchanged, so applying the same substitution twice equals applying it
/// once. Markers are unique within an editing session (allocator
/// guarantee), which is what makes first-occurrence replacement exact.
pub fn substitute_placeholder(
    buffer: &str,
    marker: &str,
    resolved: &str,
) -> (String, Option<usize>) {
    match buffer.find(marker) {
        Some(at) => {
            let mut next = String::with_capacity(buffer.len() - marker.len() + resolved.len());
            next.push_str(&buffer[..at]);
            next.push_str(resolved);
            next.push_str(&buffer[at + marker.len()..]);

            let cursor = next[..at + resolved.len()].chars().count();
            (next, Some(cursor))
        }
        None => (buffer.to_string(), None),
    }
}

/// A post body under edit, with its cursor/selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    text: String,
    selection: (usize, usize),
}

impl DraftBuffer {
    /// Buffer over `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: (end, end),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Start of the selection; the caret position when nothing is selected.
    pub fn cursor(&self) -> usize {
        self.selection.0
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = (start, end.max(start));
    }

    /// Insert at the cursor, replacing the selection, and collapse the
    /// cursor after the inserted text.
    pub fn insert(&mut self, text: &str) {
        let (next, cursor) = insert_at_cursor(&self.text, self.selection.0, self.selection.1, text);
        self.text = next;
        self.selection = (cursor, cursor);
    }

    /// Resolve an upload marker and park the cursor after the substituted
    /// text. A buffer the marker is no longer part of stays untouched.
    pub fn resolve_marker(&mut self, marker: &str, resolved: &str) {
        let (next, cursor) = substitute_placeholder(&self.text, marker, resolved);
        if let Some(cursor) = cursor {
            self.text = next;
            self.selection = (cursor, cursor);
        }
    }
}

/// Everything the post form holds: title, tag selection, body buffer.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    title: String,
    pub tags: Vec<Uuid>,
    pub body: DraftBuffer,
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title, clamping to the 255-character limit as the form does
    /// while typing. The server check stays authoritative.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(TITLE_MAX_CHARS).collect();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Wire request for creating or updating the drafted post. An empty
    /// title is sent as absent, matching how the form treats it.
    pub fn to_request(&self) -> StorePostRequest {
        StorePostRequest {
            title: (!self.title.is_empty()).then(|| self.title.clone()),
            body: self.body.text().to_string(),
            tags: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_splices_between_offsets() {
        let (next, cursor) = insert_at_cursor("hello world", 5, 5, ",");

        assert_eq!(next, "hello, world");
        assert_eq!(cursor, 6);
    }

    #[test]
    fn insert_replaces_the_selection() {
        let (next, cursor) = insert_at_cursor("hello cruel world", 6, 12, "kind ");

        assert_eq!(next, "hello kind world");
        assert_eq!(cursor, 11);
    }

    #[test]
    fn insert_counts_characters_not_bytes() {
        let (next, cursor) = insert_at_cursor("héllo", 2, 2, "é");

        assert_eq!(next, "hééllo");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn out_of_range_offsets_clamp_to_the_end() {
        let (next, cursor) = insert_at_cursor("abc", 10, 20, "!");

        assert_eq!(next, "abc!");
        assert_eq!(cursor, 4);
    }

    #[test]
    fn substitute_replaces_first_occurrence_only() {
        let (next, cursor) = substitute_placeholder("x [m] y [m]", "[m]", "done");

        assert_eq!(next, "x done y [m]");
        assert_eq!(cursor, Some(6));
    }

    #[test]
    fn substitute_without_marker_is_idempotent() {
        let buffer = "no markers here";

        let (once, cursor) = substitute_placeholder(buffer, "[gone]", "text");
        let (twice, _) = substitute_placeholder(&once, "[gone]", "text");

        assert_eq!(once, buffer);
        assert_eq!(once, twice);
        assert_eq!(cursor, None);
    }

    #[test]
    fn buffer_insert_tracks_the_cursor() {
        let mut buffer = DraftBuffer::new("ab");
        buffer.select(1, 1);

        buffer.insert("--");

        assert_eq!(buffer.text(), "a--b");
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn buffer_resolve_parks_cursor_after_resolved_text() {
        let mut buffer = DraftBuffer::new("a [m] b");

        buffer.resolve_marker("[m]", "![ImageAlt](u)");

        assert_eq!(buffer.text(), "a ![ImageAlt](u) b");
        assert_eq!(buffer.cursor(), 16);
    }

    #[test]
    fn buffer_resolve_skips_absent_marker() {
        let mut buffer = DraftBuffer::new("plain text");
        buffer.select(2, 2);

        buffer.resolve_marker("[m]", "x");

        assert_eq!(buffer.text(), "plain text");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn title_clamps_at_255_characters() {
        let mut draft = PostDraft::new();

        draft.set_title(&"é".repeat(300));

        assert_eq!(draft.title().chars().count(), 255);
    }

    #[test]
    fn request_sends_empty_title_as_absent() {
        let mut draft = PostDraft::new();
        draft.body.insert("body text");

        let req = draft.to_request();

        assert_eq!(req.title, None);
        assert_eq!(req.body, "body text");
        assert!(req.tags.is_empty());
    }
}

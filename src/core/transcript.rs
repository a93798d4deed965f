//! # Transcript
//!
//! The ordered, append-only message log for one session. Entries are never
//! mutated after creation; the transient pending placeholder is removed
//! wholesale and replaced by the resolution entry.
//!
//! The transcript hands out opaque [`EntryId`] handles. The core holds on to
//! the pending entry's handle so it can remove it on resolution; the TUI
//! only iterates entries for display.

/// Opaque handle to a transcript entry. Ids are monotonically increasing
/// and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

/// Who an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// The person asking questions.
    Student,
    /// The answering service (or the local responder standing in for it).
    Helper,
    /// Transient placeholder shown while a request is in flight.
    Pending,
}

/// Entry content plus how the surface should render it.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Verbatim text. Student messages and fallbacks.
    Plain(String),
    /// Markdown from the legacy `answer` field, rendered to styled
    /// terminal text by the surface.
    Markdown(String),
    /// Server-sanitized HTML from the `answer_html` field, rendered as
    /// rich markup.
    Html(String),
}

impl Body {
    /// The raw text content, ignoring the rendering mode.
    pub fn raw(&self) -> &str {
        match self {
            Body::Plain(s) | Body::Markdown(s) | Body::Html(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub author: Author,
    pub body: Body,
}

/// Ordered message log. Append-only except for [`Transcript::remove`],
/// which exists solely so the pending placeholder can be withdrawn.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its handle.
    pub fn append(&mut self, author: Author, body: Body) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, author, body });
        id
    }

    /// Removes the entry with the given handle. Returns false if no such
    /// entry exists (already removed, or never appended).
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the conversation has begun: at least one student or helper
    /// entry. The welcome view is shown until this flips.
    pub fn has_conversation(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.author, Author::Student | Author::Helper))
    }

    /// Count of pending placeholders currently in the log. The reducer
    /// maintains the invariant that this is 0 or 1.
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.author == Author::Pending)
            .count()
    }
}

//! Submitted-input history with shell-style browsing.

/// Previously submitted inputs plus a browsing cursor.
///
/// The cursor always lies in `0..=len`. A cursor equal to `len` means the
/// user is not browsing and the input area shows their live draft. The draft
/// is captured when browsing starts and handed back when the user steps past
/// the newest entry, so half-typed text survives a trip through history.
#[derive(Debug, Clone, Default)]
pub struct InputHistory {
    entries: Vec<String>,
    cursor: usize,
    saved_draft: Option<String>,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted input and stop browsing.
    pub fn append(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
        self.reset_cursor();
    }

    /// Step to the next-older entry.
    ///
    /// `live_draft` is remembered when browsing begins. Returns `None` when
    /// there is nothing older to show.
    pub fn previous(&mut self, live_draft: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }

        if !self.is_browsing() {
            self.saved_draft = Some(live_draft.to_string());
        }

        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step to the next-newer entry, or back to the live draft once the newest
    /// entry has been passed. Returns `None` when not browsing.
    pub fn next(&mut self) -> Option<String> {
        if !self.is_browsing() {
            return None;
        }

        self.cursor += 1;
        if self.cursor == self.entries.len() {
            return Some(self.saved_draft.take().unwrap_or_default());
        }

        self.entries.get(self.cursor).cloned()
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
        self.saved_draft = None;
    }
}

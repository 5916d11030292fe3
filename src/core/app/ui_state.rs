use std::time::{Duration, Instant};

use tui_textarea::{CursorMove, TextArea};

use crate::core::message::{AppMessageKind, Message};

/// How long a status bar message stays visible.
pub const STATUS_LIFETIME: Duration = Duration::from_secs(6);

/// Rows taken by everything except the transcript: header, input box, status line.
pub const CHROME_HEIGHT: u16 = 5;

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutInfo {
    pub width: u16,
    pub height: u16,
}

impl LayoutInfo {
    pub fn transcript_height(&self) -> u16 {
        self.height.saturating_sub(CHROME_HEIGHT).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: AppMessageKind,
    pub set_at: Instant,
}

pub struct UiState {
    pub transcript: Vec<Message>,
    textarea: TextArea<'static>,
    pub status: Option<StatusMessage>,
    /// Lines scrolled up from the bottom of the transcript. Zero follows new output.
    pub scroll_back: u16,
    pub layout: Option<LayoutInfo>,
    pub spinner_frame: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            textarea: TextArea::default(),
            status: None,
            scroll_back: 0,
            layout: None,
            spinner_frame: 0,
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn clear_input(&mut self) {
        self.set_input_text("");
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn push_message(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn add_app_message(&mut self, kind: AppMessageKind, content: impl Into<String>) {
        self.push_message(Message::app(kind, content));
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.scroll_back = 0;
    }

    pub fn set_status(&mut self, kind: AppMessageKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            set_at: Instant::now(),
        });
    }

    /// Drop the status message once it has outlived [`STATUS_LIFETIME`].
    pub fn expire_status(&mut self, now: Instant) {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|status| now.saturating_duration_since(status.set_at) >= STATUS_LIFETIME);
        if expired {
            self.status = None;
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn page_height(&self) -> u16 {
        self.layout
            .map(|layout| layout.transcript_height())
            .unwrap_or(10)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }
}

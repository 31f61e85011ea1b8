use std::time::Instant;

use ratatui::widgets::ListState;
use msgboard_core::reactions::ROW_LEN;
use msgboard_core::{Board, BoardEvent, CharCount, Config, Draft, Message, Notice, ReactionCatalog};

use crate::tui::EventSender;

/// Which part of the screen receives keys. The three form fields are edited
/// in place; everything else is navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Messages,
    Message,
    Author,
    Repository,
}

impl Focus {
    pub fn is_form(self) -> bool {
        self != Focus::Messages
    }

    pub fn next(self) -> Self {
        match self {
            Focus::Messages => Focus::Message,
            Focus::Message => Focus::Author,
            Focus::Author => Focus::Repository,
            Focus::Repository => Focus::Messages,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Messages => Focus::Repository,
            Focus::Message => Focus::Messages,
            Focus::Author => Focus::Message,
            Focus::Repository => Focus::Author,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActiveNotice {
    pub notice: Notice,
    pub shown_at: Instant,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: Focus,

    // Message list (server-authoritative, replaced on every refresh)
    pub messages: Vec<Message>,
    pub list_state: ListState,
    pub reaction_idx: usize,
    pub last_refresh: Option<Instant>,

    // Post form
    pub draft: Draft,
    pub cursor: usize, // char index into the focused field
    pub submitting: bool,

    // Shared error line
    pub notice: Option<ActiveNotice>,

    // Collaborators
    pub catalog: ReactionCatalog,
    pub config: Config,
    pub board: Board,
    pub sink: EventSender,
}

impl App {
    pub fn new(config: Config, catalog: ReactionCatalog, board: Board, sink: EventSender) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Messages,

            messages: Vec::new(),
            list_state: ListState::default(),
            reaction_idx: 0,
            last_refresh: None,

            draft: Draft::default(),
            cursor: 0,
            submitting: false,

            notice: None,

            catalog,
            config,
            board,
            sink,
        }
    }

    pub fn apply_board_event(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::MessagesLoaded(messages) => self.replace_messages(messages),
            BoardEvent::Notice(notice) => self.show_notice(notice),
            BoardEvent::Submitting(busy) => self.submitting = busy,
            BoardEvent::DraftCleared => {
                self.draft.clear();
                self.cursor = 0;
            }
        }
    }

    /// Swap in a fresh list, keeping the selection on the same message id
    /// when it is still present.
    fn replace_messages(&mut self, messages: Vec<Message>) {
        let selected_id = self.selected_message().map(|m| m.id.clone());
        self.messages = messages;
        self.last_refresh = Some(Instant::now());

        let index = selected_id
            .and_then(|id| self.messages.iter().position(|m| m.id == id))
            .or(if self.messages.is_empty() { None } else { Some(0) });
        self.list_state.select(index.map(|i| i.min(self.messages.len() - 1)));
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(ActiveNotice {
            notice,
            shown_at: Instant::now(),
        });
    }

    /// Drop a transient notice once it has been up for the configured time.
    pub fn expire_notice(&mut self, now: Instant) {
        let timeout = self.config.notice_timeout();
        if let Some(active) = &self.notice {
            if !active.notice.persistent && now.duration_since(active.shown_at) >= timeout {
                self.notice = None;
            }
        }
    }

    // Message navigation
    pub fn selected_message(&self) -> Option<&Message> {
        self.list_state.selected().and_then(|i| self.messages.get(i))
    }

    pub fn select_next_message(&mut self) {
        let len = self.messages.len();
        if len > 0 {
            let i = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn select_prev_message(&mut self) {
        if !self.messages.is_empty() {
            let i = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn select_first_message(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last_message(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    // Reaction grid navigation (rows of ROW_LEN)
    pub fn reaction_right(&mut self) {
        if self.reaction_idx + 1 < self.catalog.len() {
            self.reaction_idx += 1;
        }
    }

    pub fn reaction_left(&mut self) {
        self.reaction_idx = self.reaction_idx.saturating_sub(1);
    }

    pub fn reaction_down(&mut self) {
        if self.reaction_idx + ROW_LEN < self.catalog.len() {
            self.reaction_idx += ROW_LEN;
        }
    }

    pub fn reaction_up(&mut self) {
        if self.reaction_idx >= ROW_LEN {
            self.reaction_idx -= ROW_LEN;
        }
    }

    /// The (message id, reaction name) an activation would post.
    pub fn selected_reaction(&self) -> Option<(String, &'static str)> {
        let message = self.selected_message()?;
        let reaction = self.catalog.get(self.reaction_idx)?;
        Some((message.id.clone(), reaction.name))
    }

    // Form editing
    pub fn focus_form(&mut self, focus: Focus) {
        self.focus = focus;
        self.cursor = self.active_field().map(|f| f.chars().count()).unwrap_or(0);
    }

    pub fn active_field(&self) -> Option<&String> {
        match self.focus {
            Focus::Messages => None,
            Focus::Message => Some(&self.draft.message),
            Focus::Author => Some(&self.draft.author),
            Focus::Repository => Some(&self.draft.repository),
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Messages => None,
            Focus::Message => Some(&mut self.draft.message),
            Focus::Author => Some(&mut self.draft.author),
            Focus::Repository => Some(&mut self.draft.repository),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(field) = self.active_field_mut() {
            let byte_pos = char_to_byte_index(field, cursor);
            field.insert(byte_pos, c);
            self.cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor - 1;
        if let Some(field) = self.active_field_mut() {
            let byte_pos = char_to_byte_index(field, cursor);
            field.remove(byte_pos);
            self.cursor = cursor;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        if let Some(field) = self.active_field_mut() {
            if cursor < field.chars().count() {
                let byte_pos = char_to_byte_index(field, cursor);
                field.remove(byte_pos);
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let len = self.active_field().map(|f| f.chars().count()).unwrap_or(0);
        self.cursor = (self.cursor + 1).min(len);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.active_field().map(|f| f.chars().count()).unwrap_or(0);
    }

    pub fn char_count(&self) -> CharCount {
        self.draft.char_count(self.config.max_message_chars)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Sending..."
        } else {
            "Submit"
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

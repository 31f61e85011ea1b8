//! Unsent form input and the character counter shown next to it.

use crate::error::{BoardError, BoardResult};
use crate::message::{NewMessage, DEFAULT_AUTHOR, DEFAULT_REPOSITORY};

pub const DEFAULT_CHAR_LIMIT: usize = 280;
pub const EMPTY_MESSAGE: &str = "Message cannot be empty";

/// What the user has typed into the post form. Lives only as long as the
/// inputs hold it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub message: String,
    pub author: String,
    pub repository: String,
}

impl Draft {
    pub fn new(message: &str, author: &str, repository: &str) -> Self {
        Self {
            message: message.to_string(),
            author: author.to_string(),
            repository: repository.to_string(),
        }
    }

    /// Trim and validate the draft, filling in the default author and
    /// repository for blank fields.
    pub fn prepare(&self) -> BoardResult<NewMessage> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(BoardError::validation(EMPTY_MESSAGE));
        }

        Ok(NewMessage {
            message: message.to_string(),
            author: non_blank_or(&self.author, DEFAULT_AUTHOR),
            repository: non_blank_or(&self.repository, DEFAULT_REPOSITORY),
        })
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.author.clear();
        self.repository.clear();
    }

    pub fn char_count(&self, limit: usize) -> CharCount {
        CharCount::of(&self.message, limit)
    }
}

fn non_blank_or(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Character counter for the message field. Display only; the limit is not
/// enforced on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub limit: usize,
}

impl CharCount {
    pub fn of(text: &str, limit: usize) -> Self {
        Self {
            count: text.chars().count(),
            limit,
        }
    }

    pub fn over_limit(&self) -> bool {
        self.count > self.limit
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.count, self.limit)
    }
}

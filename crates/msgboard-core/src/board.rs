//! Board controller
//!
//! Runs the three user-facing flows (refresh, react, submit) against a
//! [`MessageApi`] and reports everything the view needs as [`BoardEvent`]s on
//! a [`BoardSink`]. It keeps no message state of its own: each successful
//! refresh hands the view a complete replacement list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

use crate::client::MessageApi;
use crate::draft::Draft;
use crate::message::{Message, ReactionAck};

pub const LOAD_FAILED: &str = "Failed to load messages";
pub const REACTION_FAILED: &str = "Failed to update reaction";
pub const SEND_FAILED: &str = "Failed to send message";

/// A user-visible error line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Persistent notices stay until replaced; others are dismissed after a timeout.
    pub persistent: bool,
}

impl Notice {
    pub fn transient(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persistent: false,
        }
    }

    pub fn persistent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persistent: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Replace the displayed list with these, in this order
    MessagesLoaded(Vec<Message>),
    Notice(Notice),
    /// Submit control disabled (`true`) or restored (`false`)
    Submitting(bool),
    /// The post went through; empty the form fields
    DraftCleared,
}

/// Where the board sends its output.
pub trait BoardSink: Send + Sync {
    fn emit(&self, event: BoardEvent);

    /// Whether anyone is still listening. Background refresh stops once this
    /// turns true.
    fn is_closed(&self) -> bool {
        false
    }
}

impl BoardSink for mpsc::UnboundedSender<BoardEvent> {
    fn emit(&self, event: BoardEvent) {
        let _ = self.send(event);
    }

    fn is_closed(&self) -> bool {
        mpsc::UnboundedSender::is_closed(self)
    }
}

#[derive(Clone)]
pub struct Board {
    api: Arc<dyn MessageApi>,
    fetch_limit: Option<usize>,
}

impl Board {
    pub fn new(api: Arc<dyn MessageApi>) -> Self {
        Self {
            api,
            fetch_limit: None,
        }
    }

    /// Ask the server for at most `limit` messages on each refresh.
    pub fn with_fetch_limit(mut self, limit: Option<usize>) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Fetch the message list and hand it to the view. On failure the view
    /// keeps what it has and gets a notice instead. Returns whether a list
    /// was delivered.
    #[instrument(skip(self, sink))]
    pub async fn refresh(&self, sink: &dyn BoardSink) -> bool {
        match self.api.fetch_messages(self.fetch_limit).await {
            Ok(messages) => {
                info!(count = messages.len(), "messages loaded");
                sink.emit(BoardEvent::MessagesLoaded(messages));
                true
            }
            Err(err) => {
                error!(error = %err, "failed to load messages");
                sink.emit(BoardEvent::Notice(Notice::transient(LOAD_FAILED)));
                false
            }
        }
    }

    /// Add one `reaction` to a message, then refresh so the new count shows.
    /// Returns the server's acknowledgement, or `None` when the reaction was
    /// not recorded.
    #[instrument(skip(self, sink))]
    pub async fn react(
        &self,
        message_id: &str,
        reaction: &str,
        sink: &dyn BoardSink,
    ) -> Option<ReactionAck> {
        match self.api.add_reaction(message_id, reaction).await {
            Ok(ack) => {
                info!(count = ?ack.count(), "reaction added");
                self.refresh(sink).await;
                Some(ack)
            }
            Err(err) => {
                error!(error = %err, "failed to update reaction");
                sink.emit(BoardEvent::Notice(Notice::transient(REACTION_FAILED)));
                None
            }
        }
    }

    /// Validate and post a draft. Blank messages never reach the server. On
    /// success the form is cleared and the list refreshed; on failure the
    /// draft is left for the user to retry. Returns whether the post landed.
    #[instrument(skip_all)]
    pub async fn submit(&self, draft: &Draft, sink: &dyn BoardSink) -> bool {
        let post = match draft.prepare() {
            Ok(post) => post,
            Err(err) => {
                warn!(error = %err, "draft rejected");
                sink.emit(BoardEvent::Notice(Notice::transient(err.user_message(SEND_FAILED))));
                return false;
            }
        };

        let _busy = SubmitGuard::begin(sink);

        match self.api.post_message(&post).await {
            Ok(()) => {
                info!(author = %post.author, "message sent");
                sink.emit(BoardEvent::DraftCleared);
                self.refresh(sink).await;
                true
            }
            Err(err) => {
                error!(error = %err, "failed to send message");
                sink.emit(BoardEvent::Notice(Notice::transient(err.user_message(SEND_FAILED))));
                false
            }
        }
    }

    /// Refresh now and then every `every` until the sink closes.
    pub fn spawn_auto_refresh<S>(&self, sink: S, every: Duration) -> JoinHandle<()>
    where
        S: BoardSink + 'static,
    {
        let board = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sink.is_closed() {
                    break;
                }
                board.refresh(&sink).await;
            }
        })
    }
}

/// Marks the submit control busy for its lifetime, so every exit path out of
/// [`Board::submit`] restores it.
struct SubmitGuard<'a> {
    sink: &'a dyn BoardSink,
}

impl<'a> SubmitGuard<'a> {
    fn begin(sink: &'a dyn BoardSink) -> Self {
        sink.emit(BoardEvent::Submitting(true));
        Self { sink }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.sink.emit(BoardEvent::Submitting(false));
    }
}

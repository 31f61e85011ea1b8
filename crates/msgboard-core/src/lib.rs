pub mod board;
pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod format;
pub mod html;
pub mod logging;
pub mod message;
pub mod reactions;
pub mod render;

// Re-export main types for convenience
pub use board::{Board, BoardEvent, BoardSink, Notice};
pub use client::{HttpClient, MessageApi};
pub use config::Config;
pub use draft::{CharCount, Draft};
pub use error::{BoardError, BoardResult};
pub use format::format_timestamp;
pub use html::escape_html;
pub use message::{Message, NewMessage, ReactionAck};
pub use reactions::{Reaction, ReactionCatalog};

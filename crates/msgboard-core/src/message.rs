//! Message board wire types
//!
//! These are the JSON shapes exchanged with the board server. Messages are a
//! read model: the client never edits them, it only re-fetches.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{BoardError, BoardResult};

pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_REPOSITORY: &str = "local";

/// A message as returned by `GET /messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default = "default_repository", deserialize_with = "repository_or_default")]
    pub repository: String,
    #[serde(default, deserialize_with = "reaction_counts")]
    pub reactions: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl Message {
    /// Count for a reaction, 0 when the server has none recorded.
    pub fn reaction_count(&self, name: &str) -> u64 {
        self.reactions.get(name).copied().unwrap_or(0)
    }
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

/// `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn repository_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_repository))
}

/// A `null` map or `null` count reads as no reactions recorded.
fn reaction_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts: Option<BTreeMap<String, Option<u64>>> = Option::deserialize(deserializer)?;
    Ok(counts
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, count)| count.map(|c| (name, c)))
        .collect())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Body of `GET /messages`. Both fields are optional so a bare
/// `{"messages": [...]}` also decodes.
#[derive(Debug, Deserialize)]
pub struct MessagesEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

impl MessagesEnvelope {
    /// The message list, or an error when the body is not the shape the
    /// board promises: a `status` other than `success`, or no `messages`.
    pub fn into_messages(self) -> BoardResult<Vec<Message>> {
        if let Some(status) = self.status.as_deref() {
            if status != "success" {
                return Err(BoardError::malformed(format!("status {status:?}")));
            }
        }

        self.messages
            .ok_or_else(|| BoardError::malformed("missing messages array"))
    }
}

/// Body of `POST /messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub message: String,
    pub author: String,
    pub repository: String,
}

/// Body of `POST /messages/{id}/reactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub reaction: String,
    pub action: String,
}

impl ReactionRequest {
    pub fn add(reaction: &str) -> Self {
        Self {
            reaction: reaction.to_string(),
            action: "add".to_string(),
        }
    }
}

/// Body of a successful `POST /messages/{id}/reactions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReactionAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<ReactionData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReactionData {
    #[serde(default)]
    pub count: Option<u64>,
}

impl ReactionAck {
    pub fn with_count(count: u64) -> Self {
        Self {
            status: Some("success".to_string()),
            data: Some(ReactionData { count: Some(count) }),
        }
    }

    /// The reaction's new total, when the server reported one.
    pub fn count(&self) -> Option<u64> {
        self.data.as_ref().and_then(|d| d.count)
    }
}

/// Error payload the server sends with non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

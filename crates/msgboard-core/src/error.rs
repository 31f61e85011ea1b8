use reqwest::StatusCode;

pub type BoardResult<T> = Result<T, BoardError>;

/// Everything that can go wrong talking to the board or preparing a post.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Rejected locally, never sent
    #[error("{0}")]
    Validation(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
}

impl BoardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Text to show the user. Validation errors and server-supplied messages
    /// are shown as-is; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Server {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = BoardError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some("Message cannot be empty".to_string()),
        };
        assert_eq!(err.user_message("Failed to send message"), "Message cannot be empty");
        assert_eq!(err.to_string(), "server returned 400 Bad Request: Message cannot be empty");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = BoardError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Failed to send message"), "Failed to send message");
        assert_eq!(
            BoardError::malformed("missing messages").user_message("Failed to load messages"),
            "Failed to load messages"
        );
    }

    #[test]
    fn test_validation_message_is_shown() {
        let err = BoardError::validation("Message cannot be empty");
        assert_eq!(err.user_message("ignored"), "Message cannot be empty");
    }
}

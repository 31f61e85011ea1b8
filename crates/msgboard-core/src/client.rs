use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

use crate::error::{BoardError, BoardResult};
use crate::message::{
    ErrorBody, Message, MessagesEnvelope, NewMessage, ReactionAck, ReactionRequest,
};

/// The three board endpoints. [`crate::Board`] only talks to the server
/// through this trait.
#[async_trait]
pub trait MessageApi: Send + Sync {
    /// `GET /messages[?limit=N]`
    async fn fetch_messages(&self, limit: Option<usize>) -> BoardResult<Vec<Message>>;

    /// `POST /messages`
    async fn post_message(&self, post: &NewMessage) -> BoardResult<()>;

    /// `POST /messages/{id}/reactions` with action `add`
    async fn add_reaction(&self, message_id: &str, reaction: &str) -> BoardResult<ReactionAck>;
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> BoardResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BoardError::InvalidServerUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BoardError::InvalidServerUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl MessageApi for HttpClient {
    async fn fetch_messages(&self, limit: Option<usize>) -> BoardResult<Vec<Message>> {
        let url = self.endpoint(&["messages"]);
        debug!(%url, ?limit, "fetching messages");

        let mut request = self.client.get(url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = ensure_success(request.send().await?).await?;

        let envelope: MessagesEnvelope = response
            .json()
            .await
            .map_err(|e| BoardError::malformed(format!("invalid messages body: {e}")))?;

        envelope.into_messages()
    }

    async fn post_message(&self, post: &NewMessage) -> BoardResult<()> {
        let url = self.endpoint(&["messages"]);
        debug!(%url, author = %post.author, repository = %post.repository, "posting message");

        let response = self.client.post(url).json(post).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn add_reaction(&self, message_id: &str, reaction: &str) -> BoardResult<ReactionAck> {
        let url = self.endpoint(&["messages", message_id, "reactions"]);
        debug!(%url, reaction, "adding reaction");

        let response = self
            .client
            .post(url)
            .json(&ReactionRequest::add(reaction))
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;

        // The reaction is recorded once the server says 2xx; the count is extra
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

/// Turn a non-2xx response into [`BoardError::Server`], keeping the server's
/// `message` text when the body carries one.
async fn ensure_success(response: Response) -> BoardResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    Err(BoardError::Server { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:8080");
        assert_eq!(c.endpoint(&["messages"]).as_str(), "http://localhost:8080/messages");

        let c = client("http://example.com/board/");
        assert_eq!(
            c.endpoint(&["messages", "abc", "reactions"]).as_str(),
            "http://example.com/board/messages/abc/reactions"
        );
    }

    #[test]
    fn test_endpoint_encodes_message_id() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(&["messages", "a/b c", "reactions"]).as_str(),
            "http://localhost:8080/messages/a%2Fb%20c/reactions"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            HttpClient::new("not a url", Duration::from_secs(1)),
            Err(BoardError::InvalidServerUrl(_))
        ));
        assert!(matches!(
            HttpClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(BoardError::InvalidServerUrl(_))
        ));
    }
}

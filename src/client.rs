use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{multipart, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TransportError;
use crate::models::{ChatMessage, ChatSession, StoredFile, User};

/// Client for the admin backend. Explicitly constructed and cheap to clone;
/// carries its own base address so tests can point it at a mock server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Body of a successful `/files/upload/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub status: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        // Content-type is a client default so per-request headers win on
        // conflict, and multipart requests replace it with their own.
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against a path below the base address. Escape hatch
    /// for callers that need query parameters or extra headers; the result
    /// still goes through [`execute`](Self::execute) for normalization.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
    }

    /// One-shot dispatch with success/failure normalization. No retries;
    /// the caller decides whether an operation is worth repeating.
    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, TransportError> {
        let resp = req.send().await.map_err(|e| {
            tracing::error!("API request failed: {e}");
            TransportError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, "backend returned error");
            return Err(TransportError::from_status(status));
        }

        Ok(resp)
    }

    /// Dispatch a request and decode the JSON body.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, TransportError> {
        let resp = self.send(req).await?;
        resp.json().await.map_err(|e| {
            tracing::error!("failed to decode API response: {e}");
            TransportError::from(e)
        })
    }

    // Generic CRUD operations

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<Vec<T>, TransportError> {
        self.execute(self.request(Method::GET, &format!("/{resource}/")))
            .await
    }

    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: i64,
    ) -> Result<T, TransportError> {
        self.execute(self.request(Method::GET, &format!("/{resource}/{id}/")))
            .await
    }

    pub async fn create<T, B>(&self, resource: &str, data: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, &format!("/{resource}/")).json(data))
            .await
    }

    pub async fn update<T, B>(
        &self,
        resource: &str,
        id: i64,
        data: &B,
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(
            self.request(Method::PUT, &format!("/{resource}/{id}/"))
                .json(data),
        )
        .await
    }

    /// Delete a record. The backend answers 204 No Content, so no body is
    /// expected or parsed.
    pub async fn delete(&self, resource: &str, id: i64) -> Result<(), TransportError> {
        self.send(self.request(Method::DELETE, &format!("/{resource}/{id}/")))
            .await?;
        Ok(())
    }

    /// Upload a document for ingestion, as multipart form data under the
    /// field name `file`. The multipart encoder picks its own content-type
    /// and boundary.
    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, TransportError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        self.execute(
            self.request(Method::POST, "/files/upload/")
                .multipart(form),
        )
        .await
    }

    // Typed per-resource operations

    pub async fn users(&self) -> Result<Vec<User>, TransportError> {
        self.list("users").await
    }

    pub async fn files(&self) -> Result<Vec<StoredFile>, TransportError> {
        self.list("files").await
    }

    pub async fn chat_sessions(&self) -> Result<Vec<ChatSession>, TransportError> {
        self.list("chat-sessions").await
    }

    pub async fn chat_messages(&self) -> Result<Vec<ChatMessage>, TransportError> {
        self.list("chat-messages").await
    }

    /// Messages belonging to one session, filtered server-side.
    pub async fn session_messages(
        &self,
        session_id: i64,
    ) -> Result<Vec<ChatMessage>, TransportError> {
        self.execute(
            self.request(Method::GET, "/chat-messages/")
                .query(&[("session", session_id)]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base: &str) -> ApiClient {
        ApiClient::new(&Config {
            api_url: base.to_string(),
        })
    }

    #[tokio::test]
    async fn list_returns_backend_array() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "username": "alice", "email": "alice@example.com"},
                {"id": 2, "username": "bob", "email": "bob@example.com"},
            ])))
            .mount(&mock)
            .await;

        let users = test_client(&mock.uri()).users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].id, 2);
    }

    #[tokio::test]
    async fn get_by_id_returns_the_record() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 1, "username": "alice", "email": "alice@example.com"}),
            ))
            .mount(&mock)
            .await;

        let user: User = test_client(&mock.uri()).get_by_id("users", 1).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn non_2xx_fails_with_the_observed_status() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat-messages/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock)
            .await;

        let err = test_client(&mock.uri()).chat_messages().await.unwrap_err();
        assert_eq!(err.status, Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn connection_failure_carries_no_status() {
        // Nothing listens on port 1.
        let err = test_client("http://127.0.0.1:1").users().await.unwrap_err();
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn delete_tolerates_204_no_content() {
        let mock = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/7/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock)
            .await;

        test_client(&mock.uri()).delete("files", 7).await.unwrap();
    }

    #[tokio::test]
    async fn delete_propagates_failure() {
        let mock = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/7/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock)
            .await;

        let err = test_client(&mock.uri()).delete("files", 7).await.unwrap_err();
        assert_eq!(err.status, Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn create_sends_json_with_content_type() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat-sessions/"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"user": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"id": 5, "user": 1, "created_at": "2026-08-30T12:00:00Z", "messages": []}),
            ))
            .mount(&mock)
            .await;

        let session: ChatSession = test_client(&mock.uri())
            .create("chat-sessions", &json!({"user": 1}))
            .await
            .unwrap();
        assert_eq!(session.id, 5);
        assert!(session.messages.is_empty());
    }

    #[tokio::test]
    async fn update_puts_to_the_record_path() {
        let mock = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/files/3/"))
            .and(body_json(json!({"name": "renamed.pdf"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "name": "renamed.pdf",
                "file": "uploads/renamed.pdf",
                "uploaded_at": "2026-08-30T12:00:00Z",
            })))
            .mount(&mock)
            .await;

        let file: StoredFile = test_client(&mock.uri())
            .update("files", 3, &json!({"name": "renamed.pdf"}))
            .await
            .unwrap();
        assert_eq!(file.name, "renamed.pdf");
    }

    #[tokio::test]
    async fn session_messages_filters_by_query_param() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat-messages/"))
            .and(query_param("session", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 11,
                "session": 9,
                "role": "user",
                "content": "hello",
                "created_at": "2026-08-30T12:00:00Z",
                "input_tokens": 3,
                "output_tokens": 0,
            }])))
            .mount(&mock)
            .await;

        let messages = test_client(&mock.uri()).session_messages(9).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].session, 9);
    }

    #[tokio::test]
    async fn upload_sends_multipart_field_named_file() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files/upload/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "success"})))
            .mount(&mock)
            .await;

        let resp = test_client(&mock.uri())
            .upload_file("notes.txt", b"some notes".to_vec())
            .await
            .unwrap();
        assert_eq!(resp.status, "success");

        let requests = mock.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(
            content_type.starts_with("multipart/form-data; boundary="),
            "unexpected content-type: {content_type}"
        );

        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"notes.txt\""));
        assert!(body.contains("some notes"));
    }
}

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::completion::{CompletionOutcome, CompletionRequest, FailureKind};
use shared::credential::Credential;
use std::time::{Duration, Instant};

/// Hard deadline for one submission, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const COMPLETIONS_PATH: &str = "/api/chat/completions";

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionBody<'a> {
    fn from_request(req: &'a CompletionRequest) -> Self {
        Self {
            model: req.model(),
            messages: [
                WireMessage {
                    role: "system",
                    content: req.system_message(),
                },
                WireMessage {
                    role: "user",
                    content: req.user_message(),
                },
            ],
            temperature: req.temperature(),
            max_tokens: req.max_tokens(),
        }
    }
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// OpenWebUI-style chat-completions client. One POST per `submit`, no retries.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COMPLETIONS_PATH)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` and classify whatever comes back.
    pub async fn submit(
        &self,
        request: &CompletionRequest,
        credential: &Credential,
    ) -> CompletionOutcome {
        let started = Instant::now();
        let outcome = match self.send(request, credential).await {
            Ok(outcome) => outcome,
            Err(e) => classify_transport_error(&e),
        };

        match &outcome {
            CompletionOutcome::Success(text) => tracing::info!(
                model = request.model(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = text.len(),
                "completion succeeded"
            ),
            CompletionOutcome::Failure { kind, detail } => tracing::warn!(
                model = request.model(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                %kind,
                detail = %truncate_for_log(detail),
                "completion failed"
            ),
        }
        outcome
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        credential: &Credential,
    ) -> std::result::Result<CompletionOutcome, reqwest::Error> {
        let url = self.endpoint();
        let body = ChatCompletionBody::from_request(request);
        tracing::debug!(
            %url,
            model = request.model(),
            system_chars = request.system_message().len(),
            user_chars = request.user_message().len(),
            "posting chat completion"
        );

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        Ok(outcome_from_response(status, &text))
    }
}

fn outcome_from_response(status: StatusCode, body: &str) -> CompletionOutcome {
    if status != StatusCode::OK {
        return CompletionOutcome::failure(
            FailureKind::HttpError,
            format!("{}: {}", status.as_u16(), body),
        );
    }

    let parsed: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return CompletionOutcome::failure(
                FailureKind::UnexpectedError,
                format!("invalid response body: {}", e),
            )
        }
    };

    match parsed.choices.unwrap_or_default().into_iter().next() {
        Some(choice) => CompletionOutcome::Success(choice.message.content.unwrap_or_default()),
        None => CompletionOutcome::failure(FailureKind::NoChoices, "no response content"),
    }
}

fn classify_transport_error(e: &reqwest::Error) -> CompletionOutcome {
    let kind = if e.is_timeout() {
        FailureKind::Timeout
    } else if e.is_connect() {
        FailureKind::ConnectionError
    } else {
        FailureKind::UnexpectedError
    };
    CompletionOutcome::failure(kind, e.to_string())
}

fn truncate_for_log(detail: &str) -> String {
    detail.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::new("Nemotron Ultra 253B", "You are helpful.", "Hello")
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = CompletionClient::new("https://example.org/").unwrap();
        assert_eq!(client.endpoint(), "https://example.org/api/chat/completions");
        assert_eq!(client.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_wire_body_shape() {
        let req = request();
        let body = serde_json::to_value(ChatCompletionBody::from_request(&req)).unwrap();
        assert_eq!(body["model"], "Nemotron Ultra 253B");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["max_tokens"], 1500);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_outcome_mapping() {
        let ok = outcome_from_response(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#,
        );
        assert_eq!(ok, CompletionOutcome::Success("first".into()));

        let empty = outcome_from_response(StatusCode::OK, r#"{"choices":[]}"#);
        assert_eq!(
            empty,
            CompletionOutcome::failure(FailureKind::NoChoices, "no response content")
        );

        let absent = outcome_from_response(StatusCode::OK, r#"{"id":"x"}"#);
        assert!(matches!(
            absent,
            CompletionOutcome::Failure { kind: FailureKind::NoChoices, .. }
        ));

        let garbage = outcome_from_response(StatusCode::OK, "<html>");
        assert!(matches!(
            garbage,
            CompletionOutcome::Failure { kind: FailureKind::UnexpectedError, .. }
        ));
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "Nemotron Ultra 253B",
                "max_tokens": 1500
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}]}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(&server.url()).unwrap();
        let outcome = client.submit(&request(), &credential()).await;

        assert_eq!(outcome, CompletionOutcome::Success("Hi there".into()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = CompletionClient::new(&server.url()).unwrap();
        let outcome = client.submit(&request(), &credential()).await;

        assert_eq!(
            outcome,
            CompletionOutcome::failure(FailureKind::HttpError, "429: rate limited")
        );
    }

    #[tokio::test]
    async fn test_submit_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(&server.url()).unwrap();
        let outcome = client.submit(&request(), &credential()).await;

        assert!(matches!(
            outcome,
            CompletionOutcome::Failure { kind: FailureKind::NoChoices, .. }
        ));
    }

    #[tokio::test]
    async fn test_submit_connection_refused() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = CompletionClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();
        let outcome = client.submit(&request(), &credential()).await;

        assert!(matches!(
            outcome,
            CompletionOutcome::Failure { kind: FailureKind::ConnectionError, .. }
        ));
    }

    #[tokio::test]
    async fn test_submit_times_out_on_silent_server() {
        // Connections queue in the backlog but nothing ever answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let client = CompletionClient::with_timeout(&url, Duration::from_millis(300)).unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(300));

        let outcome = client.submit(&request(), &credential()).await;

        assert!(matches!(
            outcome,
            CompletionOutcome::Failure { kind: FailureKind::Timeout, .. }
        ));
        assert_eq!(outcome.display_text(), "Timed out - please try again");
        drop(listener);
    }
}

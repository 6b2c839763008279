//! [`Client`] for a chat completion API and related types.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{response::Completion, KeyRing, Prompt};

/// Result type for the client. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Settings for a [`Client`] that are not secret.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Chat completion endpoint.
    pub url: reqwest::Url,
    /// Limit on each call, including connecting and reading the body.
    pub timeout: Duration,
}

impl ClientOptions {
    /// Default chat completion endpoint.
    pub const DEFAULT_URL: &'static str =
        "https://api.openai.com/v1/chat/completions";
    /// Default per-call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            // The constant is a valid URL.
            url: reqwest::Url::parse(Self::DEFAULT_URL).unwrap(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Client for a chat completion API. This is the only thing in the crate that
/// talks to the network and the only thing that reads API [`Key`]s.
///
/// Cloning is cheap and clones share the same [`KeyRing`].
///
/// [`Key`]: crate::Key
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    keys: Arc<KeyRing>,
    url: reqwest::Url,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url.as_str())
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl Client {
    /// Our user agent.
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

    /// Create a new client drawing keys from `keys`.
    pub fn new<K>(keys: K, options: ClientOptions) -> Result<Self>
    where
        K: Into<Arc<KeyRing>>,
    {
        let keys = keys.into();

        #[cfg(feature = "log")]
        {
            log::info!(concat!("Creating ", env!("CARGO_PKG_NAME"), " client..."));
            log::debug!("Endpoint: {}", options.url);
            log::debug!("Keys in rotation: {}", keys.len());
            log::debug!("Timeout: {:?}", options.timeout);
        }

        // Headers for all requests.
        let mut headers = reqwest::header::HeaderMap::new();

        // Content type needs to be set to JSON.
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(Self::USER_AGENT)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            inner,
            keys,
            url: options.url,
        })
    }

    /// Create a [`reqwest::RequestBuilder`] with the next key from the
    /// [`KeyRing`] set as a sensitive `Authorization` header.
    pub fn request_raw(
        &self,
        method: reqwest::Method,
    ) -> Result<reqwest::RequestBuilder> {
        #[cfg(feature = "log")]
        log::debug!("{} request to {}", method, self.url);

        let auth = self.keys.next().bearer()?;

        Ok(self
            .inner
            .request(method, self.url.clone())
            .header(reqwest::header::AUTHORIZATION, auth))
    }

    /// Send a POST request with `body` as JSON.
    pub async fn post<B>(&self, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize,
    {
        let req = self.request_raw(reqwest::Method::POST)?;

        #[cfg(feature = "log")]
        {
            if let Ok(json) = serde_json::to_string_pretty(body) {
                log::debug!("Sending body:\n{}", json);
            } else {
                log::warn!("Could not serialize body. Request will fail.");
            }
        }

        Ok(req.json(body).send().await?)
    }

    /// Send `prompt` and return the raw text of the first choice.
    ///
    /// A non-2xx answer becomes [`Error::Provider`] carrying the provider's
    /// status. A 2xx answer without any text is [`Error::EmptyReply`].
    pub async fn complete(&self, prompt: &Prompt<'_>) -> Result<String> {
        let response = self.post(prompt).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await?;
            let error = ProviderError::from_body(&body);

            #[cfg(feature = "log")]
            log::error!("Provider returned {}: {}", status, error);

            return Err(Error::Provider { status, error });
        }

        let body = response.bytes().await?;
        let completion: Completion = serde_json::from_slice(&body)?;

        #[cfg(feature = "log")]
        {
            if let Some(usage) = &completion.usage {
                log::debug!(
                    "Completion {} used {} tokens",
                    completion.id,
                    usage.total_tokens
                );
            }
        }

        completion.into_text().ok_or(Error::EmptyReply)
    }
}

/// [`Client`] error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network failure, timeout, or a client that could not be built.
    #[error("HTTP error: {0}")]
    HTTP(#[from] reqwest::Error),
    /// The provider's body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// An API key could not be put in a header. [`KeyRing`] validates keys so
    /// this should not happen.
    #[error("Invalid header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    /// The provider answered with a non-2xx status.
    #[error("Provider error ({status}): {error}")]
    Provider {
        /// Status to mirror to our caller.
        status: reqwest::StatusCode,
        #[allow(missing_docs)]
        error: ProviderError,
    },
    /// The provider answered 2xx but without any text.
    #[error("Provider returned no content")]
    EmptyReply,
}

impl Error {
    /// HTTP status to report for this error: the provider's when there is
    /// one, otherwise 500.
    pub fn status(&self) -> reqwest::StatusCode {
        match self {
            Self::Provider { status, .. } => *status,
            Self::HTTP(e) => e
                .status()
                .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            _ => reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body a provider sends with a non-2xx status.
#[derive(
    Debug, Clone, Default, thiserror::Error, Serialize, Deserialize, PartialEq,
)]
#[error("{message}")]
pub struct ProviderError {
    /// Human readable description. May mention (masked) keys, so it is only
    /// for logs.
    #[serde(default)]
    pub message: String,
    /// Error category, for example `invalid_request_error`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Machine readable code, for example `invalid_api_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ProviderError {
    /// Parse an error body. Bodies that aren't the usual
    /// `{"error": {...}}` shape keep their text as the message.
    pub fn from_body(body: &[u8]) -> Self {
        if let Ok(wrapper) = serde_json::from_slice::<ProviderErrorWrapper>(body)
        {
            return wrapper.error;
        }

        Self {
            message: String::from_utf8_lossy(body).trim().to_owned(),
            ..Default::default()
        }
    }
}

// The error object is nested under an "error" key.
#[derive(Deserialize)]
pub(crate) struct ProviderErrorWrapper {
    pub(crate) error: ProviderError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{prompt::message::Role, Key};

    const FAKE_API_KEY: &str = "sk-test-not-a-real-key";
    const PATH: &str = "/v1/chat/completions";

    fn client(server: &mockito::Server, keys: &str) -> Client {
        let keys = KeyRing::parse(keys.to_string()).unwrap().unwrap();
        let options = ClientOptions {
            url: reqwest::Url::parse(&format!("{}{}", server.url(), PATH))
                .unwrap(),
            timeout: Duration::from_secs(5),
        };
        Client::new(keys, options).unwrap()
    }

    fn prompt() -> Prompt<'static> {
        Prompt::default()
            .messages([(Role::System, "Be brief."), (Role::User, "Hi")])
            .temperature(0.85)
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop",
            }],
        })
        .to_string()
    }

    #[test]
    fn test_provider_error_deserialize() {
        const BODY: &str = r#"{
  "error": {
    "message": "Incorrect API key provided.",
    "type": "invalid_request_error",
    "param": null,
    "code": "invalid_api_key"
  }
}"#;
        let error = ProviderError::from_body(BODY.as_bytes());
        assert_eq!(
            error,
            ProviderError {
                message: "Incorrect API key provided.".into(),
                kind: Some("invalid_request_error".into()),
                code: Some("invalid_api_key".into()),
            }
        );

        let error = ProviderError::from_body(b"Bad Gateway\n");
        assert_eq!(error.message, "Bad Gateway");
        assert_eq!(error.kind, None);
    }

    #[test]
    fn test_error_status() {
        let err = Error::Provider {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            error: ProviderError::default(),
        };
        assert_eq!(err.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            Error::EmptyReply.status(),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_debug_hides_keys() {
        let key = Key::try_from(FAKE_API_KEY.to_string()).unwrap();
        let client =
            Client::new(KeyRing::from(key), ClientOptions::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains(FAKE_API_KEY));
        assert!(debug.contains("api.openai.com"));
    }

    #[tokio::test]
    async fn test_complete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header(
                "authorization",
                format!("Bearer {}", FAKE_API_KEY).as_str(),
            )
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.85,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hi"},
                ],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(r#"{"message":"Hello!"}"#))
            .expect(1)
            .create_async()
            .await;

        let text = client(&server, FAKE_API_KEY)
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, r#"{"message":"Hello!"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_rotates_keys() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer sk-one")
            .with_body(completion_body("one"))
            .expect(2)
            .create_async()
            .await;
        let second = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer sk-two")
            .with_body(completion_body("two"))
            .expect(1)
            .create_async()
            .await;

        let client = client(&server, "sk-one,sk-two");
        let mut texts = Vec::new();
        for _ in 0..3 {
            texts.push(client.complete(&prompt()).await.unwrap());
        }

        assert_eq!(texts, ["one", "two", "one"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let err = client(&server, FAKE_API_KEY)
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
        match err {
            Error::Provider { error, .. } => {
                assert_eq!(error.code.as_deref(), Some("rate_limit_exceeded"))
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_empty_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server, FAKE_API_KEY)
            .complete(&prompt())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyReply));
    }

    #[tokio::test]
    async fn test_complete_unparsable_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client(&server, FAKE_API_KEY)
            .complete(&prompt())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_complete_unreachable() {
        // Nothing listens on port 9 on a test machine.
        let keys = KeyRing::parse(FAKE_API_KEY.to_string()).unwrap().unwrap();
        let options = ClientOptions {
            url: reqwest::Url::parse("http://127.0.0.1:9/v1/chat/completions")
                .unwrap(),
            timeout: Duration::from_secs(2),
        };
        let err = Client::new(keys, options)
            .unwrap()
            .complete(&prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HTTP(_)));
        assert_eq!(err.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains(FAKE_API_KEY));
    }
}

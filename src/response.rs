//! Chat completion [`Completion`] body from the provider and the [`Reply`]
//! the model writes inside it.

use derive_more::derive::IsVariant;
use serde::{Deserialize, Serialize};

use crate::prompt::message::Role;

/// Successful response body from a chat completion endpoint.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Completion {
    /// Unique `id` for the completion.
    #[serde(default)]
    pub id: String,
    /// Model that answered, as reported by the provider.
    #[serde(default)]
    pub model: String,
    /// Generated [`Choice`]s. We only ever ask for one.
    pub choices: Vec<Choice>,
    /// Token usage statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Completion {
    /// Take the text of the first [`Choice`], if there is any.
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

/// One generated answer.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Position of the choice in [`Completion::choices`].
    #[serde(default)]
    pub index: u32,
    /// What the model said.
    pub message: ChoiceMessage,
    /// Why the model stopped generating tokens.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Assistant turn inside a [`Choice`]. Unlike a [`prompt::Message`] the
/// content may be missing.
///
/// [`prompt::Message`]: crate::prompt::Message
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Almost always [`Role::Assistant`].
    pub role: Role,
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Reason the model stopped generating tokens.
#[derive(Debug, Serialize, Deserialize, PartialEq, IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model reached a natural stopping point.
    Stop,
    /// Maximum tokens reached.
    Length,
    /// Output was withheld by the provider's content filter.
    ContentFilter,
    /// The model called a tool.
    ToolCalls,
    /// Anything newer than this crate.
    #[serde(other)]
    Other,
}

/// Usage statistics from the API.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Usage {
    /// Number of input tokens used.
    pub prompt_tokens: u64,
    /// Number of output tokens generated.
    pub completion_tokens: u64,
    /// Sum of the above.
    pub total_tokens: u64,
}

/// The model's answer once it has been parsed: either a crafted message or
/// the model's explanation of why it could not write one.
///
/// Serializes as `{"message": "..."}` or `{"error": "..."}`. Build one from
/// model output with [`Reply::parse`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq, IsVariant)]
#[serde(untagged)]
pub enum Reply {
    /// A crafted message.
    Message {
        #[allow(missing_docs)]
        message: String,
    },
    /// The model declined.
    Error {
        #[allow(missing_docs)]
        error: String,
    },
}

// Lenient shape so extra fields from the model don't fail the parse.
#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn invalid(msg: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(msg)
}

impl Reply {
    /// Parse the model's raw text. It must be a JSON object with a string
    /// `message` or `error` field. If both are present `message` wins.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(invalid("expected a JSON object"));
        }

        let raw: RawReply = serde_json::from_value(value)?;
        match (raw.message, raw.error) {
            (Some(message), _) => Ok(Self::Message { message }),
            (None, Some(error)) => Ok(Self::Error { error }),
            (None, None) => {
                Err(invalid("expected a \"message\" or \"error\" field"))
            }
        }
    }

    /// Get the crafted message, if this is [`Reply::Message`].
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub const RESPONSE_JSON: &str = r#"{
  "id": "chatcmpl-123",
  "object": "chat.completion",
  "created": 1677652288,
  "model": "gpt-3.5-turbo-0613",
  "choices": [{
    "index": 0,
    "message": {
      "role": "assistant",
      "content": "{\"message\": \"Running late, be there soon!\"}"
    },
    "finish_reason": "stop"
  }],
  "usage": {
    "prompt_tokens": 9,
    "completion_tokens": 12,
    "total_tokens": 21
  }
}"#;

    #[test]
    fn test_completion_deserialize() {
        let completion: Completion =
            serde_json::from_str(RESPONSE_JSON).unwrap();

        assert_eq!(completion.id, "chatcmpl-123");
        assert_eq!(completion.choices.len(), 1);
        assert!(completion.choices[0]
            .finish_reason
            .as_ref()
            .unwrap()
            .is_stop());
        assert_eq!(completion.usage.as_ref().unwrap().total_tokens, 21);
        assert_eq!(
            completion.into_text().as_deref(),
            Some(r#"{"message": "Running late, be there soon!"}"#)
        );
    }

    #[test]
    fn test_completion_without_content() {
        const JSON: &str = r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"something_new"}]}"#;
        let completion: Completion = serde_json::from_str(JSON).unwrap();
        assert_eq!(
            completion.choices[0].finish_reason,
            Some(FinishReason::Other)
        );
        assert_eq!(completion.into_text(), None);

        let empty = Completion::default();
        assert_eq!(empty.into_text(), None);
    }

    #[test]
    fn test_reply_parse() {
        assert_eq!(
            Reply::parse(r#"{"message":"Hi"}"#).unwrap(),
            Reply::Message {
                message: "Hi".into()
            }
        );
        assert_eq!(
            Reply::parse("  {\"error\": \"Can't do that\"}\n").unwrap(),
            Reply::Error {
                error: "Can't do that".into()
            }
        );
        // Extra fields are fine, and `message` wins.
        let reply =
            Reply::parse(r#"{"message":"Hi","error":"x","mood":1}"#).unwrap();
        assert_eq!(reply.message(), Some("Hi"));
    }

    #[test]
    fn test_reply_parse_failures() {
        assert!(Reply::parse("Hi there!").is_err());
        assert!(Reply::parse(r#"[{"message":"Hi"}]"#).is_err());
        assert!(Reply::parse(r#"["Hi"]"#).is_err());
        assert!(Reply::parse(r#"{"message": 5}"#).is_err());

        let err = Reply::parse(r#"{"text":"Hi"}"#).unwrap_err();
        assert!(err.to_string().contains("\"message\" or \"error\""));
    }

    #[test]
    fn test_reply_serialize() {
        let json = serde_json::to_value(Reply::Message {
            message: "Hi".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"message": "Hi"}));

        let reply = Reply::Error {
            error: "Nope".into(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Nope"}));

        // The way back in is `parse`.
        assert_eq!(Reply::parse(&json.to_string()).unwrap(), reply);
    }
}

//! [`Model`] to use for completion.
use serde::{Deserialize, Serialize};

/// Chat completion model. Serializes to the provider's model identifier.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
)]
pub enum Model {
    /// GPT-3.5 Turbo. This is the default model.
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    #[display("gpt-3.5-turbo")]
    Gpt35Turbo,
    /// GPT-4
    #[serde(rename = "gpt-4")]
    #[display("gpt-4")]
    Gpt4,
    /// GPT-4 Turbo
    #[serde(rename = "gpt-4-turbo")]
    #[display("gpt-4-turbo")]
    Gpt4Turbo,
    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    #[display("gpt-4o")]
    Gpt4o,
    /// GPT-4o mini
    #[serde(rename = "gpt-4o-mini")]
    #[display("gpt-4o-mini")]
    Gpt4oMini,
}

/// Error for a model identifier we don't know about.
#[derive(Debug, thiserror::Error)]
#[error("unknown model: {0}")]
pub struct UnknownModel(pub String);

impl std::str::FromStr for Model {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_owned()))
            .map_err(|_| UnknownModel(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_serde() {
        assert_eq!(
            serde_json::to_string(&Model::default()).unwrap(),
            r#""gpt-3.5-turbo""#
        );
        let model: Model = serde_json::from_str(r#""gpt-4o-mini""#).unwrap();
        assert_eq!(model, Model::Gpt4oMini);
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("gpt-4".parse::<Model>().unwrap(), Model::Gpt4);
        assert_eq!(Model::Gpt4Turbo.to_string(), "gpt-4-turbo");

        let err = "claude".parse::<Model>().unwrap_err();
        assert_eq!(err.to_string(), "unknown model: claude");
    }
}

//! [`Generator`] runs one generation [`Request`] end to end: build the
//! instructions, ask the model, parse its [`Reply`], and correct it at most
//! once if the reply isn't the JSON we asked for.

use derive_more::derive::IsVariant;

use crate::{
    client,
    instructions::Instructions,
    options::{Invalid, Request},
    prompt::message::Role,
    response::Reply,
    Client, Model, Prompt,
};

/// Result type for generation. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Sampling temperature. Varied but still coherent phrasing.
pub const TEMPERATURE: f32 = 0.85;

/// Message shown to end users for anything that isn't their fault.
pub const GENERIC_FAILURE: &str = "An error occurred during your request.";

/// Where a [`Generator::generate`] call is in its retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Attempt {
    /// First call to the provider.
    Initial,
    /// The single corrective call.
    Retried,
}

impl Attempt {
    /// The attempt after this one, or [`None`] if the budget is spent.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Initial => Some(Self::Retried),
            Self::Retried => None,
        }
    }
}

/// Corrective user turn sent after a reply that failed to parse.
pub fn correction(err: &serde_json::Error) -> String {
    format!(
        "Your response was not valid JSON. The error was: {err}. Please \
         respond with just a JSON object with the field \"message\" or \
         \"error\" and nothing else."
    )
}

/// Crafts messages with a [`Client`].
#[derive(Debug, Clone)]
pub struct Generator {
    client: Client,
    model: Model,
    temperature: f32,
}

impl Generator {
    /// New generator using the default [`Model`] and [`TEMPERATURE`].
    pub fn new(client: Client) -> Self {
        Self {
            client,
            model: Model::default(),
            temperature: TEMPERATURE,
        }
    }

    /// Set the [`Model`].
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the first [`Prompt`] for `request`.
    pub fn prompt(&self, request: &Request) -> Prompt<'static> {
        let Instructions { system, user } = Instructions::new(request);

        Prompt::default()
            .model(self.model)
            .temperature(self.temperature)
            .add_message((Role::System, system))
            .add_message((Role::User, user))
    }

    /// Validate `request`, then ask the model for a [`Reply`].
    ///
    /// Makes at most two provider calls. Client errors are returned right
    /// away. A reply that doesn't parse is sent back along with a
    /// [`correction`] once; if that doesn't parse either the result is
    /// [`Error::Malformed`].
    pub async fn generate(&self, request: &Request) -> Result<Reply> {
        request.validate()?;

        let mut prompt = self.prompt(request);
        let mut attempt = Attempt::Initial;

        loop {
            let text = self.client.complete(&prompt).await?;

            let err = match Reply::parse(&text) {
                Ok(reply) => {
                    #[cfg(feature = "log")]
                    log::debug!("Parsed reply on {:?} attempt", attempt);

                    return Ok(reply);
                }
                Err(err) => err,
            };

            #[cfg(feature = "log")]
            log::warn!("Reply on {:?} attempt is not valid: {}", attempt, err);

            attempt = match attempt.next() {
                Some(next) => next,
                None => return Err(Error::Malformed(err)),
            };

            let fix = correction(&err);
            prompt
                .push_message((Role::Assistant, text))
                .push_message((Role::User, fix));
        }
    }
}

/// [`Generator`] error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before anything was sent.
    #[error("Invalid request: {0}")]
    Validation(#[from] Invalid),
    /// The provider could not be reached or refused the request.
    #[error(transparent)]
    Client(#[from] client::Error),
    /// The model didn't answer with valid JSON, even after a correction.
    #[error("Malformed reply after retrying: {0}")]
    Malformed(serde_json::Error),
}

impl Error {
    /// HTTP status to report: 400 for validation, the provider's status for
    /// client errors, otherwise 500.
    pub fn status(&self) -> reqwest::StatusCode {
        match self {
            Self::Validation(_) => reqwest::StatusCode::BAD_REQUEST,
            Self::Client(e) => e.status(),
            Self::Malformed(_) => reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to show an end user. Only validation errors say
    /// anything specific.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

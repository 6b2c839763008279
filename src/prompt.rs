//! Chat completion request body. We call it [`Prompt`] since in actual usage
//! this makes the code more readable.

use serde::{Deserialize, Serialize};

use crate::Model;

pub mod message;
pub use message::Message;

/// Request body for a chat completion endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Prompt<'a> {
    /// [`Model`] to use for completion.
    pub model: Model,
    /// Input [`Message`]s in conversation order. The model answers the last
    /// one.
    pub messages: Vec<Message<'a>>,
    /// Temperature for sampling. Higher values mean more varied output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl<'a> Prompt<'a> {
    /// Set the [`model`].
    ///
    /// [`model`]: Prompt::model
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the [`messages`] from an iterable of [`Message`]s.
    ///
    /// [`messages`]: Prompt::messages
    pub fn messages<M, Ms>(mut self, messages: Ms) -> Self
    where
        M: Into<Message<'a>>,
        Ms: IntoIterator<Item = M>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Add a [`Message`] to [`messages`].
    ///
    /// [`messages`]: Prompt::messages
    pub fn add_message<M>(mut self, message: M) -> Self
    where
        M: Into<Message<'a>>,
    {
        self.messages.push(message.into());
        self
    }

    /// Push a [`Message`] onto [`messages`] in place.
    ///
    /// [`messages`]: Prompt::messages
    pub fn push_message<M>(&mut self, message: M) -> &mut Self
    where
        M: Into<Message<'a>>,
    {
        self.messages.push(message.into());
        self
    }

    /// Set the [`temperature`].
    ///
    /// [`temperature`]: Prompt::temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! `messagecraft` crafts short text messages in a chosen tone, language and
//! style with a chat completion API.
//!
//! Describe what you want to say with an [`options::Request`], hand it to a
//! [`Generator`] and get back a [`Reply`]: either the crafted message or the
//! model's reason for declining. The [`Generator`] asks the model for JSON and,
//! if the answer doesn't parse, asks once more with a correction.
//!
//! With the `server` feature (on by default) the [`server`] module exposes
//! this as `POST /api/generate` and the `messagecraft` binary serves it.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use messagecraft::{
//!     client::ClientOptions, options::{Request, Tone}, Client, Generator,
//!     Key, KeyRing,
//! };
//!
//! let key = Key::try_from(std::env::var("OPENAI_API_KEY")?)?;
//! let client = Client::new(KeyRing::from(key), ClientOptions::default())?;
//! let reply = Generator::new(client)
//!     .generate(&Request::new("Running late").tone(Tone::Polite))
//!     .await?;
//! println!("{:?}", reply);
//! # Ok(())
//! # }
//! ```

pub mod key;
pub use key::{Key, KeyRing};

pub mod client;
pub use client::Client;

pub mod model;
pub use model::Model;

pub mod options;

pub mod instructions;

pub mod prompt;
pub use prompt::Prompt;

pub mod response;
pub use response::Reply;

pub mod generate;
pub use generate::Generator;

#[cfg(feature = "server")]
pub mod config;

#[cfg(feature = "server")]
pub mod server;

/// Re-exports of commonly used crates to avoid version conflicts.
pub mod exports {
    #[cfg(feature = "log")]
    pub use log;
    pub use reqwest;
    pub use serde;
    pub use serde_json;
}

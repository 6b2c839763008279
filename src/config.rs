//! Server [`Config`] from command line flags and the environment.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;

use crate::{
    client::{self, ClientOptions},
    key::InvalidKey,
    Client, Generator, KeyRing, Model,
};

/// Largest accepted `--timeout-secs`.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Serve crafted text messages over HTTP.
///
/// Every flag can also be set with the environment variable shown. The server
/// starts without an API key but then answers every generation request with
/// an error.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "MESSAGECRAFT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
    /// API key. Separate several keys with commas to rotate between them.
    #[arg(
        long = "api-key",
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        value_parser = parse_keys,
    )]
    pub keys: Option<Keys>,
    /// Chat completion endpoint.
    #[arg(long, env = "OPENAI_API_URL", default_value = ClientOptions::DEFAULT_URL)]
    pub api_url: reqwest::Url,
    /// Model to ask.
    #[arg(long, env = "MESSAGECRAFT_MODEL", default_value_t = Model::default())]
    pub model: Model,
    /// Timeout for each call to the provider, in seconds.
    #[arg(
        long,
        env = "MESSAGECRAFT_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS),
    )]
    pub timeout_secs: u64,
}

/// Parsed API keys. A blank value parses to no keys at all.
#[derive(Debug, Clone)]
pub struct Keys(pub Option<Arc<KeyRing>>);

fn parse_keys(s: &str) -> Result<Keys, InvalidKey> {
    Ok(Keys(KeyRing::parse(s.to_owned())?.map(Arc::new)))
}

impl Config {
    /// The [`KeyRing`], if any key was configured.
    pub fn key_ring(&self) -> Option<Arc<KeyRing>> {
        self.keys.as_ref().and_then(|keys| keys.0.clone())
    }

    /// [`ClientOptions`] for the configured endpoint and timeout.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Build a [`Generator`]. Returns `Ok(None)` if no key is configured.
    pub fn generator(&self) -> client::Result<Option<Generator>> {
        let Some(keys) = self.key_ring() else {
            return Ok(None);
        };

        let client = Client::new(keys, self.client_options())?;
        Ok(Some(Generator::new(client).model(self.model)))
    }
}

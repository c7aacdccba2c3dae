use crate::twitter_client::oauth::{OAuthDefaults, OAuthOptions};
use crate::twitter_client::{normalize_base_url, TWITTER_API_BASE_URL};
use anyhow::{anyhow, Context, Result};
use std::env;

/// Out-of-band callback: the user is shown a PIN instead of being redirected.
pub const OOB_CALLBACK: &str = "oob";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback: Option<String>,
}

impl ClientConfig {
    pub fn new(consumer_key: &str, consumer_secret: &str) -> Self {
        Self {
            base_url: TWITTER_API_BASE_URL.to_string(),
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            callback: None,
        }
    }

    /// Reads `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`, and optionally
    /// `TWITTER_CALLBACK_URL` and `TWITTER_API_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| lookup(key).ok_or(anyhow!("Missing `{key}`"));

        let mut config = Self::new(
            &require("TWITTER_CONSUMER_KEY")?,
            &require("TWITTER_CONSUMER_SECRET")?,
        );
        config.callback = Some(lookup("TWITTER_CALLBACK_URL").unwrap_or(OOB_CALLBACK.to_string()));

        if let Some(base_url) = lookup("TWITTER_API_BASE_URL") {
            config.base_url = normalize_base_url(&base_url)
                .with_context(|| anyhow!("Invalid `TWITTER_API_BASE_URL`: {base_url}"))?;
        }

        Ok(config)
    }

    /// Only the request-token leg picks up the callback; see `TwitterClient::dispatch`.
    pub fn oauth_defaults(&self) -> OAuthDefaults {
        OAuthDefaults {
            callback: self.callback.clone(),
            ..Default::default()
        }
    }

    /// Consumer credentials with nothing else set; the starting point for every call.
    pub fn oauth_options(&self) -> OAuthOptions {
        OAuthOptions::new(&self.consumer_key, &self.consumer_secret)
    }
}

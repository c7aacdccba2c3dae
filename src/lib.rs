pub mod config;
pub mod twitter_client;

pub use twitter_client::error::{Outcome, TransportError, TwitterError};
pub use twitter_client::oauth::{OAuthDefaults, OAuthOptions};
pub use twitter_client::TwitterClient;

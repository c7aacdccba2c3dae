pub mod api;
pub mod decode;
pub mod error;
pub mod oauth;
pub mod response;
pub mod shape;
pub mod transport;

use crate::config::ClientConfig;
use error::Outcome;
use hyper::header::{AUTHORIZATION, USER_AGENT};
use hyper::{Body, Method, Request};
use oauth::{OAuthDefaults, OAuthOptions};
use response::WireFormat;
use serde::de::DeserializeOwned;
use shape::Shaped;
use tracing::{debug, instrument, warn};
use transport::{HttpsTransport, RawResponse, Transport};
use url::Url;

pub const TWITTER_API_BASE_URL: &str = "https://api.twitter.com";

/// Lowercases scheme and host and drops a default port, so the URL that gets signed is the one the
/// server reconstructs. No trailing slash.
pub fn normalize_base_url(base_url: &str) -> Result<String, url::ParseError> {
    let url = Url::parse(base_url)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    OAuthAuthenticate,
    OAuthRequestToken,
    OAuthAccessToken,
    StatusesHomeTimeline,
    AccountVerifyCredentials,
    AccountSettings,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::OAuthAuthenticate => "/oauth/authenticate",
            Self::OAuthRequestToken => "/oauth/request_token",
            Self::OAuthAccessToken => "/oauth/access_token",
            Self::StatusesHomeTimeline => "/1.1/statuses/home_timeline.json",
            Self::AccountVerifyCredentials => "/1.1/account/verify_credentials.json",
            Self::AccountSettings => "/1.1/account/settings.json",
        }
    }
}

/// NB: holds no per-user state. Credentials travel with each call, so one client can serve any
/// number of users concurrently.
#[derive(Debug, Clone)]
pub struct TwitterClient<T = HttpsTransport> {
    transport: T,
    base_url: String,
    defaults: OAuthDefaults,
}

impl TwitterClient<HttpsTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(HttpsTransport::new(), &config.base_url, config.oauth_defaults())
    }
}

impl<T: Transport> TwitterClient<T> {
    pub fn with_transport(transport: T, base_url: &str, defaults: OAuthDefaults) -> Self {
        let base_url = normalize_base_url(base_url).unwrap_or_else(|error| {
            warn!(%base_url, %error, "base URL did not parse; using it as given");
            base_url.trim_end_matches('/').to_string()
        });
        Self {
            transport,
            base_url,
            defaults,
        }
    }

    /// Signs and sends one request. The response status is not interpreted here.
    #[instrument(skip(self, endpoint, query, oauth), fields(endpoint = endpoint.path()))]
    pub async fn dispatch(
        &self,
        method: Method,
        endpoint: Endpoint,
        query: &[(String, String)],
        oauth: &OAuthOptions,
    ) -> Outcome<RawResponse> {
        let credentials = match endpoint {
            Endpoint::OAuthRequestToken => oauth.with_defaults(&self.defaults),
            _ => oauth.with_defaults(&self.defaults.without_callback()),
        };

        let base_url = format!("{}{}", self.base_url, endpoint.path());
        let url = if query.is_empty() {
            base_url.clone()
        } else {
            format!("{base_url}?{}", oauth::encode_query_string(query))
        };

        let authorization = oauth::sign(&method, &base_url, query, &credentials)?;
        let req = Request::builder()
            .method(method.clone())
            .uri(url)
            .header(AUTHORIZATION, authorization)
            .header(
                USER_AGENT,
                concat!("twitter-api-client/", env!("CARGO_PKG_VERSION")),
            )
            .body(Body::empty())
            .map_err(error::TransportError::from)?;

        debug!(%method, "sending request");
        let resp = self.transport.send(req).await?;
        debug!(status = resp.status().as_u16(), "received response");
        Ok(resp)
    }

    async fn fetch<R: Shaped + DeserializeOwned>(
        &self,
        method: Method,
        endpoint: Endpoint,
        query: &[(String, String)],
        oauth: &OAuthOptions,
        format: WireFormat,
    ) -> Outcome<R> {
        let dispatched = self.dispatch(method, endpoint, query, oauth).await;
        response::classify(dispatched, format)
    }

    // https://developer.twitter.com/en/docs/authentication/api-reference/request_token
    pub async fn get_request_token(
        &self,
        oauth: &OAuthOptions,
    ) -> Outcome<api::RequestTokenResponse> {
        self.fetch(
            Method::POST,
            Endpoint::OAuthRequestToken,
            &[],
            oauth,
            WireFormat::Form,
        )
        .await
    }

    /// Where the user goes to approve the request token.
    pub fn authenticate_url(&self, request_token: &api::RequestTokenResponse) -> String {
        format!(
            "{}{}?oauth_token={}",
            self.base_url,
            Endpoint::OAuthAuthenticate.path(),
            oauth::percent_encode(&request_token.oauth_token)
        )
    }

    // https://developer.twitter.com/en/docs/authentication/api-reference/access_token
    pub async fn get_access_token(
        &self,
        oauth: &OAuthOptions,
    ) -> Outcome<api::AccessTokenResponse> {
        self.fetch(
            Method::POST,
            Endpoint::OAuthAccessToken,
            &[],
            oauth,
            WireFormat::Form,
        )
        .await
    }

    pub async fn fetch_home_timeline(
        &self,
        oauth: &OAuthOptions,
        query: &api::HomeTimelineQuery,
    ) -> Outcome<Vec<api::Tweet>> {
        let query = decode::encode_query(query)?;
        self.fetch(
            Method::GET,
            Endpoint::StatusesHomeTimeline,
            &query,
            oauth,
            WireFormat::Json,
        )
        .await
    }

    pub async fn fetch_account_verify_credentials(
        &self,
        oauth: &OAuthOptions,
    ) -> Outcome<api::User> {
        self.fetch(
            Method::GET,
            Endpoint::AccountVerifyCredentials,
            &[],
            oauth,
            WireFormat::Json,
        )
        .await
    }

    pub async fn fetch_account_settings(
        &self,
        oauth: &OAuthOptions,
    ) -> Outcome<api::AccountSettings> {
        self.fetch(
            Method::GET,
            Endpoint::AccountSettings,
            &[],
            oauth,
            WireFormat::Json,
        )
        .await
    }
}

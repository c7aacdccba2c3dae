//! OAuth 1.0a request signing.
//!
//! [`percent_encode`] is the only encoder in the crate: it feeds both the signature base string and
//! the query string that goes on the wire. Using anything else for either (e.g. form encoding,
//! which turns spaces into `+`) yields a request the server rejects with a 401.

use crate::twitter_client::api::RequestTokenResponse;
use crate::twitter_client::error::TransportError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use hyper::Method;
use itertools::Itertools;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

/// RFC 3986 unreserved characters stay as-is; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Credentials for a single call. Only the consumer pair is always required; the optional fields
/// are present for specific handshake legs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthOptions {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback: Option<String>,
    pub token: Option<String>,
    pub token_secret: Option<String>,
    pub verifier: Option<String>,
}

/// Fallbacks for the optional credential fields, passed explicitly rather than held globally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthDefaults {
    pub callback: Option<String>,
    pub token: Option<String>,
    pub token_secret: Option<String>,
    pub verifier: Option<String>,
}

impl OAuthDefaults {
    /// The callback only belongs on the request-token leg.
    pub fn without_callback(&self) -> Self {
        Self {
            callback: None,
            ..self.clone()
        }
    }
}

impl OAuthOptions {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.verifier = Some(verifier.into());
        self
    }

    /// Credentials for the access-token leg: the request token pair plus the user's verifier. Any
    /// callback from the request-token leg is dropped.
    pub fn for_access_token(
        &self,
        request_token: &RequestTokenResponse,
        verifier: impl Into<String>,
    ) -> Self {
        Self {
            callback: None,
            ..self.clone()
        }
        .with_token(
            request_token.oauth_token.clone(),
            request_token.oauth_token_secret.clone(),
        )
        .with_verifier(verifier)
    }

    /// Fields set on `self` win; unset fields fall back to `defaults`.
    pub fn with_defaults(&self, defaults: &OAuthDefaults) -> Self {
        Self {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            callback: self.callback.clone().or_else(|| defaults.callback.clone()),
            token: self.token.clone().or_else(|| defaults.token.clone()),
            token_secret: self
                .token_secret
                .clone()
                .or_else(|| defaults.token_secret.clone()),
            verifier: self.verifier.clone().or_else(|| defaults.verifier.clone()),
        }
    }
}

pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Serializes query pairs for the wire with the same encoder the signature uses.
pub fn encode_query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .join("&")
}

/// Builds the `Authorization` header value for a request.
///
/// `url` must not carry a query string; query parameters go in `params`.
pub fn sign(
    method: &Method,
    url: &str,
    params: &[(String, String)],
    oauth: &OAuthOptions,
) -> Result<String, TransportError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TransportError::Signing(format!("Failed to get timestamp: {e}")))?
        .as_secs();
    sign_with_nonce(method, url, params, oauth, &generate_nonce(), timestamp)
}

pub fn sign_with_nonce(
    method: &Method,
    url: &str,
    params: &[(String, String)],
    oauth: &OAuthOptions,
    nonce: &str,
    timestamp: u64,
) -> Result<String, TransportError> {
    let mut oauth_params = protocol_params(oauth, nonce, timestamp);

    let base_string = signature_base_string(method, url, params, &oauth_params);
    let signing_key = format!(
        "{}&{}",
        percent_encode(&oauth.consumer_secret),
        percent_encode(oauth.token_secret.as_deref().unwrap_or(""))
    );
    let signature = hmac_sha1(&signing_key, &base_string)?;
    oauth_params.push(("oauth_signature", signature));
    oauth_params.sort();

    let header = oauth_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
        .join(", ");

    Ok(format!("OAuth {header}"))
}

/// The `oauth_*` parameters for a request, minus the signature. Absent credential fields are left
/// out rather than sent empty.
fn protocol_params(
    oauth: &OAuthOptions,
    nonce: &str,
    timestamp: u64,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("oauth_consumer_key", oauth.consumer_key.clone()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_signature_method", "HMAC-SHA1".to_string()),
        ("oauth_timestamp", timestamp.to_string()),
        ("oauth_version", "1.0".to_string()),
    ];
    let optional = [
        ("oauth_callback", &oauth.callback),
        ("oauth_token", &oauth.token),
        ("oauth_verifier", &oauth.verifier),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            params.push((key, value.clone()));
        }
    }
    params
}

pub(crate) fn signature_base_string(
    method: &Method,
    url: &str,
    params: &[(String, String)],
    oauth_params: &[(&'static str, String)],
) -> String {
    // Sorted by encoded key, then encoded value
    let parameter_string = oauth_params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .chain(
            params
                .iter()
                .map(|(key, value)| (percent_encode(key), percent_encode(value))),
        )
        .sorted()
        .map(|(key, value)| format!("{key}={value}"))
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hmac_sha1(key: &str, data: &str) -> Result<String, TransportError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| TransportError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

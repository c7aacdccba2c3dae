//! Turning a dispatched request into exactly one typed outcome.
//!
//! ```text
//! Dispatched ──transport failed──────────────────────────────▶ Err(Transport)
//!     │
//!     ├── 2xx ──── body matches shape ───────────────────────▶ Ok(T)
//!     │       └─── body malformed / wrong shape ──────────────▶ Err(Parsing | Validation)
//!     │
//!     └── non-2xx ─ error body well formed ──────────────────▶ Err(Api { status, errors })
//!             └──── error body malformed / wrong shape ──────▶ Err(Parsing | Validation)
//! ```

use crate::twitter_client::api::ApiErrorBody;
use crate::twitter_client::decode;
use crate::twitter_client::error::{Outcome, TwitterError};
use crate::twitter_client::shape::Shaped;
use crate::twitter_client::transport::RawResponse;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// How an endpoint encodes its success body. Error bodies are always JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Form,
}

impl WireFormat {
    pub fn decode<T: Shaped + DeserializeOwned>(self, text: &str) -> Outcome<T> {
        match self {
            Self::Json => decode::json_decode_str(text),
            Self::Form => decode::form_decode_str(text),
        }
    }
}

pub fn classify<T: Shaped + DeserializeOwned>(
    dispatched: Outcome<RawResponse>,
    format: WireFormat,
) -> Outcome<T> {
    let response = dispatched?;
    let status = response.status();
    let text = response.text()?;

    if response.is_success() {
        let decoded = format.decode::<T>(text);
        match &decoded {
            Ok(_) => debug!(%status, "decoded response"),
            Err(error) => warn!(%status, %error, "response body did not decode"),
        }
        decoded
    } else {
        let ApiErrorBody { errors } =
            decode::json_decode_str::<ApiErrorBody>(text).map_err(|error| {
                warn!(%status, %error, "error response body did not decode");
                error
            })?;
        let error = TwitterError::Api {
            status: status.as_u16(),
            errors,
        };
        warn!(%error, "Twitter API returned an error");
        Err(error)
    }
}

use crate::twitter_client::decode;
use crate::twitter_client::error::{Outcome, TransportError, TwitterError};
use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::{Body, Client, HeaderMap, Request, StatusCode};
use hyper_tls::HttpsConnector;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP response as received, before any interpretation of the body.
#[derive(Clone, Debug)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Outcome<&str> {
        std::str::from_utf8(&self.body)
            .map_err(|error| TwitterError::parsing(&String::from_utf8_lossy(&self.body), error))
    }

    pub fn json(&self) -> Outcome<Value> {
        self.text().and_then(decode::parse_json)
    }
}

/// Sends one request and returns whatever came back. Anything short of a complete response is a
/// `TransportError`; status codes are not interpreted here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Body>) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpsTransport {
    https_client: Client<HttpsConnector<HttpConnector>>,
    timeout: Duration,
}

impl HttpsTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// `timeout` bounds the whole exchange, body included.
    pub fn with_timeout(timeout: Duration) -> Self {
        let https = HttpsConnector::new();
        let https_client = Client::builder().build::<_, hyper::Body>(https);
        Self {
            https_client,
            timeout,
        }
    }
}

impl Default for HttpsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn send(&self, request: Request<Body>) -> Result<RawResponse, TransportError> {
        let exchange = async {
            let resp = self.https_client.request(request).await?;
            let (parts, body) = resp.into_parts();
            let body = hyper::body::to_bytes(body).await?;
            Ok::<_, TransportError>(RawResponse::new(parts.status, parts.headers, body))
        };
        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use hyper::header::AUTHORIZATION;
    use hyper::Method;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Clone, Debug)]
    pub struct SentRequest {
        pub method: Method,
        pub uri: String,
        pub authorization: String,
    }

    pub enum Reply {
        Respond(u16, &'static str),
        TimedOut,
    }

    /// Replays canned replies in order and records every request it is handed.
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<Reply>>,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl MockTransport {
        pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: Request<Body>) -> Result<RawResponse, TransportError> {
            let authorization = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            self.sent.lock().unwrap().push(SentRequest {
                method: request.method().clone(),
                uri: request.uri().to_string(),
                authorization,
            });

            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Respond(status, body)) => Ok(RawResponse::new(
                    StatusCode::from_u16(status).unwrap(),
                    HeaderMap::new(),
                    body,
                )),
                Some(Reply::TimedOut) => Err(TransportError::Timeout(DEFAULT_TIMEOUT)),
                None => panic!("no reply queued for {}", request.uri()),
            }
        }
    }
}

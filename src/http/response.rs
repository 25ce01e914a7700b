//! Download outcomes: responses and failures

use crate::http::{Context, Request};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// A successfully downloaded response
///
/// Carries the handler identifier and context of the request that produced it.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
    handler: Option<String>,
    context: Context,
}

impl Response {
    /// Builds the canonical response for `request`
    pub fn new(request: &Request, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            url: request.url().clone(),
            headers,
            body,
            handler: request.handler().map(str::to_string),
            context: request.context(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// URL of the originating request
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    pub fn context(&self) -> Context {
        self.context
    }
}

/// Classification of a failed download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCode {
    /// The server answered with an error status
    Status(u16),
    /// The request exceeded the transport timeout
    Timeout,
    /// The connection could not be established
    Connect,
    /// Any other transport error
    Other,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Timeout => f.write_str("timeout"),
            Self::Connect => f.write_str("connect"),
            Self::Other => f.write_str("error"),
        }
    }
}

/// A download that did not produce a usable response
#[derive(Debug, Clone)]
pub struct Failure {
    code: FailureCode,
    message: String,
    url: Url,
    context: Context,
}

impl Failure {
    pub fn new(request: &Request, code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            url: request.url().clone(),
            context: request.context(),
        }
    }

    /// Classifies a reqwest transport error
    pub fn from_reqwest(request: &Request, error: &reqwest::Error) -> Self {
        let code = if error.is_timeout() {
            FailureCode::Timeout
        } else if error.is_connect() {
            FailureCode::Connect
        } else if let Some(status) = error.status() {
            FailureCode::Status(status.as_u16())
        } else {
            FailureCode::Other
        };

        Self::new(request, code, error.to_string())
    }

    pub fn code(&self) -> FailureCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn context(&self) -> Context {
        self.context
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.url, self.code, self.message)
    }
}

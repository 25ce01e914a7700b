//! Request and outcome types that cross the engine boundary
//!
//! - `Request`: a planned download, routed to a handler by an optional identifier
//! - `Response`: a successful download
//! - `Failure`: a rejected download with its error classification
//! - `Context`: the correlation token carried from a request to its outcome

mod request;
mod response;

pub use request::Request;
pub use response::{Failure, FailureCode, Response};

/// Opaque correlation token
///
/// The engine never interprets it; it is copied from a request onto the
/// response or failure that request produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Context(u64);

impl Context {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Context {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

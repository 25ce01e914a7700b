//! Spider contract and handler registry
//!
//! A spider supplies the seed requests, a default `parse` handler, any number
//! of named handlers, and a completion hook. Handlers receive the response and
//! a [`Scheduler`] handle, and may return a sequence of follow-up requests.
//!
//! # Example
//!
//! ```no_run
//! use ripple_engine::{FollowUps, HandlerRegistry, HandlerResult, Request, Response, Scheduler, Spider};
//!
//! struct Catalog {
//!     seeds: Vec<String>,
//! }
//!
//! impl Catalog {
//!     fn parse_item(&mut self, response: Response, _: &mut Scheduler<'_>) -> HandlerResult {
//!         println!("item {} -> {}", response.url(), response.status());
//!         Ok(FollowUps::none())
//!     }
//! }
//!
//! impl Spider for Catalog {
//!     fn start_requests(&mut self) -> Box<dyn Iterator<Item = Request> + '_> {
//!         Box::new(self.seeds.iter().filter_map(|s| Request::get(s).ok()))
//!     }
//!
//!     fn parse(&mut self, response: Response, _: &mut Scheduler<'_>) -> HandlerResult {
//!         let next = response.url().join("/item/1")?;
//!         Ok(FollowUps::one(Request::new(next).with_handler("item")))
//!     }
//!
//!     fn handlers(&self) -> HandlerRegistry<Self> {
//!         HandlerRegistry::new().register("item", Self::parse_item)
//!     }
//! }
//! ```

use crate::http::{Request, Response};
use crate::scheduler::Scheduler;
use crate::HandlerError;
use std::collections::HashMap;
use std::fmt;

/// What a handler produces: follow-up requests, or an error
pub type HandlerResult = Result<FollowUps, HandlerError>;

/// A response handler bound to spider type `S`
pub type Handler<S> = for<'a, 'b> fn(&mut S, Response, &'a mut Scheduler<'b>) -> HandlerResult;

/// Lazily produced follow-up requests
///
/// The engine drains the whole sequence before it pulls the next batch, so an
/// endless sequence never returns control to the drive loop.
pub struct FollowUps(Option<Box<dyn Iterator<Item = Request>>>);

impl FollowUps {
    /// No follow-up requests
    pub fn none() -> Self {
        Self(None)
    }

    pub fn one(request: Request) -> Self {
        Self::new(std::iter::once(request))
    }

    /// Wraps any request sequence; it is consumed lazily while being drained
    pub fn new<I>(requests: I) -> Self
    where
        I: IntoIterator<Item = Request>,
        I::IntoIter: 'static,
    {
        Self(Some(Box::new(requests.into_iter())))
    }
}

impl Default for FollowUps {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<Request>> for FollowUps {
    fn from(requests: Vec<Request>) -> Self {
        Self::new(requests)
    }
}

impl Iterator for FollowUps {
    type Item = Request;

    fn next(&mut self) -> Option<Request> {
        self.0.as_mut()?.next()
    }
}

impl fmt::Debug for FollowUps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FollowUps")
            .field(&if self.0.is_some() { "<sequence>" } else { "<none>" })
            .finish()
    }
}

/// Named handlers of a spider, resolved by the handler identifier a response carries
pub struct HandlerRegistry<S> {
    handlers: HashMap<String, Handler<S>>,
}

impl<S> HandlerRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` under `name`, replacing any previous registration
    pub fn register(mut self, name: impl Into<String>, handler: Handler<S>) -> Self {
        self.insert(name, handler);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: Handler<S>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Handler<S>> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> Default for HandlerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the contract for a spider driven by the engine
pub trait Spider: Send {
    /// Name used in log output
    fn name(&self) -> &str {
        "spider"
    }

    /// Seed requests; consumed once, before the first batch
    fn start_requests(&mut self) -> Box<dyn Iterator<Item = Request> + '_>;

    /// Default handler for responses that name no handler
    fn parse(&mut self, response: Response, scheduler: &mut Scheduler<'_>) -> HandlerResult;

    /// Named handlers, collected once when the spider is opened
    fn handlers(&self) -> HandlerRegistry<Self>
    where
        Self: Sized,
    {
        HandlerRegistry::new()
    }

    /// Called exactly once, after the queue has drained
    fn finish(&mut self) {}
}

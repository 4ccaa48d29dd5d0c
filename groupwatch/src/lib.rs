#![deny(unused_must_use)]

mod error;
pub use error::Error;

/// Member resolution and local address discovery.
pub mod resolver;
pub use resolver::{local_ip, DnsResolver, Resolver};

/// Where errors raised inside a running watch go.
pub mod report;
pub use report::{ErrorReporter, LogReporter};

/// Implementation of the membership watcher.
pub mod watcher;
pub use watcher::{
    notifier_fn, watch, Canonicalization, FnNotifier, Notifier, ResolveErrorPolicy, Ticker,
    WatchConfig, WatchHandle, Watcher, DEFAULT_TICK_INTERVAL,
};

use anyhow::{Context, Result};
use derive_more::{Deref, Display, From};
use std::sync::Arc;
use std::time::Duration;

/// Addresses of the members of a service at one point in time.
/// The order is the one given by the resolver and carries no meaning.
pub type MemberSet = Vec<String>;

/// Name of the watched service as it is looked up in DNS.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Deref, From)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for ServiceName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

use super::*;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

mod canonical;
pub use canonical::Canonicalization;
use canonical::CanonicalForm;
mod thread;

/// Default period between two resolutions.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the watcher does when the resolver fails on a tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResolveErrorPolicy {
    /// Report the error and try again on the next tick.
    #[default]
    Continue,
    /// Report the error and stop watching.
    Stop,
}

#[derive(Clone, Debug)]
pub struct WatchConfig {
    /// Period between two resolutions. Default is 1 second.
    pub tick_interval: Duration,
    /// Upper bound of a single resolver call. Default is no bound.
    pub resolve_timeout: Option<Duration>,
    /// Default is `ResolveErrorPolicy::Continue`.
    pub on_resolve_error: ResolveErrorPolicy,
    /// Default is `Canonicalization::Sorted`.
    pub canonicalization: Canonicalization,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            resolve_timeout: None,
            on_resolve_error: ResolveErrorPolicy::default(),
            canonicalization: Canonicalization::default(),
        }
    }
}

impl WatchConfig {
    pub fn with_tick_interval(self, tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            ..self
        }
    }
}

/// `Notifier` is called with the new member set each time the membership changes.
///
/// It runs inline in the polling loop so a slow notifier delays the next tick.
/// A failed notification is reported and never retried.
#[async_trait::async_trait]
pub trait Notifier: Sync + Send + 'static {
    async fn notify(&self, members: MemberSet) -> Result<()>;
}

/// Adapter to use a closure as a `Notifier`.
pub struct FnNotifier<F>(F);

#[async_trait::async_trait]
impl<F> Notifier for FnNotifier<F>
where
    F: Fn(MemberSet) -> Result<()> + Sync + Send + 'static,
{
    async fn notify(&self, members: MemberSet) -> Result<()> {
        (self.0)(members)
    }
}

pub fn notifier_fn<F>(f: F) -> FnNotifier<F>
where
    F: Fn(MemberSet) -> Result<()> + Sync + Send + 'static,
{
    FnNotifier(f)
}

/// Source of ticks driving the polling loop.
/// The loop stops when the source is exhausted.
#[async_trait::async_trait]
pub trait Ticker: Send + 'static {
    async fn tick(&mut self) -> Option<Instant>;
}

#[async_trait::async_trait]
impl Ticker for tokio::time::Interval {
    async fn tick(&mut self) -> Option<Instant> {
        Some(tokio::time::Interval::tick(self).await)
    }
}

#[async_trait::async_trait]
impl Ticker for tokio::sync::mpsc::Receiver<Instant> {
    async fn tick(&mut self) -> Option<Instant> {
        self.recv().await
    }
}

/// Handle to a running watch.
///
/// Dropping the handle cancels the watch unless it is detached.
#[must_use = "dropping the handle cancels the watch"]
pub struct WatchHandle {
    service: ServiceName,
    token: CancellationToken,
    join_handle: Option<JoinHandle<()>>,
    detached: bool,
}

impl WatchHandle {
    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    /// Signal the polling task to stop. Calling it again has no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the polling task has exited.
    /// Once this returns, neither the resolver nor the notifier is called again.
    pub async fn stopped(&mut self) {
        if let Some(hdl) = self.join_handle.take() {
            hdl.await.ok();
        }
    }

    /// Let the watch run until the parent token is cancelled.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if !self.detached {
            self.token.cancel();
        }
    }
}

/// `Watcher` starts watches sharing one resolver, one reporter and one configuration.
pub struct Watcher<R = DnsResolver> {
    resolver: Arc<R>,
    reporter: Arc<dyn ErrorReporter>,
    config: WatchConfig,
}

impl Watcher<DnsResolver> {
    /// Create a watcher resolving services with DNS.
    pub fn new(config: WatchConfig) -> Self {
        Self::with_resolver(DnsResolver, config)
    }
}

impl<R: Resolver> Watcher<R> {
    pub fn with_resolver(resolver: R, config: WatchConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            reporter: Arc::new(LogReporter),
            config,
        }
    }

    /// Replace the default `LogReporter`.
    pub fn with_reporter(self, reporter: impl ErrorReporter) -> Self {
        Self {
            reporter: Arc::new(reporter),
            ..self
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Start watching `service`.
    ///
    /// The service is resolved once before anything is spawned.
    /// If that fails the error is returned and nothing runs.
    /// The first tick fires one `tick_interval` after the start.
    pub async fn start(
        &self,
        parent: &CancellationToken,
        service: impl Into<ServiceName>,
        notifier: impl Notifier,
    ) -> std::result::Result<WatchHandle, Error> {
        let period = self.config.tick_interval;
        if period.is_zero() {
            return Err(Error::ZeroTickInterval);
        }
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        // Ticks missed by a slow resolver or notifier are dropped.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.start_with_ticker(parent, service, notifier, interval).await
    }

    /// Same as `start` but ticks come from `ticker` instead of `tick_interval`.
    pub async fn start_with_ticker(
        &self,
        parent: &CancellationToken,
        service: impl Into<ServiceName>,
        notifier: impl Notifier,
        ticker: impl Ticker,
    ) -> std::result::Result<WatchHandle, Error> {
        let service = service.into();

        // Make sure the service exists before spawning anything.
        let members =
            thread::resolve(&*self.resolver, &service, self.config.resolve_timeout).await?;
        info!(
            "start watching {service} (n_members={}, tick_interval={:?})",
            members.len(),
            self.config.tick_interval
        );

        let token = parent.child_token();
        let join_handle = thread::new(
            service.clone(),
            self.resolver.clone(),
            notifier,
            self.reporter.clone(),
            ticker,
            self.config.clone(),
            token.clone(),
        );

        Ok(WatchHandle {
            service,
            token,
            join_handle: Some(join_handle),
            detached: false,
        })
    }
}

/// Watch `service` through DNS and call `notifier` whenever its members change.
pub async fn watch(
    parent: &CancellationToken,
    service: impl Into<ServiceName>,
    notifier: impl Notifier,
    config: WatchConfig,
) -> std::result::Result<WatchHandle, Error> {
    Watcher::new(config).start(parent, service, notifier).await
}

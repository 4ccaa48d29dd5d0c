use super::*;

use tracing::{debug, warn};

pub(super) async fn resolve<R: Resolver>(
    resolver: &R,
    service: &ServiceName,
    timeout: Option<Duration>,
) -> std::result::Result<MemberSet, Error> {
    let fut = resolver.resolve_members(service);
    let res = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, fut).await.map_err(|_| {
            Error::ResolutionTimeout {
                service: service.clone(),
                timeout,
            }
        })?,
        None => fut.await,
    };
    res.map_err(|source| Error::Resolution {
        service: service.clone(),
        source,
    })
}

struct Thread<R, N, T> {
    service: ServiceName,
    resolver: Arc<R>,
    notifier: N,
    reporter: Arc<dyn ErrorReporter>,
    ticker: T,
    config: WatchConfig,
    token: CancellationToken,
    /// `None` until the first notification.
    last_notified: Option<CanonicalForm>,
}

impl<R: Resolver, N: Notifier, T: Ticker> Thread<R, N, T> {
    async fn run_once(&mut self) -> std::result::Result<(), Error> {
        let members = resolve(&*self.resolver, &self.service, self.config.resolve_timeout).await?;

        let form = self.config.canonicalization.canonical_form(&members);
        if self.last_notified.as_ref() == Some(&form) {
            return Ok(());
        }

        // Cancellation may have come while resolving.
        if self.token.is_cancelled() {
            return Ok(());
        }

        info!("members of {} changed: {members:?}", self.service);
        // A failed notification is not rolled back.
        self.last_notified = Some(form);
        if let Err(source) = self.notifier.notify(members).await {
            self.reporter.report(&Error::Notification {
                service: self.service.clone(),
                source,
            });
        }

        Ok(())
    }

    async fn do_loop(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    debug!("watch of {} is cancelled", self.service);
                    break;
                }
                tick = self.ticker.tick() => {
                    if tick.is_none() {
                        debug!("ticker of {} is exhausted", self.service);
                        break;
                    }
                }
            }

            if let Err(e) = self.run_once().await {
                self.reporter.report(&e);
                if self.config.on_resolve_error == ResolveErrorPolicy::Stop {
                    warn!("stop watching {} on resolution failure", self.service);
                    break;
                }
            }
        }
    }
}

pub(super) fn new<R: Resolver, N: Notifier, T: Ticker>(
    service: ServiceName,
    resolver: Arc<R>,
    notifier: N,
    reporter: Arc<dyn ErrorReporter>,
    ticker: T,
    config: WatchConfig,
    token: CancellationToken,
) -> JoinHandle<()> {
    let thread = Thread {
        service,
        resolver,
        notifier,
        reporter,
        ticker,
        config,
        token,
        last_notified: None,
    };
    tokio::spawn(thread.do_loop())
}

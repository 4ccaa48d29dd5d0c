use anyhow::Result;
use env::*;
use groupwatch::{Error, WatchConfig, Watcher, DEFAULT_TICK_INTERVAL};
use std::time::Duration;
use test_log::test;
use tokio_util::sync::CancellationToken;

#[test]
fn default_config() {
    let config = WatchConfig::default();
    assert_eq!(config.tick_interval, Duration::from_secs(1));
    assert_eq!(config.tick_interval, DEFAULT_TICK_INTERVAL);
    assert!(config.resolve_timeout.is_none());
}

#[test(tokio::test(start_paused = true))]
async fn ticks_follow_interval() -> Result<()> {
    let resolver = ScriptedResolver::new();
    resolver.push_ok(&[]);
    resolver.push_ok(&["1"]);
    resolver.push_ok(&["1"]);
    resolver.push_ok(&["2"]);
    for _ in 0..100 {
        resolver.push_ok(&["2"]);
    }
    let notifier = RecordingNotifier::new();

    let watcher = Watcher::with_resolver(resolver.clone(), WatchConfig::default());
    let mut handle = watcher
        .start(&CancellationToken::new(), "svc", notifier.clone())
        .await?;

    // No tick before one interval has passed.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(resolver.n_calls(), 1);
    assert_eq!(notifier.n_calls(), 0);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(resolver.n_calls(), 4);
    assert_eq!(notifier.calls(), vec![members(&["1"]), members(&["2"])]);

    handle.cancel();
    handle.stopped().await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(resolver.n_calls(), 4);
    Ok(())
}

#[test(tokio::test(start_paused = true))]
async fn custom_tick_interval() -> Result<()> {
    let resolver = ScriptedResolver::new();
    for _ in 0..100 {
        resolver.push_ok(&["1"]);
    }
    let config = WatchConfig::default().with_tick_interval(Duration::from_millis(100));
    let watcher = Watcher::with_resolver(resolver.clone(), config);
    assert_eq!(watcher.config().tick_interval, Duration::from_millis(100));
    let _handle = watcher
        .start(&CancellationToken::new(), "svc", RecordingNotifier::new())
        .await?;

    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(resolver.n_calls(), 11);
    Ok(())
}

#[test(tokio::test)]
async fn zero_tick_interval() {
    let resolver = ScriptedResolver::new();
    resolver.push_ok(&[]);
    let config = WatchConfig::default().with_tick_interval(Duration::ZERO);
    let watcher = Watcher::with_resolver(resolver.clone(), config);
    let res = watcher
        .start(&CancellationToken::new(), "svc", RecordingNotifier::new())
        .await;
    assert!(matches!(res, Err(Error::ZeroTickInterval)));
    assert_eq!(resolver.n_calls(), 0);
}

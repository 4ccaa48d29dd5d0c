use anyhow::Result;
use groupwatch::{notifier_fn, WatchConfig};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(serde::Deserialize, Debug)]
struct EnvConfig {
    service: String,
    tick_interval_ms: Option<u64>,
    resolve_timeout_ms: Option<u64>,
}

impl EnvConfig {
    fn watch_config(&self) -> WatchConfig {
        let mut config = WatchConfig::default();
        if let Some(ms) = self.tick_interval_ms {
            config.tick_interval = Duration::from_millis(ms);
        }
        config.resolve_timeout = self.resolve_timeout_ms.map(Duration::from_millis);
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();
    tracing_subscriber::fmt().event_format(format).init();

    let env_config: EnvConfig = envy::from_env()?;
    info!("{env_config:?}");

    match groupwatch::local_ip().await {
        Ok(ip) => info!("local ip is {ip}"),
        Err(e) => warn!("could not derive local ip: {e:#}"),
    }

    let root = CancellationToken::new();
    let notifier = notifier_fn(|members| {
        info!("current members: {members:?}");
        Ok(())
    });
    let mut handle = groupwatch::watch(
        &root,
        env_config.service.as_str(),
        notifier,
        env_config.watch_config(),
    )
    .await?;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    root.cancel();
    handle.stopped().await;

    Ok(())
}

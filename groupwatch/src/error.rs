use super::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not get members of service {service}. error={source:#}")]
    Resolution {
        service: ServiceName,
        #[source]
        source: anyhow::Error,
    },
    #[error("resolving service {service} timed out after {timeout:?}")]
    ResolutionTimeout {
        service: ServiceName,
        timeout: Duration,
    },
    #[error("notifier failed for service {service}. error={source:#}")]
    Notification {
        service: ServiceName,
        #[source]
        source: anyhow::Error,
    },
    #[error("tick interval must be positive")]
    ZeroTickInterval,
}

impl Error {
    /// True if the resolver could not produce a member set.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::Resolution { .. } | Error::ResolutionTimeout { .. }
        )
    }
}

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cookie_session::SessionManager;

/// Periodically drop expired sessions that no request has looked up
pub(crate) fn spawn_session_sweeper(manager: SessionManager, period: Duration) -> JoinHandle<()> {
    tracing::info!("Session sweeper running every {:?}", period);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match manager.sweep_expired().await {
                Ok(removed) => tracing::trace!("Session sweep pass done ({} removed)", removed),
                Err(e) => tracing::warn!("Session sweep failed: {}", e),
            }
        }
    })
}

//! Background backend status polling
//!
//! A [`StatusMonitor`] checks the model status endpoint once at startup and
//! then on a fixed interval, publishing the result on a watch channel. It
//! never touches the session store.

use crate::chat_mode::BackendStatus;
use crate::remote::BackendClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to the polling task; dropping it stops polling
pub struct StatusMonitor {
    receiver: watch::Receiver<BackendStatus>,
    handle: JoinHandle<()>,
}

impl StatusMonitor {
    /// Start polling `client` every `interval`
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(client: BackendClient, interval: Duration) -> Self {
        let (sender, receiver) = watch::channel(BackendStatus::Unknown);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let status = client.check_status().await;
                tracing::debug!("Backend status: {}", status.label());
                if sender.send(status).is_err() {
                    break;
                }
            }
        });

        Self { receiver, handle }
    }

    /// Most recently observed status
    pub fn current(&self) -> BackendStatus {
        *self.receiver.borrow()
    }

    /// Receiver that sees every future status change
    pub fn subscribe(&self) -> watch::Receiver<BackendStatus> {
        self.receiver.clone()
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;

    #[tokio::test]
    async fn test_unreachable_backend_reports_offline() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: Some(2),
            ..RemoteConfig::default()
        };
        let client = BackendClient::new(&config).unwrap();
        let monitor = StatusMonitor::spawn(client, Duration::from_secs(60));
        let mut rx = monitor.subscribe();
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(monitor.current(), BackendStatus::Offline);
    }
}

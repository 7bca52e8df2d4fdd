//! Cancellable location watcher.
//!
//! Subscribes to a [`LocationSource`] and forwards fixes as
//! [`LocationEvent`]s from a background task. Each fix must arrive within
//! the configured timeout. Any error ends the subscription, as does
//! [`LocationWatcher::stop`] or dropping the watcher.

use super::source::LocationSource;
use super::types::{LocationError, LocationEvent, LocationOptions, PermissionState};
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Handle to a running location subscription.
pub struct LocationWatcher {
    /// Signals the task to end the subscription
    stop_tx: Option<oneshot::Sender<()>>,
    /// Background forwarding task
    handle: Option<JoinHandle<()>>,
    options: LocationOptions,
}

impl LocationWatcher {
    /// Start watching a location source.
    ///
    /// Fails without spawning anything when the device lacks location
    /// support or permission was already denied.
    pub fn start<S>(
        source: &mut S,
        options: LocationOptions,
    ) -> Result<(Self, mpsc::UnboundedReceiver<LocationEvent>), LocationError>
    where
        S: LocationSource + ?Sized,
    {
        if !source.is_supported() {
            tracing::warn!("Location tracking unsupported on this device");
            return Err(LocationError::DeviceUnsupported);
        }

        if source.permission_state() == PermissionState::Denied {
            tracing::warn!("Location permission already denied");
            return Err(LocationError::PermissionDenied);
        }

        let mut stream = source.subscribe(&options)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let timeout = options.timeout;

        tracing::info!(
            "Starting location tracking (high accuracy: {}, timeout: {:?})",
            options.high_accuracy,
            timeout
        );

        let handle = tokio::spawn(async move {
            let _ = event_tx.send(LocationEvent::Started);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        tracing::debug!("Location watcher stop requested");
                        break;
                    }
                    next = tokio::time::timeout(timeout, stream.next()) => match next {
                        Ok(Some(Ok(position))) => {
                            if event_tx.send(LocationEvent::Position(position)).is_err() {
                                break;
                            }
                        }
                        Ok(Some(Err(e))) => {
                            tracing::error!("Location error: {}", e);
                            let _ = event_tx.send(LocationEvent::Error(e));
                            break;
                        }
                        Ok(None) => {
                            tracing::debug!("Location stream ended");
                            break;
                        }
                        Err(_) => {
                            tracing::error!("No position within {:?}", timeout);
                            let _ = event_tx.send(LocationEvent::Error(LocationError::Timeout));
                            break;
                        }
                    }
                }
            }

            let _ = event_tx.send(LocationEvent::Stopped);
        });

        Ok((
            Self {
                stop_tx: Some(stop_tx),
                handle: Some(handle),
                options,
            },
            event_rx,
        ))
    }

    /// Options the subscription was started with.
    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// Whether the background task is still forwarding fixes.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// End the subscription. The receiver sees a final `Stopped` event.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            tracing::info!("Stopping location tracking");
            let _ = stop_tx.send(());
        }
        self.handle = None;
    }

    /// Stop and wait for the forwarding task to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for LocationWatcher {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

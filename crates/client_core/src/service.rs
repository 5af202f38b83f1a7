//! Contract consumed from the directory backend: a one-shot fetch plus a push
//! feed of complete snapshots.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::Doctor;
use tokio::sync::{broadcast, Notify};
use tracing::debug;

use crate::error::DirectoryError;

#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn get_doctors(&self) -> Result<Vec<Doctor>>;
    async fn subscribe_doctors(&self) -> Result<DoctorSubscription>;
}

pub struct MissingDirectoryService;

#[async_trait]
impl DirectoryService for MissingDirectoryService {
    async fn get_doctors(&self) -> Result<Vec<Doctor>> {
        Err(DirectoryError::Unavailable.into())
    }

    async fn subscribe_doctors(&self) -> Result<DoctorSubscription> {
        Err(DirectoryError::Unavailable.into())
    }
}

/// Cancels a [`DoctorSubscription`]. Cloneable so the owner of the feed and
/// the owner of its lifetime can differ; unsubscribing more than once is a
/// no-op.
#[derive(Clone)]
pub struct UnsubscribeHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl UnsubscribeHandle {
    pub fn unsubscribe(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct DoctorSubscription {
    updates: broadcast::Receiver<Vec<Doctor>>,
    handle: UnsubscribeHandle,
}

impl DoctorSubscription {
    pub fn new(updates: broadcast::Receiver<Vec<Doctor>>) -> Self {
        Self {
            updates,
            handle: UnsubscribeHandle {
                cancelled: Arc::new(AtomicBool::new(false)),
                notify: Arc::new(Notify::new()),
            },
        }
    }

    pub fn handle(&self) -> UnsubscribeHandle {
        self.handle.clone()
    }

    pub fn unsubscribe(&self) {
        self.handle.unsubscribe();
    }

    /// Next pushed snapshot, or `None` once unsubscribed or the feed closed.
    ///
    /// Lagging behind the feed only skips superseded snapshots, so it is not
    /// reported to the caller.
    pub async fn next(&mut self) -> Option<Vec<Doctor>> {
        loop {
            let cancelled = self.handle.notify.notified();
            tokio::pin!(cancelled);
            cancelled.as_mut().enable();
            if self.handle.is_unsubscribed() {
                return None;
            }

            tokio::select! {
                _ = &mut cancelled => return None,
                received = self.updates.recv() => match received {
                    Ok(doctors) => {
                        if self.handle.is_unsubscribed() {
                            return None;
                        }
                        return Some(doctors);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "subscription: skipped superseded snapshots");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_snapshots_until_unsubscribed() {
        let (tx, rx) = broadcast::channel(8);
        let mut subscription = DoctorSubscription::new(rx);

        tx.send(vec![Doctor::new(1, "Ivanov", "Cardiology")])
            .expect("send");
        let first = subscription.next().await.expect("first snapshot");
        assert_eq!(first.len(), 1);

        let handle = subscription.handle();
        handle.unsubscribe();
        handle.unsubscribe();
        subscription.unsubscribe();

        let _ = tx.send(vec![Doctor::new(2, "Petrova", "Neurology")]);
        assert_eq!(subscription.next().await, None);
        assert!(handle.is_unsubscribed());
    }

    #[tokio::test]
    async fn unsubscribe_wakes_a_pending_reader() {
        let (_tx, rx) = broadcast::channel::<Vec<Doctor>>(8);
        let mut subscription = DoctorSubscription::new(rx);
        let handle = subscription.handle();

        let reader = tokio::spawn(async move { subscription.next().await });
        tokio::task::yield_now().await;
        handle.unsubscribe();

        assert_eq!(reader.await.expect("join"), None);
    }

    #[tokio::test]
    async fn lagging_reader_resumes_with_newest_snapshots() {
        let (tx, rx) = broadcast::channel(1);
        let mut subscription = DoctorSubscription::new(rx);

        tx.send(vec![Doctor::new(1, "Ivanov", "Cardiology")])
            .expect("send first");
        tx.send(vec![Doctor::new(2, "Petrova", "Neurology")])
            .expect("send second");

        let latest = subscription.next().await.expect("snapshot");
        assert_eq!(latest[0].name, "Petrova");
    }

    #[tokio::test]
    async fn closed_feed_ends_subscription() {
        let (tx, rx) = broadcast::channel::<Vec<Doctor>>(8);
        let mut subscription = DoctorSubscription::new(rx);
        drop(tx);
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn missing_service_reports_unavailable() {
        let err = MissingDirectoryService
            .get_doctors()
            .await
            .expect_err("should fail");
        assert!(matches!(
            err.downcast_ref::<DirectoryError>(),
            Some(DirectoryError::Unavailable)
        ));
        assert!(MissingDirectoryService.subscribe_doctors().await.is_err());
    }
}

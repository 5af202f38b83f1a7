//! Keeps the doctor list current: cache first, then the authoritative fetch,
//! then push updates until deactivated.

use std::sync::Arc;

use shared::domain::Doctor;
use storage::DirectoryCache;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::service::{DirectoryService, DoctorSubscription, UnsubscribeHandle};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub doctors: Vec<Doctor>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Cache,
    Fetch,
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Updated { source: UpdateSource, count: usize },
    FetchFailed { message: String },
    SubscriptionFailed { message: String },
    Deactivated,
}

struct ActivePush {
    handle: UnsubscribeHandle,
    task: JoinHandle<()>,
}

struct ControllerState {
    doctors: Vec<Doctor>,
    loading: bool,
    active: bool,
    /// Bumped on every activation; callbacks carry the value they were
    /// started under and are dropped once it no longer matches.
    generation: u64,
    push: Option<ActivePush>,
}

impl ControllerState {
    fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }
}

pub struct DirectoryController {
    service: Arc<dyn DirectoryService>,
    cache: DirectoryCache,
    inner: Mutex<ControllerState>,
    /// Serializes cache writes so a stale write cannot land after a newer one.
    persist: Mutex<()>,
    events: broadcast::Sender<DirectoryEvent>,
}

impl DirectoryController {
    pub fn new(service: Arc<dyn DirectoryService>, cache: DirectoryCache) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            service,
            cache,
            inner: Mutex::new(ControllerState {
                doctors: Vec::new(),
                loading: true,
                active: false,
                generation: 0,
                push: None,
            }),
            persist: Mutex::new(()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        let guard = self.inner.lock().await;
        DirectorySnapshot {
            doctors: guard.doctors.clone(),
            loading: guard.loading,
        }
    }

    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.active
    }

    /// Shows the cached list, fetches the authoritative one and starts the
    /// push feed. Returns once the fetch has settled; calling it again while
    /// active does nothing.
    pub async fn activate(self: &Arc<Self>) {
        let generation = {
            let mut guard = self.inner.lock().await;
            if guard.active {
                debug!(generation = guard.generation, "directory: already active");
                return;
            }
            guard.active = true;
            guard.loading = true;
            guard.generation += 1;
            guard.generation
        };
        info!(generation, "directory: activating");

        if let Some(cached) = self.cache.load().await {
            let count = cached.len();
            {
                let mut guard = self.inner.lock().await;
                if !guard.is_current(generation) {
                    debug!(generation, "directory: deactivated while reading cache");
                    return;
                }
                guard.doctors = cached;
            }
            self.emit(DirectoryEvent::Updated {
                source: UpdateSource::Cache,
                count,
            });
        }

        let (fetched, subscription) = tokio::join!(
            self.service.get_doctors(),
            self.service.subscribe_doctors()
        );

        match fetched {
            Ok(doctors) => {
                self.apply(generation, doctors, UpdateSource::Fetch).await;
            }
            Err(err) => self.fetch_failed(generation, err).await,
        }

        match subscription {
            Ok(subscription) => self.start_push_feed(generation, subscription).await,
            Err(err) => {
                warn!(generation, "directory: push subscription failed: {err:#}");
                self.emit(DirectoryEvent::SubscriptionFailed {
                    message: format!("{err:#}"),
                });
            }
        }
    }

    /// Releases the push subscription. Late fetch results and pushes are
    /// ignored from here on. Safe to call repeatedly.
    pub async fn deactivate(&self) {
        let push = {
            let mut guard = self.inner.lock().await;
            if !guard.active {
                return;
            }
            guard.active = false;
            guard.push.take()
        };

        if let Some(push) = push {
            push.handle.unsubscribe();
            push.task.abort();
        }
        info!("directory: deactivated");
        self.emit(DirectoryEvent::Deactivated);
    }

    async fn apply(&self, generation: u64, doctors: Vec<Doctor>, source: UpdateSource) {
        let count = doctors.len();
        {
            let mut guard = self.inner.lock().await;
            if !guard.is_current(generation) {
                debug!(generation, ?source, "directory: ignoring stale update");
                return;
            }
            guard.doctors = doctors.clone();
            if source == UpdateSource::Fetch {
                guard.loading = false;
            }
        }
        info!(generation, ?source, count, "directory: list replaced");

        {
            let _persist = self.persist.lock().await;
            if !self.inner.lock().await.is_current(generation) {
                debug!(generation, ?source, "directory: skipping stale cache write");
                return;
            }
            if let Err(err) = self.cache.save(&doctors).await {
                warn!("directory: failed to persist snapshot: {err:#}");
            }
        }
        self.emit(DirectoryEvent::Updated { source, count });
    }

    async fn fetch_failed(&self, generation: u64, err: anyhow::Error) {
        {
            let mut guard = self.inner.lock().await;
            if !guard.is_current(generation) {
                debug!(generation, "directory: ignoring late fetch failure");
                return;
            }
            guard.loading = false;
        }
        error!(generation, "directory: failed to load doctors: {err:#}");
        self.emit(DirectoryEvent::FetchFailed {
            message: format!("{err:#}"),
        });
    }

    async fn start_push_feed(
        self: &Arc<Self>,
        generation: u64,
        mut subscription: DoctorSubscription,
    ) {
        let handle = subscription.handle();
        let mut guard = self.inner.lock().await;
        if !guard.is_current(generation) {
            handle.unsubscribe();
            debug!(generation, "directory: dropping subscription opened after teardown");
            return;
        }
        if guard.push.is_some() {
            handle.unsubscribe();
            warn!(generation, "directory: push feed already running");
            return;
        }

        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            while let Some(doctors) = subscription.next().await {
                controller.apply(generation, doctors, UpdateSource::Push).await;
            }
            debug!(generation, "directory: push feed ended");
        });
        guard.push = Some(ActivePush { handle, task });
    }

    fn emit(&self, event: DirectoryEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

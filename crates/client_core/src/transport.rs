//! HTTP + WebSocket client for a remote directory backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use shared::{
    domain::Doctor,
    error::{ApiError, ApiException},
    protocol::DirectoryPush,
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use url::Url;

use crate::{
    error::DirectoryError,
    service::{DirectoryService, DoctorSubscription},
};

const PUSH_CHANNEL_CAPACITY: usize = 16;

pub struct RemoteDirectoryService {
    http: Client,
    server_url: String,
    ws_url: String,
    push: broadcast::Sender<Vec<Doctor>>,
    socket_task: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteDirectoryService {
    pub fn new(server_url: &str) -> Result<Self, DirectoryError> {
        let parsed = Url::parse(server_url).map_err(|err| DirectoryError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: err.to_string(),
        })?;
        let ws_url = websocket_base(&parsed)?;
        let (push, _) = broadcast::channel(PUSH_CHANNEL_CAPACITY);

        Ok(Self {
            http: Client::new(),
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
            ws_url: format!("{ws_url}/doctors/ws"),
            push,
            socket_task: Mutex::new(None),
        })
    }

    pub fn doctors_url(&self) -> String {
        format!("{}/doctors", self.server_url)
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    async fn spawn_socket_reader(&self) -> Result<JoinHandle<()>> {
        let (mut ws_stream, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|err| DirectoryError::Subscribe(err.to_string()))
            .with_context(|| format!("failed to connect websocket: {}", self.ws_url))?;
        info!(url = %self.ws_url, "directory: push socket connected");

        let push = self.push.clone();
        Ok(tokio::spawn(async move {
            while let Some(msg) = ws_stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<DirectoryPush>(&text) {
                        Ok(DirectoryPush::DoctorsUpdated { doctors }) => {
                            let _ = push.send(doctors);
                        }
                        Ok(DirectoryPush::Error(err)) => {
                            warn!("directory: backend reported {}", ApiException::from(err));
                        }
                        Err(err) => warn!("directory: invalid push frame: {err}"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!("directory: push socket receive failed: {err}");
                        break;
                    }
                }
            }
            info!("directory: push socket closed");
        }))
    }
}

#[async_trait]
impl DirectoryService for RemoteDirectoryService {
    async fn get_doctors(&self) -> Result<Vec<Doctor>> {
        let res = self
            .http
            .get(self.doctors_url())
            .send()
            .await
            .map_err(|err| DirectoryError::Fetch(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(anyhow::Error::new(ApiException::from(api_error))
                    .context(DirectoryError::Fetch(format!("server answered {status}"))));
            }
            return Err(DirectoryError::Fetch(format!("server answered {status}")).into());
        }

        let doctors = res
            .json::<Vec<Doctor>>()
            .await
            .map_err(|err| DirectoryError::Decode(err.to_string()))?;
        Ok(doctors)
    }

    async fn subscribe_doctors(&self) -> Result<DoctorSubscription> {
        let mut socket_task = self.socket_task.lock().await;
        // Subscribe before (re)connecting so no frame slips past this receiver.
        let updates = self.push.subscribe();
        let connected = socket_task
            .as_ref()
            .is_some_and(|task| !task.is_finished());
        if !connected {
            *socket_task = Some(self.spawn_socket_reader().await?);
        }
        Ok(DoctorSubscription::new(updates))
    }
}

impl Drop for RemoteDirectoryService {
    fn drop(&mut self) {
        if let Some(task) = self.socket_task.get_mut().take() {
            task.abort();
        }
    }
}

fn websocket_base(server_url: &Url) -> Result<String, DirectoryError> {
    let scheme = match server_url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(DirectoryError::InvalidServerUrl {
                url: server_url.to_string(),
                reason: format!("unsupported scheme '{other}', expected http or https"),
            })
        }
    };
    let rest = &server_url.as_str()[server_url.scheme().len()..];
    Ok(format!("{scheme}{}", rest.trim_end_matches('/')))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use autosnap_core::ResourceId;
use autosnap_logging::{redact_url, snap_info, snap_warn};
use thiserror::Error;

use crate::archive::ArchiveSaver;
use crate::client::ScrapeApi;
use crate::{DownloadError, EngineEvent, SaveError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("engine thread has stopped")]
    Stopped,
}

/// Receives engine outcomes on the engine's runtime thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Scrape { url: String },
    FetchArchive { resource_id: ResourceId },
    DeleteRemote { resource_id: ResourceId },
}

/// Handle to the background thread that runs service calls.
///
/// Each command yields exactly one [`EngineEvent`] on the sink. Commands run
/// independently; sequencing between them is the caller's job.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn start(
        api: Arc<dyn ScrapeApi>,
        saver: ArchiveSaver,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let saver = saver.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), &saver, command).await;
                    sink.emit(event);
                });
            }
        });

        Ok(Self { cmd_tx })
    }

    pub fn scrape(&self, url: impl Into<String>) -> Result<(), EngineError> {
        self.send(EngineCommand::Scrape { url: url.into() })
    }

    pub fn fetch_archive(&self, resource_id: ResourceId) -> Result<(), EngineError> {
        self.send(EngineCommand::FetchArchive { resource_id })
    }

    pub fn delete_remote(&self, resource_id: ResourceId) -> Result<(), EngineError> {
        self.send(EngineCommand::DeleteRemote { resource_id })
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| EngineError::Stopped)
    }
}

async fn handle_command(
    api: &dyn ScrapeApi,
    saver: &ArchiveSaver,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Scrape { url } => {
            snap_info!("scrape started url={}", redact_url(&url));
            let result = api.scrape(&url).await;
            match &result {
                Ok(body) => snap_info!(
                    "scrape answered success={} year={:?} images={:?}",
                    body.success,
                    body.year,
                    body.image_count
                ),
                Err(err) => snap_warn!("scrape failed: {}", err),
            }
            EngineEvent::ScrapeFinished(result)
        }
        EngineCommand::FetchArchive { resource_id } => {
            let result = fetch_and_save(api, saver, &resource_id).await;
            match &result {
                Ok(path) => snap_info!("archive {} saved to {:?}", resource_id, path),
                Err(err) => snap_warn!("archive {} failed: {}", resource_id, err),
            }
            EngineEvent::ArchiveFinished {
                resource_id,
                result,
            }
        }
        EngineCommand::DeleteRemote { resource_id } => {
            let result = api.delete_folder(&resource_id).await;
            match &result {
                Ok(()) => snap_info!("remote folder {} deleted", resource_id),
                Err(err) => snap_warn!("remote folder {} not deleted: {}", resource_id, err),
            }
            EngineEvent::DeleteFinished {
                resource_id,
                result,
            }
        }
    }
}

async fn fetch_and_save(
    api: &dyn ScrapeApi,
    saver: &ArchiveSaver,
    resource_id: &ResourceId,
) -> Result<PathBuf, DownloadError> {
    let bytes = api.fetch_archive(resource_id).await?;
    let saver = saver.clone();
    let resource_id = resource_id.clone();
    let path = tokio::task::spawn_blocking(move || saver.save(&resource_id, &bytes))
        .await
        .map_err(|err| SaveError::Io(std::io::Error::other(err)))??;
    Ok(path)
}

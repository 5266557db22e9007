use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use autosnap_core::{DownloadStep, Effect, Msg};
use autosnap_engine::{
    ArchiveSaver, ClientSettings, EngineEvent, EngineHandle, EventSink, ReqwestScrapeApi,
};
use autosnap_logging::{redact_url, snap_info, snap_warn};

use super::app::AppEvent;

/// Executes core effects on the engine and feeds outcomes back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<AppEvent>,
}

struct MsgSink {
    msg_tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.msg_tx.send(AppEvent::Core(engine_event_to_msg(event)));
    }
}

impl EffectRunner {
    pub fn new(
        client: ClientSettings,
        download_dir: PathBuf,
        msg_tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<Self> {
        let api = ReqwestScrapeApi::new(client)?;
        let sink = MsgSink {
            msg_tx: msg_tx.clone(),
        };
        let engine = EngineHandle::start(
            Arc::new(api),
            ArchiveSaver::new(download_dir),
            Arc::new(sink),
        )?;
        Ok(Self { engine, msg_tx })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Scrape { url } => {
                    snap_info!("Scrape url={}", redact_url(&url));
                    if let Err(err) = self.engine.scrape(url) {
                        snap_warn!("Scrape not started: {}", err);
                        self.feed_back(Msg::ScrapeFailed {
                            server_message: None,
                        });
                    }
                }
                Effect::FetchArchive { resource_id } => {
                    snap_info!("FetchArchive resource_id={}", resource_id);
                    if let Err(err) = self.engine.fetch_archive(resource_id.clone()) {
                        snap_warn!("FetchArchive not started: {}", err);
                        self.feed_back(Msg::DownloadFailed {
                            resource_id,
                            step: DownloadStep::Archive,
                        });
                    }
                }
                Effect::DeleteRemote { resource_id } => {
                    snap_info!("DeleteRemote resource_id={}", resource_id);
                    if let Err(err) = self.engine.delete_remote(resource_id.clone()) {
                        snap_warn!("DeleteRemote not started: {}", err);
                        self.feed_back(Msg::DownloadFailed {
                            resource_id,
                            step: DownloadStep::Cleanup,
                        });
                    }
                }
            }
        }
    }

    fn feed_back(&self, msg: Msg) {
        let _ = self.msg_tx.send(AppEvent::Core(msg));
    }
}

/// Transport details stay in the log; the session only learns what it displays.
pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ScrapeFinished(Ok(result)) => Msg::ScrapeCompleted(result),
        EngineEvent::ScrapeFinished(Err(err)) => {
            snap_warn!("Scrape failed: {}", err);
            Msg::ScrapeFailed {
                server_message: err.server_message().map(str::to_string),
            }
        }
        EngineEvent::ArchiveFinished {
            resource_id,
            result: Ok(path),
        } => Msg::ArchiveSaved { resource_id, path },
        EngineEvent::ArchiveFinished {
            resource_id,
            result: Err(err),
        } => {
            snap_warn!("Archive {} failed: {}", resource_id, err);
            Msg::DownloadFailed {
                resource_id,
                step: DownloadStep::Archive,
            }
        }
        EngineEvent::DeleteFinished {
            resource_id,
            result: Ok(()),
        } => Msg::RemoteDeleted { resource_id },
        EngineEvent::DeleteFinished {
            resource_id,
            result: Err(err),
        } => {
            snap_warn!(
                "Archive {} saved but remote cleanup failed: {}",
                resource_id,
                err
            );
            Msg::DownloadFailed {
                resource_id,
                step: DownloadStep::Cleanup,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosnap_core::{ResourceId, ScrapeResult};
    use autosnap_engine::{ApiError, DownloadError};

    fn id(raw: &str) -> ResourceId {
        ResourceId::parse(raw).unwrap()
    }

    #[test]
    fn transport_errors_carry_no_detail() {
        let err = ApiError {
            kind: autosnap_engine::FailureKind::Network,
            message: "error sending request: connection refused".to_string(),
        };
        assert_eq!(
            engine_event_to_msg(EngineEvent::ScrapeFinished(Err(err))),
            Msg::ScrapeFailed {
                server_message: None
            }
        );
    }

    #[test]
    fn rejected_scrape_keeps_server_text() {
        let err = ApiError {
            kind: autosnap_engine::FailureKind::Rejected {
                status: 400,
                message: "Please provide a vehicle URL".to_string(),
            },
            message: "Please provide a vehicle URL".to_string(),
        };
        assert_eq!(
            engine_event_to_msg(EngineEvent::ScrapeFinished(Err(err))),
            Msg::ScrapeFailed {
                server_message: Some("Please provide a vehicle URL".to_string())
            }
        );
    }

    #[test]
    fn structured_result_passes_through() {
        let result = ScrapeResult {
            success: false,
            error: Some("Invalid URL".to_string()),
            ..ScrapeResult::default()
        };
        assert_eq!(
            engine_event_to_msg(EngineEvent::ScrapeFinished(Ok(result.clone()))),
            Msg::ScrapeCompleted(result)
        );
    }

    #[test]
    fn download_steps_are_tagged() {
        let archive = engine_event_to_msg(EngineEvent::ArchiveFinished {
            resource_id: id("2016"),
            result: Err(DownloadError::Fetch(ApiError {
                kind: autosnap_engine::FailureKind::HttpStatus(404),
                message: "404 Not Found".to_string(),
            })),
        });
        assert_eq!(
            archive,
            Msg::DownloadFailed {
                resource_id: id("2016"),
                step: DownloadStep::Archive
            }
        );

        let cleanup = engine_event_to_msg(EngineEvent::DeleteFinished {
            resource_id: id("2016"),
            result: Err(ApiError {
                kind: autosnap_engine::FailureKind::HttpStatus(500),
                message: "500 Internal Server Error".to_string(),
            }),
        });
        assert_eq!(
            cleanup,
            Msg::DownloadFailed {
                resource_id: id("2016"),
                step: DownloadStep::Cleanup
            }
        );
    }
}

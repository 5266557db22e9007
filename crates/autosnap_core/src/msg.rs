use std::path::PathBuf;

use crate::{ResourceId, ScrapeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the current URL input for scraping.
    SubmitClicked,
    /// The scrape service answered with a structured body.
    ScrapeCompleted(ScrapeResult),
    /// The scrape request failed in transport. `server_message` is only set when
    /// a non-2xx response still carried an `error` field.
    ScrapeFailed { server_message: Option<String> },
    /// User asked for the archive of the current result.
    DownloadClicked,
    /// Archive fetched and written to disk.
    ArchiveSaved {
        resource_id: ResourceId,
        path: PathBuf,
    },
    /// Remote folder removed after the archive was saved.
    RemoteDeleted { resource_id: ResourceId },
    /// Either the archive fetch or the cleanup failed.
    DownloadFailed {
        resource_id: ResourceId,
        step: DownloadStep,
    },
    /// User asked to start over.
    ResetClicked,
    /// Heartbeat from the front-end loop while idle-waiting.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStep {
    Archive,
    Cleanup,
}

//! AutoSnap engine: HTTP client for the scrape service, archive saving and effect execution.
mod archive;
mod client;
mod engine;
mod types;

pub use archive::{archive_file_stem, ensure_download_dir, ArchiveSaver, SaveError};
pub use client::{ClientSettings, ReqwestScrapeApi, ScrapeApi, DEFAULT_API_BASE};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use types::{ApiError, DownloadError, EngineEvent, FailureKind, HealthStatus};

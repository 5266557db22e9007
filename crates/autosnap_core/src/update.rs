use crate::{AppState, Effect, Msg, Phase, ResourceId, VehicleRecord};

/// Shown when the service reports `success: false` without an `error` text.
pub const SCRAPE_FAILED_MESSAGE: &str = "Failed to scrape vehicle";
/// Shown for transport failures that carry no server message.
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to server";
/// Shown when either the archive fetch or the remote cleanup fails.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download folder";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let url = state.input().trim().to_string();
            if url.is_empty() || state.phase().is_in_flight() {
                return (state, Vec::new());
            }
            state.begin_scrape();
            vec![Effect::Scrape { url }]
        }
        Msg::ScrapeCompleted(result) => {
            if state.phase() != Phase::Scraping {
                return (state, Vec::new());
            }
            match VehicleRecord::from_result(&result) {
                Some(record) => state.scrape_succeeded(record),
                None => state.scrape_failed(
                    result
                        .error
                        .filter(|text| !text.is_empty())
                        .unwrap_or_else(|| SCRAPE_FAILED_MESSAGE.to_string()),
                ),
            }
            Vec::new()
        }
        Msg::ScrapeFailed { server_message } => {
            if state.phase() != Phase::Scraping {
                return (state, Vec::new());
            }
            state.scrape_failed(
                server_message
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| CONNECT_FAILED_MESSAGE.to_string()),
            );
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.phase() != Phase::Ready {
                return (state, Vec::new());
            }
            let Some(resource_id) = state.resource_id().cloned() else {
                return (state, Vec::new());
            };
            state.begin_download();
            vec![Effect::FetchArchive { resource_id }]
        }
        Msg::ArchiveSaved { resource_id, path } => {
            if !is_current_download(&state, &resource_id) {
                return (state, Vec::new());
            }
            // Cleanup only ever follows a saved archive.
            state.archive_saved(path);
            vec![Effect::DeleteRemote { resource_id }]
        }
        Msg::RemoteDeleted { resource_id } => {
            if is_current_download(&state, &resource_id) {
                state.download_finished();
            }
            Vec::new()
        }
        Msg::DownloadFailed { resource_id, .. } => {
            if is_current_download(&state, &resource_id) {
                // Both steps surface the same message; a failed cleanup keeps the saved path.
                state.download_failed(DOWNLOAD_FAILED_MESSAGE.to_string());
            }
            Vec::new()
        }
        Msg::ResetClicked => {
            if !state.phase().is_in_flight() {
                state.reset();
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn is_current_download(state: &AppState, resource_id: &ResourceId) -> bool {
    state.phase() == Phase::Downloading && state.resource_id() == Some(resource_id)
}

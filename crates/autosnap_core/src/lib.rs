//! AutoSnap core: pure vehicle fetch state machine and view-model helpers.
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{DownloadStep, Msg};
pub use record::{ResourceId, ScrapeResult, VehicleRecord};
pub use state::{AppState, Phase};
pub use update::{update, CONNECT_FAILED_MESSAGE, DOWNLOAD_FAILED_MESSAGE, SCRAPE_FAILED_MESSAGE};
pub use view_model::{AppViewModel, SummaryView};

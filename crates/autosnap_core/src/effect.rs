use crate::ResourceId;

/// Side effects requested by `update`; executed by the app's effect runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Scrape { url: String },
    FetchArchive { resource_id: ResourceId },
    DeleteRemote { resource_id: ResourceId },
}

use std::path::PathBuf;

use crate::Phase;

/// Display fields of the stored result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub display_year: Option<String>,
    pub title: Option<String>,
    pub image_count: Option<u32>,
    pub total_images: Option<u32>,
    /// `<year>.zip`, absent when the result has no usable key.
    pub archive_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub input: String,
    pub can_submit: bool,
    pub can_download: bool,
    pub summary: Option<SummaryView>,
    pub error: Option<String>,
    pub saved_archive: Option<PathBuf>,
    pub dirty: bool,
}

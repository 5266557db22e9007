use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, SummaryView};
use crate::{ResourceId, VehicleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scraping,
    Ready,
    Downloading,
    Downloaded,
}

impl Phase {
    /// A request is outstanding; new submissions and resets are refused.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Scraping | Phase::Downloading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    phase: Phase,
    record: Option<VehicleRecord>,
    error: Option<String>,
    saved_archive: Option<PathBuf>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn record(&self) -> Option<&VehicleRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn saved_archive(&self) -> Option<&Path> {
        self.saved_archive.as_deref()
    }

    /// Key of the stored result, if it can be downloaded at all.
    pub fn resource_id(&self) -> Option<&ResourceId> {
        self.record.as_ref().and_then(|r| r.resource_id.as_ref())
    }

    pub fn view(&self) -> AppViewModel {
        let summary = self.record.as_ref().map(|record| SummaryView {
            display_year: record.display_year.clone(),
            title: record.title.clone(),
            image_count: record.image_count,
            total_images: record.total_images,
            archive_name: record.resource_id.as_ref().map(ResourceId::archive_filename),
        });
        AppViewModel {
            phase: self.phase,
            input: self.input.clone(),
            can_submit: !self.phase.is_in_flight() && !self.input.trim().is_empty(),
            can_download: self.phase == Phase::Ready && self.resource_id().is_some(),
            summary,
            error: self.error.clone(),
            saved_archive: self.saved_archive.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_scrape(&mut self) {
        self.error = None;
        self.record = None;
        self.saved_archive = None;
        self.phase = Phase::Scraping;
        self.dirty = true;
    }

    pub(crate) fn scrape_succeeded(&mut self, record: VehicleRecord) {
        self.record = Some(record);
        self.error = None;
        self.phase = Phase::Ready;
        self.dirty = true;
    }

    pub(crate) fn scrape_failed(&mut self, message: String) {
        self.record = None;
        self.error = Some(message);
        self.phase = Phase::Idle;
        self.dirty = true;
    }

    pub(crate) fn begin_download(&mut self) {
        self.error = None;
        self.saved_archive = None;
        self.phase = Phase::Downloading;
        self.dirty = true;
    }

    pub(crate) fn archive_saved(&mut self, path: PathBuf) {
        self.saved_archive = Some(path);
        self.dirty = true;
    }

    pub(crate) fn download_finished(&mut self) {
        self.phase = Phase::Downloaded;
        self.dirty = true;
    }

    pub(crate) fn download_failed(&mut self, message: String) {
        self.error = Some(message);
        self.phase = Phase::Ready;
        self.dirty = true;
    }

    pub(crate) fn reset(&mut self) {
        let fresh = Self::default();
        if *self != fresh {
            *self = Self {
                dirty: true,
                ..fresh
            };
        }
    }
}

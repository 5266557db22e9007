use std::fmt;

use serde::{Deserialize, Serialize};

/// Body returned by `POST /scrape`.
///
/// `success` discriminates the shape of the rest: `year`, `title` and the image counts
/// accompany a success, `error` accompanies a failure. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_images: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Key of a server-side image folder. The service names folders after the
/// vehicle year, so this wraps the exact `year` string it returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Returns `None` for blank keys; a blank key must never reach download or delete.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name the saved archive is offered under: `<id>.zip`.
    pub fn archive_filename(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A successful scrape as the session keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub display_year: Option<String>,
    pub resource_id: Option<ResourceId>,
    pub title: Option<String>,
    pub image_count: Option<u32>,
    pub total_images: Option<u32>,
    pub folder: Option<String>,
}

impl VehicleRecord {
    /// Builds a record from a successful result; failures yield `None`.
    pub fn from_result(result: &ScrapeResult) -> Option<Self> {
        if !result.success {
            return None;
        }
        Some(Self {
            display_year: result.year.clone(),
            resource_id: result.year.as_deref().and_then(ResourceId::parse),
            title: result.title.clone(),
            image_count: result.image_count,
            total_images: result.total_images,
            folder: result.folder.clone(),
        })
    }
}

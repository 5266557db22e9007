use autosnap_core::{AppViewModel, Phase, SummaryView};

use super::constants::*;

/// Lines to print for the current view.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &view.error {
        lines.push(format!("✗ {error}"));
    }

    match view.phase {
        Phase::Idle => lines.push(URL_PROMPT.to_string()),
        Phase::Scraping => lines.push(SCRAPING_TEXT.to_string()),
        Phase::Ready => {
            if view.error.is_none() {
                lines.push(format!("✓ {READY_HEADLINE}"));
            }
            if let Some(summary) = &view.summary {
                lines.extend(summary_lines(summary));
            }
            if let Some(path) = &view.saved_archive {
                lines.push(format!(
                    "  The archive was saved to {} but the server copy was not removed.",
                    path.display()
                ));
            }
            lines.push(ready_hint(view));
        }
        Phase::Downloading => lines.push(DOWNLOADING_TEXT.to_string()),
        Phase::Downloaded => {
            lines.push(format!("✓ {DOWNLOADED_HEADLINE}"));
            match &view.saved_archive {
                Some(path) => lines.push(format!(
                    "  Your ZIP file has been saved to {}.",
                    path.display()
                )),
                None => lines.push("  Your ZIP file has been saved.".to_string()),
            }
            lines.push("Type 'r' to download another vehicle, 'q' to quit.".to_string());
        }
    }

    lines
}

/// Progress marker printed while a request is outstanding.
pub fn heartbeat(view: &AppViewModel) -> Option<&'static str> {
    view.phase.is_in_flight().then_some(".")
}

fn summary_lines(summary: &SummaryView) -> Vec<String> {
    let images = match (summary.image_count, summary.total_images) {
        (Some(count), Some(total)) if total != count => format!("{count} of {total} photos"),
        (Some(count), _) => format!("{count} photos"),
        (None, _) => "-".to_string(),
    };
    vec![
        format!("  Year:         {}", summary.display_year.as_deref().unwrap_or("-")),
        format!("  Vehicle:      {}", summary.title.as_deref().unwrap_or("-")),
        format!("  Images Found: {images}"),
    ]
}

fn ready_hint(view: &AppViewModel) -> String {
    let archive = view
        .summary
        .as_ref()
        .and_then(|summary| summary.archive_name.as_deref());
    match archive {
        Some(name) if view.can_download => {
            format!("Type 'd' to download {name}, 'r' to start over.")
        }
        _ => "This result has no downloadable folder. Type 'r' to start over.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn ready_view() -> AppViewModel {
        AppViewModel {
            phase: Phase::Ready,
            can_download: true,
            summary: Some(SummaryView {
                display_year: Some("2016".to_string()),
                title: Some("Honda Civic".to_string()),
                image_count: Some(12),
                total_images: None,
                archive_name: Some("2016.zip".to_string()),
            }),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn idle_shows_prompt_and_error() {
        let view = AppViewModel {
            error: Some("Invalid URL".to_string()),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view),
            vec!["✗ Invalid URL".to_string(), URL_PROMPT.to_string()]
        );
    }

    #[test]
    fn ready_shows_summary_and_archive_name() {
        let lines = render(&ready_view());
        assert_eq!(lines[0], format!("✓ {READY_HEADLINE}"));
        assert!(lines.iter().any(|l| l.contains("2016") && l.contains("Year")));
        assert!(lines.iter().any(|l| l.contains("Honda Civic")));
        assert!(lines.iter().any(|l| l.contains("12 photos")));
        assert!(lines.last().unwrap().contains("download 2016.zip"));
    }

    #[test]
    fn partial_image_counts_show_total() {
        let mut view = ready_view();
        if let Some(summary) = view.summary.as_mut() {
            summary.total_images = Some(14);
        }
        assert!(render(&view).iter().any(|l| l.contains("12 of 14 photos")));
    }

    #[test]
    fn failed_cleanup_mentions_saved_archive() {
        let view = AppViewModel {
            error: Some("Failed to download folder".to_string()),
            saved_archive: Some(PathBuf::from("downloads/2016.zip")),
            ..ready_view()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "✗ Failed to download folder");
        assert!(lines.iter().any(|l| l.contains("server copy was not removed")));
    }

    #[test]
    fn downloaded_shows_path() {
        let view = AppViewModel {
            phase: Phase::Downloaded,
            saved_archive: Some(PathBuf::from("downloads/2016.zip")),
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], format!("✓ {DOWNLOADED_HEADLINE}"));
        assert!(lines[1].contains("downloads/2016.zip"));
    }

    #[test]
    fn heartbeat_only_while_busy() {
        let busy = AppViewModel {
            phase: Phase::Scraping,
            ..AppViewModel::default()
        };
        assert_eq!(heartbeat(&busy), Some("."));
        assert_eq!(heartbeat(&ready_view()), None);
    }
}

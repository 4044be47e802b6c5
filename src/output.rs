//! CLI output formatting for all pipeline stages.
//!
//! Output leads with what the visitor will see (names, events, photos) and
//! shows file paths as indented context lines beneath.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Ravuri's Wedding Invitation
//!     Couple: Durga Sai & Ashiervachita
//!
//! Events
//! 001 Wedding
//!     Date: 14 February 2027, 7:30 PM
//!     Venue: Sri Venkateswara Kalyana Mandapam
//!
//! Gallery (local, 3 photos)
//!     Remote listing failed: ...
//! 001 Photo 1
//!     Source: gallery/first-look.jpg
//! ```
//!
//! ## Generate
//!
//! ```text
//! Gallery previews
//! 001 gallery/first-look.jpg: 480px
//! 002 gallery/small.png: copied
//!
//! Generated Ravuri's Wedding Invitation → dist/index.html (2 events, 3 photos)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::config::FallbackConfig;
use crate::gallery::{GallerySource, Origin};
use crate::generate::GenerateReport;
use crate::imaging::PreviewStatus;
use crate::render::{Couple, venue_label};
use crate::scan::Manifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn source_label(source: GallerySource) -> &'static str {
    match source {
        GallerySource::Remote => "remote",
        GallerySource::Local => "local",
    }
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output: couple, events and gallery inventory.
pub fn format_scan_output(manifest: &Manifest, fallback: &FallbackConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let couple = Couple::resolve(&manifest.invitation, fallback);

    lines.push(couple.page_title());
    lines.push(format!("    Couple: {}", couple.joined()));
    if let Some(err) = &manifest.load_error {
        lines.push(format!("    Invitation not loaded: {err}"));
    }

    lines.push(String::new());
    lines.push("Events".to_string());
    if manifest.invitation.events.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, event) in manifest.invitation.events.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), event.name));
        if !event.date.is_empty() {
            lines.push(format!("    Date: {}", event.date));
        }
        if !event.venue.is_empty() {
            lines.push(format!("    {}: {}", venue_label(&event.name), event.venue));
        }
    }

    let gallery = &manifest.gallery;
    lines.push(String::new());
    lines.push(format!(
        "Gallery ({}, {})",
        source_label(gallery.source),
        photo_count(gallery.entries.len())
    ));
    if let Some(reason) = &gallery.fallback_reason {
        lines.push(format!("    Remote listing failed: {reason}"));
    }
    for (i, entry) in gallery.entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.alt));
        match &entry.origin {
            Origin::Local { path } => lines.push(format!("    Source: {path}")),
            Origin::Remote { id } => lines.push(format!("    Remote id: {id}")),
        }
    }

    lines
}

pub fn print_scan_output(manifest: &Manifest, fallback: &FallbackConfig) {
    for line in format_scan_output(manifest, fallback) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

fn preview_label(status: &PreviewStatus) -> String {
    match status {
        PreviewStatus::Resized { width } => format!("{width}px"),
        PreviewStatus::Copied => "copied".to_string(),
        PreviewStatus::FullImage { reason } => format!("full image ({reason})"),
    }
}

/// Format generate stage output: preview results and the written page.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.previews.is_empty() {
        lines.push("Gallery previews".to_string());
        for (i, (name, status)) in report.previews.iter().enumerate() {
            lines.push(format!(
                "{} {}: {}",
                format_index(i + 1),
                name,
                preview_label(status)
            ));
        }
        lines.push(String::new());
    }

    if report.notice {
        lines.push("Page shows the load-failure notice".to_string());
    }
    lines.push(format!(
        "Generated {} → {} ({} events, {}, {})",
        report.title,
        report.page.display(),
        report.event_count,
        photo_count(report.gallery_photos),
        source_label(report.gallery_source)
    ));

    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::gallery::{GalleryLoad, ThumbnailEntry};
    use crate::invitation::{EventRecord, InvitationData};
    use std::path::PathBuf;

    fn manifest() -> Manifest {
        Manifest {
            invitation: InvitationData {
                groom: "A".into(),
                bride: "B".into(),
                family_name: "C".into(),
                events: vec![
                    EventRecord {
                        name: "Ceremony".into(),
                        date: "Jan 1".into(),
                        venue: "Hall".into(),
                    },
                    EventRecord {
                        name: "Lunch at Home".into(),
                        date: String::new(),
                        venue: "Our house".into(),
                    },
                ],
            },
            notice: None,
            load_error: None,
            gallery: GalleryLoad {
                source: GallerySource::Local,
                entries: vec![ThumbnailEntry {
                    display_src: "gallery/previews/a-480.jpg".into(),
                    full_src: "gallery/a.jpg".into(),
                    alt: "Photo 1".into(),
                    origin: Origin::Local {
                        path: "gallery/a.jpg".into(),
                    },
                }],
                fallback_reason: Some("HTTP status 503".into()),
            },
            config: SiteConfig::default(),
        }
    }

    #[test]
    fn scan_output_lists_events_and_gallery() {
        let lines = format_scan_output(&manifest(), &FallbackConfig::default());
        assert_eq!(lines[0], "C's Wedding Invitation");
        assert_eq!(lines[1], "    Couple: A & B");
        assert!(lines.contains(&"001 Ceremony".to_string()));
        assert!(lines.contains(&"    Venue: Hall".to_string()));
        assert!(lines.contains(&"    Address: Our house".to_string()));
        assert!(lines.contains(&"Gallery (local, 1 photo)".to_string()));
        assert!(lines.contains(&"    Remote listing failed: HTTP status 503".to_string()));
        assert!(lines.contains(&"    Source: gallery/a.jpg".to_string()));
    }

    #[test]
    fn scan_output_reports_load_error() {
        let mut m = manifest();
        m.invitation = InvitationData::default();
        m.load_error = Some("no <invitation> block".into());
        let lines = format_scan_output(&m, &FallbackConfig::default());
        assert_eq!(lines[0], "Family's Wedding Invitation");
        assert!(lines[2].contains("no <invitation> block"));
        assert!(lines.contains(&"    (none)".to_string()));
    }

    #[test]
    fn generate_output_lists_previews() {
        let report = GenerateReport {
            page: PathBuf::from("dist/index.html"),
            title: "C's Wedding Invitation".into(),
            event_count: 2,
            gallery_source: GallerySource::Local,
            gallery_photos: 2,
            previews: vec![
                ("gallery/a.jpg".into(), PreviewStatus::Resized { width: 480 }),
                (
                    "gallery/b.jpg".into(),
                    PreviewStatus::FullImage {
                        reason: "bad data".into(),
                    },
                ),
            ],
            notice: false,
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "Gallery previews");
        assert_eq!(lines[1], "001 gallery/a.jpg: 480px");
        assert_eq!(lines[2], "002 gallery/b.jpg: full image (bad data)");
        assert_eq!(
            lines.last().unwrap(),
            "Generated C's Wedding Invitation → dist/index.html (2 events, 2 photos, local)"
        );
    }

    #[test]
    fn generate_output_mentions_notice() {
        let report = GenerateReport {
            page: PathBuf::from("out/index.html"),
            title: "Family's Wedding Invitation".into(),
            event_count: 0,
            gallery_source: GallerySource::Remote,
            gallery_photos: 0,
            previews: Vec::new(),
            notice: true,
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "Page shows the load-failure notice");
        assert!(lines[1].ends_with("(0 events, 0 photos, remote)"));
    }
}

//! Invitation text parsing.
//!
//! The invitation lives in a plain text file as a tagged block of loosely
//! structured lines:
//!
//! ```text
//! <invitation>
//! Groom: Durga Sai
//! Bride: Ashiervachita
//! Family Name: Ravuri
//!
//! Wedding:
//! Date: 14 February 2027, 7:30 PM
//! Venue: Sri Venkateswara Kalyana Mandapam
//!
//! Reception at Home:
//! 12-4 Lake View Appratment
//! Road No. 3, Banjara Hills
//! </invitation>
//! ```
//!
//! ## Line Rules
//!
//! - `Groom:`, `Bride:`, `Family Name:` (any case) set the couple fields
//! - `Label:` with nothing after the colon starts a new event
//! - `Date:` / `Venue:` inside an event fill those fields
//! - any other `key: value` line inside an event becomes the venue, if unset
//! - bare lines inside an event are venue text, joined with single spaces
//! - anything before the first event that is not a couple field is dropped
//!
//! Parsing never fails; unknown shapes degrade field by field.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvitationError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no <{tag}> section found in {path}")]
    MissingSection { tag: String, path: PathBuf },
}

/// Couple and event data parsed from the invitation block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationData {
    pub groom: String,
    pub bride: String,
    pub family_name: String,
    pub events: Vec<EventRecord>,
}

/// A named occasion with free-text date and venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub date: String,
    /// Whitespace-collapsed, possibly accumulated from several lines.
    pub venue: String,
}

impl EventRecord {
    fn named(name: &str) -> Self {
        Self {
            name: normalize_spaces(name),
            ..Self::default()
        }
    }

    fn append_venue(&mut self, text: &str) {
        if self.venue.is_empty() {
            self.venue = normalize_spaces(text);
        } else {
            self.venue = normalize_spaces(&format!("{} {}", self.venue, text));
        }
    }
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return the trimmed body of the first `<tag>...</tag>` block.
///
/// The tag match ignores ASCII case; `None` when either delimiter is missing.
pub fn extract_section(text: &str, tag: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let start = lower.find(&open)? + open.len();
    let end = start + lower[start..].find(&close)?;
    Some(text[start..end].trim().to_string())
}

/// Where the scanner is: before the first event, or filling one.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    NoEvent,
    InEvent(usize),
}

/// One classified input line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    KeyValue { key: String, value: String, raw: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    match line.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => Line::KeyValue {
            key: normalize_spaces(key),
            value: normalize_spaces(value),
            raw: line,
        },
        _ => Line::Text(line),
    }
}

/// Parse an invitation block into [`InvitationData`].
pub fn parse_invitation(section: &str) -> InvitationData {
    let lines: Vec<String> = section
        .lines()
        .map(normalize_spaces)
        .filter(|l| !l.is_empty())
        .collect();

    let mut data = InvitationData::default();
    let mut state = ScanState::NoEvent;

    for line in &lines {
        match classify(line) {
            Line::KeyValue { key, value, raw } => match key.to_lowercase().as_str() {
                "groom" => data.groom = value,
                "bride" => data.bride = value,
                "family name" => data.family_name = value,
                _ if value.is_empty() => {
                    data.events.push(EventRecord::named(&key));
                    state = ScanState::InEvent(data.events.len() - 1);
                }
                lower_key => {
                    if let ScanState::InEvent(idx) = state {
                        let event = &mut data.events[idx];
                        match lower_key {
                            "date" => event.date = value,
                            "venue" => event.venue = value,
                            _ if event.venue.is_empty() => event.venue = raw.to_string(),
                            _ => {}
                        }
                    }
                }
            },
            Line::Text(text) => {
                if let ScanState::InEvent(idx) = state {
                    data.events[idx].append_venue(text);
                }
            }
        }
    }

    data
}

/// Read `path` and parse the `<tag>` block inside it.
pub fn load_invitation(path: &Path, tag: &str) -> Result<InvitationData, InvitationError> {
    let text = fs::read_to_string(path).map_err(|source| InvitationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let section = extract_section(&text, tag).ok_or_else(|| InvitationError::MissingSection {
        tag: tag.to_string(),
        path: path.to_path_buf(),
    })?;
    let data = parse_invitation(&section);
    log::debug!(
        "parsed invitation: {} event(s) from {}",
        data.events.len(),
        path.display()
    );
    Ok(data)
}

//! Core data types for Daybook.
//!
//! This module defines the fundamental data structures shared across the note
//! store, search engine, and todo scanner. These types are designed to be:
//!
//! - **File-backed**: a [`Note`] is identified by its path; no hidden state
//! - **Degradable**: every metadata field has a sensible derived fallback
//! - **Presentation-agnostic**: formatting helpers return plain strings

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A note backed by a markdown file on disk.
///
/// The file path is the note's identity. Metadata comes from the frontmatter
/// block when present; otherwise the title falls back to the filename stem and
/// the timestamps to filesystem metadata, so a note with a missing or mangled
/// header is still usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Path to the backing markdown file
    pub filepath: PathBuf,

    /// Note title (frontmatter `title`, or the filename stem)
    pub title: String,

    /// Creation timestamp
    pub created_at: NaiveDateTime,

    /// Last-updated timestamp
    pub updated_at: NaiveDateTime,

    /// Calendar event id, for event-linked notes
    pub event_id: Option<String>,

    /// Calendar event title, for event-linked notes
    pub event_title: Option<String>,

    /// Calendar event start, for event-linked notes
    pub event_date: Option<NaiveDateTime>,

    /// Tags in insertion order (duplicates allowed)
    pub tags: Vec<String>,
}

impl Note {
    /// True iff this note is linked to a calendar event.
    pub fn is_event_note(&self) -> bool {
        self.event_id.is_some()
    }

    /// Filename without path.
    pub fn filename(&self) -> &str {
        self.filepath
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Filename stem, used as the derived title when frontmatter is absent.
    pub fn stem(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A calendar event descriptor supplied by the external calendar provider.
///
/// The core never fetches events itself; a presentation layer obtains these
/// from whatever calendar integration it uses and hands them to the
/// [`EventNoteLinker`](crate::linker::EventNoteLinker) or the store directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-assigned stable event identifier
    pub event_id: String,

    /// Event title
    pub title: String,

    /// Event start
    pub start: NaiveDateTime,

    /// Event end
    pub end: NaiveDateTime,

    /// Name of the calendar the event belongs to
    pub calendar_name: String,

    /// Optional location string
    pub location: Option<String>,

    /// Optional free-text notes attached to the event (may contain meeting
    /// URLs the agenda fetcher understands)
    pub notes: Option<String>,

    /// True for all-day events
    pub all_day: bool,
}

impl CalendarEvent {
    /// Event date as `YYYY-MM-DD`.
    pub fn date_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Event time range as `HH:MM - HH:MM`, or `All day`.
    pub fn time_str(&self) -> String {
        if self.all_day {
            "All day".to_string()
        } else {
            format!(
                "{} - {}",
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        }
    }

    /// Human-readable duration: `2h 30m`, `1h`, `45m`, or `All day`.
    pub fn duration_str(&self) -> String {
        if self.all_day {
            return "All day".to_string();
        }
        let minutes = (self.end - self.start).num_minutes().max(0);
        let (hours, minutes) = (minutes / 60, minutes % 60);
        match (hours, minutes) {
            (0, m) => format!("{}m", m),
            (h, 0) => format!("{}h", h),
            (h, m) => format!("{}h {}m", h, m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(start: (u32, u32), end: (u32, u32), all_day: bool) -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        CalendarEvent {
            event_id: "evt-1".to_string(),
            title: "Standup".to_string(),
            start: day.and_hms_opt(start.0, start.1, 0).unwrap(),
            end: day.and_hms_opt(end.0, end.1, 0).unwrap(),
            calendar_name: "Work".to_string(),
            location: None,
            notes: None,
            all_day,
        }
    }

    #[test]
    fn test_date_and_time_strings() {
        let e = event((9, 30), (10, 0), false);
        assert_eq!(e.date_str(), "2026-03-14");
        assert_eq!(e.time_str(), "09:30 - 10:00");

        let e = event((0, 0), (0, 0), true);
        assert_eq!(e.time_str(), "All day");
    }

    #[test]
    fn test_duration_string() {
        assert_eq!(event((9, 0), (9, 45), false).duration_str(), "45m");
        assert_eq!(event((9, 0), (10, 0), false).duration_str(), "1h");
        assert_eq!(event((9, 0), (11, 30), false).duration_str(), "2h 30m");
        assert_eq!(event((9, 0), (17, 0), true).duration_str(), "All day");
    }

    #[test]
    fn test_is_event_note() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut note = Note {
            filepath: PathBuf::from("/notes/standalone/a.md"),
            title: "a".to_string(),
            created_at: day,
            updated_at: day,
            event_id: None,
            event_title: None,
            event_date: None,
            tags: Vec::new(),
        };
        assert!(!note.is_event_note());
        note.event_id = Some("evt-1".to_string());
        assert!(note.is_event_note());
    }
}

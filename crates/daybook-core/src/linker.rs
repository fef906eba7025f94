//! Event-to-note linking.
//!
//! Thin composition over the store: given a calendar event descriptor from the
//! external provider, find or create its note and hand the path back for the
//! presentation layer to open. The meeting-agenda collaborator is reached
//! through the [`AgendaFetcher`] trait; the core only recognizes meeting URLs
//! in event notes text, it never talks to the network itself.

use crate::error::Result;
use crate::store::NoteStore;
use crate::types::CalendarEvent;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

// Matches https://indico.example.org/event/1609411/ and similar.
static MEETING_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://([^/\s]+)/event/(\d+)/?").unwrap());

/// External collaborator that may turn free text (typically an event's notes
/// field containing a meeting URL) into a markdown agenda block.
///
/// Returning `None` (no URL found, service down, or a no-op implementation)
/// is silently tolerated everywhere.
pub trait AgendaFetcher {
    /// Produce a markdown block for the given free text, if possible.
    fn fetch_agenda(&self, text: &str) -> Option<String>;
}

/// Default fetcher that never produces an agenda.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAgendaFetcher;

impl AgendaFetcher for NoopAgendaFetcher {
    fn fetch_agenda(&self, _text: &str) -> Option<String> {
        None
    }
}

/// A meeting-system URL recognized inside free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingUrl {
    /// The full matched URL
    pub url: String,

    /// Host part, e.g. `indico.cern.ch`
    pub host: String,

    /// Numeric event identifier from the URL path
    pub event_id: String,
}

/// Extract meeting-system URLs (`https://<host>/event/<id>/`) from free text.
///
/// This is the text-parsing half of the agenda lookup; fetcher implementations
/// use it to decide what to fetch.
pub fn find_meeting_urls(text: &str) -> Vec<MeetingUrl> {
    MEETING_URL
        .captures_iter(text)
        .map(|cap| MeetingUrl {
            url: cap[0].to_string(),
            host: cap[1].to_string(),
            event_id: cap[2].to_string(),
        })
        .collect()
}

/// Links calendar events to their notes.
pub struct EventNoteLinker<'a> {
    store: &'a NoteStore,
    fetcher: &'a dyn AgendaFetcher,
}

impl<'a> EventNoteLinker<'a> {
    /// Build a linker over `store` using `fetcher` for agenda enrichment.
    pub fn new(store: &'a NoteStore, fetcher: &'a dyn AgendaFetcher) -> Self {
        EventNoteLinker { store, fetcher }
    }

    /// The find-or-create flow end to end: returns the path of the event's
    /// note, creating and seeding it on first call. Agenda lookup failure
    /// never prevents note creation.
    pub fn open_note(&self, event: &CalendarEvent) -> Result<PathBuf> {
        self.store.get_or_create_note_for_event(event, self.fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    struct FixedAgenda(&'static str);

    impl AgendaFetcher for FixedAgenda {
        fn fetch_agenda(&self, text: &str) -> Option<String> {
            find_meeting_urls(text)
                .first()
                .map(|_| self.0.to_string())
        }
    }

    fn sample_event(notes: Option<&str>) -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        CalendarEvent {
            event_id: "evt-42".to_string(),
            title: "Collab Meeting".to_string(),
            start: day.and_hms_opt(10, 0, 0).unwrap(),
            end: day.and_hms_opt(11, 0, 0).unwrap(),
            calendar_name: "Work".to_string(),
            location: None,
            notes: notes.map(str::to_string),
            all_day: false,
        }
    }

    #[test]
    fn test_find_meeting_urls() {
        let text = "Agenda: https://indico.cern.ch/event/1609411/ and see \
                    http://meetings.example.org/event/77 too";
        let urls = find_meeting_urls(text);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].host, "indico.cern.ch");
        assert_eq!(urls[0].event_id, "1609411");
        assert_eq!(urls[1].host, "meetings.example.org");
        assert_eq!(urls[1].event_id, "77");

        assert!(find_meeting_urls("no links here").is_empty());
        assert!(find_meeting_urls("https://example.org/evnt/12/").is_empty());
    }

    #[test]
    fn test_open_note_seeds_agenda() {
        let tmp = TempDir::new().unwrap();
        let store = NoteStore::new(tmp.path()).unwrap();
        let fetcher = FixedAgenda("## Agenda\n\n- item one\n");
        let linker = EventNoteLinker::new(&store, &fetcher);

        let event = sample_event(Some("details: https://indico.cern.ch/event/99/"));
        let path = linker.open_note(&event).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Agenda"));
        assert!(content.contains("- item one"));
    }

    #[test]
    fn test_open_note_without_agenda_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        let store = NoteStore::new(tmp.path()).unwrap();
        let linker = EventNoteLinker::new(&store, &NoopAgendaFetcher);

        let event = sample_event(None);
        let path = linker.open_note(&event).unwrap();
        assert!(path.exists());

        // repeat call resolves to the same note
        let again = linker.open_note(&event).unwrap();
        assert_eq!(path, again);
    }
}

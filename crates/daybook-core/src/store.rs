//! Filesystem-backed note storage.
//!
//! Notes are markdown files under `<base>/notes/`, split into two partitions:
//! `events/` for calendar-linked notes and `standalone/` for everything else.
//! The store creates notes, lists them, finds the note for an event, and
//! deletes them. It never rewrites a note after creation; the body belongs to
//! the user's editor.
//!
//! Failure policy: anything that can fail because of external file state
//! (missing file, bad encoding, mangled frontmatter) degrades to "note
//! excluded" or "field defaulted" on the read paths. The store stays usable
//! with a partially corrupt notes directory.

use crate::config::Config;
use crate::error::{DaybookError, Result};
use crate::frontmatter::{self, EventBlock, Frontmatter};
use crate::linker::AgendaFetcher;
use crate::search::{self, ApproxScorer, Scorer, SearchMatch, SubstringScorer};
use crate::types::{CalendarEvent, Note};
use chrono::Local;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory under the base path holding all notes.
const NOTES_DIR: &str = "notes";

/// Partition for event-linked notes.
const EVENT_NOTES_DIR: &str = "events";

/// Partition for standalone notes.
const STANDALONE_DIR: &str = "standalone";

/// Maximum length (in characters) of the sanitized title part of a filename.
const MAX_FILENAME_TITLE: usize = 100;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-]").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Filesystem-backed CRUD over [`Note`] records.
pub struct NoteStore {
    base_path: PathBuf,
    scorer: Box<dyn Scorer>,
}

impl NoteStore {
    /// Open a store rooted at `base_path`, creating the partition directories
    /// if they are missing. Uses the approximate scorer for fuzzy search.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_scorer(base_path, Box::new(ApproxScorer))
    }

    /// Open a store that falls back to exact case-insensitive substring
    /// search over titles and full file text: every match scores a flat 100
    /// and carries no context snippet.
    pub fn with_substring_search(base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_scorer(base_path, Box::new(SubstringScorer))
    }

    /// Open a store using the notes directory and scoring strategy from
    /// configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = config.notes_base_dir()?;
        if config.search.approximate {
            Self::new(base)
        } else {
            Self::with_substring_search(base)
        }
    }

    /// Open a store with an explicit scoring strategy.
    pub fn with_scorer(base_path: impl Into<PathBuf>, scorer: Box<dyn Scorer>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(NOTES_DIR).join(EVENT_NOTES_DIR))?;
        fs::create_dir_all(base_path.join(NOTES_DIR).join(STANDALONE_DIR))?;
        info!(base = %base_path.display(), "opened note store");
        Ok(NoteStore { base_path, scorer })
    }

    /// Root directory containing both partitions.
    pub fn notes_root(&self) -> PathBuf {
        self.base_path.join(NOTES_DIR)
    }

    fn events_dir(&self) -> PathBuf {
        self.notes_root().join(EVENT_NOTES_DIR)
    }

    fn standalone_dir(&self) -> PathBuf {
        self.notes_root().join(STANDALONE_DIR)
    }

    // === Creation ===

    /// Create a note for a calendar event, or return the existing path.
    ///
    /// The filename is derived from the event (`{date}_{time}_{title}.md`), so
    /// a repeat call for the same event finds the same file and returns it
    /// unchanged. This is what keeps one note per event without inspecting
    /// content. The agenda fetcher may contribute a markdown block to the
    /// template; its failure never fails the create.
    pub fn create_note_for_event(
        &self,
        event: &CalendarEvent,
        agenda: &dyn AgendaFetcher,
    ) -> Result<PathBuf> {
        let filepath = self.events_dir().join(event_filename(event));
        if filepath.exists() {
            debug!(path = %filepath.display(), "note for event already exists");
            return Ok(filepath);
        }

        let content = event_note_template(event, agenda);
        fs::write(&filepath, content)?;
        info!(path = %filepath.display(), event_id = %event.event_id, "created event note");
        Ok(filepath)
    }

    /// Create a standalone note. The timestamp-qualified filename
    /// (`{date}_{HHMMSS}_{title}.md`) makes collisions a non-issue, so this
    /// always writes a new file.
    pub fn create_standalone_note(&self, title: &str, tags: Vec<String>) -> Result<PathBuf> {
        let date_str = Local::now().format("%Y-%m-%d_%H%M%S");
        let filename = format!("{}_{}.md", date_str, sanitize_filename(title));
        let filepath = self.standalone_dir().join(filename);

        let fm = Frontmatter::new(title, tags, None);
        let content = format!("{}\n# {}\n\n## Notes\n\n", frontmatter::encode(&fm), title);
        fs::write(&filepath, content)?;
        info!(path = %filepath.display(), "created standalone note");
        Ok(filepath)
    }

    // === Loading and listing ===

    /// Load a single note, degrading gracefully: absent or malformed
    /// frontmatter falls back to the filename stem and filesystem timestamps.
    /// Returns `None` only when the file itself cannot be read.
    pub fn load_note(&self, filepath: &Path) -> Option<Note> {
        let content = match fs::read_to_string(filepath) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %filepath.display(), %err, "skipping unreadable note");
                return None;
            }
        };

        match frontmatter::decode(&content) {
            Some(fm) => {
                let title = if fm.title.is_empty() {
                    Note::stem(filepath)
                } else {
                    fm.title
                };
                let (event_id, event_title, event_date) = match fm.event {
                    Some(EventBlock {
                        id, title, date, ..
                    }) => (Some(id), Some(title), Some(date)),
                    None => (None, None, None),
                };
                Some(Note {
                    filepath: filepath.to_path_buf(),
                    title,
                    created_at: fm.created,
                    updated_at: fm.updated,
                    event_id,
                    event_title,
                    event_date,
                    tags: fm.tags,
                })
            }
            None => self.note_from_file_metadata(filepath),
        }
    }

    /// Fallback note built from filename and filesystem timestamps alone.
    fn note_from_file_metadata(&self, filepath: &Path) -> Option<Note> {
        let meta = fs::metadata(filepath).ok()?;
        let now = Local::now().naive_local();
        let to_naive = |t: std::io::Result<std::time::SystemTime>| {
            t.ok()
                .map(|t| chrono::DateTime::<Local>::from(t).naive_local())
                .unwrap_or(now)
        };
        Some(Note {
            filepath: filepath.to_path_buf(),
            title: Note::stem(filepath),
            created_at: to_naive(meta.created()),
            updated_at: to_naive(meta.modified()),
            event_id: None,
            event_title: None,
            event_date: None,
            tags: Vec::new(),
        })
    }

    fn load_dir(&self, dir: &Path, recursive: bool) -> Vec<Note> {
        let walker = if recursive {
            WalkDir::new(dir)
        } else {
            WalkDir::new(dir).max_depth(1)
        };
        walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .filter_map(|e| self.load_note(e.path()))
            .collect()
    }

    /// Every note under the notes root (both partitions and any nested
    /// files), sorted by updated timestamp, newest first.
    pub fn get_all_notes(&self) -> Vec<Note> {
        let mut notes = self.load_dir(&self.notes_root(), true);
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// Event-linked notes, sorted by event date (created timestamp when the
    /// event date is missing), newest first.
    pub fn get_event_notes(&self) -> Vec<Note> {
        let mut notes = self.load_dir(&self.events_dir(), false);
        notes.sort_by(|a, b| {
            let ka = a.event_date.unwrap_or(a.created_at);
            let kb = b.event_date.unwrap_or(b.created_at);
            kb.cmp(&ka)
        });
        notes
    }

    /// Standalone notes, sorted by updated timestamp, newest first.
    pub fn get_standalone_notes(&self) -> Vec<Note> {
        let mut notes = self.load_dir(&self.standalone_dir(), false);
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    // === Event lookup ===

    /// Find the note linked to `event_id`, if one exists. First match wins;
    /// uniqueness is a store invariant upheld by `get_or_create`, not a lock.
    pub fn find_note_for_event(&self, event_id: &str) -> Option<Note> {
        self.get_event_notes()
            .into_iter()
            .find(|n| n.event_id.as_deref() == Some(event_id))
    }

    /// Find-then-create: the at-most-one-note-per-event contract end to end.
    pub fn get_or_create_note_for_event(
        &self,
        event: &CalendarEvent,
        agenda: &dyn AgendaFetcher,
    ) -> Result<PathBuf> {
        if let Some(existing) = self.find_note_for_event(&event.event_id) {
            return Ok(existing.filepath);
        }
        self.create_note_for_event(event, agenda)
    }

    // === Search ===

    /// Rank all notes against `query` with the store's scoring strategy.
    /// See [`search::rank_notes`] for ordering and snippet semantics.
    pub fn fuzzy_search(&self, query: &str, threshold: u32) -> Vec<SearchMatch> {
        search::rank_notes(
            self.get_all_notes(),
            query,
            threshold,
            self.scorer.as_ref(),
        )
    }

    // === Deletion ===

    /// Remove the note's backing file. Returns false on any failure (already
    /// deleted, permissions), never panics.
    pub fn delete_note(&self, note: &Note) -> bool {
        match fs::remove_file(&note.filepath) {
            Ok(()) => {
                info!(path = %note.filepath.display(), "deleted note");
                true
            }
            Err(err) => {
                warn!(path = %note.filepath.display(), %err, "failed to delete note");
                false
            }
        }
    }

    // === Content access ===

    /// Read a note's body (content after the frontmatter block).
    ///
    /// A vanished file reports [`DaybookError::NoteNotFound`] with the path,
    /// so callers holding a stale listing can tell deletion from disk trouble.
    pub fn read_body(&self, note: &Note) -> Result<String> {
        let content = fs::read_to_string(&note.filepath).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                DaybookError::NoteNotFound {
                    path: note.filepath.clone(),
                }
            } else {
                DaybookError::Io(err)
            }
        })?;
        let (_, body) = frontmatter::split(&content);
        Ok(body.to_string())
    }
}

/// Strip characters outside word-characters/whitespace/hyphen, collapse
/// whitespace runs to single underscores, and cap the length.
pub fn sanitize_filename(name: &str) -> String {
    let safe = UNSAFE_CHARS.replace_all(name, "");
    let safe = WHITESPACE_RUN.replace_all(safe.trim(), "_");
    safe.chars().take(MAX_FILENAME_TITLE).collect()
}

/// `{date}_{HHMM|allday}_{sanitized_title}.md`
fn event_filename(event: &CalendarEvent) -> String {
    let time_str = if event.all_day {
        "allday".to_string()
    } else {
        event.start.format("%H%M").to_string()
    };
    format!(
        "{}_{}_{}.md",
        event.date_str(),
        time_str,
        sanitize_filename(&event.title)
    )
}

/// Full initial content for an event note: frontmatter, event details, the
/// optional quoted event notes and agenda block, and empty working sections.
fn event_note_template(event: &CalendarEvent, agenda: &dyn AgendaFetcher) -> String {
    let fm = Frontmatter::new(
        &event.title,
        Vec::new(),
        Some(EventBlock {
            id: event.event_id.clone(),
            title: event.title.clone(),
            date: event.start,
            calendar: event.calendar_name.clone(),
            location: event.location.clone(),
            all_day: event.all_day,
        }),
    );

    let mut content = format!("{}\n# {}\n\n## Event Details\n\n", frontmatter::encode(&fm), event.title);
    content.push_str(&format!("- **Date**: {}\n", event.date_str()));
    content.push_str(&format!("- **Time**: {}\n", event.time_str()));
    content.push_str(&format!("- **Duration**: {}\n", event.duration_str()));
    content.push_str(&format!("- **Calendar**: {}\n", event.calendar_name));
    if let Some(location) = &event.location {
        content.push_str(&format!("- **Location**: {}\n", location));
    }

    content.push_str("\n## Notes\n\n");
    if let Some(notes) = &event.notes {
        content.push_str(&format!("> {}\n\n", notes));
    }

    if let Some(block) = event
        .notes
        .as_deref()
        .and_then(|text| agenda.fetch_agenda(text))
    {
        content.push_str(&block);
        content.push('\n');
    }

    content.push_str("## Action Items\n\n- [ ] \n\n## Summary\n\n");
    content
}

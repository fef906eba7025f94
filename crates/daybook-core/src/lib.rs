//! # Daybook Core Library
//!
//! This crate provides the note storage, search, and todo-tracking
//! functionality for the Daybook calendar-notes tool. It is a synchronous
//! library with no UI, CLI, or network surface: the terminal front end,
//! calendar provider, and agenda service are external collaborators reached
//! through the trait contracts defined here.
//!
//! ## Architecture
//!
//! - **Types** (`types`): note records and calendar event descriptors
//! - **Frontmatter** (`frontmatter`): the YAML header codec for note files
//! - **Store** (`store`): file-backed note CRUD over two partitions
//! - **Search** (`search`): fuzzy ranking with pluggable scoring strategies
//! - **Todo** (`todo`): `#todo` marker extraction and safe completion
//! - **Linker** (`linker`): calendar-event-to-note find-or-create flow
//! - **Config** (`config`): configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use daybook_core::{NoteStore, todo};
//!
//! let store = NoteStore::new("/home/user/daybook")?;
//! store.create_standalone_note("Weekly Sync", vec![])?;
//!
//! for hit in store.fuzzy_search("sync", 40) {
//!     println!("{} ({})", hit.note.title, hit.score);
//! }
//!
//! for item in todo::scan_all(&store) {
//!     println!("[ ] {}", item.display_text());
//! }
//! ```

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod linker;
pub mod search;
pub mod store;
pub mod todo;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{DaybookError, Result};
pub use frontmatter::{EventBlock, Frontmatter};
pub use linker::{AgendaFetcher, EventNoteLinker, MeetingUrl, NoopAgendaFetcher};
pub use search::{ApproxScorer, Scorer, SearchMatch, SubstringScorer};
pub use store::NoteStore;
pub use todo::TodoItem;
pub use types::{CalendarEvent, Note};

//! Inline todo extraction and completion.
//!
//! A todo is any line containing the literal marker `#todo` (case-insensitive)
//! anywhere in a note file. Scanning recomputes the full set on every call;
//! nothing is persisted. Completing a todo deletes its source line, guarded by
//! a line-content re-check so that a file edited since the scan is left alone.

use crate::error::{DaybookError, Result};
use crate::store::NoteStore;
use crate::types::Note;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The literal marker, matched case-insensitively.
const MARKER: &str = "#todo";

/// A single todo line found in a note file.
///
/// Ephemeral: valid only as long as the file is unchanged. Completing the item
/// (or any external edit) makes it stale, and [`complete`] will refuse stale
/// items rather than guess.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoItem {
    /// File the todo lives in
    pub filepath: PathBuf,

    /// 1-based line number at scan time
    pub line_number: usize,

    /// Text after the marker, with one optional leading `:` stripped
    pub content: String,

    /// The complete original line, used for the stale check on completion
    pub full_line: String,

    /// Title of the owning note (frontmatter title or filename stem)
    pub note_title: String,
}

impl TodoItem {
    /// Trimmed content for display.
    pub fn display_text(&self) -> &str {
        self.content.trim()
    }
}

/// Scan every markdown file under the store's notes root for todo lines.
///
/// Items come back in file-traversal order, then line order within a file; no
/// cross-file sort key is imposed here. Files that cannot be opened are
/// skipped, never fatal.
pub fn scan_all(store: &NoteStore) -> Vec<TodoItem> {
    let mut todos = Vec::new();

    for entry in WalkDir::new(store.notes_root())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), %err, "skipping unreadable file in todo scan");
                continue;
            }
        };

        let note_title = store
            .load_note(path)
            .map(|n| n.title)
            .unwrap_or_else(|| Note::stem(path));

        for (idx, line) in content.lines().enumerate() {
            if let Some(marker_idx) = find_marker(line) {
                todos.push(TodoItem {
                    filepath: path.to_path_buf(),
                    line_number: idx + 1,
                    content: extract_content(&line[marker_idx + MARKER.len()..]),
                    full_line: line.to_string(),
                    note_title: note_title.clone(),
                });
            }
        }
    }

    todos
}

/// Byte offset of the marker in `line`, matched case-insensitively.
///
/// The marker is pure ASCII, so the returned offset and the slice starting
/// after it are always on char boundaries.
fn find_marker(line: &str) -> Option<usize> {
    line.as_bytes()
        .windows(MARKER.len())
        .position(|w| w.eq_ignore_ascii_case(MARKER.as_bytes()))
}

/// Text after the marker, with at most one leading `:` (plus surrounding
/// whitespace) stripped.
fn extract_content(after_marker: &str) -> String {
    let content = after_marker.trim();
    let content = content.strip_prefix(':').unwrap_or(content);
    content.trim().to_string()
}

/// Complete a todo by deleting its line from the file.
///
/// Convenience wrapper over [`try_complete`] for callers that only need a
/// yes/no outcome: failures are logged at warn level and reported as `false`.
/// Neither a stale item nor an I/O failure can be retried without a fresh
/// scan.
pub fn complete(item: &TodoItem) -> bool {
    match try_complete(item) {
        Ok(()) => true,
        Err(err) => {
            warn!(path = %item.filepath.display(), %err, "todo completion failed");
            false
        }
    }
}

/// Complete a todo by deleting its line from the file, reporting why it
/// could not be done.
///
/// Succeeds only when the line number is still in bounds and the trimmed
/// current line equals the trimmed line captured at scan time; otherwise the
/// file has changed underneath the item, nothing is modified, and
/// [`DaybookError::StaleTodo`] names the file and line.
///
/// The trimmed-equality check is a heuristic, not a strict identity: a file
/// where an unrelated edit shifted a duplicate of this line into the same
/// position would still pass.
pub fn try_complete(item: &TodoItem) -> Result<()> {
    let content = fs::read_to_string(&item.filepath)?;

    let mut lines: Vec<&str> = content.lines().collect();
    if item.line_number == 0 || item.line_number > lines.len() {
        return Err(DaybookError::StaleTodo {
            path: item.filepath.clone(),
            line: item.line_number,
        });
    }

    let current = lines[item.line_number - 1];
    if current.trim() != item.full_line.trim() {
        return Err(DaybookError::StaleTodo {
            path: item.filepath.clone(),
            line: item.line_number,
        });
    }

    lines.remove(item.line_number - 1);
    let mut rewritten = lines.join("\n");
    if content.ends_with('\n') && !rewritten.is_empty() {
        rewritten.push('\n');
    }

    fs::write(&item.filepath, rewritten)?;
    Ok(())
}

//! Fuzzy search over note titles and content.
//!
//! This module ranks notes against a query using approximate string matching:
//! - **Partial ratio**: best similarity of the query against any same-length
//!   window of the longer string; favors substring-like matches, so short
//!   queries score well against long lines
//! - **Token-set ratio**: similarity over sorted unique word sets; recovers
//!   matches where words are reordered
//!
//! Scoring goes line by line over note bodies (frontmatter excluded) rather
//! than over whole documents. That keeps scores stable regardless of document
//! length and is what makes context snippets possible.
//!
//! The scoring strategy is a trait with two implementations: the strsim-backed
//! [`ApproxScorer`] and the exact-substring [`SubstringScorer`] fallback, which
//! tests containment against the title and the whole file text (frontmatter
//! included), reports a flat 100 per match, and attaches no snippets.

use crate::frontmatter;
use crate::types::Note;
use std::collections::BTreeSet;
use std::fs;
use tracing::debug;

/// Maximum length of a context snippet before truncation.
const SNIPPET_MAX: usize = 100;

/// Body lines shorter than this (after trimming) are not scored.
const MIN_LINE_LEN: usize = 3;

/// A single ranked search hit.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    /// The matching note
    pub note: Note,

    /// Match score in 0-100; always >= the caller's threshold
    pub score: u32,

    /// Snippet around the best-matching body line. `None` when the best match
    /// was the title, or in exact-substring fallback mode.
    pub context: Option<String>,
}

/// Pluggable similarity scoring strategy.
///
/// `title_score` may use order-insensitive matching on top of windowed
/// similarity; `line_score` is windowed similarity only. Both return 0-100.
pub trait Scorer: Send + Sync {
    /// Score the query against a note title.
    fn title_score(&self, query: &str, title: &str) -> u32;

    /// Score the query against one body line.
    fn line_score(&self, query: &str, line: &str) -> u32;

    /// Whether body-line matches should carry a context snippet.
    fn provides_context(&self) -> bool {
        true
    }
}

/// Approximate scorer built on normalized Levenshtein similarity.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproxScorer;

impl Scorer for ApproxScorer {
    fn title_score(&self, query: &str, title: &str) -> u32 {
        partial_ratio(query, title).max(token_set_ratio(query, title))
    }

    fn line_score(&self, query: &str, line: &str) -> u32 {
        partial_ratio(query, line)
    }
}

/// Exact case-insensitive substring scorer: the degraded-but-valid fallback
/// mode. Every containment match scores a flat 100. The engine applies it to
/// the whole file text rather than per body line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringScorer;

impl Scorer for SubstringScorer {
    fn title_score(&self, query: &str, title: &str) -> u32 {
        if title.contains(query) {
            100
        } else {
            0
        }
    }

    fn line_score(&self, query: &str, line: &str) -> u32 {
        self.title_score(query, line)
    }

    fn provides_context(&self) -> bool {
        false
    }
}

/// Similarity of two strings as an integer 0-100.
fn ratio(a: &str, b: &str) -> u32 {
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Best [`ratio`] of the shorter string against any window of the longer
/// string with the same character count.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if shorter.is_empty() {
        return 0;
    }

    let longer_chars: Vec<char> = longer.chars().collect();
    let window = shorter.chars().count();
    if window >= longer_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0;
    for start in 0..=(longer_chars.len() - window) {
        let slice: String = longer_chars[start..start + window].iter().collect();
        best = best.max(ratio(shorter, &slice));
        if best == 100 {
            break;
        }
    }
    best
}

/// Order-independent similarity over unique whitespace-separated tokens.
///
/// Compares the sorted intersection of the two token sets against each side's
/// full sorted token string and takes the best ratio, so `"sync weekly"`
/// scores 100 against `"weekly sync"`.
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0;
    }

    let common: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    let sect = common.join(" ");
    let full_a = join_nonempty(&sect, &only_a.join(" "));
    let full_b = join_nonempty(&sect, &only_b.join(" "));

    ratio(&sect, &full_a)
        .max(ratio(&sect, &full_b))
        .max(ratio(&full_a, &full_b))
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

/// Rank `notes` against `query`, reading each note's content from disk.
///
/// With a snippet-providing scorer, scoring goes line by line over the body
/// (frontmatter excluded, trivially short lines skipped). In fallback mode
/// the whole file text is tested at once, frontmatter included, so a query
/// matching only a tag or a short line still hits; no snippet is produced.
///
/// Notes whose files cannot be read are scored on title alone. Results are
/// filtered to `score >= threshold` and stably sorted by score descending, so
/// ties keep the encounter order of `notes`.
pub fn rank_notes(
    notes: Vec<Note>,
    query: &str,
    threshold: u32,
    scorer: &dyn Scorer,
) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();

    let mut results: Vec<SearchMatch> = Vec::new();
    for note in notes {
        let mut best = scorer.title_score(&query, &note.title.to_lowercase());
        let mut context = None;

        match fs::read_to_string(&note.filepath) {
            Ok(content) if scorer.provides_context() => {
                let (_, body) = frontmatter::split(&content);
                let lines: Vec<&str> = body.lines().collect();
                for (i, line) in lines.iter().enumerate() {
                    let stripped = line.trim();
                    if stripped.chars().count() < MIN_LINE_LEN {
                        continue;
                    }
                    let score = scorer.line_score(&query, &stripped.to_lowercase());
                    if score > best {
                        best = score;
                        context = Some(build_snippet(&lines, i));
                    }
                }
            }
            Ok(content) => {
                best = best.max(scorer.line_score(&query, &content.to_lowercase()));
            }
            Err(err) => {
                debug!(path = %note.filepath.display(), %err, "skipping unreadable body in search");
            }
        }

        if best >= threshold {
            results.push(SearchMatch {
                note,
                score: best,
                context,
            });
        }
    }

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Join the matched line with its immediate neighbors and truncate.
fn build_snippet(lines: &[&str], idx: usize) -> String {
    let start = idx.saturating_sub(1);
    let end = (idx + 2).min(lines.len());
    let joined = lines[start..end]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.chars().count() > SNIPPET_MAX {
        let truncated: String = joined.chars().take(SNIPPET_MAX).collect();
        format!("{}...", truncated)
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("milk", "milk"), 100);
        assert_eq!(ratio("", ""), 100);
        assert!(ratio("milk", "granite") < 50);
    }

    #[test]
    fn test_partial_ratio_exact_substring() {
        // an exact substring always hits a perfect window
        assert_eq!(partial_ratio("milk", "- buy milk today"), 100);
        assert_eq!(partial_ratio("- buy milk today", "milk"), 100);
    }

    #[test]
    fn test_partial_ratio_near_miss() {
        let score = partial_ratio("milkk", "- buy milk today");
        assert!(score >= 70 && score < 100, "score was {}", score);
    }

    #[test]
    fn test_partial_ratio_empty() {
        assert_eq!(partial_ratio("", "anything"), 0);
    }

    #[test]
    fn test_token_set_ratio_reordered_words() {
        assert_eq!(token_set_ratio("sync weekly", "weekly sync"), 100);
        assert_eq!(token_set_ratio("weekly sync", "weekly sync notes"), 100);
    }

    #[test]
    fn test_substring_scorer_flat_score() {
        let s = SubstringScorer;
        assert_eq!(s.title_score("milk", "buy milk today"), 100);
        assert_eq!(s.title_score("milk", "buy bread"), 0);
        assert!(!s.provides_context());
    }

    #[test]
    fn test_build_snippet_neighbors_and_truncation() {
        let lines = vec!["above", "  the match  ", "below", "far away"];
        assert_eq!(build_snippet(&lines, 1), "above the match below");

        let long = "x".repeat(200);
        let lines = vec![long.as_str()];
        let snippet = build_snippet(&lines, 0);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_rank_notes_empty_query() {
        let hits = rank_notes(Vec::new(), "", 40, &ApproxScorer);
        assert!(hits.is_empty());
    }
}

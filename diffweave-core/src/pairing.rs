//! Delete/insert pairing within a hunk.
//!
//! A raw unified diff presents deletions and insertions as independent
//! lines. This module recognizes a removed/added pair as a single edit and
//! collapses it into one modified row, under two constraints: the insert
//! must land near the delete (line-number window) and the contents must be
//! similar enough (change ratio). A recorded pair is afterwards broken when
//! an unpaired delete sits between its endpoints, which would otherwise
//! read as an insert adopted past a clearly-unrelated removal.

use similar::{ChangeTag, TextDiff};

use crate::config::EngineConfig;
use crate::inline::inline_segments;
use crate::types::{Change, Line};

/// Fraction of characters that differ between two line contents.
///
/// Character granularity: `C` = characters inserted plus deleted,
/// `T = |old| + |new|`, ratio `= C / T`; two empty strings rate 1.0 so they
/// never pair on emptiness alone.
pub(crate) fn change_ratio(old: &str, new: &str) -> f64 {
    let total = old.chars().count() + new.chars().count();
    if total == 0 {
        return 1.0;
    }
    let diff = TextDiff::from_chars(old, new);
    let changed: usize = diff
        .iter_all_changes()
        .filter(|change| change.tag() != ChangeTag::Equal)
        .map(|change| change.value().chars().count())
        .sum();
    changed as f64 / total as f64
}

/// Pair the changes of one hunk and emit display rows in original order.
///
/// Normals and unpaired deletes/inserts pass through as single-segment
/// rows. Each surviving pair emits one modified row at the delete's
/// position, consuming the insert wherever it sits in the sequence.
pub(crate) fn pair_changes(changes: &[Change], config: &EngineConfig) -> Vec<Line> {
    let insert_positions: Vec<usize> = changes
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Change::Insert { .. }))
        .map(|(i, _)| i)
        .collect();

    // pair_of[delete idx] = insert idx; consumed[insert idx] marks adoption.
    let mut pair_of: Vec<Option<usize>> = vec![None; changes.len()];
    let mut consumed = vec![false; changes.len()];
    let mut insert_taken = vec![false; insert_positions.len()];

    for (d_idx, change) in changes.iter().enumerate() {
        let Change::Delete { content: old_content, old_line } = change else {
            continue;
        };
        let mut best: Option<(f64, usize)> = None;
        for (slot, &a_idx) in insert_positions.iter().enumerate() {
            if insert_taken[slot] {
                continue;
            }
            let Change::Insert { content: new_content, new_line } = &changes[a_idx] else {
                continue;
            };
            let distance = (*new_line as i64 - *old_line as i64).unsigned_abs();
            if distance > config.max_diff_distance as u64 {
                continue;
            }
            let ratio = change_ratio(old_content, new_content);
            if ratio > config.max_change_ratio {
                continue;
            }
            // Strict `<` keeps the earliest insert on ratio ties.
            if best.map_or(true, |(best_ratio, _)| ratio < best_ratio) {
                best = Some((ratio, slot));
            }
        }
        if let Some((_, slot)) = best {
            insert_taken[slot] = true;
            pair_of[d_idx] = Some(insert_positions[slot]);
            consumed[insert_positions[slot]] = true;
        }
    }

    // Prefix count of *initially*-unpaired deletes: deletes whose own pair
    // breaks below do not cascade into further breaks.
    let mut unpaired_prefix = vec![0i32; changes.len() + 1];
    for (idx, change) in changes.iter().enumerate() {
        let unpaired_delete =
            matches!(change, Change::Delete { .. }) && pair_of[idx].is_none();
        unpaired_prefix[idx + 1] = unpaired_prefix[idx] + i32::from(unpaired_delete);
    }

    // Break forward pairs split by an unpaired delete between the endpoints.
    for d_idx in 0..changes.len() {
        let Some(a_idx) = pair_of[d_idx] else { continue };
        if a_idx > d_idx && unpaired_prefix[a_idx] - unpaired_prefix[d_idx + 1] > 0 {
            pair_of[d_idx] = None;
            consumed[a_idx] = false;
        }
    }

    let mut lines = Vec::with_capacity(changes.len());
    for (idx, change) in changes.iter().enumerate() {
        match change {
            Change::Normal { content, old_line, new_line } => {
                lines.push(Line::context(content, *old_line, *new_line));
            }
            Change::Delete { content, old_line } => match pair_of[idx] {
                Some(a_idx) => {
                    let Change::Insert { content: new_content, new_line } = &changes[a_idx]
                    else {
                        continue;
                    };
                    let segments =
                        inline_segments(content, new_content, config.inline_max_char_edits);
                    lines.push(Line::modified(*old_line, *new_line, segments));
                }
                None => lines.push(Line::deletion(content, *old_line)),
            },
            Change::Insert { content, new_line } => {
                if !consumed[idx] {
                    lines.push(Line::insertion(content, *new_line));
                }
            }
        }
    }
    lines
}

//! Intra-line segmentation for a paired delete/insert.
//!
//! A word-level diff produces the coarse token runs; adjacent
//! delete/insert token pairs that differ by only a few characters are
//! refined to character granularity so small edits like `(` → `[` do not
//! swallow the whole word.

use similar::{ChangeTag, TextDiff};

use crate::types::{ChangeKind, Segment};

fn kind_of(tag: ChangeTag) -> ChangeKind {
    match tag {
        ChangeTag::Equal => ChangeKind::Normal,
        ChangeTag::Delete => ChangeKind::Delete,
        ChangeTag::Insert => ChangeKind::Insert,
    }
}

/// Build the segment run for a modified row from its old and new content.
///
/// Unicode word segmentation keeps punctuation as separate tokens, so a
/// rename inside a call expression pairs the identifiers rather than the
/// whole expression.
pub(crate) fn inline_segments(old: &str, new: &str, max_char_edits: usize) -> Vec<Segment> {
    let diff = TextDiff::from_unicode_words(old, new);
    let tokens: Vec<Segment> = diff
        .iter_all_changes()
        .map(|change| Segment::new(change.value(), kind_of(change.tag())))
        .collect();

    let mut refined: Vec<Segment> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len()
            && tokens[i].kind == ChangeKind::Delete
            && tokens[i + 1].kind == ChangeKind::Insert
        {
            if let Some(chars) =
                char_refinement(&tokens[i].value, &tokens[i + 1].value, max_char_edits)
            {
                refined.extend(chars);
                i += 2;
                continue;
            }
        }
        refined.push(tokens[i].clone());
        i += 1;
    }

    merge_segments(refined)
}

/// Character-level replacement for a word pair, if the edit is small.
///
/// Returns `None` when the number of characters added plus removed exceeds
/// `max_edits`; the caller keeps the word-level pair verbatim.
fn char_refinement(old: &str, new: &str, max_edits: usize) -> Option<Vec<Segment>> {
    let diff = TextDiff::from_chars(old, new);
    let edits = diff
        .iter_all_changes()
        .filter(|change| change.tag() != ChangeTag::Equal)
        .count();
    if edits > max_edits {
        return None;
    }
    Some(
        diff.iter_all_changes()
            .map(|change| Segment::new(change.value(), kind_of(change.tag())))
            .collect(),
    )
}

/// Merge adjacent same-kind segments and drop empty ones.
///
/// An all-empty result collapses to a single placeholder normal segment so
/// every row carries at least one segment.
pub(crate) fn merge_segments(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    for segment in segments {
        if segment.value.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.kind == segment.kind => last.value.push_str(&segment.value),
            _ => merged.push(segment),
        }
    }
    if merged.is_empty() {
        merged.push(Segment::new("", ChangeKind::Normal));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(value: &str, kind: ChangeKind) -> Segment {
        Segment::new(value, kind)
    }

    #[test]
    fn word_change_keeps_shared_prefix() {
        let segments = inline_segments("hello world", "hello there", 4);
        assert_eq!(
            segments,
            vec![
                seg("hello ", ChangeKind::Normal),
                seg("world", ChangeKind::Delete),
                seg("there", ChangeKind::Insert),
            ]
        );
    }

    #[test]
    fn small_punctuation_edit_refines_to_chars() {
        let segments = inline_segments("foo(bar)", "foo[bar]", 4);
        assert_eq!(
            segments,
            vec![
                seg("foo", ChangeKind::Normal),
                seg("(", ChangeKind::Delete),
                seg("[", ChangeKind::Insert),
                seg("bar", ChangeKind::Normal),
                seg(")", ChangeKind::Delete),
                seg("]", ChangeKind::Insert),
            ]
        );
    }

    #[test]
    fn identical_contents_yield_one_normal_segment() {
        let segments = inline_segments("same line", "same line", 4);
        assert_eq!(segments, vec![seg("same line", ChangeKind::Normal)]);
    }

    #[test]
    fn empty_pair_yields_placeholder() {
        let segments = inline_segments("", "", 4);
        assert_eq!(segments, vec![seg("", ChangeKind::Normal)]);
    }

    #[test]
    fn merge_collapses_adjacent_same_kind() {
        let merged = merge_segments(vec![
            seg("a", ChangeKind::Normal),
            seg("b", ChangeKind::Normal),
            seg("", ChangeKind::Delete),
            seg("c", ChangeKind::Delete),
        ]);
        assert_eq!(
            merged,
            vec![seg("ab", ChangeKind::Normal), seg("c", ChangeKind::Delete)]
        );
    }

    #[test]
    fn concatenation_identity_holds() {
        let old = "let total = price * count;";
        let new = "let total = cost * count;";
        let segments = inline_segments(old, new, 4);

        let old_side: String = segments
            .iter()
            .filter(|s| s.kind != ChangeKind::Insert)
            .map(|s| s.value.as_str())
            .collect();
        let new_side: String = segments
            .iter()
            .filter(|s| s.kind != ChangeKind::Delete)
            .map(|s| s.value.as_str())
            .collect();
        assert_eq!(old_side, old);
        assert_eq!(new_side, new);
    }
}

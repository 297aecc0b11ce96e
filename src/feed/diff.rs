//! Keyed list diffing for feed rows.
//!
//! Computes a sequence of positional operations that transforms the old
//! row list into the new one. Ops are meant to be replayed in order; each
//! position refers to the list state at the moment the op is applied.
//! Moves are expressed as a removal followed by an insertion.

use std::collections::{HashMap, HashSet};

use crate::domain::FeedRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    Removed { position: usize },
    Inserted { position: usize },
    Changed { position: usize },
}

#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub ops: Vec<DiffOp>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Diff two row lists by stable adapter id.
///
/// Invariant: replaying the result against any surface holding the old
/// sequence produces exactly the new sequence.
pub fn calculate_diff(old: &[FeedRow], new: &[FeedRow]) -> DiffResult {
    let mut ops = Vec::new();

    let mut work: Vec<i64> = old.iter().map(|r| r.adapter_id()).collect();
    let new_ids: Vec<i64> = new.iter().map(|r| r.adapter_id()).collect();
    let new_set: HashSet<i64> = new_ids.iter().copied().collect();

    // Removals first, back to front so earlier positions stay valid.
    for pos in (0..work.len()).rev() {
        if !new_set.contains(&work[pos]) {
            ops.push(DiffOp::Removed { position: pos });
            work.remove(pos);
        }
    }

    // Walk target positions; each mismatch is either a fresh insert or a
    // move (removal from its later slot, then insert here).
    for (target, &id) in new_ids.iter().enumerate() {
        if target < work.len() && work[target] == id {
            continue;
        }
        if let Some(current) = work.iter().position(|&w| w == id) {
            ops.push(DiffOp::Removed { position: current });
            work.remove(current);
        }
        ops.push(DiffOp::Inserted { position: target });
        work.insert(target, id);
    }

    // Same identity, different content: rebind in place.
    let old_by_id: HashMap<i64, &FeedRow> = old.iter().map(|r| (r.adapter_id(), r)).collect();
    for (position, row) in new.iter().enumerate() {
        if let Some(&old_row) = old_by_id.get(&row.adapter_id()) {
            if old_row != row {
                ops.push(DiffOp::Changed { position });
            }
        }
    }

    DiffResult { ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaginationState, PaginationUiModel, SubmissionUiModel};

    fn submission(fullname: &str, title: &str) -> FeedRow {
        FeedRow::Submission(SubmissionUiModel {
            adapter_id: SubmissionUiModel::adapter_id_for(fullname),
            fullname: fullname.to_string(),
            title: title.to_string(),
            author: "someone".to_string(),
            subreddit: "rust".to_string(),
            score: 1,
            num_comments: 0,
        })
    }

    fn footer(state: PaginationState) -> FeedRow {
        FeedRow::PaginationFooter(PaginationUiModel { state })
    }

    /// Replays ops over a plain id list, mimicking a rendering surface.
    fn replay(old: &[FeedRow], new: &[FeedRow], diff: &DiffResult) -> Vec<i64> {
        let mut ids: Vec<i64> = old.iter().map(|r| r.adapter_id()).collect();
        for op in &diff.ops {
            match *op {
                DiffOp::Removed { position } => {
                    ids.remove(position);
                }
                DiffOp::Inserted { position } => {
                    ids.insert(position, new[position].adapter_id());
                }
                DiffOp::Changed { .. } => {}
            }
        }
        ids
    }

    fn assert_converges(old: &[FeedRow], new: &[FeedRow]) {
        let diff = calculate_diff(old, new);
        let expected: Vec<i64> = new.iter().map(|r| r.adapter_id()).collect();
        assert_eq!(replay(old, new, &diff), expected);
    }

    #[test]
    fn test_identical_lists_produce_no_ops() {
        let rows = vec![submission("t3_a", "one"), submission("t3_b", "two")];
        assert!(calculate_diff(&rows, &rows).is_empty());
    }

    #[test]
    fn test_append_only() {
        let old = vec![submission("t3_a", "one")];
        let new = vec![submission("t3_a", "one"), submission("t3_b", "two")];
        let diff = calculate_diff(&old, &new);
        assert_eq!(diff.ops, vec![DiffOp::Inserted { position: 1 }]);
        assert_converges(&old, &new);
    }

    #[test]
    fn test_removal_only() {
        let old = vec![
            submission("t3_a", "one"),
            submission("t3_b", "two"),
            submission("t3_c", "three"),
        ];
        let new = vec![submission("t3_b", "two")];
        assert_converges(&old, &new);
    }

    #[test]
    fn test_reorder() {
        let old = vec![
            submission("t3_a", "one"),
            submission("t3_b", "two"),
            submission("t3_c", "three"),
        ];
        let new = vec![
            submission("t3_c", "three"),
            submission("t3_a", "one"),
            submission("t3_b", "two"),
        ];
        assert_converges(&old, &new);
    }

    #[test]
    fn test_change_in_place() {
        let old = vec![submission("t3_a", "one")];
        let new = vec![submission("t3_a", "one, edited")];
        let diff = calculate_diff(&old, &new);
        assert_eq!(diff.ops, vec![DiffOp::Changed { position: 0 }]);
    }

    #[test]
    fn test_footer_swap_for_next_page() {
        // Typical pagination step: footer flips to Loading, page arrives,
        // new rows appear above a fresh Idle footer.
        let old = vec![
            submission("t3_a", "one"),
            footer(PaginationState::Loading),
        ];
        let new = vec![
            submission("t3_a", "one"),
            submission("t3_b", "two"),
            footer(PaginationState::Idle),
        ];
        assert_converges(&old, &new);

        let diff = calculate_diff(&old, &new);
        // Footer is moved/rebound, never duplicated
        let inserts = diff
            .ops
            .iter()
            .filter(|op| matches!(op, DiffOp::Inserted { .. }))
            .count();
        assert!(inserts <= 2);
    }

    #[test]
    fn test_full_replacement() {
        let old = vec![submission("t3_a", "one"), submission("t3_b", "two")];
        let new = vec![submission("t3_x", "ten"), submission("t3_y", "eleven")];
        assert_converges(&old, &new);
    }

    #[test]
    fn test_empty_to_populated_and_back() {
        let rows = vec![submission("t3_a", "one"), footer(PaginationState::Idle)];
        assert_converges(&[], &rows);
        assert_converges(&rows, &[]);
    }
}

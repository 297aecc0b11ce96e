use serde::{Deserialize, Serialize};

/// Adapter id reserved for the pagination footer row. Submissions use
/// positive ids derived from their fullnames, so this can never collide.
pub const ADAPTER_ID_PAGINATION_FOOTER: i64 = -99;

/// Row tag used to pick the child adapter that renders a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowType {
    Submission,
    PaginationFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionUiModel {
    /// Stable numeric identity for list diffing, decoded from the
    /// base-36 id part of the fullname.
    pub adapter_id: i64,
    pub fullname: String,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: u64,
}

impl SubmissionUiModel {
    /// Decode the numeric identity from a fullname like `t3_abc123`.
    pub fn adapter_id_for(fullname: &str) -> i64 {
        let id36 = fullname.rsplit('_').next().unwrap_or(fullname);
        i64::from_str_radix(id36, 36).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationState {
    Idle,
    Loading,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationUiModel {
    pub state: PaginationState,
}

/// A row of the feed list. Tagged so the list adapter can dispatch
/// creation and binding to the matching child adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRow {
    Submission(SubmissionUiModel),
    PaginationFooter(PaginationUiModel),
}

impl FeedRow {
    pub fn row_type(&self) -> RowType {
        match self {
            FeedRow::Submission(_) => RowType::Submission,
            FeedRow::PaginationFooter(_) => RowType::PaginationFooter,
        }
    }

    /// Stable identity used by the list differ.
    pub fn adapter_id(&self) -> i64 {
        match self {
            FeedRow::Submission(s) => s.adapter_id,
            FeedRow::PaginationFooter(_) => ADAPTER_ID_PAGINATION_FOOTER,
        }
    }
}

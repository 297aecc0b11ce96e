pub mod message;
pub mod row;

pub use message::{stale_messages, Message, UnreadSnapshot};
pub use row::{
    FeedRow, PaginationState, PaginationUiModel, RowType, SubmissionUiModel,
    ADAPTER_ID_PAGINATION_FOOTER,
};

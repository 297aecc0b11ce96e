//! Diff-driven rendering of the submission feed.
//!
//! A feed is a heterogeneous row list (submissions plus an optional
//! pagination footer). Each row type has its own child adapter that knows
//! how to create and bind a view for it; [`FeedListAdapter`] dispatches on
//! the row tag and replays computed diffs onto a [`RenderSurface`].

pub mod diff;

use std::collections::HashMap;

use crate::domain::{FeedRow, PaginationState, RowType};

pub use diff::{calculate_diff, DiffOp, DiffResult};

/// A bound view for one row: what the rendering surface displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowView {
    pub text: String,
}

/// Per-row-type child adapter: view creation and binding for one variant.
pub trait RowAdapter {
    fn create_view(&self) -> RowView;
    fn bind(&self, view: &mut RowView, row: &FeedRow);
}

/// Renders submission rows as single feed lines.
pub struct SubmissionRowAdapter;

impl RowAdapter for SubmissionRowAdapter {
    fn create_view(&self) -> RowView {
        RowView::default()
    }

    fn bind(&self, view: &mut RowView, row: &FeedRow) {
        if let FeedRow::Submission(s) = row {
            view.text = format!(
                "{:>5}  {}  (r/{} · {} comments · u/{})",
                s.score, s.title, s.subreddit, s.num_comments, s.author
            );
        }
    }
}

/// Renders the pagination footer row.
pub struct PaginationRowAdapter;

impl RowAdapter for PaginationRowAdapter {
    fn create_view(&self) -> RowView {
        RowView::default()
    }

    fn bind(&self, view: &mut RowView, row: &FeedRow) {
        if let FeedRow::PaginationFooter(p) = row {
            view.text = match p.state {
                PaginationState::Idle => "— more —".to_string(),
                PaginationState::Loading => "loading more…".to_string(),
                PaginationState::Failed => "couldn't load more (retry)".to_string(),
            };
        }
    }
}

/// The surface diffs are replayed onto. Positions refer to the surface
/// state at the moment each call is made.
pub trait RenderSurface {
    fn inserted(&mut self, position: usize, view: RowView);
    fn removed(&mut self, position: usize);
    fn changed(&mut self, position: usize, view: RowView);
}

/// In-memory surface: an ordered list of bound views. Backs the terminal
/// feed printout and the adapter tests.
#[derive(Debug, Default)]
pub struct VecSurface {
    pub views: Vec<RowView>,
}

impl VecSurface {
    pub fn texts(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.text.as_str()).collect()
    }
}

impl RenderSurface for VecSurface {
    fn inserted(&mut self, position: usize, view: RowView) {
        self.views.insert(position, view);
    }

    fn removed(&mut self, position: usize) {
        self.views.remove(position);
    }

    fn changed(&mut self, position: usize, view: RowView) {
        self.views[position] = view;
    }
}

/// List adapter over heterogeneous feed rows. Holds the current row list
/// and a child adapter per row type; updates arrive as a (rows, diff)
/// pair and are replayed onto the surface.
pub struct FeedListAdapter {
    rows: Vec<FeedRow>,
    children: HashMap<RowType, Box<dyn RowAdapter + Send + Sync>>,
}

impl FeedListAdapter {
    pub fn new() -> Self {
        let mut children: HashMap<RowType, Box<dyn RowAdapter + Send + Sync>> = HashMap::new();
        children.insert(RowType::Submission, Box::new(SubmissionRowAdapter));
        children.insert(RowType::PaginationFooter, Box::new(PaginationRowAdapter));
        Self {
            rows: Vec::new(),
            children,
        }
    }

    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }

    pub fn item_count(&self) -> usize {
        self.rows.len()
    }

    /// Item count with a trailing pagination footer excluded.
    pub fn item_count_minus_decorators(&self) -> usize {
        let count = self.rows.len();
        if count > 1 && self.rows[count - 1].row_type() == RowType::PaginationFooter {
            count - 1
        } else {
            count
        }
    }

    pub fn item_id(&self, position: usize) -> i64 {
        self.rows[position].adapter_id()
    }

    /// Replace the row list and replay the precomputed diff onto the
    /// surface, delegating view creation/binding per row type.
    pub fn apply(&mut self, update: (Vec<FeedRow>, DiffResult), surface: &mut dyn RenderSurface) {
        let (new_rows, diff) = update;
        self.rows = new_rows;

        for op in &diff.ops {
            match *op {
                DiffOp::Removed { position } => surface.removed(position),
                DiffOp::Inserted { position } => {
                    surface.inserted(position, self.bound_view(position));
                }
                DiffOp::Changed { position } => {
                    surface.changed(position, self.bound_view(position));
                }
            }
        }
    }

    fn bound_view(&self, position: usize) -> RowView {
        let row = &self.rows[position];
        let child = self
            .children
            .get(&row.row_type())
            .expect("child adapter registered for every row type");
        let mut view = child.create_view();
        child.bind(&mut view, row);
        view
    }
}

impl Default for FeedListAdapter {
    fn default() -> Self {
        Self::new()
    }
}

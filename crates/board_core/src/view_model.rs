use crate::{CycleSeq, Trend, ViewId};

/// Snapshot of the board, rows sorted by descending visitor count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardViewModel {
    pub applied_cycle: Option<CycleSeq>,
    pub rows: Vec<RowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub view: ViewId,
    pub path: String,
    pub title: String,
    pub thumbnail_url: String,
    pub count: u64,
    pub displayed: u64,
    pub trend: Option<Trend>,
}

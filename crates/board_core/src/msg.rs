use std::time::Instant;

use crate::{CycleSeq, MergedPageRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A poll cycle produced a merged page set.
    CycleCompleted {
        seq: CycleSeq,
        merged: Vec<MergedPageRecord>,
        at: Instant,
    },
    /// A poll cycle whose enrichment stopped early. Pages it did not reach
    /// keep their current entities.
    CyclePartial {
        seq: CycleSeq,
        merged: Vec<MergedPageRecord>,
        at: Instant,
    },
    /// A poll cycle gave up; the board stays as it is.
    CycleAbandoned { seq: CycleSeq, reason: String },
    /// Animation clock tick.
    AnimationFrame { at: Instant },
    /// The display layer reports a click on the entity for `path`.
    EntityClicked { path: String },
}

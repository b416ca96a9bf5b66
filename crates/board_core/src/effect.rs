use crate::{Instruction, MergedPageRecord, OverlayRequest, Trend, ViewId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Insert a new element and fade it in.
    Insert { view: ViewId, record: MergedPageRecord },
    /// Start animating a count; `trend` drives the up/down indicator.
    AnimateCount {
        view: ViewId,
        path: String,
        from: u64,
        to: u64,
        trend: Trend,
    },
    /// Detach and release an element.
    Detach { view: ViewId, path: String },
    /// Show an animation frame value.
    ShowCount { view: ViewId, value: u64 },
    /// Re-sort by count and re-flow positions.
    Relayout,
    OpenOverlay(OverlayRequest),
}

impl From<Instruction> for Effect {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Create { view, record } => Effect::Insert { view, record },
            Instruction::Update {
                view,
                path,
                from,
                to,
                trend,
            } => Effect::AnimateCount {
                view,
                path,
                from,
                to,
                trend,
            },
            Instruction::Remove { view, path } => Effect::Detach { view, path },
        }
    }
}

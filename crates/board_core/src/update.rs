use std::time::Instant;

use board_logging::{board_debug, board_info};

use crate::{BoardState, CycleSeq, Effect, MergedPageRecord, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BoardState, msg: Msg) -> (BoardState, Vec<Effect>) {
    let effects = match msg {
        Msg::CycleCompleted { seq, merged, at } => apply_cycle(&mut state, seq, &merged, true, at),
        Msg::CyclePartial { seq, merged, at } => apply_cycle(&mut state, seq, &merged, false, at),
        Msg::CycleAbandoned { seq, reason } => {
            board_info!("cycle {} abandoned: {}", seq, reason);
            Vec::new()
        }
        Msg::AnimationFrame { at } => state
            .advance_animations(at)
            .into_iter()
            .map(|(view, value)| Effect::ShowCount { view, value })
            .collect(),
        Msg::EntityClicked { path } => match state.overlay_for(&path) {
            Some(request) => vec![Effect::OpenOverlay(request)],
            None => {
                board_debug!("click on unknown entity {}", path);
                Vec::new()
            }
        },
    };

    (state, effects)
}

fn apply_cycle(
    state: &mut BoardState,
    seq: CycleSeq,
    merged: &[MergedPageRecord],
    complete: bool,
    at: Instant,
) -> Vec<Effect> {
    if state.is_stale(seq) {
        board_info!(
            "discarding cycle {} (cycle {:?} already applied)",
            seq,
            state.applied_cycle()
        );
        return Vec::new();
    }
    let instructions = state.apply_cycle(seq, merged, complete, at);
    board_debug!(
        "cycle {} applied: {} records{}, {} instructions",
        seq,
        merged.len(),
        if complete { "" } else { " (partial)" },
        instructions.len()
    );
    if instructions.is_empty() {
        return Vec::new();
    }
    let mut effects = Vec::with_capacity(instructions.len() + 1);
    effects.extend(instructions.into_iter().map(Effect::from));
    effects.push(Effect::Relayout);
    effects
}

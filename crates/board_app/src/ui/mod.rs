//! Presentation collaborators: layout/sort and overlay.
pub mod render;
pub mod terminal;

use board_core::{BoardViewModel, Effect, MergedPageRecord, OverlayRequest, Trend, ViewId};

/// Receives the board's lifecycle effects and draws them.
pub trait Presenter {
    fn insert(&mut self, view: ViewId, record: &MergedPageRecord);
    fn animate_count(&mut self, view: ViewId, from: u64, to: u64, trend: Trend);
    fn show_count(&mut self, view: ViewId, value: u64);
    fn detach(&mut self, view: ViewId);
    /// Re-sort by count and re-flow; `board` rows are already sorted.
    fn relayout(&mut self, board: &BoardViewModel);
    fn open_overlay(&mut self, request: &OverlayRequest);
    /// True when drawn counts changed since the last [`Presenter::render`].
    fn needs_render(&self) -> bool;
    fn render(&mut self, board: &BoardViewModel);
}

/// Forwards `effects` to `presenter` in order. `board` is the state after the
/// update that produced them.
pub fn apply_effects<P: Presenter + ?Sized>(
    presenter: &mut P,
    effects: Vec<Effect>,
    board: &BoardViewModel,
) {
    for effect in effects {
        match effect {
            Effect::Insert { view, record } => presenter.insert(view, &record),
            Effect::AnimateCount {
                view,
                from,
                to,
                trend,
                ..
            } => presenter.animate_count(view, from, to, trend),
            Effect::Detach { view, .. } => presenter.detach(view),
            Effect::ShowCount { view, value } => presenter.show_count(view, value),
            Effect::Relayout => presenter.relayout(board),
            Effect::OpenOverlay(request) => presenter.open_overlay(&request),
        }
    }
}

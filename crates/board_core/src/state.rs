use std::time::Instant;

use crate::reconcile::{reconcile, reconcile_partial, Reconciliation};
use crate::view_model::{BoardViewModel, RowView};
use crate::{
    BoardConfig, CycleSeq, EntityRegistry, Instruction, MergedPageRecord, OverlayRequest, ViewId,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    registry: EntityRegistry,
    applied: Option<CycleSeq>,
    chat_base_url: Option<String>,
    dirty: bool,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &BoardConfig) -> Self {
        Self {
            registry: EntityRegistry::with_animation(config.animation(), config.easing),
            chat_base_url: config.chat_base().map(ToOwned::to_owned),
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Sequence number of the last cycle applied to the registry.
    pub fn applied_cycle(&self) -> Option<CycleSeq> {
        self.applied
    }

    /// A cycle is stale when one at least as recent was already applied.
    pub fn is_stale(&self, seq: CycleSeq) -> bool {
        self.applied.is_some_and(|applied| seq <= applied)
    }

    pub fn view(&self) -> BoardViewModel {
        let mut rows: Vec<RowView> = self
            .registry
            .iter()
            .map(|entity| RowView {
                view: entity.view(),
                path: entity.path().to_string(),
                title: entity.title().to_string(),
                thumbnail_url: entity.thumbnail_url().to_string(),
                count: entity.visitor_count(),
                displayed: entity.displayed_count(),
                trend: entity.trend(),
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        BoardViewModel {
            applied_cycle: self.applied,
            rows,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn apply_cycle(
        &mut self,
        seq: CycleSeq,
        merged: &[MergedPageRecord],
        complete: bool,
        at: Instant,
    ) -> Vec<Instruction> {
        let previous = std::mem::take(&mut self.registry);
        let Reconciliation {
            registry,
            instructions,
        } = if complete {
            reconcile(previous, merged, at)
        } else {
            reconcile_partial(previous, merged, at)
        };
        self.registry = registry;
        self.applied = Some(seq);
        if !instructions.is_empty() {
            self.dirty = true;
        }
        instructions
    }

    pub(crate) fn advance_animations(&mut self, at: Instant) -> Vec<(ViewId, u64)> {
        let frames: Vec<(ViewId, u64)> = self
            .registry
            .iter_mut()
            .filter_map(|entity| entity.frame(at).map(|value| (entity.view(), value)))
            .collect();
        if !frames.is_empty() {
            self.dirty = true;
        }
        frames
    }

    pub(crate) fn overlay_for(&self, path: &str) -> Option<OverlayRequest> {
        let entity = self.registry.get(path)?;
        Some(OverlayRequest::new(
            entity.path(),
            entity.title(),
            entity.embed_html().unwrap_or_default(),
            self.chat_base_url.as_deref(),
        ))
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use board_logging::{board_debug, board_warn};

use crate::{DisplayEntity, Easing, Lifecycle, MergedPageRecord, Trend, ViewId, DEFAULT_ANIMATION};

/// Entities currently on the board, keyed by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRegistry {
    entities: BTreeMap<String, DisplayEntity>,
    next_view: u64,
    animation: Duration,
    easing: Easing,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::with_animation(DEFAULT_ANIMATION, Easing::Linear)
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry whose entities animate count changes over `duration`.
    pub fn with_animation(duration: Duration, easing: Easing) -> Self {
        Self {
            entities: BTreeMap::new(),
            next_view: 0,
            animation: duration,
            easing,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&DisplayEntity> {
        self.entities.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entities.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayEntity> {
        self.entities.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut DisplayEntity> {
        self.entities.values_mut()
    }

    fn allocate_view(&mut self) -> ViewId {
        let view = ViewId(self.next_view);
        self.next_view += 1;
        view
    }
}

/// One lifecycle transition for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Insert a new element and animate it in.
    Create {
        view: ViewId,
        record: MergedPageRecord,
    },
    /// Animate the displayed count towards `to`.
    Update {
        view: ViewId,
        path: String,
        from: u64,
        to: u64,
        trend: Trend,
    },
    /// Detach the element and release it.
    Remove { view: ViewId, path: String },
}

impl Instruction {
    pub fn path(&self) -> &str {
        match self {
            Instruction::Create { record, .. } => &record.path,
            Instruction::Update { path, .. } | Instruction::Remove { path, .. } => path,
        }
    }

    pub fn view(&self) -> ViewId {
        match self {
            Instruction::Create { view, .. }
            | Instruction::Update { view, .. }
            | Instruction::Remove { view, .. } => *view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub registry: EntityRegistry,
    pub instructions: Vec<Instruction>,
}

/// Diffs `merged` against `previous` and returns the replacement registry.
///
/// Creates and updates follow the order of `merged`; removals of unclaimed
/// paths come last. Only the first record for a path is honoured. A record
/// that cannot become an entity is skipped without affecting the others.
pub fn reconcile(
    previous: EntityRegistry,
    merged: &[MergedPageRecord],
    now: Instant,
) -> Reconciliation {
    reconcile_with(previous, merged, now, true)
}

/// Like [`reconcile`] for a merged set that covers only part of the ranking.
/// Entities missing from `merged` stay on the board untouched.
pub fn reconcile_partial(
    previous: EntityRegistry,
    merged: &[MergedPageRecord],
    now: Instant,
) -> Reconciliation {
    reconcile_with(previous, merged, now, false)
}

fn reconcile_with(
    previous: EntityRegistry,
    merged: &[MergedPageRecord],
    now: Instant,
    release_unclaimed: bool,
) -> Reconciliation {
    let EntityRegistry {
        entities: mut unclaimed,
        next_view,
        animation,
        easing,
    } = previous;
    let mut registry = EntityRegistry {
        entities: BTreeMap::new(),
        next_view,
        animation,
        easing,
    };
    let mut instructions = Vec::new();
    let mut seen = BTreeSet::new();

    for record in merged {
        if !seen.insert(record.path.as_str()) {
            board_debug!("reconcile: ignoring duplicate record for {}", record.path);
            continue;
        }

        match unclaimed.remove(&record.path) {
            Some(mut entity) => match entity.set_visitors(record.visitor_count, now) {
                Ok(change) => {
                    if let Some(change) = change {
                        instructions.push(Instruction::Update {
                            view: entity.view(),
                            path: record.path.clone(),
                            from: change.from,
                            to: change.to,
                            trend: change.trend,
                        });
                    }
                    registry.entities.insert(record.path.clone(), entity);
                }
                Err(err) => {
                    board_warn!("reconcile: cannot update {}: {}", record.path, err);
                    // Left unclaimed so it is released below.
                    unclaimed.insert(record.path.clone(), entity);
                }
            },
            None => {
                let view = registry.allocate_view();
                let created = DisplayEntity::create(record, view)
                    .map(|entity| entity.with_animation(animation, easing));
                match created {
                    Ok(mut entity) => {
                        entity.show();
                        instructions.push(Instruction::Create {
                            view,
                            record: record.clone(),
                        });
                        registry.entities.insert(record.path.clone(), entity);
                    }
                    Err(err) => {
                        board_warn!("reconcile: skipping {}: {}", record.path, err);
                    }
                }
            }
        }
    }

    for (path, mut entity) in unclaimed {
        if !release_unclaimed && entity.lifecycle() != Lifecycle::Removed {
            registry.entities.insert(path, entity);
            continue;
        }
        if entity.remove() {
            instructions.push(Instruction::Remove {
                view: entity.view(),
                path,
            });
        }
    }

    Reconciliation {
        registry,
        instructions,
    }
}

//! Board core: data model, join and reconcile logic, and the pure board state machine.
mod config;
mod effect;
mod entity;
mod join;
mod model;
mod msg;
mod overlay;
mod reconcile;
mod state;
mod tween;
mod update;
mod view_model;

pub use config::{
    BoardConfig, ConfigError, DEFAULT_BATCH_SIZE, DEFAULT_CHAT_BASE_URL, DEFAULT_HOST,
    DEFAULT_NUM_COLS, DEFAULT_NUM_PAGES, DEFAULT_POLL_INTERVAL_MS,
};
pub use effect::Effect;
pub use entity::{CountChange, DisplayEntity, EntityError, Lifecycle};
pub use join::{enrichment_targets, join, page_url, ContentFilter, DEFAULT_CONTENT_MARKER};
pub use model::{CycleSeq, EnrichmentRecord, MergedPageRecord, RankedPageRecord, Trend, ViewId};
pub use msg::Msg;
pub use overlay::{chat_room_name, OverlayRequest, CHAT_ROOM_MAX_LEN};
pub use reconcile::{reconcile, reconcile_partial, EntityRegistry, Instruction, Reconciliation};
pub use state::BoardState;
pub use tween::{CountTween, Easing, DEFAULT_ANIMATION};
pub use update::update;
pub use view_model::{BoardViewModel, RowView};

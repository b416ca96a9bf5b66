//! Board engine: HTTP sources, enrichment pagination, and the poll scheduler.
mod cycle;
mod fetch;
mod paginate;
mod scheduler;
mod sources;
mod types;

pub use cycle::CyclePipeline;
pub use fetch::{
    FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_ENRICHMENT_ENDPOINT, DEFAULT_RANKED_ENDPOINT,
};
pub use paginate::{EnrichmentPaginator, Pagination, PaginationOutcome};
pub use scheduler::PollScheduler;
pub use sources::{
    parse_enrichment, parse_ranked, EnrichmentSource, HttpEnrichmentSource, HttpRankedSource,
    RankedPagesSource,
};
pub use types::{
    CycleOutcome, CycleReport, EngineError, EngineEvent, FailureKind, FetchError, FetchMetadata,
    FetchOutput,
};

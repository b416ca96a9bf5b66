use std::sync::Arc;

use board_core::{enrichment_targets, join, BoardConfig, ContentFilter, CycleSeq};
use board_logging::{board_debug, board_info, board_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::paginate::{EnrichmentPaginator, PaginationOutcome};
use crate::sources::{EnrichmentSource, HttpEnrichmentSource, HttpRankedSource, RankedPagesSource};
use crate::{CycleOutcome, CycleReport, EngineError};

/// One fetch → enrich → join pass.
pub struct CyclePipeline {
    ranked: Arc<dyn RankedPagesSource>,
    enrichment: Arc<dyn EnrichmentSource>,
    paginator: EnrichmentPaginator,
    host: String,
    filter: ContentFilter,
}

impl CyclePipeline {
    pub fn new(
        ranked: Arc<dyn RankedPagesSource>,
        enrichment: Arc<dyn EnrichmentSource>,
        paginator: EnrichmentPaginator,
        host: impl Into<String>,
        filter: ContentFilter,
    ) -> Self {
        Self {
            ranked,
            enrichment,
            paginator,
            host: host.into(),
            filter,
        }
    }

    /// Wires HTTP sources for `config` against the endpoints in `settings`.
    pub fn from_config(config: &BoardConfig, settings: FetchSettings) -> Result<Self, EngineError> {
        config.validate()?;
        let filter = config.content_filter()?;
        let ranked_endpoint = settings.ranked_endpoint.clone();
        let enrichment_endpoint = settings.enrichment_endpoint.clone();
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(settings)?);

        let ranked = HttpRankedSource::new(
            fetcher.clone(),
            &ranked_endpoint,
            &config.host,
            &config.api_key,
            config.num_pages,
        )?;
        let enrichment =
            HttpEnrichmentSource::new(fetcher, &enrichment_endpoint, config.embedly_key.clone())?;

        Ok(Self::new(
            Arc::new(ranked),
            Arc::new(enrichment),
            EnrichmentPaginator::new(config.batch_size),
            config.host.clone(),
            filter,
        ))
    }

    /// Enrichment that stopped early is joined as far as it goes and reported
    /// as [`CycleOutcome::Partial`]; a cycle that gathered no enrichment at
    /// all after a failure is abandoned instead.
    pub async fn run(&self, seq: CycleSeq, cancel: &CancellationToken) -> CycleReport {
        let ranked = match self.ranked.fetch_ranked().await {
            Ok(ranked) => ranked,
            Err(err) => {
                board_warn!("cycle {}: ranked fetch failed: {}", seq, err);
                return CycleReport {
                    seq,
                    ranked: 0,
                    batches: 0,
                    outcome: CycleOutcome::Abandoned(format!("ranked pages: {err}")),
                };
            }
        };

        let targets = enrichment_targets(&ranked, &self.host, &self.filter);
        board_debug!(
            "cycle {}: {} ranked pages, {} to enrich",
            seq,
            ranked.len(),
            targets.len()
        );

        let pagination = self
            .paginator
            .collect(self.enrichment.as_ref(), &targets, cancel)
            .await;
        let batches = pagination.batches_issued;
        let report = |outcome| CycleReport {
            seq,
            ranked: ranked.len(),
            batches,
            outcome,
        };

        match &pagination.outcome {
            PaginationOutcome::Cancelled => {
                return report(CycleOutcome::Abandoned("cancelled".to_string()));
            }
            PaginationOutcome::Halted(err) if pagination.records.is_empty() => {
                return report(CycleOutcome::Abandoned(format!("enrichment: {err}")));
            }
            PaginationOutcome::Halted(_) | PaginationOutcome::Complete => {}
        }

        let merged = join(&ranked, &pagination.records, &self.filter);
        board_info!(
            "cycle {}: {} merged from {} enrichment records ({} batches{})",
            seq,
            merged.len(),
            pagination.records.len(),
            batches,
            if pagination.is_complete() { "" } else { ", partial" }
        );
        if pagination.is_complete() {
            report(CycleOutcome::Merged(merged))
        } else {
            report(CycleOutcome::Partial(merged))
        }
    }
}

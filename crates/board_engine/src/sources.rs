use std::sync::Arc;

use board_core::{EnrichmentRecord, RankedPageRecord};
use board_logging::board_debug;
use serde::Deserialize;
use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::fetch::{parse_url, Fetcher};
use crate::{FailureKind, FetchError};

/// Source of the ranked page list.
#[async_trait::async_trait]
pub trait RankedPagesSource: Send + Sync {
    async fn fetch_ranked(&self) -> Result<Vec<RankedPageRecord>, FetchError>;
}

/// Source of preview metadata for absolute page URLs.
#[async_trait::async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Returns one record per returned entry, in response order.
    async fn fetch_batch(&self, urls: &[String]) -> Result<Vec<EnrichmentRecord>, FetchError>;
}

/// Ranked pages over HTTP: `GET {endpoint}?host=..&apikey=..&limit=..`.
pub struct HttpRankedSource {
    fetcher: Arc<dyn Fetcher>,
    url: Url,
}

impl HttpRankedSource {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        endpoint: &str,
        host: &str,
        api_key: &str,
        limit: usize,
    ) -> Result<Self, FetchError> {
        let mut url = parse_url(endpoint)?;
        url.query_pairs_mut()
            .append_pair("host", host)
            .append_pair("apikey", api_key)
            .append_pair("limit", &limit.to_string());
        Ok(Self { fetcher, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl RankedPagesSource for HttpRankedSource {
    async fn fetch_ranked(&self) -> Result<Vec<RankedPageRecord>, FetchError> {
        let output = self.fetcher.get(&self.url).await?;
        parse_ranked(&output.bytes)
    }
}

/// Preview metadata over HTTP: `GET {endpoint}?key=..&urls=a,b,c`.
pub struct HttpEnrichmentSource {
    fetcher: Arc<dyn Fetcher>,
    endpoint: Url,
    key: String,
}

impl HttpEnrichmentSource {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        endpoint: &str,
        key: impl Into<String>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher,
            endpoint: parse_url(endpoint)?,
            key: key.into(),
        })
    }

    /// Each URL is percent-encoded on its own; the separating commas stay literal.
    pub fn batch_url(&self, urls: &[String]) -> Url {
        let joined = urls
            .iter()
            .map(|url| form_urlencoded::byte_serialize(url.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join(",");
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(existing) = self.endpoint.query() {
            for (key, value) in form_urlencoded::parse(existing.as_bytes()) {
                query.append_pair(&key, &value);
            }
        }
        query.append_pair("key", &self.key);
        let query = format!("{}&urls={}", query.finish(), joined);

        let mut url = self.endpoint.clone();
        url.set_query(Some(&query));
        url
    }
}

#[async_trait::async_trait]
impl EnrichmentSource for HttpEnrichmentSource {
    async fn fetch_batch(&self, urls: &[String]) -> Result<Vec<EnrichmentRecord>, FetchError> {
        let url = self.batch_url(urls);
        let output = self.fetcher.get(&url).await?;
        parse_enrichment(&output.bytes)
    }
}

#[derive(Debug, Deserialize)]
struct RankedWire {
    path: Option<String>,
    visitors: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EnrichmentWire {
    url: Option<String>,
    title: Option<String>,
    thumbnail_url: Option<String>,
    html: Option<String>,
}

fn parse_array(bytes: &[u8]) -> Result<Vec<Value>, FetchError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::MalformedPayload, err.to_string()))?;
    match value {
        Value::Null => Err(FetchError::new(FailureKind::EmptyResponse, "null payload")),
        Value::Array(items) if items.is_empty() => {
            Err(FetchError::new(FailureKind::EmptyResponse, "empty list"))
        }
        Value::Array(items) => Ok(items),
        other => Err(FetchError::new(
            FailureKind::MalformedPayload,
            format!("expected a list, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Entries without a path or a visitor count are dropped.
pub fn parse_ranked(bytes: &[u8]) -> Result<Vec<RankedPageRecord>, FetchError> {
    let records = parse_array(bytes)?
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RankedWire>(item) {
            Ok(RankedWire {
                path: Some(path),
                visitors: Some(visitors),
            }) => Some(RankedPageRecord::new(path, visitors)),
            Ok(wire) => {
                board_debug!("ranked: dropping incomplete entry {:?}", wire);
                None
            }
            Err(err) => {
                board_debug!("ranked: dropping malformed entry: {}", err);
                None
            }
        })
        .collect();
    Ok(records)
}

/// Unreadable entries become unusable records so positions stay aligned.
pub fn parse_enrichment(bytes: &[u8]) -> Result<Vec<EnrichmentRecord>, FetchError> {
    let records = parse_array(bytes)?
        .into_iter()
        .map(|item| match serde_json::from_value::<EnrichmentWire>(item) {
            Ok(wire) => EnrichmentRecord {
                path: wire.url.unwrap_or_default(),
                title: wire.title.unwrap_or_default(),
                thumbnail_url: wire.thumbnail_url,
                embed_html: wire.html,
            },
            Err(err) => {
                board_debug!("enrichment: unusable entry: {}", err);
                EnrichmentRecord::unusable()
            }
        })
        .collect();
    Ok(records)
}

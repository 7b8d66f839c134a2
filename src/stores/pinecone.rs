//! Pinecone-compatible serverless vector index client.
//!
//! Two planes, like the service itself: the control plane
//! (`/indexes`) manages collections, the data plane (the per-index host
//! returned by the control plane) carries `upsert`/`query` traffic. The
//! credential is checked before any network call; readiness of a freshly
//! created index is polled with exponential backoff under a bounded
//! deadline, never an open-ended wait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::{Instant, sleep};
use url::Url;

use super::{IndexRecord, QueryMatch, VectorStore};
use crate::config::RagConfig;
use crate::types::RagError;

const API_KEY_HEADER: &str = "Api-Key";
const INITIAL_POLL_DELAY: Duration = Duration::from_millis(500);
const MAX_POLL_DELAY: Duration = Duration::from_secs(8);

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [IndexRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// Handle to one named index on a Pinecone-compatible store.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared and safe for
/// concurrent requests.
#[derive(Clone, Debug)]
pub struct PineconeStore {
    client: Client,
    api_key: String,
    host: Url,
}

impl PineconeStore {
    /// Connects to the configured index, creating it if it does not exist.
    ///
    /// Ensuring the index is idempotent: when an index with the configured
    /// name already exists its host is used as-is, without re-validating
    /// dimension or metric against the requested configuration. When it does
    /// not exist, a serverless index with the configured dimension and the
    /// cosine metric is created at the configured placement, and this call
    /// blocks until the store reports it ready or the readiness deadline
    /// passes ([`RagError::IndexUnavailable`]).
    pub async fn connect(config: &RagConfig, client: Client) -> Result<Self, RagError> {
        let api_key = config.require_api_key()?.to_string();
        let control = ControlPlane {
            client: client.clone(),
            base: config.control_url.clone(),
            api_key: api_key.clone(),
        };

        let host = match control.find_index(&config.index_name).await? {
            Some(description) => {
                tracing::debug!(index = %config.index_name, "index already exists");
                description.host
            }
            None => {
                tracing::info!(
                    index = %config.index_name,
                    dimension = config.embed_dim,
                    "creating vector index"
                );
                control.create_index(config).await?;
                control
                    .wait_until_ready(&config.index_name, config.index_ready_timeout)
                    .await?
            }
        };

        Ok(Self {
            client,
            api_key,
            host: parse_host(&host)?,
        })
    }

    fn data_request(&self, path: &str) -> Result<RequestBuilder, RagError> {
        let url = join_url(&self.host, path)?;
        Ok(self.client.post(url).header(API_KEY_HEADER, &self.api_key))
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), RagError> {
        if records.is_empty() {
            return Ok(());
        }
        let response = self
            .data_request("vectors/upsert")?
            .json(&UpsertRequest { vectors: &records })
            .send()
            .await
            .map_err(|err| RagError::IndexUnavailable(format!("upsert failed: {err}")))?;
        check_status(response, "upsert")?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, RagError> {
        let response = self
            .data_request("query")?
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|err| RagError::IndexUnavailable(format!("query failed: {err}")))?;
        let response = check_status(response, "query")?;
        let body: QueryResponse = response.json().await.map_err(|err| {
            RagError::IndexUnavailable(format!("undecodable query response: {err}"))
        })?;
        Ok(body.matches)
    }
}

struct ControlPlane {
    client: Client,
    base: Url,
    api_key: String,
}

impl ControlPlane {
    async fn find_index(&self, name: &str) -> Result<Option<IndexDescription>, RagError> {
        let url = join_url(&self.base, "indexes")?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|err| {
                RagError::IndexUnavailable(format!("cannot reach vector store control plane: {err}"))
            })?;
        let response = check_status(response, "listing indexes")?;
        let list: IndexList = response.json().await.map_err(|err| {
            RagError::IndexUnavailable(format!("undecodable index list: {err}"))
        })?;
        Ok(list.indexes.into_iter().find(|index| index.name == name))
    }

    async fn create_index(&self, config: &RagConfig) -> Result<(), RagError> {
        let url = join_url(&self.base, "indexes")?;
        let body = json!({
            "name": config.index_name,
            "dimension": config.embed_dim,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": config.placement.cloud,
                    "region": config.placement.region,
                }
            }
        });
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::IndexUnavailable(format!("index creation failed: {err}")))?;
        check_status(response, "index creation")?;
        Ok(())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription, RagError> {
        let url = join_url(&self.base, &format!("indexes/{name}"))?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|err| RagError::IndexUnavailable(format!("describe index failed: {err}")))?;
        let response = check_status(response, "describe index")?;
        response.json().await.map_err(|err| {
            RagError::IndexUnavailable(format!("undecodable index description: {err}"))
        })
    }

    /// Polls `describe_index` with exponential backoff until the index
    /// reports ready, returning its data-plane host.
    async fn wait_until_ready(&self, name: &str, deadline: Duration) -> Result<String, RagError> {
        let started = Instant::now();
        let mut delay = INITIAL_POLL_DELAY;
        loop {
            let description = self.describe_index(name).await?;
            if description.status.ready {
                return Ok(description.host);
            }
            if started.elapsed() + delay > deadline {
                return Err(RagError::IndexUnavailable(format!(
                    "index {name} not ready after {}s",
                    deadline.as_secs()
                )));
            }
            tracing::debug!(index = %name, ?delay, "index not ready yet");
            sleep(delay).await;
            delay = (delay * 2).min(MAX_POLL_DELAY);
        }
    }
}

fn check_status(response: Response, stage: &str) -> Result<Response, RagError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RagError::IndexUnavailable(format!(
            "{stage} returned status {status}"
        )))
    }
}

/// The control plane reports hosts without a scheme; default to https while
/// leaving explicit schemes (local test servers) untouched.
fn parse_host(host: &str) -> Result<Url, RagError> {
    if host.is_empty() {
        return Err(RagError::IndexUnavailable(
            "index description carried no host".to_string(),
        ));
    }
    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    Url::parse(&raw)
        .map_err(|err| RagError::IndexUnavailable(format!("invalid index host {host}: {err}")))
}

fn join_url(base: &Url, path: &str) -> Result<Url, RagError> {
    let mut raw = base.as_str().trim_end_matches('/').to_string();
    raw.push('/');
    raw.push_str(path);
    Url::parse(&raw)
        .map_err(|err| RagError::IndexUnavailable(format!("invalid store URL {raw}: {err}")))
}

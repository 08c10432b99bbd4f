//! HTTP adapter implementing [`MirrorPort`] against the mirror node REST
//! API.
//!
//! Request construction only: the adapter maps endpoint paths and filter
//! query strings, treats 404 as "absent" and retries 5xx responses with
//! exponential backoff. Network errors are sanitized before they reach logs
//! or callers.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::{fmt::Write as _, time::Duration};
use tracing::{debug, warn};

use super::{
    types::{
        BlocksPage, BlocksQuery, ContractResult, ContractResultLog, ContractResultsPage,
        ContractResultsQuery, EntityKind, LogsPage, LogsQuery, MirrorBlock, MirrorContract,
        NetworkFeesPage, ResolvedEntity, TimestampWindow,
    },
    MirrorPort, PortError,
};
use crate::config::MirrorConfig;

/// Page size for list endpoints; matches the mirror node's maximum.
const PAGE_LIMIT: u32 = 100;

/// Account record shape used only for entity resolution.
#[derive(Debug, Deserialize)]
struct MirrorAccount {
    account: String,
}

/// reqwest-backed mirror node client with connection pooling and bounded
/// retry.
pub struct MirrorHttpClient {
    http: Client,
    base_url: String,
    retries: u32,
}

impl MirrorHttpClient {
    /// Builds a client from the mirror configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Connection`] if the underlying HTTP client
    /// fails to build.
    pub fn new(config: &MirrorConfig) -> Result<Self, PortError> {
        let http = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(32)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                warn!(error = %e, "failed to build mirror http client");
                PortError::Connection(format!("mirror client build failed: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
        })
    }

    /// Collapses network errors to fixed descriptions so endpoint details
    /// never leak into responses.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_body() || error.is_decode() {
            "response body error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// GETs `path_and_query` and deserializes the JSON body.
    ///
    /// 404 maps to `Ok(None)`; 5xx responses are retried with exponential
    /// backoff before surfacing as [`PortError::Status`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Option<T>, PortError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let mut attempt = 0;

        loop {
            let result = self.http.get(&url).send().await;

            match result {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    debug!(path = path_and_query, "mirror returned not-found");
                    return Ok(None);
                }
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<T>()
                        .await
                        .map(Some)
                        .map_err(|e| PortError::InvalidResponse(Self::sanitize_network_error(&e)));
                }
                Ok(response) if response.status().is_server_error() && attempt < self.retries => {
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(100 * (1 << attempt))).await;
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    let body = if body.len() > 256 { format!("{}...", &body[..256]) } else { body };
                    warn!(path = path_and_query, status, "mirror request failed");
                    return Err(PortError::Status(status, body));
                }
                Err(e) if e.is_timeout() => return Err(PortError::Timeout),
                Err(_) if attempt < self.retries => {
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(100 * (1 << attempt))).await;
                }
                Err(e) => return Err(PortError::Connection(Self::sanitize_network_error(&e))),
            }
        }
    }

    fn append_timestamp_window(query_string: &mut String, window: &TimestampWindow) {
        if let Some(gte) = &window.gte {
            let _ = write!(query_string, "&timestamp=gte:{gte}");
        }
        if let Some(lte) = &window.lte {
            let _ = write!(query_string, "&timestamp=lte:{lte}");
        }
    }

    fn logs_query_string(query: &LogsQuery) -> String {
        let mut qs = format!("?limit={PAGE_LIMIT}&order=asc");
        if let Some(window) = &query.timestamp {
            Self::append_timestamp_window(&mut qs, window);
        }
        for (position, topic) in query.topics.iter().enumerate() {
            if let Some(topic) = topic {
                let _ = write!(qs, "&topic{position}={topic}");
            }
        }
        qs
    }
}

#[async_trait]
impl MirrorPort for MirrorHttpClient {
    async fn get_latest_block(&self) -> Result<BlocksPage, PortError> {
        let page = self.get_json::<BlocksPage>("/api/v1/blocks?limit=1&order=desc").await?;
        Ok(page.unwrap_or_default())
    }

    async fn get_block(&self, hash_or_number: &str) -> Result<Option<MirrorBlock>, PortError> {
        self.get_json(&format!("/api/v1/blocks/{hash_or_number}")).await
    }

    async fn get_blocks(&self, query: &BlocksQuery) -> Result<BlocksPage, PortError> {
        let mut qs = format!("?order={}", query.order.as_str());
        if let Some(gte) = query.gte {
            let _ = write!(qs, "&block.number=gte:{gte}");
        }
        if let Some(lte) = query.lte {
            let _ = write!(qs, "&block.number=lte:{lte}");
        }
        let _ = write!(qs, "&limit={}", query.limit.unwrap_or(PAGE_LIMIT));

        let page = self.get_json::<BlocksPage>(&format!("/api/v1/blocks{qs}")).await?;
        Ok(page.unwrap_or_default())
    }

    async fn get_contract_results(
        &self,
        query: &ContractResultsQuery,
    ) -> Result<Vec<ContractResult>, PortError> {
        let mut qs = format!("?limit={PAGE_LIMIT}&order=asc");
        if let Some(hash) = &query.block_hash {
            let _ = write!(qs, "&block.hash={hash}");
        }
        if let Some(number) = query.block_number {
            let _ = write!(qs, "&block.number={number}");
        }
        if let Some(index) = query.transaction_index {
            let _ = write!(qs, "&transaction.index={index}");
        }
        if let Some(window) = &query.timestamp {
            Self::append_timestamp_window(&mut qs, window);
        }

        let page =
            self.get_json::<ContractResultsPage>(&format!("/api/v1/contracts/results{qs}")).await?;
        Ok(page.map(|p| p.results).unwrap_or_default())
    }

    async fn get_contract_result(
        &self,
        transaction_hash: &str,
    ) -> Result<Option<ContractResult>, PortError> {
        self.get_json(&format!("/api/v1/contracts/results/{transaction_hash}")).await
    }

    async fn get_contract_results_by_address_and_timestamp(
        &self,
        address: &str,
        timestamp: &str,
    ) -> Result<Option<ContractResult>, PortError> {
        let page = self
            .get_json::<ContractResultsPage>(&format!(
                "/api/v1/contracts/{address}/results?timestamp={timestamp}"
            ))
            .await?;
        Ok(page.and_then(|p| p.results.into_iter().next()))
    }

    async fn get_contract_results_logs(
        &self,
        query: &LogsQuery,
    ) -> Result<Vec<ContractResultLog>, PortError> {
        let qs = Self::logs_query_string(query);
        let page = self.get_json::<LogsPage>(&format!("/api/v1/contracts/results/logs{qs}")).await?;
        Ok(page.map(|p| p.logs).unwrap_or_default())
    }

    async fn get_contract_results_logs_by_address(
        &self,
        address: &str,
        query: &LogsQuery,
    ) -> Result<Vec<ContractResultLog>, PortError> {
        let qs = Self::logs_query_string(query);
        let page = self
            .get_json::<LogsPage>(&format!("/api/v1/contracts/{address}/results/logs{qs}"))
            .await?;
        Ok(page.map(|p| p.logs).unwrap_or_default())
    }

    async fn get_contract_results_details(
        &self,
        contract_id: &str,
        timestamp: &str,
    ) -> Result<Option<ContractResult>, PortError> {
        self.get_json(&format!("/api/v1/contracts/{contract_id}/results/{timestamp}")).await
    }

    async fn get_network_fees(
        &self,
        timestamp: Option<&str>,
    ) -> Result<Option<NetworkFeesPage>, PortError> {
        let path = match timestamp {
            Some(ts) => format!("/api/v1/network/fees?timestamp=lte:{ts}"),
            None => "/api/v1/network/fees".to_string(),
        };
        self.get_json(&path).await
    }

    async fn get_contract(&self, address: &str) -> Result<Option<MirrorContract>, PortError> {
        self.get_json(&format!("/api/v1/contracts/{address}")).await
    }

    async fn resolve_entity_type(
        &self,
        id_or_address: &str,
    ) -> Result<Option<ResolvedEntity>, PortError> {
        if let Some(account) =
            self.get_json::<MirrorAccount>(&format!("/api/v1/accounts/{id_or_address}")).await?
        {
            return Ok(Some(ResolvedEntity { kind: EntityKind::Account, id: account.account }));
        }

        let contract = self
            .get_json::<MirrorContract>(&format!("/api/v1/contracts/{id_or_address}"))
            .await?
            .and_then(|c| c.contract_id);
        Ok(contract.map(|id| ResolvedEntity { kind: EntityKind::Contract, id }))
    }
}

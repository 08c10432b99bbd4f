//! The `eth_getLogs` query planner.
//!
//! The mirror indexes logs by consensus timestamp, not block number, so the
//! planner first translates the requested block window into a timestamp
//! window, then joins each raw log row with its contract-result detail to
//! recover canonical block/transaction identity. Detail fetches are
//! deduplicated by `(contract_id, timestamp)` and fanned out in parallel;
//! the join phase assigns positional `logIndex` values.

use futures::future::join_all;
use std::collections::HashMap;
use tracing::debug;

use super::{
    constants::EMPTY_HEX,
    errors::EthError,
    models::{Log, LogFilter},
    EthService,
};
use crate::{
    clients::types::{BlocksQuery, ContractResult, LogsQuery, SortOrder, TimestampWindow},
    types::RequestId,
    utils::{to_hash32, to_hex, to_hex_or_null},
};

impl EthService {
    /// `eth_getLogs`.
    ///
    /// Not-found conditions (unknown block hash, empty window, missing
    /// detail records) yield `[]`, never an error. Any other detail-fetch
    /// failure propagates; there is no partial success.
    pub async fn get_logs(
        &self,
        filter: LogFilter,
        request_id: &RequestId,
    ) -> Result<Vec<Log>, EthError> {
        let window = match self.translate_block_window(&filter).await? {
            WindowOutcome::Window(window) => Some(window),
            WindowOutcome::Unbounded => None,
            WindowOutcome::Empty => {
                debug!(request_id = %request_id, "log window resolves to nothing");
                return Ok(vec![]);
            }
        };

        let mut topics: [Option<String>; 4] = Default::default();
        if let Some(filter_topics) = &filter.topics {
            for (slot, topic) in filter_topics.iter().take(4).enumerate() {
                topics[slot] = topic.clone();
            }
        }
        let query = LogsQuery { timestamp: window, topics };

        let logs = match &filter.address {
            Some(address) => {
                self.mirror().get_contract_results_logs_by_address(address, &query).await?
            }
            None => self.mirror().get_contract_results_logs(&query).await?,
        };
        if logs.is_empty() {
            return Ok(vec![]);
        }

        // One detail fetch per distinct (contract_id, timestamp); the same
        // timestamp may back several logs and must share one fetch.
        let mut log_keys: Vec<(String, String)> = Vec::with_capacity(logs.len());
        for log in &logs {
            match (&log.contract_id, &log.timestamp) {
                (Some(contract_id), Some(timestamp)) => {
                    log_keys.push((contract_id.clone(), timestamp.clone()));
                }
                _ => {
                    debug!(request_id = %request_id, "log row lacks detail identity");
                    return Ok(vec![]);
                }
            }
        }

        let mut unique_keys: Vec<(String, String)> = Vec::new();
        for key in &log_keys {
            if !unique_keys.contains(key) {
                unique_keys.push(key.clone());
            }
        }

        debug!(
            request_id = %request_id,
            log_count = logs.len(),
            detail_fetches = unique_keys.len(),
            "joining logs with contract result details"
        );

        let fetches = unique_keys
            .iter()
            .cloned()
            .map(|(contract_id, timestamp)| async move {
                self.mirror().get_contract_results_details(&contract_id, &timestamp).await
            })
            .collect::<Vec<_>>();

        let mut details: HashMap<(String, String), ContractResult> = HashMap::new();
        for (key, outcome) in unique_keys.into_iter().zip(join_all(fetches).await) {
            match outcome {
                Ok(Some(detail)) => {
                    details.insert(key, detail);
                }
                Ok(None) => {
                    debug!(request_id = %request_id, "contract result detail not found");
                    return Ok(vec![]);
                }
                Err(e) if e.is_not_found() => return Ok(vec![]),
                Err(e) => return Err(e.into()),
            }
        }

        let mut output = Vec::with_capacity(logs.len());
        for ((log, key), position) in logs.iter().zip(&log_keys).zip(0u64..) {
            let Some(detail) = details.get(key) else {
                return Ok(vec![]);
            };
            output.push(Log {
                address: log.address.clone(),
                block_hash: to_hash32(detail.block_hash.as_deref().unwrap_or_default()),
                block_number: to_hex(detail.block_number.unwrap_or(0)),
                data: log.data.clone().unwrap_or_else(|| EMPTY_HEX.to_string()),
                log_index: to_hex(position),
                removed: false,
                topics: log.topics.clone(),
                transaction_hash: to_hash32(detail.hash.as_deref().unwrap_or_default()),
                transaction_index: to_hex_or_null(detail.transaction_index),
            });
        }
        Ok(output)
    }

    /// Translates the filter's block selection into a timestamp window.
    async fn translate_block_window(&self, filter: &LogFilter) -> Result<WindowOutcome, EthError> {
        if let Some(block_hash) = &filter.block_hash {
            return match self.mirror().get_block(block_hash).await {
                Ok(Some(block)) => Ok(WindowOutcome::Window(TimestampWindow {
                    gte: Some(block.timestamp.from),
                    lte: Some(block.timestamp.to),
                })),
                Ok(None) => Ok(WindowOutcome::Empty),
                Err(e) if e.is_not_found() => Ok(WindowOutcome::Empty),
                Err(e) => Err(e.into()),
            };
        }

        if filter.from_block.is_none() && filter.to_block.is_none() {
            return Ok(WindowOutcome::Unbounded);
        }

        // DESC when an upper bound exists puts the newest block first; the
        // window edges are read respecting the chosen order.
        let order = if filter.to_block.is_some() { SortOrder::Desc } else { SortOrder::Asc };
        let gte = match filter.from_block.as_deref() {
            Some(tag) => Some(self.resolve_block_tag(Some(tag)).await?),
            None => None,
        };
        let lte = match filter.to_block.as_deref() {
            Some(tag) => Some(self.resolve_block_tag(Some(tag)).await?),
            None => None,
        };

        let page = self.mirror().get_blocks(&BlocksQuery { gte, lte, order, limit: None }).await?;
        let (Some(first), Some(last)) = (page.blocks.first(), page.blocks.last()) else {
            return Ok(WindowOutcome::Empty);
        };

        let (from_ts, to_ts) = match order {
            SortOrder::Asc => (first.timestamp.from.clone(), last.timestamp.to.clone()),
            SortOrder::Desc => (last.timestamp.from.clone(), first.timestamp.to.clone()),
        };
        Ok(WindowOutcome::Window(TimestampWindow { gte: Some(from_ts), lte: Some(to_ts) }))
    }
}

enum WindowOutcome {
    /// A concrete timestamp window to filter by.
    Window(TimestampWindow),
    /// No block selection at all; query without timestamp filters.
    Unbounded,
    /// The selection matches nothing; the whole query yields `[]`.
    Empty,
}

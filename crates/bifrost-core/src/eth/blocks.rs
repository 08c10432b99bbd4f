//! Block-tag resolution and block assembly.
//!
//! A block selector is `null`, `"latest"`, `"pending"`, `"earliest"`, a
//! decimal or hex integer string, or a 32-byte hash. `"pending"` aliases
//! `"latest"`: the ledger exposes no pending pool here.

use futures::future::join_all;
use serde_json::json;
use tracing::debug;

use super::{
    constants::{
        EMPTY_ARRAY_KECCAK, EMPTY_BLOOM, EMPTY_HEX, EMPTY_TRIE_ROOT, ZERO_ADDRESS, ZERO_HEX,
        ZERO_HEX_32_BYTE, ZERO_HEX_8_BYTE,
    },
    errors::EthError,
    models::Block,
    transactions::transaction_from_contract_result,
    EthService,
};
use crate::{
    clients::types::{ContractResultsQuery, MirrorBlock, TimestampWindow},
    types::RequestId,
    utils::{to_hash32, to_hex},
};

impl EthService {
    /// `eth_blockNumber` — the highest indexed block as hex.
    ///
    /// # Errors
    ///
    /// Throws [`EthError::Internal`] when the mirror has no blocks at all:
    /// the return shape cannot express "absent".
    pub async fn block_number(&self, request_id: &RequestId) -> Result<String, EthError> {
        let number = self.latest_block_number().await?;
        debug!(request_id = %request_id, block_number = number, "resolved head block");
        Ok(to_hex(number))
    }

    pub(crate) async fn latest_block_number(&self) -> Result<u64, EthError> {
        let page = self.mirror().get_latest_block().await?;
        page.blocks
            .first()
            .map(|block| block.number)
            .ok_or_else(|| EthError::Internal("mirror node reports no blocks".to_string()))
    }

    /// Resolves a block selector to an integer block number.
    pub(crate) async fn resolve_block_tag(&self, tag: Option<&str>) -> Result<u64, EthError> {
        match tag {
            None | Some("latest") | Some("pending") => self.latest_block_number().await,
            Some("earliest") => Ok(0),
            Some(other) => parse_block_number(other),
        }
    }

    /// `eth_getBlockByHash`.
    pub async fn get_block_by_hash(
        &self,
        hash: &str,
        show_details: bool,
        request_id: &RequestId,
    ) -> Result<Option<Block>, EthError> {
        self.get_block(hash, show_details, request_id).await
    }

    /// `eth_getBlockByNumber`.
    pub async fn get_block_by_number(
        &self,
        tag: &str,
        show_details: bool,
        request_id: &RequestId,
    ) -> Result<Option<Block>, EthError> {
        self.get_block(tag, show_details, request_id).await
    }

    /// `eth_getBlockTransactionCountByHash` / `...ByNumber` — the mirror
    /// tracks the sealed transaction count directly.
    pub async fn get_block_transaction_count(
        &self,
        selector: &str,
        request_id: &RequestId,
    ) -> Result<Option<String>, EthError> {
        let block = self.fetch_mirror_block(selector).await?;
        debug!(request_id = %request_id, selector, found = block.is_some(), "block tx count lookup");
        Ok(block.map(|b| to_hex(b.count.unwrap_or(0))))
    }

    /// Resolves special tags to numbers, then lets the mirror disambiguate
    /// hash vs number selectors.
    async fn fetch_mirror_block(&self, selector: &str) -> Result<Option<MirrorBlock>, EthError> {
        let key = match selector {
            "latest" | "pending" => self.latest_block_number().await?.to_string(),
            "earliest" => "0".to_string(),
            other if looks_like_hash(other) => other.to_string(),
            other => parse_block_number(other)?.to_string(),
        };

        match self.mirror().get_block(&key).await {
            Ok(block) => Ok(block),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Two-stage block assembly: fetch the block, then fold the contract
    /// results inside its consensus-timestamp window.
    async fn get_block(
        &self,
        selector: &str,
        show_details: bool,
        request_id: &RequestId,
    ) -> Result<Option<Block>, EthError> {
        let Some(mirror_block) = self.fetch_mirror_block(selector).await? else {
            debug!(request_id = %request_id, selector, "block not found");
            return Ok(None);
        };

        let query = ContractResultsQuery {
            timestamp: Some(TimestampWindow {
                gte: Some(mirror_block.timestamp.from.clone()),
                lte: Some(mirror_block.timestamp.to.clone()),
            }),
            ..Default::default()
        };
        let results = self.mirror().get_contract_results(&query).await?;

        let mut gas_used_total: u64 = 0;
        let mut gas_limit_max: u64 = 0;
        let mut timestamp_secs: u64 = 0;
        for result in &results {
            gas_used_total += result.gas_used.unwrap_or(0);
            gas_limit_max = gas_limit_max.max(result.gas_limit.unwrap_or(0));
            if timestamp_secs == 0 {
                if let Some(ts) = &result.timestamp {
                    timestamp_secs = whole_seconds(ts);
                }
            }
        }

        // Transactions without a `to` are silently skipped; the rest are
        // materialized from their detail records, in query order.
        let detail_futures = results
            .iter()
            .filter_map(|result| match (&result.to, &result.timestamp) {
                (Some(to), Some(timestamp)) => Some((to.clone(), timestamp.clone())),
                _ => None,
            })
            .map(|(to, timestamp)| async move {
                self.mirror().get_contract_results_by_address_and_timestamp(&to, &timestamp).await
            })
            .collect::<Vec<_>>();

        let mut transactions = Vec::with_capacity(detail_futures.len());
        for outcome in join_all(detail_futures).await {
            match outcome {
                Ok(Some(detail)) => {
                    if let Some(tx) = transaction_from_contract_result(&detail) {
                        transactions.push(tx);
                    }
                }
                Ok(None) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        let base_fee_per_gas = self.gas_price(request_id).await?;

        let block_hash = to_hash32(&mirror_block.hash);
        let transactions_json: Vec<serde_json::Value> = if show_details {
            transactions.iter().map(|tx| json!(tx)).collect()
        } else {
            transactions.iter().map(|tx| json!(tx.hash)).collect()
        };
        let transactions_root = if transactions_json.is_empty() {
            EMPTY_TRIE_ROOT.to_string()
        } else {
            block_hash.clone()
        };

        debug!(
            request_id = %request_id,
            block_number = mirror_block.number,
            transaction_count = transactions_json.len(),
            gas_used = gas_used_total,
            "assembled block"
        );

        Ok(Some(Block {
            number: to_hex(mirror_block.number),
            hash: block_hash,
            parent_hash: to_hash32(&mirror_block.previous_hash),
            nonce: ZERO_HEX_8_BYTE.to_string(),
            sha3_uncles: EMPTY_ARRAY_KECCAK.to_string(),
            logs_bloom: EMPTY_BLOOM.to_string(),
            transactions_root,
            state_root: ZERO_HEX_32_BYTE.to_string(),
            receipts_root: ZERO_HEX_32_BYTE.to_string(),
            miner: ZERO_ADDRESS.to_string(),
            difficulty: ZERO_HEX.to_string(),
            mix_hash: ZERO_HEX_32_BYTE.to_string(),
            extra_data: EMPTY_HEX.to_string(),
            size: to_hex(mirror_block.size.unwrap_or(0)),
            gas_limit: to_hex(gas_limit_max),
            gas_used: to_hex(gas_used_total),
            timestamp: to_hex(timestamp_secs),
            base_fee_per_gas,
            transactions: transactions_json,
            uncles: vec![],
        }))
    }
}

/// A selector of 32 bytes or more is a hash; anything shorter is numeric.
fn looks_like_hash(selector: &str) -> bool {
    selector.trim_start_matches("0x").len() >= 64
}

/// Parses a numeric block selector, decimal or hex, `0x` prefix stripped
/// first.
fn parse_block_number(selector: &str) -> Result<u64, EthError> {
    let parsed = if let Some(hex) = selector.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        selector.parse().ok()
    };
    parsed.ok_or_else(|| EthError::InvalidParameter(format!("invalid block selector: {selector}")))
}

/// Whole-seconds portion of a `seconds.nanoseconds` consensus timestamp.
fn whole_seconds(timestamp: &str) -> u64 {
    timestamp.split('.').next().and_then(|s| s.parse().ok()).unwrap_or(0)
}

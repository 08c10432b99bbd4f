//! Fee and gas-price synthesis.
//!
//! The ledger prices execution in tinybars; everything emitted here is
//! scaled to weibars (× 10¹⁰) with `u128` arithmetic. `eth_feeHistory` is
//! synthesized block by block from point-in-time fee schedules since the
//! ledger keeps no base-fee series of its own.

use serde_json::json;
use tracing::{debug, warn};

use super::{
    constants::{
        CACHE_KEY_FEE_HISTORY, CACHE_KEY_GAS_PRICE, CACHE_TTL_ONE_HOUR, ETHEREUM_TRANSACTION_TYPE,
        FEE_HISTORY_GAS_USED_RATIO, TINYBAR_TO_WEIBAR, ZERO_HEX,
    },
    errors::EthError,
    models::FeeHistory,
    EthService,
};
use crate::{
    clients::types::NetworkFee,
    types::{MethodOutcome, RequestId, RpcErrorValue},
    utils::{parse_hex_u128, to_hex},
};

impl EthService {
    /// `eth_gasPrice` — current gas price in weibars, cached for one hour.
    pub async fn gas_price(&self, request_id: &RequestId) -> Result<String, EthError> {
        self.gas_price_weibars(request_id).await.map(to_hex)
    }

    pub(crate) async fn gas_price_weibars(&self, request_id: &RequestId) -> Result<u128, EthError> {
        if let Some(cached) = self.cache().get(CACHE_KEY_GAS_PRICE) {
            if let Some(weibars) = cached.as_str().and_then(parse_hex_u128) {
                return Ok(weibars);
            }
        }

        let weibars = self.get_fee_weibars("eth_gasPrice", None, request_id).await?;
        self.cache().set(CACHE_KEY_GAS_PRICE, json!(to_hex(weibars)), CACHE_TTL_ONE_HOUR);
        Ok(weibars)
    }

    /// The critical fee primitive: mirror fee schedule first (optionally at
    /// a point in time), consensus node as fallback, then the
    /// `EthereumTransaction` entry scaled tinybar → weibar.
    pub(crate) async fn get_fee_weibars(
        &self,
        caller_name: &str,
        timestamp: Option<&str>,
        request_id: &RequestId,
    ) -> Result<u128, EthError> {
        let fees = match self.mirror().get_network_fees(timestamp).await {
            Ok(Some(page)) if !page.fees.is_empty() => page.fees,
            Ok(_) => self.synthetic_fee_schedule(caller_name, request_id).await?,
            Err(e) => {
                debug!(
                    request_id = %request_id,
                    caller = caller_name,
                    error = %e,
                    "mirror fee schedule unavailable, falling back to consensus node"
                );
                self.synthetic_fee_schedule(caller_name, request_id).await?
            }
        };

        let entry = fees
            .iter()
            .find(|fee| fee.transaction_type == ETHEREUM_TRANSACTION_TYPE)
            .ok_or_else(|| {
                EthError::Internal(format!("no {ETHEREUM_TRANSACTION_TYPE} fee entry"))
            })?;

        Ok(u128::from(entry.gas) * TINYBAR_TO_WEIBAR)
    }

    /// One-element fee list synthesized from the consensus node gas fee.
    async fn synthetic_fee_schedule(
        &self,
        caller_name: &str,
        request_id: &RequestId,
    ) -> Result<Vec<NetworkFee>, EthError> {
        let tinybars = self.consensus().get_tinybar_gas_fee(caller_name).await?;
        debug!(request_id = %request_id, caller = caller_name, tinybars, "consensus gas fee");
        Ok(vec![NetworkFee {
            gas: tinybars,
            transaction_type: ETHEREUM_TRANSACTION_TYPE.to_string(),
        }])
    }

    /// `eth_feeHistory`.
    ///
    /// Never throws: unrecoverable failures collapse to the empty
    /// fee-history constant; a newest block beyond the head returns the
    /// `REQUEST_BEYOND_HEAD_BLOCK` error value.
    pub async fn fee_history(
        &self,
        block_count: u64,
        newest_block: &str,
        reward_percentiles: Option<Vec<f64>>,
        request_id: &RequestId,
    ) -> Result<MethodOutcome, EthError> {
        let outcome = self
            .fee_history_checked(block_count, newest_block, reward_percentiles, request_id)
            .await
            .unwrap_or_else(|e| {
                warn!(request_id = %request_id, error = %e, "fee history synthesis failed");
                MethodOutcome::value(json!({
                    "baseFeePerGas": [],
                    "gasUsedRatio": [],
                    "reward": [],
                    "oldestBlock": ZERO_HEX,
                }))
            });
        Ok(outcome)
    }

    async fn fee_history_checked(
        &self,
        block_count: u64,
        newest_block: &str,
        reward_percentiles: Option<Vec<f64>>,
        request_id: &RequestId,
    ) -> Result<MethodOutcome, EthError> {
        let latest = self.latest_block_number().await?;
        let newest = self.resolve_block_tag(Some(newest_block)).await?;
        if newest > latest {
            debug!(request_id = %request_id, newest, latest, "fee history beyond head");
            return Ok(MethodOutcome::error(RpcErrorValue::request_beyond_head_block(
                newest, latest,
            )));
        }

        let block_count = block_count.min(self.fee_history_max_results());
        if block_count == 0 {
            return Ok(MethodOutcome::value(json!({
                "gasUsedRatio": null,
                "oldestBlock": ZERO_HEX,
            })));
        }

        if let Some(cached) = self.cache().get(CACHE_KEY_FEE_HISTORY) {
            return Ok(MethodOutcome::value(cached));
        }

        let history = self
            .compute_fee_history(block_count, newest, latest, reward_percentiles, request_id)
            .await;
        let value = serde_json::to_value(&history)
            .map_err(|e| EthError::Internal(format!("fee history serialization: {e}")))?;
        self.cache().set(CACHE_KEY_FEE_HISTORY, value.clone(), CACHE_TTL_ONE_HOUR);
        Ok(MethodOutcome::value(value))
    }

    /// Per-block fetches run sequentially in ascending order: the output
    /// order must match and partial failures substitute `0x0` in position.
    async fn compute_fee_history(
        &self,
        block_count: u64,
        newest: u64,
        latest: u64,
        reward_percentiles: Option<Vec<f64>>,
        request_id: &RequestId,
    ) -> FeeHistory {
        let oldest = newest.saturating_sub(block_count - 1);

        let mut base_fee_per_gas = Vec::with_capacity(block_count as usize + 1);
        let mut gas_used_ratio = Vec::with_capacity(block_count as usize);
        for number in oldest..=newest {
            base_fee_per_gas.push(self.fee_at_block(number, request_id).await);
            gas_used_ratio.push(FEE_HISTORY_GAS_USED_RATIO);
        }

        // Ethereum convention requires one more fee than blocks. Block
        // production outpaces fee changes, so the next block's fee stands in
        // when it exists; otherwise the last entry repeats.
        let next_fee = if latest > newest {
            self.fee_at_block(newest + 1, request_id).await
        } else {
            base_fee_per_gas.last().cloned().unwrap_or_else(|| ZERO_HEX.to_string())
        };
        base_fee_per_gas.push(next_fee);

        let reward = reward_percentiles.filter(|p| !p.is_empty()).map(|percentiles| {
            vec![vec![ZERO_HEX.to_string(); percentiles.len()]; block_count as usize]
        });

        FeeHistory { base_fee_per_gas, gas_used_ratio, oldest_block: to_hex(oldest), reward }
    }

    /// Fee in effect at the close of one block; any failure yields `0x0`.
    async fn fee_at_block(&self, number: u64, request_id: &RequestId) -> String {
        let result: Result<String, EthError> = async {
            let block = self
                .mirror()
                .get_block(&number.to_string())
                .await
                .map_err(EthError::from)?
                .ok_or(EthError::Upstream(crate::clients::PortError::NotFound))?;
            self.get_fee_weibars("eth_feeHistory", Some(&block.timestamp.to), request_id)
                .await
                .map(to_hex)
        }
        .await;

        match result {
            Ok(fee) => fee,
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    block_number = number,
                    error = %e,
                    "fee lookup failed, substituting zero"
                );
                ZERO_HEX.to_string()
            }
        }
    }
}

//! Transaction and receipt assembly, plus the `eth_sendRawTransaction`
//! submission path.
//!
//! Everything read-side projects mirror contract results into Ethereum
//! shapes: hashes truncated to 66 characters, addresses to 42, the mirror's
//! `0x` sentinel canonicalized to absent.

use serde_json::json;
use sha3::{Digest, Keccak256};
use tracing::{debug, warn};

use super::{
    constants::{
        EMPTY_BLOOM, EMPTY_HEX, TINYBAR_TO_WEIBAR, ZERO_ADDRESS, ZERO_HEX, ZERO_HEX_32_BYTE,
    },
    errors::EthError,
    models::{Log, Receipt, Transaction},
    EthService,
};
use crate::{
    clients::{
        types::{ContractResult, ContractResultsQuery},
        PrecheckFailure,
    },
    types::{MethodOutcome, RequestId, RpcErrorValue},
    utils::{
        entity_id_to_evm_address, parse_hex_u128, prepend_0x, prune_0x, to_address, to_hash32,
        to_hex, to_hex_or_null, to_null_if_empty,
    },
};

/// Projects a mirror contract result into an Ethereum-shaped transaction.
///
/// Returns `None` when the record carries no transaction hash: the mirror
/// indexes some internal executions that have no Ethereum identity.
pub(crate) fn transaction_from_contract_result(result: &ContractResult) -> Option<Transaction> {
    let hash = result.hash.as_deref()?;

    Some(Transaction {
        block_hash: result.block_hash.as_deref().map(to_hash32),
        block_number: to_hex_or_null(result.block_number),
        chain_id: to_null_if_empty(result.chain_id.as_deref()),
        from: result.from.as_deref().map(to_address).unwrap_or_else(|| ZERO_ADDRESS.to_string()),
        gas: to_hex(result.gas_used.unwrap_or(0)),
        gas_price: to_null_if_empty(result.gas_price.as_deref()),
        hash: to_hash32(hash),
        input: result.function_parameters.clone().unwrap_or_else(|| EMPTY_HEX.to_string()),
        max_fee_per_gas: to_null_if_empty(result.max_fee_per_gas.as_deref()),
        max_priority_fee_per_gas: to_null_if_empty(result.max_priority_fee_per_gas.as_deref()),
        nonce: to_hex(result.nonce.unwrap_or(0)),
        r: result.r.as_deref().map(to_hash32).unwrap_or_else(|| ZERO_HEX.to_string()),
        s: result.s.as_deref().map(to_hash32).unwrap_or_else(|| ZERO_HEX.to_string()),
        to: result.to.as_deref().map(to_address),
        transaction_index: to_hex_or_null(result.transaction_index),
        tx_type: to_hex(result.tx_type.unwrap_or(0)),
        v: to_hex(result.v.unwrap_or(0)),
        value: to_hex(result.amount.unwrap_or(0)),
    })
}

/// The price the transaction actually paid, in weibars: `max_fee_per_gas`
/// when set and non-empty, the legacy `gas_price` otherwise, scaled × 10¹⁰.
fn effective_gas_price(result: &ContractResult) -> String {
    let tinybar_hex = match result.max_fee_per_gas.as_deref() {
        Some(fee) if fee != EMPTY_HEX && !fee.is_empty() => Some(fee),
        _ => result.gas_price.as_deref(),
    };
    let tinybars = tinybar_hex.and_then(parse_hex_u128).unwrap_or(0);
    to_hex(tinybars * TINYBAR_TO_WEIBAR)
}

/// Assembles a receipt from one contract result, pushing the enclosing
/// block/transaction identity into every log so clients that demand
/// per-log fields function.
fn receipt_from_contract_result(result: &ContractResult) -> Receipt {
    let block_hash = to_hash32(result.block_hash.as_deref().unwrap_or(ZERO_HEX_32_BYTE));
    let block_number = to_hex(result.block_number.unwrap_or(0));
    let transaction_hash = to_hash32(result.hash.as_deref().unwrap_or_default());
    let transaction_index = to_hex_or_null(result.transaction_index);

    let logs = result
        .logs
        .iter()
        .enumerate()
        .map(|(position, log)| Log {
            address: log.address.clone(),
            block_hash: block_hash.clone(),
            block_number: block_number.clone(),
            data: log.data.clone().unwrap_or_else(|| EMPTY_HEX.to_string()),
            log_index: to_hex(log.index.unwrap_or(position as u64)),
            removed: false,
            topics: log.topics.clone(),
            transaction_hash: transaction_hash.clone(),
            transaction_index: transaction_index.clone(),
        })
        .collect();

    Receipt {
        block_hash,
        block_number,
        contract_address: result
            .created_contract_ids
            .first()
            .and_then(|id| entity_id_to_evm_address(id)),
        cumulative_gas_used: to_hex(result.block_gas_used.unwrap_or(0)),
        effective_gas_price: effective_gas_price(result),
        from: result.from.as_deref().map(to_address).unwrap_or_else(|| ZERO_ADDRESS.to_string()),
        gas_used: to_hex(result.gas_used.unwrap_or(0)),
        logs,
        logs_bloom: result.bloom.clone().unwrap_or_else(|| EMPTY_BLOOM.to_string()),
        root: result.root.as_deref().map(to_hash32).unwrap_or_else(|| ZERO_HEX_32_BYTE.to_string()),
        status: result.status.clone().unwrap_or_else(|| ZERO_HEX.to_string()),
        to: result.to.as_deref().map(to_address),
        transaction_hash,
        transaction_index,
    }
}

impl EthService {
    /// `eth_getTransactionByHash`.
    pub async fn get_transaction_by_hash(
        &self,
        hash: &str,
        request_id: &RequestId,
    ) -> Result<Option<Transaction>, EthError> {
        let result = match self.mirror().get_contract_result(hash).await {
            Ok(result) => result,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        debug!(request_id = %request_id, hash, found = result.is_some(), "transaction lookup");
        Ok(result.as_ref().and_then(transaction_from_contract_result))
    }

    /// `eth_getTransactionByBlockHashAndIndex`.
    pub async fn get_transaction_by_block_hash_and_index(
        &self,
        block_hash: &str,
        index: u64,
        request_id: &RequestId,
    ) -> Result<Option<Transaction>, EthError> {
        let query = ContractResultsQuery {
            block_hash: Some(block_hash.to_string()),
            transaction_index: Some(index),
            ..Default::default()
        };
        self.transaction_from_results_query(query, request_id).await
    }

    /// `eth_getTransactionByBlockNumberAndIndex`.
    pub async fn get_transaction_by_block_number_and_index(
        &self,
        block_tag: &str,
        index: u64,
        request_id: &RequestId,
    ) -> Result<Option<Transaction>, EthError> {
        let block_number = self.resolve_block_tag(Some(block_tag)).await?;
        let query = ContractResultsQuery {
            block_number: Some(block_number),
            transaction_index: Some(index),
            ..Default::default()
        };
        self.transaction_from_results_query(query, request_id).await
    }

    /// The indexed row lacks fee/nonce/signature detail, so the first match
    /// is re-fetched through the address-and-timestamp lookup.
    async fn transaction_from_results_query(
        &self,
        query: ContractResultsQuery,
        request_id: &RequestId,
    ) -> Result<Option<Transaction>, EthError> {
        let results = self.mirror().get_contract_results(&query).await?;
        let Some(first) = results.first() else {
            return Ok(None);
        };
        let (Some(to), Some(timestamp)) = (&first.to, &first.timestamp) else {
            return Ok(None);
        };

        let detail = match self
            .mirror()
            .get_contract_results_by_address_and_timestamp(to, timestamp)
            .await
        {
            Ok(detail) => detail,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        debug!(request_id = %request_id, to, timestamp, found = detail.is_some(), "detail lookup");
        Ok(detail.as_ref().and_then(transaction_from_contract_result))
    }

    /// `eth_getTransactionReceipt`.
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
        request_id: &RequestId,
    ) -> Result<Option<Receipt>, EthError> {
        let result = match self.mirror().get_contract_result(hash).await {
            Ok(result) => result,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        debug!(request_id = %request_id, hash, found = result.is_some(), "receipt lookup");
        Ok(result.as_ref().map(receipt_from_contract_result))
    }

    /// `eth_sendRawTransaction` — pre-check, submit, then report the hash
    /// the ledger assigned (or a locally computed keccak when the record is
    /// unavailable but submission succeeded).
    pub async fn send_raw_transaction(
        &self,
        raw_transaction: &str,
        request_id: &RequestId,
    ) -> Result<MethodOutcome, EthError> {
        let gas_price = match self.gas_price_weibars(request_id).await {
            Ok(price) => price,
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "gas price unavailable for precheck");
                return Ok(MethodOutcome::error(RpcErrorValue::internal_error()));
            }
        };

        if let Err(failure) =
            self.precheck().send_raw_transaction_check(raw_transaction, gas_price, request_id).await
        {
            return Ok(match failure {
                PrecheckFailure::Rejected(error_value) => {
                    debug!(request_id = %request_id, code = error_value.code, "precheck rejected");
                    MethodOutcome::error(error_value)
                }
                PrecheckFailure::Internal(reason) => {
                    warn!(request_id = %request_id, reason, "precheck failed unexpectedly");
                    MethodOutcome::error(RpcErrorValue::internal_error())
                }
            });
        }

        let payload = hex::decode(prune_0x(raw_transaction)).map_err(|_| {
            EthError::InvalidParameter("invalid raw transaction hex".to_string())
        })?;

        let handle = match self
            .consensus()
            .submit_ethereum_transaction(&payload, "eth_sendRawTransaction")
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "transaction submission failed");
                return Ok(MethodOutcome::error(RpcErrorValue::internal_error()));
            }
        };

        let hash = match self
            .consensus()
            .execute_get_transaction_record(&handle, "EthereumTransaction", "eth_sendRawTransaction")
            .await
        {
            Ok(record) => match record.ethereum_hash {
                Some(hash) if !hash.is_empty() => prepend_0x(&hex::encode(hash)),
                _ => keccak256_hex(&payload),
            },
            Err(e) => {
                // Submission succeeded; the locally computed hash is the
                // best-effort answer.
                warn!(
                    request_id = %request_id,
                    transaction_id = %handle.transaction_id,
                    error = %e,
                    "record retrieval failed, returning computed hash"
                );
                keccak256_hex(&payload)
            }
        };

        Ok(MethodOutcome::value(json!(hash)))
    }
}

fn keccak256_hex(payload: &[u8]) -> String {
    prepend_0x(&hex::encode(Keccak256::digest(payload)))
}

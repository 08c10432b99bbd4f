//! The `eth_*` method dispatcher and its read/write translation engine.
//!
//! [`EthService`] owns the two backend ports, the pre-check collaborator and
//! the short-lived result cache, and exposes one handler per supported
//! Ethereum method plus a method-name [`dispatch`](EthService::dispatch)
//! entry for the enclosing transport.
//!
//! Handler modules:
//!
//! - [`blocks`](self): block-tag resolution, `eth_blockNumber`, two-stage
//!   `eth_getBlockBy*` assembly
//! - [`transactions`](self): transaction/receipt projection and
//!   `eth_sendRawTransaction`
//! - [`logs`](self): the `eth_getLogs` query planner
//! - [`fees`](self): `eth_gasPrice` and `eth_feeHistory` synthesis
//! - [`state`](self): balances, bytecode, nonces, `eth_call`,
//!   `eth_estimateGas`

pub mod constants;
pub mod errors;
pub mod models;

mod blocks;
mod fees;
mod logs;
mod state;
mod transactions;

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::{
    cache::ExpiringCache,
    clients::{ConsensusPort, MirrorPort, PrecheckPort},
    config::RelayConfig,
    eth::{
        constants::ZERO_HEX,
        models::{CallRequest, LogFilter},
    },
    types::{MethodOutcome, RequestId, RpcErrorValue},
};

pub use errors::EthError;

/// Methods that return the `UNSUPPORTED_METHOD` error value synchronously.
const UNSUPPORTED_METHODS: &[&str] = &[
    "eth_getStorageAt",
    "eth_sign",
    "eth_signTransaction",
    "eth_sendTransaction",
    "eth_submitHashrate",
    "eth_getWork",
    "eth_protocolVersion",
    "eth_coinbase",
];

/// The `eth_*` translation engine.
///
/// Thread-safe; handlers suspend only at port boundaries and commit cache
/// writes only after a complete result.
pub struct EthService {
    mirror: Arc<dyn MirrorPort>,
    consensus: Arc<dyn ConsensusPort>,
    precheck: Arc<dyn PrecheckPort>,
    cache: ExpiringCache,
    chain_id: String,
    fee_history_max_results: u64,
    shard: u64,
    realm: u64,
}

impl EthService {
    /// Creates the engine from its ports and the relay configuration.
    #[must_use]
    pub fn new(
        mirror: Arc<dyn MirrorPort>,
        consensus: Arc<dyn ConsensusPort>,
        precheck: Arc<dyn PrecheckPort>,
        config: &RelayConfig,
    ) -> Self {
        Self {
            mirror,
            consensus,
            precheck,
            cache: ExpiringCache::new(),
            chain_id: config.chain_id.to_lowercase(),
            fee_history_max_results: config.eth.fee_history_max_results,
            shard: config.eth.shard,
            realm: config.eth.realm,
        }
    }

    /// The configured chain id. Immutable after construction; answering
    /// requires no I/O.
    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub(crate) fn mirror(&self) -> &dyn MirrorPort {
        &*self.mirror
    }

    pub(crate) fn consensus(&self) -> &dyn ConsensusPort {
        &*self.consensus
    }

    pub(crate) fn precheck(&self) -> &dyn PrecheckPort {
        &*self.precheck
    }

    pub(crate) fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    pub(crate) fn fee_history_max_results(&self) -> u64 {
        self.fee_history_max_results
    }

    pub(crate) fn shard_realm(&self) -> (u64, u64) {
        (self.shard, self.realm)
    }

    /// Routes one `eth_*` request to its handler.
    ///
    /// Positional parameters are extracted from the JSON array the enclosing
    /// transport parsed. Unknown and deliberately unimplemented methods
    /// return the `UNSUPPORTED_METHOD` error value rather than an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`EthError`] for thrown failures: malformed parameters or
    /// backend trouble no handler default can absorb.
    pub async fn dispatch(
        &self,
        method: &str,
        params: &Value,
        request_id: &RequestId,
    ) -> Result<MethodOutcome, EthError> {
        debug!(request_id = %request_id, method, "dispatching request");

        match method {
            "eth_chainId" => Ok(MethodOutcome::value(json!(self.chain_id))),
            "eth_accounts" => Ok(MethodOutcome::value(json!([]))),
            "eth_mining" | "eth_syncing" | "eth_submitWork" => {
                Ok(MethodOutcome::value(json!(false)))
            }
            "eth_hashrate" | "eth_maxPriorityFeePerGas" => {
                Ok(MethodOutcome::value(json!(ZERO_HEX)))
            }
            "eth_getUncleByBlockHashAndIndex" | "eth_getUncleByBlockNumberAndIndex" => {
                Ok(MethodOutcome::value(Value::Null))
            }
            "eth_getUncleCountByBlockHash" | "eth_getUncleCountByBlockNumber" => {
                Ok(MethodOutcome::value(json!(ZERO_HEX)))
            }

            "eth_blockNumber" => {
                self.block_number(request_id).await.map(|n| MethodOutcome::value(json!(n)))
            }
            "eth_gasPrice" => {
                self.gas_price(request_id).await.map(|p| MethodOutcome::value(json!(p)))
            }
            "eth_feeHistory" => {
                let block_count = param(params, 0)
                    .and_then(parse_quantity)
                    .ok_or_else(|| invalid_param("blockCount"))?;
                let newest_block = param_str(params, 1).unwrap_or("latest");
                let percentiles: Option<Vec<f64>> = param(params, 2)
                    .filter(|v| !v.is_null())
                    .and_then(|v| serde_json::from_value(v.clone()).ok());
                self.fee_history(block_count, newest_block, percentiles, request_id).await
            }

            "eth_getBalance" => {
                let account = required_str(params, 0, "address")?;
                let tag = param_str(params, 1);
                self.get_balance(account, tag, request_id)
                    .await
                    .map(|b| MethodOutcome::value(json!(b)))
            }
            "eth_getCode" => {
                let address = required_str(params, 0, "address")?;
                let tag = param_str(params, 1);
                self.get_code(address, tag, request_id).await.map(|c| MethodOutcome::value(json!(c)))
            }
            "eth_getTransactionCount" => {
                let address = required_str(params, 0, "address")?;
                let tag = param_str(params, 1);
                self.get_transaction_count(address, tag, request_id).await
            }
            "eth_call" => {
                let call = call_request(params, 0)?;
                self.call(call, request_id).await.map(|r| MethodOutcome::value(json!(r)))
            }
            "eth_estimateGas" => {
                let call = call_request(params, 0).unwrap_or_default();
                Ok(MethodOutcome::value(json!(self.estimate_gas(&call))))
            }
            "eth_sendRawTransaction" => {
                let raw = required_str(params, 0, "transaction data")?;
                self.send_raw_transaction(raw, request_id).await
            }

            "eth_getBlockByHash" => {
                let hash = required_str(params, 0, "block hash")?;
                let show_details = param_bool(params, 1);
                self.get_block_by_hash(hash, show_details, request_id).await.map(opt_to_outcome)
            }
            "eth_getBlockByNumber" => {
                let tag = required_str(params, 0, "block number")?;
                let show_details = param_bool(params, 1);
                self.get_block_by_number(tag, show_details, request_id).await.map(opt_to_outcome)
            }
            "eth_getBlockTransactionCountByHash" => {
                let hash = required_str(params, 0, "block hash")?;
                self.get_block_transaction_count(hash, request_id).await.map(opt_to_outcome)
            }
            "eth_getBlockTransactionCountByNumber" => {
                let tag = required_str(params, 0, "block number")?;
                self.get_block_transaction_count(tag, request_id).await.map(opt_to_outcome)
            }

            "eth_getTransactionByHash" => {
                let hash = required_str(params, 0, "transaction hash")?;
                self.get_transaction_by_hash(hash, request_id).await.map(opt_to_outcome)
            }
            "eth_getTransactionByBlockHashAndIndex" => {
                let hash = required_str(params, 0, "block hash")?;
                let index = param(params, 1)
                    .and_then(parse_quantity)
                    .ok_or_else(|| invalid_param("transaction index"))?;
                self.get_transaction_by_block_hash_and_index(hash, index, request_id)
                    .await
                    .map(opt_to_outcome)
            }
            "eth_getTransactionByBlockNumberAndIndex" => {
                let tag = required_str(params, 0, "block number")?;
                let index = param(params, 1)
                    .and_then(parse_quantity)
                    .ok_or_else(|| invalid_param("transaction index"))?;
                self.get_transaction_by_block_number_and_index(tag, index, request_id)
                    .await
                    .map(opt_to_outcome)
            }
            "eth_getTransactionReceipt" => {
                let hash = required_str(params, 0, "transaction hash")?;
                self.get_transaction_receipt(hash, request_id).await.map(opt_to_outcome)
            }

            "eth_getLogs" => {
                let filter: LogFilter = match param(params, 0) {
                    Some(value) => serde_json::from_value(value.clone())
                        .map_err(|e| EthError::InvalidParameter(format!("invalid log filter: {e}")))?,
                    None => LogFilter::default(),
                };
                self.get_logs(filter, request_id)
                    .await
                    .map(|logs| MethodOutcome::from_serialize(&logs))
            }

            _ => {
                if !UNSUPPORTED_METHODS.contains(&method) {
                    debug!(request_id = %request_id, method, "unknown method");
                }
                Ok(MethodOutcome::error(RpcErrorValue::unsupported_method()))
            }
        }
    }
}

fn param<'a>(params: &'a Value, index: usize) -> Option<&'a Value> {
    params.as_array().and_then(|array| array.get(index))
}

fn param_str<'a>(params: &'a Value, index: usize) -> Option<&'a str> {
    param(params, index).and_then(Value::as_str)
}

fn param_bool(params: &Value, index: usize) -> bool {
    param(params, index).and_then(Value::as_bool).unwrap_or(false)
}

fn required_str<'a>(params: &'a Value, index: usize, name: &str) -> Result<&'a str, EthError> {
    param_str(params, index).ok_or_else(|| invalid_param(name))
}

fn invalid_param(name: &str) -> EthError {
    EthError::InvalidParameter(format!("missing or malformed parameter '{name}'"))
}

fn call_request(params: &Value, index: usize) -> Result<CallRequest, EthError> {
    let value = param(params, index).ok_or_else(|| invalid_param("call object"))?;
    serde_json::from_value(value.clone())
        .map_err(|e| EthError::InvalidParameter(format!("invalid call object: {e}")))
}

/// Accepts a JSON number or a decimal / `0x`-hex string quantity.
fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            if let Some(hex) = s.strip_prefix("0x") {
                u64::from_str_radix(hex, 16).ok()
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

fn opt_to_outcome<T: serde::Serialize>(value: Option<T>) -> MethodOutcome {
    match value {
        Some(v) => MethodOutcome::from_serialize(&v),
        None => MethodOutcome::value(Value::Null),
    }
}

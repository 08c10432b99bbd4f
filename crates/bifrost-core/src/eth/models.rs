//! Ethereum-shaped wire models emitted by the translation engine, plus the
//! request shapes it accepts.
//!
//! Output invariants enforced by construction: hashes are 66-character
//! `0x`-prefixed hex, addresses 42 characters, numeric fields minimal-length
//! lowercase hex (`0x0` for zero).

use serde::{Deserialize, Serialize};

/// An Ethereum-shaped block synthesized from mirror data.
///
/// Fields the ledger does not populate carry fixed values: zero difficulty,
/// zero mix hash and nonce, the empty-array keccak for `sha3Uncles`, zero
/// state/receipts roots and an empty uncle list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    pub nonce: String,
    pub sha3_uncles: String,
    pub logs_bloom: String,
    pub transactions_root: String,
    pub state_root: String,
    pub receipts_root: String,
    pub miner: String,
    pub difficulty: String,
    pub mix_hash: String,
    pub extra_data: String,
    pub size: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub base_fee_per_gas: String,
    /// Transaction hashes, or full [`Transaction`] objects when the caller
    /// requested details.
    pub transactions: Vec<serde_json::Value>,
    pub uncles: Vec<String>,
}

/// An Ethereum-shaped transaction projected from a mirror contract result.
///
/// `accessList` is always absent; the ledger has no access-list support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub block_hash: Option<String>,
    pub block_number: Option<String>,
    pub chain_id: Option<String>,
    pub from: String,
    pub gas: String,
    pub gas_price: Option<String>,
    pub hash: String,
    pub input: String,
    pub max_fee_per_gas: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub nonce: String,
    pub r: String,
    pub s: String,
    pub to: Option<String>,
    pub transaction_index: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub v: String,
    pub value: String,
}

/// An Ethereum-shaped log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: String,
    pub block_hash: String,
    pub block_number: String,
    pub data: String,
    pub log_index: String,
    /// The ledger never reorganizes; logs are never removed.
    pub removed: bool,
    pub topics: Vec<String>,
    pub transaction_hash: String,
    pub transaction_index: Option<String>,
}

/// An Ethereum-shaped transaction receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub block_hash: String,
    pub block_number: String,
    /// Present only when this transaction created a contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub cumulative_gas_used: String,
    pub effective_gas_price: String,
    pub from: String,
    pub gas_used: String,
    pub logs: Vec<Log>,
    pub logs_bloom: String,
    pub root: String,
    pub status: String,
    pub to: Option<String>,
    pub transaction_hash: String,
    pub transaction_index: Option<String>,
}

/// `eth_feeHistory` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHistory {
    pub base_fee_per_gas: Vec<String>,
    pub gas_used_ratio: Vec<f64>,
    pub oldest_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<Vec<Vec<String>>>,
}

/// `eth_call` / `eth_estimateGas` request object.
///
/// `gas` accepts both a JSON number and a hex string, matching what clients
/// actually send.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub gas: Option<serde_json::Value>,
    #[serde(default)]
    pub gas_price: Option<serde_json::Value>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<String>,
}

/// `eth_getLogs` filter object. Topics are positional, at most four slots.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub from_block: Option<String>,
    #[serde(default)]
    pub to_block: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<Option<String>>>,
}

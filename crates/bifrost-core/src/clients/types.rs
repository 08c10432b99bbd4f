//! Backend data model: mirror-node REST shapes, consensus-node records and
//! the query parameter types the handlers build.
//!
//! Mirror fields are deserialized as the REST service emits them
//! (snake_case, hex strings for fee quantities, `seconds.nanoseconds`
//! consensus timestamps).

use serde::{Deserialize, Serialize};

/// Consensus-timestamp range of a block, `seconds.nanoseconds` at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRange {
    pub from: String,
    pub to: String,
}

/// A block record as served by the mirror node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorBlock {
    pub number: u64,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: TimestampRange,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<u64>,
    /// Number of transactions sealed in this block.
    #[serde(default)]
    pub count: Option<u64>,
}

/// Paginated blocks response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlocksPage {
    #[serde(default)]
    pub blocks: Vec<MirrorBlock>,
}

/// One log entry attached to a contract result, or one row from the
/// contract-results logs endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResultLog {
    pub address: String,
    #[serde(default)]
    pub bloom: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Consensus timestamp of the enclosing result; present on the logs
    /// endpoints, absent on embedded receipt logs.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The mirror's record of a single EVM-style execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractResult {
    #[serde(default)]
    pub amount: Option<u128>,
    #[serde(default)]
    pub block_gas_used: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub bloom: Option<String>,
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub created_contract_ids: Vec<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub function_parameters: Option<String>,
    #[serde(default)]
    pub gas_limit: Option<u64>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub logs: Vec<ContractResultLog>,
    #[serde(default)]
    pub max_fee_per_gas: Option<String>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<String>,
    #[serde(default)]
    pub nonce: Option<u64>,
    #[serde(default)]
    pub r: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub transaction_index: Option<u64>,
    #[serde(default, rename = "type")]
    pub tx_type: Option<u64>,
    #[serde(default)]
    pub v: Option<u64>,
}

/// Paginated contract-results response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractResultsPage {
    #[serde(default)]
    pub results: Vec<ContractResult>,
}

/// Paginated logs response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsPage {
    #[serde(default)]
    pub logs: Vec<ContractResultLog>,
}

/// One fee schedule entry from the network-fees endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFee {
    /// Gas cost in tinybars.
    pub gas: u64,
    pub transaction_type: String,
}

/// Network fee schedule at a point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFeesPage {
    #[serde(default)]
    pub fees: Vec<NetworkFee>,
}

/// A contract record as served by the mirror node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorContract {
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub evm_address: Option<String>,
    #[serde(default)]
    pub runtime_bytecode: Option<String>,
}

/// Kind of ledger entity behind an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Contract,
}

/// Resolution of an address or id to its ledger entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub kind: EntityKind,
    /// Native entity id (`shard.realm.num`).
    pub id: String,
}

/// Sort order for paginated mirror queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Inclusive consensus-timestamp window, rendered as `gte:`/`lte:` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampWindow {
    pub gte: Option<String>,
    pub lte: Option<String>,
}

/// Filters for the blocks endpoint.
#[derive(Debug, Clone, Default)]
pub struct BlocksQuery {
    /// `block.number=gte:` filter.
    pub gte: Option<u64>,
    /// `block.number=lte:` filter.
    pub lte: Option<u64>,
    pub order: SortOrder,
    pub limit: Option<u32>,
}

/// Filters for the contract-results endpoint.
#[derive(Debug, Clone, Default)]
pub struct ContractResultsQuery {
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub timestamp: Option<TimestampWindow>,
}

/// Filters for the contract-results logs endpoints. Positional topics map
/// to `topic0..topic3` per Ethereum convention.
#[derive(Debug, Clone, Default)]
pub struct LogsQuery {
    pub timestamp: Option<TimestampWindow>,
    pub topics: [Option<String>; 4],
}

/// Account detail from the consensus node.
#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    /// Nonce of the account's Ethereum-transaction history.
    pub ethereum_nonce: u64,
}

/// Opaque handle to a submitted transaction, consumed by the record query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    pub transaction_id: String,
}

/// Execution record of a submitted transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    /// Keccak hash the ledger assigned to the wrapped Ethereum transaction.
    pub ethereum_hash: Option<Vec<u8>>,
}

//! Backend ports consumed by the translation engine.
//!
//! The engine talks to the ledger exclusively through three traits:
//!
//! - [`MirrorPort`]: read-side, idempotent REST queries against the mirror
//!   node indexer. A concrete [`MirrorHttpClient`] adapter is provided.
//! - [`ConsensusPort`]: read-and-write native-protocol client. The vendor
//!   SDK supplies the implementation; the trait is the contract.
//! - [`PrecheckPort`]: raw-transaction validation performed before
//!   submission, returning rich error values that pass through to clients
//!   unchanged.
//!
//! All ports are `Send + Sync` trait objects with their own internal
//! connection pooling; every call may suspend and carries the caller's
//! deadline.

pub mod errors;
pub mod mirror_http;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{RequestId, RpcErrorValue};
pub use errors::PortError;
pub use mirror_http::MirrorHttpClient;
use types::{
    AccountInfo, BlocksPage, BlocksQuery, ContractResult, ContractResultLog, ContractResultsQuery,
    LogsQuery, MirrorBlock, MirrorContract, NetworkFeesPage, ResolvedEntity, TransactionHandle,
    TransactionRecord,
};

/// Read-side port over the mirror node REST indexer.
#[async_trait]
pub trait MirrorPort: Send + Sync {
    /// Highest block currently indexed (single-element page, descending).
    async fn get_latest_block(&self) -> Result<BlocksPage, PortError>;

    /// Block by hash or number; the backend disambiguates the selector.
    async fn get_block(&self, hash_or_number: &str) -> Result<Option<MirrorBlock>, PortError>;

    /// Blocks matching number filters, in the requested order.
    async fn get_blocks(&self, query: &BlocksQuery) -> Result<BlocksPage, PortError>;

    /// Contract results filtered by block identifier, transaction index or
    /// timestamp window.
    async fn get_contract_results(
        &self,
        query: &ContractResultsQuery,
    ) -> Result<Vec<ContractResult>, PortError>;

    /// Contract result by transaction hash.
    async fn get_contract_result(
        &self,
        transaction_hash: &str,
    ) -> Result<Option<ContractResult>, PortError>;

    /// Detailed contract result for a contract address at an exact
    /// consensus timestamp.
    async fn get_contract_results_by_address_and_timestamp(
        &self,
        address: &str,
        timestamp: &str,
    ) -> Result<Option<ContractResult>, PortError>;

    /// Logs across all contracts matching the query.
    async fn get_contract_results_logs(
        &self,
        query: &LogsQuery,
    ) -> Result<Vec<ContractResultLog>, PortError>;

    /// Logs emitted by one contract address matching the query.
    async fn get_contract_results_logs_by_address(
        &self,
        address: &str,
        query: &LogsQuery,
    ) -> Result<Vec<ContractResultLog>, PortError>;

    /// Detailed contract result for a contract id at an exact consensus
    /// timestamp.
    async fn get_contract_results_details(
        &self,
        contract_id: &str,
        timestamp: &str,
    ) -> Result<Option<ContractResult>, PortError>;

    /// Network fee schedule, optionally at a point in time
    /// (`lte:<consensus-timestamp>`).
    async fn get_network_fees(
        &self,
        timestamp: Option<&str>,
    ) -> Result<Option<NetworkFeesPage>, PortError>;

    /// Contract record (runtime bytecode) by address or id.
    async fn get_contract(&self, address: &str) -> Result<Option<MirrorContract>, PortError>;

    /// Resolves an address or id to its ledger entity kind.
    async fn resolve_entity_type(
        &self,
        id_or_address: &str,
    ) -> Result<Option<ResolvedEntity>, PortError>;
}

/// Read-and-write port over the consensus node.
///
/// `caller_name` identifies the originating `eth_*` method for backend-side
/// fee attribution and logging.
#[async_trait]
pub trait ConsensusPort: Send + Sync {
    /// Current gas cost in tinybars, used when the mirror fee schedule is
    /// unavailable.
    async fn get_tinybar_gas_fee(&self, caller_name: &str) -> Result<u64, PortError>;

    async fn get_account_balance_in_weibar(
        &self,
        account: &str,
        caller_name: &str,
    ) -> Result<u128, PortError>;

    async fn get_contract_balance_in_weibar(
        &self,
        contract: &str,
        caller_name: &str,
    ) -> Result<u128, PortError>;

    async fn get_contract_bytecode(
        &self,
        shard: u64,
        realm: u64,
        address: &str,
        caller_name: &str,
    ) -> Result<Vec<u8>, PortError>;

    async fn get_account_info(
        &self,
        account: &str,
        caller_name: &str,
    ) -> Result<AccountInfo, PortError>;

    /// Submits a raw Ethereum transaction wrapped in a native transaction.
    async fn submit_ethereum_transaction(
        &self,
        payload: &[u8],
        caller_name: &str,
    ) -> Result<TransactionHandle, PortError>;

    /// Fetches the execution record for a previously submitted transaction.
    async fn execute_get_transaction_record(
        &self,
        handle: &TransactionHandle,
        transaction_name: &str,
        caller_name: &str,
    ) -> Result<TransactionRecord, PortError>;

    /// Executes a read-only contract call (view call) and returns the raw
    /// result bytes.
    async fn submit_contract_call_query(
        &self,
        to: &str,
        data: &[u8],
        gas: u64,
        from: Option<&str>,
        caller_name: &str,
    ) -> Result<Vec<u8>, PortError>;
}

/// Outcome of a failed pre-submission check.
#[derive(Debug, Clone, Error)]
pub enum PrecheckFailure {
    /// Known rejection (nonce, chain id, gas price, intrinsic gas, value
    /// validation); the carried error value passes through to the client
    /// unchanged.
    #[error("precheck rejected: {0}")]
    Rejected(RpcErrorValue),

    /// Anything else; mapped to `INTERNAL_ERROR` by the caller.
    #[error("precheck failed: {0}")]
    Internal(String),
}

/// Raw-transaction validation performed before consensus submission.
#[async_trait]
pub trait PrecheckPort: Send + Sync {
    /// Validates a raw transaction against the current gas price. `Ok(())`
    /// clears the transaction for submission.
    async fn send_raw_transaction_check(
        &self,
        raw_transaction: &str,
        gas_price: u128,
        request_id: &RequestId,
    ) -> Result<(), PrecheckFailure>;
}

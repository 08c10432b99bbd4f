//! Account and contract state reads: balances, bytecode, nonces, view calls
//! and gas estimation.
//!
//! Negative results are cached: an account or contract the consensus node
//! rejects as unknown is remembered as `0x0` / `0x` for one hour to absorb
//! probing clients. A real account appearing later inside the TTL window
//! keeps serving the cached sentinel until expiry.

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    constants::{CACHE_TTL_ONE_HOUR, EMPTY_HEX, ONE_HEX, TX_BASE_COST, TX_DEFAULT_GAS, ZERO_HEX},
    errors::EthError,
    models::CallRequest,
    EthService,
};
use crate::{
    clients::{types::EntityKind, PortError},
    types::{MethodOutcome, RequestId, RpcErrorValue},
    utils::{prepend_0x, prune_0x, to_hex},
};

impl EthService {
    /// `eth_getBalance` — weibar balance from the consensus node, routed by
    /// the mirror's entity resolution.
    pub async fn get_balance(
        &self,
        account: &str,
        block_tag: Option<&str>,
        request_id: &RequestId,
    ) -> Result<String, EthError> {
        let tag = block_tag.unwrap_or("latest");
        let cache_key = format!("getBalance.{account}.{tag}");
        if let Some(cached) = self.cache().get(&cache_key) {
            if let Some(balance) = cached.as_str() {
                return Ok(balance.to_string());
            }
        }

        // An unresolvable entity falls through to the account path so the
        // invalid-id mapping owns the failure.
        let entity = match self.mirror().resolve_entity_type(account).await {
            Ok(entity) => entity,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        let balance = match &entity {
            Some(resolved) if resolved.kind == EntityKind::Contract => {
                self.consensus().get_contract_balance_in_weibar(&resolved.id, "eth_getBalance").await
            }
            Some(resolved) => {
                self.consensus().get_account_balance_in_weibar(&resolved.id, "eth_getBalance").await
            }
            None => self.consensus().get_account_balance_in_weibar(account, "eth_getBalance").await,
        };

        match balance {
            Ok(weibars) => Ok(to_hex(weibars)),
            Err(PortError::InvalidAccountId(_) | PortError::InvalidContractId(_)) => {
                debug!(request_id = %request_id, account, "unknown entity, caching zero balance");
                self.cache().set(cache_key, json!(ZERO_HEX), CACHE_TTL_ONE_HOUR);
                Ok(ZERO_HEX.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `eth_getCode` — runtime bytecode from the mirror when indexed, the
    /// consensus node otherwise.
    pub async fn get_code(
        &self,
        address: &str,
        block_tag: Option<&str>,
        request_id: &RequestId,
    ) -> Result<String, EthError> {
        let tag = block_tag.unwrap_or("latest");
        let cache_key = format!("getCode.{address}.{tag}");
        if let Some(cached) = self.cache().get(&cache_key) {
            if let Some(code) = cached.as_str() {
                return Ok(code.to_string());
            }
        }

        let contract = match self.mirror().get_contract(address).await {
            Ok(contract) => contract,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        if let Some(bytecode) =
            contract.and_then(|c| c.runtime_bytecode).filter(|b| b != EMPTY_HEX)
        {
            return Ok(bytecode);
        }

        let (shard, realm) = self.shard_realm();
        match self.consensus().get_contract_bytecode(shard, realm, address, "eth_getCode").await {
            Ok(bytecode) => Ok(prepend_0x(&hex::encode(bytecode))),
            Err(PortError::InvalidContractId(_)) => {
                debug!(request_id = %request_id, address, "unknown contract, caching empty code");
                self.cache().set(cache_key, json!(EMPTY_HEX), CACHE_TTL_ONE_HOUR);
                Ok(EMPTY_HEX.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `eth_getTransactionCount` — accounts report their Ethereum nonce,
    /// contracts the literal `0x1`, unknown entities `0x0`. Any failure
    /// collapses to the `INTERNAL_ERROR` value.
    pub async fn get_transaction_count(
        &self,
        address: &str,
        block_tag: Option<&str>,
        request_id: &RequestId,
    ) -> Result<MethodOutcome, EthError> {
        match self.transaction_count(address, block_tag).await {
            Ok(count) => Ok(MethodOutcome::value(json!(count))),
            Err(e) => {
                warn!(request_id = %request_id, address, error = %e, "transaction count failed");
                Ok(MethodOutcome::error(RpcErrorValue::internal_error()))
            }
        }
    }

    async fn transaction_count(
        &self,
        address: &str,
        block_tag: Option<&str>,
    ) -> Result<String, EthError> {
        let block_number = self.resolve_block_tag(block_tag).await?;
        if block_number == 0 {
            return Ok(ZERO_HEX.to_string());
        }

        let entity = match self.mirror().resolve_entity_type(address).await {
            Ok(entity) => entity,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        match entity {
            Some(resolved) if resolved.kind == EntityKind::Account => {
                let info = self
                    .consensus()
                    .get_account_info(&resolved.id, "eth_getTransactionCount")
                    .await?;
                Ok(to_hex(info.ethereum_nonce))
            }
            Some(_) => Ok(ONE_HEX.to_string()),
            None => Ok(ZERO_HEX.to_string()),
        }
    }

    /// `eth_call` — read-only view call through the consensus node.
    ///
    /// # Errors
    ///
    /// Throws [`EthError::InvalidParameter`] when `to` is not a 42-character
    /// address or the payload is not valid hex.
    pub async fn call(
        &self,
        call: CallRequest,
        request_id: &RequestId,
    ) -> Result<String, EthError> {
        let to = call.to.as_deref().unwrap_or_default();
        if to.len() != 42 {
            return Err(EthError::InvalidParameter(format!(
                "invalid 'to' address length: {} (expected 42)",
                to.len()
            )));
        }

        let gas = parse_gas(call.gas.as_ref())?;
        let data = call.data.as_deref().unwrap_or(EMPTY_HEX);
        let payload = hex::decode(prune_0x(data))
            .map_err(|_| EthError::InvalidParameter("invalid call data hex".to_string()))?;

        debug!(request_id = %request_id, to, gas, data_len = payload.len(), "executing view call");
        let result = self
            .consensus()
            .submit_contract_call_query(to, &payload, gas, call.from.as_deref(), "eth_call")
            .await?;
        Ok(prepend_0x(&hex::encode(result)))
    }

    /// `eth_estimateGas` — a fixed schedule: base transfer cost without
    /// calldata, the default contract-interaction gas otherwise.
    #[must_use]
    pub fn estimate_gas(&self, call: &CallRequest) -> String {
        match call.data.as_deref() {
            None | Some(EMPTY_HEX) | Some("") => to_hex(TX_BASE_COST),
            Some(_) => to_hex(TX_DEFAULT_GAS),
        }
    }
}

/// Gas accepts a JSON number or hex string; absent defaults to the
/// contract-interaction gas.
fn parse_gas(gas: Option<&Value>) -> Result<u64, EthError> {
    match gas {
        None | Some(Value::Null) => Ok(TX_DEFAULT_GAS),
        Some(Value::Number(n)) => {
            n.as_u64().ok_or_else(|| EthError::InvalidParameter("invalid gas value".to_string()))
        }
        Some(Value::String(s)) => {
            let digits = prune_0x(s);
            u64::from_str_radix(digits, 16)
                .map_err(|_| EthError::InvalidParameter(format!("invalid gas value: {s}")))
        }
        Some(_) => Err(EthError::InvalidParameter("invalid gas value".to_string())),
    }
}

//! State reads: balances, bytecode, nonces, view calls and the
//! negative-result caches.

use serde_json::json;

use crate::mock_ports::{relay, rid, MockConsensus, MockMirror, MockPrecheck};
use bifrost_core::{
    clients::types::{AccountInfo, EntityKind, MirrorContract, ResolvedEntity},
    clients::PortError,
    eth::models::CallRequest,
    utils::to_hex,
};

const ACCOUNT: &str = "0x00000000000000000000000000000000000004d2";

fn account_entity() -> ResolvedEntity {
    ResolvedEntity { kind: EntityKind::Account, id: "0.0.1234".to_string() }
}

fn contract_entity() -> ResolvedEntity {
    ResolvedEntity { kind: EntityKind::Contract, id: "0.0.1234".to_string() }
}

#[tokio::test]
async fn test_get_balance_for_account() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), account_entity());
    let consensus = MockConsensus::default();
    *consensus.account_balance.lock().unwrap() = Some(Ok(5_000_000_000_000_000_000));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    let balance = relay.eth.get_balance(ACCOUNT, None, &rid()).await.unwrap();
    assert_eq!(balance, to_hex(5_000_000_000_000_000_000u128));
}

#[tokio::test]
async fn test_get_balance_for_contract() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), contract_entity());
    let consensus = MockConsensus::default();
    *consensus.contract_balance.lock().unwrap() = Some(Ok(42));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    let balance = relay.eth.get_balance(ACCOUNT, Some("latest"), &rid()).await.unwrap();
    assert_eq!(balance, "0x2a");
}

#[tokio::test]
async fn test_get_balance_unknown_entity_takes_account_path() {
    let consensus = MockConsensus::default();
    *consensus.account_balance.lock().unwrap() = Some(Ok(7));
    let relay = relay(MockMirror::default(), consensus, MockPrecheck::default());

    let balance = relay.eth.get_balance(ACCOUNT, None, &rid()).await.unwrap();
    assert_eq!(balance, "0x7");
}

#[tokio::test]
async fn test_get_balance_invalid_account_cached_as_zero() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), account_entity());
    let consensus = MockConsensus::default();
    *consensus.account_balance.lock().unwrap() =
        Some(Err(PortError::InvalidAccountId("0.0.1234".to_string())));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    let first = relay.eth.get_balance(ACCOUNT, Some("latest"), &rid()).await.unwrap();
    assert_eq!(first, "0x0");

    let mirror_calls = relay.mirror.call_count();
    let consensus_calls = relay.consensus.call_count();

    // Second call inside the TTL: served from cache, zero backend calls
    let second = relay.eth.get_balance(ACCOUNT, Some("latest"), &rid()).await.unwrap();
    assert_eq!(second, "0x0");
    assert_eq!(relay.mirror.call_count(), mirror_calls);
    assert_eq!(relay.consensus.call_count(), consensus_calls);
}

#[tokio::test]
async fn test_get_balance_propagates_infrastructure_failures() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), account_entity());
    let consensus = MockConsensus::default();
    *consensus.account_balance.lock().unwrap() = Some(Err(PortError::Timeout));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    assert!(relay.eth.get_balance(ACCOUNT, None, &rid()).await.is_err());
}

#[tokio::test]
async fn test_get_code_from_mirror_runtime_bytecode() {
    let mirror = MockMirror::default();
    mirror.contracts.lock().unwrap().insert(
        ACCOUNT.to_string(),
        MirrorContract {
            contract_id: Some("0.0.1234".to_string()),
            evm_address: Some(ACCOUNT.to_string()),
            runtime_bytecode: Some("0x6080604052".to_string()),
        },
    );
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let code = relay.eth.get_code(ACCOUNT, None, &rid()).await.unwrap();
    assert_eq!(code, "0x6080604052");
    assert_eq!(relay.consensus.call_count(), 0);
}

#[tokio::test]
async fn test_get_code_empty_mirror_bytecode_falls_back_to_consensus() {
    let mirror = MockMirror::default();
    mirror.contracts.lock().unwrap().insert(
        ACCOUNT.to_string(),
        MirrorContract {
            contract_id: Some("0.0.1234".to_string()),
            evm_address: None,
            runtime_bytecode: Some("0x".to_string()),
        },
    );
    let consensus = MockConsensus::default();
    *consensus.bytecode.lock().unwrap() = Some(Ok(vec![0x60, 0x80]));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    let code = relay.eth.get_code(ACCOUNT, None, &rid()).await.unwrap();
    assert_eq!(code, "0x6080");
}

#[tokio::test]
async fn test_get_code_invalid_contract_cached_as_empty() {
    let consensus = MockConsensus::default();
    *consensus.bytecode.lock().unwrap() =
        Some(Err(PortError::InvalidContractId("0.0.1234".to_string())));
    let relay = relay(MockMirror::default(), consensus, MockPrecheck::default());

    let first = relay.eth.get_code(ACCOUNT, Some("latest"), &rid()).await.unwrap();
    assert_eq!(first, "0x");

    let mirror_calls = relay.mirror.call_count();
    let consensus_calls = relay.consensus.call_count();

    let second = relay.eth.get_code(ACCOUNT, Some("latest"), &rid()).await.unwrap();
    assert_eq!(second, "0x");
    assert_eq!(relay.mirror.call_count(), mirror_calls);
    assert_eq!(relay.consensus.call_count(), consensus_calls);
}

#[tokio::test]
async fn test_transaction_count_at_genesis_is_zero() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("0x0"), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x0")));

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("earliest"), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x0")));
}

#[tokio::test]
async fn test_transaction_count_for_account_reads_ethereum_nonce() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), account_entity());
    let consensus = MockConsensus::default();
    *consensus.account_info.lock().unwrap() = Some(Ok(AccountInfo { ethereum_nonce: 7 }));
    let relay = relay(mirror, consensus, MockPrecheck::default());

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("0x5"), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x7")));
}

#[tokio::test]
async fn test_transaction_count_for_contract_is_literal_one() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), contract_entity());
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("0x5"), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x1")));
}

#[tokio::test]
async fn test_transaction_count_unknown_entity_is_zero() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("0x5"), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x0")));
}

#[tokio::test]
async fn test_transaction_count_failure_maps_to_internal_error_value() {
    let mirror = MockMirror::default();
    mirror.entities.lock().unwrap().insert(ACCOUNT.to_string(), account_entity());
    // account_info left unconfigured: the mock fails the call
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let outcome = relay.eth.get_transaction_count(ACCOUNT, Some("0x5"), &rid()).await.unwrap();
    assert_eq!(outcome.as_error().unwrap().code, -32603);
}

#[tokio::test]
async fn test_call_rejects_malformed_to_address() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let call = CallRequest { to: Some("0xabc".to_string()), data: Some("0x00".to_string()), ..Default::default() };
    let err = relay.eth.call(call, &rid()).await.unwrap_err();
    assert_eq!(err.rpc_code(), -32602);
    assert_eq!(relay.consensus.call_count(), 0);
}

#[tokio::test]
async fn test_call_defaults_gas_and_encodes_result() {
    let consensus = MockConsensus::default();
    *consensus.call_response.lock().unwrap() = Some(Ok(vec![0x00, 0xab]));
    let relay = relay(MockMirror::default(), consensus, MockPrecheck::default());

    let call = CallRequest { to: Some(ACCOUNT.to_string()), data: Some("0x1234".to_string()), ..Default::default() };
    let result = relay.eth.call(call, &rid()).await.unwrap();

    assert_eq!(result, "0x00ab");
    assert_eq!(
        relay.consensus.last_call_gas.load(std::sync::atomic::Ordering::SeqCst),
        400_000,
        "absent gas defaults to 400k",
    );
}

#[tokio::test]
async fn test_call_accepts_hex_and_numeric_gas() {
    let consensus = MockConsensus::default();
    *consensus.call_response.lock().unwrap() = Some(Ok(vec![]));
    let relay = relay(MockMirror::default(), consensus, MockPrecheck::default());

    let call = CallRequest {
        to: Some(ACCOUNT.to_string()),
        gas: Some(json!("0x7530")),
        ..Default::default()
    };
    relay.eth.call(call, &rid()).await.unwrap();
    assert_eq!(relay.consensus.last_call_gas.load(std::sync::atomic::Ordering::SeqCst), 30_000);

    let call =
        CallRequest { to: Some(ACCOUNT.to_string()), gas: Some(json!(25_000)), ..Default::default() };
    relay.eth.call(call, &rid()).await.unwrap();
    assert_eq!(relay.consensus.last_call_gas.load(std::sync::atomic::Ordering::SeqCst), 25_000);
}

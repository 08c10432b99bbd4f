//! Block-tag resolution and two-stage block assembly.

use serde_json::json;

use crate::mock_ports::{mirror_block, relay, rid, MockConsensus, MockMirror, MockPrecheck};
use bifrost_core::clients::types::ContractResult;

const EMPTY_TRIE_ROOT: &str =
    "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421";

fn execution(to: Option<&str>, gas_used: u64, gas_limit: u64, timestamp: &str) -> ContractResult {
    ContractResult {
        hash: Some(format!("0x{}", "ab".repeat(48))),
        to: to.map(str::to_string),
        gas_used: Some(gas_used),
        gas_limit: Some(gas_limit),
        timestamp: Some(timestamp.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_block_number_reads_head() {
    let relay = relay(
        MockMirror::default().with_latest(42),
        MockConsensus::default(),
        MockPrecheck::default(),
    );
    assert_eq!(relay.eth.block_number(&rid()).await.unwrap(), "0x2a");
}

#[tokio::test]
async fn test_block_number_throws_when_chain_is_empty() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());
    assert!(relay.eth.block_number(&rid()).await.is_err());
}

#[tokio::test]
async fn test_get_block_not_found_is_null() {
    let relay = relay(
        MockMirror::default().with_latest(5).with_fees(71),
        MockConsensus::default(),
        MockPrecheck::default(),
    );

    let block = relay.eth.get_block_by_number("0x99", false, &rid()).await.unwrap();
    assert!(block.is_none());
}

#[tokio::test]
async fn test_empty_block_carries_empty_trie_root() {
    let relay = relay(
        MockMirror::default().with_latest(5).with_fees(71),
        MockConsensus::default(),
        MockPrecheck::default(),
    );

    let block = relay.eth.get_block_by_number("latest", false, &rid()).await.unwrap().unwrap();

    assert!(block.transactions.is_empty());
    assert_eq!(block.transactions_root, EMPTY_TRIE_ROOT);
    assert_eq!(block.gas_used, "0x0");
    assert_eq!(block.gas_limit, "0x0");
    assert_eq!(block.timestamp, "0x0", "no executions means no timestamp source");
    assert_eq!(block.number, "0x5");
    assert_eq!(block.hash.len(), 66);
    assert_eq!(block.parent_hash.len(), 66);
    assert_eq!(block.difficulty, "0x0");
    assert_eq!(block.uncles, Vec::<String>::new());
}

#[tokio::test]
async fn test_block_folds_contract_results() {
    let to = "0x0000000000000000000000000000000000000022";
    let mirror = MockMirror::default().with_latest(5).with_fees(71);
    *mirror.contract_results.lock().unwrap() = vec![
        execution(Some(to), 100, 1_000, "1700000005.000000001"),
        // Null `to`: folded into gas totals but silently skipped as a tx
        execution(None, 200, 2_000, "1700000005.500000000"),
    ];
    mirror
        .details
        .lock()
        .unwrap()
        .insert((to.to_string(), "1700000005.000000001".to_string()), execution(Some(to), 100, 1_000, "1700000005.000000001"));
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let block = relay.eth.get_block_by_number("0x5", false, &rid()).await.unwrap().unwrap();

    assert_eq!(block.gas_used, "0x12c", "gas used is the sum over all results");
    assert_eq!(block.gas_limit, "0x7d0", "gas limit is the max over all results");
    // Whole-seconds portion of the first result's consensus timestamp
    assert_eq!(block.timestamp, format!("0x{:x}", 1_700_000_005u64));
    assert_eq!(block.transactions.len(), 1, "null-to executions are skipped");
    assert_eq!(block.transactions_root, block.hash);
    assert_eq!(block.base_fee_per_gas, bifrost_core::utils::to_hex(71u128 * 10_000_000_000));
}

#[tokio::test]
async fn test_block_transactions_full_objects_when_requested() {
    let to = "0x0000000000000000000000000000000000000022";
    let mirror = MockMirror::default().with_latest(5).with_fees(71);
    *mirror.contract_results.lock().unwrap() =
        vec![execution(Some(to), 100, 1_000, "1700000005.000000001")];
    mirror.details.lock().unwrap().insert(
        (to.to_string(), "1700000005.000000001".to_string()),
        execution(Some(to), 100, 1_000, "1700000005.000000001"),
    );
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let hashes_only = relay.eth.get_block_by_number("0x5", false, &rid()).await.unwrap().unwrap();
    assert!(hashes_only.transactions[0].is_string());

    let detailed = relay.eth.get_block_by_number("0x5", true, &rid()).await.unwrap().unwrap();
    let tx = &detailed.transactions[0];
    assert!(tx.is_object());
    assert_eq!(tx["hash"], hashes_only.transactions[0]);
    assert_eq!(tx["gas"], json!("0x64"));
}

#[tokio::test]
async fn test_get_block_by_hash_uses_hash_selector() {
    let block = mirror_block(7);
    let hash = block.hash.clone();
    let mirror = MockMirror::default().with_block(block).with_fees(71);
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let found = relay.eth.get_block_by_hash(&hash, false, &rid()).await.unwrap().unwrap();
    assert_eq!(found.number, "0x7");
}

#[tokio::test]
async fn test_block_transaction_count() {
    let mut block = mirror_block(7);
    block.count = Some(9);
    let hash = block.hash.clone();
    let mirror = MockMirror::default().with_block(block);
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let count = relay.eth.get_block_transaction_count(&hash, &rid()).await.unwrap();
    assert_eq!(count.as_deref(), Some("0x9"));

    let count = relay.eth.get_block_transaction_count("0x7", &rid()).await.unwrap();
    assert_eq!(count.as_deref(), Some("0x9"));

    let missing = relay.eth.get_block_transaction_count("0x99", &rid()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_earliest_tag_resolves_to_genesis() {
    let mirror = MockMirror::default().with_block(mirror_block(0)).with_fees(71);
    let relay = relay(mirror, MockConsensus::default(), MockPrecheck::default());

    let block = relay.eth.get_block_by_number("earliest", false, &rid()).await.unwrap().unwrap();
    assert_eq!(block.number, "0x0");
}

#[tokio::test]
async fn test_pending_tag_aliases_latest() {
    let relay = relay(
        MockMirror::default().with_latest(11).with_fees(71),
        MockConsensus::default(),
        MockPrecheck::default(),
    );

    let block = relay.eth.get_block_by_number("pending", false, &rid()).await.unwrap().unwrap();
    assert_eq!(block.number, "0xb");
}

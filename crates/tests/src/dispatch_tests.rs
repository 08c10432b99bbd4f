//! Method routing: constant responses, unsupported methods and parameter
//! validation through the dispatcher.

use serde_json::{json, Value};

use crate::mock_ports::{relay, relay_with_config, rid, MockConsensus, MockMirror, MockPrecheck};
use bifrost_core::config::RelayConfig;

#[tokio::test]
async fn test_chain_id_is_configured_constant_with_no_io() {
    let config = RelayConfig { chain_id: "0x12a".to_string(), ..Default::default() };
    let relay =
        relay_with_config(MockMirror::default(), MockConsensus::default(), MockPrecheck::default(), config);

    let outcome = relay.eth.dispatch("eth_chainId", &json!([]), &rid()).await.unwrap();
    assert_eq!(outcome.as_value(), Some(&json!("0x12a")));

    // No side effects, no I/O
    assert_eq!(relay.mirror.call_count(), 0);
    assert_eq!(relay.consensus.call_count(), 0);
}

#[tokio::test]
async fn test_constant_response_methods() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());
    let params = json!([]);

    let cases: &[(&str, Value)] = &[
        ("eth_accounts", json!([])),
        ("eth_mining", json!(false)),
        ("eth_syncing", json!(false)),
        ("eth_submitWork", json!(false)),
        ("eth_hashrate", json!("0x0")),
        ("eth_maxPriorityFeePerGas", json!("0x0")),
        ("eth_getUncleByBlockHashAndIndex", Value::Null),
        ("eth_getUncleByBlockNumberAndIndex", Value::Null),
        ("eth_getUncleCountByBlockHash", json!("0x0")),
        ("eth_getUncleCountByBlockNumber", json!("0x0")),
    ];

    for (method, expected) in cases {
        let outcome = relay.eth.dispatch(method, &params, &rid()).await.unwrap();
        assert_eq!(outcome.as_value(), Some(expected), "constant mismatch for {method}");
    }
    assert_eq!(relay.mirror.call_count(), 0);
}

#[tokio::test]
async fn test_unsupported_methods_return_error_value() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let unsupported = [
        "eth_getStorageAt",
        "eth_sign",
        "eth_signTransaction",
        "eth_sendTransaction",
        "eth_submitHashrate",
        "eth_getWork",
        "eth_protocolVersion",
        "eth_coinbase",
    ];

    for method in unsupported {
        let outcome = relay.eth.dispatch(method, &json!([]), &rid()).await.unwrap();
        let error = outcome.as_error().unwrap_or_else(|| panic!("{method} should be unsupported"));
        assert_eq!(error.code, -32601);
    }
}

#[tokio::test]
async fn test_unknown_method_returns_error_value() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());
    let outcome = relay.eth.dispatch("eth_totallyMadeUp", &json!([]), &rid()).await.unwrap();
    assert_eq!(outcome.as_error().unwrap().code, -32601);
}

#[tokio::test]
async fn test_missing_parameter_throws_invalid_params() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let err = relay.eth.dispatch("eth_getBalance", &json!([]), &rid()).await.unwrap_err();
    assert_eq!(err.rpc_code(), -32602);

    let err = relay.eth.dispatch("eth_getTransactionByHash", &json!([42]), &rid()).await.unwrap_err();
    assert_eq!(err.rpc_code(), -32602);
}

#[tokio::test]
async fn test_estimate_gas_through_dispatch() {
    let relay = relay(MockMirror::default(), MockConsensus::default(), MockPrecheck::default());

    let no_data = relay
        .eth
        .dispatch("eth_estimateGas", &json!([{ "to": "0x0000000000000000000000000000000000000001" }]), &rid())
        .await
        .unwrap();
    assert_eq!(no_data.as_value(), Some(&json!("0x5208")));

    let with_data = relay
        .eth
        .dispatch(
            "eth_estimateGas",
            &json!([{ "to": "0x0000000000000000000000000000000000000001", "data": "0xdeadbeef" }]),
            &rid(),
        )
        .await
        .unwrap();
    assert_eq!(with_data.as_value(), Some(&json!("0x61a80")));

    // Estimation is schedule-based; no backend traffic
    assert_eq!(relay.consensus.call_count(), 0);
}

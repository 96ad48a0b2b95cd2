//! Signed JSON-RPC client against a mock relay.

use mev_share_kit::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, header_exists, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
const BUNDLE_HASH: &str = "0x3d3d6d9f7bb6bd4fef4e4a2fa81b4e65ed43e4e0cc5b0b5df1d27c4bfa3a0f9f";

fn client(server: &MockServer) -> RpcClient {
    crate::init_tracing();
    RpcClient::new(server.uri(), InMemorySigner::new(KEY_ONE).unwrap())
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

fn request_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

// =============================================================================
// Signing Tests
// =============================================================================

#[tokio::test]
async fn test_signature_header_recovers_to_signer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_exists(SIGNATURE_HEADER))
        .and(header("content-type", "application/json"))
        .respond_with(rpc_result(json!({ "bundleHash": BUNDLE_HASH })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .send_bundle(Bundle::new(1).tx(vec![0x01], false))
        .await
        .unwrap();

    let request = only_request(&server).await;
    let header = request
        .headers
        .get(SIGNATURE_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let (address, signature) = header.split_once(':').unwrap();
    assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");

    let digest = hash_message(format!("0x{}", hex::encode(keccak256(&request.body))));
    let signature: Signature = signature.parse().unwrap();
    assert_eq!(signature.recover_address(&digest).unwrap(), client.address());
    assert_eq!(client.signature_header(&request.body).unwrap(), header);
}

// =============================================================================
// mev_sendBundle Tests
// =============================================================================

#[tokio::test]
async fn test_send_bundle_sets_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "bundleHash": BUNDLE_HASH })))
        .mount(&server)
        .await;

    let mut bundle = Bundle::new(17_891_729)
        .max_block(17_891_731)
        .hash(B256::repeat_byte(0x11))
        .tx(vec![0x02, 0xf8], true);
    bundle.version = "v0.0".to_string();

    let response = client(&server).send_bundle(bundle).await.unwrap();
    assert_eq!(response.bundle_hash, BUNDLE_HASH.parse::<B256>().unwrap());

    let body = request_json(&only_request(&server).await);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);
    assert_eq!(body["method"], "mev_sendBundle");

    let params = body["params"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["version"], "v0.1");
    assert_eq!(params[0]["inclusion"]["block"], "0x1110191");
    assert_eq!(params[0]["inclusion"]["maxBlock"], "0x1110193");
    assert_eq!(
        params[0]["body"][0]["hash"],
        format!("0x{}", "11".repeat(32))
    );
    assert_eq!(params[0]["body"][1]["tx"], "0x02f8");
    assert_eq!(params[0]["body"][1]["canRevert"], true);
}

#[tokio::test]
async fn test_send_bundle_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "bundle validation failed" }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_bundle(Bundle::new(1))
        .await
        .unwrap_err();

    assert!(err.is_remote());
    match err {
        Error::Remote { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "bundle validation failed");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_bundle_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_bundle(Bundle::new(1))
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "service unavailable");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_bundle_unreachable_relay() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = RpcClient::new(uri, InMemorySigner::random());
    let err = client.send_bundle(Bundle::new(1)).await.unwrap_err();
    assert!(err.is_transport());
}

// =============================================================================
// mev_simBundle Tests
// =============================================================================

#[tokio::test]
async fn test_sim_bundle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({
            "success": true,
            "stateBlock": "0x8b8da8",
            "mevGasPrice": "0x74c7906005",
            "profit": "0x4bc800904fc000",
            "refundableValue": "0x4bc800904fc000",
            "gasUsed": "0xa620",
            "logs": [ { "txLogs": null }, { "bundleLogs": [ { "txLogs": [] } ] } ]
        })))
        .mount(&server)
        .await;

    let mut bundle = Bundle::new(1).tx(vec![0xaa], false);
    bundle.version = "v0.0".to_string();
    let overrides = SimBundleOverrides {
        parent_block: Some(BlockRef::Number(9_145_768)),
        ..Default::default()
    };

    let response = client(&server)
        .sim_bundle(bundle, &overrides)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.state_block, 0x8b8da8);
    assert_eq!(response.gas_used, 0xa620);
    assert_eq!(response.profit, U256::from(0x4bc800904fc000u64));
    assert_eq!(response.logs.len(), 2);
    assert_eq!(response.logs[1].bundle_logs.len(), 1);

    let body = request_json(&only_request(&server).await);
    assert_eq!(body["method"], "mev_simBundle");
    let params = body["params"].as_array().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0]["version"], "v0.1");
    assert_eq!(params[0]["body"][0]["tx"], "0xaa");
    assert_eq!(params[1], json!({ "parentBlock": "0x8b8da8" }));
}

// =============================================================================
// eth_sendPrivateTransaction Tests
// =============================================================================

#[tokio::test]
async fn test_send_private_transaction() {
    let tx_hash = format!("0x{}", "ab".repeat(32));
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!(tx_hash)))
        .mount(&server)
        .await;

    let options = PrivateTxOptions::new()
        .hints(Hints {
            call_data: true,
            logs: true,
            ..Default::default()
        })
        .max_block_number(100)
        .builders(["b1", "b2"]);

    let hash = client(&server)
        .send_private_transaction("0xabc", &options)
        .await
        .unwrap();
    assert_eq!(hash, B256::repeat_byte(0xab));

    let body = request_json(&only_request(&server).await);
    assert_eq!(body["method"], "eth_sendPrivateTransaction");
    assert_eq!(
        body["params"],
        json!([{
            "tx": "0xabc",
            "maxBlockNumber": "0x64",
            "preferences": {
                "fast": true,
                "privacy": { "hints": ["calldata", "logs"] },
                "builders": ["b1", "b2"]
            }
        }])
    );
}

// =============================================================================
// call_with_signature Tests
// =============================================================================

#[tokio::test]
async fn test_call_with_signature_returns_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("raw failure body"))
        .mount(&server)
        .await;

    let body = client(&server)
        .call_with_signature("flashbots_getUserStats", [json!({ "blockNumber": "0x1" })])
        .await
        .unwrap();
    assert_eq!(body, b"raw failure body");

    let request = request_json(&only_request(&server).await);
    assert_eq!(request["method"], "flashbots_getUserStats");
    assert_eq!(request["params"], json!([{ "blockNumber": "0x1" }]));
}

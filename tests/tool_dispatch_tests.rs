// tests/tool_dispatch_tests.rs
//
// End-to-end tool dispatch against a fake MultiversX API. The mock server
// is process-global, so every test holds a lock for its duration.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use mockito::Matcher;
use serde_json::json;

use mvx_mcp_server::blockchain::wallet::PemWallet;
use mvx_mcp_server::config::Config;
use mvx_mcp_server::mcp::registry::{DispatchError, ToolRegistry, ToolResult};
use mvx_mcp_server::network::{Endpoints, NetworkId};
use mvx_mcp_server::tools;
use mvx_mcp_server::AppState;

static SERVER_LOCK: Mutex<()> = Mutex::new(());

struct TestContext {
    _guard: MutexGuard<'static, ()>,
    _dir: tempfile::TempDir,
    wallet: PemWallet,
    state: AppState,
    registry: ToolRegistry,
}

fn setup() -> TestContext {
    let guard = SERVER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    mockito::reset();

    let dir = tempfile::tempdir().unwrap();
    let wallet_path = dir.path().join("wallet.pem");
    let wallet = PemWallet::generate();
    wallet.save(&wallet_path).unwrap();

    let state = AppState {
        config: Arc::new(Config {
            port: 8080,
            network: NetworkId::Devnet,
            wallet_path: Some(PathBuf::from(&wallet_path)),
        }),
        endpoints: Arc::new(Endpoints::new(
            mockito::server_url(),
            "https://devnet-explorer.multiversx.com",
            "D",
        )),
    };

    let mut registry = ToolRegistry::new();
    tools::register_all(&mut registry).unwrap();

    TestContext {
        _guard: guard,
        _dir: dir,
        wallet,
        state,
        registry,
    }
}

fn result_text(result: &ToolResult) -> &str {
    &result.content[0].text
}

#[tokio::test]
async fn unknown_tool_is_a_dispatch_error() {
    let ctx = setup();
    let any_call = mockito::mock("GET", Matcher::Regex(".*".into()))
        .expect(0)
        .create();

    let err = ctx
        .registry
        .dispatch("no-such-tool", json!({}), ctx.state.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::UnknownTool(_)));
    assert_eq!(err.to_string(), "Unknown tool: no-such-tool");
    any_call.assert();
}

#[tokio::test]
async fn missing_required_argument_makes_no_network_call() {
    let ctx = setup();
    let any_get = mockito::mock("GET", Matcher::Regex(".*".into()))
        .expect(0)
        .create();
    let any_post = mockito::mock("POST", Matcher::Regex(".*".into()))
        .expect(0)
        .create();

    let err = ctx
        .registry
        .dispatch(
            "send-egld",
            json!({ "receiver": "erd1qqq" }),
            ctx.state.clone(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidArguments(_)));
    assert_eq!(
        err.to_string(),
        "Missing or invalid required argument: 'amount'"
    );
    any_get.assert();
    any_post.assert();
}

#[tokio::test]
async fn send_egld_submits_one_transaction() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let receiver = PemWallet::generate();

    let account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 7, "balance": "2000000000000000000" }).to_string())
        .create();
    let submit_mock = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({
            "nonce": 7,
            "value": "1500000000000000000",
            "receiver": receiver.address().to_bech32(),
            "sender": sender,
            "chainID": "D",
        })))
        .with_body(json!({ "txHash": "abc123" }).to_string())
        .expect(1)
        .create();

    let result = ctx
        .registry
        .dispatch(
            "send-egld",
            json!({ "amount": "1.5", "receiver": receiver.address().to_bech32() }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    let text = result_text(&result);
    assert!(text.starts_with("1.5 EGLD have been sent to"));
    assert!(text.contains("/transactions/abc123"));
    account_mock.assert();
    submit_mock.assert();
}

#[tokio::test]
async fn send_egld_insufficient_balance_is_reported_as_text() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let receiver = PemWallet::generate();

    let _account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 0, "balance": "1000000000000000000" }).to_string())
        .create();
    let submit_mock = mockito::mock("POST", "/transactions").expect(0).create();

    let result = ctx
        .registry
        .dispatch(
            "send-egld",
            json!({ "amount": "1.5", "receiver": receiver.address().to_bech32() }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(result_text(&result), "Not enough EGLD balance");
    submit_mock.assert();
}

#[tokio::test]
async fn invalid_token_name_fails_before_any_network_call() {
    let ctx = setup();
    let any_get = mockito::mock("GET", Matcher::Regex(".*".into()))
        .expect(0)
        .create();
    let any_post = mockito::mock("POST", Matcher::Regex(".*".into()))
        .expect(0)
        .create();

    let result = ctx
        .registry
        .dispatch(
            "issue-fungible-token",
            json!({
                "tokenName": "AB",
                "tokenTicker": "ABC",
                "initialSupply": "1000",
                "numDecimals": "2"
            }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(
        result_text(&result),
        "Token name is invalid. Length should be between 3 and 20 characters and contain only alphanumeric characters."
    );
    any_get.assert();
    any_post.assert();
}

#[tokio::test]
async fn nft_transfer_defaults_to_quantity_one() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let receiver = PemWallet::generate();

    let nft_mock = mockito::mock(
        "GET",
        format!("/accounts/{}/nfts/NFTEST-123456-0a", sender).as_str(),
    )
    .with_body(
        json!({
            "identifier": "NFTEST-123456-0a",
            "balance": "1",
            "type": "NonFungibleESDT"
        })
        .to_string(),
    )
    .create();
    let account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 3, "balance": "1000000000000000000" }).to_string())
        .create();

    let expected_payload = format!(
        "ESDTNFTTransfer@{}@0a@01@{}",
        hex::encode("NFTEST-123456"),
        receiver.address().hex()
    );
    let submit_mock = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({
            "nonce": 3,
            // NFT-family transfers are sent to the sender itself
            "receiver": sender,
            "data": BASE64.encode(expected_payload.as_bytes()),
        })))
        .with_body(json!({ "txHash": "nfthash" }).to_string())
        .expect(1)
        .create();

    let result = ctx
        .registry
        .dispatch(
            "send-sft-nft-meta-tokens",
            json!({
                "token": "NFTEST-123456-0a",
                "receiver": receiver.address().to_bech32()
            }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert!(result_text(&result).starts_with("Token NFTEST-123456-0a has been sent to"));
    nft_mock.assert();
    account_mock.assert();
    submit_mock.assert();
}

#[tokio::test]
async fn meta_esdt_transfer_requires_an_amount() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let receiver = PemWallet::generate();

    let _nft_mock = mockito::mock(
        "GET",
        format!("/accounts/{}/nfts/META-abcdef-01", sender).as_str(),
    )
    .with_body(
        json!({
            "identifier": "META-abcdef-01",
            "balance": "5000000",
            "decimals": 6,
            "type": "MetaESDT"
        })
        .to_string(),
    )
    .create();
    let submit_mock = mockito::mock("POST", "/transactions").expect(0).create();

    let result = ctx
        .registry
        .dispatch(
            "send-sft-nft-meta-tokens",
            json!({
                "token": "META-abcdef-01",
                "receiver": receiver.address().to_bech32()
            }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(result_text(&result), "No token amount provided for Meta ESDT");
    submit_mock.assert();
}

#[tokio::test]
async fn multi_receiver_insufficiency_blocks_all_submissions() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let r1 = PemWallet::generate();
    let r2 = PemWallet::generate();
    let r3 = PemWallet::generate();

    // 3 x 1 EGLD plus the gas reservation exceeds a 1 EGLD balance.
    let _account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 0, "balance": "1000000000000000000" }).to_string())
        .create();
    let submit_mock = mockito::mock("POST", "/transactions").expect(0).create();

    let result = ctx
        .registry
        .dispatch(
            "send-egld-to-multiple-receivers",
            json!({
                "amount": "1",
                "receivers": [
                    r1.address().to_bech32(),
                    r2.address().to_bech32(),
                    r3.address().to_bech32()
                ]
            }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(result_text(&result), "Not enough EGLD balance");
    submit_mock.assert();
}

#[tokio::test]
async fn multi_receiver_submits_sequential_nonces() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();
    let r1 = PemWallet::generate();
    let r2 = PemWallet::generate();

    let _account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 5, "balance": "10000000000000000000" }).to_string())
        .create();
    let first = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({
            "nonce": 5,
            "receiver": r1.address().to_bech32()
        })))
        .with_body(json!({ "txHash": "hash5" }).to_string())
        .expect(1)
        .create();
    let second = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({
            "nonce": 6,
            "receiver": r2.address().to_bech32()
        })))
        .with_body(json!({ "txHash": "hash6" }).to_string())
        .expect(1)
        .create();

    let result = ctx
        .registry
        .dispatch(
            "send-egld-to-multiple-receivers",
            json!({
                "amount": "1",
                "receivers": [r1.address().to_bech32(), r2.address().to_bech32()]
            }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    let text = result_text(&result);
    assert!(text.contains("/transactions/hash5"));
    assert!(text.contains("/transactions/hash6"));
    first.assert();
    second.assert();
}

#[tokio::test]
async fn collection_issuance_uses_nonce_n_then_n_plus_one() {
    let ctx = setup();
    let sender = ctx.wallet.address().to_bech32();

    let _account_mock = mockito::mock("GET", format!("/accounts/{}", sender).as_str())
        .with_body(json!({ "nonce": 7, "balance": "10000000000000000000" }).to_string())
        .create();
    let issue_mock = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({ "nonce": 7 })))
        .with_body(json!({ "txHash": "issuehash" }).to_string())
        .expect(1)
        .create();
    let roles_mock = mockito::mock("POST", "/transactions")
        .match_body(Matcher::PartialJson(json!({ "nonce": 8 })))
        .with_body(json!({ "txHash": "roleshash" }).to_string())
        .expect(1)
        .create();
    let _poll_mock = mockito::mock("GET", "/transactions/issuehash")
        .with_body(
            json!({
                "status": "success",
                "logs": {
                    "events": [
                        {
                            "identifier": "issueSemiFungible",
                            "topics": [BASE64.encode("TEST-abcdef")]
                        }
                    ]
                }
            })
            .to_string(),
        )
        .create();

    let result = ctx
        .registry
        .dispatch(
            "issue-semi-fungible-collection",
            json!({ "tokenName": "MyCollection", "tokenTicker": "TEST" }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    let text = result_text(&result);
    assert!(text.contains("/transactions/issuehash"));
    assert!(text.contains("/transactions/roleshash"));
    assert!(text.contains("The collection identifier is TEST-abcdef"));
    issue_mock.assert();
    roles_mock.assert();
}

#[tokio::test]
async fn get_balance_formats_to_egld() {
    let ctx = setup();
    let holder = PemWallet::generate();
    let bech32 = holder.address().to_bech32();

    let _account_mock = mockito::mock("GET", format!("/accounts/{}", bech32).as_str())
        .with_body(json!({ "nonce": 1, "balance": "1500000000000000000" }).to_string())
        .create();

    let result = ctx
        .registry
        .dispatch(
            "get-balance-of-address",
            json!({ "address": bech32 }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(
        result_text(&result),
        format!("The balance for {} is 1.5 EGLD.", bech32)
    );
}

#[tokio::test]
async fn invalid_address_is_reported_as_text() {
    let ctx = setup();
    let any_get = mockito::mock("GET", Matcher::Regex(".*".into()))
        .expect(0)
        .create();

    let result = ctx
        .registry
        .dispatch(
            "get-balance-of-address",
            json!({ "address": "not-an-address" }),
            ctx.state.clone(),
        )
        .await
        .unwrap();

    assert_eq!(
        result_text(&result),
        "Invalid address. Please provide a bech32 address (erd1...)"
    );
    any_get.assert();
}

#[tokio::test]
async fn get_network_reports_configured_network() {
    let ctx = setup();
    let result = ctx
        .registry
        .dispatch("get-network", json!({}), ctx.state.clone())
        .await
        .unwrap();
    assert_eq!(result_text(&result), "The current used network is devnet.");
}

#[tokio::test]
async fn get_wallet_address_reads_configured_pem() {
    let ctx = setup();
    let result = ctx
        .registry
        .dispatch("get-wallet-address", json!({}), ctx.state.clone())
        .await
        .unwrap();
    assert_eq!(
        result_text(&result),
        format!("The bech32 address is {}.", ctx.wallet.address().to_bech32())
    );
}

#[tokio::test]
async fn tools_list_exposes_the_full_catalogue() {
    let ctx = setup();
    let descriptors = ctx.registry.descriptors();
    let names: Vec<&str> = descriptors
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();

    assert_eq!(names.len(), 14);
    assert_eq!(names[0], "get-balance-of-address");
    assert!(names.contains(&"send-egld"));
    assert!(names.contains(&"issue-meta-esdt-collection"));
    assert!(names.contains(&"create-sft-nft-mesdt-tokens"));
    assert_eq!(names[13], "get-network");
}

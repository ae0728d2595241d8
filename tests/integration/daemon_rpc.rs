//! Staker Daemon RPC Tests
//!
//! Runs the HTTP-backed client against the in-process mock daemon and checks
//! both the wire format of requests and the decoding of replies.

use anyhow::Result;
use btc_staker_cli::cli::commands::daemon::{DaemonCommand, DaemonCommands};
use btc_staker_cli::config::StakerRpcConfig;
use btc_staker_cli::errors::RpcError;
use btc_staker_cli::rpc::StakerServiceJsonRpcClient;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::common::mock_daemon::{MockStakerDaemon, Reply};

fn client_for(
    daemon: &MockStakerDaemon,
    timeout_seconds: u64,
) -> Result<StakerServiceJsonRpcClient> {
    let config = StakerRpcConfig {
        daemon_address: daemon.address.clone(),
        timeout_seconds,
    };
    Ok(StakerServiceJsonRpcClient::new(&config.daemon_address, &config)?)
}

fn standard_replies() -> HashMap<&'static str, Reply> {
    HashMap::from([
        ("health", Reply::Result(json!({}))),
        (
            "list_outputs",
            Reply::Result(json!({
                "outputs": [
                    { "amount": "0.5 BTC", "address": "bcrt1qoutput0" },
                    { "amount": "0.25 BTC", "address": "bcrt1qoutput1" }
                ]
            })),
        ),
        (
            "babylon_validators",
            Reply::Result(json!({
                "validators": [{
                    "babylon_public_Key": "02aabb",
                    "bitcoin_public_Key": "ccdd"
                }],
                "total_validators_count": "1"
            })),
        ),
        ("stake", Reply::Result(json!({ "tx_hash": "ab".repeat(32) }))),
        (
            "list_staking_transactions",
            Reply::Result(json!({
                "transactions": [{
                    "staking_tx_hash": "cd".repeat(32),
                    "staker_address": "bcrt1qstaker",
                    "staking_state": "SENT_TO_BTC",
                    "watched": false,
                    "transaction_idx": "1"
                }],
                "total_transaction_count": "1"
            })),
        ),
    ])
}

#[tokio::test]
async fn test_every_method_round_trip() -> Result<()> {
    let daemon = MockStakerDaemon::start(standard_replies()).await?;
    let client = client_for(&daemon, 5)?;

    client.health().await?;

    let outputs = client.list_outputs().await?;
    assert_eq!(outputs.outputs.len(), 2);
    assert_eq!(outputs.outputs[1].address, "bcrt1qoutput1");

    let validators = client.babylon_validators(None, None).await?;
    assert_eq!(validators.total_validators_count, "1");
    assert_eq!(validators.validators[0].bitcoin_public_key, "ccdd");

    let stake = client.stake("bcrt1qstaker", 100_000, "ccdd", 1000).await?;
    assert_eq!(stake.tx_hash, "ab".repeat(32));

    let txs = client.list_staking_transactions(None, None).await?;
    assert_eq!(txs.transactions[0].staking_state, "SENT_TO_BTC");
    assert!(!txs.transactions[0].watched);

    let methods: Vec<String> = daemon
        .requests()
        .iter()
        .map(|req| req["method"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        methods,
        vec![
            "health",
            "list_outputs",
            "babylon_validators",
            "stake",
            "list_staking_transactions"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_pagination_params_on_the_wire() -> Result<()> {
    let daemon = MockStakerDaemon::start(standard_replies()).await?;
    let client = client_for(&daemon, 5)?;

    client.list_staking_transactions(None, None).await?;
    assert_eq!(daemon.last_request()["params"], json!({}));

    client.list_staking_transactions(Some(10), None).await?;
    assert_eq!(daemon.last_request()["params"], json!({ "offset": "10" }));

    client.babylon_validators(Some(0), Some(50)).await?;
    assert_eq!(
        daemon.last_request()["params"],
        json!({ "offset": "0", "limit": "50" })
    );
    Ok(())
}

#[tokio::test]
async fn test_stake_params_on_the_wire() -> Result<()> {
    let daemon = MockStakerDaemon::start(standard_replies()).await?;
    let client = client_for(&daemon, 5)?;

    client.stake("bcrt1qstaker", 100_000, "ccdd", 1000).await?;
    let request = daemon.last_request();

    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(
        request["params"],
        json!({
            "stakerAddress": "bcrt1qstaker",
            "stakingAmount": "100000",
            "validatorPk": "ccdd",
            "stakingTimeBlocks": "1000"
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_stake_command_forwards_values_unchecked() -> Result<()> {
    let daemon = MockStakerDaemon::start(standard_replies()).await?;
    let cmd = DaemonCommand {
        daemon_address: Some(daemon.address.clone()),
        action: DaemonCommands::Stake {
            staker_address: "bcrt1qstaker".to_string(),
            staking_amount: -5,
            finality_provider_pk: "ccdd".to_string(),
            staking_time: 70_000,
        },
    };

    cmd.run().await?;

    let request = daemon.last_request();
    assert_eq!(request["method"], "stake");
    assert_eq!(request["params"]["stakingAmount"], "-5");
    assert_eq!(request["params"]["stakingTimeBlocks"], "70000");
    Ok(())
}

#[tokio::test]
async fn test_daemon_error_is_remote() -> Result<()> {
    let mut replies = standard_replies();
    replies.insert(
        "stake",
        Reply::Error {
            code: -32603,
            message: "Internal error".to_string(),
            data: "not enough funds".to_string(),
        },
    );
    let daemon = MockStakerDaemon::start(replies).await?;
    let client = client_for(&daemon, 5)?;

    match client.stake("bcrt1qstaker", 1, "ccdd", 1).await {
        Err(RpcError::Remote {
            method,
            code,
            data,
            ..
        }) => {
            assert_eq!(method, "stake");
            assert_eq!(code, -32603);
            assert_eq!(data.as_deref(), Some("not enough funds"));
        }
        other => panic!("unexpected: {:?}", other.map(|r| r.tx_hash)),
    }

    // Other methods keep working on the same client
    client.health().await?;
    Ok(())
}

#[tokio::test]
async fn test_unknown_method_reply_is_remote() -> Result<()> {
    let daemon = MockStakerDaemon::start(HashMap::new()).await?;
    let client = client_for(&daemon, 5)?;

    assert!(matches!(
        client.health().await,
        Err(RpcError::Remote { code: -32601, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_configured_timeout() -> Result<()> {
    let daemon = MockStakerDaemon::start(HashMap::from([("health", Reply::Stall)])).await?;
    let client = client_for(&daemon, 1)?;

    match client.health().await {
        Err(RpcError::Timeout {
            timeout_seconds,
            method,
        }) => {
            assert_eq!(timeout_seconds, 1);
            assert_eq!(method, "health");
        }
        other => panic!("unexpected: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_caller_deadline_leaves_other_calls_alone() -> Result<()> {
    let mut replies = standard_replies();
    replies.insert("list_outputs", Reply::Stall);
    let daemon = MockStakerDaemon::start(replies).await?;
    let client = client_for(&daemon, 0)?;

    let stalled = client.call_with_deadline(
        Duration::from_millis(200),
        "list_outputs",
        client.list_outputs(),
    );
    let (stalled, healthy) = tokio::join!(stalled, client.health());

    assert!(matches!(stalled, Err(RpcError::Timeout { .. })));
    healthy?;
    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() -> Result<()> {
    // Grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("tcp://{}", listener.local_addr()?);
    drop(listener);

    let config = StakerRpcConfig {
        daemon_address: address.clone(),
        timeout_seconds: 5,
    };
    let client = StakerServiceJsonRpcClient::new(&address, &config)?;

    assert!(matches!(
        client.health().await,
        Err(RpcError::Transport { .. })
    ));
    Ok(())
}

//! Transaction Command Pipeline Tests
//!
//! Drives the `transaction` command handlers end to end: flags or JSON file
//! in, staking transaction hex out, and back through the checker.

use anyhow::Result;
use btc_staker_cli::cli::commands::transaction::{
    check_phase1_staking_transaction, create_phase1_staking_transaction,
    create_phase1_staking_transaction_from_json, CheckStakingTxArgs, CreateStakingTxArgs,
};
use btc_staker_cli::errors::AppError;
use btc_staker_cli::staking::InputBtcStakingTx;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

use crate::common::{regtest_covenant_hex, test_key_hex, TEST_MAGIC_BYTES_HEX};

fn regtest_create_args() -> CreateStakingTxArgs {
    CreateStakingTxArgs {
        staker_pk: test_key_hex(1),
        finality_provider_pk: test_key_hex(2),
        staking_amount: 10_000,
        staking_time_blocks: 100,
        magic_bytes: TEST_MAGIC_BYTES_HEX.to_string(),
        covenant_committee_pks: regtest_covenant_hex(),
        covenant_quorum: 2,
        network: "regtest".to_string(),
    }
}

fn check_args(staking_transaction: String) -> CheckStakingTxArgs {
    CheckStakingTxArgs {
        staking_transaction,
        magic_bytes: TEST_MAGIC_BYTES_HEX.to_string(),
        covenant_committee_pks: regtest_covenant_hex(),
        covenant_quorum: 2,
        network: "regtest".to_string(),
    }
}

fn write_json_input(input: &InputBtcStakingTx) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(input)?.as_bytes())?;
    Ok(file)
}

#[test]
fn test_create_then_check_regtest() -> Result<()> {
    let resp = create_phase1_staking_transaction(&regtest_create_args())?;
    assert!(!resp.staking_tx_hex.is_empty());

    check_phase1_staking_transaction(&check_args(resp.staking_tx_hex))?;
    Ok(())
}

#[test]
fn test_zero_amount_fails_before_building() {
    let mut args = regtest_create_args();
    args.staking_amount = 0;

    let err = create_phase1_staking_transaction(&args).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.to_string(), "staking amount should be greater than 0");
}

#[test]
fn test_json_input_matches_flags() -> Result<()> {
    let args = regtest_create_args();
    let file = write_json_input(&InputBtcStakingTx::from(&args))?;

    let from_flags = create_phase1_staking_transaction(&args)?;
    let from_json = create_phase1_staking_transaction_from_json(file.path())?;
    assert_eq!(from_flags, from_json);
    Ok(())
}

#[test]
fn test_json_missing_field_names_file() -> Result<()> {
    let mut value = serde_json::to_value(InputBtcStakingTx::from(&regtest_create_args()))?;
    value
        .as_object_mut()
        .unwrap()
        .remove("covenant_quorum");

    let mut file = NamedTempFile::new()?;
    file.write_all(value.to_string().as_bytes())?;

    let err = create_phase1_staking_transaction_from_json(file.path()).unwrap_err();
    assert!(matches!(err, AppError::InputFile(_)));
    assert!(err
        .to_string()
        .contains(&file.path().display().to_string()));
    assert!(err.to_string().contains("covenant_quorum"));
    Ok(())
}

#[test]
fn test_check_rejects_other_committee_settings() -> Result<()> {
    let resp = create_phase1_staking_transaction(&regtest_create_args())?;

    let mut args = check_args(resp.staking_tx_hex.clone());
    args.magic_bytes = "00000000".to_string();
    assert!(matches!(
        check_phase1_staking_transaction(&args),
        Err(AppError::Protocol(_))
    ));

    let mut args = check_args(resp.staking_tx_hex.clone());
    args.covenant_quorum = 3;
    assert!(matches!(
        check_phase1_staking_transaction(&args),
        Err(AppError::Protocol(_))
    ));

    let mut args = check_args(resp.staking_tx_hex);
    args.covenant_quorum = 4;
    let err = check_phase1_staking_transaction(&args).unwrap_err();
    assert!(err
        .to_string()
        .contains("covenant quorum 4 cannot be greater than number of covenant keys 3"));
    Ok(())
}

#[test]
fn test_binary_prints_json_and_reports_errors() -> Result<()> {
    let args = regtest_create_args();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stakercli"));
    cmd.args([
        "tr",
        "crpst",
        "--staker-pk",
        args.staker_pk.as_str(),
        "--finality-provider-pk",
        args.finality_provider_pk.as_str(),
        "--staking-amount",
        "10000",
        "--staking-time-blocks",
        "100",
        "--magic-bytes",
        args.magic_bytes.as_str(),
        "--covenant-quorum",
        "2",
        "--network",
        "regtest",
    ]);
    for pk in &args.covenant_committee_pks {
        cmd.args(["--covenant-committee-pks", pk.as_str()]);
    }

    let output = cmd.output()?;
    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let tx_hex = printed["staking_tx_hex"].as_str().unwrap().to_string();

    let mut check = Command::new(env!("CARGO_BIN_EXE_stakercli"));
    check.args([
        "transaction",
        "cpst",
        "--staking-transaction",
        tx_hex.as_str(),
        "--magic-bytes",
        TEST_MAGIC_BYTES_HEX,
        "--covenant-quorum",
        "2",
        "--network",
        "regtest",
    ]);
    for pk in &args.covenant_committee_pks {
        check.args(["--covenant-committee-pks", pk.as_str()]);
    }
    let output = check.output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?.trim(),
        "Provided transaction is valid staking transaction!"
    );

    let output = Command::new(env!("CARGO_BIN_EXE_stakercli"))
        .args(["tr", "crpstjson", "/nonexistent/input.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr)?.trim(),
        "Error: json file input /nonexistent/input.json does not exist"
    );
    Ok(())
}

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use assert_matches::assert_matches;
use counter_ethereum::{
    client::WalletProvider as _,
    common::WalletError,
    contract::{CounterContract, WriteOperation, SOURCE},
    test_utils::{MockWallet, CONTRACT_ADDRESS, OTHER, OWNER},
};

fn contract(wallet: &MockWallet, account: Address) -> CounterContract<MockWallet> {
    CounterContract::new(Arc::new(wallet.clone()), CONTRACT_ADDRESS, account)
}

#[test_log::test(tokio::test)]
async fn test_read_counter_and_owner() -> anyhow::Result<()> {
    let wallet = MockWallet::new(OWNER).with_counter(5);
    let contract = contract(&wallet, OWNER);

    assert_eq!(contract.get_counter().await?, U256::from(5));
    assert_eq!(contract.get_counter().await?, U256::from(5));
    assert_eq!(contract.owner().await?, OWNER);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_writes_apply_once_mined() -> anyhow::Result<()> {
    let wallet = MockWallet::new(OWNER).with_counter(1);
    let contract = contract(&wallet, OWNER);

    let tx_hash = contract.submit(WriteOperation::Increment).await?;
    // Submitted but not mined yet.
    assert_eq!(contract.get_counter().await?, U256::from(1));
    contract.confirm(tx_hash).await?;
    assert_eq!(contract.get_counter().await?, U256::from(2));

    let tx_hash = contract.submit(WriteOperation::Decrement).await?;
    contract.confirm(tx_hash).await?;
    assert_eq!(contract.get_counter().await?, U256::from(1));

    let tx_hash = contract.submit(WriteOperation::Reset).await?;
    contract.confirm(tx_hash).await?;
    assert_eq!(contract.get_counter().await?, U256::ZERO);

    assert_eq!(wallet.submitted_transactions(), 3);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_reset_by_other_account_reverts() {
    let wallet = MockWallet::new(OWNER).with_counter(7);
    let contract = contract(&wallet, OTHER);

    let error = contract.submit(WriteOperation::Reset).await.unwrap_err();
    assert_eq!(error.reason().as_deref(), Some("Not owner"));
    assert_eq!(wallet.submitted_transactions(), 0);
    assert_eq!(wallet.counter(), U256::from(7));
}

#[test_log::test(tokio::test)]
async fn test_decrement_below_zero_panics() {
    let wallet = MockWallet::new(OWNER);
    let contract = contract(&wallet, OWNER);

    let error = contract.submit(WriteOperation::Decrement).await.unwrap_err();
    assert_eq!(
        error.reason().as_deref(),
        Some("arithmetic underflow or overflow")
    );
}

#[test_log::test(tokio::test)]
async fn test_transaction_reverted_when_mined() -> anyhow::Result<()> {
    let wallet = MockWallet::new(OWNER).with_counter(1);
    let contract = contract(&wallet, OWNER);

    // Both decrements are valid when simulated, only the first one can succeed.
    let first = contract.submit(WriteOperation::Decrement).await?;
    let second = contract.submit(WriteOperation::Decrement).await?;
    contract.confirm(first).await?;
    assert_matches!(
        contract.confirm(second).await,
        Err(WalletError::TransactionReverted(hash)) if hash == second
    );
    assert_eq!(wallet.counter(), U256::ZERO);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_signing_rejected() {
    let wallet = MockWallet::new(OWNER);
    wallet.reject_signing(true);
    let contract = contract(&wallet, OWNER);

    assert_matches!(
        contract.submit(WriteOperation::Increment).await,
        Err(WalletError::Rejected(_))
    );
    assert_eq!(wallet.submitted_transactions(), 0);
}

#[test_log::test(tokio::test)]
async fn test_call_without_contract() {
    let wallet = MockWallet::new(OWNER);
    let contract = CounterContract::new(Arc::new(wallet.clone()), OTHER, OWNER);

    // An empty output cannot be decoded as a `uint256`.
    assert_matches!(contract.get_counter().await, Err(WalletError::SolTypes(_)));
    assert_eq!(wallet.request_accounts().await.unwrap(), vec![OWNER]);
}

#[test]
fn test_source_declares_interface() {
    for function in [
        "function getCounter()",
        "function incrementCounter()",
        "function decrementCounter()",
        "function resetCounter()",
        "address public owner",
    ] {
        assert!(SOURCE.contains(function), "missing `{function}`");
    }
}

#[test]
fn test_calldata_selectors() {
    use alloy_sol_types::SolCall as _;
    use counter_ethereum::contract::ICounter;

    assert_eq!(
        &WriteOperation::Increment.calldata()[..],
        ICounter::incrementCounterCall::SELECTOR
    );
    assert_eq!(
        &WriteOperation::Decrement.calldata()[..],
        ICounter::decrementCounterCall::SELECTOR
    );
    assert_eq!(
        &WriteOperation::Reset.calldata()[..],
        ICounter::resetCounterCall::SELECTOR
    );
}

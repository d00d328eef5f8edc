// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tests of `HttpWallet` against a local Anvil node.

#![cfg(not(target_arch = "wasm32"))]

use alloy::{
    network::{EthereumWallet, TransactionBuilder as _},
    node_bindings::{Anvil, AnvilInstance},
    providers::{Provider as _, ProviderBuilder},
    rpc::types::eth::request::TransactionRequest,
};
use alloy_primitives::{hex, Address, Bytes};
use alloy_signer_local::PrivateKeySigner;
use counter_ethereum::{client::WalletProvider as _, provider::HttpWallet};

/// Init code deploying a contract whose runtime code is `PUSH1 0 PUSH1 0 REVERT`.
const REVERTING_CONTRACT: &str = "6005600c60003960056000f360006000fd";

struct AnvilTest {
    anvil_instance: AnvilInstance,
    private_key: String,
}

fn get_anvil() -> anyhow::Result<AnvilTest> {
    let anvil_instance = Anvil::new().try_spawn()?;
    let private_key = hex::encode_prefixed(anvil_instance.keys()[0].to_bytes());
    Ok(AnvilTest {
        anvil_instance,
        private_key,
    })
}

impl AnvilTest {
    fn wallet(&self) -> anyhow::Result<HttpWallet> {
        Ok(HttpWallet::new(
            &self.anvil_instance.endpoint(),
            &self.private_key,
        )?)
    }

    fn address(&self, index: usize) -> Address {
        self.anvil_instance.addresses()[index]
    }

    async fn deploy(&self, code: &str) -> anyhow::Result<Address> {
        let signer: PrivateKeySigner = self.private_key.parse()?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.anvil_instance.endpoint_url());
        let tx = TransactionRequest::default().with_deploy_code(hex::decode(code)?);
        let receipt = provider.send_transaction(tx).await?.get_receipt().await?;
        receipt
            .contract_address
            .ok_or_else(|| anyhow::anyhow!("no contract deployed"))
    }
}

#[test_log::test(tokio::test)]
async fn test_accounts_and_chain_id() -> anyhow::Result<()> {
    let anvil_test = get_anvil()?;
    let wallet = anvil_test.wallet()?;

    assert_eq!(wallet.request_accounts().await?, vec![anvil_test.address(0)]);
    assert_eq!(
        wallet.chain_id().await?,
        anvil_test.anvil_instance.chain_id()
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_call_without_code() -> anyhow::Result<()> {
    let anvil_test = get_anvil()?;
    let wallet = anvil_test.wallet()?;

    let output = wallet.call(anvil_test.address(1), Bytes::new()).await?;
    assert!(output.is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_send_and_confirm() -> anyhow::Result<()> {
    let anvil_test = get_anvil()?;
    let wallet = anvil_test.wallet()?;

    let tx_hash = wallet
        .send_transaction(anvil_test.address(0), anvil_test.address(1), Bytes::new())
        .await?;
    wallet.wait_for_confirmation(tx_hash).await?;
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_reverting_contract() -> anyhow::Result<()> {
    let anvil_test = get_anvil()?;
    let wallet = anvil_test.wallet()?;
    let contract = anvil_test.deploy(REVERTING_CONTRACT).await?;

    let error = wallet.call(contract, Bytes::new()).await.unwrap_err();
    // The revert carries no reason.
    assert_eq!(error.reason(), None);

    // The transaction is rejected before being sent, when estimating its gas.
    let result = wallet
        .send_transaction(anvil_test.address(0), contract, Bytes::new())
        .await;
    assert!(result.is_err());
    Ok(())
}

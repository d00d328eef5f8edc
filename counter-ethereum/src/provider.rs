// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    network::{EthereumWallet, ReceiptResponse as _},
    providers::{PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::eth::request::{TransactionInput, TransactionRequest},
};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::{client::WalletProvider, common::WalletError};

/// A wallet made of an Ethereum JSON-RPC endpoint and a local private key.
///
/// This is the native counterpart of the wallet injected in the browser: the single
/// authorized account is the one of the key, and transactions are signed locally
/// before being sent to the endpoint.
pub struct HttpWallet {
    provider: Box<dyn Provider>,
    account: Address,
}

impl HttpWallet {
    /// Connects to the node at `rpc_url`, signing with the hex-encoded `private_key`.
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self, WalletError> {
        let url = Url::parse(rpc_url)?;
        let signer: PrivateKeySigner = private_key.parse()?;
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);
        Ok(Self {
            provider: Box::new(provider),
            account,
        })
    }
}

impl WalletProvider for HttpWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.account])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, WalletError> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(input));
        Ok(self.provider.call(tx).await?)
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, WalletError> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .input(TransactionInput::new(input));
        let pending = self.provider.send_transaction(tx).await?;
        tracing::debug!(tx_hash = %pending.tx_hash(), "transaction sent");
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), WalletError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;
        if receipt.status() {
            Ok(())
        } else {
            Err(WalletError::TransactionReverted(tx_hash))
        }
    }
}

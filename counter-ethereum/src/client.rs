// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Address, Bytes, TxHash};

use crate::common::WalletError;

/// The operations the counter session needs from a wallet provider.
///
/// In the browser this is the provider injected by the wallet extension, which may
/// prompt the user on `request_accounts` and `send_transaction`. Natively it is a
/// JSON-RPC endpoint paired with a local signer.
#[cfg_attr(not(web), trait_variant::make(Send))]
pub trait WalletProvider {
    /// Asks the wallet to authorize this page, returning the authorized accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Returns the id of the chain the wallet is connected to.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Performs a read-only call of the contract at `to` with the given calldata.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, WalletError>;

    /// Signs and submits a transaction, returning its hash once the wallet has
    /// broadcast it.
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, WalletError>;

    /// Waits until the transaction is mined. Fails if its execution reverted.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), WalletError>;
}

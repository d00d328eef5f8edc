// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bindings for the Counter contract.

use std::{fmt, sync::Arc};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};

use crate::{client::WalletProvider, common::WalletError};

/// Solidity source of the Counter contract.
pub const SOURCE: &str = include_str!("../contracts/Counter.sol");

sol! {
    interface ICounter {
        function getCounter() external view returns (uint256);
        function owner() external view returns (address);
        function incrementCounter() external;
        function decrementCounter() external;
        function resetCounter() external;
    }
}

/// The state-changing functions of the Counter contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteOperation {
    Increment,
    Decrement,
    /// Only succeeds when sent by the contract owner.
    Reset,
}

impl WriteOperation {
    /// Returns the calldata of the corresponding contract function.
    pub fn calldata(self) -> Bytes {
        let input = match self {
            WriteOperation::Increment => ICounter::incrementCounterCall {}.abi_encode(),
            WriteOperation::Decrement => ICounter::decrementCounterCall {}.abi_encode(),
            WriteOperation::Reset => ICounter::resetCounterCall {}.abi_encode(),
        };
        input.into()
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::Increment => write!(f, "increment"),
            WriteOperation::Decrement => write!(f, "decrement"),
            WriteOperation::Reset => write!(f, "reset"),
        }
    }
}

/// A handle on the deployed contract, bound to the account that signs the writes.
pub struct CounterContract<W> {
    wallet: Arc<W>,
    address: Address,
    account: Address,
}

impl<W> Clone for CounterContract<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            address: self.address,
            account: self.account,
        }
    }
}

impl<W> CounterContract<W> {
    pub fn new(wallet: Arc<W>, address: Address, account: Address) -> Self {
        Self {
            wallet,
            address,
            account,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The account that signs the transactions sent through this handle.
    pub fn account(&self) -> Address {
        self.account
    }
}

impl<W: WalletProvider> CounterContract<W> {
    /// Reads the current value of the counter.
    pub async fn get_counter(&self) -> Result<U256, WalletError> {
        let input = ICounter::getCounterCall {}.abi_encode();
        let output = self.wallet.call(self.address, input.into()).await?;
        Ok(ICounter::getCounterCall::abi_decode_returns(&output)?)
    }

    /// Reads the address of the contract owner.
    pub async fn owner(&self) -> Result<Address, WalletError> {
        let input = ICounter::ownerCall {}.abi_encode();
        let output = self.wallet.call(self.address, input.into()).await?;
        Ok(ICounter::ownerCall::abi_decode_returns(&output)?)
    }

    /// Signs and submits `operation`, without waiting for it to be mined.
    pub async fn submit(&self, operation: WriteOperation) -> Result<TxHash, WalletError> {
        self.wallet
            .send_transaction(self.account, self.address, operation.calldata())
            .await
    }

    /// Waits for a transaction returned by [`CounterContract::submit`] to be mined.
    pub async fn confirm(&self, tx_hash: TxHash) -> Result<(), WalletError> {
        self.wallet.wait_for_confirmation(tx_hash).await
    }
}

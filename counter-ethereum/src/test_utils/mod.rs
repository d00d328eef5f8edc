// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An in-memory chain running the Counter contract, usable as a [`WalletProvider`].

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy_primitives::{address, keccak256, Address, Bytes, TxHash, U256};
use alloy_sol_types::{Panic, PanicKind, Revert, SolError, SolInterface, SolValue};
use tokio::sync::Semaphore;

use crate::{
    client::WalletProvider,
    common::{WalletError, USER_REJECTED_REQUEST},
    contract::ICounter::ICounterCalls,
};

/// The Counter deployment on Sepolia.
pub const CONTRACT_ADDRESS: Address = address!("c6b6bd4d003379e750Ed91C934F8A56714a0d34E");

/// The account that deployed the contract.
pub const OWNER: Address = address!("00000000000000000000000000000000000abc00");

/// Another account.
pub const OTHER: Address = address!("00000000000000000000000000000000000def00");

/// The chain id of Sepolia.
pub const SEPOLIA: u64 = 11_155_111;

/// JSON-RPC code used by nodes for reverted executions.
const EXECUTION_ERROR: i64 = 3;

struct MockChain {
    chain_id: u64,
    contract: Address,
    owner: Address,
    accounts: Vec<Address>,
    counter: U256,
    pending: HashMap<TxHash, (Address, ICounterCalls)>,
    submitted: usize,
    reject_authorization: bool,
    reject_signing: bool,
    rejection_message: String,
    fail_reads: bool,
    confirmations: Option<Arc<Semaphore>>,
}

impl MockChain {
    /// Runs a call against the contract state, applying it if `commit` is set.
    fn execute(
        &mut self,
        from: Address,
        call: &ICounterCalls,
        commit: bool,
    ) -> Result<Bytes, WalletError> {
        let new_counter = match call {
            ICounterCalls::getCounter(_) => return Ok(self.counter.abi_encode().into()),
            ICounterCalls::owner(_) => return Ok(self.owner.abi_encode().into()),
            ICounterCalls::incrementCounter(_) => self
                .counter
                .checked_add(U256::from(1))
                .ok_or_else(|| panic_error(PanicKind::UnderOverflow))?,
            ICounterCalls::decrementCounter(_) => self
                .counter
                .checked_sub(U256::from(1))
                .ok_or_else(|| panic_error(PanicKind::UnderOverflow))?,
            ICounterCalls::resetCounter(_) => {
                if from != self.owner {
                    return Err(revert_error("Not owner"));
                }
                U256::ZERO
            }
        };
        if commit {
            self.counter = new_counter;
        }
        Ok(Bytes::new())
    }
}

fn revert_error(reason: &str) -> WalletError {
    let data = Revert {
        reason: reason.to_string(),
    }
    .abi_encode();
    WalletError::from_rpc(
        EXECUTION_ERROR,
        format!("execution reverted: {reason}"),
        Some(data.into()),
    )
}

fn panic_error(kind: PanicKind) -> WalletError {
    let data = Panic {
        code: U256::from(kind as u32),
    }
    .abi_encode();
    WalletError::from_rpc(
        EXECUTION_ERROR,
        "execution reverted".to_string(),
        Some(data.into()),
    )
}

/// Releases confirmations held by a [`MockWallet`], one transaction at a time.
pub struct ConfirmationGate(Arc<Semaphore>);

impl ConfirmationGate {
    /// Lets one pending transaction be mined.
    pub fn release(&self) {
        self.0.add_permits(1);
    }
}

/// A wallet connected to an in-memory chain where the Counter contract is deployed.
///
/// Clones share the same chain, so a test can keep a handle to inspect the state after
/// giving the wallet away.
#[derive(Clone)]
pub struct MockWallet {
    chain: Arc<Mutex<MockChain>>,
}

impl MockWallet {
    /// Creates a chain with the contract deployed at [`CONTRACT_ADDRESS`] by `owner`. The
    /// wallet authorizes `owner` by default.
    pub fn new(owner: Address) -> Self {
        let chain = MockChain {
            chain_id: SEPOLIA,
            contract: CONTRACT_ADDRESS,
            owner,
            accounts: vec![owner],
            counter: U256::ZERO,
            pending: HashMap::new(),
            submitted: 0,
            reject_authorization: false,
            reject_signing: false,
            rejection_message: "User denied transaction signature.".to_string(),
            fail_reads: false,
            confirmations: None,
        };
        Self {
            chain: Arc::new(Mutex::new(chain)),
        }
    }

    /// Makes the wallet authorize `account` instead of the owner.
    pub fn with_account(self, account: Address) -> Self {
        self.chain.lock().unwrap().accounts = vec![account];
        self
    }

    /// Makes the wallet authorize no account at all.
    pub fn without_accounts(self) -> Self {
        self.chain.lock().unwrap().accounts.clear();
        self
    }

    pub fn with_counter(self, counter: u64) -> Self {
        self.set_counter(counter);
        self
    }

    pub fn with_chain_id(self, chain_id: u64) -> Self {
        self.chain.lock().unwrap().chain_id = chain_id;
        self
    }

    /// Makes the user decline the authorization request.
    pub fn reject_authorization(&self) {
        self.chain.lock().unwrap().reject_authorization = true;
    }

    /// Makes the user decline (or accept again) signature requests.
    pub fn reject_signing(&self, reject: bool) {
        self.chain.lock().unwrap().reject_signing = reject;
    }

    /// Sets the message of the error returned when signing is declined.
    pub fn set_rejection_message(&self, message: &str) {
        self.chain.lock().unwrap().rejection_message = message.to_string();
    }

    /// Makes every read-only call fail with a network error.
    pub fn fail_reads(&self, fail: bool) {
        self.chain.lock().unwrap().fail_reads = fail;
    }

    /// Changes the counter as if another user had sent a transaction.
    pub fn set_counter(&self, counter: u64) {
        self.chain.lock().unwrap().counter = U256::from(counter);
    }

    pub fn counter(&self) -> U256 {
        self.chain.lock().unwrap().counter
    }

    /// The number of transactions that were signed and submitted.
    pub fn submitted_transactions(&self) -> usize {
        self.chain.lock().unwrap().submitted
    }

    /// From now on, transactions are only mined when the returned gate releases them.
    pub fn hold_confirmations(&self) -> ConfirmationGate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.chain.lock().unwrap().confirmations = Some(semaphore.clone());
        ConfirmationGate(semaphore)
    }
}

impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let chain = self.chain.lock().unwrap();
        if chain.reject_authorization {
            return Err(WalletError::from_rpc(
                USER_REJECTED_REQUEST,
                "User rejected the request.".to_string(),
                None,
            ));
        }
        Ok(chain.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain.lock().unwrap().chain_id)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, WalletError> {
        let mut chain = self.chain.lock().unwrap();
        if chain.fail_reads {
            return Err(WalletError::from_rpc(-32603, "failed to fetch".to_string(), None));
        }
        if to != chain.contract {
            // Calls to an account without code succeed with an empty output.
            return Ok(Bytes::new());
        }
        let call = ICounterCalls::abi_decode(&input)?;
        chain.execute(Address::ZERO, &call, false)
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, WalletError> {
        let mut chain = self.chain.lock().unwrap();
        if chain.reject_signing {
            return Err(WalletError::from_rpc(
                USER_REJECTED_REQUEST,
                chain.rejection_message.clone(),
                None,
            ));
        }
        if to != chain.contract {
            return Err(WalletError::from_rpc(
                EXECUTION_ERROR,
                format!("no contract deployed at {to}"),
                None,
            ));
        }
        let call = ICounterCalls::abi_decode(&input)?;
        // Like real wallets, simulate first so that reverts surface before signing.
        chain.execute(from, &call, false)?;
        chain.submitted += 1;
        let tx_hash = keccak256((chain.submitted as u64).to_be_bytes());
        chain.pending.insert(tx_hash, (from, call));
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), WalletError> {
        let confirmations = self.chain.lock().unwrap().confirmations.clone();
        if let Some(semaphore) = confirmations {
            semaphore
                .acquire()
                .await
                .expect("confirmation gate is never closed")
                .forget();
        }
        let mut chain = self.chain.lock().unwrap();
        let (from, call) = chain.pending.remove(&tx_hash).ok_or_else(|| {
            WalletError::UnexpectedResponse(format!("unknown transaction {tx_hash}"))
        })?;
        chain
            .execute(from, &call, true)
            .map_err(|_| WalletError::TransactionReverted(tx_hash))?;
        Ok(())
    }
}

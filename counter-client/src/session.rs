// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, U256};
use counter_ethereum::{
    client::WalletProvider,
    common::WalletError,
    contract::{CounterContract, WriteOperation},
};
use futures::channel::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::SessionConfig,
    error::SessionError,
    status::{Phase, Status},
    view::ViewState,
};

/// The result of a write requested through a [`Session`].
#[derive(Debug)]
pub enum Outcome {
    /// Nothing was sent: the session is not connected, or another write is pending.
    Skipped,
    /// The transaction was mined and the counter read again.
    Confirmed { counter: U256 },
    /// The transaction was rejected, reverted or could not be sent.
    Failed(WalletError),
}

struct SessionState<W> {
    phase: Phase,
    status: Status,
    account: Option<Address>,
    owner: Option<Address>,
    counter: U256,
    contract: Option<CounterContract<W>>,
}

impl<W> SessionState<W> {
    fn view(&self) -> ViewState {
        let is_owner = self.account.is_some() && self.account == self.owner;
        let busy = matches!(self.phase, Phase::OperationPending(_));
        let connected = self.contract.is_some();
        let writable = connected && !busy;
        ViewState {
            counter: self.counter,
            account: self.account,
            owner: self.owner,
            is_owner,
            status: self.status.clone(),
            busy,
            connected,
            can_increment: writable,
            can_decrement: writable,
            can_reset: writable && is_owner,
        }
    }
}

/// The state of the page for one wallet provider and one contract.
///
/// A session is created on load and lives as long as the page. At most one write is in
/// flight at any time: requests made while a write is pending are ignored.
pub struct Session<W> {
    config: SessionConfig,
    provider: Option<Arc<W>>,
    state: Mutex<SessionState<W>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ViewState>>>,
}

impl<W> Session<W> {
    /// Creates a session for the contract in `config`. `provider` is `None` when no
    /// wallet is available.
    pub fn new(config: SessionConfig, provider: Option<W>) -> Self {
        let state = SessionState {
            phase: Phase::Uninitialized,
            status: Status::Idle,
            account: None,
            owner: None,
            counter: U256::ZERO,
            contract: None,
        };
        Self {
            config,
            provider: provider.map(Arc::new),
            state: Mutex::new(state),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().unwrap().phase
    }

    /// Returns a snapshot of what the page should display.
    pub fn view(&self) -> ViewState {
        self.state.lock().unwrap().view()
    }

    /// Returns a stream receiving the current view, then a new one after every
    /// transition.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ViewState> {
        let (sender, receiver) = mpsc::unbounded();
        let view = self.view();
        // The receiver is alive, so this cannot fail.
        let _ = sender.unbounded_send(view);
        self.subscribers.lock().unwrap().push(sender);
        receiver
    }

    /// Applies `change` to the state and publishes the new view. Nothing is published
    /// if `change` returns `None`.
    fn transition<T>(&self, change: impl FnOnce(&mut SessionState<W>) -> Option<T>) -> Option<T> {
        let (result, view) = {
            let mut state = self.state.lock().unwrap();
            let result = change(&mut state)?;
            (result, state.view())
        };
        self.subscribers
            .lock()
            .unwrap()
            .retain(|subscriber| subscriber.unbounded_send(view.clone()).is_ok());
        Some(result)
    }

    fn update(&self, change: impl FnOnce(&mut SessionState<W>)) {
        self.transition(|state| {
            change(state);
            Some(())
        });
    }
}

impl<W: WalletProvider> Session<W> {
    /// Authorizes an account with the wallet and loads the contract state.
    ///
    /// Only the first call does anything. Failures are final: the session stays in
    /// [`Phase::ConnectionFailed`] with every write disabled. Later calls succeed only
    /// if the contract was loaded, and fail with [`SessionError::NotConnected`]
    /// otherwise.
    #[instrument(skip(self), fields(contract = %self.config.contract_address))]
    pub async fn connect(&self) -> Result<(), SessionError> {
        let provider = self.provider.clone();
        let started = self.transition(|state| {
            if state.phase != Phase::Uninitialized {
                return None;
            }
            if provider.is_some() {
                state.phase = Phase::Connecting;
                state.status = Status::Connecting;
            } else {
                state.phase = Phase::ConnectionFailed;
                state.status = Status::InstallWallet;
            }
            Some(())
        });
        if started.is_none() {
            debug!("the session was already started");
            return match self.phase() {
                Phase::Ready | Phase::OperationPending(_) => Ok(()),
                _ => Err(SessionError::NotConnected),
            };
        }
        let Some(provider) = provider else {
            warn!("no wallet provider is available");
            return Err(SessionError::NoProvider);
        };

        match self.load(provider).await {
            Ok((contract, counter, owner)) => {
                info!(account = %contract.account(), %owner, %counter, "contract loaded");
                self.update(|state| {
                    state.account = Some(contract.account());
                    state.owner = Some(owner);
                    state.counter = counter;
                    state.contract = Some(contract);
                    state.phase = Phase::Ready;
                    state.status = Status::Loaded;
                });
                Ok(())
            }
            Err(error) => {
                error!(%error, "failed to connect the wallet or load the contract");
                self.update(|state| {
                    state.phase = Phase::ConnectionFailed;
                    state.status = Status::ConnectionFailed;
                });
                Err(error.into())
            }
        }
    }

    async fn load(
        &self,
        provider: Arc<W>,
    ) -> Result<(CounterContract<W>, U256, Address), WalletError> {
        let account = provider
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccounts)?;
        if let Some(expected) = self.config.chain_id {
            let chain_id = provider.chain_id().await?;
            if chain_id != expected {
                warn!(chain_id, expected, "the wallet is connected to another chain");
            }
        }
        let contract = CounterContract::new(provider, self.config.contract_address, account);
        let (counter, owner) = futures::try_join!(contract.get_counter(), contract.owner())?;
        Ok((contract, counter, owner))
    }

    /// Reads the counter from the chain.
    pub async fn get_counter(&self) -> Result<U256, SessionError> {
        let contract = self
            .state
            .lock()
            .unwrap()
            .contract
            .clone()
            .ok_or(SessionError::NotConnected)?;
        Ok(contract.get_counter().await?)
    }

    pub async fn increment(&self) -> Outcome {
        self.execute(WriteOperation::Increment).await
    }

    pub async fn decrement(&self) -> Outcome {
        self.execute(WriteOperation::Decrement).await
    }

    /// Sends a reset even if the account is not the owner, in which case the contract
    /// reverts and its reason becomes the status.
    pub async fn reset(&self) -> Outcome {
        self.execute(WriteOperation::Reset).await
    }

    #[instrument(skip(self))]
    async fn execute(&self, operation: WriteOperation) -> Outcome {
        let contract = self.transition(|state| {
            if state.phase != Phase::Ready {
                return None;
            }
            let contract = state.contract.clone()?;
            state.phase = Phase::OperationPending(operation);
            state.status = Status::AwaitingApproval;
            Some(contract)
        });
        let Some(contract) = contract else {
            debug!("ignoring {operation}: not connected or another write is pending");
            return Outcome::Skipped;
        };

        match self.send_and_confirm(&contract, operation).await {
            Ok(counter) => {
                info!(%counter, "{operation} confirmed");
                self.update(|state| {
                    state.counter = counter;
                    state.phase = Phase::Ready;
                    state.status = Status::Succeeded(operation);
                });
                Outcome::Confirmed { counter }
            }
            Err(error) => {
                error!(%error, "{operation} failed");
                let reason = error.reason();
                self.update(|state| {
                    state.phase = Phase::Ready;
                    state.status = Status::Failed { reason };
                });
                Outcome::Failed(error)
            }
        }
    }

    async fn send_and_confirm(
        &self,
        contract: &CounterContract<W>,
        operation: WriteOperation,
    ) -> Result<U256, WalletError> {
        let tx_hash = contract.submit(operation).await?;
        info!(%tx_hash, "transaction submitted");
        self.update(|state| state.status = Status::PendingConfirmation);
        contract.confirm(tx_hash).await?;
        contract.get_counter().await
    }
}

#[cfg(test)]
#[path = "unit_tests/session_tests.rs"]
mod session_tests;

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use counter_ethereum::contract::WriteOperation;
use serde::Serialize;

/// Where a session is in its lifecycle.
///
/// `Uninitialized → Connecting → Ready | ConnectionFailed`, then
/// `Ready → OperationPending → Ready` for every write. `ConnectionFailed` is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Uninitialized,
    Connecting,
    Ready,
    OperationPending(WriteOperation),
    ConnectionFailed,
}

/// The message shown to the user. Each transition replaces the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    InstallWallet,
    Connecting,
    Loaded,
    ConnectionFailed,
    AwaitingApproval,
    PendingConfirmation,
    Succeeded(WriteOperation),
    /// A write failed. The reason is the one carried by the failure, if any.
    Failed { reason: Option<String> },
}

impl Status {
    pub fn is_empty(&self) -> bool {
        matches!(self, Status::Idle)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => Ok(()),
            Status::InstallWallet => write!(f, "No wallet provider found. Please install MetaMask."),
            Status::Connecting => {
                write!(f, "Connecting the wallet and loading the contract state...")
            }
            Status::Loaded => write!(f, "Loaded."),
            Status::ConnectionFailed => write!(
                f,
                "Failed to connect the wallet or load the contract. \
                 (Check the address, ABI and network.)"
            ),
            Status::AwaitingApproval => write!(f, "Waiting for transaction approval..."),
            Status::PendingConfirmation => {
                write!(f, "Processing transaction... (waiting for block confirmation)")
            }
            Status::Succeeded(WriteOperation::Increment) => write!(f, "Counter incremented!"),
            Status::Succeeded(WriteOperation::Decrement) => write!(f, "Counter decremented!"),
            Status::Succeeded(WriteOperation::Reset) => write!(f, "Counter reset!"),
            Status::Failed {
                reason: Some(reason),
            } => write!(f, "{reason}"),
            Status::Failed { reason: None } => write!(f, "The transaction failed."),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

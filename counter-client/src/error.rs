// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use counter_ethereum::common::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no wallet provider was found")]
    NoProvider,

    #[error("the session is not connected to the contract")]
    NotConnected,

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

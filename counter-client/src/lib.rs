// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The session controller of the Counter DApp.
//!
//! A [`Session`] owns everything the page knows about the contract: the authorized
//! account, the owner, the last counter value read from the chain and the current
//! [`Status`]. The view layer only renders the [`ViewState`] snapshots it publishes.

mod config;
mod error;
mod session;
mod status;
mod view;

pub use config::SessionConfig;
pub use counter_ethereum::contract::WriteOperation;
pub use error::SessionError;
pub use session::{Outcome, Session};
pub use status::{Phase, Status};
pub use view::ViewState;

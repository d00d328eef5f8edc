// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Address, U256};
use serde::{Serialize, Serializer};

use crate::status::Status;

/// What the page displays, derived from the session after every transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// The last value read from the contract, serialized in decimal.
    #[serde(serialize_with = "serialize_decimal")]
    pub counter: U256,
    pub account: Option<Address>,
    pub owner: Option<Address>,
    pub is_owner: bool,
    pub status: Status,
    /// Whether a write is in flight.
    pub busy: bool,
    /// Whether the contract state was loaded.
    pub connected: bool,
    pub can_increment: bool,
    pub can_decrement: bool,
    /// Only the owner may reset. The contract enforces it anyway.
    pub can_reset: bool,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Where the Counter contract lives.
///
/// The page passes it to the session as a JavaScript object, hence the camel case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// The address of the deployed contract.
    pub contract_address: Address,
    /// The chain the contract is deployed on. A wallet connected to another chain is
    /// only reported in the logs.
    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl SessionConfig {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            chain_id: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides access to the Counter contract through an Ethereum wallet.

pub mod client;
pub mod common;
pub mod contract;
#[cfg(not(target_arch = "wasm32"))]
pub mod provider;

/// Helper types for tests.
#[cfg(with_testing)]
pub mod test_utils;

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#[cfg(not(target_arch = "wasm32"))]
use alloy::{providers::PendingTransactionError, rpc::json_rpc};
use alloy_primitives::{Bytes, TxHash};
use alloy_sol_types::{Panic, Revert, SolError};
use thiserror::Error;

/// The EIP-1193 error code of a request rejected by the user.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// The prefix nodes and wallets put in front of a revert reason in error messages.
const EXECUTION_REVERTED: &str = "execution reverted:";

#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet provider was injected into the page
    #[error("no wallet provider is available")]
    NoProvider,

    /// The wallet returned an empty list of accounts
    #[error("the wallet did not authorize any account")]
    NoAccounts,

    /// The user declined the request in the wallet
    #[error("request rejected by the user: {0}")]
    Rejected(String),

    /// JSON-RPC error reported by the wallet provider
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Bytes>,
    },

    /// The transaction was mined but its execution failed
    #[error("transaction {0} was reverted")]
    TransactionReverted(TxHash),

    /// The provider answered something we could not interpret
    #[error("unexpected response from the wallet provider: {0}")]
    UnexpectedResponse(String),

    /// ABI decoding error
    #[error(transparent)]
    SolTypes(#[from] alloy_sol_types::Error),

    /// Hex parsing error
    #[error(transparent)]
    FromHexError(#[from] alloy_primitives::hex::FromHexError),

    /// `serde_json` error
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// RPC error
    #[error(transparent)]
    #[cfg(not(target_arch = "wasm32"))]
    RpcError(#[from] json_rpc::RpcError<alloy::transports::TransportErrorKind>),

    /// Error while waiting for a transaction to be mined
    #[error(transparent)]
    #[cfg(not(target_arch = "wasm32"))]
    PendingTransactionError(#[from] PendingTransactionError),

    /// URL parsing error
    #[error(transparent)]
    #[cfg(not(target_arch = "wasm32"))]
    UrlParseError(#[from] url::ParseError),

    /// Private key parsing error
    #[error(transparent)]
    #[cfg(not(target_arch = "wasm32"))]
    LocalSignerError(#[from] alloy_signer_local::LocalSignerError),
}

impl WalletError {
    /// Builds the error for a failed JSON-RPC request, singling out user rejections.
    pub fn from_rpc(code: i64, message: String, data: Option<Bytes>) -> Self {
        if code == USER_REJECTED_REQUEST {
            WalletError::Rejected(message)
        } else {
            WalletError::Rpc {
                code,
                message,
                data,
            }
        }
    }

    /// Returns a human-readable reason for the failure, if the failure carries one.
    ///
    /// Empty reasons count as none.
    pub fn reason(&self) -> Option<String> {
        let reason = match self {
            WalletError::Rejected(message) => Some(message.clone()),
            WalletError::Rpc { message, data, .. } => data
                .as_ref()
                .and_then(|data| decode_revert_reason(data))
                .filter(|reason| !reason.is_empty())
                .or_else(|| revert_reason_from_message(message)),
            #[cfg(not(target_arch = "wasm32"))]
            WalletError::RpcError(error) => transport_reason(error),
            #[cfg(not(target_arch = "wasm32"))]
            WalletError::PendingTransactionError(PendingTransactionError::TransportError(
                error,
            )) => transport_reason(error),
            _ => None,
        };
        reason.filter(|reason| !reason.trim().is_empty())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn transport_reason(
    error: &json_rpc::RpcError<alloy::transports::TransportErrorKind>,
) -> Option<String> {
    let payload = error.as_error_resp()?;
    payload
        .as_revert_data()
        .and_then(|data| decode_revert_reason(&data))
        .or_else(|| revert_reason_from_message(&payload.message))
}

/// Decodes the output of a reverted call.
///
/// `Error(string)` yields the string itself, `Panic(uint256)` a description of the panic
/// code. Custom errors are not part of the Counter interface and yield `None`.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(revert.reason);
    }
    if let Ok(panic) = Panic::abi_decode(data) {
        return Some(match panic.kind() {
            Some(kind) => kind.as_str().to_string(),
            None => format!("panic code {}", panic.code),
        });
    }
    None
}

/// Extracts the reason from messages of the form `execution reverted: <reason>`.
pub fn revert_reason_from_message(message: &str) -> Option<String> {
    let (_, reason) = message.split_once(EXECUTION_REVERTED)?;
    let reason = reason.trim();
    (!reason.is_empty()).then(|| reason.to_string())
}

/// Finds the revert data in the `data` member of a provider error.
///
/// Wallets either put the hex string there directly, or nest it as
/// `{ data: "0x…" }`, possibly inside an `originalError` object.
pub fn revert_data_from_json(value: &serde_json::Value) -> Option<Bytes> {
    match value {
        serde_json::Value::String(hex) => hex.parse().ok(),
        serde_json::Value::Object(fields) => fields
            .get("data")
            .and_then(revert_data_from_json)
            .or_else(|| fields.get("originalError").and_then(revert_data_from_json)),
        _ => None,
    }
}

//! Error types for hooks and the reference host.

use crate::host::{HookKind, InstanceId};

/// Failure of a signature function.
///
/// The built-in policies surface their encoder errors unchanged. Custom
/// signature functions report their own failures through [`SignatureError::Custom`].
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("JSON signature failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack signature failed: {0}")]
    MessagePack(#[from] rmp_serde::encode::Error),

    #[error("signature failed: {0}")]
    Custom(String),
}

impl SignatureError {
    /// Build a custom signature failure from any message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Errors returned by hooks and by the reference host.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("instance not mounted: {0}")]
    UnknownInstance(InstanceId),

    #[error("hook order changed at slot {index}: expected {expected:?}, found {found:?}")]
    HookOrderChanged {
        index: usize,
        expected: HookKind,
        found: HookKind,
    },

    #[error("slot {index} holds a value of a different type")]
    SlotTypeMismatch { index: usize },

    #[error("rendered {found} hooks, expected {expected}")]
    HookCountChanged { expected: usize, found: usize },

    #[error("instance {instance} exceeded the limit of {limit} hook slots")]
    SlotLimitExceeded { instance: InstanceId, limit: usize },

    #[error("invalid runtime config: {0}")]
    Config(#[source] serde_json::Error),
}

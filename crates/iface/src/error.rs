// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for interface description and dispatch.

use thiserror::Error;

/// Boxed error raised by an executor or a model handle.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for interface operations.
pub type Result<T> = std::result::Result<T, InterfaceError>;

/// Errors raised by type descriptors and the kind registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unknown type kind: {0}")]
    UnknownTypeKind(String),

    #[error("type descriptor has no \"type\" field")]
    MissingTag,

    #[error("type kind already registered: {0}")]
    DuplicateTypeKind(String),

    #[error("invalid {kind} descriptor: {reason}")]
    InvalidDescriptor { kind: String, reason: String },

    #[error("cannot serialize value as {kind}: {reason}")]
    Serialization { kind: String, reason: String },

    #[error("cannot deserialize value as {kind}: {reason}")]
    Deserialization { kind: String, reason: String },

    #[error("cannot infer type: {0}")]
    CannotInfer(String),
}

impl TypeError {
    pub(crate) fn invalid(kind: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn serialization(kind: &str, reason: impl Into<String>) -> Self {
        Self::Serialization {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn deserialization(kind: &str, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while resolving a model by locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("nothing found at {0}")]
    NotFound(String),

    #[error("object at {uri} is a {kind}, not a model")]
    WrongKind { uri: String, kind: String },
}

/// Errors surfaced by interfaces and the dispatcher.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("interface is not loaded")]
    NotLoaded,

    #[error("interface has no loader to resolve {0}")]
    NoLoader(String),

    #[error("nothing found at {0}")]
    NotFound(String),

    #[error("object at {uri} is a {kind}, interfaces can only be created from models")]
    InvalidSourceKind { uri: String, kind: String },

    #[error("interface failed to load from {uri}: {reason}")]
    LoadFailed { uri: String, reason: String },

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("method {method} missing args {}", .missing.join(", "))]
    MissingArguments { method: String, missing: Vec<String> },

    #[error("method {method} got unexpected args {}", .unexpected.join(", "))]
    UnexpectedArguments {
        method: String,
        unexpected: Vec<String>,
    },

    #[error("method already exposed: {0}")]
    DuplicateMethod(String),

    #[error("method {method} declares argument {key} more than once")]
    DuplicateArgument { method: String, key: String },

    #[error("descriptor lists method {key} under signature name {name}")]
    MethodNameMismatch { key: String, name: String },

    #[error("method {method} failed: {source}")]
    ExecutionError {
        method: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Type(#[from] TypeError),
}

impl From<LoaderError> for InterfaceError {
    fn from(e: LoaderError) -> Self {
        match e {
            LoaderError::NotFound(uri) => Self::NotFound(uri),
            LoaderError::WrongKind { uri, kind } => Self::InvalidSourceKind { uri, kind },
        }
    }
}

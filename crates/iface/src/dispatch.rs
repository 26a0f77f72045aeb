// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Argument binding and method invocation.
//!
//! A call arrives as a mapping from argument name to value. Before the
//! executor runs, every declared argument must be present; the values are
//! then bound positionally in signature order. Executor failures are
//! wrapped in [`InterfaceError::ExecutionError`] and never retried.

use crate::error::{BoxError, InterfaceError};
use crate::signature::Signature;
use crate::value::DynamicValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named call arguments.
pub type Arguments = HashMap<String, DynamicValue>;

/// Executor trait for a single method.
///
/// Implement this trait to bind native logic to a method. Arguments are
/// passed positionally, in signature order.
pub trait MethodExecutor: Send + Sync + 'static {
    fn call(&self, args: Vec<DynamicValue>) -> Result<DynamicValue, BoxError>;
}

/// A function-based executor.
impl<F> MethodExecutor for F
where
    F: Fn(Vec<DynamicValue>) -> Result<DynamicValue, BoxError> + Send + Sync + 'static,
{
    fn call(&self, args: Vec<DynamicValue>) -> Result<DynamicValue, BoxError> {
        self(args)
    }
}

/// How keys beyond the declared arguments are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentPolicy {
    /// Extra keys are ignored.
    #[default]
    Tolerant,
    /// Extra keys are rejected with [`InterfaceError::UnexpectedArguments`].
    Strict,
}

/// Check `args` against `signature` and bind them positionally.
pub fn bind_arguments(
    signature: &Signature,
    args: &Arguments,
    policy: ArgumentPolicy,
) -> Result<Vec<DynamicValue>, InterfaceError> {
    let missing: Vec<String> = signature
        .arg_keys()
        .filter(|key| !args.contains_key(*key))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(InterfaceError::MissingArguments {
            method: signature.name().to_string(),
            missing,
        });
    }

    if policy == ArgumentPolicy::Strict {
        let mut unexpected: Vec<String> = args
            .keys()
            .filter(|key| signature.argument(key).is_none())
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort();
            return Err(InterfaceError::UnexpectedArguments {
                method: signature.name().to_string(),
                unexpected,
            });
        }
    }

    Ok(signature
        .arg_keys()
        .filter_map(|key| args.get(key).cloned())
        .collect())
}

/// A method bound to its executor, ready to invoke.
#[derive(Clone)]
pub struct BoundMethod {
    signature: Signature,
    executor: Arc<dyn MethodExecutor>,
    policy: ArgumentPolicy,
}

impl BoundMethod {
    pub fn new(
        signature: Signature,
        executor: Arc<dyn MethodExecutor>,
        policy: ArgumentPolicy,
    ) -> Self {
        Self {
            signature,
            executor,
            policy,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// Validate and bind named arguments, then invoke.
    pub fn call(&self, args: &Arguments) -> Result<DynamicValue, InterfaceError> {
        let positional = bind_arguments(&self.signature, args, self.policy)?;
        self.invoke(positional)
    }

    /// Invoke with arguments already in signature order.
    pub fn call_positional(&self, args: Vec<DynamicValue>) -> Result<DynamicValue, InterfaceError> {
        let declared = self.signature.args().len();
        if args.len() < declared {
            return Err(InterfaceError::MissingArguments {
                method: self.name().to_string(),
                missing: self
                    .signature
                    .arg_keys()
                    .skip(args.len())
                    .map(str::to_string)
                    .collect(),
            });
        }
        if args.len() > declared && self.policy == ArgumentPolicy::Strict {
            return Err(InterfaceError::UnexpectedArguments {
                method: self.name().to_string(),
                unexpected: (declared..args.len()).map(|i| format!("#{}", i)).collect(),
            });
        }

        let mut args = args;
        args.truncate(declared);
        self.invoke(args)
    }

    fn invoke(&self, args: Vec<DynamicValue>) -> Result<DynamicValue, InterfaceError> {
        log::debug!("invoking method '{}' with {} args", self.name(), args.len());
        self.executor.call(args).map_err(|source| {
            log::warn!("method '{}' failed: {}", self.name(), source);
            InterfaceError::ExecutionError {
                method: self.name().to_string(),
                source,
            }
        })
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("signature", &self.signature)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

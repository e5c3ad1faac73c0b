// packages/interpose-engine/src/interception/context.rs
//! Callable types and the contexts handed to hooks
//!
//! `R` is the receiver an operation runs against: an `Object<S>` for
//! instance operations, a `Class<S>` for type-level operations.

use crate::interception::operation_table::OperationTable;
use crate::utils::errors::Result;
use serde_json::Value;
use std::sync::Arc;

/// Trailing block/continuation forwarded through a call
pub type Block<'a> = dyn Fn(&[Value]) -> Result<Value> + 'a;

/// A callable member of an entity
pub type Operation<R> =
    Arc<dyn Fn(&R, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync>;

/// Runs before the operation; its return value is discarded
pub type BeforeHook<R> =
    Arc<dyn Fn(&R, &BeforeCall, Option<&Block<'_>>) -> Result<()> + Send + Sync>;

/// Replaces the operation; its return value becomes the call result
pub type StubHook<R> =
    Arc<dyn Fn(&R, &StubCall<'_, R>, Option<&Block<'_>>) -> Result<Value> + Send + Sync>;

/// Runs after the operation; its return value is discarded
pub type AfterHook<R> = Arc<dyn Fn(&R, &AfterCall) -> Result<()> + Send + Sync>;

/// Short label identifying a receiver in observer reports
pub trait Inspect {
    fn inspect(&self) -> String;
}

/// Context passed to a `before` hook
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeCall {
    pub operation: String,
    pub args: Vec<Value>,
}

/// Context passed to an `after` hook
#[derive(Debug, Clone, PartialEq)]
pub struct AfterCall {
    pub operation: String,
    pub args: Vec<Value>,
    pub result: Value,
}

/// Context passed to a stub
pub struct StubCall<'a, R> {
    /// Handle to the preserved original, bound to the receiver
    pub original: OriginalCall<'a, R>,
    pub args: Vec<Value>,
}

/// Bound handle to the original implementation of an intercepted operation
pub struct OriginalCall<'a, R> {
    pub(crate) receiver: &'a R,
    pub(crate) table: &'a OperationTable<R>,
    pub(crate) origin: super::operation_table::Origin<R>,
    pub(crate) operation: &'a str,
}

impl<'a, R> OriginalCall<'a, R> {
    /// Name of the intercepted operation
    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Call through to the original implementation
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.call_with_block(args, None)
    }

    pub fn call_with_block(&self, args: &[Value], block: Option<&Block<'_>>) -> Result<Value> {
        self.origin
            .call(self.table, self.receiver, self.operation, args, block)
    }
}

/// Box a closure as an [`Operation`]
pub fn operation_fn<R, F>(f: F) -> Operation<R>
where
    F: Fn(&R, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Box a closure as a [`BeforeHook`]
pub fn before_fn<R, F>(f: F) -> BeforeHook<R>
where
    F: Fn(&R, &BeforeCall, Option<&Block<'_>>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Box a closure as a [`StubHook`]
pub fn stub_fn<R, F>(f: F) -> StubHook<R>
where
    F: Fn(&R, &StubCall<'_, R>, Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Box a closure as an [`AfterHook`]
pub fn after_fn<R, F>(f: F) -> AfterHook<R>
where
    F: Fn(&R, &AfterCall) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

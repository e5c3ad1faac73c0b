// packages/interpose-engine/src/interception/operation_table.rs
//! Operation table: the member set of one entity
//!
//! Maps operation names to either a plain callable or a wrapper record.
//! Tables are shared handles; clones alias the same entries. An optional
//! parent table forms the lookup chain (instance side-table -> class ->
//! superclass).

use crate::interception::context::{AfterHook, BeforeHook, Block, Operation, StubHook};
use crate::interception::dispatcher;
use crate::interception::hook_kind::{self, HookKind};
use crate::utils::errors::{EngineError, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

type Entries<R> = HashMap<String, Entry<R>>;

/// Where the preserved original of a wrapped operation lives
pub(crate) enum Origin<R> {
    /// Defined in this table before wrapping began
    Local(Operation<R>),
    /// Reached through the parent chain; called through it at call time
    Inherited,
}

impl<R> Clone for Origin<R> {
    fn clone(&self) -> Self {
        match self {
            Origin::Local(op) => Origin::Local(Arc::clone(op)),
            Origin::Inherited => Origin::Inherited,
        }
    }
}

impl<R> Origin<R> {
    pub(crate) fn call(
        &self,
        table: &OperationTable<R>,
        receiver: &R,
        operation: &str,
        args: &[Value],
        block: Option<&Block<'_>>,
    ) -> Result<Value> {
        match self {
            Origin::Local(op) => op(receiver, args, block),
            Origin::Inherited => match &table.parent {
                Some(parent) => parent.invoke_with_block(receiver, operation, args, block),
                None => Err(table.unknown(operation)),
            },
        }
    }
}

/// Behaviors registered on a wrapped operation
pub(crate) struct Hooks<R> {
    pub(crate) before: Option<BeforeHook<R>>,
    pub(crate) after: Option<AfterHook<R>>,
    pub(crate) stub: Option<StubHook<R>>,
}

impl<R> Default for Hooks<R> {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
            stub: None,
        }
    }
}

impl<R> Hooks<R> {
    pub(crate) fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.stub.is_none()
    }

    pub(crate) fn contains(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::Before => self.before.is_some(),
            HookKind::After => self.after.is_some(),
            HookKind::Stub => self.stub.is_some(),
            HookKind::Origin => true,
        }
    }

    /// Remove the behavior for `kind`; returns whether one was present
    pub(crate) fn clear(&mut self, kind: HookKind) -> bool {
        match kind {
            HookKind::Before => self.before.take().is_some(),
            HookKind::After => self.after.take().is_some(),
            HookKind::Stub => self.stub.take().is_some(),
            HookKind::Origin => false,
        }
    }
}

/// Wrapper record of an intercepted operation
pub(crate) struct Wrapper<R> {
    pub(crate) origin: Origin<R>,
    pub(crate) hooks: Hooks<R>,
}

impl<R> Wrapper<R> {
    /// Kinds present, `Origin` included
    fn kinds(&self) -> Vec<HookKind> {
        HookKind::ALL
            .into_iter()
            .filter(|kind| self.hooks.contains(*kind))
            .collect()
    }
}

pub(crate) enum Entry<R> {
    Plain(Operation<R>),
    Wrapped(Wrapper<R>),
}

/// Snapshot taken under the read lock before a call
enum Resolved<R> {
    Plain(Operation<R>),
    Wrapped(Origin<R>),
}

/// Operation table of one entity
pub struct OperationTable<R> {
    /// Owner label used in errors and logs (e.g. "Foo", "#<Foo>")
    owner: Arc<str>,

    entries: Arc<RwLock<Entries<R>>>,

    /// Next table in the lookup chain
    parent: Option<Box<OperationTable<R>>>,
}

impl<R> Clone for OperationTable<R> {
    fn clone(&self) -> Self {
        Self {
            owner: Arc::clone(&self.owner),
            entries: Arc::clone(&self.entries),
            parent: self.parent.clone(),
        }
    }
}

impl<R> OperationTable<R> {
    /// Create an empty table
    pub fn new(owner: impl Into<Arc<str>>) -> Self {
        Self {
            owner: owner.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
            parent: None,
        }
    }

    /// Create an empty table that falls back to `parent` on lookup
    pub fn with_parent(owner: impl Into<Arc<str>>, parent: &OperationTable<R>) -> Self {
        Self {
            parent: Some(Box::new(parent.clone())),
            ..Self::new(owner)
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn parent(&self) -> Option<&OperationTable<R>> {
        self.parent.as_deref()
    }

    /// True if both handles alias the same entries
    pub fn ptr_eq(&self, other: &OperationTable<R>) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Define or replace an operation
    ///
    /// Redefining an intercepted operation replaces its preserved original;
    /// registered hooks keep applying.
    pub fn define<F>(&self, name: &str, operation: F) -> Result<()>
    where
        F: Fn(&R, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
    {
        self.define_operation(name, Arc::new(operation))
    }

    pub fn define_operation(&self, name: &str, operation: Operation<R>) -> Result<()> {
        if hook_kind::is_reserved(name) {
            return Err(EngineError::ReservedName(name.to_string()));
        }

        let mut entries = self.entries.write();
        match entries.get_mut(name) {
            Some(Entry::Wrapped(wrapper)) => {
                debug!("Redefining intercepted operation {}::{}", self.owner, name);
                wrapper.origin = Origin::Local(operation);
            }
            _ => {
                debug!("Defining operation {}::{}", self.owner, name);
                entries.insert(name.to_string(), Entry::Plain(operation));
            }
        }
        Ok(())
    }

    /// True if `name` is defined in this table itself
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// True if `name` resolves here or anywhere up the lookup chain
    pub fn resolves(&self, name: &str) -> bool {
        self.contains(name) || self.parent.as_ref().is_some_and(|p| p.resolves(name))
    }

    /// Call `name` against `receiver`
    pub fn invoke(&self, receiver: &R, name: &str, args: &[Value]) -> Result<Value> {
        self.invoke_with_block(receiver, name, args, None)
    }

    /// Call `name` against `receiver`, forwarding a trailing block
    pub fn invoke_with_block(
        &self,
        receiver: &R,
        name: &str,
        args: &[Value],
        block: Option<&Block<'_>>,
    ) -> Result<Value> {
        // Lock is released before anything runs; behaviors may re-enter.
        let resolved = {
            let entries = self.entries.read();
            match entries.get(name) {
                Some(Entry::Plain(op)) => Some(Resolved::Plain(Arc::clone(op))),
                Some(Entry::Wrapped(wrapper)) => Some(Resolved::Wrapped(wrapper.origin.clone())),
                None => None,
            }
        };

        match resolved {
            Some(Resolved::Plain(op)) => op(receiver, args, block),
            Some(Resolved::Wrapped(origin)) => {
                dispatcher::dispatch(self, receiver, name, origin, args, block)
            }
            None => match &self.parent {
                Some(parent) => parent.invoke_with_block(receiver, name, args, block),
                None => Err(self.unknown(name)),
            },
        }
    }

    /// Every member name defined in this table, wrapper members included
    pub fn member_names(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut names = Vec::with_capacity(entries.len());
        for (name, entry) in entries.iter() {
            names.push(name.clone());
            if let Entry::Wrapped(wrapper) = entry {
                names.extend(
                    wrapper
                        .kinds()
                        .into_iter()
                        .map(|kind| hook_kind::member_name(kind, name)),
                );
            }
        }
        names.sort();
        names
    }

    /// True if `member` (ordinary or wrapper member name) is defined here
    pub fn has_member(&self, member: &str) -> bool {
        match hook_kind::parse_member_name(member) {
            Some((kind, operation)) => self.hook_kinds(operation).contains(&kind),
            None => self.contains(member),
        }
    }

    /// Operations in this table that currently carry a wrapper
    pub fn wrapped_operations(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut names: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Wrapped(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn is_wrapped(&self, operation: &str) -> bool {
        matches!(self.entries.read().get(operation), Some(Entry::Wrapped(_)))
    }

    /// Kinds present on `operation`, `Origin` included; empty when plain
    pub fn hook_kinds(&self, operation: &str) -> Vec<HookKind> {
        match self.entries.read().get(operation) {
            Some(Entry::Wrapped(wrapper)) => wrapper.kinds(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn entries(&self) -> &RwLock<Entries<R>> {
        &self.entries
    }

    pub(crate) fn downgrade(&self) -> WeakTable<R> {
        WeakTable {
            entries: Arc::downgrade(&self.entries),
        }
    }

    pub(crate) fn before_hook(&self, operation: &str) -> Option<BeforeHook<R>> {
        self.with_hooks(operation, |hooks| hooks.before.clone())
    }

    pub(crate) fn stub_hook(&self, operation: &str) -> Option<StubHook<R>> {
        self.with_hooks(operation, |hooks| hooks.stub.clone())
    }

    pub(crate) fn after_hook(&self, operation: &str) -> Option<AfterHook<R>> {
        self.with_hooks(operation, |hooks| hooks.after.clone())
    }

    fn with_hooks<T>(&self, operation: &str, f: impl FnOnce(&Hooks<R>) -> Option<T>) -> Option<T> {
        match self.entries.read().get(operation) {
            Some(Entry::Wrapped(wrapper)) => f(&wrapper.hooks),
            _ => None,
        }
    }

    pub(crate) fn unknown(&self, operation: &str) -> EngineError {
        EngineError::UnknownOperation {
            owner: self.owner.to_string(),
            operation: operation.to_string(),
        }
    }
}

impl<R> fmt::Debug for OperationTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationTable")
            .field("owner", &self.owner)
            .field("members", &self.member_names())
            .finish()
    }
}

/// Non-owning handle to a table, for behaviors stored inside that table
pub(crate) struct WeakTable<R> {
    entries: Weak<RwLock<Entries<R>>>,
}

impl<R> WeakTable<R> {
    pub(crate) fn has_hook(&self, operation: &str, kind: HookKind) -> bool {
        let Some(entries) = self.entries.upgrade() else {
            return false;
        };
        let entries = entries.read();
        matches!(entries.get(operation), Some(Entry::Wrapped(w)) if w.hooks.contains(kind))
    }
}

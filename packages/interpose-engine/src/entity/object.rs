// packages/interpose-engine/src/entity/object.rs
//! Instance entity

use crate::entity::class::Class;
use crate::interception::context::{Block, Inspect};
use crate::interception::operation_table::OperationTable;
use crate::utils::errors::Result;
use serde_json::Value;
use std::fmt;

/// An instance of a [`Class`] with state `S`
///
/// Its side-table holds operations (and wrappers) visible to this
/// instance only.
pub struct Object<S> {
    class: Class<S>,
    singleton: OperationTable<Object<S>>,
    state: S,
}

impl<S> Object<S> {
    pub(crate) fn new(class: Class<S>, state: S) -> Self {
        let singleton = OperationTable::with_parent(format!("#<{}>", class.name()), class.methods());
        Self {
            class,
            singleton,
            state,
        }
    }

    pub fn class(&self) -> &Class<S> {
        &self.class
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Per-instance side-table
    pub fn singleton_methods(&self) -> &OperationTable<Object<S>> {
        &self.singleton
    }

    /// Define an operation on this instance only
    pub fn define_singleton_method<F>(&self, name: &str, operation: F) -> Result<&Self>
    where
        F: Fn(&Object<S>, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
    {
        self.singleton.define(name, operation)?;
        Ok(self)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.singleton.invoke(self, name, args)
    }

    pub fn call_with_block(
        &self,
        name: &str,
        args: &[Value],
        block: &Block<'_>,
    ) -> Result<Value> {
        self.singleton.invoke_with_block(self, name, args, Some(block))
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.singleton.resolves(name)
    }
}

impl<S> Inspect for Object<S> {
    fn inspect(&self) -> String {
        format!("#<{}:{:p}>", self.class.name(), self)
    }
}

impl<S: fmt::Debug> fmt::Debug for Object<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class.name())
            .field("state", &self.state)
            .finish()
    }
}

// packages/interpose-engine/src/facade.rs
//! Interceptor facade
//!
//! Resolves which tables a target's operations live in and exposes two
//! method groups over the same engine: `before`/`after`/`stub`/`restore`
//! for instance operations and `cbefore`/`cafter`/`cstub`/`crestore` for
//! type-level operations.
//!
//! | target        | instance group wraps          | type group wraps           |
//! |---------------|-------------------------------|----------------------------|
//! | `&Object<S>`  | the object's side-table       | its class's type-level ops |
//! | `&Class<S>`   | the class's instance methods  | the class's type-level ops |

use crate::entity::{Class, Object};
use crate::interception::context::{
    after_fn, before_fn, stub_fn, AfterCall, BeforeCall, Block, StubCall,
};
use crate::interception::engine::InterceptionEngine;
use crate::interception::hook_kind::HookKind;
use crate::utils::config::{EngineConfig, ObserverConfig};
use crate::utils::errors::Result;
use serde_json::Value;

/// Entity an [`Interceptor`] operates on
pub enum Target<'a, S> {
    /// Wrapping affects exactly this instance
    Instance(&'a Object<S>),
    /// Wrapping affects the type and every instance without its own override
    Type(&'a Class<S>),
}

impl<'a, S> From<&'a Object<S>> for Target<'a, S> {
    fn from(object: &'a Object<S>) -> Self {
        Target::Instance(object)
    }
}

impl<'a, S> From<&'a Class<S>> for Target<'a, S> {
    fn from(class: &'a Class<S>) -> Self {
        Target::Type(class)
    }
}

/// Attaches and removes interception on one target
pub struct Interceptor<S> {
    instance: InterceptionEngine<Object<S>>,
    class: InterceptionEngine<Class<S>>,
}

impl<S: 'static> Interceptor<S> {
    /// Create an interceptor with default observer settings
    pub fn new<'a>(target: impl Into<Target<'a, S>>) -> Self {
        Self::with_observer(target, ObserverConfig::default())
    }

    /// Create an interceptor whose default observers follow `config`
    pub fn with_config<'a>(target: impl Into<Target<'a, S>>, config: &EngineConfig) -> Self {
        Self::with_observer(target, config.observer.clone())
    }

    fn with_observer<'a>(target: impl Into<Target<'a, S>>, observer: ObserverConfig) -> Self {
        let (instance_table, class_table) = match target.into() {
            Target::Instance(object) => (
                object.singleton_methods().clone(),
                object.class().class_methods().clone(),
            ),
            Target::Type(class) => (class.methods().clone(), class.class_methods().clone()),
        };

        Self {
            instance: InterceptionEngine::with_observer(instance_table, observer.clone()),
            class: InterceptionEngine::with_observer(class_table, observer),
        }
    }

    /// Engine for instance operations
    pub fn instance_engine(&self) -> &InterceptionEngine<Object<S>> {
        &self.instance
    }

    /// Engine for type-level operations
    pub fn class_engine(&self) -> &InterceptionEngine<Class<S>> {
        &self.class
    }

    pub fn before<F>(&self, operation: &str, hook: F) -> Result<&Self>
    where
        F: Fn(&Object<S>, &BeforeCall, Option<&Block<'_>>) -> Result<()> + Send + Sync + 'static,
    {
        self.instance.attach_before(operation, Some(before_fn(hook)))?;
        Ok(self)
    }

    pub fn after<F>(&self, operation: &str, hook: F) -> Result<&Self>
    where
        F: Fn(&Object<S>, &AfterCall) -> Result<()> + Send + Sync + 'static,
    {
        self.instance.attach_after(operation, Some(after_fn(hook)))?;
        Ok(self)
    }

    pub fn stub<F>(&self, operation: &str, stub: F) -> Result<&Self>
    where
        F: Fn(&Object<S>, &StubCall<'_, Object<S>>, Option<&Block<'_>>) -> Result<Value>
            + Send
            + Sync
            + 'static,
    {
        self.instance.attach_stub(operation, Some(stub_fn(stub)))?;
        Ok(self)
    }

    /// Attach the default before observer
    pub fn observe_before(&self, operation: &str) -> Result<&Self> {
        self.instance.attach_before(operation, None)?;
        Ok(self)
    }

    /// Attach the default after observer
    pub fn observe_after(&self, operation: &str) -> Result<&Self> {
        self.instance.attach_after(operation, None)?;
        Ok(self)
    }

    /// Detach `kinds` (all when empty) from an instance operation
    pub fn restore(&self, operation: Option<&str>, kinds: &[HookKind]) -> Result<&Self> {
        self.instance.detach(operation, kinds)?;
        Ok(self)
    }

    /// Remove every instance-operation wrapper
    pub fn restore_all(&self) -> &Self {
        self.instance.detach_all();
        self
    }

    pub fn cbefore<F>(&self, operation: &str, hook: F) -> Result<&Self>
    where
        F: Fn(&Class<S>, &BeforeCall, Option<&Block<'_>>) -> Result<()> + Send + Sync + 'static,
    {
        self.class.attach_before(operation, Some(before_fn(hook)))?;
        Ok(self)
    }

    pub fn cafter<F>(&self, operation: &str, hook: F) -> Result<&Self>
    where
        F: Fn(&Class<S>, &AfterCall) -> Result<()> + Send + Sync + 'static,
    {
        self.class.attach_after(operation, Some(after_fn(hook)))?;
        Ok(self)
    }

    pub fn cstub<F>(&self, operation: &str, stub: F) -> Result<&Self>
    where
        F: Fn(&Class<S>, &StubCall<'_, Class<S>>, Option<&Block<'_>>) -> Result<Value>
            + Send
            + Sync
            + 'static,
    {
        self.class.attach_stub(operation, Some(stub_fn(stub)))?;
        Ok(self)
    }

    pub fn cobserve_before(&self, operation: &str) -> Result<&Self> {
        self.class.attach_before(operation, None)?;
        Ok(self)
    }

    pub fn cobserve_after(&self, operation: &str) -> Result<&Self> {
        self.class.attach_after(operation, None)?;
        Ok(self)
    }

    /// Detach `kinds` (all when empty) from a type-level operation
    pub fn crestore(&self, operation: Option<&str>, kinds: &[HookKind]) -> Result<&Self> {
        self.class.detach(operation, kinds)?;
        Ok(self)
    }

    pub fn crestore_all(&self) -> &Self {
        self.class.detach_all();
        self
    }
}

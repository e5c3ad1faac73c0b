// packages/interpose-engine/src/entity/class.rs
//! Type entity

use crate::entity::object::Object;
use crate::interception::context::{Block, Inspect};
use crate::interception::operation_table::OperationTable;
use crate::utils::errors::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

struct ClassInner<S> {
    name: String,
    superclass: Option<Class<S>>,

    /// Operations run against instances
    methods: OperationTable<Object<S>>,

    /// Type-level operations run against the class itself
    class_methods: OperationTable<Class<S>>,
}

/// A type whose instances carry state `S`
///
/// Cloning yields another handle to the same type.
pub struct Class<S> {
    inner: Arc<ClassInner<S>>,
}

impl<S> Clone for Class<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Class<S> {
    /// Create a root type
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            inner: Arc::new(ClassInner {
                methods: OperationTable::new(name.as_str()),
                class_methods: OperationTable::new(format!("{}.class", name)),
                superclass: None,
                name,
            }),
        }
    }

    /// Create a type inheriting this one's instance and type-level operations
    pub fn subclass(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            inner: Arc::new(ClassInner {
                methods: OperationTable::with_parent(name.as_str(), &self.inner.methods),
                class_methods: OperationTable::with_parent(
                    format!("{}.class", name),
                    &self.inner.class_methods,
                ),
                superclass: Some(self.clone()),
                name,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn superclass(&self) -> Option<&Class<S>> {
        self.inner.superclass.as_ref()
    }

    pub fn methods(&self) -> &OperationTable<Object<S>> {
        &self.inner.methods
    }

    pub fn class_methods(&self) -> &OperationTable<Class<S>> {
        &self.inner.class_methods
    }

    /// Define an instance operation
    pub fn define_method<F>(&self, name: &str, operation: F) -> Result<&Self>
    where
        F: Fn(&Object<S>, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.methods.define(name, operation)?;
        Ok(self)
    }

    /// Define a type-level operation
    pub fn define_class_method<F>(&self, name: &str, operation: F) -> Result<&Self>
    where
        F: Fn(&Class<S>, &[Value], Option<&Block<'_>>) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.class_methods.define(name, operation)?;
        Ok(self)
    }

    /// Call a type-level operation
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.inner.class_methods.invoke(self, name, args)
    }

    pub fn call_with_block(
        &self,
        name: &str,
        args: &[Value],
        block: &Block<'_>,
    ) -> Result<Value> {
        self.inner
            .class_methods
            .invoke_with_block(self, name, args, Some(block))
    }

    /// True if the type-level operation `name` resolves
    pub fn responds_to(&self, name: &str) -> bool {
        self.inner.class_methods.resolves(name)
    }

    /// True if instances resolve `name` through this type
    pub fn method_defined(&self, name: &str) -> bool {
        self.inner.methods.resolves(name)
    }

    pub fn new_instance(&self, state: S) -> Object<S> {
        Object::new(self.clone(), state)
    }

    pub fn ptr_eq(&self, other: &Class<S>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Inspect for Class<S> {
    fn inspect(&self) -> String {
        self.inner.name.clone()
    }
}

impl<S> fmt::Debug for Class<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.inner.name)
            .field("superclass", &self.superclass().map(|c| c.name()))
            .finish()
    }
}

// packages/interpose-engine/src/interception/engine.rs
//! Interception engine: installs, composes and uninstalls wrappers
//!
//! An engine is bound to one operation table (one scope target). Wrapper
//! installation preserves the original and registers the first behavior
//! under a single write lock, so a failed attach leaves the table
//! untouched. Uninstallation puts the original back under its own name.
//!
//! Attach/detach calls on the same table are not coordinated with each
//! other; callers serialize them.

use crate::interception::context::{AfterHook, BeforeHook, Inspect, StubHook};
use crate::interception::default_hooks::{self, Observer};
use crate::interception::hook_kind::HookKind;
use crate::interception::operation_table::{Entry, Hooks, OperationTable, Origin, Wrapper};
use crate::observability::{INSTALL_COUNTER, UNINSTALL_COUNTER};
use crate::utils::config::ObserverConfig;
use crate::utils::errors::{EngineError, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Interception engine for one scope target
pub struct InterceptionEngine<R> {
    table: OperationTable<R>,
    observer: ObserverConfig,
}

impl<R: Inspect + 'static> InterceptionEngine<R> {
    /// Create an engine over `table` with default observer settings
    pub fn new(table: OperationTable<R>) -> Self {
        Self::with_observer(table, ObserverConfig::default())
    }

    pub fn with_observer(table: OperationTable<R>, observer: ObserverConfig) -> Self {
        Self { table, observer }
    }

    pub fn table(&self) -> &OperationTable<R> {
        &self.table
    }

    /// Attach a before hook; `None` installs the default observer
    pub fn attach_before(&self, operation: &str, hook: Option<BeforeHook<R>>) -> Result<()> {
        let hook = hook.unwrap_or_else(|| default_hooks::before_hook(self.observer()));
        self.attach(operation, HookKind::Before, move |hooks| hooks.before = Some(hook))
    }

    /// Attach an after hook; `None` installs the default observer
    pub fn attach_after(&self, operation: &str, hook: Option<AfterHook<R>>) -> Result<()> {
        let hook = hook.unwrap_or_else(|| {
            default_hooks::after_hook(self.observer(), self.table.downgrade())
        });
        self.attach(operation, HookKind::After, move |hooks| hooks.after = Some(hook))
    }

    /// Replace an operation; a stub has no default behavior
    pub fn attach_stub(&self, operation: &str, hook: Option<StubHook<R>>) -> Result<()> {
        let hook = hook.ok_or_else(|| EngineError::MissingBehavior(operation.to_string()))?;
        self.attach(operation, HookKind::Stub, move |hooks| hooks.stub = Some(hook))
    }

    /// Detach `kinds` from `operation`
    ///
    /// Without a name, the single intercepted operation is used. Without
    /// kinds, every attachable kind is detached. Once no behavior remains
    /// the original is restored under its own name.
    pub fn detach(&self, operation: Option<&str>, kinds: &[HookKind]) -> Result<()> {
        if let Some(invalid) = kinds.iter().find(|kind| !kind.is_attachable()) {
            return Err(EngineError::InvalidHookKind(invalid.to_string()));
        }

        let mut kinds = if kinds.is_empty() {
            HookKind::ATTACHABLE.to_vec()
        } else {
            kinds.to_vec()
        };
        kinds.sort();
        kinds.dedup();

        let operation = match operation {
            Some(name) => name.to_string(),
            None => self.sole_wrapped_operation()?,
        };

        let mut entries = self.table.entries().write();
        let wrapper = match entries.get_mut(&operation) {
            Some(Entry::Wrapped(wrapper)) => wrapper,
            _ => {
                return Err(EngineError::MissingTarget(format!(
                    "`{}` is not intercepted on {}",
                    operation,
                    self.table.owner()
                )))
            }
        };

        for kind in kinds {
            if wrapper.hooks.clear(kind) {
                debug!("Detached {} hook from {}::{}", kind, self.table.owner(), operation);
            }
        }

        if wrapper.hooks.is_empty() {
            if let Some(Entry::Wrapped(wrapper)) = entries.remove(&operation) {
                self.restore_origin(&mut entries, &operation, wrapper.origin);
            }
        }

        Ok(())
    }

    /// Uninstall every wrapper in the table
    pub fn detach_all(&self) {
        let mut entries = self.table.entries().write();
        let wrapped: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Wrapped(_)))
            .map(|(name, _)| name.clone())
            .collect();

        for operation in wrapped {
            if let Some(Entry::Wrapped(wrapper)) = entries.remove(&operation) {
                self.restore_origin(&mut entries, &operation, wrapper.origin);
            }
        }
    }

    pub fn wrapped_operations(&self) -> Vec<String> {
        self.table.wrapped_operations()
    }

    pub fn is_wrapped(&self, operation: &str) -> bool {
        self.table.is_wrapped(operation)
    }

    /// Install the wrapper if needed, then register one behavior
    fn attach(
        &self,
        operation: &str,
        kind: HookKind,
        register: impl FnOnce(&mut Hooks<R>),
    ) -> Result<()> {
        let mut entries = self.table.entries().write();

        let mut wrapper = match entries.remove(operation) {
            Some(Entry::Wrapped(wrapper)) => wrapper,
            Some(Entry::Plain(op)) => self.installed(operation, Origin::Local(op)),
            None if self.table.parent().is_some_and(|p| p.resolves(operation)) => {
                self.installed(operation, Origin::Inherited)
            }
            None => return Err(self.table.unknown(operation)),
        };

        register(&mut wrapper.hooks);
        entries.insert(operation.to_string(), Entry::Wrapped(wrapper));

        debug!("Attached {} hook to {}::{}", kind, self.table.owner(), operation);
        Ok(())
    }

    fn installed(&self, operation: &str, origin: Origin<R>) -> Wrapper<R> {
        metrics::counter!(INSTALL_COUNTER).increment(1);
        info!("Installed interception for {}::{}", self.table.owner(), operation);

        Wrapper {
            origin,
            hooks: Hooks::default(),
        }
    }

    /// Put the original back; inherited originals just drop the entry
    fn restore_origin(
        &self,
        entries: &mut HashMap<String, Entry<R>>,
        operation: &str,
        origin: Origin<R>,
    ) {
        if let Origin::Local(op) = origin {
            entries.insert(operation.to_string(), Entry::Plain(op));
        }

        metrics::counter!(UNINSTALL_COUNTER).increment(1);
        info!("Restored original {}::{}", self.table.owner(), operation);
    }

    fn sole_wrapped_operation(&self) -> Result<String> {
        let mut wrapped = self.table.wrapped_operations();
        match wrapped.len() {
            1 => Ok(wrapped.remove(0)),
            0 => Err(EngineError::MissingTarget(format!(
                "no intercepted operation on {}",
                self.table.owner()
            ))),
            _ => Err(EngineError::AmbiguousTarget {
                owner: self.table.owner().to_string(),
                candidates: wrapped,
            }),
        }
    }

    fn observer(&self) -> Observer {
        Observer::new(self.observer.clone())
    }
}

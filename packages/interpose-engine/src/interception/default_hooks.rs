// packages/interpose-engine/src/interception/default_hooks.rs
//! Default before/after observers
//!
//! Installed when a hook is attached without an explicit behavior. They
//! only report the call through `tracing` and never touch the result.
//! Receivers are labelled through [`Inspect`].

use crate::interception::context::{
    after_fn, before_fn, AfterCall, AfterHook, BeforeCall, BeforeHook, Inspect,
};
use crate::interception::hook_kind::HookKind;
use crate::interception::operation_table::WeakTable;
use crate::utils::config::{ObserverConfig, ReportLevel};
use serde_json::Value;
use tracing::{debug, info, trace};

/// Formats and emits observer reports
#[derive(Debug, Clone)]
pub(crate) struct Observer {
    config: ObserverConfig,
}

impl Observer {
    pub(crate) fn new(config: ObserverConfig) -> Self {
        Self { config }
    }

    fn call_line(&self, receiver: &str, operation: &str) -> String {
        if self.config.timestamps {
            let now = chrono::Local::now();
            format!(
                "[{}] call `{}' ({})",
                now.format("%Y-%m-%d %H:%M:%S%.3f"),
                operation,
                receiver
            )
        } else {
            format!("call `{}' ({})", operation, receiver)
        }
    }

    pub(crate) fn before_lines(&self, receiver: &str, call: &BeforeCall) -> Vec<String> {
        let mut lines = vec![self.call_line(receiver, &call.operation)];
        if self.config.show_args && !call.args.is_empty() {
            lines.push(format!("args: {}", Value::Array(call.args.clone())));
        }
        lines
    }

    /// The call line is skipped when a before hook already reported it
    pub(crate) fn after_lines(
        &self,
        receiver: &str,
        call: &AfterCall,
        before_registered: bool,
    ) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if !before_registered {
            lines.push(self.call_line(receiver, &call.operation));
        }
        if self.config.show_return {
            lines.push(format!("return: {}", call.result));
        }
        lines
    }

    fn emit(&self, lines: &[String]) {
        for line in lines {
            match self.config.level {
                ReportLevel::Trace => trace!(target: "interpose_engine::observer", "{}", line),
                ReportLevel::Debug => debug!(target: "interpose_engine::observer", "{}", line),
                ReportLevel::Info => info!(target: "interpose_engine::observer", "{}", line),
            }
        }
    }
}

pub(crate) fn before_hook<R: Inspect + 'static>(observer: Observer) -> BeforeHook<R> {
    before_fn(move |receiver: &R, call, _| {
        observer.emit(&observer.before_lines(&receiver.inspect(), call));
        Ok(())
    })
}

pub(crate) fn after_hook<R: Inspect + 'static>(
    observer: Observer,
    table: WeakTable<R>,
) -> AfterHook<R> {
    after_fn(move |receiver: &R, call| {
        let before_registered = table.has_hook(&call.operation, HookKind::Before);
        observer.emit(&observer.after_lines(&receiver.inspect(), call, before_registered));
        Ok(())
    })
}

// packages/interpose-engine/src/interception/mod.rs
//! Operation interception layer
//!
//! Attaches before/after/stub behaviors to named operations of an entity
//! without touching the operation's own definition:
//!
//! - **Operation Table**: per-entity member set, `Plain | Wrapped`
//! - **Hook Kind**: `before`, `after`, `stub` plus the internal `origin`
//!   marker, and the reserved member naming convention
//! - **Engine**: wrapper installation, composition and restoration
//! - **Dispatcher**: call-time chain of an intercepted operation
//! - **Default Hooks**: diagnostic observers used when no behavior is given
//!
//! # Architecture
//!
//! ```text
//! caller ─ invoke("op") ─→ OperationTable
//!                             │
//!                             ├─ Plain(op)     → op(args)
//!                             └─ Wrapped       → before(args)
//!                                                  ↓
//!                                               stub(original, args) | origin(args)
//!                                                  ↓
//!                                               after(args, result)
//! ```

pub mod context;
pub(crate) mod default_hooks;
pub(crate) mod dispatcher;
pub mod engine;
pub mod hook_kind;
pub mod operation_table;

// Re-export commonly used types
pub use context::{
    after_fn, before_fn, operation_fn, stub_fn, AfterCall, AfterHook, BeforeCall, BeforeHook,
    Block, Inspect, Operation, OriginalCall, StubCall, StubHook,
};
pub use engine::InterceptionEngine;
pub use hook_kind::{member_name, parse_member_name, HookKind, MEMBER_PREFIX};
pub use operation_table::OperationTable;

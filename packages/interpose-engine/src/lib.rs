// packages/interpose-engine/src/lib.rs
//! Interpose Engine Library
//!
//! Attach behavior to an existing operation of an instance or a type
//! without modifying its definition: run code *before* it, *after* it, or
//! *replace* it with a stub that can still reach the original. Every
//! attached behavior can be removed again, selectively or all at once,
//! restoring the original operation under its own name.
//!
//! # Architecture
//!
//! - **entity**: `Class` and `Object`, the entities that own operation tables
//! - **interception**: operation tables, wrapper installation, dispatch
//! - **facade**: `Interceptor`, the instance/type-level entry points
//! - **observability**: tracing and metrics setup
//! - **utils**: configuration and error types
//!
//! # Example
//!
//! ```
//! use interpose_engine::{Class, Interceptor};
//! use serde_json::json;
//!
//! let class: Class<()> = Class::new("Greeter");
//! class.define_method("greet", |_, args, _| Ok(json!(format!("hello {}", args[0]))))?;
//!
//! let object = class.new_instance(());
//! let interceptor = Interceptor::new(&object);
//! interceptor.stub("greet", |_, call, _| {
//!     let original = call.original.call(&call.args)?;
//!     Ok(json!([original, "stubbed"]))
//! })?;
//! assert_eq!(object.call("greet", &[json!(1)])?, json!(["hello 1", "stubbed"]));
//!
//! interceptor.restore(Some("greet"), &[])?;
//! assert_eq!(object.call("greet", &[json!(1)])?, json!("hello 1"));
//! # Ok::<(), interpose_engine::EngineError>(())
//! ```

// Public module exports
pub mod entity;
pub mod facade;
pub mod interception;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use entity::{Class, Object};
pub use facade::{Interceptor, Target};
pub use interception::{HookKind, Inspect, InterceptionEngine, OperationTable};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// packages/interpose-engine/src/entity/mod.rs
//! Entities that own operation tables
//!
//! - **Class**: a type with instance-method and type-level tables; a
//!   subclass's tables chain to its superclass's
//! - **Object**: an instance with its own state and a per-instance
//!   side-table consulted before its class
//!
//! Lookup order for an instance call:
//!
//! ```text
//! Object side-table → Class methods → Superclass methods → ...
//! ```

pub mod class;
pub mod object;

pub use class::Class;
pub use object::Object;

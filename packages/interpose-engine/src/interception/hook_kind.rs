// packages/interpose-engine/src/interception/hook_kind.rs
//! Hook kinds and the wrapper member naming convention
//!
//! Every wrapper-related member of an intercepted operation has a canonical
//! name derived from `(kind, operation)`. The prefix cannot appear in an
//! ordinary operation name (tables reject it), so the names never collide
//! and can be parsed back for enumeration.

use crate::utils::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved prefix of every wrapper member name
pub const MEMBER_PREFIX: &str = "===>(interpose) ";

/// Kind of behavior attached to an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Before,
    After,
    Stub,
    /// Marks the preserved original implementation; never user-attachable
    Origin,
}

impl HookKind {
    /// Kinds a caller may attach or detach
    pub const ATTACHABLE: [HookKind; 3] = [HookKind::Before, HookKind::After, HookKind::Stub];

    pub const ALL: [HookKind; 4] = [
        HookKind::Before,
        HookKind::After,
        HookKind::Stub,
        HookKind::Origin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::Before => "before",
            HookKind::After => "after",
            HookKind::Stub => "stub",
            HookKind::Origin => "origin",
        }
    }

    pub fn is_attachable(&self) -> bool {
        !matches!(self, HookKind::Origin)
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EngineError::InvalidHookKind(s.to_string()))
    }
}

/// Canonical member name for `kind` on `operation`
pub fn member_name(kind: HookKind, operation: &str) -> String {
    format!("{}{}-{}", MEMBER_PREFIX, kind, operation)
}

/// All four member names of `operation`, in `HookKind::ALL` order
pub fn member_names(operation: &str) -> [(HookKind, String); 4] {
    HookKind::ALL.map(|kind| (kind, member_name(kind, operation)))
}

/// Split a member name back into `(kind, operation)`
///
/// Returns `None` for ordinary operation names.
pub fn parse_member_name(name: &str) -> Option<(HookKind, &str)> {
    let rest = name.strip_prefix(MEMBER_PREFIX)?;
    let (kind, operation) = rest.split_once('-')?;
    let kind = kind.parse().ok()?;
    Some((kind, operation))
}

/// True if `name` falls inside the reserved wrapper namespace
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(MEMBER_PREFIX)
}

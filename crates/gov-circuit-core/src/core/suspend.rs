// gov-circuit-core/src/core/suspend.rs
// ============================================================================
// Module: Suspension
// Description: Cooperative suspend/resume sum type for blocking operations.
// Purpose: Replace coroutine control flow with an explicit state machine.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! `HumanApproval`/`MultiApprove` gate checks and `Pause` gates are the only
//! operations that may suspend. Rather than `async fn`s or a
//! background executor, a suspendable operation returns [`Suspend<T>`]: the
//! caller either has a `Ready` result now, or a [`ResumeToken`] it hands back
//! on the next poll. The Circuit/Intervenor drive resumption explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Resume Token
// ============================================================================

/// Opaque token identifying a suspended operation awaiting resumption.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeToken(String);

impl ResumeToken {
    /// Creates a new resume token.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ResumeToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResumeToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Suspend
// ============================================================================

/// Outcome of polling a suspendable operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suspend<T> {
    /// The operation has not resolved yet; poll again with this token.
    Pending(ResumeToken),
    /// The operation resolved to `T`.
    Ready(T),
}

impl<T> Suspend<T> {
    /// Returns true when this is [`Suspend::Ready`].
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns the ready value, if any.
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    /// Maps the ready value, leaving a pending token untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Suspend<U> {
        match self {
            Self::Ready(value) => Suspend::Ready(f(value)),
            Self::Pending(token) => Suspend::Pending(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResumeToken;
    use super::Suspend;

    #[test]
    fn ready_extracts_value() {
        let suspend: Suspend<i32> = Suspend::Ready(7);
        assert_eq!(suspend.ready(), Some(7));
    }

    #[test]
    fn pending_has_no_ready_value() {
        let suspend: Suspend<i32> = Suspend::Pending(ResumeToken::new("tok"));
        assert!(!suspend.is_ready());
        assert_eq!(suspend.ready(), None);
    }

    #[test]
    fn map_transforms_only_ready() {
        let ready: Suspend<i32> = Suspend::Ready(3);
        assert_eq!(ready.map(|v| v + 1).ready(), Some(4));
        let pending: Suspend<i32> = Suspend::Pending(ResumeToken::new("tok"));
        assert!(!pending.map(|v| v + 1).is_ready());
    }
}

//! Per-call metadata threaded through collaborator calls.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Identity metadata for one request, passed explicitly into every
/// collaborator call instead of living in ambient per-request state.
///
/// The gateway resolves the authenticated user upstream and forwards it
/// as `x-user-id` / `x-user-name` / `x-user-roles` headers; this struct
/// is the in-process form of those headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    user_id: UserId,
    user_name: Option<String>,
    roles: Vec<String>,
}

impl CallContext {
    /// Creates a context for the given user with no extra metadata.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: None,
            roles: Vec::new(),
        }
    }

    /// Attaches the user's display name.
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Attaches the user's roles.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Returns the authenticated user's ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the user's display name, if known.
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Returns the user's roles.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_user_id() {
        let ctx = CallContext::new("user-1");
        assert_eq!(ctx.user_id().as_str(), "user-1");
        assert_eq!(ctx.user_name(), None);
        assert!(ctx.roles().is_empty());
    }

    #[test]
    fn context_builder_attaches_metadata() {
        let ctx = CallContext::new("user-1")
            .with_user_name("Ada")
            .with_roles(vec!["customer".to_string(), "beta".to_string()]);

        assert_eq!(ctx.user_name(), Some("Ada"));
        assert_eq!(ctx.roles(), ["customer", "beta"]);
    }
}

//! Viewer session state.
//!
//! This module provides [`SessionState`], a domain object mirroring the
//! identity provider's auth-state subscription: loading until the first
//! snapshot arrives, then either an anonymous viewer or a signed-in
//! profile. The provider is the source of truth; this object never
//! invents identity, it only reflects the latest snapshot.

use crate::error::{MoonlitError, MoonlitResult};
use crate::models::UserProfile;

/// Current viewer identity as observed from the auth provider.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    user: Option<UserProfile>,
    seen_first_snapshot: bool,
}

impl SessionState {
    /// Create a session that has not yet heard from the provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an auth-state snapshot. The first one ends the loading
    /// state, whatever it carries.
    pub fn apply_auth_snapshot(&mut self, snapshot: Option<UserProfile>) {
        self.seen_first_snapshot = true;
        self.user = snapshot;
    }

    /// True until the provider has restored (or denied) a session.
    pub fn is_loading(&self) -> bool {
        !self.seen_first_snapshot
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in profile, if any.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The signed-in profile, or the error that sends the viewer to
    /// sign-in.
    pub fn require_user(&self) -> MoonlitResult<&UserProfile> {
        self.user.as_ref().ok_or(MoonlitError::AuthenticationRequired)
    }
}

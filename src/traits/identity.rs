//! Identity provider trait abstraction.
//!
//! The hosted auth provider: account creation, sign-in/out, and the
//! auth-state observer. The observer is a standing subscription emitting
//! the full current identity, a profile when signed in or `None` when
//! anonymous, on every change.

use async_trait::async_trait;

use super::subscription::Subscription;
use crate::error::IdentityError;
use crate::models::UserProfile;

/// A standing auth-state subscription. The first snapshot reflects the
/// provider's restored session (or `None`), which is what ends the
/// session's initial loading state.
pub type AuthSubscription = Subscription<Option<UserProfile>>;

/// Trait for the identity provider collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserProfile, IdentityError>;

    /// Sign in an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, IdentityError>;

    /// Sign out the current account. Observers receive a `None` snapshot.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Observe auth-state changes until the token is cancelled or the
    /// receiver dropped.
    fn watch_auth_state(&self) -> AuthSubscription;
}

//! Mock identity provider for testing.
//!
//! Keeps accounts in memory and pushes auth-state snapshots to every
//! live observer on sign-up, sign-in, and sign-out, mirroring how the
//! hosted provider's observer behaves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::IdentityError;
use crate::models::UserProfile;
use crate::traits::identity::{AuthSubscription, IdentityProvider};
use crate::traits::subscription::{Subscription, SubscriptionToken};

struct Observer {
    sender: mpsc::UnboundedSender<Option<UserProfile>>,
    token: SubscriptionToken,
}

#[derive(Default)]
struct IdentityInner {
    /// email -> (password, profile)
    accounts: HashMap<String, (String, UserProfile)>,
    current: Option<UserProfile>,
    observers: Vec<Observer>,
    fail_next: Option<IdentityError>,
}

/// In-memory [`IdentityProvider`] implementation.
#[derive(Clone)]
pub struct MockIdentityProvider {
    inner: Arc<Mutex<IdentityInner>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(IdentityInner::default())),
        }
    }

    /// Create a provider with one account already signed in.
    pub fn signed_in(profile: UserProfile) -> Self {
        let provider = Self::new();
        {
            let mut inner = provider.inner.lock().unwrap();
            inner.accounts.insert(
                profile.email.clone(),
                ("password".to_string(), profile.clone()),
            );
            inner.current = Some(profile);
        }
        provider
    }

    /// Make the next sign-up/sign-in/sign-out call fail with `err`.
    pub fn fail_next(&self, err: IdentityError) {
        self.inner.lock().unwrap().fail_next = Some(err);
    }

    /// The currently signed-in profile, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.lock().unwrap().current.clone()
    }

    fn take_failure(inner: &mut IdentityInner) -> Result<(), IdentityError> {
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn notify(inner: &mut IdentityInner) {
        let snapshot = inner.current.clone();
        inner
            .observers
            .retain(|o| !o.token.is_cancelled() && o.sender.send(snapshot.clone()).is_ok());
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserProfile, IdentityError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;

        if inner.accounts.contains_key(email) {
            return Err(IdentityError::EmailAlreadyInUse);
        }
        if password.len() < 6 {
            return Err(IdentityError::WeakPassword);
        }

        let profile = UserProfile {
            uid: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
            created_at: Utc::now(),
        };
        inner
            .accounts
            .insert(email.to_string(), (password.to_string(), profile.clone()));
        inner.current = Some(profile.clone());
        Self::notify(&mut inner);
        Ok(profile)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, IdentityError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;

        let profile = match inner.accounts.get(email) {
            Some((stored, profile)) if stored == password => profile.clone(),
            _ => return Err(IdentityError::InvalidCredential),
        };
        inner.current = Some(profile.clone());
        Self::notify(&mut inner);
        Ok(profile)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_failure(&mut inner)?;
        inner.current = None;
        Self::notify(&mut inner);
        Ok(())
    }

    fn watch_auth_state(&self) -> AuthSubscription {
        let (tx, subscription) = Subscription::channel();
        let mut inner = self.inner.lock().unwrap();

        // The first snapshot reflects the restored session.
        let _ = tx.send(inner.current.clone());
        inner.observers.push(Observer {
            sender: tx,
            token: subscription.token.clone(),
        });
        subscription
    }
}

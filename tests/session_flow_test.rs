// Integration tests for account flows and session observation: the
// auth-state subscription drives SessionState, and identity changes
// re-scope the detail view.

use std::sync::Arc;

use moonlit::adapters::{InMemoryStore, MockIdentityProvider};
use moonlit::auth::{sign_in, sign_out, sign_up, SignUpForm};
use moonlit::detail::{BookDetailModel, BookRef, DetailState};
use moonlit::domain::SessionState;
use moonlit::error::MoonlitError;

#[tokio::test]
async fn test_session_mirrors_auth_lifecycle() {
    let provider = MockIdentityProvider::new();
    let mut subscription = provider.watch_auth_state();
    let mut session = SessionState::new();

    assert!(session.is_loading());

    // Restored session: anonymous.
    session.apply_auth_snapshot(subscription.recv().await.unwrap());
    assert!(!session.is_loading());
    assert!(!session.is_authenticated());

    let form = SignUpForm::new("ada@example.com", "hunter22", "hunter22");
    sign_up(&provider, &form).await.unwrap();
    session.apply_auth_snapshot(subscription.recv().await.unwrap());
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().email, "ada@example.com");

    sign_out(&provider).await.unwrap();
    session.apply_auth_snapshot(subscription.recv().await.unwrap());
    assert!(!session.is_authenticated());
    assert!(matches!(
        session.require_user(),
        Err(MoonlitError::AuthenticationRequired)
    ));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_provider() {
    let provider = MockIdentityProvider::new();
    let mut subscription = provider.watch_auth_state();
    assert_eq!(subscription.recv().await.unwrap(), None);

    let form = SignUpForm::new("ada@example.com", "short", "short");
    let err = sign_up(&provider, &form).await.unwrap_err();
    assert!(matches!(err, MoonlitError::Validation { .. }));

    // No auth-state change was emitted: the provider was never called.
    assert_eq!(subscription.try_recv(), None);
}

#[tokio::test]
async fn test_sign_in_after_sign_up() {
    let provider = MockIdentityProvider::new();
    let form = SignUpForm::new("ada@example.com", "hunter22", "hunter22");
    let created = sign_up(&provider, &form).await.unwrap();
    sign_out(&provider).await.unwrap();

    let signed_in = sign_in(&provider, "ada@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(signed_in.uid, created.uid);

    let err = sign_in(&provider, "ada@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "Invalid email or password. Please try again."
    );
}

#[tokio::test]
async fn test_identity_change_rescopes_detail_view() {
    let provider = MockIdentityProvider::new();
    let store = InMemoryStore::new();
    let mut session = SessionState::new();
    let mut subscription = provider.watch_auth_state();
    let mut detail = BookDetailModel::new(Arc::new(store));

    session.apply_auth_snapshot(subscription.recv().await.unwrap());

    let book = BookRef::new("OL1W", "Dune", None);
    detail.set_context(book.clone(), session.user().cloned());
    assert_eq!(detail.state(), DetailState::Anonymous);
    assert_eq!(detail.subscription_count(), 1);

    // Signing in re-scopes the view to the new identity.
    let form = SignUpForm::new("ada@example.com", "hunter22", "hunter22");
    sign_up(&provider, &form).await.unwrap();
    session.apply_auth_snapshot(subscription.recv().await.unwrap());
    detail.set_context(book, session.user().cloned());

    assert_eq!(detail.state(), DetailState::NotFavorited);
    assert_eq!(detail.subscription_count(), 2);
    assert_eq!(
        detail.context().unwrap().viewer_id.as_deref(),
        session.user().map(|u| u.uid.as_str())
    );
}

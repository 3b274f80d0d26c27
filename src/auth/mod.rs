//! Account flows over the identity provider.
//!
//! Thin call-throughs that put form validation in front of the
//! provider: a form that fails validation never reaches the network.
//! Session observation lives in [`crate::domain::SessionState`]; these
//! functions only perform the explicit user actions.

pub mod validate;

pub use validate::{SignUpForm, MIN_PASSWORD_LEN};

use crate::error::MoonlitResult;
use crate::models::UserProfile;
use crate::traits::IdentityProvider;

/// Validate the sign-up form, then create and sign in the account.
pub async fn sign_up(
    provider: &dyn IdentityProvider,
    form: &SignUpForm,
) -> MoonlitResult<UserProfile> {
    form.validate()?;
    let profile = provider.sign_up(form.email.trim(), &form.password).await?;
    tracing::info!(uid = %profile.uid, "account created");
    Ok(profile)
}

/// Sign in an existing account. Credential validation is the
/// provider's; its error codes surface as typed identity errors.
pub async fn sign_in(
    provider: &dyn IdentityProvider,
    email: &str,
    password: &str,
) -> MoonlitResult<UserProfile> {
    let profile = provider.sign_in(email.trim(), password).await?;
    tracing::info!(uid = %profile.uid, "signed in");
    Ok(profile)
}

/// Sign out the current account. Observers hear about it through the
/// auth-state subscription.
pub async fn sign_out(provider: &dyn IdentityProvider) -> MoonlitResult<()> {
    provider.sign_out().await?;
    tracing::info!("signed out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockIdentityProvider;
    use crate::error::MoonlitError;

    #[tokio::test]
    async fn test_sign_up_validates_before_network() {
        let provider = MockIdentityProvider::new();
        let form = SignUpForm::new("ada@example.com", "abc", "abd");

        let err = sign_up(&provider, &form).await.unwrap_err();
        assert!(matches!(err, MoonlitError::Validation { .. }));
        // The provider never saw the request.
        assert!(provider.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_happy_path() {
        let provider = MockIdentityProvider::new();
        let form = SignUpForm::new("ada@example.com", "hunter22", "hunter22");

        let profile = sign_up(&provider, &form).await.unwrap();
        assert_eq!(profile.email, "ada@example.com");
        assert!(provider.current_user().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_maps_provider_error() {
        let provider = MockIdentityProvider::new();
        let err = sign_in(&provider, "ada@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, MoonlitError::Identity(_)));
        assert_eq!(
            err.user_message(),
            "Invalid email or password. Please try again."
        );
    }

    #[tokio::test]
    async fn test_sign_out() {
        let provider = MockIdentityProvider::new();
        let form = SignUpForm::new("ada@example.com", "hunter22", "hunter22");
        sign_up(&provider, &form).await.unwrap();

        sign_out(&provider).await.unwrap();
        assert!(provider.current_user().is_none());
    }
}

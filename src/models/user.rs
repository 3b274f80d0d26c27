use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity snapshot emitted by the auth provider.
///
/// `None` from the auth-state subscription means anonymous; this struct
/// is what a signed-in snapshot carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Account creation time from provider metadata.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// The name shown next to the user's comments: display name when
    /// set, otherwise the email address.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

//! The signed-in user, as supplied by the external auth boundary.
//!
//! The engine never sees tokens or credentials. It consumes the
//! provider's authenticated/unauthenticated signal as-is and treats the
//! profile as opaque input — `id` is whatever stable subject the
//! provider issues.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub email_verified: bool,
}

/// Surface of the external auth collaborator.
pub trait IdentityProvider {
    /// The signed-in user, or None when unauthenticated.
    fn current(&self) -> Option<Identity>;

    fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// True while the provider is still resolving the session.
    fn is_loading(&self) -> bool {
        false
    }
}

/// Always-signed-in provider for tests and single-user embeddings.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub Identity);

impl IdentityProvider for FixedIdentity {
    fn current(&self) -> Option<Identity> {
        Some(self.0.clone())
    }
}

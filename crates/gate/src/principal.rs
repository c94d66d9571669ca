use serde::{Deserialize, Serialize};

use kdom_core::UserId;

use crate::GlobalRole;

/// The user on whose behalf a capability question is asked.
///
/// Passed explicitly into the resolver; the gate never reads a "current user"
/// from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActingUser {
    /// Logged-out auth contexts carry no id; it is never consulted for guests.
    #[serde(default)]
    pub id: UserId,
    #[serde(default, alias = "role")]
    pub global_role: GlobalRole,
    /// `false` means guest, whatever the other fields say.
    ///
    /// Must be set explicitly by the auth context; a payload without it is a
    /// guest.
    #[serde(default)]
    pub is_authenticated: bool,
}

impl ActingUser {
    pub fn authenticated(id: UserId, global_role: GlobalRole) -> Self {
        Self {
            id,
            global_role,
            is_authenticated: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.global_role == GlobalRole::Admin
    }

    pub fn is_moderator(&self) -> bool {
        self.is_authenticated && self.global_role == GlobalRole::Moderator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_auth_context_payload() {
        let user: ActingUser =
            serde_json::from_str(r#"{"id": 9, "role": "moderator", "isAuthenticated": true}"#).unwrap();
        assert_eq!(user.id, UserId::new(9));
        assert!(user.is_moderator());
        assert!(user.is_authenticated);
    }

    #[test]
    fn partial_payload_is_a_guest() {
        let user: ActingUser = serde_json::from_str(r#"{"id": 4, "role": "admin"}"#).unwrap();
        assert!(!user.is_authenticated);
        assert!(!user.is_admin());

        let logged_out: ActingUser = serde_json::from_str(r#"{"isAuthenticated": false}"#).unwrap();
        assert_eq!(logged_out.id, UserId::default());
        assert!(!logged_out.is_authenticated);
    }

    #[test]
    fn unauthenticated_admin_is_not_admin() {
        let user: ActingUser = serde_json::from_str(
            r#"{"id": 1, "globalRole": "admin", "isAuthenticated": false}"#,
        )
        .unwrap();
        assert!(!user.is_admin());
    }
}

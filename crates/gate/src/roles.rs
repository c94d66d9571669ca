use core::str::FromStr;

use serde::{Deserialize, Serialize};

use kdom_core::DomainError;

use crate::ActingUser;

/// Platform-wide role carried on the user account.
///
/// Closed set: the backend only issues these three values, anything else is a
/// parse error rather than a silently unprivileged user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    #[default]
    User,
    Moderator,
    Admin,
}

impl GlobalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl core::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::validation(format!("unknown global role '{other}'"))),
        }
    }
}

/// Role of the acting user relative to one specific resource.
///
/// Variant order is privilege order (`Guest` lowest, `Admin` highest), so the
/// derived `Ord` is the display ranking. Capability derivation never consults
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextRole {
    Guest,
    User,
    Collaborator,
    Owner,
    Moderator,
    Admin,
}

impl ContextRole {
    pub const ALL: [ContextRole; 6] = [
        Self::Guest,
        Self::User,
        Self::Collaborator,
        Self::Owner,
        Self::Moderator,
        Self::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Collaborator => "collaborator",
            Self::Owner => "owner",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Label shown on the role badge next to a content item.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::User => "Member",
            Self::Collaborator => "Collaborator",
            Self::Owner => "Owner",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
        }
    }
}

impl core::fmt::Display for ContextRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GlobalRole> for ContextRole {
    fn from(value: GlobalRole) -> Self {
        match value {
            GlobalRole::User => Self::User,
            GlobalRole::Moderator => Self::Moderator,
            GlobalRole::Admin => Self::Admin,
        }
    }
}

/// `true` iff `a` ranks strictly above `b`.
///
/// For sorting member lists and badges only.
pub fn outranks(a: ContextRole, b: ContextRole) -> bool {
    a > b
}

/// Moderators and admins bypass ownership checks; guests never do.
pub fn is_privileged_globally(user: Option<&ActingUser>) -> bool {
    match user {
        Some(u) if u.is_authenticated => {
            matches!(u.global_role, GlobalRole::Moderator | GlobalRole::Admin)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdom_core::UserId;

    #[test]
    fn privilege_order_is_total_and_strict() {
        let order = ContextRole::ALL;
        for (i, a) in order.iter().enumerate() {
            for (j, b) in order.iter().enumerate() {
                assert_eq!(outranks(*a, *b), i > j, "{a} vs {b}");
            }
        }
        assert!(outranks(ContextRole::Admin, ContextRole::Moderator));
        assert!(outranks(ContextRole::Owner, ContextRole::Collaborator));
        assert!(!outranks(ContextRole::Guest, ContextRole::Guest));
    }

    #[test]
    fn global_role_parsing_is_closed() {
        assert_eq!("Admin".parse::<GlobalRole>().unwrap(), GlobalRole::Admin);
        assert_eq!(" moderator ".parse::<GlobalRole>().unwrap(), GlobalRole::Moderator);
        assert!("superuser".parse::<GlobalRole>().is_err());
    }

    #[test]
    fn global_role_rejects_unknown_wire_value() {
        let parsed: Result<GlobalRole, _> = serde_json::from_str("\"owner\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn only_authenticated_staff_are_privileged() {
        let mut user = ActingUser::authenticated(UserId::new(1), GlobalRole::Moderator);
        assert!(is_privileged_globally(Some(&user)));

        user.is_authenticated = false;
        assert!(!is_privileged_globally(Some(&user)));

        let member = ActingUser::authenticated(UserId::new(2), GlobalRole::User);
        assert!(!is_privileged_globally(Some(&member)));
        assert!(!is_privileged_globally(None));
    }
}

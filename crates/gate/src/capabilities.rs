use serde::{Deserialize, Serialize};

use crate::ContextRole;

/// A named boolean permission consumed by the UI to gate one affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    CanEdit,
    CanEditMetadata,
    CanViewSensitive,
    CanManageCollaborators,
    CanCreateSubPages,
    CanViewEditHistory,
    CanApproveReject,
    CanDelete,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Self::CanEdit,
        Self::CanEditMetadata,
        Self::CanViewSensitive,
        Self::CanManageCollaborators,
        Self::CanCreateSubPages,
        Self::CanViewEditHistory,
        Self::CanApproveReject,
        Self::CanDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanEdit => "canEdit",
            Self::CanEditMetadata => "canEditMetadata",
            Self::CanViewSensitive => "canViewSensitive",
            Self::CanManageCollaborators => "canManageCollaborators",
            Self::CanCreateSubPages => "canCreateSubPages",
            Self::CanViewEditHistory => "canViewEditHistory",
            Self::CanApproveReject => "canApproveReject",
            Self::CanDelete => "canDelete",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySet {
    pub can_edit: bool,
    pub can_edit_metadata: bool,
    pub can_view_sensitive: bool,
    pub can_manage_collaborators: bool,
    pub can_create_sub_pages: bool,
    pub can_view_edit_history: bool,
    pub can_approve_reject: bool,
    pub can_delete: bool,
}

impl CapabilitySet {
    pub const fn none() -> Self {
        Self {
            can_edit: false,
            can_edit_metadata: false,
            can_view_sensitive: false,
            can_manage_collaborators: false,
            can_create_sub_pages: false,
            can_view_edit_history: false,
            can_approve_reject: false,
            can_delete: false,
        }
    }

    pub const fn all() -> Self {
        Self {
            can_edit: true,
            can_edit_metadata: true,
            can_view_sensitive: true,
            can_manage_collaborators: true,
            can_create_sub_pages: true,
            can_view_edit_history: true,
            can_approve_reject: true,
            can_delete: true,
        }
    }

    pub fn from_caps(caps: &[Capability]) -> Self {
        let mut set = Self::none();
        for cap in caps {
            set.set(*cap, true);
        }
        set
    }

    pub fn get(&self, cap: Capability) -> bool {
        match cap {
            Capability::CanEdit => self.can_edit,
            Capability::CanEditMetadata => self.can_edit_metadata,
            Capability::CanViewSensitive => self.can_view_sensitive,
            Capability::CanManageCollaborators => self.can_manage_collaborators,
            Capability::CanCreateSubPages => self.can_create_sub_pages,
            Capability::CanViewEditHistory => self.can_view_edit_history,
            Capability::CanApproveReject => self.can_approve_reject,
            Capability::CanDelete => self.can_delete,
        }
    }

    pub fn set(&mut self, cap: Capability, value: bool) {
        let slot = match cap {
            Capability::CanEdit => &mut self.can_edit,
            Capability::CanEditMetadata => &mut self.can_edit_metadata,
            Capability::CanViewSensitive => &mut self.can_view_sensitive,
            Capability::CanManageCollaborators => &mut self.can_manage_collaborators,
            Capability::CanCreateSubPages => &mut self.can_create_sub_pages,
            Capability::CanViewEditHistory => &mut self.can_view_edit_history,
            Capability::CanApproveReject => &mut self.can_approve_reject,
            Capability::CanDelete => &mut self.can_delete,
        };
        *slot = value;
    }

    /// Flag-wise OR.
    pub fn union(self, other: Self) -> Self {
        let mut out = self;
        for cap in Capability::ALL {
            if other.get(cap) {
                out.set(cap, true);
            }
        }
        out
    }

    /// `true` if every flag granted by `other` is also granted here.
    pub fn contains(&self, other: &Self) -> bool {
        Capability::ALL
            .iter()
            .all(|cap| !other.get(*cap) || self.get(*cap))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(move |cap| self.get(*cap))
    }
}

/// Outcome of one capability resolution.
///
/// Computed fresh for every render; not meant to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResult {
    pub role: ContextRole,
    #[serde(flatten)]
    pub capabilities: CapabilitySet,
    /// User-facing explanation, shown instead of a bare "forbidden".
    pub reason: String,
}

impl CapabilityResult {
    pub fn can(&self, cap: Capability) -> bool {
        self.capabilities.get(cap)
    }

    pub fn can_edit(&self) -> bool {
        self.capabilities.can_edit
    }

    pub fn can_edit_metadata(&self) -> bool {
        self.capabilities.can_edit_metadata
    }

    pub fn can_view_sensitive(&self) -> bool {
        self.capabilities.can_view_sensitive
    }

    pub fn can_manage_collaborators(&self) -> bool {
        self.capabilities.can_manage_collaborators
    }

    pub fn can_create_sub_pages(&self) -> bool {
        self.capabilities.can_create_sub_pages
    }

    pub fn can_view_edit_history(&self) -> bool {
        self.capabilities.can_view_edit_history
    }

    pub fn can_approve_reject(&self) -> bool {
        self.capabilities.can_approve_reject
    }

    pub fn can_delete(&self) -> bool {
        self.capabilities.can_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_flagwise_or() {
        let a = CapabilitySet::from_caps(&[Capability::CanEdit]);
        let b = CapabilitySet::from_caps(&[Capability::CanDelete, Capability::CanEdit]);
        let u = a.union(b);
        assert!(u.can_edit && u.can_delete);
        assert_eq!(u.granted().count(), 2);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert!(!a.contains(&u));
    }

    #[test]
    fn none_and_all_cover_every_flag() {
        for cap in Capability::ALL {
            assert!(!CapabilitySet::none().get(cap));
            assert!(CapabilitySet::all().get(cap));
        }
        assert!(CapabilitySet::none().is_empty());
    }

    #[test]
    fn result_serializes_flat_camel_case() {
        let result = CapabilityResult {
            role: ContextRole::Collaborator,
            capabilities: CapabilitySet::from_caps(&[Capability::CanEdit]),
            reason: "You are a collaborator.".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["role"], "collaborator");
        assert_eq!(json["canEdit"], true);
        assert_eq!(json["canEditMetadata"], false);
        assert_eq!(json["reason"], "You are a collaborator.");
    }

    #[test]
    fn capability_names_match_wire_names() {
        for cap in Capability::ALL {
            let json = serde_json::to_value(cap).unwrap();
            assert_eq!(json, cap.as_str());
        }
    }
}

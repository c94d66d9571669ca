//! Capability resolution: `(ActingUser, ResourceDescriptor) -> CapabilityResult`.
//!
//! - No IO
//! - No panics
//! - No caching (every call recomputes from its inputs)
//!
//! Every rule that structurally matches contributes its capabilities; the
//! results are OR-ed together. Rule priority only picks the role label and the
//! reason string.

use std::collections::BTreeSet;

use serde::Serialize;

use kdom_core::DomainError;

use crate::{
    ActingUser, Capability, CapabilityResult, CapabilitySet, ContentType, ContextRole, GlobalRole,
    ModerationStatus, ResourceDescriptor,
};

pub const REASON_GUEST: &str = "Not authenticated.";
pub const REASON_ADMIN: &str = "Administrator access.";
pub const REASON_MODERATOR: &str = "Moderator access.";
pub const REASON_OWNER: &str = "You own this content.";
pub const REASON_COLLABORATOR: &str = "You are a collaborator.";
pub const REASON_MEMBER: &str = "No special permissions for this content.";
pub const REASON_DELETED: &str = "This content has been deleted.";

/// Moderators curate; they do not author.
const MODERATOR_CAPS: [Capability; 4] = [
    Capability::CanApproveReject,
    Capability::CanViewEditHistory,
    Capability::CanViewSensitive,
    Capability::CanDelete,
];

const COLLABORATOR_CAPS: [Capability; 3] = [
    Capability::CanEdit,
    Capability::CanViewEditHistory,
    Capability::CanCreateSubPages,
];

/// Content-type-specific knobs of the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    published_self_delete: BTreeSet<ContentType>,
}

impl Default for GatePolicy {
    /// Pages stay once approved (other pages link to them); posts and comments
    /// can be withdrawn by their authors.
    fn default() -> Self {
        Self::new([ContentType::Post, ContentType::Comment])
    }
}

impl GatePolicy {
    pub fn new(published_self_delete: impl IntoIterator<Item = ContentType>) -> Self {
        Self {
            published_self_delete: published_self_delete.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list of content types, e.g. `"post,comment"`.
    ///
    /// An empty string or `"none"` disables self-deletion of approved content
    /// for every type.
    pub fn from_published_self_delete(list: &str) -> Result<Self, DomainError> {
        let list = list.trim();
        if list.is_empty() || list.eq_ignore_ascii_case("none") {
            return Ok(Self::new([]));
        }

        let types = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<ContentType>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(types))
    }

    pub fn allows_published_self_delete(&self, content_type: ContentType) -> bool {
        self.published_self_delete.contains(&content_type)
    }

    pub fn published_self_delete(&self) -> impl Iterator<Item = ContentType> + '_ {
        self.published_self_delete.iter().copied()
    }
}

/// A row of the rule table that matched the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Admin,
    Moderator,
    Owner,
    Collaborator,
}

impl Rule {
    fn role(self) -> ContextRole {
        match self {
            Self::Admin => ContextRole::Admin,
            Self::Moderator => ContextRole::Moderator,
            Self::Owner => ContextRole::Owner,
            Self::Collaborator => ContextRole::Collaborator,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Self::Admin => REASON_ADMIN,
            Self::Moderator => REASON_MODERATOR,
            Self::Owner => REASON_OWNER,
            Self::Collaborator => REASON_COLLABORATOR,
        }
    }
}

/// Full trace of one resolution; the public result is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Evaluation {
    pub role: ContextRole,
    pub capabilities: CapabilitySet,
    pub reason: &'static str,
    /// In priority order.
    pub matched: Vec<Rule>,
    pub deleted_lockout: bool,
}

impl Evaluation {
    fn guest() -> Self {
        Self {
            role: ContextRole::Guest,
            capabilities: CapabilitySet::none(),
            reason: REASON_GUEST,
            matched: Vec::new(),
            deleted_lockout: false,
        }
    }

    pub fn into_result(self) -> CapabilityResult {
        CapabilityResult {
            role: self.role,
            capabilities: self.capabilities,
            reason: self.reason.to_string(),
        }
    }
}

/// Capability resolver bound to a [`GatePolicy`].
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: GatePolicy,
}

impl Resolver {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Resolve what `user` may do with `resource`.
    ///
    /// `None` is treated exactly like an unauthenticated user.
    pub fn resolve(
        &self,
        user: Option<&ActingUser>,
        resource: &ResourceDescriptor,
    ) -> CapabilityResult {
        self.evaluate(user, resource).into_result()
    }

    pub(crate) fn evaluate(
        &self,
        user: Option<&ActingUser>,
        resource: &ResourceDescriptor,
    ) -> Evaluation {
        let Some(user) = user.filter(|u| u.is_authenticated) else {
            tracing::debug!(resource_id = %resource.id(), role = "guest", "resolved capabilities");
            return Evaluation::guest();
        };

        let eval = if user.global_role == GlobalRole::Admin {
            // Admins override everything, including the deleted state.
            Evaluation {
                role: ContextRole::Admin,
                capabilities: CapabilitySet::all(),
                reason: REASON_ADMIN,
                matched: vec![Rule::Admin],
                deleted_lockout: false,
            }
        } else {
            self.evaluate_member(user, resource)
        };

        tracing::debug!(
            user_id = %user.id,
            resource_id = %resource.id(),
            content_type = %resource.content_type(),
            status = %resource.moderation_status(),
            role = %eval.role,
            deleted_lockout = eval.deleted_lockout,
            "resolved capabilities"
        );

        eval
    }

    fn evaluate_member(&self, user: &ActingUser, resource: &ResourceDescriptor) -> Evaluation {
        let mut matched = Vec::new();
        let mut capabilities = CapabilitySet::none();

        if user.global_role == GlobalRole::Moderator {
            matched.push(Rule::Moderator);
            capabilities = capabilities.union(CapabilitySet::from_caps(&MODERATOR_CAPS));
        }

        if resource.is_owned_by(user.id) {
            matched.push(Rule::Owner);
            capabilities = capabilities.union(self.owner_capabilities(resource));
        }

        if resource.has_collaborator(user.id) {
            matched.push(Rule::Collaborator);
            capabilities = capabilities.union(CapabilitySet::from_caps(&COLLABORATOR_CAPS));
        }

        let (role, mut reason) = match matched.first() {
            Some(rule) => (rule.role(), rule.reason()),
            None => (ContextRole::User, REASON_MEMBER),
        };

        let deleted_lockout = resource.moderation_status() == ModerationStatus::Deleted;
        if deleted_lockout {
            capabilities = CapabilitySet::none();
            reason = REASON_DELETED;
        }

        Evaluation {
            role,
            capabilities,
            reason,
            matched,
            deleted_lockout,
        }
    }

    /// Everything except approving one's own submission; deletion of approved
    /// content depends on the content type.
    fn owner_capabilities(&self, resource: &ResourceDescriptor) -> CapabilitySet {
        let mut caps = CapabilitySet::all();
        caps.can_approve_reject = false;
        caps.can_delete = resource.moderation_status() != ModerationStatus::Approved
            || self
                .policy
                .allows_published_self_delete(resource.content_type());
        caps
    }
}

/// Resolve with the default [`GatePolicy`].
pub fn resolve(user: Option<&ActingUser>, resource: &ResourceDescriptor) -> CapabilityResult {
    Resolver::default().resolve(user, resource)
}

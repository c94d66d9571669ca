use serde::Serialize;
use thiserror::Error;

use kdom_core::{ResourceId, UserId};

use crate::resolve::{Resolver, Rule};
use crate::{
    ActingUser, Capability, CapabilityResult, ContentType, ContextRole, ModerationStatus,
    ResourceDescriptor,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("forbidden: missing capability '{capability}': {reason}")]
pub struct AccessDenied {
    pub capability: Capability,
    pub role: ContextRole,
    /// Shown to the user in place of the affordance or view.
    pub reason: String,
}

/// Consumer-side authorization contract.
///
/// Implement this on anything a page renders conditionally. Consumers ask the
/// resolver and check these capabilities; they never re-derive the rules.
pub trait GatedAction {
    fn required_capabilities(&self) -> &[Capability];
}

/// Catalog of gated affordances across K-Dom pages, posts and the
/// moderation dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    EditContent,
    EditMetadata,
    ManageCollaborators,
    CreateSubPage,
    ViewEditHistory,
    ApproveSubmission,
    RejectSubmission,
    Delete,
    ViewReports,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Self::EditContent,
        Self::EditMetadata,
        Self::ManageCollaborators,
        Self::CreateSubPage,
        Self::ViewEditHistory,
        Self::ApproveSubmission,
        Self::RejectSubmission,
        Self::Delete,
        Self::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditContent => "edit_content",
            Self::EditMetadata => "edit_metadata",
            Self::ManageCollaborators => "manage_collaborators",
            Self::CreateSubPage => "create_sub_page",
            Self::ViewEditHistory => "view_edit_history",
            Self::ApproveSubmission => "approve_submission",
            Self::RejectSubmission => "reject_submission",
            Self::Delete => "delete",
            Self::ViewReports => "view_reports",
        }
    }
}

impl GatedAction for Action {
    fn required_capabilities(&self) -> &[Capability] {
        match self {
            Self::EditContent => &[Capability::CanEdit],
            Self::EditMetadata => &[Capability::CanEditMetadata],
            Self::ManageCollaborators => &[Capability::CanManageCollaborators],
            Self::CreateSubPage => &[Capability::CanCreateSubPages],
            Self::ViewEditHistory => &[Capability::CanViewEditHistory],
            Self::ApproveSubmission | Self::RejectSubmission => &[Capability::CanApproveReject],
            Self::Delete => &[Capability::CanDelete],
            Self::ViewReports => &[Capability::CanViewSensitive],
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check an already-resolved result against an action.
pub fn authorize<A: GatedAction + ?Sized>(
    result: &CapabilityResult,
    action: &A,
) -> Result<(), AccessDenied> {
    for cap in action.required_capabilities() {
        if !result.can(*cap) {
            return Err(AccessDenied {
                capability: *cap,
                role: result.role,
                reason: result.reason.clone(),
            });
        }
    }
    Ok(())
}

/// The subset of `actions` whose affordances should be rendered.
pub fn affordances<A: GatedAction + Copy>(result: &CapabilityResult, actions: &[A]) -> Vec<A> {
    actions
        .iter()
        .copied()
        .filter(|a| authorize(result, a).is_ok())
        .collect()
}

/// Whole-view gating decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateView {
    Allowed,
    /// Replace the view with a denial message carrying `reason`.
    Denied { reason: String },
}

pub fn view<A: GatedAction + ?Sized>(result: &CapabilityResult, action: &A) -> GateView {
    match authorize(result, action) {
        Ok(()) => GateView::Allowed,
        Err(denied) => GateView::Denied {
            reason: denied.reason,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gate Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a capability resolution, for debug panels and
/// support tooling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateExplanation {
    pub result: CapabilityResult,

    /// Badge label for `result.role`.
    pub badge: &'static str,

    /// Rules that matched, in priority order. Empty for guests and plain members.
    pub matched_rules: Vec<Rule>,

    /// Capabilities were withdrawn because the resource is deleted.
    pub deleted_lockout: bool,

    pub user: Option<UserState>,
    pub resource: ResourceState,

    /// Actions from the catalog the user may take.
    pub allowed_actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub id: UserId,
    pub global_role: crate::GlobalRole,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    pub id: ResourceId,
    pub content_type: ContentType,
    pub moderation_status: ModerationStatus,
    pub owner_user_id: Option<UserId>,
    pub collaborator_count: usize,
}

impl Resolver {
    /// Resolve and report why the result came out the way it did.
    pub fn explain(
        &self,
        user: Option<&ActingUser>,
        resource: &ResourceDescriptor,
    ) -> GateExplanation {
        let eval = self.evaluate(user, resource);
        let matched_rules = eval.matched.clone();
        let deleted_lockout = eval.deleted_lockout;
        let result = eval.into_result();

        GateExplanation {
            badge: result.role.badge(),
            matched_rules,
            deleted_lockout,
            user: user.map(|u| UserState {
                id: u.id,
                global_role: u.global_role,
                is_authenticated: u.is_authenticated,
            }),
            resource: ResourceState {
                id: resource.id().clone(),
                content_type: resource.content_type(),
                moderation_status: resource.moderation_status(),
                owner_user_id: resource.owner_user_id(),
                collaborator_count: resource.collaborator_user_ids().len(),
            },
            allowed_actions: affordances(&result, &Action::ALL),
            result,
        }
    }
}

/// Explain with the default policy.
pub fn explain(user: Option<&ActingUser>, resource: &ResourceDescriptor) -> GateExplanation {
    Resolver::default().explain(user, resource)
}

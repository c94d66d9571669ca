//! End-to-end gate scenarios: raw REST payload -> descriptor -> capabilities.

use serde_json::json;

use kdom_core::UserId;
use kdom_gate::{
    ActingUser, Action, Capability, ContentType, ContextRole, GateView, GlobalRole,
    MalformedResourceError, authorize, resolve, to_descriptor, view,
};

fn member(id: i64) -> ActingUser {
    ActingUser::authenticated(UserId::new(id), GlobalRole::User)
}

#[test]
fn owner_of_approved_page() {
    let page = to_descriptor(
        &json!({"id": "aespa", "userId": 5, "collaborators": [], "status": "approved"}),
        ContentType::Page,
    )
    .unwrap();

    let result = resolve(Some(&member(5)), &page);
    assert_eq!(result.role, ContextRole::Owner);
    assert!(result.can_edit());
    assert!(!result.can_approve_reject());
    assert!(!result.can_delete());
    assert_eq!(result.reason, "You own this content.");
}

#[test]
fn moderator_on_pending_page() {
    let page = to_descriptor(
        &json!({"id": "aespa", "userId": 5, "collaborators": [], "status": "pending"}),
        ContentType::Page,
    )
    .unwrap();
    let moderator = ActingUser::authenticated(UserId::new(9), GlobalRole::Moderator);

    let result = resolve(Some(&moderator), &page);
    assert_eq!(result.role, ContextRole::Moderator);
    assert!(result.can_approve_reject());
    assert!(!result.can_edit());
    assert_eq!(view(&result, &Action::EditContent), GateView::Denied {
        reason: "Moderator access.".to_string()
    });
}

#[test]
fn collaborator_on_approved_page() {
    let page = to_descriptor(
        &json!({"id": "aespa", "userId": 5, "collaborators": [9], "status": "approved"}),
        ContentType::Page,
    )
    .unwrap();

    let result = resolve(Some(&member(9)), &page);
    assert_eq!(result.role, ContextRole::Collaborator);
    assert!(result.can_edit());
    assert!(!result.can_edit_metadata());
    assert!(result.can_create_sub_pages());
    assert!(result.can_view_edit_history());
}

#[test]
fn missing_user_is_a_guest() {
    let post = to_descriptor(&json!({"id": 1, "userId": 5}), ContentType::Post).unwrap();

    let result = resolve(None, &post);
    assert_eq!(result.role, ContextRole::Guest);
    assert!(result.capabilities.is_empty());
    assert_eq!(result.reason, "Not authenticated.");
}

#[test]
fn admin_on_deleted_page() {
    let page = to_descriptor(
        &json!({"id": "aespa", "userId": 5, "collaborators": [], "status": "deleted"}),
        ContentType::Page,
    )
    .unwrap();
    let admin = ActingUser::authenticated(UserId::new(1), GlobalRole::Admin);

    let result = resolve(Some(&admin), &page);
    for cap in Capability::ALL {
        assert!(result.can(cap), "admin should hold {cap}");
    }
    assert!(authorize(&result, &Action::Delete).is_ok());
}

#[test]
fn author_may_withdraw_approved_comment() {
    let comment = to_descriptor(
        &json!({"id": 77, "userId": 3, "isDeleted": false}),
        ContentType::Comment,
    )
    .unwrap();

    let result = resolve(Some(&member(3)), &comment);
    assert!(authorize(&result, &Action::Delete).is_ok());
    assert!(authorize(&result, &Action::ApproveSubmission).is_err());
}

#[test]
fn malformed_payload_never_reaches_the_resolver() {
    let err = to_descriptor(&json!({"id": 1, "status": "approved"}), ContentType::Page).unwrap_err();
    assert!(matches!(err, MalformedResourceError::MissingOwner { .. }));
    assert_eq!(err.to_string(), "malformed page: owner field 'userId' is missing");
}

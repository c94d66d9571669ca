//! Black-box tests of the inspect pipeline (JSON in, JSON out).

use serde_json::json;

use kdom_gate::{ContentType, GatePolicy, Resolver};
use kdom_inspect::{Mode, inspect};

#[test]
fn resolve_prints_flat_capability_json() {
    let user = json!({"id": 5, "globalRole": "user", "isAuthenticated": true});
    let page = json!({"id": "ive", "userId": 5, "collaborators": [], "status": "approved"});

    let out = inspect(&Resolver::default(), Mode::Resolve, Some(&user), &page, ContentType::Page)
        .unwrap();

    assert_eq!(out["role"], "owner");
    assert_eq!(out["canEdit"], true);
    assert_eq!(out["canApproveReject"], false);
    assert_eq!(out["canDelete"], false);
    assert_eq!(out["reason"], "You own this content.");
}

#[test]
fn guest_when_no_user_given() {
    let post = json!({"id": 10, "userId": 5});

    let out = inspect(&Resolver::default(), Mode::Actions, None, &post, ContentType::Post).unwrap();
    assert_eq!(out, json!([]));
}

#[test]
fn explain_reports_matched_rules() {
    let user = json!({"id": 9, "role": "moderator", "isAuthenticated": true});
    let page = json!({"id": "ive", "userId": 5, "collaborators": [{"userId": 9}], "status": "pending"});

    let out = inspect(&Resolver::default(), Mode::Explain, Some(&user), &page, ContentType::Page)
        .unwrap();
    assert_eq!(out["matchedRules"], json!(["moderator", "collaborator"]));
    assert_eq!(out["result"]["canEdit"], true);
    assert_eq!(out["badge"], "Moderator");
}

#[test]
fn policy_changes_published_self_delete() {
    let user = json!({"id": 5, "isAuthenticated": true});
    let page = json!({"id": "ive", "userId": 5, "status": "approved"});
    let resolver = Resolver::new(GatePolicy::new([ContentType::Page]));

    let out = inspect(&resolver, Mode::Resolve, Some(&user), &page, ContentType::Page).unwrap();
    assert_eq!(out["canDelete"], true);
}

#[test]
fn malformed_resource_is_content_unavailable() {
    let page = json!({"id": "ive", "status": "approved"});

    let err = inspect(&Resolver::default(), Mode::Resolve, None, &page, ContentType::Page)
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.starts_with("content unavailable"));
    assert!(msg.contains("owner field 'userId' is missing"));
}

#[test]
fn unknown_global_role_is_rejected() {
    let user = json!({"id": 1, "globalRole": "superadmin"});
    let post = json!({"id": 10, "userId": 5});

    let err = inspect(&Resolver::default(), Mode::Resolve, Some(&user), &post, ContentType::Post)
        .unwrap_err();
    assert!(err.to_string().contains("invalid acting user"));
}

#[test]
fn logged_out_context_without_id_resolves_as_guest() {
    let user = json!({"isAuthenticated": false});
    let post = json!({"id": 10, "userId": 5});

    let out = inspect(&Resolver::default(), Mode::Resolve, Some(&user), &post, ContentType::Post)
        .unwrap();
    assert_eq!(out["role"], "guest");
    assert_eq!(out["reason"], "Not authenticated.");
    for flag in [
        "canEdit",
        "canEditMetadata",
        "canViewSensitive",
        "canManageCollaborators",
        "canCreateSubPages",
        "canViewEditHistory",
        "canApproveReject",
        "canDelete",
    ] {
        assert_eq!(out[flag], false, "{flag}");
    }
}

#[test]
fn user_without_authenticated_flag_is_a_guest() {
    let user = json!({"id": 5, "globalRole": "admin"});
    let post = json!({"id": 10, "userId": 5});

    let out = inspect(&Resolver::default(), Mode::Resolve, Some(&user), &post, ContentType::Post)
        .unwrap();
    assert_eq!(out["role"], "guest");
}

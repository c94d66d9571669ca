//! Canonical view of a moderatable, ownable content item.
//!
//! Each content type arrives from its own REST endpoint with its own field
//! names. [`to_descriptor`] translates those payloads into a
//! [`ResourceDescriptor`] so the resolver only ever sees one shape.

use std::collections::BTreeSet;

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use kdom_core::{DomainError, ResourceId, UserId};

/// Kind of content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A K-Dom wiki page.
    Page,
    Post,
    Comment,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [Self::Page, Self::Post, Self::Comment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl core::fmt::Display for ContentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" | "kdom" | "k-dom" => Ok(Self::Page),
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            other => Err(DomainError::validation(format!("unknown content type '{other}'"))),
        }
    }
}

/// Lifecycle state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
    Deleted,
}

impl ModerationStatus {
    pub const ALL: [ModerationStatus; 4] =
        [Self::Pending, Self::Approved, Self::Rejected, Self::Deleted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Deleted => "deleted",
        }
    }
}

impl core::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "deleted" => Ok(Self::Deleted),
            other => Err(DomainError::validation(format!("unknown moderation status '{other}'"))),
        }
    }
}

/// Normalized ownership and moderation state of a content item.
///
/// Fields are private: the owner is fixed at construction and the
/// collaborator set can never contain the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    id: ResourceId,
    owner_user_id: Option<UserId>,
    collaborator_user_ids: BTreeSet<UserId>,
    moderation_status: ModerationStatus,
    content_type: ContentType,
}

impl ResourceDescriptor {
    /// Build a descriptor from already-typed data.
    ///
    /// `owner_user_id = None` marks system content with no individual owner.
    pub fn new(
        id: ResourceId,
        content_type: ContentType,
        owner_user_id: Option<UserId>,
        collaborators: impl IntoIterator<Item = UserId>,
        moderation_status: ModerationStatus,
    ) -> Self {
        let mut collaborator_user_ids: BTreeSet<UserId> = collaborators.into_iter().collect();
        if let Some(owner) = owner_user_id {
            if collaborator_user_ids.remove(&owner) {
                tracing::warn!(
                    resource_id = %id,
                    owner = %owner,
                    "owner listed as collaborator; dropping duplicate entry"
                );
            }
        }

        Self {
            id,
            owner_user_id,
            collaborator_user_ids,
            moderation_status,
            content_type,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn owner_user_id(&self) -> Option<UserId> {
        self.owner_user_id
    }

    pub fn collaborator_user_ids(&self) -> &BTreeSet<UserId> {
        &self.collaborator_user_ids
    }

    pub fn moderation_status(&self) -> ModerationStatus {
        self.moderation_status
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_user_id == Some(user)
    }

    pub fn has_collaborator(&self, user: UserId) -> bool {
        self.collaborator_user_ids.contains(&user)
    }

    /// Same resource with a different moderation status (e.g. after approval).
    pub fn with_status(&self, moderation_status: ModerationStatus) -> Self {
        Self {
            moderation_status,
            ..self.clone()
        }
    }

    /// Same resource with one more collaborator. Adding the owner is a no-op.
    pub fn with_collaborator(&self, user: UserId) -> Self {
        let mut next = self.clone();
        if !self.is_owned_by(user) {
            next.collaborator_user_ids.insert(user);
        }
        next
    }
}

/// The raw payload cannot be turned into a descriptor.
///
/// Callers show a generic "content unavailable" state instead of resolving
/// capabilities on partial data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedResourceError {
    #[error("malformed {content_type}: payload is not a JSON object")]
    NotAnObject { content_type: ContentType },

    #[error("malformed {content_type}: owner field '{field}' is missing")]
    MissingOwner {
        content_type: ContentType,
        field: &'static str,
    },

    #[error("malformed {content_type}: required field '{field}' is missing")]
    MissingField {
        content_type: ContentType,
        field: &'static str,
    },

    #[error("malformed {content_type}: field '{field}' is invalid: {detail}")]
    InvalidField {
        content_type: ContentType,
        field: &'static str,
        detail: String,
    },
}

/// Where each content type keeps its ownership and moderation fields.
struct FieldMap {
    id: &'static str,
    owner: &'static str,
    collaborators: Option<&'static str>,
    status: &'static str,
    status_required: bool,
    deleted_flag: Option<&'static str>,
}

impl FieldMap {
    fn for_type(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Page => Self {
                id: "id",
                owner: "userId",
                collaborators: Some("collaborators"),
                status: "status",
                status_required: true,
                deleted_flag: None,
            },
            ContentType::Post => Self {
                id: "id",
                owner: "userId",
                collaborators: None,
                status: "status",
                status_required: false,
                deleted_flag: None,
            },
            ContentType::Comment => Self {
                id: "id",
                owner: "userId",
                collaborators: None,
                status: "status",
                status_required: false,
                deleted_flag: Some("isDeleted"),
            },
        }
    }
}

/// Normalize a raw REST payload into a [`ResourceDescriptor`].
///
/// An absent owner field is an error; an explicit `null` owner is valid and
/// means system-owned content.
pub fn to_descriptor(
    raw: &Value,
    content_type: ContentType,
) -> Result<ResourceDescriptor, MalformedResourceError> {
    let fields = FieldMap::for_type(content_type);
    let obj = raw
        .as_object()
        .ok_or(MalformedResourceError::NotAnObject { content_type })?;

    let id = read_id(obj, content_type, fields.id)?;

    let owner_user_id = match obj.get(fields.owner) {
        None => {
            return Err(MalformedResourceError::MissingOwner {
                content_type,
                field: fields.owner,
            });
        }
        Some(Value::Null) => None,
        Some(v) => Some(read_user_id(v, content_type, fields.owner)?),
    };

    let collaborators = match fields.collaborators {
        Some(field) => read_collaborators(obj, content_type, field)?,
        None => Vec::new(),
    };

    let moderation_status = read_status(obj, content_type, &fields)?;

    Ok(ResourceDescriptor::new(
        id,
        content_type,
        owner_user_id,
        collaborators,
        moderation_status,
    ))
}

fn read_id(
    obj: &Map<String, Value>,
    content_type: ContentType,
    field: &'static str,
) -> Result<ResourceId, MalformedResourceError> {
    let invalid = |detail: String| MalformedResourceError::InvalidField {
        content_type,
        field,
        detail,
    };

    let raw = match obj.get(field) {
        None | Some(Value::Null) => {
            return Err(MalformedResourceError::MissingField { content_type, field });
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(invalid(format!("expected string or number, got {other}"))),
    };

    ResourceId::new(raw).map_err(|e| invalid(e.to_string()))
}

fn read_user_id(
    value: &Value,
    content_type: ContentType,
    field: &'static str,
) -> Result<UserId, MalformedResourceError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().map(UserId::new),
        Value::String(s) => s.parse::<UserId>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| MalformedResourceError::InvalidField {
        content_type,
        field,
        detail: format!("expected integer user id, got {value}"),
    })
}

fn read_collaborators(
    obj: &Map<String, Value>,
    content_type: ContentType,
    field: &'static str,
) -> Result<Vec<UserId>, MalformedResourceError> {
    let entries = match obj.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(MalformedResourceError::InvalidField {
                content_type,
                field,
                detail: format!("expected array, got {other}"),
            });
        }
    };

    entries
        .iter()
        .map(|entry| match entry {
            // Collaborator objects from the collaboration endpoints.
            Value::Object(inner) => {
                let id = inner
                    .get("userId")
                    .or_else(|| inner.get("id"))
                    .ok_or_else(|| MalformedResourceError::InvalidField {
                        content_type,
                        field,
                        detail: "collaborator entry has no userId".to_string(),
                    })?;
                read_user_id(id, content_type, field)
            }
            other => read_user_id(other, content_type, field),
        })
        .collect()
}

fn read_status(
    obj: &Map<String, Value>,
    content_type: ContentType,
    fields: &FieldMap,
) -> Result<ModerationStatus, MalformedResourceError> {
    if let Some(flag) = fields.deleted_flag {
        if obj.get(flag).and_then(Value::as_bool) == Some(true) {
            return Ok(ModerationStatus::Deleted);
        }
    }

    match obj.get(fields.status) {
        None | Some(Value::Null) if fields.status_required => {
            Err(MalformedResourceError::MissingField {
                content_type,
                field: fields.status,
            })
        }
        None | Some(Value::Null) => Ok(ModerationStatus::Approved),
        Some(Value::String(s)) => {
            s.parse::<ModerationStatus>()
                .map_err(|e| MalformedResourceError::InvalidField {
                    content_type,
                    field: fields.status,
                    detail: e.to_string(),
                })
        }
        Some(other) => Err(MalformedResourceError::InvalidField {
            content_type,
            field: fields.status,
            detail: format!("expected string, got {other}"),
        }),
    }
}
